//! Signature and multi-signature contract accounts.

use crate::cryptography::{hash160, ECPoint};
use crate::types::UInt160;
use crate::vm::ScriptBuilder;

/// Parameter types accepted by a contract account's verification script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ContractParameterType {
    Signature = 0x00,
    PublicKey = 0x16,
}

/// A contract account: a verification script plus its parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    pub script: Vec<u8>,
    pub parameter_list: Vec<ContractParameterType>,
}

impl Contract {
    fn create(parameter_list: Vec<ContractParameterType>, script: Vec<u8>) -> Self {
        Self {
            script,
            parameter_list,
        }
    }

    /// The account hash of the verification script.
    pub fn script_hash(&self) -> UInt160 {
        UInt160::from(hash160(&self.script))
    }

    /// Creates a single-signature contract account for `public_key`.
    pub fn create_signature_contract(public_key: &ECPoint) -> Self {
        let script = Self::create_signature_redeem_script(public_key);
        Self::create(vec![ContractParameterType::Signature], script)
    }

    /// Creates the verification script `PUSHDATA pubkey; SYSCALL CheckSig`.
    pub fn create_signature_redeem_script(public_key: &ECPoint) -> Vec<u8> {
        let mut builder = ScriptBuilder::new();
        builder.emit_push(public_key.as_bytes());
        builder.emit_syscall("System.Crypto.CheckSig");
        builder.to_array()
    }

    /// Creates an M-of-N multi-signature contract account.
    pub fn create_multi_sig_contract(m: usize, public_keys: &[ECPoint]) -> Self {
        let script = Self::create_multi_sig_redeem_script(m, public_keys);
        Self::create(vec![ContractParameterType::Signature; m], script)
    }

    /// Creates the M-of-N verification script. Keys are pushed in ascending
    /// compressed-encoding order, matching the signature ordering convention
    /// used when assembling the invocation script.
    pub fn create_multi_sig_redeem_script(m: usize, public_keys: &[ECPoint]) -> Vec<u8> {
        let n = public_keys.len();
        if !(1..=n).contains(&m) || n == 0 || n > 1024 {
            panic!("Invalid multi-sig parameters: m={}, n={}", m, n);
        }

        let mut builder = ScriptBuilder::new();
        builder.emit_push_int(m as i64);

        let mut sorted_keys = public_keys.to_vec();
        sorted_keys.sort();
        for key in sorted_keys.iter() {
            builder.emit_push(key.as_bytes());
        }

        builder.emit_push_int(n as i64);
        builder.emit_syscall("System.Crypto.CheckMultisig");

        builder.to_array()
    }
}
