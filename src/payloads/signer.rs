// Copyright (C) 2015-2025 The Neo Project.
//
// signer.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use super::WitnessScope;
use crate::io::{get_var_size, BinaryWriter, IoError, IoResult, Serializable};
use crate::types::{UInt160, UINT160_SIZE};

// This limits maximum number of AllowedContracts
const MAX_SUBITEMS: usize = 16;

/// Represents a signer of a Transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signer {
    /// The account of the signer.
    pub account: UInt160,

    /// The scopes of the witness.
    pub scopes: WitnessScope,

    /// The contracts that are allowed by the witness.
    /// Only serialized when the CustomContracts flag is set.
    pub allowed_contracts: Vec<UInt160>,
}

impl Signer {
    /// Creates a new signer with no contract restrictions.
    pub fn new(account: UInt160, scopes: WitnessScope) -> Self {
        Self {
            account,
            scopes,
            allowed_contracts: Vec::new(),
        }
    }

    /// Creates a signer whose witness is valid only inside the given
    /// contracts.
    pub fn with_allowed_contracts(account: UInt160, allowed_contracts: Vec<UInt160>) -> Self {
        Self {
            account,
            scopes: WitnessScope::CUSTOM_CONTRACTS,
            allowed_contracts,
        }
    }
}

impl Serializable for Signer {
    fn size(&self) -> usize {
        let mut size = UINT160_SIZE + 1;
        if self.scopes.contains(WitnessScope::CUSTOM_CONTRACTS) {
            size += get_var_size(self.allowed_contracts.len() as u64)
                + self.allowed_contracts.len() * UINT160_SIZE;
        }
        size
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        writer.write_bytes(self.account.as_bytes());
        writer.write_u8(self.scopes.bits());
        if self.scopes.contains(WitnessScope::CUSTOM_CONTRACTS) {
            if self.allowed_contracts.len() > MAX_SUBITEMS {
                return Err(IoError::ExceedsMaxLength {
                    field: "AllowedContracts",
                    max: MAX_SUBITEMS,
                    actual: self.allowed_contracts.len(),
                });
            }
            writer.write_var_int(self.allowed_contracts.len() as u64);
            for contract in &self.allowed_contracts {
                writer.write_bytes(contract.as_bytes());
            }
        }
        Ok(())
    }
}
