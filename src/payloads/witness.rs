// Copyright (C) 2015-2025 The Neo Project.
//
// witness.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use crate::cryptography::hash160;
use crate::io::{var_bytes_size, BinaryWriter, IoResult, Serializable};
use crate::types::UInt160;

/// Represents a witness of a verifiable payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Witness {
    /// The invocation script of the witness. Used to pass arguments for
    /// `verification_script`.
    pub invocation_script: Vec<u8>,
    /// The verification script of the witness. Empty for witnesses that are
    /// verified by a deployed (native) contract.
    pub verification_script: Vec<u8>,
}

impl Witness {
    pub fn new(invocation_script: Vec<u8>, verification_script: Vec<u8>) -> Self {
        Self {
            invocation_script,
            verification_script,
        }
    }

    /// The hash of the `verification_script`.
    pub fn script_hash(&self) -> UInt160 {
        UInt160::from(hash160(&self.verification_script))
    }
}

impl Serializable for Witness {
    fn size(&self) -> usize {
        var_bytes_size(self.invocation_script.len())
            + var_bytes_size(self.verification_script.len())
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        writer.write_var_bytes(&self.invocation_script);
        writer.write_var_bytes(&self.verification_script);
        Ok(())
    }
}
