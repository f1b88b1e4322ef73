// Copyright (C) 2015-2025 The Neo Project.
//
// oracle_response.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use super::oracle_response_code::OracleResponseCode;
use crate::io::{var_bytes_size, BinaryWriter, IoError, IoResult, Serializable};
use crate::smart_contract::CallFlags;
use crate::types::UInt160;
use crate::vm::{OpCode, ScriptBuilder};
use serde::{Deserialize, Serialize};

/// Indicates the maximum size of the Result field.
pub const MAX_RESULT_SIZE: usize = u16::MAX as usize;

/// Transaction attribute marking a transaction as an oracle response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleResponse {
    /// The ID of the oracle request.
    pub id: u64,

    /// The response code for the oracle request.
    pub code: OracleResponseCode,

    /// The result for the oracle request.
    pub result: Vec<u8>,
}

impl OracleResponse {
    /// Creates a new oracle response attribute.
    pub fn new(id: u64, code: OracleResponseCode, result: Vec<u8>) -> Self {
        Self { id, code, result }
    }

    /// The fixed script carried by every oracle response transaction:
    /// a dynamic call of the native Oracle contract's `finish` method.
    pub fn fixed_script(oracle_contract_hash: &UInt160) -> Vec<u8> {
        let mut builder = ScriptBuilder::new();
        builder.emit_opcode(OpCode::NEWARRAY0);
        builder.emit_push_int(CallFlags::ALL.bits() as i64);
        builder.emit_push("finish".as_bytes());
        builder.emit_push(&oracle_contract_hash.to_array());
        builder.emit_syscall("System.Contract.Call");
        builder.to_array()
    }

    /// Serialize without the attribute type byte.
    pub fn serialize_without_type(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        if self.result.len() > MAX_RESULT_SIZE {
            return Err(IoError::ExceedsMaxLength {
                field: "Result",
                max: MAX_RESULT_SIZE,
                actual: self.result.len(),
            });
        }
        writer.write_u64(self.id);
        writer.write_u8(self.code as u8);
        writer.write_var_bytes(&self.result);
        Ok(())
    }
}

impl Serializable for OracleResponse {
    fn size(&self) -> usize {
        8 + // Id (u64)
        1 + // Code (u8)
        var_bytes_size(self.result.len()) // Result with var length prefix
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        self.serialize_without_type(writer)
    }
}
