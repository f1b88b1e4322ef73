//! Script builder mirroring the C# `ScriptBuilder` emission rules.

use super::OpCode;
use crate::cryptography::sha256;

/// Incrementally builds a NeoVM script.
#[derive(Debug, Default)]
pub struct ScriptBuilder {
    script: Vec<u8>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn emit(&mut self, byte: u8) -> &mut Self {
        self.script.push(byte);
        self
    }

    pub fn emit_opcode(&mut self, op: OpCode) -> &mut Self {
        self.emit(op as u8)
    }

    /// Pushes a byte string with the smallest PUSHDATA form.
    pub fn emit_push(&mut self, data: &[u8]) -> &mut Self {
        let len = data.len();
        if len <= 0xFF {
            // Always use PUSHDATA1 for small payloads to mirror C# behaviour
            self.emit_opcode(OpCode::PUSHDATA1);
            self.emit(len as u8);
        } else if len <= 0xFFFF {
            self.emit_opcode(OpCode::PUSHDATA2);
            self.emit((len & 0xFF) as u8);
            self.emit((len >> 8) as u8);
        } else {
            self.emit_opcode(OpCode::PUSHDATA4);
            self.emit((len & 0xFF) as u8);
            self.emit(((len >> 8) & 0xFF) as u8);
            self.emit(((len >> 16) & 0xFF) as u8);
            self.emit(((len >> 24) & 0xFF) as u8);
        }
        self.script.extend_from_slice(data);
        self
    }

    /// Pushes an integer, using the dedicated PUSH opcodes where possible.
    pub fn emit_push_int(&mut self, value: i64) -> &mut Self {
        if value == -1 {
            return self.emit_opcode(OpCode::PUSHM1);
        }
        if (0..=16).contains(&value) {
            return self.emit(OpCode::PUSH0 as u8 + value as u8);
        }

        let mut bytes = Vec::new();
        let mut v = value;
        while v != 0 && v != -1 {
            bytes.push((v & 0xFF) as u8);
            v >>= 8;
        }
        if v == -1 && (bytes.last().copied().unwrap_or(0) & 0x80) == 0 {
            bytes.push(0xFF);
        } else if v == 0 && !bytes.is_empty() && (bytes[bytes.len() - 1] & 0x80) != 0 {
            bytes.push(0x00);
        }

        self.emit_push(&bytes)
    }

    /// Emits a SYSCALL for the named interop service.
    ///
    /// The interop descriptor is the first four bytes of SHA-256 over the
    /// ASCII method name, little-endian.
    pub fn emit_syscall(&mut self, api: &str) -> &mut Self {
        let digest = sha256(api.as_bytes());
        let hash = u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]]);
        self.emit_opcode(OpCode::SYSCALL);
        self.script.extend_from_slice(&hash.to_le_bytes());
        self
    }

    pub fn len(&self) -> usize {
        self.script.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }

    pub fn to_array(&self) -> Vec<u8> {
        self.script.clone()
    }
}
