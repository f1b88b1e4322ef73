//! Binary serialization helpers matching the Neo wire encoding.
//!
//! Only the writer side is implemented: the service builds and hashes
//! response transactions locally and never has to parse one off the wire.

use thiserror::Error;

pub type IoResult<T> = Result<T, IoError>;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("{field} exceeds maximum length {max}: {actual}")]
    ExceedsMaxLength {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

/// A type that can be serialized to the Neo binary format.
pub trait Serializable {
    /// Serialized size in bytes.
    fn size(&self) -> usize;

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()>;
}

/// Little-endian binary writer over a growable buffer.
#[derive(Debug, Default)]
pub struct BinaryWriter {
    buffer: Vec<u8>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Writes a variable-length unsigned integer.
    pub fn write_var_int(&mut self, value: u64) {
        if value < 0xFD {
            self.write_u8(value as u8);
        } else if value <= 0xFFFF {
            self.write_u8(0xFD);
            self.write_u16(value as u16);
        } else if value <= 0xFFFF_FFFF {
            self.write_u8(0xFE);
            self.write_u32(value as u32);
        } else {
            self.write_u8(0xFF);
            self.write_u64(value);
        }
    }

    /// Writes a length-prefixed byte string.
    pub fn write_var_bytes(&mut self, data: &[u8]) {
        self.write_var_int(data.len() as u64);
        self.write_bytes(data);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn to_array(&self) -> Vec<u8> {
        self.buffer.clone()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}

/// Size of a var-int prefix for `value`.
pub fn get_var_size(value: u64) -> usize {
    if value < 0xFD {
        1
    } else if value <= 0xFFFF {
        3
    } else if value <= 0xFFFF_FFFF {
        5
    } else {
        9
    }
}

/// Size of a length-prefixed byte string of `len` bytes.
pub fn var_bytes_size(len: usize) -> usize {
    get_var_size(len as u64) + len
}
