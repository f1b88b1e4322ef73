//! Fixed-width integer types shared by payloads and chain state.

mod uint160;
mod uint256;

pub use uint160::{UInt160, UINT160_SIZE};
pub use uint256::{UInt256, UINT256_SIZE};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypeError {
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
}
