//! Hash functions used for transaction and script hashing.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Computes the SHA-256 hash of the given data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Computes RIPEMD-160 over SHA-256, the script-hash function.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(data);
    let mut hasher = Ripemd160::new();
    hasher.update(sha);
    hasher.finalize().into()
}
