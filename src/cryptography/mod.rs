//! Cryptographic primitives for oracle response signing.
//!
//! Neo oracle signatures are ECDSA over secp256r1 with 64-byte `r || s`
//! encoding; public keys travel in compressed SEC1 form.

mod ecpoint;
mod hash;
mod key_pair;

pub use ecpoint::{ECPoint, ECPOINT_COMPRESSED_SIZE};
pub use hash::{hash160, sha256};
pub use key_pair::{verify_signature, KeyPair};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid public key encoding")]
    InvalidPublicKey,
    #[error("invalid private key")]
    InvalidPrivateKey,
    #[error("invalid signature encoding")]
    InvalidSignature,
}
