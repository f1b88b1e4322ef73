//! ECDSA key pairs over secp256r1.

use super::{CryptoError, ECPoint};
use p256::ecdsa::signature::{Signer, Verifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::SecretKey;
use rand::rngs::OsRng;

/// A secp256r1 private/public key pair.
///
/// Signing is deterministic (RFC 6979), producing 64-byte `r || s`
/// signatures over the raw message (hashed with SHA-256 internally).
pub struct KeyPair {
    signing_key: SigningKey,
    public_key: ECPoint,
}

impl KeyPair {
    /// Generates a fresh random key pair.
    pub fn generate() -> Self {
        let secret_key = SecretKey::random(&mut OsRng);
        Self::from_secret_key(secret_key)
    }

    /// Creates a key pair from 32 raw private key bytes.
    pub fn from_private_bytes(private_key: &[u8; 32]) -> Result<Self, CryptoError> {
        let secret_key =
            SecretKey::from_bytes(private_key.into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self::from_secret_key(secret_key))
    }

    fn from_secret_key(secret_key: SecretKey) -> Self {
        let signing_key = SigningKey::from(secret_key);
        let public_key = ECPoint::from_verifying_key(signing_key.verifying_key());
        Self {
            signing_key,
            public_key,
        }
    }

    /// The public key point of this pair.
    pub fn public_key(&self) -> &ECPoint {
        &self.public_key
    }

    /// Signs `data`, returning the 64-byte signature.
    pub fn sign(&self, data: &[u8]) -> Vec<u8> {
        let signature: Signature = self.signing_key.sign(data);
        signature.to_bytes().to_vec()
    }
}

/// Verifies a 64-byte signature over `data` under `public_key`.
///
/// Any malformed input verifies as false rather than erroring; callers treat
/// signatures as untrusted peer data.
pub fn verify_signature(public_key: &ECPoint, data: &[u8], signature: &[u8]) -> bool {
    let Some(key) = public_key.verifying_key() else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(signature) else {
        return false;
    };
    VerifyingKey::verify(&key, data, &signature).is_ok()
}
