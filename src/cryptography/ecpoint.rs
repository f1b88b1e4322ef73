//! Compressed secp256r1 public key points.

use super::CryptoError;
use p256::ecdsa::VerifyingKey;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use std::cmp::Ordering;
use std::fmt;

/// Length of a compressed SEC1 point encoding.
pub const ECPOINT_COMPRESSED_SIZE: usize = 33;

/// A validated point on secp256r1, held in compressed encoding.
///
/// Ordering is byte-lexicographic over the compressed encoding; multisig
/// signature assembly and redeem-script key ordering both rely on it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ECPoint {
    bytes: [u8; ECPOINT_COMPRESSED_SIZE],
}

impl ECPoint {
    /// Decodes a point from compressed or uncompressed SEC1 bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, CryptoError> {
        let key = VerifyingKey::from_sec1_bytes(data).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self::from_verifying_key(&key))
    }

    pub(crate) fn from_verifying_key(key: &VerifyingKey) -> Self {
        let encoded = key.to_encoded_point(true);
        let mut bytes = [0u8; ECPOINT_COMPRESSED_SIZE];
        bytes.copy_from_slice(encoded.as_bytes());
        Self { bytes }
    }

    /// The compressed encoding of this point.
    pub fn as_bytes(&self) -> &[u8; ECPOINT_COMPRESSED_SIZE] {
        &self.bytes
    }

    /// Reconstructs the verifying key. The bytes were validated on entry, so
    /// a decode failure here is unreachable.
    pub(crate) fn verifying_key(&self) -> Option<VerifyingKey> {
        VerifyingKey::from_sec1_bytes(&self.bytes).ok()
    }
}

impl PartialOrd for ECPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ECPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bytes.cmp(&other.bytes)
    }
}

impl fmt::Display for ECPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.bytes))
    }
}

impl fmt::Debug for ECPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ECPoint({self})")
    }
}
