//! Signing-data helper matching `Neo.Network.P2P.Helper`.
//!
//! Signatures cover the network magic followed by the transaction hash, so a
//! signature produced for one network can never verify on another.

use super::Transaction;

/// Produces the byte buffer used for signing: network magic (LE) followed by
/// the transaction hash.
pub fn get_sign_data(tx: &Transaction, network: u32) -> Vec<u8> {
    let hash = tx.hash();
    let mut buffer = Vec::with_capacity(4 + 32);
    buffer.extend_from_slice(&network.to_le_bytes());
    buffer.extend_from_slice(hash.as_bytes());
    buffer
}
