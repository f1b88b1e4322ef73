//! Blockchain collaborator interface.
//!
//! The oracle service never owns ledger state. It reads committed state
//! through a [`LedgerSnapshot`] and hands finished transactions to the
//! [`Blockchain`] for mempool admission. The embedding node provides both;
//! tests use an in-memory implementation.

use crate::cryptography::ECPoint;
use crate::payloads::Transaction;
use crate::types::{UInt160, UInt256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("transaction relay failed: {0}")]
    Relay(String),
}

/// An on-chain oracle request, immutable once observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleRequest {
    /// Hash of the transaction that created the request.
    pub original_tx_id: UInt256,
    /// GAS reserved by the requester to pay for the response.
    pub gas_for_response: u64,
    /// The URL to fetch.
    pub url: String,
    /// Optional result-selection expression applied to the fetched body.
    pub filter: Option<String>,
    /// Contract to call back once the response lands.
    pub callback_contract: UInt160,
    /// Method to call back.
    pub callback_method: String,
    /// Opaque requester data forwarded to the callback.
    pub user_data: Vec<u8>,
}

/// A consistent read view over committed chain state.
///
/// All reads inside one request-processing pass go through the same
/// snapshot, so every honest oracle observing the same height builds a
/// byte-identical response transaction.
pub trait LedgerSnapshot: Send + Sync {
    /// Height of the latest persisted block.
    fn height(&self) -> u32;

    /// Designated oracle public keys effective at `height`.
    fn designated_oracles(&self, height: u32) -> Vec<ECPoint>;

    /// Looks up a single pending oracle request.
    fn oracle_request(&self, id: u64) -> Option<OracleRequest>;

    /// All pending oracle requests, by id.
    fn oracle_requests(&self) -> Vec<(u64, OracleRequest)>;

    /// Pending requests sharing a URL; one fetch serves all of them.
    fn oracle_requests_by_url(&self, url: &str) -> Vec<(u64, OracleRequest)>;

    /// Block height at which a transaction was committed.
    fn transaction_height(&self, hash: &UInt256) -> Option<u32>;

    /// Policy contract: execution fee factor.
    fn exec_fee_factor(&self) -> i64;

    /// Policy contract: network fee per serialized byte.
    fn fee_per_byte(&self) -> i64;

    /// Script hash of the native Oracle contract.
    fn oracle_contract_hash(&self) -> UInt160;

    /// Maximum distance between a transaction's inclusion height and its
    /// `valid_until_block`.
    fn max_valid_until_block_increment(&self) -> u32;

    /// Runs the native Oracle contract's `verify` method against the
    /// transaction under a verification engine. Returns the gas consumed if
    /// the engine halts normally, `None` otherwise.
    fn verify_oracle_response_tx(&self, tx: &Transaction) -> Option<i64>;
}

/// The blockchain node as seen by the oracle service.
pub trait Blockchain: Send + Sync {
    /// Opens a read snapshot over the current committed state.
    fn snapshot(&self) -> Box<dyn LedgerSnapshot>;

    /// Hands a fully-signed transaction to the mempool. Fire-and-forget:
    /// the service does not await admission or relay acknowledgement.
    fn relay_transaction(&self, tx: Transaction) -> Result<(), LedgerError>;
}
