//! Oracle service runtime.
//!
//! Owns the per-request signature aggregation state and drives the three
//! cooperating loops: the request poller, the refresh/eviction timer, and
//! the fire-and-forget peer signature sender. All mutations of the pending
//! queue and the finished cache happen under one process-wide mutex.

mod lifecycle;
mod processing;
mod sender;
mod timer;
mod transactions;
pub(crate) mod utils;

#[cfg(test)]
mod tests;

use crate::cryptography::ECPoint;
use crate::ledger::Blockchain;
use crate::payloads::Transaction;
use crate::protocols::ProtocolRegistry;
use crate::settings::OracleSettings;
use crate::wallets::Wallet;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::JoinHandle;

pub(crate) const REFRESH_INTERVAL: Duration = Duration::from_secs(3 * 60);
pub(crate) const FINISHED_CACHE_TTL: Duration = Duration::from_secs(3 * 24 * 60 * 60);
pub(crate) const FILTER_MAX_NEST: usize = 64;
pub(crate) const SIGNATURE_SEND_TIMEOUT: Duration = Duration::from_secs(5);
pub(crate) const PROCESS_INTERVAL: Duration = Duration::from_millis(500);

/// Cap on peer RPC response bodies; they are read and discarded.
pub(crate) const MAX_PEER_RESPONSE_SIZE: usize = u16::MAX as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleStatus {
    Unstarted,
    Running,
    Stopped,
}

impl OracleStatus {
    fn as_u8(self) -> u8 {
        match self {
            OracleStatus::Unstarted => 0,
            OracleStatus::Running => 1,
            OracleStatus::Stopped => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => OracleStatus::Running,
            2 => OracleStatus::Stopped,
            _ => OracleStatus::Unstarted,
        }
    }
}

#[derive(Debug, Error)]
pub enum OracleServiceError {
    #[error("oracle service disabled")]
    Disabled,
    #[error("oracle request already finished")]
    RequestFinished,
    #[error("oracle request not found")]
    RequestNotFound,
    #[error("oracle request transaction not found")]
    RequestTransactionNotFound,
    #[error("oracle not designated: {0}")]
    NotDesignated(String),
    #[error("invalid message signature: {0}")]
    InvalidMessageSignature(String),
    #[error("invalid response transaction signature: {0}")]
    InvalidTransactionSignature(String),
    #[error("oracle response build failed: {0}")]
    BuildFailed(String),
    #[error("oracle processing error: {0}")]
    Processing(String),
}

/// Per-request aggregation state.
///
/// Every entry in `signs` verifies against `tx`'s sign data whenever `tx` is
/// present, and likewise for `backup_signs`/`backup_tx`; installing a
/// transaction prunes entries that stop verifying.
struct OracleTask {
    tx: Option<Transaction>,
    backup_tx: Option<Transaction>,
    signs: BTreeMap<ECPoint, Vec<u8>>,
    backup_signs: BTreeMap<ECPoint, Vec<u8>>,
    timestamp: Instant,
}

impl OracleTask {
    fn new() -> Self {
        Self {
            tx: None,
            backup_tx: None,
            signs: BTreeMap::new(),
            backup_signs: BTreeMap::new(),
            timestamp: Instant::now(),
        }
    }
}

/// Pending queue and finished cache, guarded together so their key sets stay
/// disjoint at every observable point.
#[derive(Default)]
struct TaskBook {
    pending: HashMap<u64, OracleTask>,
    finished: HashMap<u64, Instant>,
}

impl TaskBook {
    fn new() -> Self {
        Self::default()
    }
}

/// Oracle service runtime.
pub struct OracleService {
    settings: OracleSettings,
    chain: Arc<dyn Blockchain>,
    protocols: ProtocolRegistry,
    status: AtomicU8,
    wallet: RwLock<Option<Arc<dyn Wallet>>>,
    tasks: Mutex<TaskBook>,
    cancel: AtomicBool,
    request_task: Mutex<Option<JoinHandle<()>>>,
    timer_task: Mutex<Option<JoinHandle<()>>>,
    counter: AtomicU64,
    http_client: reqwest::Client,
}

impl OracleService {
    /// Creates a service with the default protocol set (HTTPS).
    pub fn new(settings: OracleSettings, chain: Arc<dyn Blockchain>) -> Arc<Self> {
        Self::with_protocols(settings, chain, ProtocolRegistry::new())
    }

    /// Creates a service with a caller-supplied protocol registry.
    pub fn with_protocols(
        mut settings: OracleSettings,
        chain: Arc<dyn Blockchain>,
        protocols: ProtocolRegistry,
    ) -> Arc<Self> {
        settings.normalize();
        let version = env!("CARGO_PKG_VERSION");
        let http_client = reqwest::Client::builder()
            .user_agent(format!("NeoOracleService/{}", version))
            .build()
            .expect("failed to build oracle rpc client");
        Arc::new(Self {
            settings,
            chain,
            protocols,
            status: AtomicU8::new(OracleStatus::Unstarted.as_u8()),
            wallet: RwLock::new(None),
            tasks: Mutex::new(TaskBook::new()),
            cancel: AtomicBool::new(false),
            request_task: Mutex::new(None),
            timer_task: Mutex::new(None),
            counter: AtomicU64::new(0),
            http_client,
        })
    }

    pub fn settings(&self) -> &OracleSettings {
        &self.settings
    }

    pub fn status(&self) -> OracleStatus {
        OracleStatus::from_u8(self.status.load(Ordering::SeqCst))
    }

    pub fn is_running(&self) -> bool {
        self.status() == OracleStatus::Running
    }
}
