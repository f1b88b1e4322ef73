//! Minimal in-memory blockchain for public-API tests.

use neo_oracle_service::cryptography::ECPoint;
use neo_oracle_service::ledger::{Blockchain, LedgerError, LedgerSnapshot, OracleRequest};
use neo_oracle_service::payloads::Transaction;
use neo_oracle_service::types::{UInt160, UInt256};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Default)]
pub struct ChainState {
    pub height: u32,
    pub oracles: Vec<ECPoint>,
    pub requests: BTreeMap<u64, OracleRequest>,
}

pub struct MemoryChain {
    pub state: Arc<Mutex<ChainState>>,
}

impl MemoryChain {
    pub fn new(state: ChainState) -> Arc<Self> {
        Arc::new(Self {
            state: Arc::new(Mutex::new(state)),
        })
    }
}

struct MemorySnapshot {
    state: Arc<Mutex<ChainState>>,
}

impl LedgerSnapshot for MemorySnapshot {
    fn height(&self) -> u32 {
        self.state.lock().height
    }

    fn designated_oracles(&self, _height: u32) -> Vec<ECPoint> {
        self.state.lock().oracles.clone()
    }

    fn oracle_request(&self, id: u64) -> Option<OracleRequest> {
        self.state.lock().requests.get(&id).cloned()
    }

    fn oracle_requests(&self) -> Vec<(u64, OracleRequest)> {
        self.state
            .lock()
            .requests
            .iter()
            .map(|(id, request)| (*id, request.clone()))
            .collect()
    }

    fn oracle_requests_by_url(&self, url: &str) -> Vec<(u64, OracleRequest)> {
        self.state
            .lock()
            .requests
            .iter()
            .filter(|(_, request)| request.url == url)
            .map(|(id, request)| (*id, request.clone()))
            .collect()
    }

    fn transaction_height(&self, _hash: &UInt256) -> Option<u32> {
        Some(0)
    }

    fn exec_fee_factor(&self) -> i64 {
        30
    }

    fn fee_per_byte(&self) -> i64 {
        1_000
    }

    fn oracle_contract_hash(&self) -> UInt160 {
        UInt160::from([0x58u8; 20])
    }

    fn max_valid_until_block_increment(&self) -> u32 {
        5760
    }

    fn verify_oracle_response_tx(&self, _tx: &Transaction) -> Option<i64> {
        Some(1_000_000)
    }
}

impl Blockchain for MemoryChain {
    fn snapshot(&self) -> Box<dyn LedgerSnapshot> {
        Box::new(MemorySnapshot {
            state: Arc::clone(&self.state),
        })
    }

    fn relay_transaction(&self, _tx: Transaction) -> Result<(), LedgerError> {
        Ok(())
    }
}
