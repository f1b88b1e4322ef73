//! In-memory blockchain double shared by the service tests.

use crate::cryptography::{ECPoint, KeyPair};
use crate::ledger::{Blockchain, LedgerError, LedgerSnapshot, OracleRequest};
use crate::payloads::Transaction;
use crate::types::{UInt160, UInt256};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

pub(crate) struct ChainState {
    pub height: u32,
    pub oracles: Vec<ECPoint>,
    pub requests: BTreeMap<u64, OracleRequest>,
    pub tx_heights: HashMap<UInt256, u32>,
    pub exec_fee_factor: i64,
    pub fee_per_byte: i64,
    pub verify_gas: Option<i64>,
    pub relayed: Vec<Transaction>,
}

impl Default for ChainState {
    fn default() -> Self {
        Self {
            height: 10,
            oracles: Vec::new(),
            requests: BTreeMap::new(),
            tx_heights: HashMap::new(),
            exec_fee_factor: 30,
            fee_per_byte: 1_000,
            verify_gas: Some(1_000_000),
            relayed: Vec::new(),
        }
    }
}

pub(crate) struct MemoryChain {
    pub state: Arc<Mutex<ChainState>>,
}

impl MemoryChain {
    pub fn new(state: ChainState) -> Arc<Self> {
        Arc::new(Self {
            state: Arc::new(Mutex::new(state)),
        })
    }

    pub fn relayed(&self) -> Vec<Transaction> {
        self.state.lock().relayed.clone()
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

    fn transaction_height(&self, hash: &UInt256) -> Option<u32> {
        self.state.lock().tx_heights.get(hash).copied()
    }

    fn exec_fee_factor(&self) -> i64 {
        self.state.lock().exec_fee_factor
    }

    fn fee_per_byte(&self) -> i64 {
        self.state.lock().fee_per_byte
    }

    fn oracle_contract_hash(&self) -> UInt160 {
        UInt160::from([0x58u8; 20])
    }

    fn max_valid_until_block_increment(&self) -> u32 {
        5760
    }

    fn verify_oracle_response_tx(&self, _tx: &Transaction) -> Option<i64> {
        self.state.lock().verify_gas
    }
}

impl Blockchain for MemoryChain {
    fn snapshot(&self) -> Box<dyn LedgerSnapshot> {
        Box::new(MemorySnapshot {
            state: Arc::clone(&self.state),
        })
    }

    fn relay_transaction(&self, tx: Transaction) -> Result<(), LedgerError> {
        self.state.lock().relayed.push(tx);
        Ok(())
    }
}

/// A request plus the hash of its (known) originating transaction.
pub(crate) fn sample_request(url: &str, gas_for_response: u64) -> (OracleRequest, UInt256) {
    let original_tx_id = UInt256::from([0xAB; 32]);
    let request = OracleRequest {
        original_tx_id,
        gas_for_response,
        url: url.to_string(),
        filter: None,
        callback_contract: UInt160::from([0x33; 20]),
        callback_method: "callback".to_string(),
        user_data: Vec::new(),
    };
    (request, original_tx_id)
}

pub(crate) fn chain_with_request(
    request_id: u64,
    request: OracleRequest,
    original_tx_id: UInt256,
    oracles: Vec<ECPoint>,
) -> Arc<MemoryChain> {
    let mut state = ChainState::default();
    state.oracles = oracles;
    state.requests.insert(request_id, request);
    state.tx_heights.insert(original_tx_id, 10);
    MemoryChain::new(state)
}

/// Key pairs sorted by public key, so index order matches signing order.
pub(crate) fn sorted_keys(n: usize) -> Vec<KeyPair> {
    let mut keys: Vec<KeyPair> = (0..n).map(|_| KeyPair::generate()).collect();
    keys.sort_by(|a, b| a.public_key().cmp(b.public_key()));
    keys
}

pub(crate) fn public_keys(keys: &[KeyPair]) -> Vec<ECPoint> {
    keys.iter().map(|key| key.public_key().clone()).collect()
}
