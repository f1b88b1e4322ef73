//! Response transaction construction and signature aggregation.

use super::utils::oracle_threshold;
use super::{OracleService, OracleServiceError, OracleTask};
use crate::cryptography::{verify_signature, ECPoint};
use crate::io::{get_var_size, var_bytes_size, Serializable};
use crate::ledger::{Blockchain, LedgerSnapshot};
use crate::payloads::{
    get_sign_data, OracleResponse, OracleResponseCode, Signer, Transaction, TransactionAttribute,
    Witness, WitnessScope, HEADER_SIZE, MAX_RESULT_SIZE,
};
use crate::smart_contract::{multi_signature_contract_cost, Contract};
use crate::vm::ScriptBuilder;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, warn};

impl OracleService {
    /// Records a signature for a request, installing the locally-built
    /// transactions when provided, and finalizes the response once either
    /// signature book reaches the threshold.
    ///
    /// A signature arriving before the local transactions exist is stored
    /// speculatively in both books; installing the transactions later prunes
    /// whichever book it did not belong to.
    pub(crate) fn add_response_tx_sign(
        &self,
        snapshot: &dyn LedgerSnapshot,
        request_id: u64,
        oracle_pub: ECPoint,
        sign: Vec<u8>,
        response_tx: Option<Transaction>,
        backup_tx: Option<Transaction>,
        backup_sign: Option<Vec<u8>>,
    ) -> Result<(), OracleServiceError> {
        let network = self.settings.network;
        let mut book = self.tasks.lock();

        if book.finished.contains_key(&request_id) {
            return Err(OracleServiceError::RequestFinished);
        }

        if !book.pending.contains_key(&request_id) {
            let request = snapshot
                .oracle_request(request_id)
                .ok_or(OracleServiceError::RequestNotFound)?;
            snapshot
                .transaction_height(&request.original_tx_id)
                .ok_or(OracleServiceError::RequestTransactionNotFound)?;
            book.pending.insert(request_id, OracleTask::new());
        }

        let finalized = {
            let task = book
                .pending
                .get_mut(&request_id)
                .expect("oracle task inserted");

            if let Some(tx) = response_tx {
                let data = get_sign_data(&tx, network);
                task.tx = Some(tx);
                task.signs
                    .retain(|key, value| verify_signature(key, &data, value));
            }

            if let Some(tx) = backup_tx {
                let data = get_sign_data(&tx, network);
                task.backup_tx = Some(tx);
                task.backup_signs
                    .retain(|key, value| verify_signature(key, &data, value));
                if let Some(backup_sign) = backup_sign {
                    task.backup_signs.insert(oracle_pub.clone(), backup_sign);
                }
            }

            if task.tx.is_none() {
                task.signs.insert(oracle_pub.clone(), sign.clone());
                task.backup_signs.insert(oracle_pub, sign);
                return Ok(());
            }

            let tx = task.tx.as_ref().expect("oracle tx available");
            let backup_tx = task.backup_tx.as_ref().expect("oracle backup tx available");

            let tx_data = get_sign_data(tx, network);
            let backup_data = get_sign_data(backup_tx, network);

            if verify_signature(&oracle_pub, &tx_data, &sign) {
                task.signs.insert(oracle_pub.clone(), sign);
            } else if verify_signature(&oracle_pub, &backup_data, &sign) {
                task.backup_signs.insert(oracle_pub.clone(), sign);
            } else {
                return Err(OracleServiceError::InvalidTransactionSignature(format!(
                    "Invalid oracle response transaction signature from '{}'.",
                    oracle_pub
                )));
            }

            self.check_tx_sign(snapshot, tx, &task.signs)
                .or_else(|| self.check_tx_sign(snapshot, backup_tx, &task.backup_signs))
        };

        if let Some(completed) = finalized {
            if let Err(error) = self.chain.relay_transaction(completed.clone()) {
                warn!(target: "neo::oracle", %error, "failed to relay oracle response tx");
                return Ok(());
            }
            debug!(
                target: "neo::oracle",
                tx = %completed.hash(),
                request_id,
                "oracle response tx relayed"
            );
            book.finished.insert(request_id, Instant::now());
            book.pending.remove(&request_id);
        }

        Ok(())
    }

    /// Checks one signature book for threshold satisfaction. On success,
    /// returns the transaction with the multisig witness completed from the
    /// first M signatures in ascending public-key order.
    pub(crate) fn check_tx_sign(
        &self,
        snapshot: &dyn LedgerSnapshot,
        tx: &Transaction,
        signs: &BTreeMap<ECPoint, Vec<u8>>,
    ) -> Option<Transaction> {
        let height = snapshot.height();
        if tx.valid_until_block() <= height {
            return None;
        }

        let oracle_nodes = snapshot.designated_oracles(height + 1);
        if oracle_nodes.is_empty() {
            return None;
        }

        let m = oracle_threshold(oracle_nodes.len());
        if signs.len() < m {
            return None;
        }

        let contract = Contract::create_multi_sig_contract(m, &oracle_nodes);
        let mut builder = ScriptBuilder::new();
        for (_key, sign) in signs.iter().take(m) {
            builder.emit_push(sign.as_slice());
        }
        let invocation_script = builder.to_array();

        let hashes = tx.script_hashes_for_verifying();
        let index = if hashes.first() == Some(&contract.script_hash()) {
            0
        } else {
            1
        };

        let mut completed = tx.clone();
        let mut witnesses = completed.witnesses().to_vec();
        if let Some(witness) = witnesses.get_mut(index) {
            witness.invocation_script = invocation_script;
        }
        completed.set_witnesses(witnesses);
        Some(completed)
    }

    /// Builds the response transaction for a request deterministically:
    /// identical chain state and response produce byte-identical
    /// transactions on every honest oracle, so signatures are compatible.
    ///
    /// The response is rewritten in place when the result exceeds the size
    /// cap or the reserved gas cannot cover the fees.
    pub(crate) fn create_response_tx(
        &self,
        snapshot: &dyn LedgerSnapshot,
        request: &crate::ledger::OracleRequest,
        response: &mut OracleResponse,
        oracle_nodes: &[ECPoint],
    ) -> Result<Transaction, OracleServiceError> {
        let n = oracle_nodes.len();
        let m = oracle_threshold(n);

        let request_height = snapshot
            .transaction_height(&request.original_tx_id)
            .ok_or(OracleServiceError::RequestTransactionNotFound)?;

        let oracle_hash = snapshot.oracle_contract_hash();
        let oracle_sign_contract = Contract::create_multi_sig_contract(m, oracle_nodes);
        let multisig_hash = oracle_sign_contract.script_hash();

        let mut tx = Transaction::new();
        tx.valid_until_block = request_height + snapshot.max_valid_until_block_increment();
        tx.signers = vec![
            Signer::new(oracle_hash, WitnessScope::NONE),
            Signer::with_allowed_contracts(multisig_hash, vec![oracle_hash]),
        ];
        tx.attributes = vec![TransactionAttribute::OracleResponse(response.clone())];
        tx.script = OracleResponse::fixed_script(&oracle_hash);

        // Witness slots are positional against the verification hash list;
        // the oracle contract witness stays entirely empty.
        let multisig_witness = Witness::new(Vec::new(), oracle_sign_contract.script.clone());
        let oracle_witness = Witness::default();
        let witnesses = tx
            .script_hashes_for_verifying()
            .iter()
            .map(|hash| {
                if *hash == multisig_hash {
                    multisig_witness.clone()
                } else {
                    oracle_witness.clone()
                }
            })
            .collect();
        tx.set_witnesses(witnesses);

        let verify_gas = snapshot.verify_oracle_response_tx(&tx).ok_or_else(|| {
            OracleServiceError::BuildFailed("oracle verification script did not halt".to_string())
        })?;
        tx.network_fee = verify_gas
            + snapshot.exec_fee_factor() * multi_signature_contract_cost(m, n);

        // Serialized size excluding attributes. The future multisig
        // invocation script holds M signature pushes of 66 bytes each.
        let size_inv = 66 * m;
        let size = HEADER_SIZE
            + get_var_size(tx.signers.len() as u64)
            + tx.signers.iter().map(Serializable::size).sum::<usize>()
            + var_bytes_size(tx.script.len())
            + get_var_size(tx.witnesses.len() as u64)
            + oracle_witness.size()
            + get_var_size(size_inv as u64)
            + size_inv
            + var_bytes_size(oracle_sign_contract.script.len());

        let fee_per_byte = snapshot.fee_per_byte();
        if response.result.len() > MAX_RESULT_SIZE {
            response.code = OracleResponseCode::ResponseTooLarge;
            response.result = Vec::new();
        } else if tx.network_fee + (size + attributes_size(&tx)) as i64 * fee_per_byte
            > request.gas_for_response as i64
        {
            response.code = OracleResponseCode::InsufficientFunds;
            response.result = Vec::new();
        }
        tx.attributes = vec![TransactionAttribute::OracleResponse(response.clone())];

        let byte_fee = (size + attributes_size(&tx)) as i64 * fee_per_byte;
        tx.network_fee += byte_fee;
        tx.system_fee = request.gas_for_response as i64 - tx.network_fee;

        Ok(tx)
    }
}

/// Var-size of the attribute list, prefix included.
fn attributes_size(tx: &Transaction) -> usize {
    get_var_size(tx.attributes().len() as u64)
        + tx.attributes().iter().map(Serializable::size).sum::<usize>()
}
