//! Request discovery and the fetch/filter/build pipeline.

use super::utils::{filter_json, sign_transaction};
use super::{OracleService, OracleServiceError, FINISHED_CACHE_TTL, PROCESS_INTERVAL};
use crate::cryptography::{verify_signature, ECPoint};
use crate::ledger::{Blockchain, LedgerSnapshot, OracleRequest};
use crate::payloads::{OracleResponse, OracleResponseCode};
use crate::protocols::OracleProtocol;
use crate::wallets::{Wallet, WalletAccount};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::Ordering;
use std::time::Instant;
use tracing::{debug, warn};

impl OracleService {
    /// The polling loop: scan pending requests on chain and run the pipeline
    /// for every request we have not yet built a response for.
    pub(crate) async fn process_requests_loop(&self) {
        while !self.cancel.load(Ordering::SeqCst) {
            let snapshot = self.chain.snapshot();
            self.sync_pending_queue(snapshot.as_ref());

            for (request_id, request) in snapshot.oracle_requests() {
                if self.cancel.load(Ordering::SeqCst) {
                    break;
                }
                if self.is_request_finished(request_id) {
                    continue;
                }
                if self.has_pending_response_tx(request_id) {
                    continue;
                }
                if let Err(err) = self
                    .process_request(snapshot.as_ref(), request_id, &request)
                    .await
                {
                    self.handle_error(&err);
                }
            }

            tokio::time::sleep(PROCESS_INTERVAL).await;
        }
    }

    /// Fetches a request's URL and builds, signs and gossips the response
    /// transactions for every pending request sharing that URL.
    pub(crate) async fn process_request(
        &self,
        snapshot: &dyn LedgerSnapshot,
        request_id: u64,
        request: &OracleRequest,
    ) -> Result<(), OracleServiceError> {
        debug!(
            target: "neo::oracle",
            request_id,
            url = %request.url,
            "processing oracle request"
        );

        let oracle_nodes = snapshot.designated_oracles(snapshot.height() + 1);
        if oracle_nodes.is_empty() {
            return Err(OracleServiceError::Processing(
                "oracle nodes not designated".to_string(),
            ));
        }

        // Network I/O happens before any lock is taken.
        let (mut code, data) = self.process_url(&request.url).await;
        let response_pairs = snapshot.oracle_requests_by_url(&request.url);

        let mut sends = Vec::new();
        for (pending_id, pending_request) in response_pairs {
            let mut response = OracleResponse::new(pending_id, code, Vec::new());

            if response.code == OracleResponseCode::Success {
                match filter_json(&data, pending_request.filter.as_deref()) {
                    Ok(result) => response.result = result,
                    Err(err) => {
                        response.code = OracleResponseCode::Error;
                        code = OracleResponseCode::Error;
                        warn!(
                            target: "neo::oracle",
                            request_id,
                            filter = ?pending_request.filter,
                            error = %err,
                            "oracle filter failed"
                        );
                    }
                }
            }

            let response_tx =
                self.create_response_tx(snapshot, &pending_request, &mut response, &oracle_nodes)?;

            let mut backup_response = OracleResponse::new(
                pending_id,
                OracleResponseCode::ConsensusUnreachable,
                Vec::new(),
            );
            let backup_tx = self.create_response_tx(
                snapshot,
                &pending_request,
                &mut backup_response,
                &oracle_nodes,
            )?;

            debug!(
                target: "neo::oracle",
                request_id,
                pending_id,
                response_hash = %response_tx.hash(),
                backup_hash = %backup_tx.hash(),
                code = ?response.code,
                "oracle response transactions built"
            );

            let wallet = self.wallet.read().clone().ok_or_else(|| {
                OracleServiceError::Processing("wallet not available".to_string())
            })?;

            for account in wallet.get_accounts() {
                if !account.has_key() || account.is_locked() {
                    continue;
                }
                let Some(key) = account.get_key() else {
                    continue;
                };
                let oracle_pub = key.public_key().clone();
                if !oracle_nodes.iter().any(|p| p == &oracle_pub) {
                    continue;
                }

                let tx_sign = sign_transaction(&response_tx, &key, self.settings.network);
                let backup_sign = sign_transaction(&backup_tx, &key, self.settings.network);

                self.add_response_tx_sign(
                    snapshot,
                    pending_id,
                    oracle_pub,
                    tx_sign.clone(),
                    Some(response_tx.clone()),
                    Some(backup_tx.clone()),
                    Some(backup_sign),
                )?;

                sends.push(self.send_response_signature(pending_id, tx_sign, key));
            }
        }

        if !sends.is_empty() {
            futures::future::join_all(sends).await;
        }

        debug!(target: "neo::oracle", request_id, "oracle request processed");
        Ok(())
    }

    /// Resolves a URL through the protocol registry.
    ///
    /// A panicking protocol is contained here and reported as `Error`;
    /// fetch outcomes never propagate as Rust errors.
    pub(crate) async fn process_url(&self, url: &str) -> (OracleResponseCode, String) {
        let uri = match url::Url::parse(url) {
            Ok(uri) => uri,
            Err(_) => return (OracleResponseCode::Error, String::new()),
        };

        let Some(protocol) = self.protocols.get(uri.scheme()) else {
            return (OracleResponseCode::ProtocolNotSupported, String::new());
        };

        match AssertUnwindSafe(protocol.process(&self.settings, uri))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(_) => {
                warn!(target: "neo::oracle", url = %url, "oracle protocol panicked");
                (OracleResponseCode::Error, String::new())
            }
        }
    }

    /// Ingests a partial signature gossiped by a peer oracle.
    pub fn submit_oracle_response(
        &self,
        oracle_pub: ECPoint,
        request_id: u64,
        tx_sign: Vec<u8>,
        msg_sign: Vec<u8>,
    ) -> Result<(), OracleServiceError> {
        if !self.is_running() {
            return Err(OracleServiceError::Disabled);
        }

        let mut message = Vec::with_capacity(oracle_pub.as_bytes().len() + 8 + tx_sign.len());
        message.extend_from_slice(oracle_pub.as_bytes());
        message.extend_from_slice(&request_id.to_le_bytes());
        message.extend_from_slice(&tx_sign);
        if !verify_signature(&oracle_pub, &message, &msg_sign) {
            return Err(OracleServiceError::InvalidMessageSignature(format!(
                "Invalid oracle response message signature from '{}'.",
                oracle_pub
            )));
        }

        if self.is_request_finished(request_id) {
            return Err(OracleServiceError::RequestFinished);
        }

        let snapshot = self.chain.snapshot();
        let oracles = snapshot.designated_oracles(snapshot.height() + 1);
        if !oracles.iter().any(|key| key == &oracle_pub) {
            return Err(OracleServiceError::NotDesignated(format!(
                "{} isn't an oracle node.",
                oracle_pub
            )));
        }

        if snapshot.oracle_request(request_id).is_none() {
            return Err(OracleServiceError::RequestNotFound);
        }

        self.add_response_tx_sign(
            snapshot.as_ref(),
            request_id,
            oracle_pub,
            tx_sign,
            None,
            None,
            None,
        )
    }

    /// Drops pending tasks whose request is no longer on chain.
    pub(crate) fn sync_pending_queue(&self, snapshot: &dyn LedgerSnapshot) {
        let onchain_ids: std::collections::HashSet<u64> = snapshot
            .oracle_requests()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        self.tasks
            .lock()
            .pending
            .retain(|id, _| onchain_ids.contains(id));
    }

    pub(crate) fn is_request_finished(&self, request_id: u64) -> bool {
        self.tasks.lock().finished.contains_key(&request_id)
    }

    fn has_pending_response_tx(&self, request_id: u64) -> bool {
        self.tasks
            .lock()
            .pending
            .get(&request_id)
            .map(|task| task.tx.is_some())
            .unwrap_or(false)
    }

    pub(crate) fn cleanup_finished_cache(&self, now: Instant) {
        self.tasks
            .lock()
            .finished
            .retain(|_, finalized_at| now.duration_since(*finalized_at) <= FINISHED_CACHE_TTL);
    }
}
