//! Service start/stop and liveness handling.

use super::utils::wallet_has_oracle_account;
use super::{OracleService, OracleServiceError, OracleStatus};
use crate::ledger::{Blockchain, LedgerSnapshot};
use crate::settings::UnhandledExceptionPolicy;
use crate::wallets::Wallet;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{error, info, warn};

impl OracleService {
    /// Starts the poller and timer loops if the wallet holds a key that is
    /// currently a designated oracle.
    pub fn start(self: &Arc<Self>, wallet: Arc<dyn Wallet>) {
        if self.is_running() {
            return;
        }

        let snapshot = self.chain.snapshot();
        let oracles = snapshot.designated_oracles(snapshot.height() + 1);
        if oracles.is_empty() {
            warn!(target: "neo::oracle", "oracle service unavailable (no designated oracles)");
            return;
        }

        if !wallet_has_oracle_account(wallet.as_ref(), &oracles) {
            warn!(target: "neo::oracle", "oracle service unavailable (wallet has no oracle key)");
            return;
        }

        *self.wallet.write() = Some(wallet);
        self.cancel.store(false, Ordering::SeqCst);
        self.status
            .store(OracleStatus::Running.as_u8(), Ordering::SeqCst);

        let request_task = {
            let service = Arc::clone(self);
            tokio::spawn(async move {
                service.process_requests_loop().await;
            })
        };

        let timer_task = {
            let service = Arc::clone(self);
            tokio::spawn(async move {
                service.timer_loop().await;
            })
        };

        *self.request_task.lock() = Some(request_task);
        *self.timer_task.lock() = Some(timer_task);

        info!(target: "neo::oracle", "oracle service started");
    }

    /// Cancels both loops and clears the pending queue.
    pub fn stop(&self) {
        self.cancel.store(true, Ordering::SeqCst);
        *self.wallet.write() = None;
        self.status
            .store(OracleStatus::Stopped.as_u8(), Ordering::SeqCst);
        self.tasks.lock().pending.clear();
        if let Some(handle) = self.request_task.lock().take() {
            handle.abort();
        }
        if let Some(handle) = self.timer_task.lock().take() {
            handle.abort();
        }
        info!(target: "neo::oracle", "oracle service stopped");
    }

    /// Liveness self-check, invoked by the host on every persisted block.
    ///
    /// The designated set can rotate as the chain advances; a node whose
    /// wallet no longer holds a next-block oracle key stops itself.
    pub fn on_block_persisted(&self, snapshot: &dyn LedgerSnapshot) {
        if !self.is_running() {
            return;
        }

        let oracles = snapshot.designated_oracles(snapshot.height() + 1);
        if oracles.is_empty() {
            self.stop();
            return;
        }

        let wallet = self.wallet.read().clone();
        match wallet {
            Some(wallet) => {
                if !wallet_has_oracle_account(wallet.as_ref(), &oracles) {
                    self.stop();
                }
            }
            None => self.stop(),
        }
    }

    pub(crate) fn handle_error(&self, err: &OracleServiceError) {
        error!(target: "neo::oracle", error = %err, "oracle service error");
        match self.settings.unhandled_exception_policy {
            UnhandledExceptionPolicy::StopPlugin => self.stop(),
            UnhandledExceptionPolicy::StopNode => std::process::exit(1),
            UnhandledExceptionPolicy::Terminate => std::process::abort(),
            UnhandledExceptionPolicy::Ignore | UnhandledExceptionPolicy::Continue => {}
        }
    }
}
