//! Refresh and eviction timer.

use super::{OracleService, REFRESH_INTERVAL};
use crate::cryptography::KeyPair;
use crate::wallets::{Wallet, WalletAccount};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

impl OracleService {
    pub(crate) async fn timer_loop(&self) {
        loop {
            tokio::time::sleep(REFRESH_INTERVAL).await;
            if self.cancel.load(Ordering::SeqCst) {
                break;
            }
            self.on_timer(Instant::now()).await;
        }
    }

    /// One timer tick: re-gossip our backup signatures for tasks that are
    /// one refresh interval old (first-round gossip may have been lost),
    /// evict tasks past the configured timeout, and expire old finished
    /// cache entries.
    pub(crate) async fn on_timer(&self, now: Instant) {
        let wallet = self.wallet.read().clone();

        let resend: Vec<(u64, Vec<u8>, Arc<KeyPair>)> = {
            let mut book = self.tasks.lock();
            let mut resend = Vec::new();
            book.pending.retain(|id, task| {
                let age = now.duration_since(task.timestamp);
                if age > self.settings.max_task_timeout {
                    debug!(target: "neo::oracle", request_id = id, "oracle task timed out");
                    return false;
                }
                if age > REFRESH_INTERVAL && age < REFRESH_INTERVAL * 2 {
                    if let Some(wallet) = wallet.as_ref() {
                        for account in wallet.get_accounts() {
                            let Some(key) = account.get_key() else {
                                continue;
                            };
                            if let Some(sign) = task.backup_signs.get(key.public_key()) {
                                resend.push((*id, sign.clone(), key));
                            }
                        }
                    }
                }
                true
            });
            resend
        };

        // Gossip happens after the lock is released.
        for (request_id, sign, key) in resend {
            self.send_response_signature(request_id, sign, key).await;
        }

        self.cleanup_finished_cache(now);
    }
}
