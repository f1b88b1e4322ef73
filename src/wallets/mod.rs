//! Wallet access traits.
//!
//! Wallet files, password handling and key storage formats live in the
//! embedding node; the service only needs to enumerate unlocked accounts and
//! sign with those whose keys are designated oracles.

use crate::cryptography::KeyPair;
use std::sync::Arc;

/// A single account inside a wallet.
pub trait WalletAccount: Send + Sync {
    /// Whether the account has a private key available at all.
    fn has_key(&self) -> bool;

    /// Whether the key is currently locked (e.g. not decrypted).
    fn is_locked(&self) -> bool;

    /// The account's key pair, if present and unlocked.
    fn get_key(&self) -> Option<Arc<KeyPair>>;
}

/// A wallet holding zero or more accounts.
pub trait Wallet: Send + Sync {
    fn get_accounts(&self) -> Vec<Arc<dyn WalletAccount>>;
}

/// A plain in-memory wallet over pre-loaded key pairs.
pub struct MemoryWallet {
    accounts: Vec<Arc<dyn WalletAccount>>,
}

struct MemoryAccount {
    key: Arc<KeyPair>,
}

impl WalletAccount for MemoryAccount {
    fn has_key(&self) -> bool {
        true
    }

    fn is_locked(&self) -> bool {
        false
    }

    fn get_key(&self) -> Option<Arc<KeyPair>> {
        Some(Arc::clone(&self.key))
    }
}

impl MemoryWallet {
    pub fn new(keys: Vec<KeyPair>) -> Self {
        let accounts = keys
            .into_iter()
            .map(|key| Arc::new(MemoryAccount { key: Arc::new(key) }) as Arc<dyn WalletAccount>)
            .collect();
        Self { accounts }
    }
}

impl Wallet for MemoryWallet {
    fn get_accounts(&self) -> Vec<Arc<dyn WalletAccount>> {
        self.accounts.clone()
    }
}
