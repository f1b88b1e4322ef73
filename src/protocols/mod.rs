//! Off-chain protocol fetchers.
//!
//! Each URI scheme maps to one [`OracleProtocol`] capability. Fetch outcomes
//! never propagate as errors; they always collapse into an
//! [`OracleResponseCode`] that ends up on chain.

mod https;

pub use https::OracleHttpsProtocol;

use crate::payloads::OracleResponseCode;
use crate::settings::OracleSettings;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// A fetcher for one URI scheme.
#[async_trait]
pub trait OracleProtocol: Send + Sync {
    /// Resolves the URI to a textual body, or a typed failure code.
    async fn process(&self, settings: &OracleSettings, uri: url::Url)
        -> (OracleResponseCode, String);
}

/// Static mapping from lowercase URI scheme to protocol capability.
pub struct ProtocolRegistry {
    protocols: HashMap<String, Arc<dyn OracleProtocol>>,
}

impl ProtocolRegistry {
    /// Creates a registry with the built-in HTTPS protocol registered.
    pub fn new() -> Self {
        let mut registry = Self {
            protocols: HashMap::new(),
        };
        registry.register("https", Arc::new(OracleHttpsProtocol::new()));
        registry
    }

    /// An empty registry, for hosts that wire their own protocol set.
    pub fn empty() -> Self {
        Self {
            protocols: HashMap::new(),
        }
    }

    /// Registers a protocol under a scheme. Schemes are matched lowercase.
    pub fn register(&mut self, scheme: &str, protocol: Arc<dyn OracleProtocol>) {
        self.protocols
            .insert(scheme.to_ascii_lowercase(), protocol);
    }

    /// Looks up the protocol for a scheme.
    pub fn get(&self, scheme: &str) -> Option<Arc<dyn OracleProtocol>> {
        self.protocols.get(&scheme.to_ascii_lowercase()).cloned()
    }
}

impl Default for ProtocolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
