//! Oracle service settings (matches the OracleService plugin configuration).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What the service does after an unexpected processing error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnhandledExceptionPolicy {
    Ignore,
    Continue,
    StopPlugin,
    StopNode,
    Terminate,
}

/// HTTPS fetcher settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HttpsSettings {
    /// Total wall-clock budget per request, across connect, headers and body
    /// read, in milliseconds.
    #[serde(with = "duration_ms")]
    pub timeout: Duration,
}

impl Default for HttpsSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(5_000),
        }
    }
}

/// Oracle service configuration settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct OracleSettings {
    /// Network magic, mixed into every signature.
    pub network: u32,
    /// Path of the oracle wallet file, opened by the host's start command.
    pub wallet: Option<String>,
    /// Peer oracle RPC endpoints for signature gossip.
    pub nodes: Vec<String>,
    /// Duration after which an unfulfilled task is evicted.
    #[serde(with = "duration_ms")]
    pub max_task_timeout: Duration,
    /// If false, the HTTPS fetcher rejects internal addresses.
    pub allow_private_host: bool,
    /// Media-type allowlist for fetched responses.
    pub allowed_content_types: Vec<String>,
    pub https: HttpsSettings,
    /// Start processing as soon as a wallet is available.
    pub auto_start: bool,
    pub unhandled_exception_policy: UnhandledExceptionPolicy,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            network: 860_833_102,
            wallet: None,
            nodes: Vec::new(),
            max_task_timeout: Duration::from_millis(432_000_000),
            allow_private_host: false,
            allowed_content_types: vec!["application/json".to_string()],
            https: HttpsSettings::default(),
            auto_start: false,
            unhandled_exception_policy: UnhandledExceptionPolicy::Ignore,
        }
    }
}

impl OracleSettings {
    /// Loads settings from a JSON configuration section.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_value(value.clone())?;
        settings.normalize();
        Ok(settings)
    }

    /// Returns true if a content type is allowed.
    pub fn is_content_type_allowed(&self, content_type: &str) -> bool {
        self.allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(content_type))
    }

    /// Ensures allowed content types are initialized with defaults.
    pub fn normalize(&mut self) {
        if self.allowed_content_types.is_empty() {
            self.allowed_content_types
                .push("application/json".to_string());
        }
        if self
            .wallet
            .as_ref()
            .map(|value| value.trim().is_empty())
            .unwrap_or(false)
        {
            self.wallet = None;
        }
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
