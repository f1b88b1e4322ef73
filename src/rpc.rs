//! JSON-RPC surface for the `submitoracleresponse` method.
//!
//! The RPC server framework lives in the host node; this module only decodes
//! the four positional parameters and maps service errors onto the wire
//! error catalogue. Oracle-specific failures all share error code `-100`.

use crate::cryptography::ECPoint;
use crate::service::{OracleService, OracleServiceError};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use serde_json::{json, Value};
use std::fmt;

const ERR_INVALID_PARAMS: i64 = -32602;
const ERR_ORACLE: i64 = -100;

/// A JSON-RPC error response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcError {
    code: i64,
    message: String,
    data: Option<String>,
}

impl RpcError {
    fn new(code: i64, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn invalid_params() -> Self {
        Self::new(ERR_INVALID_PARAMS, "Invalid params")
    }

    pub fn oracle_disabled() -> Self {
        Self::new(ERR_ORACLE, "Oracle service is not running")
    }

    pub fn oracle_invalid_sign() -> Self {
        Self::new(ERR_ORACLE, "Invalid sign")
    }

    pub fn oracle_request_finished() -> Self {
        Self::new(ERR_ORACLE, "Request has already finished")
    }

    pub fn oracle_request_not_found() -> Self {
        Self::new(ERR_ORACLE, "Request is not found")
    }

    pub fn oracle_invalid_response_tx_sign() -> Self {
        Self::new(ERR_ORACLE, "Invalid response transaction sign")
    }

    pub fn oracle_not_designated_node() -> Self {
        Self::new(ERR_ORACLE, "Not a designated oracle node")
    }

    pub fn internal_server_error() -> Self {
        Self::new(-32603, "Internal server error")
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    /// The JSON error object for the response envelope.
    pub fn to_json(&self) -> Value {
        match &self.data {
            Some(data) => json!({ "code": self.code, "message": self.message, "data": data }),
            None => json!({ "code": self.code, "message": self.message }),
        }
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

/// Handles `submitoracleresponse`: params are base64(pubkey), request id,
/// base64(tx signature), base64(message signature). Success returns `{}`.
pub fn submit_oracle_response(
    service: &OracleService,
    params: &[Value],
) -> Result<Value, RpcError> {
    let oracle_pubkey_bytes = expect_base64_param(params, 0)?;
    let request_id = expect_u64_param(params, 1)?;
    let tx_sign = expect_base64_param(params, 2)?;
    let msg_sign = expect_base64_param(params, 3)?;

    let oracle_pub = ECPoint::from_bytes(&oracle_pubkey_bytes)
        .map_err(|_| RpcError::invalid_params().with_data("Invalid oracle public key"))?;

    service
        .submit_oracle_response(oracle_pub, request_id, tx_sign, msg_sign)
        .map_err(map_oracle_error)?;

    Ok(json!({}))
}

fn expect_base64_param(params: &[Value], index: usize) -> Result<Vec<u8>, RpcError> {
    let text = params
        .get(index)
        .and_then(|value| value.as_str())
        .ok_or_else(|| {
            RpcError::invalid_params().with_data(format!(
                "submitoracleresponse expects base64 parameter {}",
                index + 1
            ))
        })?;
    BASE64_STANDARD
        .decode(text.trim())
        .map_err(|_| RpcError::invalid_params().with_data("Invalid Base64-encoded bytes"))
}

fn expect_u64_param(params: &[Value], index: usize) -> Result<u64, RpcError> {
    params
        .get(index)
        .and_then(Value::as_u64)
        .ok_or_else(|| {
            RpcError::invalid_params().with_data(format!(
                "submitoracleresponse expects integer parameter {}",
                index + 1
            ))
        })
}

fn map_oracle_error(err: OracleServiceError) -> RpcError {
    match err {
        OracleServiceError::Disabled => RpcError::oracle_disabled(),
        OracleServiceError::RequestFinished => RpcError::oracle_request_finished(),
        OracleServiceError::RequestNotFound
        | OracleServiceError::RequestTransactionNotFound
        | OracleServiceError::BuildFailed(_) => RpcError::oracle_request_not_found(),
        OracleServiceError::NotDesignated(message) => {
            RpcError::oracle_not_designated_node().with_data(message)
        }
        OracleServiceError::InvalidMessageSignature(message) => {
            RpcError::oracle_invalid_sign().with_data(message)
        }
        OracleServiceError::InvalidTransactionSignature(message) => {
            RpcError::oracle_invalid_response_tx_sign().with_data(message)
        }
        OracleServiceError::Processing(message) => {
            RpcError::internal_server_error().with_data(message)
        }
    }
}
