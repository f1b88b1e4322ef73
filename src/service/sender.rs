//! Outbound peer signature gossip.

use super::{OracleService, MAX_PEER_RESPONSE_SIZE, SIGNATURE_SEND_TIMEOUT};
use crate::cryptography::KeyPair;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use futures::StreamExt;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::warn;

impl OracleService {
    /// Pushes a partial signature to every configured peer oracle.
    ///
    /// Each peer gets its own fire-and-forget task; failures are logged and
    /// left for the timer's re-gossip pass. The accompanying message
    /// signature covers `pubkey || LE64(request_id) || tx_sign` so peers can
    /// authenticate the sender without any transport-level identity.
    pub(crate) async fn send_response_signature(
        &self,
        request_id: u64,
        tx_sign: Vec<u8>,
        key: Arc<KeyPair>,
    ) {
        if self.settings.nodes.is_empty() {
            return;
        }

        let mut message = Vec::with_capacity(key.public_key().as_bytes().len() + 8 + tx_sign.len());
        message.extend_from_slice(key.public_key().as_bytes());
        message.extend_from_slice(&request_id.to_le_bytes());
        message.extend_from_slice(&tx_sign);
        let msg_sign = key.sign(&message);

        let params = json!([
            BASE64_STANDARD.encode(key.public_key().as_bytes()),
            request_id,
            BASE64_STANDARD.encode(&tx_sign),
            BASE64_STANDARD.encode(&msg_sign),
        ]);

        for node in &self.settings.nodes {
            let payload = json!({
                "jsonrpc": "2.0",
                "method": "submitoracleresponse",
                "params": params,
                "id": self.counter.fetch_add(1, Ordering::Relaxed),
            });
            let client = self.http_client.clone();
            let url = node.clone();
            tokio::spawn(async move {
                let sent = client
                    .post(&url)
                    .timeout(SIGNATURE_SEND_TIMEOUT)
                    .json(&payload)
                    .send()
                    .await;
                match sent {
                    Ok(response) => drain_response(response).await,
                    Err(error) => {
                        warn!(
                            target: "neo::oracle",
                            %error,
                            node = %url,
                            request_id,
                            "failed to send oracle response signature"
                        );
                    }
                }
            });
        }
    }
}

/// Reads and discards a peer's response body, bounded so a misbehaving peer
/// cannot make us buffer unbounded data.
async fn drain_response(response: reqwest::Response) {
    let mut received = 0usize;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(chunk) => {
                received += chunk.len();
                if received > MAX_PEER_RESPONSE_SIZE {
                    break;
                }
            }
            Err(_) => break,
        }
    }
}
