//! Timer tick behaviour: eviction, re-gossip window, finished-cache expiry.

use super::support::*;
use crate::ledger::Blockchain;
use crate::payloads::{OracleResponse, OracleResponseCode};
use crate::service::utils::sign_transaction;
use crate::service::{OracleService, FINISHED_CACHE_TTL, REFRESH_INTERVAL};
use crate::settings::OracleSettings;
use crate::wallets::MemoryWallet;
use std::sync::Arc;
use std::time::{Duration, Instant};

const REQUEST_ID: u64 = 11;

#[tokio::test]
async fn stale_task_is_evicted() {
    let keys = sorted_keys(4);
    let (request, original) = sample_request("https://x/y", 100_000_000);
    let chain = chain_with_request(REQUEST_ID, request, original, public_keys(&keys));
    let mut settings = OracleSettings::default();
    settings.max_task_timeout = Duration::from_millis(10_000);
    let service = OracleService::new(settings, chain.clone());

    // Collector-only task created by an inbound peer signature.
    service
        .add_response_tx_sign(
            chain.snapshot().as_ref(),
            REQUEST_ID,
            keys[1].public_key().clone(),
            vec![1u8; 64],
            None,
            None,
            None,
        )
        .unwrap();
    assert!(service.tasks.lock().pending.contains_key(&REQUEST_ID));

    // Not yet timed out.
    service.on_timer(Instant::now()).await;
    assert!(service.tasks.lock().pending.contains_key(&REQUEST_ID));

    // Past the timeout it disappears without entering the finished cache.
    service
        .on_timer(Instant::now() + Duration::from_millis(10_001))
        .await;
    {
        let book = service.tasks.lock();
        assert!(!book.pending.contains_key(&REQUEST_ID));
        assert!(!book.finished.contains_key(&REQUEST_ID));
    }

    // A later inbound signature starts a fresh task.
    service
        .add_response_tx_sign(
            chain.snapshot().as_ref(),
            REQUEST_ID,
            keys[1].public_key().clone(),
            vec![1u8; 64],
            None,
            None,
            None,
        )
        .unwrap();
    assert!(service.tasks.lock().pending.contains_key(&REQUEST_ID));
}

#[tokio::test]
async fn backup_signature_is_regossiped_inside_refresh_window() {
    let keys = sorted_keys(4);
    let (request, original) = sample_request("https://x/y", 100_000_000);
    let chain = chain_with_request(REQUEST_ID, request.clone(), original, public_keys(&keys));
    let mut settings = OracleSettings::default();
    // Unroutable peer; the send fails but still consumes a JSON-RPC id.
    settings.nodes = vec!["http://127.0.0.1:9/".to_string()];
    let service = OracleService::new(settings, chain.clone());
    *service.wallet.write() = Some(Arc::new(MemoryWallet::new(vec![
        crate::cryptography::KeyPair::from_private_bytes(&fixed_seed(1)).unwrap(),
    ])));

    // Install our transactions and backup signature the way the pipeline
    // does. The wallet key must match the booked backup signature.
    let local_key = crate::cryptography::KeyPair::from_private_bytes(&fixed_seed(1)).unwrap();
    let snapshot = chain.snapshot();
    let oracles = public_keys(&keys);
    let mut response = OracleResponse::new(REQUEST_ID, OracleResponseCode::Success, b"r".to_vec());
    let tx = service
        .create_response_tx(snapshot.as_ref(), &request, &mut response, &oracles)
        .unwrap();
    let mut backup_response =
        OracleResponse::new(REQUEST_ID, OracleResponseCode::ConsensusUnreachable, Vec::new());
    let backup_tx = service
        .create_response_tx(snapshot.as_ref(), &request, &mut backup_response, &oracles)
        .unwrap();
    let network = service.settings().network;
    service
        .add_response_tx_sign(
            snapshot.as_ref(),
            REQUEST_ID,
            local_key.public_key().clone(),
            sign_transaction(&tx, &local_key, network),
            Some(tx),
            Some(backup_tx.clone()),
            Some(sign_transaction(&backup_tx, &local_key, network)),
        )
        .unwrap();

    // Too young: nothing re-sent.
    service.on_timer(Instant::now()).await;
    assert_eq!(service.counter.load(std::sync::atomic::Ordering::Relaxed), 0);

    // Inside (refresh, 2 * refresh): one re-gossip per owned backup sign.
    service
        .on_timer(Instant::now() + REFRESH_INTERVAL + Duration::from_secs(10))
        .await;
    assert_eq!(service.counter.load(std::sync::atomic::Ordering::Relaxed), 1);

    // Past the window: no further re-gossip.
    service
        .on_timer(Instant::now() + REFRESH_INTERVAL * 2 + Duration::from_secs(10))
        .await;
    assert_eq!(service.counter.load(std::sync::atomic::Ordering::Relaxed), 1);
}

#[tokio::test]
async fn finished_cache_expires_after_ttl() {
    let keys = sorted_keys(4);
    let (request, original) = sample_request("https://x/y", 100_000_000);
    let chain = chain_with_request(REQUEST_ID, request, original, public_keys(&keys));
    let service = OracleService::new(OracleSettings::default(), chain);

    let now = Instant::now();
    service.tasks.lock().finished.insert(REQUEST_ID, now);

    service.on_timer(now + FINISHED_CACHE_TTL).await;
    assert!(service.tasks.lock().finished.contains_key(&REQUEST_ID));

    service
        .on_timer(now + FINISHED_CACHE_TTL + Duration::from_secs(1))
        .await;
    assert!(!service.tasks.lock().finished.contains_key(&REQUEST_ID));
}

fn fixed_seed(fill: u8) -> [u8; 32] {
    let mut seed = [fill; 32];
    // Keep the scalar comfortably inside the curve order.
    seed[0] = 0x01;
    seed
}
