use std::collections::HashSet;
use std::time::Duration;

use history::{resolve_history, ResolverConfig};
use ledger::{Address, Commitment, CreateRecordParams, Identity, LedgerClient, MemoryLedger};
use offchain::{MemoryStore, OffchainStore};
use serde_json::json;

async fn seed_record(
    ledger: &MemoryLedger,
    store: &MemoryStore,
    identity: &Identity,
    name: &str,
) -> ledger::AssetRecord {
    let uri = store
        .upload_json(&json!({"name": name, "symbol": "SYMBOL"}))
        .await
        .expect("upload");
    ledger
        .create_record(
            identity,
            CreateRecordParams {
                uri,
                name: name.to_string(),
                symbol: "SYMBOL".to_string(),
                royalty_basis_points: 0,
                collection: None,
                is_collection: false,
            },
            Commitment::Finalized,
        )
        .await
        .expect("create")
}

fn quick_config() -> ResolverConfig {
    ResolverConfig {
        max_concurrent_fetches: 4,
        fetch_timeout: Duration::from_millis(200),
    }
}

#[tokio::test]
async fn zero_records_is_an_empty_response() {
    let ledger = MemoryLedger::new();
    let store = MemoryStore::new();
    let nobody = Address::from_bytes(&[1u8; 32]);

    let entries = resolve_history(&ledger, &store, &nobody, &quick_config())
        .await
        .expect("resolve");
    assert!(entries.is_empty());
}

#[tokio::test]
async fn all_holdings_resolve_to_their_documents() {
    let ledger = MemoryLedger::new();
    let store = MemoryStore::new();
    let identity = Identity::generate();

    let a = seed_record(&ledger, &store, &identity, "First").await;
    let b = seed_record(&ledger, &store, &identity, "Second").await;

    let entries = resolve_history(&ledger, &store, identity.address(), &quick_config())
        .await
        .expect("resolve");

    assert_eq!(entries.len(), 2);
    // Each entry is traceable to exactly one source record.
    let mints: HashSet<_> = entries.iter().map(|e| e.mint_address.clone()).collect();
    assert_eq!(mints, HashSet::from([a.mint, b.mint]));
    assert!(entries.iter().all(|e| e.metadata.is_some() && e.error.is_none()));
}

#[tokio::test]
async fn one_failing_fetch_marks_only_its_own_entry() {
    let ledger = MemoryLedger::new();
    let store = MemoryStore::new();
    let identity = Identity::generate();

    let _ok_a = seed_record(&ledger, &store, &identity, "A").await;
    let broken = seed_record(&ledger, &store, &identity, "B").await;
    let _ok_c = seed_record(&ledger, &store, &identity, "C").await;

    store.set_failure(&broken.uri).await;

    let entries = resolve_history(&ledger, &store, identity.address(), &quick_config())
        .await
        .expect("resolve");

    assert_eq!(entries.len(), 3);
    let failed: Vec<_> = entries.iter().filter(|e| e.error.is_some()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].mint_address, broken.mint);
    assert!(failed[0].metadata.is_none());
    assert_eq!(
        entries.iter().filter(|e| e.metadata.is_some()).count(),
        2
    );
}

#[tokio::test]
async fn slow_fetch_times_out_without_stalling_siblings() {
    let ledger = MemoryLedger::new();
    let store = MemoryStore::new();
    let identity = Identity::generate();

    let fast = seed_record(&ledger, &store, &identity, "Fast").await;
    let slow = seed_record(&ledger, &store, &identity, "Slow").await;

    store.set_delay(&slow.uri, Duration::from_secs(5)).await;

    let entries = resolve_history(&ledger, &store, identity.address(), &quick_config())
        .await
        .expect("resolve");

    assert_eq!(entries.len(), 2);
    for entry in &entries {
        if entry.mint_address == slow.mint {
            let error = entry.error.as_ref().expect("timeout error");
            assert!(error.contains("timed out"));
        } else {
            assert_eq!(entry.mint_address, fast.mint);
            assert!(entry.metadata.is_some());
        }
    }
}

#[tokio::test]
async fn fan_out_respects_the_concurrency_bound() {
    let ledger = MemoryLedger::new();
    let store = MemoryStore::new();
    let identity = Identity::generate();

    // More records than permits, every fetch slightly delayed. With one
    // permit the resolution is effectively serial and still completes.
    for i in 0..4 {
        let record = seed_record(&ledger, &store, &identity, &format!("N{}", i)).await;
        store
            .set_delay(&record.uri, Duration::from_millis(20))
            .await;
    }

    let config = ResolverConfig {
        max_concurrent_fetches: 1,
        fetch_timeout: Duration::from_secs(1),
    };

    let entries = resolve_history(&ledger, &store, identity.address(), &config)
        .await
        .expect("resolve");
    assert_eq!(entries.len(), 4);
    assert!(entries.iter().all(|e| e.metadata.is_some()));
}
