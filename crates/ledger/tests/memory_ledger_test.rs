use ledger::{
    Address, Commitment, CreateRecordParams, Identity, LedgerClient, LedgerError, MemoryLedger,
};

fn record_params(collection: Option<Address>, is_collection: bool) -> CreateRecordParams {
    CreateRecordParams {
        uri: "memory://doc".to_string(),
        name: "Name".to_string(),
        symbol: "SYMBOL".to_string(),
        royalty_basis_points: 0,
        collection,
        is_collection,
    }
}

#[tokio::test]
async fn created_record_is_retrievable_and_unverified() {
    let ledger = MemoryLedger::new();
    let identity = Identity::generate();

    let record = ledger
        .create_record(&identity, record_params(None, false), Commitment::Finalized)
        .await
        .expect("create");

    let fetched = ledger.record_by_address(&record.mint).await.expect("fetch");
    assert_eq!(fetched.mint, record.mint);
    assert!(!fetched.verified);
    assert_eq!(&fetched.owner, identity.address());
}

#[tokio::test]
async fn verify_against_missing_collection_fails() {
    let ledger = MemoryLedger::new();
    let identity = Identity::generate();

    let dangling = Address::from_bytes(&[9u8; 32]);
    let record = ledger
        .create_record(
            &identity,
            record_params(Some(dangling.clone()), false),
            Commitment::Finalized,
        )
        .await
        .expect("create");

    let err = ledger
        .verify_membership(&identity, &record.mint, &dangling, true)
        .await
        .expect_err("dangling collection must not verify");
    assert!(matches!(err, LedgerError::NotFound(_)));

    // Phase-1 record still exists, still unverified.
    let fetched = ledger.record_by_address(&record.mint).await.expect("fetch");
    assert!(!fetched.verified);
}

#[tokio::test]
async fn second_transfer_from_same_source_is_insufficient_balance() {
    let ledger = MemoryLedger::new();
    let identity = Identity::generate();
    let recipient = Address::from_bytes(&[3u8; 32]);

    let record = ledger
        .create_record(&identity, record_params(None, false), Commitment::Finalized)
        .await
        .expect("create");

    ledger
        .transfer_record(&identity, &record.mint, identity.address(), &recipient, 1)
        .await
        .expect("first transfer");

    let moved = ledger.record_by_address(&record.mint).await.expect("fetch");
    assert_eq!(moved.owner, recipient);

    let err = ledger
        .transfer_record(&identity, &record.mint, identity.address(), &recipient, 1)
        .await
        .expect_err("already moved");
    assert!(matches!(err, LedgerError::InsufficientBalance(_)));
}

#[tokio::test]
async fn records_by_owner_tracks_transfers() {
    let ledger = MemoryLedger::new();
    let identity = Identity::generate();
    let recipient = Address::from_bytes(&[4u8; 32]);

    let a = ledger
        .create_record(&identity, record_params(None, false), Commitment::Finalized)
        .await
        .expect("create");
    let _b = ledger
        .create_record(&identity, record_params(None, false), Commitment::Finalized)
        .await
        .expect("create");

    assert_eq!(
        ledger
            .records_by_owner(identity.address())
            .await
            .expect("query")
            .len(),
        2
    );

    ledger
        .transfer_record(&identity, &a.mint, identity.address(), &recipient, 1)
        .await
        .expect("transfer");

    assert_eq!(
        ledger
            .records_by_owner(identity.address())
            .await
            .expect("query")
            .len(),
        1
    );
    assert_eq!(
        ledger.records_by_owner(&recipient).await.expect("query").len(),
        1
    );
}

#[tokio::test]
async fn empty_owner_query_returns_empty_vec() {
    let ledger = MemoryLedger::new();
    let nobody = Address::from_bytes(&[8u8; 32]);

    let records = ledger.records_by_owner(&nobody).await.expect("query");
    assert!(records.is_empty());
}

#[tokio::test]
async fn revoked_mint_refuses_further_minting() {
    let ledger = MemoryLedger::new();
    let identity = Identity::generate();

    let mint = ledger.create_token_mint(&identity, 9).await.expect("mint");
    assert_eq!(ledger.token_mint_decimals(&mint).await, Some(9));

    let account = ledger
        .ensure_token_account(&identity, &mint, identity.address())
        .await
        .expect("account");

    ledger
        .mint_tokens(&identity, &mint, &account, 100)
        .await
        .expect("mint tokens");
    ledger
        .revoke_mint_authority(&identity, &mint)
        .await
        .expect("revoke");

    let err = ledger
        .mint_tokens(&identity, &mint, &account, 1)
        .await
        .expect_err("authority revoked");
    assert!(matches!(err, LedgerError::Transaction { .. }));
}

#[tokio::test]
async fn token_transfer_checks_balance() {
    let ledger = MemoryLedger::new();
    let identity = Identity::generate();
    let recipient = Address::from_bytes(&[5u8; 32]);

    let mint = ledger.create_token_mint(&identity, 9).await.expect("mint");
    let from = ledger
        .ensure_token_account(&identity, &mint, identity.address())
        .await
        .expect("from account");
    let to = ledger
        .ensure_token_account(&identity, &mint, &recipient)
        .await
        .expect("to account");

    ledger
        .mint_tokens(&identity, &mint, &from, 50)
        .await
        .expect("mint tokens");

    let err = ledger
        .transfer_tokens(&identity, &from, &to, 100)
        .await
        .expect_err("overdraw");
    assert!(matches!(err, LedgerError::InsufficientBalance(_)));

    ledger
        .transfer_tokens(&identity, &from, &to, 30)
        .await
        .expect("transfer");
    assert_eq!(ledger.token_account_amount(&from).await, Some(20));
    assert_eq!(ledger.token_account_amount(&to).await, Some(30));
}

#[tokio::test]
async fn ensure_token_account_is_idempotent() {
    let ledger = MemoryLedger::new();
    let identity = Identity::generate();

    let mint = ledger.create_token_mint(&identity, 6).await.expect("mint");
    let first = ledger
        .ensure_token_account(&identity, &mint, identity.address())
        .await
        .expect("account");
    let second = ledger
        .ensure_token_account(&identity, &mint, identity.address())
        .await
        .expect("account");

    assert_eq!(first, second);
}
