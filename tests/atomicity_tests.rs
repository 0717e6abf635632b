use common::{FailPoint, FaultyStore};
use rust_decimal_macros::dec;
use std::sync::Arc;
use wallet_engine::application::WalletService;
use wallet_engine::config::EngineConfig;
use wallet_engine::domain::wallet::Balance;
use wallet_engine::error::WalletError;

mod common;

async fn assert_rolled_back(fail_at: FailPoint) {
    let store = FaultyStore::new(fail_at);
    let service = WalletService::new(Arc::new(store.clone()), &EngineConfig::default());
    let healthy = WalletService::new(Arc::new(store.inner.clone()), &EngineConfig::default());

    let wallet = service.create_wallet("u1", None).await.unwrap();
    healthy.credit(wallet.id, dec!(10), "seed", "").await.unwrap();

    let err = service
        .debit(wallet.id, dec!(4), "purchase", "r1")
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::StorageFailure(_)), "{fail_at:?}: {err}");
    assert!(err.is_retryable());

    let current = service.get_wallet(wallet.id).await.unwrap();
    assert_eq!(current.balance, Balance::new(dec!(10)), "{fail_at:?}");
    assert_eq!(current.last_sequence, 1, "{fail_at:?}");
    let ledger = service.list_transactions(wallet.id, 1, 20).await.unwrap();
    assert_eq!(ledger.len(), 1, "{fail_at:?}");

    // The failed unit released the lock.
    healthy.credit(wallet.id, dec!(1), "", "").await.unwrap();
}

#[tokio::test]
async fn test_failed_balance_write_leaves_no_trace() {
    assert_rolled_back(FailPoint::WriteBalance).await;
}

#[tokio::test]
async fn test_failed_ledger_insert_discards_balance_write() {
    assert_rolled_back(FailPoint::AppendEntry).await;
}

#[tokio::test]
async fn test_failed_commit_discards_both_writes() {
    assert_rolled_back(FailPoint::Commit).await;
}
