use super::ledger::LedgerEntry;
use super::wallet::{Currency, Wallet, WalletId};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Failures reported by a storage adapter.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The owner key is already bound to another wallet.
    #[error("Owner {0} already has a wallet")]
    OwnerConflict(String),
    #[error("Timed out after {0:?} waiting for wallet lock")]
    LockTimeout(Duration),
    #[error("Storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("Corrupted record: {0}")]
    Corrupted(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// The persistence collaborator of the wallet engine.
///
/// Plain reads are read-committed: they never wait for an in-flight
/// transition. Everything that mutates an existing wallet goes through that
/// wallet's exclusive lock.
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Inserts a new wallet. Must fail with [`StoreError::OwnerConflict`] if
    /// the owner key is taken, even when two inserts race.
    async fn insert_wallet(&self, wallet: Wallet) -> StoreResult<()>;

    async fn wallet(&self, id: WalletId) -> StoreResult<Option<Wallet>>;

    async fn wallet_by_owner(&self, owner: &str) -> StoreResult<Option<Wallet>>;

    /// Replaces the currency of a wallet under its lock, leaving the balance
    /// alone. Returns the updated wallet, or `None` if it does not exist.
    async fn set_currency(&self, id: WalletId, currency: Currency) -> StoreResult<Option<Wallet>>;

    /// Deletes a wallet together with all of its ledger entries.
    /// Returns `false` if the wallet did not exist.
    async fn delete_wallet(&self, id: WalletId) -> StoreResult<bool>;

    /// Ledger entries of a wallet, newest first.
    async fn entries(&self, id: WalletId, limit: usize, offset: usize)
    -> StoreResult<Vec<LedgerEntry>>;

    /// Acquires the wallet's exclusive lock and reads it fresh.
    ///
    /// Returns `None` if the wallet does not exist once the lock is held.
    async fn begin_transition(&self, id: WalletId) -> StoreResult<Option<Box<dyn TransitionUnit>>>;
}

/// One atomic read-modify-append unit over a locked wallet.
///
/// Writes are staged until [`TransitionUnit::commit`]. Dropping the unit
/// without committing discards every staged write and releases the lock.
#[async_trait]
pub trait TransitionUnit: Send {
    /// The wallet as read after the lock was acquired.
    fn wallet(&self) -> &Wallet;

    async fn write_balance(&mut self, wallet: &Wallet) -> StoreResult<()>;

    async fn append_entry(&mut self, entry: &LedgerEntry) -> StoreResult<()>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;
}

pub type WalletStoreRef = Arc<dyn WalletStore>;
