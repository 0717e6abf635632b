use crate::domain::ports::{StoreError, StoreResult};
use crate::domain::wallet::WalletId;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-wallet exclusive locks.
///
/// Each wallet gets its own `tokio::sync::Mutex`, so transitions on different
/// wallets never wait on each other. Waiters on the same wallet are served in
/// FIFO order, which is the order their transitions are applied in.
#[derive(Clone)]
pub struct WalletLocks {
    locks: Arc<DashMap<WalletId, Arc<Mutex<()>>>>,
    timeout: Duration,
}

/// Proof that the holder has exclusive access to one wallet.
pub type WalletGuard = OwnedMutexGuard<()>;

impl WalletLocks {
    pub fn new(timeout: Duration) -> Self {
        Self {
            locks: Arc::new(DashMap::new()),
            timeout,
        }
    }

    /// Waits for the wallet's lock, failing with [`StoreError::LockTimeout`]
    /// once the configured timeout expires.
    pub async fn acquire(&self, id: WalletId) -> StoreResult<WalletGuard> {
        let lock = self.locks.entry(id).or_default().clone();
        tokio::time::timeout(self.timeout, lock.lock_owned())
            .await
            .map_err(|_| StoreError::LockTimeout(self.timeout))
    }

    /// Releases `guard` and removes the wallet's entry unless another task
    /// holds or awaits the same lock.
    ///
    /// Used once a locked read finds no wallet, so unknown and deleted ids do
    /// not leave entries behind.
    pub fn release(&self, id: WalletId, guard: WalletGuard) {
        drop(guard);
        self.locks
            .remove_if(&id, |_, lock| Arc::strong_count(lock) == 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
