use super::locks::{WalletGuard, WalletLocks};
use crate::config::DEFAULT_LOCK_TIMEOUT;
use crate::domain::ledger::LedgerEntry;
use crate::domain::ports::{StoreError, StoreResult, TransitionUnit, WalletStore};
use crate::domain::wallet::{Currency, Wallet, WalletId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Default)]
struct State {
    wallets: HashMap<WalletId, Wallet>,
    /// Unique index on the owner key.
    owners: HashMap<String, WalletId>,
    /// Ledger per wallet, in commit order.
    ledgers: HashMap<WalletId, Vec<LedgerEntry>>,
}

/// A thread-safe in-memory wallet store.
///
/// All tables live behind one `Arc<RwLock<..>>`, so a commit that writes the
/// wallet row and appends the ledger entry is applied under a single write
/// guard. Ideal for tests and for runs where persistence is not required.
#[derive(Clone)]
pub struct InMemoryWalletStore {
    state: Arc<RwLock<State>>,
    locks: WalletLocks,
}

impl Default for InMemoryWalletStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryWalletStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::with_lock_timeout(DEFAULT_LOCK_TIMEOUT)
    }

    pub fn with_lock_timeout(timeout: Duration) -> Self {
        Self {
            state: Arc::new(RwLock::new(State::default())),
            locks: WalletLocks::new(timeout),
        }
    }
}

#[async_trait]
impl WalletStore for InMemoryWalletStore {
    async fn insert_wallet(&self, wallet: Wallet) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.owners.contains_key(&wallet.owner) {
            return Err(StoreError::OwnerConflict(wallet.owner));
        }
        state.owners.insert(wallet.owner.clone(), wallet.id);
        state.ledgers.insert(wallet.id, Vec::new());
        state.wallets.insert(wallet.id, wallet);
        Ok(())
    }

    async fn wallet(&self, id: WalletId) -> StoreResult<Option<Wallet>> {
        let state = self.state.read().await;
        Ok(state.wallets.get(&id).cloned())
    }

    async fn wallet_by_owner(&self, owner: &str) -> StoreResult<Option<Wallet>> {
        let state = self.state.read().await;
        Ok(state
            .owners
            .get(owner)
            .and_then(|id| state.wallets.get(id))
            .cloned())
    }

    async fn set_currency(&self, id: WalletId, currency: Currency) -> StoreResult<Option<Wallet>> {
        let guard = self.locks.acquire(id).await?;
        let updated = self.state.write().await.wallets.get_mut(&id).map(|wallet| {
            wallet.set_currency(currency);
            wallet.clone()
        });
        if updated.is_none() {
            self.locks.release(id, guard);
        }
        Ok(updated)
    }

    async fn delete_wallet(&self, id: WalletId) -> StoreResult<bool> {
        let guard = self.locks.acquire(id).await?;
        let removed = {
            let mut state = self.state.write().await;
            match state.wallets.remove(&id) {
                Some(wallet) => {
                    state.owners.remove(&wallet.owner);
                    state.ledgers.remove(&id);
                    true
                }
                None => false,
            }
        };
        self.locks.release(id, guard);
        Ok(removed)
    }

    async fn entries(
        &self,
        id: WalletId,
        limit: usize,
        offset: usize,
    ) -> StoreResult<Vec<LedgerEntry>> {
        let state = self.state.read().await;
        Ok(state
            .ledgers
            .get(&id)
            .map(|ledger| {
                ledger
                    .iter()
                    .rev()
                    .skip(offset)
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn begin_transition(&self, id: WalletId) -> StoreResult<Option<Box<dyn TransitionUnit>>> {
        let guard = self.locks.acquire(id).await?;
        let wallet = self.state.read().await.wallets.get(&id).cloned();
        let Some(wallet) = wallet else {
            self.locks.release(id, guard);
            return Ok(None);
        };
        Ok(Some(Box::new(InMemoryTransition {
            state: Arc::clone(&self.state),
            wallet,
            staged_wallet: None,
            staged_entries: Vec::new(),
            _guard: guard,
        }) as Box<dyn TransitionUnit>))
    }
}

struct InMemoryTransition {
    state: Arc<RwLock<State>>,
    wallet: Wallet,
    staged_wallet: Option<Wallet>,
    staged_entries: Vec<LedgerEntry>,
    _guard: WalletGuard,
}

#[async_trait]
impl TransitionUnit for InMemoryTransition {
    fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    async fn write_balance(&mut self, wallet: &Wallet) -> StoreResult<()> {
        self.staged_wallet = Some(wallet.clone());
        Ok(())
    }

    async fn append_entry(&mut self, entry: &LedgerEntry) -> StoreResult<()> {
        self.staged_entries.push(entry.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let this = *self;
        let id = this.wallet.id;
        let mut state = this.state.write().await;
        if !state.wallets.contains_key(&id) {
            return Err(StoreError::Corrupted(format!(
                "wallet {id} disappeared while locked"
            )));
        }
        if let Some(wallet) = this.staged_wallet {
            state.wallets.insert(id, wallet);
        }
        state
            .ledgers
            .entry(id)
            .or_default()
            .extend(this.staged_entries);
        Ok(())
    }
}
