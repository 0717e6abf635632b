#![allow(dead_code)]

use async_trait::async_trait;
use std::fs::File;
use std::io::Error;
use std::path::Path;
use std::sync::Arc;
use wallet_engine::config::EngineConfig;
use wallet_engine::domain::ledger::LedgerEntry;
use wallet_engine::domain::ports::{
    StoreError, StoreResult, TransitionUnit, WalletStore, WalletStoreRef,
};
use wallet_engine::domain::wallet::{Currency, Wallet, WalletId};
use wallet_engine::application::WalletService;
use wallet_engine::infrastructure::in_memory::InMemoryWalletStore;

pub fn service() -> WalletService {
    let store: WalletStoreRef = Arc::new(InMemoryWalletStore::new());
    WalletService::new(store, &EngineConfig::default())
}

/// Step of a transition at which [`FaultyStore`] injects a backend error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FailPoint {
    WriteBalance,
    AppendEntry,
    Commit,
}

fn injected(point: FailPoint) -> StoreError {
    StoreError::Backend(Box::new(Error::other(format!("injected failure at {point:?}"))))
}

/// In-memory store whose transitions fail at a chosen step.
#[derive(Clone)]
pub struct FaultyStore {
    pub inner: InMemoryWalletStore,
    fail_at: FailPoint,
}

impl FaultyStore {
    pub fn new(fail_at: FailPoint) -> Self {
        Self {
            inner: InMemoryWalletStore::new(),
            fail_at,
        }
    }
}

#[async_trait]
impl WalletStore for FaultyStore {
    async fn insert_wallet(&self, wallet: Wallet) -> StoreResult<()> {
        self.inner.insert_wallet(wallet).await
    }

    async fn wallet(&self, id: WalletId) -> StoreResult<Option<Wallet>> {
        self.inner.wallet(id).await
    }

    async fn wallet_by_owner(&self, owner: &str) -> StoreResult<Option<Wallet>> {
        self.inner.wallet_by_owner(owner).await
    }

    async fn set_currency(&self, id: WalletId, currency: Currency) -> StoreResult<Option<Wallet>> {
        self.inner.set_currency(id, currency).await
    }

    async fn delete_wallet(&self, id: WalletId) -> StoreResult<bool> {
        self.inner.delete_wallet(id).await
    }

    async fn entries(
        &self,
        id: WalletId,
        limit: usize,
        offset: usize,
    ) -> StoreResult<Vec<LedgerEntry>> {
        self.inner.entries(id, limit, offset).await
    }

    async fn begin_transition(&self, id: WalletId) -> StoreResult<Option<Box<dyn TransitionUnit>>> {
        let fail_at = self.fail_at;
        Ok(self.inner.begin_transition(id).await?.map(|inner| {
            Box::new(FaultyTransition { inner, fail_at }) as Box<dyn TransitionUnit>
        }))
    }
}

struct FaultyTransition {
    inner: Box<dyn TransitionUnit>,
    fail_at: FailPoint,
}

#[async_trait]
impl TransitionUnit for FaultyTransition {
    fn wallet(&self) -> &Wallet {
        self.inner.wallet()
    }

    async fn write_balance(&mut self, wallet: &Wallet) -> StoreResult<()> {
        self.inner.write_balance(wallet).await?;
        if self.fail_at == FailPoint::WriteBalance {
            return Err(injected(self.fail_at));
        }
        Ok(())
    }

    async fn append_entry(&mut self, entry: &LedgerEntry) -> StoreResult<()> {
        if self.fail_at == FailPoint::AppendEntry {
            return Err(injected(self.fail_at));
        }
        self.inner.append_entry(entry).await
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        if self.fail_at == FailPoint::Commit {
            return Err(injected(self.fail_at));
        }
        self.inner.commit().await
    }
}

/// In-memory store whose owner lookups always miss, as if every create had
/// raced another one past the lookup. Only the insert constraint is left to
/// reject duplicates.
#[derive(Clone, Default)]
pub struct BlindOwnerStore {
    pub inner: InMemoryWalletStore,
}

#[async_trait]
impl WalletStore for BlindOwnerStore {
    async fn insert_wallet(&self, wallet: Wallet) -> StoreResult<()> {
        self.inner.insert_wallet(wallet).await
    }

    async fn wallet(&self, id: WalletId) -> StoreResult<Option<Wallet>> {
        self.inner.wallet(id).await
    }

    async fn wallet_by_owner(&self, _owner: &str) -> StoreResult<Option<Wallet>> {
        Ok(None)
    }

    async fn set_currency(&self, id: WalletId, currency: Currency) -> StoreResult<Option<Wallet>> {
        self.inner.set_currency(id, currency).await
    }

    async fn delete_wallet(&self, id: WalletId) -> StoreResult<bool> {
        self.inner.delete_wallet(id).await
    }

    async fn entries(
        &self,
        id: WalletId,
        limit: usize,
        offset: usize,
    ) -> StoreResult<Vec<LedgerEntry>> {
        self.inner.entries(id, limit, offset).await
    }

    async fn begin_transition(&self, id: WalletId) -> StoreResult<Option<Box<dyn TransitionUnit>>> {
        self.inner.begin_transition(id).await
    }
}

/// Writes a batch file that creates `owners` wallets and credits each of
/// them `credits` times with `1.0`.
pub fn generate_csv(path: &Path, owners: usize, credits: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["op", "owner", "amount", "currency", "description", "reference"])?;

    for owner in 1..=owners {
        let owner = format!("owner-{owner}");
        wtr.write_record(["create", &owner, "", "", "", ""])?;
        for i in 1..=credits {
            wtr.write_record(["credit", &owner, "1.0", "", "top-up", &format!("ref-{i}")])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
