use super::locks::{WalletGuard, WalletLocks};
use crate::domain::ledger::LedgerEntry;
use crate::domain::ports::{StoreError, StoreResult, TransitionUnit, WalletStore};
use crate::domain::wallet::{Currency, Wallet, WalletId};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Direction, IteratorMode, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Column Family for wallet rows, keyed by wallet id.
pub const CF_WALLETS: &str = "wallets";
/// Column Family for the unique owner index (owner key -> wallet id).
pub const CF_OWNERS: &str = "owners";
/// Column Family for ledger entries, keyed by wallet id + big-endian sequence.
pub const CF_LEDGER: &str = "ledger";

impl From<rocksdb::Error> for StoreError {
    fn from(e: rocksdb::Error) -> Self {
        StoreError::Backend(Box::new(e))
    }
}

/// A persistent store implementation using RocksDB.
///
/// Wallet rows, the owner index and ledger entries live in separate Column
/// Families. A transition stages its writes in a `WriteBatch`, which RocksDB
/// applies atomically on commit.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    locks: WalletLocks,
    /// Serializes check-then-write on the owner index.
    owner_index: Arc<Mutex<()>>,
}

fn ledger_key(id: WalletId, sequence: u64) -> [u8; 24] {
    let mut key = [0u8; 24];
    key[..16].copy_from_slice(id.as_bytes());
    key[16..].copy_from_slice(&sequence.to_be_bytes());
    key
}

fn encode<T: Serialize>(value: &T) -> StoreResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| StoreError::Corrupted(format!("Serialization error: {e}")))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> StoreResult<T> {
    serde_json::from_slice(bytes)
        .map_err(|e| StoreError::Corrupted(format!("Deserialization error: {e}")))
}

fn cf<'a>(db: &'a DB, name: &str) -> StoreResult<&'a ColumnFamily> {
    db.cf_handle(name)
        .ok_or_else(|| StoreError::Corrupted(format!("{name} column family not found")))
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P, lock_timeout: Duration) -> StoreResult<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [CF_WALLETS, CF_OWNERS, CF_LEDGER]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()));

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            locks: WalletLocks::new(lock_timeout),
            owner_index: Arc::new(Mutex::new(())),
        })
    }

    fn read_wallet(&self, id: WalletId) -> StoreResult<Option<Wallet>> {
        let wallets = cf(&self.db, CF_WALLETS)?;
        match self.db.get_cf(&wallets, id.as_bytes())? {
            Some(bytes) => decode(&bytes).map(Some),
            None => Ok(None),
        }
    }

    fn put_wallet(&self, batch: &mut WriteBatch, wallet: &Wallet) -> StoreResult<()> {
        let wallets = cf(&self.db, CF_WALLETS)?;
        batch.put_cf(&wallets, wallet.id.as_bytes(), encode(wallet)?);
        Ok(())
    }
}

#[async_trait]
impl WalletStore for RocksDBStore {
    async fn insert_wallet(&self, wallet: Wallet) -> StoreResult<()> {
        let _index = self.owner_index.lock().await;
        let owners = cf(&self.db, CF_OWNERS)?;
        if self.db.get_pinned_cf(&owners, wallet.owner.as_bytes())?.is_some() {
            return Err(StoreError::OwnerConflict(wallet.owner));
        }

        let mut batch = WriteBatch::default();
        batch.put_cf(&owners, wallet.owner.as_bytes(), wallet.id.as_bytes());
        self.put_wallet(&mut batch, &wallet)?;
        self.db.write(batch)?;
        Ok(())
    }

    async fn wallet(&self, id: WalletId) -> StoreResult<Option<Wallet>> {
        self.read_wallet(id)
    }

    async fn wallet_by_owner(&self, owner: &str) -> StoreResult<Option<Wallet>> {
        let owners = cf(&self.db, CF_OWNERS)?;
        let Some(bytes) = self.db.get_cf(&owners, owner.as_bytes())? else {
            return Ok(None);
        };
        let id = Uuid::from_slice(&bytes)
            .map_err(|e| StoreError::Corrupted(format!("Invalid wallet id for owner {owner}: {e}")))?;
        self.read_wallet(id.into())
    }

    async fn set_currency(&self, id: WalletId, currency: Currency) -> StoreResult<Option<Wallet>> {
        let guard = self.locks.acquire(id).await?;
        let Some(mut wallet) = self.read_wallet(id)? else {
            self.locks.release(id, guard);
            return Ok(None);
        };
        wallet.set_currency(currency);

        let mut batch = WriteBatch::default();
        self.put_wallet(&mut batch, &wallet)?;
        self.db.write(batch)?;
        Ok(Some(wallet))
    }

    async fn delete_wallet(&self, id: WalletId) -> StoreResult<bool> {
        let guard = self.locks.acquire(id).await?;
        let _index = self.owner_index.lock().await;
        let Some(wallet) = self.read_wallet(id)? else {
            self.locks.release(id, guard);
            return Ok(false);
        };

        let wallets = cf(&self.db, CF_WALLETS)?;
        let owners = cf(&self.db, CF_OWNERS)?;
        let ledger = cf(&self.db, CF_LEDGER)?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&wallets, id.as_bytes());
        batch.delete_cf(&owners, wallet.owner.as_bytes());
        batch.delete_range_cf(&ledger, ledger_key(id, 0), ledger_key(id, u64::MAX));
        self.db.write(batch)?;

        self.locks.release(id, guard);
        Ok(true)
    }

    async fn entries(
        &self,
        id: WalletId,
        limit: usize,
        offset: usize,
    ) -> StoreResult<Vec<LedgerEntry>> {
        let ledger = cf(&self.db, CF_LEDGER)?;
        let start = ledger_key(id, u64::MAX);
        let iter = self
            .db
            .iterator_cf(&ledger, IteratorMode::From(&start, Direction::Reverse));

        let mut entries = Vec::new();
        for (position, item) in iter.enumerate() {
            let (key, value) = item?;
            if !key.starts_with(id.as_bytes()) || entries.len() >= limit {
                break;
            }
            if position >= offset {
                entries.push(decode(&value)?);
            }
        }
        Ok(entries)
    }

    async fn begin_transition(&self, id: WalletId) -> StoreResult<Option<Box<dyn TransitionUnit>>> {
        let guard = self.locks.acquire(id).await?;
        let Some(wallet) = self.read_wallet(id)? else {
            self.locks.release(id, guard);
            return Ok(None);
        };
        Ok(Some(Box::new(RocksDBTransition {
            store: self.clone(),
            wallet,
            batch: WriteBatch::default(),
            _guard: guard,
        }) as Box<dyn TransitionUnit>))
    }
}

struct RocksDBTransition {
    store: RocksDBStore,
    wallet: Wallet,
    batch: WriteBatch,
    _guard: WalletGuard,
}

#[async_trait]
impl TransitionUnit for RocksDBTransition {
    fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    async fn write_balance(&mut self, wallet: &Wallet) -> StoreResult<()> {
        self.store.put_wallet(&mut self.batch, wallet)
    }

    async fn append_entry(&mut self, entry: &LedgerEntry) -> StoreResult<()> {
        let ledger = cf(&self.store.db, CF_LEDGER)?;
        self.batch.put_cf(
            &ledger,
            ledger_key(entry.wallet_id, entry.sequence),
            encode(entry)?,
        );
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let this = *self;
        this.store.db.write(this.batch)?;
        Ok(())
    }
}
