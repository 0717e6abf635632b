use super::coordinator::BalanceCoordinator;
use super::ledger_query::LedgerQuery;
use super::lifecycle::WalletLifecycle;
use crate::config::EngineConfig;
use crate::domain::ledger::LedgerEntry;
use crate::domain::ports::WalletStoreRef;
use crate::domain::wallet::{Wallet, WalletId};
use crate::error::Result;
use rust_decimal::Decimal;

/// The main entry point of the wallet engine.
///
/// `WalletService` wires the lifecycle manager, the transition coordinator
/// and the ledger query facade to one shared store handle. It is cheap to
/// clone and safe to share between tasks.
#[derive(Clone)]
pub struct WalletService {
    lifecycle: WalletLifecycle,
    coordinator: BalanceCoordinator,
    ledger: LedgerQuery,
}

impl WalletService {
    /// Creates a new `WalletService` instance.
    ///
    /// # Arguments
    ///
    /// * `store` - The store holding wallets and their ledgers.
    /// * `config` - Engine settings; only the default currency is used here,
    ///   the lock timeout belongs to the store.
    pub fn new(store: WalletStoreRef, config: &EngineConfig) -> Self {
        Self {
            lifecycle: WalletLifecycle::new(store.clone(), config.default_currency.clone()),
            coordinator: BalanceCoordinator::new(store.clone()),
            ledger: LedgerQuery::new(store),
        }
    }

    pub async fn create_wallet(&self, owner: &str, currency: Option<&str>) -> Result<Wallet> {
        self.lifecycle.create_wallet(owner, currency).await
    }

    pub async fn get_wallet(&self, id: WalletId) -> Result<Wallet> {
        self.lifecycle.get_wallet(id).await
    }

    pub async fn get_wallet_by_owner(&self, owner: &str) -> Result<Wallet> {
        self.lifecycle.get_wallet_by_owner(owner).await
    }

    pub async fn update_wallet(&self, id: WalletId, currency: Option<&str>) -> Result<Wallet> {
        self.lifecycle.update_wallet(id, currency).await
    }

    pub async fn delete_wallet(&self, id: WalletId) -> Result<()> {
        self.lifecycle.delete_wallet(id).await
    }

    pub async fn credit(
        &self,
        id: WalletId,
        amount: Decimal,
        description: &str,
        reference: &str,
    ) -> Result<LedgerEntry> {
        self.coordinator
            .credit(id, amount, description, reference)
            .await
    }

    pub async fn debit(
        &self,
        id: WalletId,
        amount: Decimal,
        description: &str,
        reference: &str,
    ) -> Result<LedgerEntry> {
        self.coordinator
            .debit(id, amount, description, reference)
            .await
    }

    pub async fn list_transactions(
        &self,
        id: WalletId,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<LedgerEntry>> {
        self.ledger.list_transactions(id, page, page_size).await
    }
}
