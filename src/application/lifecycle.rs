use crate::domain::ports::{StoreError, WalletStoreRef};
use crate::domain::wallet::{Currency, Wallet, WalletId};
use crate::error::{Result, WalletError};
use tracing::{info, warn};

/// Creates, reads, updates and deletes wallets. Never touches balances.
#[derive(Clone)]
pub struct WalletLifecycle {
    store: WalletStoreRef,
    default_currency: Currency,
}

impl WalletLifecycle {
    pub fn new(store: WalletStoreRef, default_currency: Currency) -> Self {
        Self {
            store,
            default_currency,
        }
    }

    /// Opens a zero-balance wallet for `owner`.
    ///
    /// The owner lookup up front only short-cuts the common case; the store's
    /// unique owner index decides races, and its conflict is reported as the
    /// same `DuplicateWallet` error.
    pub async fn create_wallet(&self, owner: &str, currency: Option<&str>) -> Result<Wallet> {
        let owner = validate_owner(owner)?;
        let currency = self.resolve_currency(currency)?;

        if self.store.wallet_by_owner(owner).await?.is_some() {
            warn!(owner, "Wallet already exists for owner");
            return Err(WalletError::DuplicateWallet(owner.to_string()));
        }

        let wallet = Wallet::open(owner, currency);
        match self.store.insert_wallet(wallet.clone()).await {
            Ok(()) => {
                info!(wallet_id = %wallet.id, owner, currency = %wallet.currency, "Wallet created");
                Ok(wallet)
            }
            Err(StoreError::OwnerConflict(owner)) => {
                warn!(%owner, "Concurrent wallet creation lost the owner race");
                Err(WalletError::DuplicateWallet(owner))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_wallet(&self, id: WalletId) -> Result<Wallet> {
        self.store
            .wallet(id)
            .await?
            .ok_or_else(|| WalletError::WalletNotFound(id.to_string()))
    }

    /// Looks the owner key up the same way `create_wallet` stores it, trimmed.
    pub async fn get_wallet_by_owner(&self, owner: &str) -> Result<Wallet> {
        let owner = owner.trim();
        self.store
            .wallet_by_owner(owner)
            .await?
            .ok_or_else(|| WalletError::WalletNotFound(format!("owner {owner}")))
    }

    /// Changes the wallet's currency; `None` or blank resets it to the default.
    pub async fn update_wallet(&self, id: WalletId, currency: Option<&str>) -> Result<Wallet> {
        let currency = self.resolve_currency(currency)?;
        let wallet = self
            .store
            .set_currency(id, currency)
            .await?
            .ok_or_else(|| WalletError::WalletNotFound(id.to_string()))?;
        info!(wallet_id = %id, currency = %wallet.currency, "Wallet currency updated");
        Ok(wallet)
    }

    /// Deletes the wallet and, with it, its whole ledger.
    pub async fn delete_wallet(&self, id: WalletId) -> Result<()> {
        if !self.store.delete_wallet(id).await? {
            return Err(WalletError::WalletNotFound(id.to_string()));
        }
        info!(wallet_id = %id, "Wallet deleted");
        Ok(())
    }

    fn resolve_currency(&self, currency: Option<&str>) -> Result<Currency> {
        match currency.map(str::trim) {
            None | Some("") => Ok(self.default_currency.clone()),
            Some(code) => Currency::parse(code),
        }
    }
}

fn validate_owner(owner: &str) -> Result<&str> {
    let owner = owner.trim();
    if owner.is_empty() {
        return Err(WalletError::ValidationError(
            "Owner key must not be empty".to_string(),
        ));
    }
    Ok(owner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::wallet::Balance;
    use crate::infrastructure::in_memory::InMemoryWalletStore;
    use std::sync::Arc;

    fn lifecycle() -> WalletLifecycle {
        WalletLifecycle::new(Arc::new(InMemoryWalletStore::new()), Currency::default())
    }

    #[tokio::test]
    async fn test_create_wallet_defaults() {
        let lifecycle = lifecycle();
        let wallet = lifecycle.create_wallet("u1", None).await.unwrap();
        assert_eq!(wallet.owner, "u1");
        assert_eq!(wallet.balance, Balance::ZERO);
        assert_eq!(wallet.currency.as_str(), "USD");

        let blank = lifecycle.create_wallet("u2", Some("  ")).await.unwrap();
        assert_eq!(blank.currency.as_str(), "USD");
    }

    #[tokio::test]
    async fn test_create_wallet_with_currency() {
        let lifecycle = lifecycle();
        let wallet = lifecycle.create_wallet("u1", Some("eur")).await.unwrap();
        assert_eq!(wallet.currency.as_str(), "EUR");
        assert_eq!(lifecycle.get_wallet(wallet.id).await.unwrap(), wallet);
        assert_eq!(lifecycle.get_wallet_by_owner("u1").await.unwrap(), wallet);
    }

    #[tokio::test]
    async fn test_create_duplicate_owner() {
        let lifecycle = lifecycle();
        lifecycle.create_wallet("u1", None).await.unwrap();
        let result = lifecycle.create_wallet("u1", Some("EUR")).await;
        assert!(matches!(result, Err(WalletError::DuplicateWallet(owner)) if owner == "u1"));
    }

    #[tokio::test]
    async fn test_owner_key_is_trimmed_on_create_and_lookup() {
        let lifecycle = lifecycle();
        let wallet = lifecycle.create_wallet(" u1 ", None).await.unwrap();
        assert_eq!(wallet.owner, "u1");
        assert_eq!(lifecycle.get_wallet_by_owner(" u1 ").await.unwrap().id, wallet.id);
        assert_eq!(lifecycle.get_wallet_by_owner("u1").await.unwrap().id, wallet.id);
        assert!(matches!(
            lifecycle.create_wallet("u1\t", None).await,
            Err(WalletError::DuplicateWallet(owner)) if owner == "u1"
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let lifecycle = lifecycle();
        assert!(matches!(
            lifecycle.create_wallet("   ", None).await,
            Err(WalletError::ValidationError(_))
        ));
        assert!(matches!(
            lifecycle.create_wallet("u1", Some("EURO")).await,
            Err(WalletError::ValidationError(_))
        ));
        assert!(matches!(
            lifecycle.get_wallet_by_owner("u1").await,
            Err(WalletError::WalletNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_wallet_currency() {
        let lifecycle = lifecycle();
        let wallet = lifecycle.create_wallet("u1", Some("EUR")).await.unwrap();

        let updated = lifecycle.update_wallet(wallet.id, Some("GBP")).await.unwrap();
        assert_eq!(updated.currency.as_str(), "GBP");
        assert!(updated.updated_at >= wallet.updated_at);

        let reset = lifecycle.update_wallet(wallet.id, None).await.unwrap();
        assert_eq!(reset.currency.as_str(), "USD");

        assert!(matches!(
            lifecycle.update_wallet(WalletId::generate(), Some("EUR")).await,
            Err(WalletError::WalletNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_wallet() {
        let lifecycle = lifecycle();
        let wallet = lifecycle.create_wallet("u1", None).await.unwrap();

        lifecycle.delete_wallet(wallet.id).await.unwrap();
        assert!(matches!(
            lifecycle.get_wallet(wallet.id).await,
            Err(WalletError::WalletNotFound(_))
        ));
        assert!(matches!(
            lifecycle.delete_wallet(wallet.id).await,
            Err(WalletError::WalletNotFound(_))
        ));
    }
}
