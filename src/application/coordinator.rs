use crate::domain::ledger::{LedgerEntry, Transition};
use crate::domain::ports::WalletStoreRef;
use crate::domain::wallet::{Amount, Balance, WalletId};
use crate::error::{Result, WalletError};
use rust_decimal::Decimal;
use tracing::{error, info, warn};

/// Applies credits and debits to wallets.
///
/// Every transition runs inside one [`TransitionUnit`](crate::domain::ports::TransitionUnit):
/// the wallet's exclusive lock is taken, the balance is re-read from the
/// store, validated, and the new balance and ledger entry are committed
/// together. Any error before the commit drops the unit, which discards both
/// writes and releases the lock. Concurrent transitions on the same wallet
/// queue on the lock instead of failing.
#[derive(Clone)]
pub struct BalanceCoordinator {
    store: WalletStoreRef,
}

impl BalanceCoordinator {
    pub fn new(store: WalletStoreRef) -> Self {
        Self { store }
    }

    pub async fn credit(
        &self,
        wallet_id: WalletId,
        amount: Decimal,
        description: impl Into<String>,
        reference: impl Into<String>,
    ) -> Result<LedgerEntry> {
        let transition = Transition::credit(Amount::new(amount)?, description, reference);
        self.apply_transition(wallet_id, transition).await
    }

    pub async fn debit(
        &self,
        wallet_id: WalletId,
        amount: Decimal,
        description: impl Into<String>,
        reference: impl Into<String>,
    ) -> Result<LedgerEntry> {
        let transition = Transition::debit(Amount::new(amount)?, description, reference);
        self.apply_transition(wallet_id, transition).await
    }

    /// Applies `transition` to the wallet and returns the committed ledger entry.
    ///
    /// # Errors
    ///
    /// * `WalletError::WalletNotFound` - no wallet with this id once the lock is held
    /// * `WalletError::InsufficientBalance` - debit larger than the current balance
    /// * `WalletError::StorageFailure` - the store failed or the lock wait timed out
    /// * `WalletError::InvariantViolation` - a negative balance was observed
    pub async fn apply_transition(
        &self,
        wallet_id: WalletId,
        transition: Transition,
    ) -> Result<LedgerEntry> {
        let mut unit = self
            .store
            .begin_transition(wallet_id)
            .await?
            .ok_or_else(|| WalletError::WalletNotFound(wallet_id.to_string()))?;

        let mut wallet = unit.wallet().clone();
        check_non_negative(wallet.balance, wallet_id, "stored")?;

        if let Err(e) = wallet.apply(transition.direction, transition.amount) {
            if let WalletError::InsufficientBalance {
                available,
                requested,
            } = &e
            {
                warn!(%wallet_id, %available, %requested, "Debit rejected: insufficient balance");
            }
            return Err(e);
        }
        check_non_negative(wallet.balance, wallet_id, "computed")?;

        let entry = LedgerEntry::record(&wallet, transition);
        unit.write_balance(&wallet).await?;
        unit.append_entry(&entry).await?;
        unit.commit().await?;

        info!(
            %wallet_id,
            direction = %entry.direction,
            amount = %entry.amount.value(),
            balance = %entry.balance_after,
            sequence = entry.sequence,
            "Transition committed"
        );
        Ok(entry)
    }
}

fn check_non_negative(balance: Balance, wallet_id: WalletId, stage: &str) -> Result<()> {
    if balance.is_negative() {
        error!(%wallet_id, %balance, stage, "Negative balance observed");
        return Err(WalletError::InvariantViolation(format!(
            "{stage} balance of wallet {wallet_id} is negative: {balance}"
        )));
    }
    Ok(())
}
