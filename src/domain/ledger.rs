use crate::domain::wallet::{Amount, Balance, Wallet, WalletId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Credit,
    Debit,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Credit => f.write_str("CREDIT"),
            Direction::Debit => f.write_str("DEBIT"),
        }
    }
}

/// A requested balance change, before it has been applied to a wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub direction: Direction,
    pub amount: Amount,
    pub description: String,
    /// Caller-supplied correlation string.
    pub reference: String,
}

impl Transition {
    pub fn credit(amount: Amount, description: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            direction: Direction::Credit,
            amount,
            description: description.into(),
            reference: reference.into(),
        }
    }

    pub fn debit(amount: Amount, description: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            direction: Direction::Debit,
            amount,
            description: description.into(),
            reference: reference.into(),
        }
    }
}

/// An immutable record of one credit or debit applied to a wallet.
///
/// Entries are only created by the transition coordinator and are removed
/// only when their wallet is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub wallet_id: WalletId,
    pub direction: Direction,
    pub amount: Amount,
    /// Wallet balance right after this entry was applied.
    pub balance_after: Balance,
    pub description: String,
    pub reference: String,
    /// Position of this entry in the wallet's ledger, starting at 1.
    pub sequence: u64,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Records `transition` as already applied to `wallet`.
    pub fn record(wallet: &Wallet, transition: Transition) -> Self {
        Self {
            id: EntryId::generate(),
            wallet_id: wallet.id,
            direction: transition.direction,
            amount: transition.amount,
            balance_after: wallet.balance,
            description: transition.description,
            reference: transition.reference,
            sequence: wallet.last_sequence,
            created_at: Utc::now(),
        }
    }
}
