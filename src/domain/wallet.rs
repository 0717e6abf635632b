use crate::domain::ledger::Direction;
use crate::error::{Result, WalletError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use uuid::Uuid;

/// Opaque, immutable identity of a wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletId(Uuid);

impl WalletId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl From<Uuid> for WalletId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Represents a monetary balance held by a wallet.
///
/// This is a wrapper around `rust_decimal::Decimal` so that balances and
/// transaction amounts cannot be mixed up by accident.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance(pub Decimal);

/// Represents a strictly positive monetary amount for a credit or debit.
///
/// Deserialization goes through [`Amount::new`], so a stored non-positive
/// amount is rejected on read.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(WalletError::ValidationError(format!(
                "Amount must be positive, got {value}"
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = WalletError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    fn checked_add(self, rhs: Amount) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }
}

impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// ISO-4217 style currency code: three ASCII letters, stored upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    pub const DEFAULT_CODE: &'static str = "USD";

    pub fn parse(code: &str) -> Result<Self> {
        let code = code.trim();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code.to_ascii_uppercase()))
        } else {
            Err(WalletError::ValidationError(format!(
                "Invalid currency code: {code:?}"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Currency {
    type Error = WalletError;

    fn try_from(code: String) -> Result<Self> {
        Self::parse(&code)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self(Self::DEFAULT_CODE.to_string())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A per-owner balance record.
///
/// The balance is only ever changed through [`Wallet::apply`], which the
/// transition coordinator calls while it holds the wallet's exclusive lock.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Wallet {
    pub id: WalletId,
    /// Owner key; at most one wallet exists per owner.
    pub owner: String,
    pub balance: Balance,
    pub currency: Currency,
    /// Sequence number of the last ledger entry committed for this wallet.
    pub last_sequence: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Opens an empty wallet for `owner`, stamping both timestamps now.
    pub fn open(owner: impl Into<String>, currency: Currency) -> Self {
        let now = Utc::now();
        Self {
            id: WalletId::generate(),
            owner: owner.into(),
            balance: Balance::ZERO,
            currency,
            last_sequence: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_currency(&mut self, currency: Currency) {
        self.currency = currency;
        self.updated_at = Utc::now();
    }

    /// Adds `amount` to the balance. No upper bound beyond decimal range.
    pub fn credit(&mut self, amount: Amount) -> Result<()> {
        self.balance = self.balance.checked_add(amount).ok_or_else(|| {
            WalletError::ValidationError(format!(
                "Credit of {} overflows balance {}",
                amount.value(),
                self.balance
            ))
        })?;
        Ok(())
    }

    /// Subtracts `amount` from the balance if it is covered.
    pub fn debit(&mut self, amount: Amount) -> Result<()> {
        if amount.value() > self.balance.value() {
            return Err(WalletError::InsufficientBalance {
                available: self.balance.value(),
                requested: amount.value(),
            });
        }
        self.balance = self.balance - Balance::from(amount);
        Ok(())
    }

    /// Applies one credit or debit and advances the ledger sequence.
    ///
    /// On error the wallet is left untouched.
    pub fn apply(&mut self, direction: Direction, amount: Amount) -> Result<u64> {
        match direction {
            Direction::Credit => self.credit(amount)?,
            Direction::Debit => self.debit(amount)?,
        }
        self.last_sequence += 1;
        self.updated_at = Utc::now();
        Ok(self.last_sequence)
    }
}
