use crate::domain::ports::StoreError;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Wallet not found: {0}")]
    WalletNotFound(String),
    #[error("Wallet already exists for owner {0}")]
    DuplicateWallet(String),
    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance {
        available: Decimal,
        requested: Decimal,
    },
    #[error("Storage failure: {0}")]
    StorageFailure(#[from] StoreError),
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl WalletError {
    /// Whether retrying the whole operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WalletError::StorageFailure(_))
    }
}

pub type Result<T> = std::result::Result<T, WalletError>;
