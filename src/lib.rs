//! Atomic balance-transition engine for per-owner wallets.
//!
//! Credits and debits are applied under a per-wallet exclusive lock, and the
//! new balance and its ledger entry are committed as one unit through the
//! [`WalletStore`](domain::ports::WalletStore) port.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
pub mod logging;
