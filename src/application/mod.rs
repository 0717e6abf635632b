//! Application layer containing the wallet engine's use cases.
//!
//! `BalanceCoordinator` owns every balance change, `WalletLifecycle` owns
//! wallet metadata and `LedgerQuery` serves ledger pages. `WalletService`
//! bundles the three behind one handle.

pub mod coordinator;
pub mod ledger_query;
pub mod lifecycle;
pub mod service;

pub use coordinator::BalanceCoordinator;
pub use ledger_query::{LedgerQuery, Page};
pub use lifecycle::WalletLifecycle;
pub use service::WalletService;
