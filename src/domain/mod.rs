//! Domain layer: wallets, ledger entries and the storage port they are
//! persisted through.

pub mod ledger;
pub mod ports;
pub mod wallet;
