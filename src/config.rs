use crate::domain::wallet::Currency;
use std::time::Duration;

/// How long a transition waits for a wallet lock before giving up.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Runtime settings shared by the application services and storage adapters.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Currency given to wallets created or updated without one.
    pub default_currency: Currency,
    /// Upper bound on waiting for a wallet's exclusive lock.
    pub lock_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_currency: Currency::default(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }
}

impl EngineConfig {
    pub fn with_default_currency(mut self, currency: Currency) -> Self {
        self.default_currency = currency;
        self
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }
}
