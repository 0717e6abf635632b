use crate::domain::ledger::LedgerEntry;
use crate::domain::ports::WalletStoreRef;
use crate::domain::wallet::WalletId;
use crate::error::Result;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

/// A clamped page request over a wallet's ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: usize,
    size: usize,
}

impl Page {
    /// Non-positive page numbers become 1; sizes outside `1..=100` become 20.
    pub fn new(page: i64, page_size: i64) -> Self {
        let number = usize::try_from(page).ok().filter(|n| *n >= 1).unwrap_or(1);
        let size = usize::try_from(page_size)
            .ok()
            .filter(|s| (1..=MAX_PAGE_SIZE).contains(s))
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Self { number, size }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn offset(&self) -> usize {
        (self.number - 1).saturating_mul(self.size)
    }
}

/// Read-only, paginated access to wallet ledgers.
///
/// Reads do not take the wallet lock, so a page may or may not include a
/// transition that is committing concurrently.
#[derive(Clone)]
pub struct LedgerQuery {
    store: WalletStoreRef,
}

impl LedgerQuery {
    pub fn new(store: WalletStoreRef) -> Self {
        Self { store }
    }

    /// Ledger entries of `wallet_id`, newest first.
    ///
    /// No total count is returned; a page shorter than the page size is the
    /// last one. An unknown wallet yields an empty page.
    pub async fn list_transactions(
        &self,
        wallet_id: WalletId,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<LedgerEntry>> {
        let page = Page::new(page, page_size);
        Ok(self
            .store
            .entries(wallet_id, page.size(), page.offset())
            .await?)
    }
}
