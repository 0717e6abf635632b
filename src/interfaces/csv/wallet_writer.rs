use crate::domain::ledger::{Direction, LedgerEntry};
use crate::domain::wallet::Wallet;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct WalletRow<'a> {
    owner: &'a str,
    balance: Decimal,
    currency: &'a str,
    entries: u64,
}

#[derive(Serialize)]
struct EntryRow<'a> {
    sequence: u64,
    direction: Direction,
    amount: Decimal,
    balance_after: Decimal,
    description: &'a str,
    reference: &'a str,
}

/// Writes wallet summaries and ledger pages as CSV.
///
/// Decimals are normalized, so `100.50` is written as `100.5`.
pub struct WalletWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> WalletWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            // Headers are written explicitly so empty outputs still carry them.
            writer: csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(sink),
        }
    }

    pub fn write_wallets<'a>(&mut self, wallets: impl IntoIterator<Item = &'a Wallet>) -> Result<()> {
        self.writer
            .write_record(["owner", "balance", "currency", "entries"])?;
        for wallet in wallets {
            self.writer.serialize(WalletRow {
                owner: &wallet.owner,
                balance: wallet.balance.value().normalize(),
                currency: wallet.currency.as_str(),
                entries: wallet.last_sequence,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_entries<'a>(
        &mut self,
        entries: impl IntoIterator<Item = &'a LedgerEntry>,
    ) -> Result<()> {
        self.writer.write_record([
            "sequence",
            "direction",
            "amount",
            "balance_after",
            "description",
            "reference",
        ])?;
        for entry in entries {
            self.writer.serialize(EntryRow {
                sequence: entry.sequence,
                direction: entry.direction,
                amount: entry.amount.value().normalize(),
                balance_after: entry.balance_after.value().normalize(),
                description: &entry.description,
                reference: &entry.reference,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
