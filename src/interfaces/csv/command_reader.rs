use crate::error::{Result, WalletError};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Create,
    Credit,
    Debit,
    Update,
    Delete,
}

/// One row of a batch file. Wallets are addressed by owner key.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Command {
    pub op: CommandType,
    pub owner: String,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub reference: Option<String>,
}

impl Command {
    /// The amount of a credit or debit row.
    pub fn required_amount(&self) -> Result<Decimal> {
        self.amount.ok_or_else(|| {
            WalletError::ValidationError(format!("{:?} for {} is missing an amount", self.op, self.owner))
        })
    }
}

/// Reads batch commands from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<Command>`.
/// It trims whitespace and accepts rows that omit trailing optional columns.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    /// Creates a new `CommandReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes commands, so
    /// large batches are streamed rather than loaded whole.
    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(WalletError::from))
    }
}
