use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use wallet_engine::application::WalletService;
use wallet_engine::config::EngineConfig;
use wallet_engine::domain::ports::WalletStoreRef;
use wallet_engine::domain::wallet::Currency;
use wallet_engine::infrastructure::in_memory::InMemoryWalletStore;
use wallet_engine::interfaces::batch::BatchRunner;
use wallet_engine::interfaces::csv::command_reader::CommandReader;
use wallet_engine::interfaces::csv::wallet_writer::WalletWriter;
use wallet_engine::logging;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input commands CSV file
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "WALLET_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Currency for wallets created or updated without one
    #[arg(long, env = "WALLET_DEFAULT_CURRENCY", default_value = Currency::DEFAULT_CODE)]
    default_currency: String,

    /// How long a transition waits for a wallet lock, in milliseconds
    #[arg(long, env = "WALLET_LOCK_TIMEOUT_MS", default_value_t = 5000)]
    lock_timeout_ms: u64,

    /// Print the ledger of this owner's wallet instead of the wallet summary
    #[arg(long)]
    history: Option<String>,

    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    page: i64,

    #[arg(long, default_value_t = 20, allow_negative_numbers = true)]
    page_size: i64,
}

fn open_store(db_path: Option<PathBuf>, config: &EngineConfig) -> Result<WalletStoreRef> {
    #[cfg(feature = "storage-rocksdb")]
    {
        if let Some(db_path) = db_path {
            let store = wallet_engine::infrastructure::rocksdb::RocksDBStore::open(
                db_path,
                config.lock_timeout,
            )
            .into_diagnostic()?;
            return Ok(Arc::new(store));
        }
    }

    #[cfg(not(feature = "storage-rocksdb"))]
    {
        if db_path.is_some() {
            warn!(
                "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
            );
        }
    }

    Ok(Arc::new(InMemoryWalletStore::with_lock_timeout(
        config.lock_timeout,
    )))
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let config = EngineConfig::default()
        .with_default_currency(Currency::parse(&cli.default_currency).into_diagnostic()?)
        .with_lock_timeout(Duration::from_millis(cli.lock_timeout_ms));
    let store = open_store(cli.db_path, &config)?;
    let service = WalletService::new(store, &config);
    let mut runner = BatchRunner::new(service.clone());

    // Process commands
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    for command in reader.commands() {
        match command {
            Ok(command) => {
                if let Err(e) = runner.apply(command).await {
                    warn!(error = %e, retryable = e.is_retryable(), "Error processing command");
                }
            }
            Err(e) => {
                warn!(error = %e, "Error reading command");
            }
        }
    }

    let stdout = io::stdout();
    let mut writer = WalletWriter::new(stdout.lock());

    if let Some(owner) = cli.history {
        let wallet = service.get_wallet_by_owner(&owner).await.into_diagnostic()?;
        let entries = service
            .list_transactions(wallet.id, cli.page, cli.page_size)
            .await
            .into_diagnostic()?;
        writer.write_entries(&entries).into_diagnostic()?;
    } else {
        let wallets = runner.wallets().await.into_diagnostic()?;
        writer.write_wallets(&wallets).into_diagnostic()?;
    }

    Ok(())
}
