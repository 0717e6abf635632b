use super::csv::command_reader::{Command, CommandType};
use crate::application::WalletService;
use crate::domain::wallet::Wallet;
use crate::error::{Result, WalletError};
use std::collections::BTreeSet;

/// Replays batch commands against a [`WalletService`], one at a time.
///
/// Remembers every owner it has seen so the final state of those wallets can
/// be reported afterwards.
pub struct BatchRunner {
    service: WalletService,
    owners: BTreeSet<String>,
}

impl BatchRunner {
    pub fn new(service: WalletService) -> Self {
        Self {
            service,
            owners: BTreeSet::new(),
        }
    }

    pub async fn apply(&mut self, command: Command) -> Result<()> {
        self.owners.insert(command.owner.clone());
        let description = command.description.as_deref().unwrap_or_default();
        let reference = command.reference.as_deref().unwrap_or_default();

        match command.op {
            CommandType::Create => {
                self.service
                    .create_wallet(&command.owner, command.currency.as_deref())
                    .await?;
            }
            CommandType::Credit => {
                let amount = command.required_amount()?;
                let wallet = self.service.get_wallet_by_owner(&command.owner).await?;
                self.service
                    .credit(wallet.id, amount, description, reference)
                    .await?;
            }
            CommandType::Debit => {
                let amount = command.required_amount()?;
                let wallet = self.service.get_wallet_by_owner(&command.owner).await?;
                self.service
                    .debit(wallet.id, amount, description, reference)
                    .await?;
            }
            CommandType::Update => {
                let wallet = self.service.get_wallet_by_owner(&command.owner).await?;
                self.service
                    .update_wallet(wallet.id, command.currency.as_deref())
                    .await?;
            }
            CommandType::Delete => {
                let wallet = self.service.get_wallet_by_owner(&command.owner).await?;
                self.service.delete_wallet(wallet.id).await?;
            }
        }
        Ok(())
    }

    /// Current state of every wallet the batch touched that still exists,
    /// ordered by owner key.
    pub async fn wallets(&self) -> Result<Vec<Wallet>> {
        let mut wallets = Vec::with_capacity(self.owners.len());
        for owner in &self.owners {
            match self.service.get_wallet_by_owner(owner).await {
                Ok(wallet) => wallets.push(wallet),
                Err(WalletError::WalletNotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(wallets)
    }
}
