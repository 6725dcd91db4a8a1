//! Account state: the wallets known to this extension install

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::wallet::WalletState;

/// All wallets plus the one currently shown in the UI.
///
/// The first wallet is the primary wallet; its secret is the one checked
/// when the session is unlocked.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountState {
    pub wallets: Vec<WalletState>,
    #[serde(default)]
    pub active_wallet: Option<String>,
}

impl AccountState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    /// Index for the next "Account {index}" name.
    pub fn next_index(&self) -> usize {
        self.wallets.len() + 1
    }

    pub fn primary(&self) -> Result<&WalletState> {
        self.wallets
            .first()
            .ok_or_else(|| CoreError::InvalidState("No wallet in account".to_string()))
    }

    /// Add a wallet and make it active. Addresses are unique.
    pub fn add_wallet(&mut self, wallet: WalletState) -> Result<()> {
        if self.wallets.iter().any(|w| w.address == wallet.address) {
            return Err(CoreError::InvalidState(format!(
                "Wallet {} already exists",
                wallet.address
            )));
        }
        self.active_wallet = Some(wallet.address.clone());
        self.wallets.push(wallet);
        Ok(())
    }

    pub fn active(&self) -> Option<&WalletState> {
        let address = self.active_wallet.as_ref()?;
        self.wallets.iter().find(|w| &w.address == address)
    }

    pub fn select(&mut self, address: &str) -> Result<()> {
        if !self.wallets.iter().any(|w| w.address == address) {
            return Err(CoreError::InvalidState(format!("Unknown wallet {}", address)));
        }
        self.active_wallet = Some(address.to_string());
        Ok(())
    }

    /// Apply `f` to the active wallet and keep `active_wallet` pointing at it
    /// even if `f` changes its address (version migration).
    pub fn update_active<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut WalletState) -> Result<()>,
    {
        let address = self
            .active_wallet
            .clone()
            .ok_or_else(|| CoreError::InvalidState("No active wallet".to_string()))?;
        let wallet = self
            .wallets
            .iter_mut()
            .find(|w| w.address == address)
            .ok_or_else(|| CoreError::InvalidState(format!("Unknown wallet {}", address)))?;

        f(wallet)?;
        self.active_wallet = Some(wallet.address.clone());
        Ok(())
    }

    /// Delete the active wallet. The first remaining wallet becomes active.
    pub fn remove_active(&mut self) -> Result<WalletState> {
        let address = self
            .active_wallet
            .take()
            .ok_or_else(|| CoreError::InvalidState("No active wallet".to_string()))?;
        let pos = self
            .wallets
            .iter()
            .position(|w| w.address == address)
            .ok_or_else(|| CoreError::InvalidState(format!("Unknown wallet {}", address)))?;

        let removed = self.wallets.remove(pos);
        self.active_wallet = self.wallets.first().map(|w| w.address.clone());
        Ok(removed)
    }
}
