//! JSON file persistence for the account state

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::types::AccountState;
use crate::error::Result;
use crate::vault::{self, VaultScheme};

/// Account state file. Only vault envelopes reach the disk.
pub struct AccountStore {
    path: PathBuf,
}

impl AccountStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load from file, or an empty state if nothing was saved yet.
    pub fn load(&self) -> Result<AccountState> {
        if !self.path.exists() {
            debug!("No account file at {}", self.path.display());
            return Ok(AccountState::new());
        }
        let data = fs::read_to_string(&self.path)?;
        let state: AccountState = serde_json::from_str(&data)?;

        for wallet in &state.wallets {
            if vault::scheme_of(&wallet.mnemonic) == VaultScheme::Legacy {
                warn!("Wallet {} still uses the legacy vault envelope", wallet.name);
            }
        }
        Ok(state)
    }

    pub fn save(&self, state: &AccountState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::{WalletState, WalletVersion};

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = AccountStore::new(dir.path().join("nested").join("account.json"));
        assert!(store.load().unwrap().is_empty());

        let mut state = AccountState::new();
        state
            .add_wallet(WalletState {
                name: "Account 1".to_string(),
                mnemonic: vault::encrypt("phrase", "pw").unwrap(),
                address: "EQ1".to_string(),
                public_key: "ab".repeat(32),
                version: WalletVersion::V3R2,
                is_bounceable: false,
            })
            .unwrap();
        store.save(&state).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, state);
        let raw = fs::read_to_string(dir.path().join("nested").join("account.json")).unwrap();
        assert!(!raw.contains("phrase"));
    }
}
