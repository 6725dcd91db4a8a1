//! Wallet identities: which contract a mnemonic controls and how to show it.

pub mod format;
pub mod resolver;
pub mod version;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

pub use format::{format_ton_value, to_short_address};
pub use resolver::{AddressDeriver, WalletResolver};
pub use version::WalletVersion;

/// A wallet as stored by the extension.
///
/// `mnemonic` always holds a vault envelope, never the phrase itself.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalletState {
    pub name: String,
    pub mnemonic: String,
    pub address: String,
    pub public_key: String,
    pub version: WalletVersion,
    pub is_bounceable: bool,
}

impl WalletState {
    pub fn default_name(index: usize) -> String {
        format!("Account {}", index)
    }

    pub fn public_key_bytes(&self) -> Result<[u8; 32]> {
        let bytes = hex::decode(&self.public_key)
            .map_err(|e| CoreError::InvalidState(format!("Invalid public key hex: {}", e)))?;
        bytes
            .try_into()
            .map_err(|_| CoreError::InvalidState("Public key must be 32 bytes".to_string()))
    }

    pub fn rename(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::InvalidState("Wallet name cannot be empty".to_string()));
        }
        self.name = name.to_string();
        Ok(())
    }

    pub fn set_bounceable(&mut self, bounceable: bool) {
        self.is_bounceable = bounceable;
    }
}
