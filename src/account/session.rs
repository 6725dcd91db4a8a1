//! Unlock orchestration against the privileged background process.
//!
//! The background owns the locked/unlocked flag. This side only checks the
//! password locally before asking it to change trust state.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use super::types::AccountState;
use crate::bridge::PageClient;
use crate::crypto::{split_phrase, validate_mnemonic};
use crate::error::{CoreError, Result};
use crate::vault;
use crate::wallet::WalletState;

/// The privileged process as seen from the UI.
#[async_trait]
pub trait Background: Send + Sync {
    /// Fire and forget.
    fn send(&self, method: &str, params: Value) -> Result<()>;

    /// Request and wait for the reply.
    async fn ask(&self, method: &str, params: Value) -> Result<Value>;
}

#[async_trait]
impl Background for PageClient {
    fn send(&self, method: &str, params: Value) -> Result<()> {
        self.notify(method, non_null(params));
        Ok(())
    }

    async fn ask(&self, method: &str, params: Value) -> Result<Value> {
        self.request(method, non_null(params)).await
    }
}

fn non_null(params: Value) -> Option<Value> {
    match params {
        Value::Null => None,
        other => Some(other),
    }
}

/// Decrypt a stored secret and check that it is a well-formed mnemonic.
pub fn decrypt_mnemonic(envelope: &str, password: &str) -> Result<String> {
    let phrase = vault::decrypt(envelope, password)?;
    validate_mnemonic(&split_phrase(&phrase))?;
    Ok(phrase)
}

pub struct SecretSession<B> {
    background: B,
}

impl<B: Background> SecretSession<B> {
    pub fn new(background: B) -> Self {
        Self { background }
    }

    /// Verify `password` against the primary wallet, then hand it to the
    /// background. Nothing is sent unless decryption and validation succeed.
    pub fn unlock(&self, account: &AccountState, password: &str) -> Result<()> {
        let primary = account.primary()?;
        if let Err(e) = decrypt_mnemonic(&primary.mnemonic, password) {
            warn!("Unlock rejected: {}", e);
            return Err(e);
        }
        self.background
            .send("tryToUnlock", Value::String(password.to_string()))?;
        info!("Unlock accepted, password forwarded to background");
        Ok(())
    }

    /// Establish the vault password in the background.
    pub async fn set_password(&self, password: &str, confirm: &str) -> Result<()> {
        if password != confirm {
            return Err(CoreError::PasswordMismatch);
        }
        self.background
            .ask("setPassword", Value::String(password.to_string()))
            .await?;
        info!("Vault password set in background");
        Ok(())
    }

    /// The password the background holds for the unlocked session.
    pub async fn background_password(&self) -> Result<String> {
        match self.background.ask("getPassword", Value::Null).await? {
            Value::String(password) if !password.is_empty() => Ok(password),
            _ => Err(CoreError::UnexpectedPassword),
        }
    }

    /// Plaintext phrase for the "reveal recovery phrase" screen.
    pub fn reveal_mnemonic(&self, wallet: &WalletState, password: &str) -> Result<String> {
        decrypt_mnemonic(&wallet.mnemonic, password)
    }

    pub fn background(&self) -> &B {
        &self.background
    }
}
