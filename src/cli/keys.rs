use tracing::info;

use super::prompt;
use crate::config::CoreConfig;
use crate::crypto::{self, KeyPair};
use crate::error::{CoreError, Result};
use crate::vault;

pub fn handle_generate() -> Result<()> {
    let words = crypto::generate_mnemonic()?;
    let key_pair = KeyPair::from_mnemonic(&words)?;

    println!("\n[SECRET MNEMONIC] - Write this down securely and NEVER share it:");
    println!("---------------------------------------------------------------");
    println!("{}", words.join(" "));
    println!("---------------------------------------------------------------");
    println!("Public Key: {}", key_pair.public_key_hex());
    Ok(())
}

pub fn handle_inspect(mnemonic: &str) -> Result<()> {
    let key_pair = KeyPair::from_phrase(mnemonic.trim())?;
    println!("Mnemonic OK.");
    println!("Public Key: {}", key_pair.public_key_hex());
    Ok(())
}

pub fn handle_encrypt(config: &CoreConfig, secret: &str) -> Result<()> {
    let password = prompt("Enter encryption password: ")?;
    let confirm = prompt("Confirm password: ")?;
    if password != confirm {
        return Err(CoreError::PasswordMismatch);
    }

    let envelope = vault::encrypt_with(config.vault.scheme, secret, &password)?;
    info!("Encrypted secret with {:?} envelope", config.vault.scheme);
    println!("{}", envelope);
    Ok(())
}

pub fn handle_decrypt(envelope: &str) -> Result<()> {
    let password = prompt("Enter password: ")?;
    let plaintext = vault::decrypt(envelope.trim(), &password)?;
    println!("{}", plaintext);
    Ok(())
}
