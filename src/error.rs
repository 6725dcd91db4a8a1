use thiserror::Error;

use crate::bridge::PortError;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),
    #[error("Confirm password incorrect")]
    PasswordMismatch,
    #[error("Unexpected password")]
    UnexpectedPassword,
    #[error("Decryption failed (wrong password or corrupted data)")]
    Decryption,
    #[error("Malformed ciphertext: {0}")]
    MalformedCiphertext(String),
    #[error("Encryption failure: {0}")]
    Encryption(String),
    #[error("Ledger lookup failed for {address}: {reason}")]
    Ledger { address: String, reason: String },
    #[error("Address derivation failed: {0}")]
    Derivation(String),
    #[error("Transport error: {0}")]
    Transport(#[from] PortError),
    #[error("RPC error: {0}")]
    Rpc(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
