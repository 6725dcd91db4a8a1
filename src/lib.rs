pub mod account;
pub mod bridge;
pub mod cli;
pub mod client;
pub mod config;
pub mod crypto;
pub mod error;
pub mod vault;
pub mod wallet;

pub use error::{CoreError, Result};
