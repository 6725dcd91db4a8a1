pub mod keys;
pub mod wallet;

use clap::{Parser, Subcommand};
use std::io::{self, Write};

use crate::error::Result;

#[derive(Parser)]
#[command(name = "tonmask")]
#[command(about = "TonMask wallet core CLI", long_about = None)]
pub struct Cli {
    /// Path of the TOML config file
    #[arg(long, global = true, default_value = "tonmask.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a new 24-word mnemonic
    Generate,
    /// Validate a mnemonic and print its public key
    Inspect {
        #[arg(long)]
        mnemonic: String,
    },
    /// Encrypt a secret with a password
    Encrypt {
        #[arg(long)]
        secret: String,
    },
    /// Decrypt a vault envelope
    Decrypt {
        #[arg(long)]
        envelope: String,
    },
    /// Look up the balance of an address
    Balance { address: String },
    /// Print the shortened form of an address
    Short { address: String },
}

/// Read one line from stdin after printing `prompt`.
pub(crate) fn prompt(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
