use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use tonmask_core::cli::{self, Cli, Commands};
use tonmask_core::config::CoreConfig;
use tonmask_core::error::Result;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    // read before the subscriber exists; report once it does
    let loaded = CoreConfig::load(&args.config);
    let level = match &loaded {
        Ok(source) => source.config().log_level.clone(),
        Err(_) => CoreConfig::default().log_level,
    };
    // RUST_LOG overrides the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match loaded {
        Ok(source) => {
            source.log(&args.config);
            source.into_config()
        }
        Err(e) => {
            warn!("Error loading config: {}. Using defaults.", e);
            CoreConfig::default()
        }
    };

    if let Err(e) = run(args.command, &config).await {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &CoreConfig) -> Result<()> {
    match command {
        Commands::Generate => cli::keys::handle_generate(),
        Commands::Inspect { mnemonic } => cli::keys::handle_inspect(&mnemonic),
        Commands::Encrypt { secret } => cli::keys::handle_encrypt(config, &secret),
        Commands::Decrypt { envelope } => cli::keys::handle_decrypt(&envelope),
        Commands::Balance { address } => cli::wallet::handle_balance(config, &address).await,
        Commands::Short { address } => {
            cli::wallet::handle_short(&address);
            Ok(())
        }
    }
}
