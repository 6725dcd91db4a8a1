use tracing::debug;

use crate::client::{LedgerLookup, RpcClient};
use crate::config::CoreConfig;
use crate::error::Result;
use crate::wallet::{format_ton_value, to_short_address};

pub async fn handle_balance(config: &CoreConfig, address: &str) -> Result<()> {
    let client = RpcClient::from_config(&config.network);
    debug!("Querying balance of {} at {}", address, config.network.endpoint);

    let nanotons = client.get_balance(address).await?;
    println!(
        "{}: {} TON",
        to_short_address(address),
        format_ton_value(&nanotons.to_string())?
    );
    Ok(())
}

pub fn handle_short(address: &str) {
    println!("{}", to_short_address(address));
}
