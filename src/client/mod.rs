// Client module: outbound calls to the ledger
pub mod rpc_client;

use async_trait::async_trait;

use crate::error::Result;

pub use rpc_client::RpcClient;

/// Balance lookup against the remote ledger.
///
/// Errors must stay errors: an unreachable ledger is not a zero balance.
#[async_trait]
pub trait LedgerLookup: Send + Sync {
    /// Balance of `address` in nanotons.
    async fn get_balance(&self, address: &str) -> Result<u128>;
}
