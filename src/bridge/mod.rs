//! Relay between the untrusted page and the privileged background process.
//!
//! The page talks over a window-style bus ([`PageBus`]); the background is
//! reached through one named long-lived port at a time ([`PortConnector`]).
//! Every page request gets exactly one reply, synthesized here when the
//! transport fails, unless the extension context itself is gone.
//!
//! Boundary assumption: the bridge only runs inside the page it serves, so
//! replies are broadcast on that page's bus without targeting. Anything on
//! the bus can see them, and anything on the bus can post, which is why the
//! `type` discriminator check on inbound messages is mandatory.

pub mod envelope;
pub mod memory;
pub mod page;
pub mod port;
pub mod relay;

pub use envelope::{kind_of, Envelope, RpcErrorBody, RpcMessage};
pub use memory::{BackgroundPort, MemoryPort, MemoryRuntime};
pub use page::{PageBus, PageClient};
pub use port::{Connection, Port, PortConnector, PortError};
pub use relay::{BridgeState, ContentBridge};

/// Name of the long-lived port to the background process.
pub const PORT_NAME: &str = "TonMaskContentScript";
/// `type` of page → background requests.
pub const PROVIDER_TYPE: &str = "TonMaskProvider";
/// `type` of background → page replies.
pub const API_TYPE: &str = "TonMaskAPI";
