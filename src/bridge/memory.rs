//! In-process extension runtime: ports are pairs of tokio channels.
//!
//! Used to host the bridge and a background task in one process, and to
//! reproduce teardown: a background can drop or `disconnect` its end, and
//! the whole runtime can be `invalidate`d like a reloaded extension.

use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use super::port::{Connection, Port, PortConnector, PortError};

const NO_RECEIVER: &str = "Could not establish connection. Receiving end does not exist.";

#[derive(Debug, Default)]
struct Link {
    closed: AtomicBool,
}

#[derive(Clone)]
pub struct MemoryRuntime {
    invalidated: Arc<AtomicBool>,
    accept_tx: mpsc::UnboundedSender<BackgroundPort>,
}

impl MemoryRuntime {
    /// A runtime plus the background's stream of incoming connections.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<BackgroundPort>) {
        let (accept_tx, accept_rx) = mpsc::unbounded_channel();
        let runtime = Self {
            invalidated: Arc::new(AtomicBool::new(false)),
            accept_tx,
        };
        (runtime, accept_rx)
    }

    /// Simulate the extension being reloaded under the page.
    pub fn invalidate(&self) {
        self.invalidated.store(true, Ordering::SeqCst);
    }

    pub fn is_invalidated(&self) -> bool {
        self.invalidated.load(Ordering::SeqCst)
    }
}

impl PortConnector for MemoryRuntime {
    type Port = MemoryPort;

    fn connect(&mut self, name: &str) -> Result<Connection<MemoryPort>, PortError> {
        if self.is_invalidated() {
            return Err(PortError::ContextInvalidated);
        }
        let link = Arc::new(Link::default());
        let (to_background, from_page) = mpsc::unbounded_channel();
        let (to_page, inbound) = mpsc::unbounded_channel();

        let background = BackgroundPort {
            name: name.to_string(),
            link: link.clone(),
            rx: from_page,
            tx: to_page,
        };
        self.accept_tx
            .send(background)
            .map_err(|_| PortError::Other(NO_RECEIVER.to_string()))?;
        debug!("Opened in-memory port '{}'", name);

        let port = MemoryPort {
            link,
            tx: to_background,
            invalidated: self.invalidated.clone(),
        };
        Ok(Connection { port, inbound })
    }
}

/// Page-side end of an in-memory port.
pub struct MemoryPort {
    link: Arc<Link>,
    tx: mpsc::UnboundedSender<Value>,
    invalidated: Arc<AtomicBool>,
}

impl Port for MemoryPort {
    fn post_message(&mut self, payload: &Value) -> Result<(), PortError> {
        if self.invalidated.load(Ordering::SeqCst) {
            return Err(PortError::ContextInvalidated);
        }
        if self.link.closed.load(Ordering::SeqCst) {
            return Err(PortError::Disconnected);
        }
        self.tx.send(payload.clone()).map_err(|_| {
            self.link.closed.store(true, Ordering::SeqCst);
            PortError::Disconnected
        })
    }
}

/// Background-side end of an in-memory port. Dropping it disconnects the port.
pub struct BackgroundPort {
    name: String,
    link: Arc<Link>,
    rx: mpsc::UnboundedReceiver<Value>,
    tx: mpsc::UnboundedSender<Value>,
}

impl BackgroundPort {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Next message from the page, `None` once the page end is gone.
    pub async fn recv(&mut self) -> Option<Value> {
        self.rx.recv().await
    }

    pub fn post_message(&self, payload: Value) -> Result<(), PortError> {
        if self.link.closed.load(Ordering::SeqCst) {
            return Err(PortError::Disconnected);
        }
        self.tx.send(payload).map_err(|_| PortError::Disconnected)
    }

    pub fn disconnect(&self) {
        self.link.closed.store(true, Ordering::SeqCst);
    }
}

impl Drop for BackgroundPort {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_round_trip_over_port() {
        let (mut runtime, mut accept) = MemoryRuntime::new();
        let Connection { mut port, mut inbound } = runtime.connect("TonMaskContentScript").unwrap();
        let mut background = accept.recv().await.unwrap();
        assert_eq!(background.name(), "TonMaskContentScript");

        port.post_message(&json!({ "ping": 1 })).unwrap();
        assert_eq!(background.recv().await, Some(json!({ "ping": 1 })));

        background.post_message(json!({ "pong": 1 })).unwrap();
        assert_eq!(inbound.recv().await, Some(json!({ "pong": 1 })));
    }

    #[tokio::test]
    async fn test_disconnect_and_invalidate() {
        let (mut runtime, mut accept) = MemoryRuntime::new();
        let Connection { mut port, .. } = runtime.connect("p").unwrap();
        let background = accept.recv().await.unwrap();

        drop(background);
        assert_eq!(port.post_message(&json!(1)), Err(PortError::Disconnected));

        runtime.invalidate();
        assert_eq!(port.post_message(&json!(1)), Err(PortError::ContextInvalidated));
        assert!(matches!(runtime.connect("p"), Err(PortError::ContextInvalidated)));
    }

    #[tokio::test]
    async fn test_no_background_listening() {
        let (mut runtime, accept) = MemoryRuntime::new();
        drop(accept);
        assert!(matches!(runtime.connect("p"), Err(PortError::Other(_))));
    }
}
