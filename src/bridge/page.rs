//! The page side: a window-style message bus and a request/reply caller on top of it.

use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;

use super::envelope::{kind_of, Envelope};
use super::port::PortError;
use crate::config::BridgeConfig;
use crate::error::{CoreError, Result};

/// Window-style message bus: every listener sees every posted message.
///
/// Each subscriber gets its own unbounded queue, so a slow listener never
/// loses messages the way a ring buffer would.
#[derive(Clone, Debug, Default)]
pub struct PageBus {
    subscribers: Arc<Mutex<Vec<mpsc::UnboundedSender<Value>>>>,
}

impl PageBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver to all current listeners. Posting with no listener is a no-op.
    pub fn post_message(&self, data: Value) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // listeners that went away are pruned here
        subscribers.retain(|tx| tx.send(data.clone()).is_ok());
    }

    /// Listen from now on. Messages posted earlier are not replayed.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<Value> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }
}

/// Issues provider requests on the page bus and waits for the matching reply.
///
/// There is no timeout: a request whose reply never comes stays pending.
pub struct PageClient {
    bus: PageBus,
    provider_type: String,
    api_type: String,
    request_id: AtomicU64,
}

impl PageClient {
    pub fn new(bus: PageBus, config: &BridgeConfig) -> Self {
        Self {
            bus,
            provider_type: config.provider_type.clone(),
            api_type: config.api_type.clone(),
            request_id: AtomicU64::new(1),
        }
    }

    fn post(&self, method: &str, params: Option<Value>) -> u64 {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let envelope = Envelope::request(&self.provider_type, Value::from(id), method, params);
        self.bus.post_message(envelope.to_value());
        id
    }

    /// Post a request without waiting for its reply. Returns the request id.
    pub fn notify(&self, method: &str, params: Option<Value>) -> u64 {
        self.post(method, params)
    }

    pub async fn request(&self, method: &str, params: Option<Value>) -> Result<Value> {
        // subscribe first so the reply cannot slip past
        let mut rx = self.bus.subscribe();
        let id = self.post(method, params);

        while let Some(data) = rx.recv().await {
            if let Some(reply) = self.match_reply(&data, id) {
                return reply;
            }
        }
        Err(CoreError::Rpc("page bus closed".to_string()))
    }

    fn match_reply(&self, data: &Value, id: u64) -> Option<Result<Value>> {
        if kind_of(data) != Some(self.api_type.as_str()) {
            return None;
        }
        let envelope: Envelope = serde_json::from_value(data.clone()).ok()?;
        if envelope.message.id.as_ref().and_then(Value::as_u64) != Some(id) {
            return None;
        }
        Some(match envelope.message.error {
            // transport failures synthesized by the bridge keep their kind
            Some(error) => Err(match PortError::from_message(&error.message) {
                PortError::Other(message) => CoreError::Rpc(message),
                port => CoreError::Transport(port),
            }),
            None => Ok(envelope.message.result.unwrap_or(Value::Null)),
        })
    }
}
