//! The content-side relay and its connection state machine.

use serde_json::Value;
use std::future::Future;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::envelope::{kind_of, Envelope};
use super::page::PageBus;
use super::port::{Connection, Port, PortConnector, PortError};
use crate::config::BridgeConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Disconnected,
    Connected,
    /// The extension context is gone; the bridge no longer listens.
    Terminated,
}

/// Forwards provider requests from the page to the background port and
/// everything the port sends back to the page.
///
/// Owns the only handle to the live port; `reconnect` is the only way to
/// replace it.
pub struct ContentBridge<C: PortConnector> {
    connector: C,
    page: PageBus,
    config: BridgeConfig,
    port: Option<C::Port>,
    state: BridgeState,
}

impl<C: PortConnector> ContentBridge<C> {
    pub fn new(connector: C, page: PageBus, config: BridgeConfig) -> Self {
        Self {
            connector,
            page,
            config,
            port: None,
            state: BridgeState::Disconnected,
        }
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    /// Open a fresh port and start forwarding its inbound messages to the page.
    ///
    /// Must be called inside a tokio runtime.
    pub fn reconnect(&mut self) -> Result<(), PortError> {
        if self.state == BridgeState::Terminated {
            return Err(PortError::ContextInvalidated);
        }
        self.port = None;

        match self.connector.connect(&self.config.port_name) {
            Ok(Connection { port, inbound }) => {
                tokio::spawn(forward_to_page(inbound, self.page.clone()));
                self.port = Some(port);
                self.state = BridgeState::Connected;
                info!("Connected to background port '{}'", self.config.port_name);
                Ok(())
            }
            Err(e) if e.is_fatal() => {
                self.terminate(&e);
                Err(e)
            }
            Err(e) => {
                self.state = BridgeState::Disconnected;
                warn!("Failed to connect to background: {}", e);
                Err(e)
            }
        }
    }

    /// Handle one message seen on the page bus.
    ///
    /// Only messages whose `type` is the provider type are forwarded; our own
    /// replies and anything else on the bus are ignored.
    pub fn handle_page_message(&mut self, data: &Value) {
        if self.state == BridgeState::Terminated {
            return;
        }
        if kind_of(data) != Some(self.config.provider_type.as_str()) {
            return;
        }
        self.send_to_active_port(data, false);
    }

    fn send_to_active_port(&mut self, payload: &Value, is_repeat: bool) {
        let result = match self.port.as_mut() {
            Some(port) => port.post_message(payload),
            None => Err(PortError::Disconnected),
        };
        let err = match result {
            Ok(()) => return,
            Err(e) => e,
        };

        if err.is_fatal() {
            self.terminate(&err);
            return;
        }
        if err == PortError::Disconnected {
            self.port = None;
            self.state = BridgeState::Disconnected;
        }

        if !is_repeat && err == PortError::Disconnected {
            debug!("Port disconnected, reconnecting and retrying once");
            match self.reconnect() {
                Ok(()) => self.send_to_active_port(payload, true),
                Err(e) if e.is_fatal() => {}
                Err(e) => self.reply_error(payload, &e),
            }
        } else {
            self.reply_error(payload, &err);
        }
    }

    /// Answer the page on behalf of the background so the request resolves.
    fn reply_error(&self, payload: &Value, err: &PortError) {
        let reply = Envelope::error_for(&self.config.api_type, payload, &err.to_string());
        warn!(
            "Replying with transport error for request {:?}: {}",
            reply.message.id, err
        );
        self.page.post_message(reply.to_value());
    }

    fn terminate(&mut self, err: &PortError) {
        error!("Background unreachable for good ({}), bridge stops listening", err);
        self.port = None;
        self.state = BridgeState::Terminated;
    }

    /// Connect, then relay page messages until the extension context is
    /// invalidated. Returns the final state.
    pub async fn run(self) -> BridgeState {
        self.run_until(std::future::pending()).await
    }

    /// Like [`run`](Self::run), but also stops when `shutdown` completes
    /// (the hosting page is torn down).
    pub async fn run_until<F>(mut self, shutdown: F) -> BridgeState
    where
        F: Future<Output = ()>,
    {
        let mut page_rx = self.page.subscribe();
        if let Err(e) = self.reconnect() {
            if e.is_fatal() {
                return self.state;
            }
        }

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Page torn down, bridge shutting down");
                    break;
                }
                received = page_rx.recv() => match received {
                    Some(data) => {
                        self.handle_page_message(&data);
                        if self.state == BridgeState::Terminated {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }
        self.state
    }
}

/// Inbound listener of one connection. Ends when that connection closes.
async fn forward_to_page(mut inbound: mpsc::UnboundedReceiver<Value>, page: PageBus) {
    while let Some(data) = inbound.recv().await {
        page.post_message(data);
    }
}
