use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;

/// Failures of a long-lived port, classified the way the platform reports them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortError {
    /// The other end went away. Recoverable by reconnecting.
    #[error("Attempting to use a disconnected port object")]
    Disconnected,
    /// The extension was reloaded or disabled under the page. Terminal.
    #[error("Extension context invalidated.")]
    ContextInvalidated,
    #[error("{0}")]
    Other(String),
}

impl PortError {
    /// Classify a platform error message.
    pub fn from_message(message: &str) -> Self {
        if message.contains("Extension context invalidated") {
            PortError::ContextInvalidated
        } else if message.contains("disconnected port") {
            PortError::Disconnected
        } else {
            PortError::Other(message.to_string())
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, PortError::ContextInvalidated)
    }
}

/// Sending half of a live connection.
pub trait Port: Send + 'static {
    fn post_message(&mut self, payload: &Value) -> Result<(), PortError>;
}

/// A freshly opened port and the stream of messages arriving on it.
pub struct Connection<P> {
    pub port: P,
    pub inbound: mpsc::UnboundedReceiver<Value>,
}

/// Opens named ports to the background process.
pub trait PortConnector: Send + 'static {
    type Port: Port;

    fn connect(&mut self, name: &str) -> Result<Connection<Self::Port>, PortError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_platform_messages() {
        assert_eq!(
            PortError::from_message("Attempting to use a disconnected port object"),
            PortError::Disconnected
        );
        assert_eq!(
            PortError::from_message("Error: Extension context invalidated."),
            PortError::ContextInvalidated
        );
        assert_eq!(
            PortError::from_message("Message length exceeded maximum allowed length."),
            PortError::Other("Message length exceeded maximum allowed length.".to_string())
        );
        assert!(PortError::ContextInvalidated.is_fatal());
        assert!(!PortError::Disconnected.is_fatal());
    }
}
