//! Integration tests for the unlock session
//!
//! The background process is replaced by a recorder, or reached for real
//! through the page bus, the bridge and the in-memory runtime.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::timeout;

use tonmask_core::account::{AccountState, Background, SecretSession};
use tonmask_core::bridge::{
    BackgroundPort, ContentBridge, Envelope, MemoryRuntime, PageBus, PageClient,
};
use tonmask_core::config::BridgeConfig;
use tonmask_core::vault::{self, VaultScheme};
use tonmask_core::wallet::{WalletState, WalletVersion};
use tonmask_core::{CoreError, Result};

const MNEMONIC: &str = "vote art zoo useful thank abandon art zoo thank vote year year \
    abandon thank zoo art zoo useful thank year useful year winner vote";
const PASSWORD: &str = "hunter2";

// ============================================================================
// Test doubles
// ============================================================================

#[derive(Default)]
struct Recorder {
    sent: Mutex<Vec<(String, Value)>>,
    asked: Mutex<Vec<(String, Value)>>,
    answers: HashMap<String, Value>,
}

#[async_trait]
impl Background for Recorder {
    fn send(&self, method: &str, params: Value) -> Result<()> {
        self.sent.lock().unwrap().push((method.to_string(), params));
        Ok(())
    }

    async fn ask(&self, method: &str, params: Value) -> Result<Value> {
        self.asked.lock().unwrap().push((method.to_string(), params));
        Ok(self.answers.get(method).cloned().unwrap_or(Value::Null))
    }
}

fn account_with(secret: &str, password: &str, scheme: VaultScheme) -> AccountState {
    let mut account = AccountState::new();
    account
        .add_wallet(WalletState {
            name: WalletState::default_name(1),
            mnemonic: vault::encrypt_with(scheme, secret, password).unwrap(),
            address: "EQ-primary".to_string(),
            public_key: "7303def561afad698f6c0b66d3b855bc439ece8725bc77cb572cd8664569f91e"
                .to_string(),
            version: WalletVersion::V4R2,
            is_bounceable: true,
        })
        .unwrap();
    account
}

fn session_answering(answers: &[(&str, Value)]) -> SecretSession<Recorder> {
    SecretSession::new(Recorder {
        answers: answers
            .iter()
            .map(|(m, v)| (m.to_string(), v.clone()))
            .collect(),
        ..Default::default()
    })
}

// ============================================================================
// Unlock
// ============================================================================

mod unlock {
    use super::*;

    #[test]
    fn test_wrong_password_sends_nothing() {
        let session = session_answering(&[]);
        let account = account_with(MNEMONIC, PASSWORD, VaultScheme::Legacy);

        let err = session.unlock(&account, "hunter3").unwrap_err();
        assert!(matches!(err, CoreError::Decryption));
        assert!(session.background().sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_non_mnemonic_secret_sends_nothing() {
        let session = session_answering(&[]);
        let account = account_with("not a mnemonic at all", PASSWORD, VaultScheme::Legacy);

        let err = session.unlock(&account, PASSWORD).unwrap_err();
        assert!(matches!(err, CoreError::InvalidMnemonic(_)));
        assert!(session.background().sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_success_forwards_only_the_password() {
        let session = session_answering(&[]);
        for scheme in [VaultScheme::Legacy, VaultScheme::Argon2] {
            let account = account_with(MNEMONIC, PASSWORD, scheme);
            session.unlock(&account, PASSWORD).unwrap();
        }

        let sent = session.background().sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 2);
        for (method, params) in sent {
            assert_eq!(method, "tryToUnlock");
            assert_eq!(params, json!(PASSWORD));
        }
    }

    #[test]
    fn test_empty_account_cannot_unlock() {
        let session = session_answering(&[]);
        let err = session.unlock(&AccountState::new(), PASSWORD).unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
        assert!(session.background().sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_reveal_mnemonic() {
        let session = session_answering(&[]);
        let account = account_with(MNEMONIC, PASSWORD, VaultScheme::Legacy);
        let wallet = account.primary().unwrap();

        assert_eq!(session.reveal_mnemonic(wallet, PASSWORD).unwrap(), MNEMONIC);
        assert!(session.reveal_mnemonic(wallet, "nope").is_err());
        assert!(session.background().sent.lock().unwrap().is_empty());
    }
}

// ============================================================================
// Password management
// ============================================================================

mod password {
    use super::*;

    #[tokio::test]
    async fn test_mismatch_is_rejected_locally() {
        let session = session_answering(&[]);
        let err = session.set_password("abc", "abd").await.unwrap_err();
        assert!(matches!(err, CoreError::PasswordMismatch));
        assert_eq!(err.to_string(), "Confirm password incorrect");
        assert!(session.background().asked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_password_asks_background() {
        let session = session_answering(&[]);
        session.set_password(PASSWORD, PASSWORD).await.unwrap();
        let asked = session.background().asked.lock().unwrap().clone();
        assert_eq!(asked, vec![("setPassword".to_string(), json!(PASSWORD))]);
    }

    #[tokio::test]
    async fn test_background_password() {
        let session = session_answering(&[("getPassword", json!(PASSWORD))]);
        assert_eq!(session.background_password().await.unwrap(), PASSWORD);

        for answer in [json!(""), Value::Null, json!(42)] {
            let session = session_answering(&[("getPassword", answer)]);
            assert!(matches!(
                session.background_password().await,
                Err(CoreError::UnexpectedPassword)
            ));
        }
    }
}

// ============================================================================
// Through the bridge
// ============================================================================

mod over_bridge {
    use super::*;

    /// Minimal background: remembers the unlock password and hands it back.
    async fn serve(mut port: BackgroundPort) {
        let mut unlocked: Option<String> = None;
        while let Some(data) = port.recv().await {
            let Ok(envelope) = serde_json::from_value::<Envelope>(data) else {
                continue;
            };
            let message = envelope.message;
            match message.method.as_deref() {
                Some("tryToUnlock") => {
                    unlocked = message.params.and_then(|p| p.as_str().map(str::to_string));
                }
                Some("getPassword") => {
                    let reply = Envelope::result(
                        "TonMaskAPI",
                        message.id,
                        message.method,
                        json!(unlocked.clone().unwrap_or_default()),
                    );
                    let _ = port.post_message(reply.to_value());
                }
                _ => {}
            }
        }
    }

    #[tokio::test]
    async fn test_unlock_then_read_back_password() {
        let (runtime, mut accept) = MemoryRuntime::new();
        let bus = PageBus::default();
        let config = BridgeConfig::default();
        tokio::spawn(ContentBridge::new(runtime, bus.clone(), config.clone()).run());
        tokio::spawn(serve(accept.recv().await.unwrap()));

        let session = SecretSession::new(PageClient::new(bus, &config));
        assert!(matches!(
            timeout(Duration::from_secs(5), session.background_password())
                .await
                .unwrap(),
            Err(CoreError::UnexpectedPassword)
        ));

        let account = account_with(MNEMONIC, PASSWORD, VaultScheme::Legacy);
        session.unlock(&account, PASSWORD).unwrap();
        let password = timeout(Duration::from_secs(5), session.background_password())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(password, PASSWORD);
    }
}
