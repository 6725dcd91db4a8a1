//! Account state, its persistence, and the unlock session.

pub mod session;
pub mod store;
pub mod types;

pub use session::{decrypt_mnemonic, Background, SecretSession};
pub use store::AccountStore;
pub use types::AccountState;
