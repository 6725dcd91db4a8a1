//! Password-based encryption of wallet secrets.
//!
//! Two envelope formats are understood:
//!
//! - **Legacy**: `hex(nonce) || base64(ciphertext ‖ tag)`. The AES-256-GCM key
//!   is a single SHA-256 pass over the UTF-8 password. No salt, no separator.
//!   This is the format stored by existing installs and the default for new
//!   ciphertexts.
//! - **Argon2**: `"v2:" || hex(salt) || hex(nonce) || base64(ciphertext ‖ tag)`,
//!   key derived with Argon2id over a random per-secret salt.
//!
//! [`decrypt`] dispatches on the prefix. A legacy envelope always starts with
//! 24 hex characters, so the `v2:` prefix can never be mistaken for one.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use argon2::Argon2;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{CoreError, Result};

pub const NONCE_LEN: usize = 12;
pub const NONCE_HEX_LEN: usize = NONCE_LEN * 2;
pub const SALT_LEN: usize = 16;
pub const V2_PREFIX: &str = "v2:";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VaultScheme {
    #[default]
    Legacy,
    Argon2,
}

/// Encrypt `plaintext` in the legacy envelope format.
pub fn encrypt(plaintext: &str, password: &str) -> Result<String> {
    encrypt_with(VaultScheme::Legacy, plaintext, password)
}

pub fn encrypt_with(scheme: VaultScheme, plaintext: &str, password: &str) -> Result<String> {
    match scheme {
        VaultScheme::Legacy => {
            let key = password_key(password);
            let (nonce, ciphertext) = seal(&key, plaintext.as_bytes())?;
            Ok(format!("{}{}", hex::encode(nonce), STANDARD.encode(ciphertext)))
        }
        VaultScheme::Argon2 => {
            let mut salt = [0u8; SALT_LEN];
            OsRng.fill_bytes(&mut salt);
            let key = argon2_key(password, &salt)?;
            let (nonce, ciphertext) = seal(&key, plaintext.as_bytes())?;
            Ok(format!(
                "{}{}{}{}",
                V2_PREFIX,
                hex::encode(salt),
                hex::encode(nonce),
                STANDARD.encode(ciphertext)
            ))
        }
    }
}

/// Decrypt an envelope produced by [`encrypt`] or [`encrypt_with`].
///
/// A wrong password fails GCM authentication and returns
/// [`CoreError::Decryption`]; it never yields bytes.
pub fn decrypt(envelope: &str, password: &str) -> Result<String> {
    let plaintext = match envelope.strip_prefix(V2_PREFIX) {
        Some(rest) => {
            let salt_hex = rest.get(..SALT_LEN * 2).ok_or_else(|| {
                CoreError::MalformedCiphertext("truncated salt".to_string())
            })?;
            let salt = decode_hex::<SALT_LEN>(salt_hex)?;
            let key = argon2_key(password, &salt)?;
            open_legacy_body(&key, &rest[SALT_LEN * 2..])?
        }
        None => open_legacy_body(&password_key(password), envelope)?,
    };

    String::from_utf8(plaintext)
        .map_err(|_| CoreError::MalformedCiphertext("plaintext is not UTF-8".to_string()))
}

/// Which scheme produced `envelope`, judged from its prefix.
pub fn scheme_of(envelope: &str) -> VaultScheme {
    if envelope.starts_with(V2_PREFIX) {
        VaultScheme::Argon2
    } else {
        VaultScheme::Legacy
    }
}

/// Decrypt with the old password and encrypt again under `scheme`.
pub fn reencrypt(
    envelope: &str,
    old_password: &str,
    new_password: &str,
    scheme: VaultScheme,
) -> Result<String> {
    let plaintext = decrypt(envelope, old_password)?;
    encrypt_with(scheme, &plaintext, new_password)
}

/// SHA-256 of the UTF-8 password. Kept bit-exact for stored legacy envelopes.
pub fn password_key(password: &str) -> [u8; 32] {
    Sha256::digest(password.as_bytes()).into()
}

fn argon2_key(password: &str, salt: &[u8]) -> Result<[u8; 32]> {
    let mut key = [0u8; 32];
    Argon2::default()
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|e| CoreError::Encryption(format!("argon2: {}", e)))?;
    Ok(key)
}

fn seal(key: &[u8; 32], plaintext: &[u8]) -> Result<([u8; NONCE_LEN], Vec<u8>)> {
    let cipher = Aes256Gcm::new(&(*key).into());

    // fresh nonce per call, never derived from the inputs
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| CoreError::Encryption(format!("{:?}", e)))?;
    Ok((nonce_bytes, ciphertext))
}

/// `hex(nonce) || base64(ct)` under an already derived key.
fn open_legacy_body(key: &[u8; 32], body: &str) -> Result<Vec<u8>> {
    let nonce_hex = body
        .get(..NONCE_HEX_LEN)
        .ok_or_else(|| CoreError::MalformedCiphertext("truncated nonce".to_string()))?;
    let nonce_bytes = decode_hex::<NONCE_LEN>(nonce_hex)?;
    let ciphertext = STANDARD
        .decode(&body[NONCE_HEX_LEN..])
        .map_err(|e| CoreError::MalformedCiphertext(format!("invalid base64: {}", e)))?;

    let cipher = Aes256Gcm::new(&(*key).into());
    cipher
        .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_slice())
        .map_err(|_| CoreError::Decryption)
}

fn decode_hex<const N: usize>(s: &str) -> Result<[u8; N]> {
    let bytes = hex::decode(s)
        .map_err(|e| CoreError::MalformedCiphertext(format!("invalid hex: {}", e)))?;
    bytes
        .try_into()
        .map_err(|_| CoreError::MalformedCiphertext("wrong hex length".to_string()))
}
