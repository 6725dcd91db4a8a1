use bip39::Language;
use ed25519_dalek::{SigningKey, VerifyingKey};
use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2;
use rand::rngs::OsRng;
use rand::Rng;
use sha2::Sha512;

use crate::error::{CoreError, Result};

pub const WORD_COUNT: usize = 24;

const PBKDF_ITERATIONS: u32 = 100_000;
const DEFAULT_SEED_SALT: &[u8] = b"TON default seed";
const SEED_VERSION_SALT: &[u8] = b"TON seed version";

/// Ed25519 key pair derived from a mnemonic. Never persisted.
pub struct KeyPair {
    pub signing_key: SigningKey,
}

impl KeyPair {
    /// Restore keypair from a validated mnemonic word list
    pub fn from_mnemonic<S: AsRef<str>>(words: &[S]) -> Result<Self> {
        validate_mnemonic(words)?;
        let entropy = mnemonic_to_entropy(words, "")?;

        let mut seed = [0u8; 64];
        pbkdf2::<Hmac<Sha512>>(&entropy, DEFAULT_SEED_SALT, PBKDF_ITERATIONS, &mut seed);

        let mut secret = [0u8; 32];
        secret.copy_from_slice(&seed[..32]);
        Ok(KeyPair {
            signing_key: SigningKey::from_bytes(&secret),
        })
    }

    /// Restore keypair from a space separated phrase
    pub fn from_phrase(phrase: &str) -> Result<Self> {
        Self::from_mnemonic(&split_phrase(phrase))
    }

    pub fn public_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.public_key().to_bytes()
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key_bytes())
    }
}

/// Split a stored phrase on single spaces, the way it was joined.
pub fn split_phrase(phrase: &str) -> Vec<&str> {
    phrase.split(' ').collect()
}

/// HMAC-SHA512 keyed by the joined phrase over the (usually empty) password.
pub fn mnemonic_to_entropy<S: AsRef<str>>(words: &[S], password: &str) -> Result<[u8; 64]> {
    let phrase = words
        .iter()
        .map(|w| w.as_ref())
        .collect::<Vec<_>>()
        .join(" ");
    let mut mac = <Hmac<Sha512> as Mac>::new_from_slice(phrase.as_bytes())
        .map_err(|e| CoreError::InvalidState(format!("hmac: {}", e)))?;
    mac.update(password.as_bytes());

    let mut entropy = [0u8; 64];
    entropy.copy_from_slice(&mac.finalize().into_bytes());
    Ok(entropy)
}

/// The checksum of a passwordless mnemonic: first byte of the versioned seed is zero.
pub fn is_basic_seed(entropy: &[u8; 64]) -> bool {
    let mut seed = [0u8; 64];
    let rounds = (PBKDF_ITERATIONS / 256).max(1);
    pbkdf2::<Hmac<Sha512>>(entropy, SEED_VERSION_SALT, rounds, &mut seed);
    seed[0] == 0
}

pub fn validate_mnemonic<S: AsRef<str>>(words: &[S]) -> Result<()> {
    if words.len() != WORD_COUNT {
        return Err(CoreError::InvalidMnemonic(format!(
            "expected {} words, got {}",
            WORD_COUNT,
            words.len()
        )));
    }
    let list = Language::English.word_list();
    for (i, word) in words.iter().enumerate() {
        let word = word.as_ref();
        if list.binary_search_by(|probe| (*probe).cmp(word)).is_err() {
            return Err(CoreError::InvalidMnemonic(format!(
                "word {} is not in the word list",
                i + 1
            )));
        }
    }
    if !is_basic_seed(&mnemonic_to_entropy(words, "")?) {
        return Err(CoreError::InvalidMnemonic("checksum mismatch".to_string()));
    }
    Ok(())
}

/// Generate a new 24-word mnemonic that passes [`validate_mnemonic`].
pub fn generate_mnemonic() -> Result<Vec<String>> {
    let list = Language::English.word_list();
    let mut rng = OsRng;
    loop {
        let words: Vec<String> = (0..WORD_COUNT)
            .map(|_| list[rng.gen_range(0..list.len())].to_string())
            .collect();
        if is_basic_seed(&mnemonic_to_entropy(&words, "")?) {
            return Ok(words);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHRASE: &str = "vote art zoo useful thank abandon art zoo thank vote year year \
        abandon thank zoo art zoo useful thank year useful year winner vote";
    const PUBLIC_KEY: &str = "7303def561afad698f6c0b66d3b855bc439ece8725bc77cb572cd8664569f91e";

    #[test]
    fn test_known_key_pair() {
        let kp = KeyPair::from_phrase(PHRASE).unwrap();
        assert_eq!(kp.public_key_hex(), PUBLIC_KEY);
    }

    #[test]
    fn test_rejects_bad_checksum() {
        let words = vec!["zoo"; WORD_COUNT];
        assert!(matches!(
            validate_mnemonic(&words),
            Err(CoreError::InvalidMnemonic(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_word_and_count() {
        let mut words = split_phrase(PHRASE);
        words[3] = "notaword";
        assert!(validate_mnemonic(&words).is_err());
        assert!(validate_mnemonic(&split_phrase(PHRASE)[..12]).is_err());
        // double space yields an empty word
        assert!(validate_mnemonic(&split_phrase(&PHRASE.replacen(' ', "  ", 1))).is_err());
    }

    #[test]
    fn test_generated_mnemonic_validates() {
        let words = generate_mnemonic().unwrap();
        assert_eq!(words.len(), WORD_COUNT);
        assert!(validate_mnemonic(&words).is_ok());
    }
}
