use tracing::{debug, info};

use super::{WalletState, WalletVersion};
use crate::client::LedgerLookup;
use crate::crypto::KeyPair;
use crate::error::{CoreError, Result};
use crate::vault::{self, VaultScheme};

/// Contract address derivation, provided by the chain SDK.
///
/// Returns the user-friendly address of `version` instantiated for
/// `public_key` on `workchain`.
pub trait AddressDeriver: Send + Sync {
    fn derive_address(
        &self,
        public_key: &[u8; 32],
        version: WalletVersion,
        workchain: i32,
    ) -> Result<String>;
}

/// Builds [`WalletState`]s from mnemonics.
pub struct WalletResolver<D, L> {
    deriver: D,
    ledger: L,
    workchain: i32,
    scheme: VaultScheme,
}

impl<D: AddressDeriver, L: LedgerLookup> WalletResolver<D, L> {
    pub fn new(deriver: D, ledger: L) -> Self {
        Self {
            deriver,
            ledger,
            workchain: 0,
            scheme: VaultScheme::Legacy,
        }
    }

    pub fn with_workchain(mut self, workchain: i32) -> Self {
        self.workchain = workchain;
        self
    }

    pub fn with_scheme(mut self, scheme: VaultScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// New wallet on the latest contract version.
    pub fn create_wallet(&self, mnemonic: &str, password: &str, index: usize) -> Result<WalletState> {
        let key_pair = KeyPair::from_phrase(mnemonic)?;
        let encrypted = vault::encrypt_with(self.scheme, mnemonic, password)?;

        let version = WalletVersion::LATEST;
        let address = self.derive(&key_pair.public_key_bytes(), version)?;

        info!("Created wallet {} on {}", address, version);
        Ok(WalletState {
            name: WalletState::default_name(index),
            mnemonic: encrypted,
            address,
            public_key: key_pair.public_key_hex(),
            version,
            is_bounceable: true,
        })
    }

    /// Import an existing mnemonic, keeping whichever contract already holds funds.
    pub async fn import_wallet<S: AsRef<str>>(
        &self,
        words: &[S],
        password: &str,
        index: usize,
    ) -> Result<WalletState> {
        // validation happens here, before any lookup
        let key_pair = KeyPair::from_mnemonic(words)?;
        let phrase = words.iter().map(|w| w.as_ref()).collect::<Vec<_>>().join(" ");
        let encrypted = vault::encrypt_with(self.scheme, &phrase, password)?;

        let (version, address) = self.find_contract(&key_pair.public_key_bytes()).await?;

        info!("Imported wallet {} on {}", address, version);
        Ok(WalletState {
            name: WalletState::default_name(index),
            mnemonic: encrypted,
            address,
            public_key: key_pair.public_key_hex(),
            version,
            is_bounceable: true,
        })
    }

    /// Probe every version in order and stop at the first non-zero balance.
    ///
    /// A failed lookup aborts the probe instead of counting as zero, so a
    /// funded account is never skipped over a network error.
    pub async fn find_contract(&self, public_key: &[u8; 32]) -> Result<(WalletVersion, String)> {
        for version in WalletVersion::ALL {
            let address = self.derive(public_key, version)?;
            let balance = self.ledger.get_balance(&address).await?;
            debug!("Probed {} at {}: {} nanotons", version, address, balance);
            if balance != 0 {
                return Ok((version, address));
            }
        }

        let version = WalletVersion::LATEST;
        let address = self.derive(public_key, version)?;
        debug!("No funded contract found, falling back to {}", version);
        Ok((version, address))
    }

    /// Explicit migration to another contract version from wallet settings.
    ///
    /// The key and the encrypted secret are unchanged; only the address moves.
    pub fn change_version(&self, wallet: &mut WalletState, version: WalletVersion) -> Result<()> {
        if wallet.version == version {
            return Ok(());
        }
        let address = self.derive(&wallet.public_key_bytes()?, version)?;
        info!(
            "Migrating {} from {} to {} ({})",
            wallet.name, wallet.version, version, address
        );
        wallet.version = version;
        wallet.address = address;
        Ok(())
    }

    /// Address of `version` for `public_key`. An empty address is never accepted.
    fn derive(&self, public_key: &[u8; 32], version: WalletVersion) -> Result<String> {
        let address = self
            .deriver
            .derive_address(public_key, version, self.workchain)?;
        if address.trim().is_empty() {
            return Err(CoreError::Derivation(format!(
                "empty {} address on workchain {}",
                version, self.workchain
            )));
        }
        Ok(address)
    }

    pub fn deriver(&self) -> &D {
        &self.deriver
    }
}
