use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::bridge::{API_TYPE, PORT_NAME, PROVIDER_TYPE};
use crate::error::{CoreError, Result};
use crate::vault::VaultScheme;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CoreConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    pub network: NetworkConfig,
    #[serde(default)]
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub vault: VaultConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NetworkConfig {
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub workchain: i32,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BridgeConfig {
    pub port_name: String,
    pub provider_type: String,
    pub api_type: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct VaultConfig {
    #[serde(default)]
    pub scheme: VaultScheme,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            port_name: PORT_NAME.to_string(),
            provider_type: PROVIDER_TYPE.to_string(),
            api_type: API_TYPE.to_string(),
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            network: NetworkConfig {
                endpoint: "https://toncenter.com/api/v2/jsonRPC".to_string(),
                api_key: None,
                workchain: 0,
            },
            bridge: BridgeConfig::default(),
            vault: VaultConfig::default(),
        }
    }
}

impl CoreConfig {
    /// Read `path`, or write and return the defaults if there is no file yet.
    ///
    /// Logs nothing itself, so it can run before the subscriber is installed.
    pub fn load(path: &str) -> Result<ConfigSource> {
        if !Path::new(path).exists() {
            let config = Self::default();
            let s = toml::to_string_pretty(&config)
                .map_err(|e| CoreError::Config(format!("serializing defaults: {}", e)))?;
            std::fs::write(path, s)?;
            return Ok(ConfigSource::Created(config));
        }
        let s = std::fs::read_to_string(path)?;
        let config = toml::from_str(&s)
            .map_err(|e| CoreError::Config(format!("parsing {}: {}", path, e)))?;
        Ok(ConfigSource::Loaded(config))
    }

    pub fn load_or_default(path: &str) -> Self {
        match Self::load(path) {
            Ok(source) => {
                source.log(path);
                source.into_config()
            }
            Err(e) => {
                warn!("Error loading config: {}. Using defaults.", e);
                Self::default()
            }
        }
    }
}

/// Where a loaded config came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    Loaded(CoreConfig),
    Created(CoreConfig),
}

impl ConfigSource {
    pub fn config(&self) -> &CoreConfig {
        match self {
            ConfigSource::Loaded(c) | ConfigSource::Created(c) => c,
        }
    }

    pub fn into_config(self) -> CoreConfig {
        match self {
            ConfigSource::Loaded(c) | ConfigSource::Created(c) => c,
        }
    }

    pub fn log(&self, path: &str) {
        match self {
            ConfigSource::Loaded(_) => info!("Config loaded from {}", path),
            ConfigSource::Created(_) => {
                info!("Config file not found at '{}'. Created default.", path)
            }
        }
    }
}
