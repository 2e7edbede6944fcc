//! Switch configuration.
//!
//! Shared by every target. The host binary reads it from a JSON file; the
//! ESP32 firmware builds it from compile-time credentials.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Longest SSID accepted by 802.11.
pub const MAX_NETWORK_NAME_LEN: usize = 32;

/// Longest WPA2 passphrase.
pub const MAX_PASSPHRASE_LEN: usize = 64;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Full device configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwitchConfig {
    /// Wireless network credentials.
    pub network: NetworkConfig,

    /// HTTP listener port.
    pub http_port: u16,

    /// GPIO number driving the MOSFET gate.
    pub gate_pin: u8,

    /// Network join behavior.
    pub join: JoinSettings,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            http_port: 80,
            gate_pin: 5,
            join: JoinSettings::default(),
        }
    }
}

/// WiFi credentials.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkConfig {
    /// Network name (SSID).
    pub network_name: String,

    /// Network passphrase (empty for open networks).
    pub passphrase: String,
}

// Keeps the passphrase out of logs.
impl std::fmt::Debug for NetworkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkConfig")
            .field("network_name", &self.network_name)
            .field("passphrase", &"***")
            .finish()
    }
}

/// Join phase settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JoinSettings {
    /// Milliseconds between link status polls.
    pub poll_interval_ms: u64,

    /// Give up after this many polls. `None` waits forever.
    pub max_attempts: Option<u32>,
}

impl Default for JoinSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            max_attempts: None,
        }
    }
}

impl SwitchConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check the constraints the WiFi stack and the join loop rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = &self.network.network_name;
        if name.is_empty() {
            return Err(ConfigError::Invalid("networkName cannot be empty".into()));
        }
        if name.len() > MAX_NETWORK_NAME_LEN {
            return Err(ConfigError::Invalid(format!(
                "networkName too long ({} > {} bytes)",
                name.len(),
                MAX_NETWORK_NAME_LEN
            )));
        }
        if self.network.passphrase.len() > MAX_PASSPHRASE_LEN {
            return Err(ConfigError::Invalid(format!(
                "passphrase too long (max {} bytes)",
                MAX_PASSPHRASE_LEN
            )));
        }
        if self.join.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "join.pollIntervalMs must be positive".into(),
            ));
        }
        if self.join.max_attempts == Some(0) {
            return Err(ConfigError::Invalid(
                "join.maxAttempts must be positive or null".into(),
            ));
        }
        Ok(())
    }
}
