//! Compile-time configuration for the firmware.
//!
//! Credentials are baked in from the `WIFI_SSID` and `WIFI_PASS` environment
//! variables at build time.

use mosfet_core::{ConfigError, NetworkConfig, SwitchConfig};

/// SSID from the build environment.
pub const WIFI_SSID: Option<&str> = option_env!("WIFI_SSID");

/// Passphrase from the build environment.
pub const WIFI_PASS: Option<&str> = option_env!("WIFI_PASS");

/// Build the device configuration: baked-in credentials, default pin and port.
pub fn build_config() -> Result<SwitchConfig, ConfigError> {
    let config = SwitchConfig {
        network: NetworkConfig {
            network_name: WIFI_SSID.unwrap_or_default().to_string(),
            passphrase: WIFI_PASS.unwrap_or_default().to_string(),
        },
        ..Default::default()
    };
    config.validate()?;
    Ok(config)
}
