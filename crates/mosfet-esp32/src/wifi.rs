//! WiFi station link for ESP32.
//!
//! Implements the polling link used by the network join phase on top of the
//! non-blocking `EspWifi` driver.

use std::net::IpAddr;

use anyhow::{anyhow, Result};
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::{modem::Modem, peripheral},
    nvs::EspDefaultNvsPartition,
    wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi},
};
use log::{debug, info, warn};
use mosfet_core::{LinkStatus, NetworkConfig, NetworkLink};

/// Polls between two association requests while the station is not
/// associated. The driver does not retry on its own after a failed attempt.
const POLLS_PER_RECONNECT: u32 = 20;

/// Station-mode WiFi link.
///
/// Must be kept alive for the connection to remain active.
pub struct EspLink {
    wifi: EspWifi<'static>,
    polls_since_connect: u32,
}

impl EspLink {
    /// Take the modem and create the WiFi driver.
    pub fn new(
        modem: impl peripheral::Peripheral<P = Modem> + 'static,
        sysloop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
    ) -> Result<Self> {
        Ok(Self {
            wifi: EspWifi::new(modem, sysloop, nvs)?,
            polls_since_connect: 0,
        })
    }

    /// Release the underlying driver.
    pub fn into_inner(self) -> EspWifi<'static> {
        self.wifi
    }
}

impl NetworkLink for EspLink {
    type Error = anyhow::Error;

    fn begin(&mut self, network: &NetworkConfig) -> Result<()> {
        let auth_method = if network.passphrase.is_empty() {
            info!("WiFi password is empty, using open network");
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };

        self.wifi
            .set_configuration(&Configuration::Client(ClientConfiguration {
                ssid: network
                    .network_name
                    .as_str()
                    .try_into()
                    .map_err(|_| anyhow!("SSID too long (max 32 chars)"))?,
                password: network
                    .passphrase
                    .as_str()
                    .try_into()
                    .map_err(|_| anyhow!("Password too long (max 64 chars)"))?,
                auth_method,
                ..Default::default()
            }))?;

        self.wifi.start()?;
        self.wifi.connect()?;
        self.polls_since_connect = 0;
        Ok(())
    }

    fn status(&mut self) -> LinkStatus {
        match (self.wifi.is_connected(), self.wifi.is_up()) {
            (_, Ok(true)) => LinkStatus::Connected,
            (Ok(true), _) => LinkStatus::WaitingForIp,
            (Ok(false), _) => {
                self.polls_since_connect += 1;
                if self.polls_since_connect >= POLLS_PER_RECONNECT {
                    self.polls_since_connect = 0;
                    debug!("Station not associated, retrying");
                    if let Err(e) = self.wifi.connect() {
                        debug!("connect() refused: {}", e);
                    }
                }
                LinkStatus::Connecting
            }
            (Err(e), _) => {
                warn!("WiFi status unavailable: {}", e);
                LinkStatus::Disconnected
            }
        }
    }

    fn local_addr(&self) -> Option<IpAddr> {
        let ip_info = self.wifi.sta_netif().get_ip_info().ok()?;
        Some(IpAddr::V4(ip_info.ip))
    }
}
