//! Network join phase.
//!
//! Runs once at startup, before the command server accepts connections.
//! The default policy waits forever: with wrong credentials the device sits in
//! the wait loop and never serves. A bounded policy can be opted into through
//! configuration.

use log::{debug, info, warn};
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;

use crate::config::{JoinSettings, NetworkConfig};

/// Link state as reported by the WiFi stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// Not connected to any network.
    Disconnected,
    /// Connecting to network.
    Connecting,
    /// Connected but waiting for IP.
    WaitingForIp,
    /// Fully connected with IP address.
    Connected,
}

/// A wireless link that can be asked to associate and polled for status.
pub trait NetworkLink {
    type Error: fmt::Display;

    /// Start association with the given network. Must not block until connected.
    fn begin(&mut self, network: &NetworkConfig) -> Result<(), Self::Error>;

    /// Current link status.
    fn status(&mut self) -> LinkStatus;

    /// Address assigned to this station, once connected.
    fn local_addr(&self) -> Option<IpAddr>;
}

/// Errors that end the join phase.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JoinError {
    #[error("link error: {0}")]
    Link(String),

    #[error("network not joined after {attempts} polls")]
    TimedOut { attempts: u32 },
}

/// How the join phase waits for the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinPolicy {
    /// Pause between two status polls.
    pub poll_interval: Duration,
    /// Give up after this many unsuccessful polls. `None` waits forever.
    pub max_attempts: Option<u32>,
}

impl Default for JoinPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            max_attempts: None,
        }
    }
}

impl From<&JoinSettings> for JoinPolicy {
    fn from(settings: &JoinSettings) -> Self {
        Self {
            poll_interval: Duration::from_millis(settings.poll_interval_ms),
            max_attempts: settings.max_attempts,
        }
    }
}

/// Result of a completed join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinedNetwork {
    /// Assigned address. Diagnostic only.
    pub address: Option<IpAddr>,
    /// Polls that found the link not yet connected.
    pub attempts: u32,
}

/// Associate with `network` and block until the link reports connected.
///
/// `sleep` is called with the poll interval between polls, which keeps the
/// loop independent of the platform's delay primitive.
pub fn join_network<L, S>(
    link: &mut L,
    network: &NetworkConfig,
    policy: &JoinPolicy,
    mut sleep: S,
) -> Result<JoinedNetwork, JoinError>
where
    L: NetworkLink,
    S: FnMut(Duration),
{
    info!("Connecting to '{}'...", network.network_name);
    link.begin(network)
        .map_err(|e| JoinError::Link(e.to_string()))?;

    let mut attempts: u32 = 0;
    let mut last_status = None;

    loop {
        let status = link.status();
        if status == LinkStatus::Connected {
            break;
        }
        if last_status != Some(status) {
            info!("Link status: {:?}", status);
            last_status = Some(status);
        }

        attempts = attempts.saturating_add(1);
        if let Some(max) = policy.max_attempts {
            if attempts >= max {
                warn!("Giving up on '{}' after {} polls", network.network_name, attempts);
                return Err(JoinError::TimedOut { attempts });
            }
        }

        debug!("Waiting for network (poll {})", attempts);
        sleep(policy.poll_interval);
    }

    let address = link.local_addr();
    info!("WiFi connected!");
    match address {
        Some(ip) => info!("  IP address: {}", ip),
        None => info!("  IP address: unknown"),
    }

    Ok(JoinedNetwork { address, attempts })
}
