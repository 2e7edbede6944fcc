//! Host stand-ins for the device hardware.
//!
//! Lets the command server run on a development machine with the same HTTP
//! contract as the firmware.

use std::convert::Infallible;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use mosfet_core::{DigitalOutput, Level, LinkStatus, NetworkConfig, NetworkLink};
use tracing::{debug, info};

/// Gate output that logs every write instead of driving a pin.
#[derive(Debug, Clone)]
pub struct SimulatedGate {
    pin: u8,
}

impl SimulatedGate {
    pub fn new(pin: u8) -> Self {
        Self { pin }
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }
}

impl DigitalOutput for SimulatedGate {
    fn write(&mut self, level: Level) {
        let signal = if level.is_asserted() { "HIGH" } else { "LOW" };
        info!("GPIO{} <- {}", self.pin, signal);
    }
}

/// Network link backed by the host's existing connectivity.
///
/// The host is already on a network, so the link is connected as soon as
/// association has been requested. The reported address is the interface
/// the host would route outbound traffic through.
#[derive(Debug, Default)]
pub struct HostLink {
    begun: bool,
}

impl HostLink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NetworkLink for HostLink {
    type Error = Infallible;

    fn begin(&mut self, network: &NetworkConfig) -> Result<(), Infallible> {
        debug!(
            "Host link: treating '{}' as already joined",
            network.network_name
        );
        self.begun = true;
        Ok(())
    }

    fn status(&mut self) -> LinkStatus {
        if self.begun {
            LinkStatus::Connected
        } else {
            LinkStatus::Disconnected
        }
    }

    fn local_addr(&self) -> Option<IpAddr> {
        if !self.begun {
            return None;
        }
        Some(outbound_addr().unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)))
    }
}

/// Address of the interface used for outbound traffic.
///
/// Connecting a UDP socket only selects a route; no packet is sent.
fn outbound_addr() -> Option<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect((Ipv4Addr::new(192, 0, 2, 1), 9)).ok()?;
    socket.local_addr().ok().map(|addr| addr.ip())
}
