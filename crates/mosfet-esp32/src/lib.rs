//! ESP32-specific components for the MOSFET switch.
//!
//! This crate provides the hardware side of the switch:
//! - WiFi station link for the network join phase
//! - Gate output over a GPIO pin driver
//! - Route registration on the ESP-IDF HTTP server
//! - Compile-time configuration
//!
//! # Example
//!
//! ```ignore
//! use mosfet_esp32::{config, gpio::GatePin, http, wifi::EspLink};
//!
//! let config = config::build_config()?;
//! let mut link = EspLink::new(peripherals.modem, sysloop, Some(nvs))?;
//! join_network(&mut link, &config.network, &policy, std::thread::sleep)?;
//!
//! let gate = GatePin::new(peripherals.pins.gpio5)?;
//! let server = http::start_server(config.http_port, CommandServer::new(gate))?;
//! ```

pub mod config;
pub mod gpio;
pub mod http;
pub mod wifi;
