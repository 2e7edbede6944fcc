//! # mosfet-core
//!
//! Core model of a network-controlled MOSFET gate switch.
//!
//! This crate provides:
//! - The gate level model and the `DigitalOutput` capability
//! - The two fixed commands (`/on`, `/off`) and their replies
//! - The command server that dispatches request paths to the switch
//! - The network join phase, independent of any WiFi driver
//! - Configuration types shared by every target
//!
//! This crate is intentionally runtime-agnostic and contains no async code,
//! making it usable on both Linux (tokio) and ESP32 (esp-idf) targets.

pub mod command;
pub mod config;
pub mod join;
pub mod output;
pub mod switch;

pub use command::{Command, Dispatch, Reply};
pub use config::{ConfigError, JoinSettings, NetworkConfig, SwitchConfig};
pub use join::{join_network, JoinError, JoinPolicy, JoinedNetwork, LinkStatus, NetworkLink};
pub use output::{DigitalOutput, Level, MockOutput};
pub use switch::{CommandServer, GateSwitch};
