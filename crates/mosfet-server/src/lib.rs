//! # mosfet-server
//!
//! Host implementation of the command server.
//!
//! Serves the two fixed routes over axum and provides host stand-ins for the
//! hardware: a network link that reports the machine's own address and a gate
//! output that only logs. The routing and switch logic comes from
//! `mosfet-core` and is the same code the ESP32 firmware runs.

pub mod host;
pub mod routes;
pub mod server;

pub use mosfet_core::{Command, CommandServer, DigitalOutput, Level};
pub use routes::{create_router, reply_response, SharedServer};
pub use server::{ServerConfig, SwitchServer};
