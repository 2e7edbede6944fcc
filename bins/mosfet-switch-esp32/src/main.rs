//! MOSFET switch firmware for ESP32.
//!
//! Joins the configured WiFi network, then serves `/on` and `/off` on port 80,
//! driving the MOSFET gate on GPIO5.
//!
//! Build with the ESP32 Rust toolchain and the credentials in the environment:
//!
//! ```text
//! WIFI_SSID=workshop WIFI_PASS=secret cargo build --release
//! ```

use std::time::Duration;

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use mosfet_core::{join_network, CommandServer, JoinPolicy};
use mosfet_esp32::{config, gpio::GatePin, http, wifi::EspLink};

fn main() -> anyhow::Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    let config = config::build_config()?;

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // Drive the gate low before the radio comes up.
    let gate = GatePin::new(peripherals.pins.gpio5)?;
    let commands = CommandServer::new(gate);

    let mut link = EspLink::new(peripherals.modem, sysloop, Some(nvs))?;
    join_network(
        &mut link,
        &config.network,
        &JoinPolicy::from(&config.join),
        std::thread::sleep,
    )?;

    let _server = http::start_server(config.http_port, commands)?;
    let _wifi = link.into_inner();

    // httpd serves from its own task; park the main task and keep the
    // server and WiFi driver alive.
    loop {
        std::thread::sleep(Duration::from_secs(60));
    }
}
