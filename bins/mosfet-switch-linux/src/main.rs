use std::path::{Path, PathBuf};

use mosfet_core::{join_network, JoinPolicy, SwitchConfig};
use mosfet_server::host::{HostLink, SimulatedGate};
use mosfet_server::{ServerConfig, SwitchServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Config file read when `MOSFET_SWITCH_CONFIG` is not set.
const DEFAULT_CONFIG_FILE: &str = "mosfet-switch.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,mosfet_server=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("MOSFET switch starting...");

    let config = load_config()?;
    tracing::info!(
        "Network '{}', gate on GPIO{}, port {}",
        config.network.network_name,
        config.gate_pin,
        config.http_port
    );

    // Network join must complete before the listener is bound.
    let policy = JoinPolicy::from(&config.join);
    let network = config.network.clone();
    let joined = tokio::task::spawn_blocking(move || {
        let mut link = HostLink::new();
        join_network(&mut link, &network, &policy, std::thread::sleep)
    })
    .await??;

    let server = SwitchServer::new(
        ServerConfig::with_port(config.http_port),
        SimulatedGate::new(config.gate_pin),
    );

    if let Some(ip) = joined.address {
        tracing::info!("Try these commands:");
        tracing::info!("   curl http://{}:{}/on", ip, config.http_port);
        tracing::info!("   curl http://{}:{}/off", ip, config.http_port);
    }

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        result = server.run() => {
            if let Err(e) = result {
                tracing::error!("HTTP server error: {}", e);
                return Err(e.into());
            }
            tracing::warn!("HTTP server stopped");
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Load configuration from `$MOSFET_SWITCH_CONFIG`, the default file, or the
/// built-in defaults, in that order.
fn load_config() -> anyhow::Result<SwitchConfig> {
    if let Some(path) = std::env::var_os("MOSFET_SWITCH_CONFIG") {
        let path = PathBuf::from(path);
        tracing::info!("Loading configuration from {}", path.display());
        return Ok(SwitchConfig::load(&path)?);
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        tracing::info!("Loading configuration from {}", default_path.display());
        return Ok(SwitchConfig::load(default_path)?);
    }

    tracing::warn!("No configuration file found, using defaults");
    let mut config = SwitchConfig::default();
    config.network.network_name = "simulated".to_string();
    config.http_port = 8080;
    config.validate()?;
    Ok(config)
}
