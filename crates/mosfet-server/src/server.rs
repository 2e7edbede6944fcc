//! Command server runner.
//!
//! Binds the listener and serves the router until the task is dropped.

use std::net::SocketAddr;
use std::sync::Arc;

use mosfet_core::{CommandServer, DigitalOutput};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::info;

use crate::routes::{create_router, SharedServer};

/// Configuration for the command server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 80)),
        }
    }
}

impl ServerConfig {
    /// Listen on all interfaces at `port`.
    pub fn with_port(port: u16) -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], port)),
        }
    }
}

/// The HTTP command server.
pub struct SwitchServer<O> {
    config: ServerConfig,
    state: SharedServer<O>,
}

impl<O> SwitchServer<O>
where
    O: DigitalOutput + Send + 'static,
{
    /// Create a server driving `output`. The gate is deasserted here.
    pub fn new(config: ServerConfig, output: O) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(CommandServer::new(output))),
        }
    }

    /// Shared handle to the command server, for inspection.
    pub fn state(&self) -> SharedServer<O> {
        self.state.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Bind the configured address and serve forever.
    pub async fn run(self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.run_on(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn run_on(self, listener: TcpListener) -> std::io::Result<()> {
        info!("Server started on {}", listener.local_addr()?);
        axum::serve(listener, create_router(self.state)).await
    }
}
