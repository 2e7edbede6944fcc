//! Command routes on the ESP-IDF HTTP server.
//!
//! httpd runs every handler on its own single task, so requests are already
//! serviced one at a time; the mutex only makes the shared switch `Sync`.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use embedded_svc::{http::Method, io::Write};
use esp_idf_svc::http::server::{Configuration, EspHttpServer};
use log::info;
use mosfet_core::{Command, CommandServer, DigitalOutput};

/// Methods each command route answers to. Other paths and methods get httpd's
/// default 404/405.
const ROUTED_METHODS: [Method; 5] = [
    Method::Get,
    Method::Post,
    Method::Put,
    Method::Delete,
    Method::Head,
];

/// Start the HTTP server on `port` with both command routes registered.
///
/// The returned server must be kept alive for as long as it should serve.
pub fn start_server<O>(port: u16, commands: CommandServer<O>) -> Result<EspHttpServer<'static>>
where
    O: DigitalOutput + Send + 'static,
{
    let mut server = EspHttpServer::new(&Configuration {
        http_port: port,
        ..Default::default()
    })?;
    register_routes(&mut server, Arc::new(Mutex::new(commands)))?;
    info!("Server started on port {}", port);
    Ok(server)
}

/// Register one handler per command and method.
pub fn register_routes<O>(
    server: &mut EspHttpServer<'static>,
    commands: Arc<Mutex<CommandServer<O>>>,
) -> Result<()>
where
    O: DigitalOutput + Send + 'static,
{
    for command in Command::ALL {
        for method in ROUTED_METHODS {
            let commands = commands.clone();
            server.fn_handler::<anyhow::Error, _>(command.path(), method, move |req| {
                let reply = commands
                    .lock()
                    .map_err(|_| anyhow!("command server lock poisoned"))?
                    .handle(command);
                req.into_response(reply.status, None, &[("Content-Type", reply.content_type)])?
                    .write_all(reply.body.as_bytes())?;
                Ok(())
            })?;
        }
    }
    Ok(())
}
