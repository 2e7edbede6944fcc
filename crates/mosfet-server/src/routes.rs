//! HTTP routes for the command server.
//!
//! One route per [`Command`], registered for every method. Unmatched paths
//! fall through to axum's default 404.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use mosfet_core::{Command, CommandServer, DigitalOutput, Reply};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

/// The command server shared by all handlers.
///
/// Handlers take the lock for the whole command, so requests are serviced
/// one at a time.
pub type SharedServer<O> = Arc<Mutex<CommandServer<O>>>;

/// Create the router with both command routes.
pub fn create_router<O>(state: SharedServer<O>) -> Router
where
    O: DigitalOutput + Send + 'static,
{
    let mut router: Router<SharedServer<O>> = Router::new();
    for command in Command::ALL {
        router = router.route(
            command.path(),
            any(move |State(state): State<SharedServer<O>>| command_handler(state, command)),
        );
    }
    router.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn command_handler<O: DigitalOutput>(state: SharedServer<O>, command: Command) -> Response {
    let reply = state.lock().await.handle(command);
    reply_response(reply)
}

/// Convert a fixed reply into an axum response.
pub fn reply_response(reply: Reply) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, reply.content_type)], reply.body).into_response()
}
