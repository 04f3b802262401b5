//! Main entry point for the relay server.
//!
//! Initializes logging, builds the shared application state, and runs the
//! TCP listener that spawns one session actor per client connection.

use std::net::SocketAddr;
use std::sync::Arc;

use server::listener::Listener;
use server::state::AppState;

pub mod config;
mod protocol;
mod server;


#[actix::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger from environment variable (default to info level).
    env_logger::init();

    // Registries and id source, shared by every session.
    let app = Arc::new(AppState::new());

    let addr = SocketAddr::new(config::server::BIND_ADDR, config::server::PORT);
    let listener = Listener::bind(addr, config::server::BACKLOG, app)?;

    listener.run().await;
    Ok(())
}
