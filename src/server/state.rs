// src/server/state.rs

//! Application state for the relay server.
//!
//! Bundles the process-wide registries and the id source. Constructed once
//! in `main` and injected into the listener and every session via `Arc`;
//! no component reaches for ambient global state.

use std::sync::Arc;

use super::ids::IdGenerator;
use super::lobby::LobbyRegistry;
use super::registry::SessionRegistry;

/// Shared application state, injected into the listener and sessions.
pub struct AppState {
    /// Strictly increasing id source shared by sessions and lobbies.
    pub ids: Arc<IdGenerator>,
    /// Session id → data queue handle.
    pub sessions: SessionRegistry,
    /// Lobby table and matchmaking.
    pub lobbies: LobbyRegistry,
}

impl AppState {
    pub fn new() -> Self {
        let ids = Arc::new(IdGenerator::new());
        AppState {
            sessions: SessionRegistry::new(),
            lobbies: LobbyRegistry::new(ids.clone()),
            ids,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
