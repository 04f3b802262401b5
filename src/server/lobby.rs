/// Lobby bookkeeping and matchmaking.
///
/// A lobby is a capacity-bounded, join-ordered group of session ids. It
/// exists only inside the `LobbyRegistry`: created by the join that finds
/// no free slot anywhere, destroyed by the removal that empties it.
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info};

use super::ids::IdGenerator;
use crate::protocol::Role;

/// A capacity-bounded group of sessions paired for data exchange.
#[derive(Debug)]
pub struct Lobby {
    id: u64,
    capacity: usize,
    members: Vec<u64>,
}

impl Lobby {
    fn new(id: u64, capacity: usize) -> Self {
        info!("[Lobby {id}] new lobby created");
        Lobby {
            id,
            capacity,
            members: Vec::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn has_space(&self) -> bool {
        self.members.len() < self.capacity
    }

    pub fn is_full(&self) -> bool {
        !self.has_space()
    }

    pub fn members(&self) -> &[u64] {
        &self.members
    }

    fn add_member(&mut self, session_id: u64) {
        self.members.push(session_id);
        info!("[Lobby {}] session {} joined", self.id, session_id);
    }

    fn remove_member(&mut self, session_id: u64) -> bool {
        let Some(pos) = self.members.iter().position(|&id| id == session_id) else {
            return false;
        };
        self.members.remove(pos);
        info!("[Lobby {}] session {} left", self.id, session_id);
        true
    }
}

/// Outcome of a matchmaking join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LobbyAssignment {
    pub lobby_id: u64,
    pub role: Role,
    /// True when this join brought the lobby to capacity.
    pub filled: bool,
}

/// Process-wide lobby table. All mutation happens under one lock, so
/// concurrent joins can never both land in a single free slot.
///
/// Ids are strictly increasing, so iterating the map visits lobbies in
/// creation order: the oldest lobby with space always wins matchmaking.
pub struct LobbyRegistry {
    ids: Arc<IdGenerator>,
    lobbies: Mutex<BTreeMap<u64, Lobby>>,
}

impl LobbyRegistry {
    pub fn new(ids: Arc<IdGenerator>) -> Self {
        LobbyRegistry {
            ids,
            lobbies: Mutex::new(BTreeMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<u64, Lobby>> {
        self.lobbies.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Matchmake one session: add it to the oldest lobby with space as
    /// `NonHost`, or create a fresh lobby of the given capacity and add it
    /// as `Host`.
    pub fn join(&self, session_id: u64, capacity: usize) -> LobbyAssignment {
        let mut lobbies = self.lock();
        if let Some(lobby) = lobbies.values_mut().find(|lobby| lobby.has_space()) {
            lobby.add_member(session_id);
            return LobbyAssignment {
                lobby_id: lobby.id(),
                role: Role::NonHost,
                filled: lobby.is_full(),
            };
        }

        let lobby_id = self.ids.generate();
        let mut lobby = Lobby::new(lobby_id, capacity);
        lobby.add_member(session_id);
        let filled = lobby.is_full();
        lobbies.insert(lobby_id, lobby);
        LobbyAssignment {
            lobby_id,
            role: Role::Host,
            filled,
        }
    }

    /// Remove a member. A lobby emptied by the removal is deregistered.
    pub fn leave(&self, lobby_id: u64, session_id: u64) -> bool {
        let mut lobbies = self.lock();
        let Some(lobby) = lobbies.get_mut(&lobby_id) else {
            return false;
        };
        let removed = lobby.remove_member(session_id);
        if removed && lobby.members().is_empty() {
            debug!("[Lobby {lobby_id}] closing lobby");
            lobbies.remove(&lobby_id);
        }
        removed
    }

    /// Vacancy detection used by the data-exchange commands: when the
    /// lobby currently has a free slot (a peer departed), the caller is
    /// removed from it and true is returned. Check and removal happen
    /// under the same lock.
    pub fn evict_if_vacant(&self, lobby_id: u64, session_id: u64) -> bool {
        let mut lobbies = self.lock();
        let Some(lobby) = lobbies.get_mut(&lobby_id) else {
            return true;
        };
        if !lobby.has_space() {
            return false;
        }
        lobby.remove_member(session_id);
        if lobby.members().is_empty() {
            debug!("[Lobby {lobby_id}] closing lobby");
            lobbies.remove(&lobby_id);
        }
        true
    }

    pub fn has_space(&self, lobby_id: u64) -> bool {
        self.lock()
            .get(&lobby_id)
            .map(Lobby::has_space)
            .unwrap_or(true)
    }

    /// Member ids of a lobby in join order, empty if the lobby is gone.
    pub fn members(&self, lobby_id: u64) -> Vec<u64> {
        self.lock()
            .get(&lobby_id)
            .map(|lobby| lobby.members().to_vec())
            .unwrap_or_default()
    }

    /// Members of a lobby other than the given session.
    pub fn peers_of(&self, lobby_id: u64, session_id: u64) -> Vec<u64> {
        let mut members = self.members(lobby_id);
        members.retain(|&id| id != session_id);
        members
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
