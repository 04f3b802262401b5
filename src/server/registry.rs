use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::queue::DataQueue;

/// Process-wide session table: session id → shared handle to that
/// session's data queue.
///
/// Lets a session resolve and pop a lobby peer's queue by id without any
/// direct reference to the peer being passed around. Sessions register on
/// connect and deregister during teardown.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<u64, Arc<DataQueue>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        SessionRegistry {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn register(&self, session_id: u64, queue: Arc<DataQueue>) {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session_id, queue);
    }

    pub fn deregister(&self, session_id: u64) {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&session_id);
    }

    pub fn queue_of(&self, session_id: u64) -> Option<Arc<DataQueue>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&session_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
