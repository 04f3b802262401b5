use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use bytes::Bytes;
use thiserror::Error;

/// Returned by `push` when the queue is at capacity. The payload is not
/// enqueued and existing contents are untouched.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("data queue is full")]
pub struct QueueFull;

/// Bounded FIFO of binary payloads staged for peers to collect.
///
/// Each session owns exactly one. The owner pushes and clears; peer
/// sessions pop and poll emptiness from their own threads of control, so
/// every operation takes the internal lock.
#[derive(Debug)]
pub struct DataQueue {
    items: Mutex<VecDeque<Bytes>>,
    capacity: usize,
}

impl DataQueue {
    pub fn new(capacity: usize) -> Self {
        DataQueue {
            items: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Bytes>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a payload, failing explicitly when the queue is full.
    pub fn push(&self, payload: Bytes) -> Result<(), QueueFull> {
        let mut items = self.lock();
        if items.len() >= self.capacity {
            return Err(QueueFull);
        }
        items.push_back(payload);
        Ok(())
    }

    /// Pop the oldest payload, or None when empty.
    pub fn pop(&self) -> Option<Bytes> {
        self.lock().pop_front()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }
}
