use std::sync::atomic::{AtomicU64, Ordering};

/// First id handed out.
const FIRST_ID: u64 = 1_001_001;

/// Issues process-lifetime unique, strictly increasing ids.
///
/// One instance serves both sessions and lobbies, so an id is never reused
/// across either namespace. Safe to call from any number of threads.
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        IdGenerator {
            next: AtomicU64::new(FIRST_ID),
        }
    }

    pub fn generate(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
