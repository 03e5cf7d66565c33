//! Element id generation behind an injectable abstraction, so tests
//! can supply deterministic ids.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Source of unique element ids for an extraction run.
///
/// Ids must be collision-free within a run; generators shared across
/// concurrently running passes must stay collision-free across them too.
pub trait IdGenerator {
    fn next_id(&self) -> String;
}

/// Production generator: random v4 uuids, unique across runs and
/// processes without coordination.
#[derive(Debug, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic generator for tests: a monotonic counter.
///
/// Atomic so a single instance shared between runs still never repeats.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts counting from `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            counter: AtomicU64::new(first),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        self.counter.fetch_add(1, Ordering::Relaxed).to_string()
    }
}
