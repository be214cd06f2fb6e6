//! Order id generation

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of fresh order ids
pub trait IdGenerator: Send + Sync {
    /// Produce an id never returned before by this generator
    fn next_id(&self) -> String;
}

/// Random 32-character hex ids backed by UUID v4
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Monotonic decimal ids: "1", "2", "3", ...
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    last: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue numbering after `last`
    pub fn starting_after(last: u64) -> Self {
        Self {
            last: AtomicU64::new(last),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        (self.last.fetch_add(1, Ordering::Relaxed) + 1).to_string()
    }
}
