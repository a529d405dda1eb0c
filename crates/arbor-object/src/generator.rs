use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Source of raw id tokens for newly allocated entities.
///
/// The repository namespaces every token it draws; the generator's only
/// obligation is uniqueness across the lifetime of the backing store it
/// feeds. The repository never deduplicates.
pub trait IdGenerator: Send + Sync {
    /// Produce the next raw token.
    fn next_token(&self) -> String;
}

/// Default generator: UUID v7 tokens.
///
/// Time-ordered and collision-free across restarts, so it is safe over
/// persistent backing stores.
#[derive(Debug, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_token(&self) -> String {
        Uuid::now_v7().to_string()
    }
}

/// Counting generator: `"1"`, `"2"`, `"3"`, ...
///
/// For tests and deterministic wiring over fresh stores only; reusing
/// it over an existing store re-issues tokens.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    /// Start counting at 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Start counting at `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_token(&self) -> String {
        self.next.fetch_add(1, Ordering::Relaxed).to_string()
    }
}
