//! Test id generator — deterministic `IdGenerator` implementation for tests.

use std::sync::atomic::{AtomicU64, Ordering};

use shiptrack_core::id::IdGenerator;
use uuid::Uuid;

/// A generator that hands out `00000000-0000-0000-0000-000000000001`,
/// `...0002`, and so on. Ids therefore sort in the order they were issued,
/// which makes the repository's native order predictable in tests.
#[derive(Debug)]
pub struct SequenceIdGenerator {
    next: AtomicU64,
}

impl SequenceIdGenerator {
    /// Create a generator whose first id is `start`.
    #[must_use]
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    /// Create a generator whose first id is `1`.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(1)
    }
}

impl Default for SequenceIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn next_id(&self) -> Uuid {
        Uuid::from_u128(u128::from(self.next.fetch_add(1, Ordering::SeqCst)))
    }
}
