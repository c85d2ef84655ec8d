//! Identifier generation abstraction for determinism.
//!
//! In production, events receive random v4 UUIDs. In tests, a sequence of
//! known identifiers is injected so that sort-key order is predictable.

use uuid::Uuid;

/// Abstraction over event identifier generation.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh, globally unique identifier.
    fn next_id(&self) -> Uuid;
}

/// Production generator backed by random v4 UUIDs.
#[derive(Debug, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}
