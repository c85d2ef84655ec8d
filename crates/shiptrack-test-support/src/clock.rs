//! Test clock — deterministic `Clock` implementation for tests.

use chrono::{DateTime, Utc};
use shiptrack_core::clock::Clock;

/// A clock pinned to one instant. Both `createdAt` stamps and the accepted
/// timestamp window are then reproducible.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
