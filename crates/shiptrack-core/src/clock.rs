//! Clock abstraction for determinism.
//!
//! The clock stamps `createdAt` on every written event and anchors the
//! accepted timestamp window during validation.

use chrono::{DateTime, Utc};

/// Abstraction over wall-clock time.
pub trait Clock: Send + Sync {
    /// Returns the current time in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
