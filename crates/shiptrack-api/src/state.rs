//! Shared application state.

use std::sync::Arc;

use shiptrack_core::clock::Clock;
use shiptrack_core::id::IdGenerator;
use shiptrack_core::repository::EventRepository;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Source of `createdAt` and of "now" for timestamp validation.
    pub clock: Arc<dyn Clock>,
    /// Source of event identifiers.
    pub ids: Arc<dyn IdGenerator>,
    /// Event store handle.
    pub event_repository: Arc<dyn EventRepository>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        event_repository: Arc<dyn EventRepository>,
    ) -> Self {
        Self {
            clock,
            ids,
            event_repository,
        }
    }
}
