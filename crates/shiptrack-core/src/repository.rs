//! Event repository abstraction.
//!
//! The repository models a partitioned key-value store: every event lives
//! under its shipment's partition and is ordered within it by `id`. That
//! native order is not chronological; callers sort by `timestamp` themselves.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::event::{EventKey, EventStatus, ShipmentEvent};

/// One page of a partition scan.
#[derive(Debug, Clone, Default)]
pub struct EventPage {
    /// Events in native (ascending `id`) order.
    pub events: Vec<ShipmentEvent>,
    /// Key of the last event returned, present only when more events follow.
    pub last_evaluated_key: Option<EventKey>,
}

/// Repository trait for appending and reading shipment events.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Returns every event of the shipment with exactly this status and
    /// occurrence time. Used for duplicate detection before a write.
    async fn find_events_by_status_and_timestamp(
        &self,
        shipment_id: &str,
        status: EventStatus,
        timestamp: DateTime<Utc>,
    ) -> Result<Vec<ShipmentEvent>, DomainError>;

    /// Persists a new event under `(shipment_id, id)`.
    async fn put_event(&self, event: &ShipmentEvent) -> Result<(), DomainError>;

    /// Reads up to `limit` events of the shipment in native order, starting
    /// strictly after `exclusive_start_key` when one is given.
    async fn query_events(
        &self,
        shipment_id: &str,
        limit: u32,
        exclusive_start_key: Option<&EventKey>,
    ) -> Result<EventPage, DomainError>;

    /// Loads every event of the shipment in native order.
    async fn load_events(&self, shipment_id: &str) -> Result<Vec<ShipmentEvent>, DomainError>;
}
