//! Test repositories — mock `EventRepository` implementations for tests.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shiptrack_core::error::DomainError;
use shiptrack_core::event::{EventKey, EventStatus, ShipmentEvent};
use shiptrack_core::repository::{EventPage, EventRepository};
use uuid::Uuid;

type Partitions = BTreeMap<String, BTreeMap<Uuid, ShipmentEvent>>;

/// An in-memory partitioned event store. Events are grouped by shipment and
/// ordered by `id` inside each partition, mirroring a hash/range key table.
/// Every successful `put_event` is also recorded for later inspection.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    partitions: Mutex<Partitions>,
    written: Mutex<Vec<ShipmentEvent>>,
}

impl InMemoryEventRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-loaded with `events`. Seeded events are not
    /// counted as writes.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_events(events: Vec<ShipmentEvent>) -> Self {
        let repo = Self::new();
        {
            let mut partitions = repo.partitions.lock().unwrap();
            for event in events {
                partitions
                    .entry(event.shipment_id.clone())
                    .or_default()
                    .insert(event.id, event);
            }
        }
        repo
    }

    /// Returns a snapshot of all events written through `put_event`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn written_events(&self) -> Vec<ShipmentEvent> {
        self.written.lock().unwrap().clone()
    }

    /// Returns the number of stored events for a shipment.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn partition_len(&self, shipment_id: &str) -> usize {
        self.partitions
            .lock()
            .unwrap()
            .get(shipment_id)
            .map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn find_events_by_status_and_timestamp(
        &self,
        shipment_id: &str,
        status: EventStatus,
        timestamp: DateTime<Utc>,
    ) -> Result<Vec<ShipmentEvent>, DomainError> {
        let partitions = self.partitions.lock().unwrap();
        Ok(partitions
            .get(shipment_id)
            .map(|partition| {
                partition
                    .values()
                    .filter(|e| e.status == status && e.timestamp == timestamp)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn put_event(&self, event: &ShipmentEvent) -> Result<(), DomainError> {
        self.partitions
            .lock()
            .unwrap()
            .entry(event.shipment_id.clone())
            .or_default()
            .insert(event.id, event.clone());
        self.written.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn query_events(
        &self,
        shipment_id: &str,
        limit: u32,
        exclusive_start_key: Option<&EventKey>,
    ) -> Result<EventPage, DomainError> {
        let partitions = self.partitions.lock().unwrap();
        let Some(partition) = partitions.get(shipment_id) else {
            return Ok(EventPage::default());
        };

        let lower = exclusive_start_key.map_or(Bound::Unbounded, |key| Bound::Excluded(key.id));
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let mut events: Vec<ShipmentEvent> = partition
            .range((lower, Bound::Unbounded))
            .map(|(_, e)| e.clone())
            .take(limit.saturating_add(1))
            .collect();

        let last_evaluated_key = if events.len() > limit {
            events.truncate(limit);
            events.last().map(ShipmentEvent::key)
        } else {
            None
        };

        Ok(EventPage {
            events,
            last_evaluated_key,
        })
    }

    async fn load_events(&self, shipment_id: &str) -> Result<Vec<ShipmentEvent>, DomainError> {
        Ok(self
            .partitions
            .lock()
            .unwrap()
            .get(shipment_id)
            .map(|partition| partition.values().cloned().collect())
            .unwrap_or_default())
    }
}

/// The kind of failure a [`FailingEventRepository`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Reports `DomainError::StoreUnavailable`.
    Unavailable,
    /// Reports `DomainError::InvalidQuery`.
    InvalidQuery,
    /// Reports `DomainError::Internal`.
    Internal,
}

/// An event repository whose every operation fails. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingEventRepository(pub Failure);

impl FailingEventRepository {
    /// A repository whose backing table is missing.
    #[must_use]
    pub fn unavailable() -> Self {
        Self(Failure::Unavailable)
    }

    /// A repository that rejects every query as malformed.
    #[must_use]
    pub fn invalid_query() -> Self {
        Self(Failure::InvalidQuery)
    }

    /// A repository that fails with an unclassified error.
    #[must_use]
    pub fn internal() -> Self {
        Self(Failure::Internal)
    }

    fn error(&self) -> DomainError {
        match self.0 {
            Failure::Unavailable => {
                DomainError::StoreUnavailable("relation \"shipment_events\" does not exist".into())
            }
            Failure::InvalidQuery => {
                DomainError::InvalidQuery("invalid input syntax for type uuid".into())
            }
            Failure::Internal => DomainError::Internal("connection reset by peer".into()),
        }
    }
}

#[async_trait]
impl EventRepository for FailingEventRepository {
    async fn find_events_by_status_and_timestamp(
        &self,
        _shipment_id: &str,
        _status: EventStatus,
        _timestamp: DateTime<Utc>,
    ) -> Result<Vec<ShipmentEvent>, DomainError> {
        Err(self.error())
    }

    async fn put_event(&self, _event: &ShipmentEvent) -> Result<(), DomainError> {
        Err(self.error())
    }

    async fn query_events(
        &self,
        _shipment_id: &str,
        _limit: u32,
        _exclusive_start_key: Option<&EventKey>,
    ) -> Result<EventPage, DomainError> {
        Err(self.error())
    }

    async fn load_events(&self, _shipment_id: &str) -> Result<Vec<ShipmentEvent>, DomainError> {
        Err(self.error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(shipment_id: &str, id: u128, hour: u32) -> ShipmentEvent {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap();
        ShipmentEvent {
            id: Uuid::from_u128(id),
            shipment_id: shipment_id.to_owned(),
            timestamp: ts,
            status: EventStatus::InTransit,
            location: None,
            details: EventStatus::InTransit.description().to_owned(),
            created_at: ts,
        }
    }

    #[tokio::test]
    async fn test_query_events_pages_in_id_order_within_partition() {
        // Arrange
        let repo = InMemoryEventRepository::with_events(vec![
            event("SHIP-000003", 3, 1),
            event("SHIP-000001", 1, 3),
            event("OTHER-SHIPMENT", 9, 0),
            event("SHIP-000001", 2, 2),
        ]);
        let repo_ref: &dyn EventRepository = &repo;

        // Act
        let first = repo_ref.query_events("SHIP-000001", 1, None).await.unwrap();
        let second = repo_ref
            .query_events("SHIP-000001", 1, first.last_evaluated_key.as_ref())
            .await
            .unwrap();

        // Assert
        assert_eq!(first.events.len(), 1);
        assert_eq!(first.events[0].id, Uuid::from_u128(1));
        assert!(first.last_evaluated_key.is_some());
        assert_eq!(second.events.len(), 1);
        assert_eq!(second.events[0].id, Uuid::from_u128(2));
        assert!(second.last_evaluated_key.is_none());
    }

    #[tokio::test]
    async fn test_query_events_on_unknown_partition_is_empty() {
        let repo = InMemoryEventRepository::new();

        let page = repo.query_events("UNKNOWN", 50, None).await.unwrap();

        assert!(page.events.is_empty());
        assert!(page.last_evaluated_key.is_none());
    }

    #[tokio::test]
    async fn test_failing_repository_reports_configured_error() {
        let repo = FailingEventRepository::unavailable();

        let result = repo.load_events("SHIP-000001").await;

        assert!(matches!(result, Err(DomainError::StoreUnavailable(_))));
    }
}
