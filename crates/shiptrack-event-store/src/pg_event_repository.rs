//! `PostgreSQL` implementation of the `EventRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use shiptrack_core::error::DomainError;
use shiptrack_core::event::{EventKey, EventStatus, ShipmentEvent};
use shiptrack_core::repository::{EventPage, EventRepository};

const SELECT_COLUMNS: &str =
    "SELECT id, shipment_id, occurred_at, status, location, details, created_at FROM shipment_events";

// SQLSTATE codes treated as "the store is not there".
const UNDEFINED_TABLE: &str = "42P01";
const INVALID_CATALOG_NAME: &str = "3D000";
// SQLSTATE class 22: data exception (bad parameter values).
const DATA_EXCEPTION_CLASS: &str = "22";

/// PostgreSQL-backed event repository.
#[derive(Debug, Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    /// Creates a new `PgEventRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ShipmentEventRow {
    id: Uuid,
    shipment_id: String,
    occurred_at: DateTime<Utc>,
    status: String,
    location: Option<String>,
    details: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ShipmentEventRow> for ShipmentEvent {
    type Error = DomainError;

    fn try_from(row: ShipmentEventRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<EventStatus>()
            .map_err(|e| DomainError::Internal(format!("corrupt event row {}: {e}", row.id)))?;
        Ok(ShipmentEvent {
            id: row.id,
            shipment_id: row.shipment_id,
            timestamp: row.occurred_at,
            status,
            location: row.location,
            details: row.details,
            created_at: row.created_at,
        })
    }
}

fn into_events(rows: Vec<ShipmentEventRow>) -> Result<Vec<ShipmentEvent>, DomainError> {
    rows.into_iter().map(ShipmentEvent::try_from).collect()
}

/// Maps a driver error onto the domain taxonomy by a fixed set of known
/// conditions. Anything unrecognised becomes `DomainError::Internal`.
fn map_sqlx_error(err: sqlx::Error) -> DomainError {
    error!(error = %err, "event store operation failed");
    match &err {
        sqlx::Error::Database(db) => {
            map_sqlstate(db.code().as_deref(), db.message()).unwrap_or_else(|| {
                DomainError::Internal(err.to_string())
            })
        }
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => DomainError::StoreUnavailable(err.to_string()),
        _ => DomainError::Internal(err.to_string()),
    }
}

fn map_sqlstate(code: Option<&str>, message: &str) -> Option<DomainError> {
    match code? {
        UNDEFINED_TABLE | INVALID_CATALOG_NAME => {
            Some(DomainError::StoreUnavailable(message.to_owned()))
        }
        code if code.starts_with(DATA_EXCEPTION_CLASS) => {
            Some(DomainError::InvalidQuery(message.to_owned()))
        }
        _ => None,
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn find_events_by_status_and_timestamp(
        &self,
        shipment_id: &str,
        status: EventStatus,
        timestamp: DateTime<Utc>,
    ) -> Result<Vec<ShipmentEvent>, DomainError> {
        let rows: Vec<ShipmentEventRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} WHERE shipment_id = $1 AND status = $2 AND occurred_at = $3"
        ))
        .bind(shipment_id)
        .bind(status.as_str())
        .bind(timestamp)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        into_events(rows)
    }

    async fn put_event(&self, event: &ShipmentEvent) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO shipment_events \
             (shipment_id, id, occurred_at, status, location, details, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&event.shipment_id)
        .bind(event.id)
        .bind(event.timestamp)
        .bind(event.status.as_str())
        .bind(event.location.as_deref())
        .bind(&event.details)
        .bind(event.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn query_events(
        &self,
        shipment_id: &str,
        limit: u32,
        exclusive_start_key: Option<&EventKey>,
    ) -> Result<EventPage, DomainError> {
        // One extra row tells us whether another page exists.
        let rows: Vec<ShipmentEventRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} WHERE shipment_id = $1 AND ($2::uuid IS NULL OR id > $2) \
             ORDER BY id LIMIT $3"
        ))
        .bind(shipment_id)
        .bind(exclusive_start_key.map(|key| key.id))
        .bind(i64::from(limit) + 1)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let mut events = into_events(rows)?;
        let page_len = usize::try_from(limit).unwrap_or(usize::MAX);
        let last_evaluated_key = if events.len() > page_len {
            events.truncate(page_len);
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
        let rows: Vec<ShipmentEventRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE shipment_id = $1 ORDER BY id"))
                .bind(shipment_id)
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        into_events(rows)
    }
}
