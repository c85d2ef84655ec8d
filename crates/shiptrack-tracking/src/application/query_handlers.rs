//! Query handlers for the Shipment Tracking context.
//!
//! This module contains query handlers that read a shipment's partition and
//! return either its most recent event or one page of its history.

use shiptrack_core::error::DomainError;
use shiptrack_core::event::ShipmentEvent;
use shiptrack_core::repository::EventRepository;
use tracing::debug;

use crate::application::pagination::{decode_cursor, encode_cursor};
use crate::domain::queries::GetEventHistory;
use crate::domain::validation::{validate_query_params, validate_shipment_id_field};

/// One page of a shipment's event history.
#[derive(Debug, Clone)]
pub struct EventHistoryPage {
    /// Events of this page, ascending by `timestamp`.
    pub events: Vec<ShipmentEvent>,
    /// Whether another page follows.
    pub has_more: bool,
    /// Opaque cursor for the next page, present iff `has_more`.
    pub next_key: Option<String>,
}

fn ensure_valid_shipment_id(shipment_id: &str) -> Result<(), DomainError> {
    let errors = validate_shipment_id_field(shipment_id);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation(errors))
    }
}

/// Retrieves the most recent event of a shipment.
///
/// The latest event is the one with the greatest `timestamp`; ties are
/// broken by the later `created_at`, then by the greater `id`.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a malformed shipment id,
/// `DomainError::NotFound` if the shipment has no events, and any store
/// error unchanged.
pub async fn get_latest_event(
    shipment_id: &str,
    repo: &dyn EventRepository,
) -> Result<ShipmentEvent, DomainError> {
    ensure_valid_shipment_id(shipment_id)?;

    let events = repo.load_events(shipment_id).await?;
    debug!(shipment_id, count = events.len(), "loaded shipment partition");

    events
        .into_iter()
        .max_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        })
        .ok_or_else(|| DomainError::NotFound(shipment_id.to_owned()))
}

/// Retrieves one page of a shipment's event history.
///
/// The page is read in the store's native order and then sorted by
/// `timestamp`. The sort is page-local; ordering across pages follows the
/// store's key order.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a malformed shipment id or limit,
/// `DomainError::InvalidQuery` for an undecodable cursor,
/// `DomainError::NotFound` when the first page is empty, and any store error
/// unchanged.
pub async fn get_event_history(
    query: &GetEventHistory,
    repo: &dyn EventRepository,
) -> Result<EventHistoryPage, DomainError> {
    let mut errors = validate_shipment_id_field(&query.shipment_id);
    let params = match validate_query_params(&query.params) {
        Ok(params) if errors.is_empty() => params,
        Ok(_) => return Err(DomainError::Validation(errors)),
        Err(param_errors) => {
            errors.extend(param_errors);
            return Err(DomainError::Validation(errors));
        }
    };

    let start_key = params.start_key.as_deref().map(decode_cursor).transpose()?;

    let page = repo
        .query_events(&query.shipment_id, params.limit, start_key.as_ref())
        .await?;

    if page.events.is_empty() && start_key.is_none() {
        return Err(DomainError::NotFound(query.shipment_id.clone()));
    }

    let mut events = page.events;
    events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));

    let next_key = page.last_evaluated_key.as_ref().map(encode_cursor);

    Ok(EventHistoryPage {
        events,
        has_more: next_key.is_some(),
        next_key,
    })
}
