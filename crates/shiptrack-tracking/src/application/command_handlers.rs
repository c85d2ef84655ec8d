//! Command handlers for the Shipment Tracking context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: validate input, check for duplicates, persist.

use shiptrack_core::clock::Clock;
use shiptrack_core::error::DomainError;
use shiptrack_core::event::ShipmentEvent;
use shiptrack_core::id::IdGenerator;
use shiptrack_core::repository::EventRepository;
use tracing::{info, warn};

use crate::domain::commands::RecordShipmentEvent;
use crate::domain::validation::{
    CreateEventFields, check_timestamp_window, validate_create_event_request,
    validate_shipment_id_field,
};

fn validate_command(command: &RecordShipmentEvent) -> Result<CreateEventFields, DomainError> {
    let mut errors = validate_shipment_id_field(&command.shipment_id);
    match validate_create_event_request(&command.request) {
        Ok(fields) if errors.is_empty() => Ok(fields),
        Ok(_) => Err(DomainError::Validation(errors)),
        Err(field_errors) => {
            errors.extend(field_errors);
            Err(DomainError::Validation(errors))
        }
    }
}

/// Handles the `RecordShipmentEvent` command: validates the input, rejects
/// an existing `(shipment, status, timestamp)` triple, and appends the new
/// event.
///
/// The duplicate check and the write are two separate store calls. Two
/// concurrent writers with the same triple can both pass the check.
///
/// # Errors
///
/// Returns `DomainError::Validation` listing every invalid field,
/// `DomainError::TimestampInFuture` or `DomainError::TimestampTooOld` when the
/// timestamp is outside the accepted window, `DomainError::DuplicateEvent`
/// when the triple already exists, and any store error unchanged.
pub async fn handle_record_event(
    command: &RecordShipmentEvent,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    repo: &dyn EventRepository,
) -> Result<ShipmentEvent, DomainError> {
    let fields = validate_command(command)?;
    let now = clock.now();
    check_timestamp_window(fields.timestamp, now)?;

    let existing = repo
        .find_events_by_status_and_timestamp(&command.shipment_id, fields.status, fields.timestamp)
        .await?;
    if !existing.is_empty() {
        warn!(
            shipment_id = %command.shipment_id,
            status = %fields.status,
            "rejecting duplicate shipment event"
        );
        return Err(DomainError::DuplicateEvent {
            shipment_id: command.shipment_id.clone(),
            status: fields.status,
            timestamp: fields.timestamp,
        });
    }

    let event = ShipmentEvent {
        id: ids.next_id(),
        shipment_id: command.shipment_id.clone(),
        timestamp: fields.timestamp,
        status: fields.status,
        location: fields.location,
        details: fields
            .details
            .unwrap_or_else(|| fields.status.description().to_owned()),
        created_at: now,
    };

    repo.put_event(&event).await?;

    info!(
        shipment_id = %event.shipment_id,
        event_id = %event.id,
        status = %event.status,
        "shipment event recorded"
    );

    Ok(event)
}
