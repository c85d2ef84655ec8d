//! Commands for the Shipment Tracking context.

use serde::Deserialize;
use uuid::Uuid;

/// Raw body of a write request, before validation. Every field is optional
/// here so that all violations can be reported together.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateEventRequest {
    /// Occurrence time, expected as `YYYY-MM-DDTHH:mm:ss.sssZ`.
    pub timestamp: Option<String>,
    /// Lifecycle status name.
    pub status: Option<String>,
    /// Where the event happened.
    pub location: Option<String>,
    /// Free-text description; defaulted from the status when absent.
    pub details: Option<String>,
}

/// Command to append a status event to a shipment's log.
#[derive(Debug, Clone)]
pub struct RecordShipmentEvent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The shipment the event belongs to.
    pub shipment_id: String,
    /// The unvalidated event fields.
    pub request: CreateEventRequest,
}
