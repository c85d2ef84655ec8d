//! Domain error types.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::event::EventStatus;

/// A single violated constraint on an input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the offending field as it appears on the wire.
    pub field: &'static str,
    /// Human-readable description of the violation.
    pub message: String,
}

impl FieldError {
    /// Creates a new `FieldError`.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Joins field errors into a single comma-separated message.
#[must_use]
pub fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// One or more input fields failed validation.
    #[error("validation failed: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// The event timestamp lies more than five minutes after now.
    #[error("event timestamp cannot be in the future")]
    TimestampInFuture,

    /// The event timestamp lies more than one year before now.
    #[error("event timestamp cannot be more than one year in the past")]
    TimestampTooOld,

    /// An event with the same shipment, status and timestamp already exists.
    #[error("duplicate event for shipment {shipment_id}: {status} at {timestamp}")]
    DuplicateEvent {
        /// The shipment the write targeted.
        shipment_id: String,
        /// The status of the rejected event.
        status: EventStatus,
        /// The occurrence time of the rejected event.
        timestamp: DateTime<Utc>,
    },

    /// The shipment has no events.
    #[error("no events found for shipment {0}")]
    NotFound(String),

    /// The backing store is unreachable or its table is missing.
    #[error("event store unavailable: {0}")]
    StoreUnavailable(String),

    /// The backing store rejected the query parameters.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Any failure that does not fit the categories above.
    #[error("internal error: {0}")]
    Internal(String),
}
