//! Input validation for shipment ids, event fields and paging parameters.
//!
//! Every function here is pure. The current time is passed in rather than
//! read so that window checks are reproducible.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use shiptrack_core::error::{DomainError, FieldError};
use shiptrack_core::event::EventStatus;

use crate::domain::commands::CreateEventRequest;
use crate::domain::queries::HistoryQueryParams;

/// Maximum length of a shipment id.
pub const MAX_SHIPMENT_ID_LEN: usize = 50;
/// Maximum length of the `location` field.
pub const MAX_LOCATION_LEN: usize = 200;
/// Maximum length of the `details` field.
pub const MAX_DETAILS_LEN: usize = 500;
/// Page size used when `limit` is absent.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;
/// Largest accepted page size.
pub const MAX_PAGE_LIMIT: u32 = 100;

const FUTURE_TOLERANCE_MINUTES: i64 = 5;
const MAX_EVENT_AGE_DAYS: i64 = 365;

// Universal Postal Union S10, e.g. `RR123456789CN`.
static UPU_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}[0-9]{9}[A-Z]{2}$").expect("valid UPU pattern"));
static PREFIXED_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^SHIP-[0-9]{6,12}$").expect("valid prefixed pattern"));
static GENERIC_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{5,50}$").expect("valid generic pattern"));
static STRICT_UTC_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-5][0-9]\.[0-9]{3}Z$")
        .expect("valid timestamp pattern")
});

/// Validated fields of a write request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEventFields {
    /// Occurrence time.
    pub timestamp: DateTime<Utc>,
    /// Lifecycle status.
    pub status: EventStatus,
    /// Optional location.
    pub location: Option<String>,
    /// Optional caller-supplied description.
    pub details: Option<String>,
}

/// Validated paging parameters of a history request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryParams {
    /// Page size in `[1, 100]`.
    pub limit: u32,
    /// Opaque cursor, untouched.
    pub start_key: Option<String>,
}

/// Returns `true` if `id` has one of the accepted shipment id shapes.
///
/// Performs no length check beyond what the individual shapes enforce.
#[must_use]
pub fn validate_shipment_id(id: &str) -> bool {
    UPU_ID.is_match(id) || PREFIXED_ID.is_match(id) || GENERIC_ID.is_match(id)
}

/// Full field check for a shipment id: presence, length, then shape.
#[must_use]
pub fn validate_shipment_id_field(id: &str) -> Vec<FieldError> {
    let len = id.chars().count();
    if len == 0 {
        return vec![FieldError::new("shipmentId", "shipmentId is required")];
    }
    if len > MAX_SHIPMENT_ID_LEN {
        return vec![FieldError::new(
            "shipmentId",
            format!("shipmentId must be between 1 and {MAX_SHIPMENT_ID_LEN} characters"),
        )];
    }
    if !validate_shipment_id(id) {
        return vec![FieldError::new("shipmentId", "shipmentId has an invalid format")];
    }
    Vec::new()
}

/// Returns `true` if `ts` parses as a date-time lying in
/// `[now - 365 days, now + 5 minutes]`. Both bounds are inclusive.
#[must_use]
pub fn validate_event_timestamp(ts: &str, now: DateTime<Utc>) -> bool {
    DateTime::parse_from_rfc3339(ts)
        .is_ok_and(|parsed| is_within_window(parsed.with_timezone(&Utc), now))
}

fn is_within_window(ts: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    ts >= now - Duration::days(MAX_EVENT_AGE_DAYS)
        && ts <= now + Duration::minutes(FUTURE_TOLERANCE_MINUTES)
}

/// Checks the accepted timestamp window and says which side was violated.
///
/// # Errors
///
/// Returns `DomainError::TimestampInFuture` when `ts` is more than five
/// minutes ahead of `now`, and `DomainError::TimestampTooOld` when it is more
/// than a year behind.
pub fn check_timestamp_window(ts: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), DomainError> {
    if is_within_window(ts, now) {
        Ok(())
    } else if ts > now {
        Err(DomainError::TimestampInFuture)
    } else {
        Err(DomainError::TimestampTooOld)
    }
}

fn parse_strict_utc(raw: &str) -> Option<DateTime<Utc>> {
    if !STRICT_UTC_TIMESTAMP.is_match(raw) {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

// Plain decimal digits only; `str::parse` alone would also take a leading `+`.
fn parse_unsigned(raw: &str) -> Option<u32> {
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        raw.parse().ok()
    } else {
        None
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

/// Structural validation of a write request. Every violated constraint is
/// reported, not just the first.
///
/// # Errors
///
/// Returns the list of field errors when any constraint is violated.
pub fn validate_create_event_request(
    request: &CreateEventRequest,
) -> Result<CreateEventFields, Vec<FieldError>> {
    let mut errors = Vec::new();

    let timestamp = match non_empty(request.timestamp.as_ref()) {
        None => {
            errors.push(FieldError::new("timestamp", "timestamp is required"));
            None
        }
        Some(raw) => {
            let parsed = parse_strict_utc(raw);
            if parsed.is_none() {
                errors.push(FieldError::new(
                    "timestamp",
                    "timestamp must be a valid ISO 8601 UTC date-time (YYYY-MM-DDTHH:mm:ss.sssZ)",
                ));
            }
            parsed
        }
    };

    let status = match non_empty(request.status.as_ref()) {
        None => {
            errors.push(FieldError::new("status", "status is required"));
            None
        }
        Some(raw) => {
            let parsed = raw.parse::<EventStatus>().ok();
            if parsed.is_none() {
                let allowed: Vec<&str> = EventStatus::ALL.into_iter().map(EventStatus::as_str).collect();
                errors.push(FieldError::new(
                    "status",
                    format!("status must be one of: {}", allowed.join(", ")),
                ));
            }
            parsed
        }
    };

    if request
        .location
        .as_ref()
        .is_some_and(|l| l.chars().count() > MAX_LOCATION_LEN)
    {
        errors.push(FieldError::new(
            "location",
            format!("location must be at most {MAX_LOCATION_LEN} characters"),
        ));
    }

    if request
        .details
        .as_ref()
        .is_some_and(|d| d.chars().count() > MAX_DETAILS_LEN)
    {
        errors.push(FieldError::new(
            "details",
            format!("details must be at most {MAX_DETAILS_LEN} characters"),
        ));
    }

    match (timestamp, status) {
        (Some(timestamp), Some(status)) if errors.is_empty() => Ok(CreateEventFields {
            timestamp,
            status,
            location: request.location.clone(),
            details: request.details.clone(),
        }),
        _ => Err(errors),
    }
}

/// Validates history paging parameters, applying the default page size.
///
/// # Errors
///
/// Returns a field error when `limit` is not an integer in `[1, 100]`.
pub fn validate_query_params(params: &HistoryQueryParams) -> Result<HistoryParams, Vec<FieldError>> {
    let limit = match non_empty(params.limit.as_ref()) {
        None => DEFAULT_PAGE_LIMIT,
        Some(raw) => match parse_unsigned(raw) {
            Some(limit) if (1..=MAX_PAGE_LIMIT).contains(&limit) => limit,
            _ => {
                return Err(vec![FieldError::new(
                    "limit",
                    format!("limit must be an integer between 1 and {MAX_PAGE_LIMIT}"),
                )]);
            }
        },
    };

    Ok(HistoryParams {
        limit,
        start_key: non_empty(params.start_key.as_ref()).map(str::to_owned),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn request(timestamp: Option<&str>, status: Option<&str>) -> CreateEventRequest {
        CreateEventRequest {
            timestamp: timestamp.map(str::to_owned),
            status: status.map(str::to_owned),
            location: None,
            details: None,
        }
    }

    // --- shipment ids ---

    #[test]
    fn test_accepts_each_shipment_id_shape() {
        assert!(validate_shipment_id("RR123456789CN"));
        assert!(validate_shipment_id("SHIP-100000"));
        assert!(validate_shipment_id("SHIP-123456789012"));
        assert!(validate_shipment_id("order_42-abc"));
        assert!(validate_shipment_id(&"a".repeat(50)));
    }

    #[test]
    fn test_rejects_ids_matching_no_shape() {
        assert!(!validate_shipment_id(""));
        assert!(!validate_shipment_id("abcd"));
        assert!(!validate_shipment_id("SHIP 100000"));
        assert!(!validate_shipment_id("ship#12345"));
        assert!(!validate_shipment_id(&"a".repeat(51)));
    }

    #[test]
    fn test_shipment_id_field_reports_missing_and_too_long() {
        assert_eq!(validate_shipment_id_field("")[0].message, "shipmentId is required");
        assert_eq!(
            validate_shipment_id_field(&"A".repeat(51))[0].message,
            "shipmentId must be between 1 and 50 characters"
        );
        assert_eq!(
            validate_shipment_id_field("bad id")[0].message,
            "shipmentId has an invalid format"
        );
        assert!(validate_shipment_id_field("SHIP-100000").is_empty());
    }

    // --- timestamp window ---

    #[test]
    fn test_timestamp_window_bounds_are_inclusive() {
        assert!(validate_event_timestamp("2025-06-01T12:05:00.000Z", now()));
        assert!(validate_event_timestamp("2024-06-01T12:00:00.000Z", now()));
        assert!(validate_event_timestamp("2025-06-01T12:00:00Z", now()));
    }

    #[test]
    fn test_timestamp_outside_window_is_rejected() {
        assert!(!validate_event_timestamp("2025-06-01T12:05:01.000Z", now()));
        assert!(!validate_event_timestamp("2024-06-01T11:59:59.000Z", now()));
        assert!(!validate_event_timestamp("not a date", now()));
    }

    #[test]
    fn test_check_timestamp_window_names_the_violated_side() {
        let future = now() + Duration::minutes(6);
        let stale = now() - Duration::days(366);

        assert!(matches!(
            check_timestamp_window(future, now()),
            Err(DomainError::TimestampInFuture)
        ));
        assert!(matches!(
            check_timestamp_window(stale, now()),
            Err(DomainError::TimestampTooOld)
        ));
        assert!(check_timestamp_window(now(), now()).is_ok());
    }

    // --- create request ---

    #[test]
    fn test_valid_request_is_parsed() {
        let fields = validate_create_event_request(&CreateEventRequest {
            timestamp: Some("2025-01-01T00:00:00.000Z".to_owned()),
            status: Some("out_for_delivery".to_owned()),
            location: Some("Denver, CO".to_owned()),
            details: None,
        })
        .unwrap();

        assert_eq!(fields.timestamp, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(fields.status, EventStatus::OutForDelivery);
        assert_eq!(fields.location.as_deref(), Some("Denver, CO"));
        assert!(fields.details.is_none());
    }

    #[test]
    fn test_offset_or_missing_zulu_is_rejected() {
        for raw in [
            "2025-01-01T00:00:00.000+00:00",
            "2025-01-01T00:00:00.000",
            "2025-01-01",
            "2025-13-01T00:00:00.000Z",
            "2025-01-01T00:00:00Z",
            "2025-01-01T00:00:00.0Z",
            "2025-03-31T23:59:60.000Z",
        ] {
            let errors = validate_create_event_request(&request(Some(raw), Some("created")))
                .unwrap_err();
            assert_eq!(errors.len(), 1, "{raw}");
            assert_eq!(errors[0].field, "timestamp");
        }
    }

    #[test]
    fn test_every_violation_is_reported() {
        let errors = validate_create_event_request(&CreateEventRequest {
            timestamp: None,
            status: Some("lost".to_owned()),
            location: Some("x".repeat(201)),
            details: Some("y".repeat(501)),
        })
        .unwrap_err();

        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["timestamp", "status", "location", "details"]);
        assert!(errors[1].message.starts_with("status must be one of: created, picked_up"));
    }

    #[test]
    fn test_length_limits_are_inclusive() {
        let fields = validate_create_event_request(&CreateEventRequest {
            timestamp: Some("2025-01-01T00:00:00.000Z".to_owned()),
            status: Some("created".to_owned()),
            location: Some("x".repeat(200)),
            details: Some("y".repeat(500)),
        });

        assert!(fields.is_ok());
    }

    // --- query params ---

    #[test]
    fn test_limit_defaults_to_fifty() {
        let params = validate_query_params(&HistoryQueryParams::default()).unwrap();

        assert_eq!(params.limit, 50);
        assert!(params.start_key.is_none());
    }

    #[test]
    fn test_limit_range_is_enforced() {
        for raw in ["0", "101", "-1", "+5", " 5", "ten", "2.5"] {
            let params = HistoryQueryParams {
                limit: Some(raw.to_owned()),
                start_key: None,
            };
            let errors = validate_query_params(&params).unwrap_err();
            assert_eq!(errors[0].field, "limit", "{raw}");
        }
        for (raw, expected) in [("1", 1), ("100", 100)] {
            let params = HistoryQueryParams {
                limit: Some(raw.to_owned()),
                start_key: None,
            };
            assert_eq!(validate_query_params(&params).unwrap().limit, expected);
        }
    }

    #[test]
    fn test_start_key_passes_through_untouched() {
        let params = HistoryQueryParams {
            limit: None,
            start_key: Some("not-even-base64!".to_owned()),
        };

        let validated = validate_query_params(&params).unwrap();

        assert_eq!(validated.start_key.as_deref(), Some("not-even-base64!"));
    }
}
