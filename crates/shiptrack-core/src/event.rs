//! Shipment event model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a shipment event. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// The shipment was registered.
    Created,
    /// The carrier collected the package.
    PickedUp,
    /// The package is moving through the network.
    InTransit,
    /// The package is on the delivery vehicle.
    OutForDelivery,
    /// The package reached the recipient.
    Delivered,
    /// A delivery attempt failed.
    AttemptedDelivery,
    /// Something went wrong in handling.
    Exception,
    /// The package was sent back to the sender.
    Returned,
    /// The shipment was cancelled.
    Cancelled,
    /// The shipment is held pending action.
    OnHold,
}

impl EventStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [EventStatus; 10] = [
        EventStatus::Created,
        EventStatus::PickedUp,
        EventStatus::InTransit,
        EventStatus::OutForDelivery,
        EventStatus::Delivered,
        EventStatus::AttemptedDelivery,
        EventStatus::Exception,
        EventStatus::Returned,
        EventStatus::Cancelled,
        EventStatus::OnHold,
    ];

    /// Returns the wire name of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EventStatus::Created => "created",
            EventStatus::PickedUp => "picked_up",
            EventStatus::InTransit => "in_transit",
            EventStatus::OutForDelivery => "out_for_delivery",
            EventStatus::Delivered => "delivered",
            EventStatus::AttemptedDelivery => "attempted_delivery",
            EventStatus::Exception => "exception",
            EventStatus::Returned => "returned",
            EventStatus::Cancelled => "cancelled",
            EventStatus::OnHold => "on_hold",
        }
    }

    /// Returns the default `details` text for events written without one.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            EventStatus::Created => "Shipment created",
            EventStatus::PickedUp => "Package picked up by carrier",
            EventStatus::InTransit => "Package in transit",
            EventStatus::OutForDelivery => "Out for delivery",
            EventStatus::Delivered => "Package delivered",
            EventStatus::AttemptedDelivery => "Delivery attempted",
            EventStatus::Exception => "Delivery exception occurred",
            EventStatus::Returned => "Package returned to sender",
            EventStatus::Cancelled => "Shipment cancelled",
            EventStatus::OnHold => "Shipment on hold",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known [`EventStatus`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for EventStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_owned()))
    }
}

/// One immutable status record for a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentEvent {
    /// Store-assigned identifier; the sort key within a shipment.
    pub id: Uuid,
    /// Owning shipment; the partition key.
    pub shipment_id: String,
    /// When the event happened, as reported by the caller.
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    /// Lifecycle status.
    pub status: EventStatus,
    /// Where the event happened, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Free-text description.
    pub details: String,
    /// When the store recorded the event.
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

impl ShipmentEvent {
    /// Returns the composite store key of this event.
    #[must_use]
    pub fn key(&self) -> EventKey {
        EventKey {
            shipment_id: self.shipment_id.clone(),
            id: self.id,
        }
    }
}

/// Composite store key: partition (`shipment_id`) plus sort key (`id`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventKey {
    /// Partition key.
    pub shipment_id: String,
    /// Sort key.
    pub id: Uuid,
}

/// Formats a UTC instant as `YYYY-MM-DDTHH:mm:ss.sssZ`.
#[must_use]
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}
