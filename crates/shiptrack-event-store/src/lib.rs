//! Shiptrack Event Store — PostgreSQL persistence for shipment events.

use sqlx::migrate::Migrator;

pub mod pg_event_repository;

/// Embedded schema migrations for the `shipment_events` table.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");
