//! Shiptrack — Shipment Tracking bounded context.
//!
//! Responsible for recording shipment status events and answering history
//! and latest-status queries over the append-only event log.

pub mod application;
pub mod domain;
