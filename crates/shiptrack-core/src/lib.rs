//! Shiptrack Core — shared domain types.
//!
//! This crate defines the shipment event model, the error taxonomy, and the
//! traits that the tracking context and the storage adapters meet at. It
//! contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod event;
pub mod id;
pub mod repository;
