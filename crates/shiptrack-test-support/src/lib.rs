//! Shared test doubles for the Shiptrack shipment event store.

mod clock;
mod id;
mod repository;

pub use clock::FixedClock;
pub use id::SequenceIdGenerator;
pub use repository::{FailingEventRepository, Failure, InMemoryEventRepository};
