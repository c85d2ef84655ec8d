//! Shiptrack API — HTTP boundary for the shipment event store.

pub mod config;
pub mod envelope;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Builds the application router with every route mounted. Shared by the
/// server binary and the integration tests.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/shipments", routes::shipments::router())
        .with_state(state)
}
