//! Routes for the Shipment Tracking bounded context.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use shiptrack_core::event::ShipmentEvent;
use tracing::{Span, info, instrument};
use uuid::Uuid;

use shiptrack_tracking::application::{command_handlers, query_handlers};
use shiptrack_tracking::domain::commands::{CreateEventRequest, RecordShipmentEvent};
use shiptrack_tracking::domain::queries::{GetEventHistory, HistoryQueryParams};

use crate::envelope::{ApiResponse, Pagination};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /{shipment_id}/events
#[instrument(skip_all, fields(shipment_id))]
async fn record_event(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ShipmentEvent>>), ApiError> {
    let Path(shipment_id) = path?;
    Span::current().record("shipment_id", shipment_id.as_str());
    let Json(request) = payload?;
    let command = RecordShipmentEvent {
        correlation_id: Uuid::new_v4(),
        shipment_id,
        request,
    };

    info!(correlation_id = %command.correlation_id, "handling record_event command");

    let event = command_handlers::handle_record_event(
        &command,
        state.clock.as_ref(),
        state.ids.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(event, "Event created successfully")),
    ))
}

/// GET /{shipment_id}/events/latest
#[instrument(skip_all, fields(shipment_id))]
async fn latest_event(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<ShipmentEvent>>, ApiError> {
    let Path(shipment_id) = path?;
    Span::current().record("shipment_id", shipment_id.as_str());
    let event = query_handlers::get_latest_event(&shipment_id, &*state.event_repository).await?;

    Ok(Json(ApiResponse::ok(
        event,
        "Latest event retrieved successfully",
    )))
}

/// GET /{shipment_id}/events?limit=&startKey=
#[instrument(skip_all, fields(shipment_id))]
async fn event_history(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<HistoryQueryParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<ShipmentEvent>>>, ApiError> {
    let Path(shipment_id) = path?;
    Span::current().record("shipment_id", shipment_id.as_str());
    let Query(params) = query?;
    let query = GetEventHistory {
        shipment_id,
        params,
    };

    let page = query_handlers::get_event_history(&query, &*state.event_repository).await?;

    let message = format!(
        "Retrieved {} events for shipment {}",
        page.events.len(),
        query.shipment_id
    );
    let pagination = Pagination {
        has_more: page.has_more,
        next_key: page.next_key,
    };

    Ok(Json(
        ApiResponse::ok(page.events, message).with_pagination(pagination),
    ))
}

/// Returns the router for the shipment tracking context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{shipment_id}/events",
            get(event_history).post(record_event),
        )
        .route("/{shipment_id}/events/latest", get(latest_event))
}
