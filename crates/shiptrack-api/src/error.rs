//! Shiptrack API — error types.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shiptrack_core::error::{DomainError, FieldError, join_field_errors};
use thiserror::Error;
use tracing::{error, warn};

use crate::envelope::ApiResponse;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failure.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection, "rejecting malformed request body");
        Self(DomainError::Validation(vec![FieldError::new(
            "body",
            "Invalid request body",
        )]))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        warn!(error = %rejection, "rejecting malformed query string");
        Self(DomainError::InvalidQuery(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        warn!(error = %rejection, "rejecting malformed path");
        Self(DomainError::Validation(vec![FieldError::new(
            "shipmentId",
            "shipmentId has an invalid format",
        )]))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self.0 {
            DomainError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_owned(),
                Some(join_field_errors(errors)),
            ),
            DomainError::TimestampInFuture => (
                StatusCode::BAD_REQUEST,
                "Event timestamp cannot be in the future".to_owned(),
                None,
            ),
            DomainError::TimestampTooOld => (
                StatusCode::BAD_REQUEST,
                "Event timestamp cannot be more than one year in the past".to_owned(),
                None,
            ),
            DomainError::DuplicateEvent { .. } => (
                StatusCode::CONFLICT,
                "Event with this shipment ID, status and timestamp already exists".to_owned(),
                None,
            ),
            DomainError::NotFound(shipment_id) => (
                StatusCode::NOT_FOUND,
                format!("No events found for shipment {shipment_id}"),
                None,
            ),
            DomainError::StoreUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Events table not found".to_owned(),
                None,
            ),
            DomainError::InvalidQuery(_) => (
                StatusCode::BAD_REQUEST,
                "Invalid query parameters".to_owned(),
                None,
            ),
            DomainError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_owned(),
                None,
            ),
        };

        if status.is_server_error() {
            error!(error = %self.0, status = status.as_u16(), "request failed");
        } else {
            warn!(error = %self.0, status = status.as_u16(), "request rejected");
        }

        (status, Json(ApiResponse::<()>::failure(error, message))).into_response()
    }
}
