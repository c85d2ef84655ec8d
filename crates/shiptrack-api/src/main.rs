//! Shiptrack API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method, header};
use shiptrack_api::config::Config;
use shiptrack_api::error::AppError;
use shiptrack_api::state::AppState;
use shiptrack_core::clock::SystemClock;
use shiptrack_core::id::RandomIdGenerator;
use shiptrack_event_store::pg_event_repository::PgEventRepository;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

fn cors_layer(config: &Config) -> Result<CorsLayer, AppError> {
    let Some(origin) = &config.cors_allowed_origin else {
        return Ok(CorsLayer::permissive());
    };
    let origin: HeaderValue = origin
        .parse()
        .map_err(|e| AppError::Config(format!("CORS_ALLOWED_ORIGIN is not a valid origin: {e}")))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Shiptrack API server");

    let config = Config::from_env()?;

    // Create database connection pool.
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    shiptrack_event_store::MIGRATOR.run(&pool).await?;

    let app_state = AppState::new(
        Arc::new(SystemClock),
        Arc::new(RandomIdGenerator),
        Arc::new(PgEventRepository::new(pool)),
    );

    let app = shiptrack_api::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config)?);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
