//! Server configuration read from the environment.

use crate::error::AppError;

/// Runtime configuration of the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Upper bound of the connection pool.
    pub max_connections: u32,
    /// Single allowed CORS origin; any origin when unset.
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `DATABASE_URL` is missing or a numeric
    /// variable does not parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database_url = lookup("DATABASE_URL").ok_or_else(|| {
            AppError::Config("DATABASE_URL environment variable must be set".to_owned())
        })?;
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_owned())
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_owned())
            .parse()
            .map_err(|e| {
                AppError::Config(format!("DATABASE_MAX_CONNECTIONS must be a valid u32: {e}"))
            })?;
        let cors_allowed_origin = lookup("CORS_ALLOWED_ORIGIN").filter(|o| !o.is_empty());

        Ok(Self {
            database_url,
            host,
            port,
            max_connections,
            cors_allowed_origin,
        })
    }
}
