//! Error types for hostwatch
//!
//! - `MetricsError` : the OS metrics facility could not produce a reading
//! - `ConfigError`  : startup configuration is unusable

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failure of the OS metrics query. Never retried, never replaced by a default value.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetricsError {
    #[error("metrics unavailable: {0}")]
    Unavailable(String),
}

impl MetricsError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }
}

impl IntoResponse for MetricsError {
    fn into_response(self) -> Response {
        // cause goes to the log only, the client gets a generic body
        tracing::error!("{}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "metrics unavailable").into_response()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid value for {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },
}
