//! Daemon and API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lncoord_ops::OpsError;

/// Result type alias for daemon operations.
pub type Result<T> = std::result::Result<T, DaemonError>;

/// Fatal startup and shutdown errors.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Filesystem or network I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("failed to read config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Other configuration failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// The store could not be opened.
    #[error(transparent)]
    Store(#[from] lncoord_store::StoreError),
}

impl DaemonError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        DaemonError::Config(msg.into())
    }
}

/// gRPC status codes carried in gateway error bodies.
const GRPC_INVALID_ARGUMENT: i32 = 3;
const GRPC_INTERNAL: i32 = 13;

/// JSON error body in the gateway's format.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// gRPC status code.
    pub code: i32,
    /// Human-readable message.
    pub message: String,
    /// Structured details; always empty here.
    #[serde(default)]
    pub details: Vec<serde_json::Value>,
}

/// A request-scoped failure, rendered as a gateway-style JSON error.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: i32,
    message: String,
}

impl ApiError {
    /// The HTTP status this error renders with.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<OpsError> for ApiError {
    fn from(err: OpsError) -> Self {
        if err.is_invalid_argument() {
            Self {
                status: StatusCode::BAD_REQUEST,
                code: GRPC_INVALID_ARGUMENT,
                message: err.to_string(),
            }
        } else {
            tracing::error!(error = %err, "request failed");
            Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: GRPC_INTERNAL,
                message: err.to_string(),
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code,
            message: self.message,
            details: Vec::new(),
        };
        (self.status, Json(body)).into_response()
    }
}
