//! Command ingress errors and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, info, warn};

/// Why a command request was refused.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The body was not a JSON object.
    #[error("malformed command body: {0}")]
    Malformed(String),

    /// No credential record for the target device.
    #[error("unknown device")]
    UnknownDevice,

    /// The signed command could not be published.
    #[error("command publish failed: {0}")]
    PublishFailed(String),

    /// Unexpected gateway-side failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CommandError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            CommandError::Malformed(_) => StatusCode::BAD_REQUEST,
            CommandError::UnknownDevice => StatusCode::NOT_FOUND,
            CommandError::PublishFailed(_) => StatusCode::BAD_GATEWAY,
            CommandError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CommandError {
    fn into_response(self) -> Response {
        match &self {
            CommandError::Malformed(detail) => info!(%detail, "command body rejected"),
            CommandError::UnknownDevice => warn!("command for unknown device rejected"),
            CommandError::PublishFailed(detail) => warn!(%detail, "command publish failed"),
            CommandError::Internal(detail) => error!(%detail, "command ingress internal error"),
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
