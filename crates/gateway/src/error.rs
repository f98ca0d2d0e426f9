//! # Gateway error types
//!
//! [`GatewayError`] is what the storage layer and the transcript protocol
//! return. Handlers turn it into an [`ApiError`], which decides what the
//! client is allowed to see: identifier problems are returned verbatim,
//! backend failures are logged in full and answered with a generic message.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use transcript_qc_core::CoreError;
use transcript_qc_types::EmptyResponse;

/// Gateway error type.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The video identifier could not be parsed
    #[error("{0}")]
    InvalidId(CoreError),
    /// A signed read URL could not be issued
    #[error("failed to issue signed read URL: {0}")]
    AccessGrant(String),
    /// Uploading content failed
    #[error("failed to write object: {0}")]
    Write(String),
    /// Storage backend or network failure
    #[error("storage backend error: {0}")]
    Backend(String),
    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Converts into the client-facing error, logging backend detail.
    ///
    /// `public_message` replaces the detail of anything that is not the
    /// caller's fault.
    pub fn into_api_error(self, public_message: &str) -> ApiError {
        match self {
            GatewayError::InvalidId(e) => {
                tracing::warn!(error = %e, "rejected video id");
                ApiError::new(StatusCode::BAD_REQUEST, e.to_string())
            }
            other => {
                tracing::error!(error = %other, "{public_message}");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, public_message)
            }
        }
    }
}

/// Error rendered as `{"success": false, "error": ...}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: EmptyResponse,
}

impl ApiError {
    /// Failure envelope carrying `message`.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: EmptyResponse::failure(message),
        }
    }

    /// 404 with `message`.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// 401 with a bare `{"success": false}` body.
    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            body: EmptyResponse::rejected(),
        }
    }

    /// Status code of the response.
    #[cfg(test)]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Error message, if any.
    #[cfg(test)]
    pub fn message(&self) -> Option<&str> {
        self.body.error.as_deref()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(error = %rejection, "rejected request body");
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}
