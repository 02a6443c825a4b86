//! Per-request error type and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::request::DecodeError;
use crate::upstream::UpstreamError;

/// Broad class of a request failure, used to pick the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller sent an unusable path. Not retried.
    BadRequest,
    /// The upstream fetch failed. Details stay server-side.
    Upstream,
}

/// Everything that can end a request early.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("path is required")]
    EmptyPath,

    #[error("invalid path: {0}")]
    InvalidPath(#[source] DecodeError),

    #[error("upstream fetch failed: {0}")]
    Upstream(#[from] UpstreamError),
}

impl ProxyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProxyError::EmptyPath | ProxyError::InvalidPath(_) => ErrorKind::BadRequest,
            ProxyError::Upstream(_) => ErrorKind::Upstream,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message returned to the caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            ProxyError::EmptyPath => "path is required",
            ProxyError::InvalidPath(_) => "invalid path",
            ProxyError::Upstream(_) => "Error fetching asset",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, status = %self.status(), "Request failed");
        error_response(self.status(), self.public_message())
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Build a `{"error": message}` response.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}
