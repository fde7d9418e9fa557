//! Error responses of the gateway.
//!
//! All the handlers return a [`core::error::Error`](Error) on failure. This is
//! the only place where errors are mapped to status codes:
//!
//! Error | Status
//! ---|---
//! `EmptyMagnetLink`, `EmptyPath` | `422 Unprocessable Entity`
//! `PathNotFound` | `404 Not Found`
//! `MetadataTimeout` | `504 Gateway Timeout`
//! `Swarm` | `500 Internal Server Error`
//!
//! The body is the error message, as plain text.
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{debug, error, warn};

use crate::core::error::Error;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = status_code(&self);

        if status.is_server_error() {
            error!(target: "GATEWAY", %status, err = %self, "Request failed");
        } else if status == StatusCode::NOT_FOUND {
            debug!(target: "GATEWAY", %status, err = %self, "Request failed");
        } else {
            warn!(target: "GATEWAY", %status, err = %self, "Invalid request");
        }

        (status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], self.to_string()).into_response()
    }
}

#[must_use]
pub fn status_code(err: &Error) -> StatusCode {
    match err {
        Error::EmptyMagnetLink { .. } | Error::EmptyPath { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        Error::PathNotFound { .. } => StatusCode::NOT_FOUND,
        Error::MetadataTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        Error::Swarm { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
