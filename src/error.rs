//! Request-level error taxonomy.
//!
//! Per-segment loader failures are not errors here: they travel as
//! `TaskError`s inside the route data. Everything below ends the request.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::framework::document::TemplateError;
use crate::tasks::TaskError;

#[derive(Debug, Error)]
pub enum RiverError {
    /// No route chain matches the request path.
    #[error("no route matches the request path")]
    NotFound,

    /// The percent-decoded request path is not valid UTF-8.
    #[error("request path is not valid UTF-8 once decoded")]
    InvalidPath,

    #[error("default head elements unavailable: {0}")]
    DefaultHead(#[source] TaskError),

    #[error("cookie header is {len} bytes, ETag input is capped at {max}")]
    OversizedCookie { len: usize, max: usize },

    #[error("failed to serialize route data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to render document: {0}")]
    Template(#[from] TemplateError),

    #[error("render task failed: {0}")]
    RenderJoin(#[from] tokio::task::JoinError),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] axum::http::header::InvalidHeaderValue),
}

impl RiverError {
    pub fn status(&self) -> StatusCode {
        match self {
            RiverError::NotFound => StatusCode::NOT_FOUND,
            RiverError::InvalidPath => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RiverError {
    fn into_response(self) -> Response {
        let status = self.status();
        let reason = status.canonical_reason().unwrap_or("Error");
        (status, reason).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(RiverError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(RiverError::InvalidPath.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            RiverError::OversizedCookie { len: 5000, max: 4096 }.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RiverError::DefaultHead(TaskError::new("db down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_response_hides_detail() {
        let response = RiverError::DefaultHead(TaskError::new("secret detail")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
