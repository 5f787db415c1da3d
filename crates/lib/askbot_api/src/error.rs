//! Application error types.

use askbot_core::RelayError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
///
/// The relay answers `200` or `500` only; every variant renders as
/// `500 { "error": "<message>" }`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Any upstream failure: transport, provider status, malformed body.
    #[error("{0}")]
    Relay(#[from] RelayError),

    /// The request body could not be read as a question.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Relay(e) => error!(error = %e, "completion request failed"),
            AppError::Internal(detail) => error!(detail = %detail, "request handling failed"),
        }
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Internal(format!("Invalid request body: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_failures_map_to_500() {
        let err = AppError::from(RelayError::Transport("connection refused".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Transport error: connection refused");
    }

    #[test]
    fn unreadable_body_maps_to_500_with_reason() {
        let parse = serde_json::from_slice::<serde_json::Value>(b"{oops").unwrap_err();
        let err = AppError::from(parse);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("Invalid request body: "), "{err}");
    }
}
