//! Structured API errors.
//!
//! Every client-facing failure is JSON with a stable `code` field so
//! clients can branch on it without parsing the message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::response::json_response;

/// Errors surfaced to API clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown route, machine, melting, alert or request id.
    #[error("{0}")]
    NotFound(String),

    /// Request body that could not be parsed.
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }
}

/// Wire envelope: `{"error":{"code":…,"message":…}}`.
///
/// Deserialize is derived so tests can parse error bodies back.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let envelope = ErrorEnvelope {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.to_string(),
            },
        };
        json_response(&envelope, self.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_not_found_envelope() {
        let response = ApiError::not_found("Machine 'icht99' not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let parsed: ErrorEnvelope = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.error.code, "NOT_FOUND");
        assert_eq!(parsed.error.message, "Machine 'icht99' not found");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::bad_request("x").code(), "BAD_REQUEST");
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
    }
}
