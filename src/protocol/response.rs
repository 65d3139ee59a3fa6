//! JSON response formatting.

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use serde::Serialize;

/// Plain collection envelope for unpaginated listings.
#[derive(Debug, Serialize)]
pub struct Items<T> {
    pub items: Vec<T>,
}

impl<T> Items<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }
}

/// Serialize a payload into a JSON response with the protocol headers.
///
/// Every JSON answer carries `Content-Type: application/json` and
/// `Access-Control-Allow-Origin: *`.
pub fn json_response<T: Serialize>(payload: &T, status: StatusCode) -> Response {
    let body = match serde_json::to_vec(payload) {
        Ok(body) => body,
        Err(error) => {
            tracing::error!(%error, "failed to serialize response payload");
            return Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Body::empty())
                .unwrap_or_default();
        }
    };
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .header(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        )
        .body(Body::from(body))
        .unwrap_or_default()
}
