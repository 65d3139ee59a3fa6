//! Ordered route table and request dispatch.

use std::time::Instant;

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::observability::metrics;
use crate::protocol::ApiError;

use super::route::Route;

/// Largest request body the dispatcher will buffer before handing it to a
/// handler.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Immutable, ordered route table.
///
/// Dispatch scans routes in registration order and the first match wins.
/// There is no specificity ranking: a stream route such as
/// `/machines/:machineId/meltings/stream` must be registered before its
/// parameterized sibling `/machines/:machineId/meltings/:meltingId` or the
/// placeholder will capture the literal segment. Assembly order is part of
/// the contract and covered by tests.
pub struct Dispatcher {
    routes: Vec<Route>,
}

impl Dispatcher {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Registered routes in dispatch order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Handle one request, writing exactly one response.
    pub async fn dispatch(&self, request: Request<Body>) -> Response {
        let start = Instant::now();
        let method = request.method().clone();

        // Preflight never consults the route table.
        if method == Method::OPTIONS {
            metrics::record_request(method.as_str(), 200, start);
            return cors_preflight();
        }

        let path = request.uri().path().to_string();
        let query = request.uri().query().map(str::to_string);

        let Some(route) = self
            .routes
            .iter()
            .find(|route| route.matches(&method, &path))
        else {
            tracing::warn!(%method, %path, "no route matched");
            metrics::record_request(method.as_str(), 404, start);
            return ApiError::not_found("Route not found").into_response();
        };

        tracing::debug!(%method, %path, pattern = route.pattern().as_str(), "dispatching");

        let body = match axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES).await {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(%method, %path, %error, "failed to read request body");
                metrics::record_request(method.as_str(), 400, start);
                return ApiError::bad_request("Unreadable request body").into_response();
            }
        };

        let response = route.handle(&path, query.as_deref(), body).await;
        metrics::record_request(method.as_str(), response.status().as_u16(), start);
        response
    }
}

/// 200 with the CORS headers and an empty body.
fn cors_preflight() -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        )
        .header(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, PUT, PATCH, OPTIONS"),
        )
        .header(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        )
        .body(Body::empty())
        .unwrap_or_default()
}
