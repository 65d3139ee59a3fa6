//! A single route: method, compiled pattern, handler.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::body::Bytes;
use axum::http::Method;
use axum::response::Response;

use super::pattern::PathPattern;

/// Per-request data handed to a handler: extracted params, parsed query,
/// raw body bytes. Built per request, never stored.
#[derive(Debug, Clone, Default)]
pub struct RouteRequest {
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub body: Bytes,
}

impl RouteRequest {
    /// Captured path parameter, empty when absent.
    pub fn param(&self, name: &str) -> &str {
        self.params.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Numeric query parameter; unparseable values fall back to the
    /// default, matching the lenient time-expression contract.
    pub fn query_i64(&self, key: &str, default: i64) -> i64 {
        self.query(key)
            .and_then(|value| value.parse().ok())
            .unwrap_or(default)
    }
}

type HandlerFuture = Pin<Box<dyn Future<Output = Response> + Send>>;
type Handler = Arc<dyn Fn(RouteRequest) -> HandlerFuture + Send + Sync>;

/// An immutable route. Built once at server assembly.
#[derive(Clone)]
pub struct Route {
    method: Method,
    pattern: PathPattern,
    handler: Handler,
}

impl Route {
    pub fn new<F, Fut>(method: Method, pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(RouteRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        Self {
            method,
            pattern: PathPattern::parse(pattern),
            handler: Arc::new(move |request| -> HandlerFuture { Box::pin(handler(request)) }),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Whether this route accepts the request. `path` must already be
    /// stripped of any query string, so a query never changes the result.
    pub fn matches(&self, method: &Method, path: &str) -> bool {
        self.method == *method && self.pattern.matches(path)
    }

    /// Invoke the handler with params and query extracted from the request.
    pub async fn handle(
        &self,
        path: &str,
        query: Option<&str>,
        body: Bytes,
    ) -> Response {
        let request = RouteRequest {
            params: self.pattern.capture(path),
            query: super::pattern::parse_query(query),
            body,
        };
        (self.handler)(request).await
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    fn probe() -> Route {
        Route::new(Method::GET, "/machines/:machineId", |request| async move {
            format!("id={}", request.param("machineId")).into_response()
        })
    }

    #[test]
    fn test_method_must_agree() {
        let route = probe();
        assert!(route.matches(&Method::GET, "/machines/icht1"));
        assert!(!route.matches(&Method::POST, "/machines/icht1"));
    }

    #[test]
    fn test_path_must_agree_exactly() {
        let route = probe();
        assert!(!route.matches(&Method::GET, "/machines"));
        assert!(!route.matches(&Method::GET, "/machines/icht1/alerts"));
    }

    #[tokio::test]
    async fn test_handle_extracts_params_and_query() {
        let route = Route::new(Method::GET, "/machines/:machineId", |request| async move {
            let page = request.query_i64("page", 1);
            format!("{}:{}", request.param("machineId"), page).into_response()
        });
        let response = route.handle("/machines/icht1", Some("page=4"), Bytes::new()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"icht1:4");
    }

    #[tokio::test]
    async fn test_invalid_numeric_query_falls_back() {
        let route = probe();
        let response = route.handle("/machines/icht1", Some("page=xyz"), Bytes::new()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
