//! Route factories for the supervisor REST surface.
//!
//! One module per resource, each returning a list of routes built from the
//! routing, protocol and sse subsystems plus the injected domain traits.
//!
//! # Registration order
//! Dispatch is first-match-wins with no specificity ranking, so order is a
//! contract: every factory registers its `…/stream` route before
//! parameterized siblings (otherwise `:meltingId` would capture the
//! literal segment `stream`), and the assembly below fixes the order
//! across resources. Tests pin this down.

pub mod alerts;
pub mod machines;
pub mod measurements;
pub mod meltings;
pub mod requests;
pub mod segments;

use std::sync::Arc;

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use crate::clock::Clock;
use crate::config::ApiConfig;
use crate::domain::{Machine, Plant};
use crate::protocol::ApiError;
use crate::routing::Dispatcher;

/// Assemble the full route table for one plant.
pub fn supervisor_routes(
    plant: Arc<dyn Plant>,
    clock: Arc<dyn Clock>,
    api: &ApiConfig,
) -> Dispatcher {
    let base = api.base_path.as_str();
    let mut routes = Vec::new();
    routes.extend(machines::routes(base, plant.clone()));
    routes.extend(measurements::routes(base, plant.clone(), clock.clone(), api));
    routes.extend(alerts::routes(base, plant.clone(), clock.clone(), api));
    routes.extend(meltings::routes(base, plant.clone(), clock.clone(), api));
    routes.extend(segments::routes(base, plant.clone(), clock.clone()));
    routes.extend(requests::routes(base, plant, clock));
    Dispatcher::new(routes)
}

/// Look up a machine or produce the standard 404.
pub(crate) fn machine_or_not_found(
    plant: &Arc<dyn Plant>,
    id: &str,
) -> Result<Arc<dyn Machine>, ApiError> {
    plant
        .machine(id)
        .ok_or_else(|| ApiError::not_found(format!("Machine '{id}' not found")))
}

/// Parse a JSON request body or produce a 400.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|error| ApiError::bad_request(format!("Malformed JSON body: {error}")))
}

/// Parse an RFC 3339 query value; anything else is treated as absent.
pub(crate) fn parse_instant(value: Option<&str>) -> Option<DateTime<Utc>> {
    value.and_then(|value| {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|instant| instant.with_timezone(&Utc))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimPlant;
    use axum::http::Method;

    fn table() -> Vec<(Method, String)> {
        let clock: Arc<dyn Clock> = Arc::new(crate::clock::SystemClock);
        let plant: Arc<dyn Plant> = Arc::new(SimPlant::demo(clock.clone()));
        let dispatcher = supervisor_routes(plant, clock, &ApiConfig::default());
        dispatcher
            .routes()
            .iter()
            .map(|route| (route.method().clone(), route.pattern().as_str().to_string()))
            .collect()
    }

    #[test]
    fn test_full_surface_is_registered() {
        let table = table();
        let expected = [
            (Method::GET, "/api/v1/machines"),
            (Method::GET, "/api/v1/machines/:machineId"),
            (Method::GET, "/api/v1/machines/:machineId/weight"),
            (Method::PUT, "/api/v1/machines/:machineId/weight"),
            (Method::POST, "/api/v1/machines/:machineId/load"),
            (Method::POST, "/api/v1/machines/:machineId/dispense"),
            (Method::GET, "/api/v1/machines/:machineId/measurements/stream"),
            (Method::GET, "/api/v1/machines/:machineId/measurements"),
            (Method::GET, "/api/v1/machines/:machineId/alerts/stream"),
            (Method::GET, "/api/v1/machines/:machineId/alerts"),
            (Method::PATCH, "/api/v1/machines/:machineId/alerts/:alertId"),
            (Method::GET, "/api/v1/machines/:machineId/meltings/stream"),
            (Method::GET, "/api/v1/machines/:machineId/meltings"),
            (Method::GET, "/api/v1/machines/:machineId/meltings/:meltingId"),
            (Method::POST, "/api/v1/machines/:machineId/meltings/start"),
            (Method::POST, "/api/v1/machines/:machineId/meltings/:meltingId/stop"),
            (Method::POST, "/api/v1/machines/:machineId/meltings"),
            (Method::PUT, "/api/v1/machines/:machineId/meltings/:meltingId"),
            (Method::GET, "/api/v1/machines/:machineId/segments/stream"),
            (Method::GET, "/api/v1/machines/:machineId/segments"),
            (Method::GET, "/api/v1/machines/:machineId/requests/stream"),
            (Method::GET, "/api/v1/machines/:machineId/requests"),
            (Method::POST, "/api/v1/machines/:machineId/requests/:requestId/respond"),
        ];
        assert_eq!(table.len(), expected.len());
        for ((method, pattern), (want_method, want_pattern)) in table.iter().zip(expected.iter()) {
            assert_eq!(method, want_method, "{want_pattern}");
            assert_eq!(pattern.as_str(), *want_pattern);
        }
    }

    #[test]
    fn test_stream_routes_precede_parameterized_siblings() {
        let table = table();
        let position = |pattern: &str| {
            table
                .iter()
                .position(|(_, p)| p == pattern)
                .unwrap_or_else(|| panic!("{pattern} not registered"))
        };
        assert!(
            position("/api/v1/machines/:machineId/meltings/stream")
                < position("/api/v1/machines/:machineId/meltings/:meltingId")
        );
        assert!(
            position("/api/v1/machines/:machineId/alerts/stream")
                < position("/api/v1/machines/:machineId/alerts/:alertId")
        );
    }
}
