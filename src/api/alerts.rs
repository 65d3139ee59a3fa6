//! Alert listing, acknowledgement and stream routes.

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::clock::Clock;
use crate::config::ApiConfig;
use crate::domain::{AlertEvent, Plant};
use crate::protocol::{json_response, pagination, ApiError};
use crate::routing::Route;
use crate::sse::{SseChannel, SseSession};

use super::{machine_or_not_found, parse_body};

#[derive(Debug, Deserialize)]
struct AlertPatch {
    acknowledged: Option<bool>,
}

pub fn routes(
    base: &str,
    plant: Arc<dyn Plant>,
    clock: Arc<dyn Clock>,
    api: &ApiConfig,
) -> Vec<Route> {
    let default_page_size = api.page_size;

    let stream = {
        let plant = plant.clone();
        Route::new(
            Method::GET,
            format!("{base}/machines/:machineId/alerts/stream"),
            move |request| {
                let plant = plant.clone();
                let clock = clock.clone();
                async move {
                    let (channel, response) = SseChannel::open(clock);
                    let Ok(machine) = machine_or_not_found(&plant, request.param("machineId"))
                    else {
                        channel.close();
                        return response;
                    };
                    let _ = channel.heartbeat();
                    let emitter = channel.clone();
                    let subscription =
                        machine.alerts().subscribe(Box::new(move |event| match event {
                            AlertEvent::Created(alert) => {
                                let _ = emitter.emit("alert_created", alert);
                            }
                            AlertEvent::Acknowledged { id } => {
                                let _ = emitter.emit(
                                    "alert_updated",
                                    &serde_json::json!({ "id": id, "acknowledged": true }),
                                );
                            }
                        }));
                    SseSession::new(channel, vec![subscription]).spawn();
                    response
                }
            },
        )
    };

    let list = {
        let plant = plant.clone();
        Route::new(
            Method::GET,
            format!("{base}/machines/:machineId/alerts"),
            move |request| {
                let plant = plant.clone();
                async move {
                    let machine = match machine_or_not_found(&plant, request.param("machineId")) {
                        Ok(machine) => machine,
                        Err(error) => return error.into_response(),
                    };
                    let page = request.query_i64("page", 1);
                    let size = request.query_i64("size", default_page_size);
                    let alerts = machine.alerts().all();
                    let filtered: Vec<_> = match request.query("acknowledged") {
                        Some("true") => alerts.into_iter().filter(|a| a.acknowledged).collect(),
                        Some("false") => alerts.into_iter().filter(|a| !a.acknowledged).collect(),
                        _ => alerts,
                    };
                    json_response(&pagination::paginate(page, size, &filtered), StatusCode::OK)
                }
            },
        )
    };

    let acknowledge = {
        let plant = plant.clone();
        Route::new(
            Method::PATCH,
            format!("{base}/machines/:machineId/alerts/:alertId"),
            move |request| {
                let plant = plant.clone();
                async move {
                    let result: Result<_, ApiError> = (|| {
                        let machine = machine_or_not_found(&plant, request.param("machineId"))?;
                        let patch: AlertPatch = parse_body(&request.body)?;
                        let alert_id = request.param("alertId");
                        let log = machine.alerts();
                        let alert = log
                            .all()
                            .into_iter()
                            .find(|alert| alert.id == alert_id)
                            .ok_or_else(|| {
                                ApiError::not_found(format!("Alert '{alert_id}' not found"))
                            })?;
                        // Acknowledgement is one-way; re-acknowledging is a no-op.
                        if patch.acknowledged == Some(true) && !alert.acknowledged {
                            return Ok(log.acknowledge(&alert.id).unwrap_or(alert));
                        }
                        Ok(alert)
                    })();
                    match result {
                        Ok(alert) => json_response(&alert, StatusCode::OK),
                        Err(error) => error.into_response(),
                    }
                }
            },
        )
    };

    vec![stream, list, acknowledge]
}
