//! Label request routes: pending queue, operator response, stream.

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;

use crate::clock::Clock;
use crate::domain::{Plant, RequestEvent};
use crate::protocol::{json_response, ApiError, Items};
use crate::routing::Route;
use crate::sse::{SseChannel, SseSession};

use super::{machine_or_not_found, parse_body};

pub fn routes(base: &str, plant: Arc<dyn Plant>, clock: Arc<dyn Clock>) -> Vec<Route> {
    let stream = {
        let plant = plant.clone();
        Route::new(
            Method::GET,
            format!("{base}/machines/:machineId/requests/stream"),
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
                        machine.requests().subscribe(Box::new(move |event| match event {
                            RequestEvent::Created(pending) => {
                                let _ = emitter.emit("request_created", pending);
                            }
                            RequestEvent::Resolved { id } => {
                                let _ = emitter
                                    .emit("request_resolved", &serde_json::json!({ "id": id }));
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
            format!("{base}/machines/:machineId/requests"),
            move |request| {
                let plant = plant.clone();
                async move {
                    match machine_or_not_found(&plant, request.param("machineId")) {
                        Ok(machine) => {
                            json_response(&Items::new(machine.requests().pending()), StatusCode::OK)
                        }
                        Err(error) => error.into_response(),
                    }
                }
            },
        )
    };

    let respond = {
        let plant = plant.clone();
        Route::new(
            Method::POST,
            format!("{base}/machines/:machineId/requests/:requestId/respond"),
            move |request| {
                let plant = plant.clone();
                async move {
                    let result: Result<_, ApiError> = (|| {
                        let machine = machine_or_not_found(&plant, request.param("machineId"))?;
                        let answer: serde_json::Value = parse_body(&request.body)?;
                        let request_id = request.param("requestId");
                        machine
                            .requests()
                            .respond(request_id, answer)
                            .ok_or_else(|| {
                                ApiError::not_found(format!("Request '{request_id}' not found"))
                            })?;
                        Ok(serde_json::json!({ "id": request_id, "status": "resolved" }))
                    })();
                    match result {
                        Ok(payload) => json_response(&payload, StatusCode::OK),
                        Err(error) => error.into_response(),
                    }
                }
            },
        )
    };

    vec![stream, list, respond]
}
