//! Melting chronology routes: cursor-paginated reads, lifecycle writes
//! and the event stream.

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;

use crate::clock::Clock;
use crate::config::ApiConfig;
use crate::domain::model::MeltingDraft;
use crate::domain::{MeltingEvent, Plant};
use crate::protocol::cursor::{self, CursorQuery};
use crate::protocol::{json_response, ApiError};
use crate::routing::Route;
use crate::sse::{SseChannel, SseSession};

use super::{machine_or_not_found, parse_body, parse_instant};

/// The stream route is registered first: `…/meltings/stream` would
/// otherwise be captured by the `:meltingId` placeholder.
pub fn routes(
    base: &str,
    plant: Arc<dyn Plant>,
    clock: Arc<dyn Clock>,
    api: &ApiConfig,
) -> Vec<Route> {
    let default_limit = api.cursor_limit;

    let stream = {
        let plant = plant.clone();
        Route::new(
            Method::GET,
            format!("{base}/machines/:machineId/meltings/stream"),
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
                        machine.meltings().subscribe(Box::new(move |event| match event {
                            MeltingEvent::Started(melting) => {
                                let _ = emitter.emit(
                                    "melting_started",
                                    &serde_json::json!({
                                        "id": melting.id,
                                        "start": melting.start,
                                    }),
                                );
                            }
                            MeltingEvent::Ended(melting) => {
                                let _ = emitter.emit(
                                    "melting_ended",
                                    &serde_json::json!({
                                        "id": melting.id,
                                        "end": melting.end,
                                        "loaded": melting.loaded,
                                        "dispensed": melting.dispensed,
                                    }),
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
            format!("{base}/machines/:machineId/meltings"),
            move |request| {
                let plant = plant.clone();
                async move {
                    let machine = match machine_or_not_found(&plant, request.param("machineId")) {
                        Ok(machine) => machine,
                        Err(error) => return error.into_response(),
                    };
                    let query = CursorQuery {
                        after: parse_instant(request.query("after")),
                        before: parse_instant(request.query("before")),
                        limit: request.query_i64("limit", default_limit),
                        active: request.query("active") == Some("true"),
                    };
                    let mut meltings = machine.meltings().all();
                    // The cursor expects a descending feed and never sorts.
                    meltings.sort_by(|a, b| b.start.cmp(&a.start));
                    json_response(&cursor::paginate(&query, &meltings), StatusCode::OK)
                }
            },
        )
    };

    let find = {
        let plant = plant.clone();
        Route::new(
            Method::GET,
            format!("{base}/machines/:machineId/meltings/:meltingId"),
            move |request| {
                let plant = plant.clone();
                async move {
                    let result: Result<_, ApiError> = (|| {
                        let machine = machine_or_not_found(&plant, request.param("machineId"))?;
                        let melting_id = request.param("meltingId");
                        machine.meltings().find(melting_id).ok_or_else(|| {
                            ApiError::not_found(format!("Melting '{melting_id}' not found"))
                        })
                    })();
                    match result {
                        Ok(melting) => json_response(&melting, StatusCode::OK),
                        Err(error) => error.into_response(),
                    }
                }
            },
        )
    };

    let start = {
        let plant = plant.clone();
        Route::new(
            Method::POST,
            format!("{base}/machines/:machineId/meltings/start"),
            move |request| {
                let plant = plant.clone();
                async move {
                    match machine_or_not_found(&plant, request.param("machineId")) {
                        Ok(machine) => {
                            json_response(&machine.meltings().start(), StatusCode::CREATED)
                        }
                        Err(error) => error.into_response(),
                    }
                }
            },
        )
    };

    let stop = {
        let plant = plant.clone();
        Route::new(
            Method::POST,
            format!("{base}/machines/:machineId/meltings/:meltingId/stop"),
            move |request| {
                let plant = plant.clone();
                async move {
                    let result: Result<_, ApiError> = (|| {
                        let machine = machine_or_not_found(&plant, request.param("machineId"))?;
                        let melting_id = request.param("meltingId");
                        machine.meltings().stop(melting_id).ok_or_else(|| {
                            ApiError::not_found(format!(
                                "Active melting '{melting_id}' not found"
                            ))
                        })
                    })();
                    match result {
                        Ok(melting) => json_response(&melting, StatusCode::OK),
                        Err(error) => error.into_response(),
                    }
                }
            },
        )
    };

    let create = {
        let plant = plant.clone();
        Route::new(
            Method::POST,
            format!("{base}/machines/:machineId/meltings"),
            move |request| {
                let plant = plant.clone();
                async move {
                    let result: Result<_, ApiError> = (|| {
                        let machine = machine_or_not_found(&plant, request.param("machineId"))?;
                        let draft: MeltingDraft = parse_body(&request.body)?;
                        Ok(machine.meltings().add(draft))
                    })();
                    match result {
                        Ok(melting) => json_response(&melting, StatusCode::CREATED),
                        Err(error) => error.into_response(),
                    }
                }
            },
        )
    };

    let update = {
        let plant = plant.clone();
        Route::new(
            Method::PUT,
            format!("{base}/machines/:machineId/meltings/:meltingId"),
            move |request| {
                let plant = plant.clone();
                async move {
                    let result: Result<_, ApiError> = (|| {
                        let machine = machine_or_not_found(&plant, request.param("machineId"))?;
                        let draft: MeltingDraft = parse_body(&request.body)?;
                        let melting_id = request.param("meltingId");
                        machine.meltings().update(melting_id, draft).ok_or_else(|| {
                            ApiError::not_found(format!("Melting '{melting_id}' not found"))
                        })
                    })();
                    match result {
                        Ok(melting) => json_response(&melting, StatusCode::OK),
                        Err(error) => error.into_response(),
                    }
                }
            },
        )
    };

    vec![stream, list, find, start, stop, create, update]
}
