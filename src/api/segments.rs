//! Segment listing and stream routes.

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;

use crate::clock::Clock;
use crate::domain::model::Segment;
use crate::domain::{Plant, SegmentEvent};
use crate::protocol::{json_response, Items};
use crate::routing::Route;
use crate::sse::{SseChannel, SseSession};

use super::{machine_or_not_found, parse_instant};

/// Stream payloads carry the segment shape without its options.
fn segment_payload(segment: &Segment) -> serde_json::Value {
    serde_json::json!({
        "name": segment.name,
        "start": segment.start,
        "end": segment.end,
        "duration": segment.duration,
    })
}

pub fn routes(base: &str, plant: Arc<dyn Plant>, clock: Arc<dyn Clock>) -> Vec<Route> {
    let stream = {
        let plant = plant.clone();
        Route::new(
            Method::GET,
            format!("{base}/machines/:machineId/segments/stream"),
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
                        machine.segments().subscribe(Box::new(move |event| match event {
                            SegmentEvent::Created(segment) => {
                                let _ =
                                    emitter.emit("segment_created", &segment_payload(segment));
                            }
                            SegmentEvent::Relabeled(segment) => {
                                let _ =
                                    emitter.emit("segment_relabeled", &segment_payload(segment));
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
            format!("{base}/machines/:machineId/segments"),
            move |request| {
                let plant = plant.clone();
                async move {
                    let machine = match machine_or_not_found(&plant, request.param("machineId")) {
                        Ok(machine) => machine,
                        Err(error) => return error.into_response(),
                    };
                    let from = parse_instant(request.query("from"));
                    let to = parse_instant(request.query("to"));
                    let segments = machine.segments().query(from, to);
                    json_response(&Items::new(segments), StatusCode::OK)
                }
            },
        )
    };

    vec![stream, list]
}
