//! Measurement query and stream routes.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::config::ApiConfig;
use crate::domain::model::{Sample, Series, SeriesPoint, TimeRange};
use crate::domain::{Machine, Plant};
use crate::protocol::{json_response, time_expr, Items};
use crate::routing::{Route, RouteRequest};
use crate::sse::{SseChannel, SseSession};

use super::machine_or_not_found;

/// Sensor keys the request selects, or all of the machine's.
fn selected_keys(request: &RouteRequest, machine: &Arc<dyn Machine>) -> Vec<String> {
    match request.query("keys") {
        Some(keys) => keys.split(',').map(str::to_string).collect(),
        None => machine.sensor_keys(),
    }
}

fn step_from(request: &RouteRequest, default_secs: u64) -> Duration {
    Duration::from_secs(request.query_i64("step", default_secs as i64).max(1) as u64)
}

/// Stream route first: dispatch is first-match-wins and
/// `…/measurements/stream` shares its prefix with the query route.
pub fn routes(
    base: &str,
    plant: Arc<dyn Plant>,
    clock: Arc<dyn Clock>,
    api: &ApiConfig,
) -> Vec<Route> {
    let history_days = api.history_window_days;
    let default_step = api.step_secs;

    let stream = {
        let plant = plant.clone();
        let clock = clock.clone();
        Route::new(
            Method::GET,
            format!("{base}/machines/:machineId/measurements/stream"),
            move |request| {
                let plant = plant.clone();
                let clock = clock.clone();
                async move {
                    let (channel, response) = SseChannel::open(clock.clone());
                    let Ok(machine) = machine_or_not_found(&plant, request.param("machineId"))
                    else {
                        channel.close();
                        return response;
                    };
                    let _ = channel.heartbeat();
                    let beginning = beginning_of(&*clock, history_days);
                    let since = time_expr::resolve(
                        request.query("since").unwrap_or("now"),
                        &*clock,
                        || beginning,
                    );
                    let step = step_from(&request, default_step);
                    let subscriptions = selected_keys(&request, &machine)
                        .into_iter()
                        .filter_map(|key| {
                            let sensor = machine.sensor(&key)?;
                            let channel = channel.clone();
                            Some(sensor.subscribe(
                                since,
                                step,
                                Box::new(move |measurement| {
                                    let _ = channel.emit(
                                        "measurement",
                                        &Sample {
                                            key: key.clone(),
                                            timestamp: measurement.timestamp,
                                            value: measurement.value,
                                        },
                                    );
                                }),
                            ))
                        })
                        .collect();
                    SseSession::new(channel, subscriptions).spawn();
                    response
                }
            },
        )
    };

    let query = {
        let plant = plant.clone();
        let clock = clock.clone();
        Route::new(
            Method::GET,
            format!("{base}/machines/:machineId/measurements"),
            move |request| {
                let plant = plant.clone();
                let clock = clock.clone();
                async move {
                    let machine = match machine_or_not_found(&plant, request.param("machineId")) {
                        Ok(machine) => machine,
                        Err(error) => return error.into_response(),
                    };
                    let beginning = beginning_of(&*clock, history_days);
                    let from = time_expr::resolve(
                        request.query("from").unwrap_or("now-1M"),
                        &*clock,
                        || beginning,
                    );
                    let to = time_expr::resolve(
                        request.query("to").unwrap_or("now"),
                        &*clock,
                        || beginning,
                    );
                    let step = step_from(&request, default_step);
                    let range = TimeRange {
                        start: from,
                        end: to,
                    };
                    let items: Vec<Series> = selected_keys(&request, &machine)
                        .into_iter()
                        .filter_map(|key| {
                            let sensor = machine.sensor(&key)?;
                            let values = sensor
                                .measurements(range, step)
                                .into_iter()
                                .map(|measurement| SeriesPoint {
                                    timestamp: measurement.timestamp,
                                    value: measurement.value,
                                })
                                .collect();
                            Some(Series {
                                key,
                                name: sensor.name(),
                                unit: sensor.unit(),
                                values,
                            })
                        })
                        .collect();
                    json_response(&Items::new(items), StatusCode::OK)
                }
            },
        )
    };

    vec![stream, query]
}

/// Start of recorded history: a fixed window back from now.
fn beginning_of(clock: &dyn Clock, history_days: i64) -> DateTime<Utc> {
    clock.now() - chrono::Duration::days(history_days)
}
