//! Machine directory and hopper weight routes.

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::domain::Plant;
use crate::protocol::{json_response, ApiError, Items};
use crate::routing::Route;

use super::{machine_or_not_found, parse_body};

#[derive(Debug, Deserialize)]
struct AmountBody {
    amount: f64,
}

#[derive(Debug, Serialize)]
struct WeightBody {
    weight: f64,
}

/// `GET /machines`, `GET /machines/:machineId` and the weight operations.
pub fn routes(base: &str, plant: Arc<dyn Plant>) -> Vec<Route> {
    let list = {
        let plant = plant.clone();
        Route::new(Method::GET, format!("{base}/machines"), move |_request| {
            let plant = plant.clone();
            async move { json_response(&Items::new(plant.machines()), StatusCode::OK) }
        })
    };

    let info = {
        let plant = plant.clone();
        Route::new(
            Method::GET,
            format!("{base}/machines/:machineId"),
            move |request| {
                let plant = plant.clone();
                async move {
                    match machine_or_not_found(&plant, request.param("machineId")) {
                        Ok(machine) => json_response(&machine.info(), StatusCode::OK),
                        Err(error) => error.into_response(),
                    }
                }
            },
        )
    };

    let read_weight = {
        let plant = plant.clone();
        Route::new(
            Method::GET,
            format!("{base}/machines/:machineId/weight"),
            move |request| {
                let plant = plant.clone();
                async move {
                    match machine_or_not_found(&plant, request.param("machineId")) {
                        Ok(machine) => json_response(
                            &WeightBody {
                                weight: machine.weight(),
                            },
                            StatusCode::OK,
                        ),
                        Err(error) => error.into_response(),
                    }
                }
            },
        )
    };

    let set_weight = {
        let plant = plant.clone();
        Route::new(
            Method::PUT,
            format!("{base}/machines/:machineId/weight"),
            move |request| {
                let plant = plant.clone();
                async move {
                    let result: Result<_, ApiError> = (|| {
                        let machine = machine_or_not_found(&plant, request.param("machineId"))?;
                        let body: AmountBody = parse_body(&request.body)?;
                        Ok(WeightBody {
                            weight: machine.set_weight(body.amount),
                        })
                    })();
                    match result {
                        Ok(weight) => json_response(&weight, StatusCode::OK),
                        Err(error) => error.into_response(),
                    }
                }
            },
        )
    };

    let load = {
        let plant = plant.clone();
        Route::new(
            Method::POST,
            format!("{base}/machines/:machineId/load"),
            move |request| {
                let plant = plant.clone();
                async move {
                    let result: Result<_, ApiError> = (|| {
                        let machine = machine_or_not_found(&plant, request.param("machineId"))?;
                        let body: AmountBody = parse_body(&request.body)?;
                        Ok(WeightBody {
                            weight: machine.load(body.amount),
                        })
                    })();
                    match result {
                        Ok(weight) => json_response(&weight, StatusCode::OK),
                        Err(error) => error.into_response(),
                    }
                }
            },
        )
    };

    let dispense = {
        let plant = plant.clone();
        Route::new(
            Method::POST,
            format!("{base}/machines/:machineId/dispense"),
            move |request| {
                let plant = plant.clone();
                async move {
                    let result: Result<_, ApiError> = (|| {
                        let machine = machine_or_not_found(&plant, request.param("machineId"))?;
                        let body: AmountBody = parse_body(&request.body)?;
                        Ok(WeightBody {
                            weight: machine.dispense(body.amount),
                        })
                    })();
                    match result {
                        Ok(weight) => json_response(&weight, StatusCode::OK),
                        Err(error) => error.into_response(),
                    }
                }
            },
        )
    };

    vec![list, info, read_weight, set_weight, load, dispense]
}
