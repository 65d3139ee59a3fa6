//! Traits the route factories depend on.
//!
//! The plant package implements these; the supervisory layer only calls
//! them. Query methods are synchronous snapshots; `subscribe` methods
//! register a callback with the domain's fan-out and return a handle the
//! stream session cancels on teardown.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::events::{AlertEvent, MeltingEvent, RequestEvent, SegmentEvent};
use super::model::{
    Alert, LabelRequest, MachineInfo, Measurement, Melting, MeltingDraft, Segment, TimeRange,
};
use super::subscription::Subscription;

/// Boxed callback handed to a domain subscription.
pub type EventCallback<T> = Box<dyn Fn(&T) + Send + Sync>;

/// Directory of the machines the plant knows about.
pub trait Plant: Send + Sync {
    fn machines(&self) -> Vec<MachineInfo>;
    fn machine(&self, id: &str) -> Option<Arc<dyn Machine>>;
}

/// One melting machine and its per-resource facets.
pub trait Machine: Send + Sync {
    fn info(&self) -> MachineInfo;

    /// Sensor keys in a stable order.
    fn sensor_keys(&self) -> Vec<String>;
    fn sensor(&self, key: &str) -> Option<Arc<dyn Sensor>>;

    /// Current hopper weight in kilograms.
    fn weight(&self) -> f64;
    /// Replace the hopper weight, returning the new value.
    fn set_weight(&self, amount: f64) -> f64;
    /// Add material, returning the new weight.
    fn load(&self, amount: f64) -> f64;
    /// Remove material, returning the new weight.
    fn dispense(&self, amount: f64) -> f64;

    fn alerts(&self) -> Arc<dyn AlertLog>;
    fn meltings(&self) -> Arc<dyn MeltingLog>;
    fn segments(&self) -> Arc<dyn SegmentStore>;
    fn requests(&self) -> Arc<dyn RequestQueue>;
}

/// A measuring point on a machine.
pub trait Sensor: Send + Sync {
    fn name(&self) -> String;
    fn unit(&self) -> String;

    /// Readings over `range`, one per `step`.
    fn measurements(&self, range: TimeRange, step: Duration) -> Vec<Measurement>;

    /// Replay readings since `since`, then keep delivering live ones every
    /// `step` until the handle is cancelled.
    fn subscribe(
        &self,
        since: DateTime<Utc>,
        step: Duration,
        callback: EventCallback<Measurement>,
    ) -> Subscription;
}

/// The machine's alert history.
pub trait AlertLog: Send + Sync {
    /// All alerts, newest first.
    fn all(&self) -> Vec<Alert>;

    /// Mark an alert acknowledged; `None` when the id is unknown.
    fn acknowledge(&self, id: &str) -> Option<Alert>;

    fn subscribe(&self, callback: EventCallback<AlertEvent>) -> Subscription;
}

/// The machine's melting chronology.
pub trait MeltingLog: Send + Sync {
    fn all(&self) -> Vec<Melting>;
    fn find(&self, id: &str) -> Option<Melting>;

    /// Begin a melting now.
    fn start(&self) -> Melting;

    /// Close an active melting; `None` when the id is unknown or the
    /// melting already ended.
    fn stop(&self, id: &str) -> Option<Melting>;

    /// Record a melting from client-supplied fields.
    fn add(&self, draft: MeltingDraft) -> Melting;

    /// Amend a recorded melting; `None` when the id is unknown.
    fn update(&self, id: &str, draft: MeltingDraft) -> Option<Melting>;

    fn subscribe(&self, callback: EventCallback<MeltingEvent>) -> Subscription;
}

/// Labeled timeline slices of one machine.
pub trait SegmentStore: Send + Sync {
    fn query(&self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Vec<Segment>;
    fn subscribe(&self, callback: EventCallback<SegmentEvent>) -> Subscription;
}

/// Open labeling requests for one machine.
pub trait RequestQueue: Send + Sync {
    fn pending(&self) -> Vec<LabelRequest>;

    /// Resolve a request with the operator's answer; `None` when the id is
    /// unknown.
    fn respond(&self, id: &str, response: serde_json::Value) -> Option<LabelRequest>;

    fn subscribe(&self, callback: EventCallback<RequestEvent>) -> Subscription;
}
