//! In-memory logs, stores and queues backing a simulated machine.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::clock::Clock;
use crate::domain::plant::EventCallback;
use crate::domain::{
    Alert, AlertEvent, AlertLog, EventBus, LabelRequest, Melting, MeltingDraft, MeltingEvent,
    MeltingLog, RequestEvent, RequestQueue, Segment, SegmentEvent, SegmentStore, Subscription,
};

use super::lock;

/// Alert history, newest first.
pub struct SimAlertLog {
    machine: String,
    alerts: Mutex<Vec<Alert>>,
    bus: EventBus<AlertEvent>,
    clock: Arc<dyn Clock>,
}

impl SimAlertLog {
    pub fn new(machine: &str, clock: Arc<dyn Clock>) -> Self {
        Self {
            machine: machine.to_string(),
            alerts: Mutex::new(Vec::new()),
            bus: EventBus::new(),
            clock,
        }
    }

    /// Raise a fresh alert and publish it.
    pub fn raise(&self, message: &str) -> Alert {
        let alert = Alert {
            id: Uuid::new_v4().to_string(),
            message: message.to_string(),
            timestamp: self.clock.now(),
            object: self.machine.clone(),
            acknowledged: false,
        };
        lock(&self.alerts).insert(0, alert.clone());
        self.bus.publish(&AlertEvent::Created(alert.clone()));
        alert
    }
}

impl AlertLog for SimAlertLog {
    fn all(&self) -> Vec<Alert> {
        lock(&self.alerts).clone()
    }

    fn acknowledge(&self, id: &str) -> Option<Alert> {
        let updated = {
            let mut alerts = lock(&self.alerts);
            let alert = alerts.iter_mut().find(|alert| alert.id == id)?;
            alert.acknowledged = true;
            alert.clone()
        };
        self.bus.publish(&AlertEvent::Acknowledged {
            id: updated.id.clone(),
        });
        Some(updated)
    }

    fn subscribe(&self, callback: EventCallback<AlertEvent>) -> Subscription {
        self.bus.subscribe(move |event| callback(event))
    }
}

/// Melting chronology.
pub struct SimMeltingLog {
    meltings: Mutex<Vec<Melting>>,
    bus: EventBus<MeltingEvent>,
    clock: Arc<dyn Clock>,
}

impl SimMeltingLog {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            meltings: Mutex::new(Vec::new()),
            bus: EventBus::new(),
            clock,
        }
    }

    fn materialize(&self, draft: MeltingDraft) -> Melting {
        Melting {
            id: Uuid::new_v4().to_string(),
            start: draft.start.unwrap_or_else(|| self.clock.now()),
            end: draft.end,
            initial: draft.initial.unwrap_or(0.0),
            weight: draft.weight.unwrap_or(0.0),
            loaded: draft.loaded.unwrap_or(0.0),
            dispensed: draft.dispensed.unwrap_or(0.0),
        }
    }
}

impl MeltingLog for SimMeltingLog {
    fn all(&self) -> Vec<Melting> {
        lock(&self.meltings).clone()
    }

    fn find(&self, id: &str) -> Option<Melting> {
        lock(&self.meltings)
            .iter()
            .find(|melting| melting.id == id)
            .cloned()
    }

    fn start(&self) -> Melting {
        let melting = self.materialize(MeltingDraft::default());
        lock(&self.meltings).push(melting.clone());
        self.bus.publish(&MeltingEvent::Started(melting.clone()));
        melting
    }

    fn stop(&self, id: &str) -> Option<Melting> {
        let ended = {
            let mut meltings = lock(&self.meltings);
            let melting = meltings
                .iter_mut()
                .find(|melting| melting.id == id && melting.end.is_none())?;
            melting.end = Some(self.clock.now());
            melting.clone()
        };
        self.bus.publish(&MeltingEvent::Ended(ended.clone()));
        Some(ended)
    }

    fn add(&self, draft: MeltingDraft) -> Melting {
        let melting = self.materialize(draft);
        lock(&self.meltings).push(melting.clone());
        self.bus.publish(&MeltingEvent::Started(melting.clone()));
        melting
    }

    fn update(&self, id: &str, draft: MeltingDraft) -> Option<Melting> {
        let mut meltings = lock(&self.meltings);
        let melting = meltings.iter_mut().find(|melting| melting.id == id)?;
        if let Some(start) = draft.start {
            melting.start = start;
        }
        if let Some(end) = draft.end {
            melting.end = Some(end);
        }
        if let Some(initial) = draft.initial {
            melting.initial = initial;
        }
        if let Some(weight) = draft.weight {
            melting.weight = weight;
        }
        if let Some(loaded) = draft.loaded {
            melting.loaded = loaded;
        }
        if let Some(dispensed) = draft.dispensed {
            melting.dispensed = dispensed;
        }
        Some(melting.clone())
    }

    fn subscribe(&self, callback: EventCallback<MeltingEvent>) -> Subscription {
        self.bus.subscribe(move |event| callback(event))
    }
}

/// Labeled timeline slices.
pub struct SimSegmentStore {
    segments: Mutex<Vec<Segment>>,
    bus: EventBus<SegmentEvent>,
}

impl SimSegmentStore {
    pub fn new() -> Self {
        Self {
            segments: Mutex::new(Vec::new()),
            bus: EventBus::new(),
        }
    }

    /// Record a segment and publish its creation.
    pub fn record(&self, segment: Segment) {
        lock(&self.segments).push(segment.clone());
        self.bus.publish(&SegmentEvent::Created(segment));
    }

    /// Rename a recorded segment and publish the relabel.
    pub fn relabel(&self, name: &str, new_name: &str) -> Option<Segment> {
        let relabeled = {
            let mut segments = lock(&self.segments);
            let segment = segments.iter_mut().find(|segment| segment.name == name)?;
            segment.name = new_name.to_string();
            segment.clone()
        };
        self.bus.publish(&SegmentEvent::Relabeled(relabeled.clone()));
        Some(relabeled)
    }
}

impl Default for SimSegmentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentStore for SimSegmentStore {
    fn query(&self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Vec<Segment> {
        lock(&self.segments)
            .iter()
            .filter(|segment| from.map_or(true, |from| segment.start >= from))
            .filter(|segment| to.map_or(true, |to| segment.end <= to))
            .cloned()
            .collect()
    }

    fn subscribe(&self, callback: EventCallback<SegmentEvent>) -> Subscription {
        self.bus.subscribe(move |event| callback(event))
    }
}

/// Open labeling requests.
pub struct SimRequestQueue {
    requests: Mutex<Vec<LabelRequest>>,
    bus: EventBus<RequestEvent>,
}

impl SimRequestQueue {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            bus: EventBus::new(),
        }
    }

    /// Enqueue a request and publish its creation.
    pub fn push(&self, request: LabelRequest) {
        lock(&self.requests).push(request.clone());
        self.bus.publish(&RequestEvent::Created(request));
    }
}

impl Default for SimRequestQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestQueue for SimRequestQueue {
    fn pending(&self) -> Vec<LabelRequest> {
        lock(&self.requests).clone()
    }

    fn respond(&self, id: &str, _response: serde_json::Value) -> Option<LabelRequest> {
        let resolved = {
            let mut requests = lock(&self.requests);
            let position = requests.iter().position(|request| request.id == id)?;
            requests.remove(position)
        };
        self.bus.publish(&RequestEvent::Resolved {
            id: resolved.id.clone(),
        });
        Some(resolved)
    }

    fn subscribe(&self, callback: EventCallback<RequestEvent>) -> Subscription {
        self.bus.subscribe(move |event| callback(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock("2024-03-15T12:00:00Z".parse().unwrap()))
    }

    #[test]
    fn test_raise_and_acknowledge_alert() {
        let log = SimAlertLog::new("icht1", clock());
        let alert = log.raise("overheated");
        assert!(!alert.acknowledged);
        assert_eq!(log.all().len(), 1);
        let updated = log.acknowledge(&alert.id).unwrap();
        assert!(updated.acknowledged);
        assert!(log.acknowledge("missing").is_none());
    }

    #[test]
    fn test_newest_alert_first() {
        let log = SimAlertLog::new("icht1", clock());
        log.raise("first");
        log.raise("second");
        assert_eq!(log.all()[0].message, "second");
    }

    #[test]
    fn test_melting_lifecycle_publishes_events() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let log = SimMeltingLog::new(clock());
        let started = Arc::new(AtomicUsize::new(0));
        let ended = Arc::new(AtomicUsize::new(0));
        let s = started.clone();
        let e = ended.clone();
        let subscription = log.subscribe(Box::new(move |event| match event {
            MeltingEvent::Started(_) => {
                s.fetch_add(1, Ordering::SeqCst);
            }
            MeltingEvent::Ended(_) => {
                e.fetch_add(1, Ordering::SeqCst);
            }
        }));

        let melting = log.start();
        assert!(melting.end.is_none());
        let stopped = log.stop(&melting.id).unwrap();
        assert!(stopped.end.is_some());
        // Stopping twice finds no active melting.
        assert!(log.stop(&melting.id).is_none());

        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert_eq!(ended.load(Ordering::SeqCst), 1);
        subscription.cancel();
    }

    #[test]
    fn test_update_amends_recorded_fields() {
        let log = SimMeltingLog::new(clock());
        let melting = log.add(MeltingDraft {
            initial: Some(100.0),
            ..Default::default()
        });
        let updated = log
            .update(
                &melting.id,
                MeltingDraft {
                    loaded: Some(40.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.initial, 100.0);
        assert_eq!(updated.loaded, 40.0);
    }

    #[test]
    fn test_respond_removes_request() {
        let queue = SimRequestQueue::new();
        let segment = Segment {
            name: "melting".to_string(),
            start: "2024-03-15T10:00:00Z".parse().unwrap(),
            end: "2024-03-15T11:00:00Z".parse().unwrap(),
            duration: 3600,
            options: None,
        };
        queue.push(LabelRequest {
            id: "r-1".to_string(),
            segment,
            options: serde_json::json!(["melting", "idle"]),
        });
        assert_eq!(queue.pending().len(), 1);
        assert!(queue.respond("r-1", serde_json::json!({"label": "melting"})).is_some());
        assert!(queue.pending().is_empty());
        assert!(queue.respond("r-1", serde_json::json!({})).is_none());
    }
}
