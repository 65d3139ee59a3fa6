//! Wire and query types shared with the domain collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::protocol::cursor::Chronological;

/// Directory entry for a machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineInfo {
    pub id: String,
    pub name: String,
}

/// Closed interval a time-series query covers.
#[derive(Debug, Clone, Copy)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// One sensor reading.
#[derive(Debug, Clone, Serialize)]
pub struct Measurement {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Streamed sensor reading, tagged with the sensor key.
#[derive(Debug, Clone, Serialize)]
pub struct Sample {
    pub key: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// One sensor's slice of a measurements answer.
#[derive(Debug, Clone, Serialize)]
pub struct Series {
    pub key: String,
    pub name: String,
    pub unit: String,
    pub values: Vec<SeriesPoint>,
}

/// A raised alert. `object` names the machine the alert is about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub object: String,
    pub acknowledged: bool,
}

/// One melting cycle. `end` is absent while the melting is active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Melting {
    pub id: String,
    pub start: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    pub initial: f64,
    pub weight: f64,
    pub loaded: f64,
    pub dispensed: f64,
}

impl Chronological for Melting {
    fn start(&self) -> DateTime<Utc> {
        self.start
    }
    fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }
}

/// Client-supplied fields when recording or amending a melting. Absent
/// fields keep their current values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeltingDraft {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub initial: Option<f64>,
    pub weight: Option<f64>,
    pub loaded: Option<f64>,
    pub dispensed: Option<f64>,
}

/// A labeled slice of a machine's timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Seconds between start and end.
    pub duration: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Value>,
}

/// An operator request to label a segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelRequest {
    pub id: String,
    pub segment: Segment,
    pub options: serde_json::Value,
}
