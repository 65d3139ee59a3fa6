//! SSE wire frames.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// One event frame. Rendered as `event: <name>\ndata: <json>\n\n`; the two
/// trailing newlines terminate the frame on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    event: String,
    data: String,
}

impl Frame {
    pub fn new<T: Serialize>(event: impl Into<String>, payload: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }

    /// Liveness frame carrying the current instant.
    pub fn heartbeat(timestamp: DateTime<Utc>) -> Self {
        let payload =
            serde_json::json!({ "timestamp": timestamp.to_rfc3339_opts(SecondsFormat::Millis, true) });
        Self {
            event: "heartbeat".to_string(),
            // json! output of a string map cannot fail to serialize
            data: payload.to_string(),
        }
    }

}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event: {}\ndata: {}\n\n", self.event, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_wire_format() {
        let frame = Frame::new("x", &serde_json::json!({"a": 1})).unwrap();
        assert_eq!(frame.to_string(), "event: x\ndata: {\"a\":1}\n\n");
    }

    #[test]
    fn test_heartbeat_carries_clock_timestamp() {
        let instant: DateTime<Utc> = "2024-03-15T12:00:00Z".parse().unwrap();
        let frame = Frame::heartbeat(instant);
        assert_eq!(
            frame.to_string(),
            "event: heartbeat\ndata: {\"timestamp\":\"2024-03-15T12:00:00.000Z\"}\n\n"
        );
    }
}
