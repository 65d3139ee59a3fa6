//! Shared helpers for integration testing.

// Each test binary uses a subset of these helpers.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use scada_supervisor::clock::SystemClock;
use scada_supervisor::config::SupervisorConfig;
use scada_supervisor::http::SupervisorServer;
use scada_supervisor::sim::SimPlant;
use tokio::net::TcpListener;

/// Start a supervisor server over a demo sim plant on an ephemeral port.
///
/// Returns the API base url and the typed plant handle so tests can drive
/// domain events.
pub async fn spawn_server() -> (String, Arc<SimPlant>) {
    let config = SupervisorConfig::default();
    let base_path = config.api.base_path.clone();
    let clock = Arc::new(SystemClock);
    let plant = Arc::new(SimPlant::demo(clock.clone()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = SupervisorServer::new(config, plant.clone(), clock);
    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });

    (format!("http://{addr}{base_path}"), plant)
}

/// Incremental reader for an SSE response body.
pub struct SseReader {
    stream: std::pin::Pin<
        Box<dyn futures_util::Stream<Item = reqwest::Result<axum::body::Bytes>> + Send>,
    >,
    buffer: String,
}

impl SseReader {
    pub fn new(response: reqwest::Response) -> Self {
        Self {
            stream: Box::pin(response.bytes_stream()),
            buffer: String::new(),
        }
    }

    /// Next `(event, data)` frame, or `None` on stream end. Waits at most
    /// five seconds.
    pub async fn next_frame(&mut self) -> Option<(String, serde_json::Value)> {
        tokio::time::timeout(Duration::from_secs(5), self.read_frame())
            .await
            .expect("timed out waiting for an SSE frame")
    }

    async fn read_frame(&mut self) -> Option<(String, serde_json::Value)> {
        loop {
            if let Some(boundary) = self.buffer.find("\n\n") {
                let frame: String = self.buffer.drain(..boundary + 2).collect();
                return Some(parse_frame(frame.trim_end()));
            }
            let chunk = self.stream.next().await?.expect("stream read failed");
            self.buffer.push_str(std::str::from_utf8(&chunk).expect("non-utf8 frame"));
        }
    }
}

fn parse_frame(frame: &str) -> (String, serde_json::Value) {
    let mut event = String::new();
    let mut data = String::new();
    for line in frame.lines() {
        if let Some(value) = line.strip_prefix("event: ") {
            event = value.to_string();
        } else if let Some(value) = line.strip_prefix("data: ") {
            data = value.to_string();
        }
    }
    let payload = serde_json::from_str(&data).expect("frame data is not JSON");
    (event, payload)
}
