//! One long-lived event-stream response.

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use futures_util::StreamExt;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::clock::Clock;

use super::frame::Frame;

/// The transport went away; the frame was not delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelClosed;

/// Writer half of an open event stream.
///
/// Frames are queued into an mpsc channel; the response body drains the
/// queue to the transport. Cloning shares the same connection, so domain
/// subscription callbacks can each hold a handle.
#[derive(Clone)]
pub struct SseChannel {
    tx: mpsc::UnboundedSender<Frame>,
    clock: Arc<dyn Clock>,
}

impl SseChannel {
    /// Open a channel and the response that will carry its frames.
    ///
    /// The response is written with the event-stream headers immediately;
    /// frames follow as they are emitted.
    pub fn open(clock: Arc<dyn Clock>) -> (Self, Response) {
        let (tx, rx) = mpsc::unbounded_channel::<Frame>();
        let body = Body::from_stream(
            UnboundedReceiverStream::new(rx)
                .map(|frame| Ok::<Bytes, Infallible>(Bytes::from(frame.to_string()))),
        );
        let response = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, HeaderValue::from_static("text/event-stream"))
            .header(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"))
            .header(header::CONNECTION, HeaderValue::from_static("keep-alive"))
            .header(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            )
            .body(body)
            .unwrap_or_default();
        (Self { tx, clock }, response)
    }

    /// Queue an event frame.
    pub fn emit<T: Serialize>(&self, event: &str, payload: &T) -> Result<(), ChannelClosed> {
        let frame = Frame::new(event, payload).map_err(|error| {
            tracing::error!(event, %error, "failed to serialize stream payload");
            ChannelClosed
        })?;
        self.send(frame)
    }

    /// Queue a heartbeat frame stamped from the channel's clock.
    pub fn heartbeat(&self) -> Result<(), ChannelClosed> {
        self.send(Frame::heartbeat(self.clock.now()))
    }

    /// End the stream. The transport sees EOF once queued frames drain.
    pub fn close(self) {
        drop(self);
    }

    /// Resolves once the transport side has gone away.
    pub async fn closed(&self) {
        self.tx.closed().await;
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn send(&self, frame: Frame) -> Result<(), ChannelClosed> {
        self.tx.send(frame).map_err(|_| ChannelClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn fixed_clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock("2024-03-15T12:00:00Z".parse().unwrap()))
    }

    #[tokio::test]
    async fn test_open_sets_stream_headers() {
        let (channel, response) = SseChannel::open(fixed_clock());
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers.get("content-type").unwrap(), "text/event-stream");
        assert_eq!(headers.get("cache-control").unwrap(), "no-cache");
        assert_eq!(headers.get("connection").unwrap(), "keep-alive");
        assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
        channel.close();
    }

    #[tokio::test]
    async fn test_emitted_frames_reach_the_body() {
        let (channel, response) = SseChannel::open(fixed_clock());
        channel.emit("x", &serde_json::json!({"a": 1})).unwrap();
        channel.heartbeat().unwrap();
        channel.close();
        let body = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        assert_eq!(
            std::str::from_utf8(&body).unwrap(),
            "event: x\ndata: {\"a\":1}\n\n\
             event: heartbeat\ndata: {\"timestamp\":\"2024-03-15T12:00:00.000Z\"}\n\n"
        );
    }

    #[tokio::test]
    async fn test_close_ends_the_stream() {
        let (channel, response) = SseChannel::open(fixed_clock());
        channel.close();
        let body = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_emit_after_transport_gone_reports_closed() {
        let (channel, response) = SseChannel::open(fixed_clock());
        drop(response);
        assert_eq!(
            channel.emit("x", &serde_json::json!({})),
            Err(ChannelClosed)
        );
        assert!(channel.is_closed());
    }
}
