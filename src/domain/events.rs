//! Typed events, one enum per stream kind.
//!
//! Domain subscriptions deliver these to stream handlers, which translate
//! them into wire frames. Keeping the payloads typed here means a handler
//! can never emit a half-shaped event.

use super::model::{Alert, LabelRequest, Melting, Segment};

#[derive(Debug, Clone)]
pub enum AlertEvent {
    Created(Alert),
    Acknowledged { id: String },
}

#[derive(Debug, Clone)]
pub enum MeltingEvent {
    Started(Melting),
    Ended(Melting),
}

#[derive(Debug, Clone)]
pub enum SegmentEvent {
    Created(Segment),
    Relabeled(Segment),
}

#[derive(Debug, Clone)]
pub enum RequestEvent {
    Created(LabelRequest),
    Resolved { id: String },
}
