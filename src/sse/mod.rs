//! Server-Sent-Events subsystem.
//!
//! # Data Flow
//! ```text
//! Domain subscription callback
//!     → channel.rs emit() (typed frame into the mpsc queue)
//!     → response body stream drains the queue to the transport
//!
//! session.rs owns the per-connection heartbeat ticker and the
//! subscription handles; transport close tears both down.
//! ```
//!
//! # Design Decisions
//! - Frames are typed and rendered in one place (frame.rs), so the wire
//!   format is testable without a socket
//! - The mpsc queue decouples domain callbacks from transport writes;
//!   a failed emit means the client is gone, never an error to the caller
//! - Cancellation is client-driven only; the heartbeat announces liveness
//!   but no server-side timeout exists

pub mod channel;
pub mod frame;
pub mod session;

pub use channel::SseChannel;
pub use frame::Frame;
pub use session::SseSession;

use std::time::Duration;

/// Fixed per-connection heartbeat period.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
