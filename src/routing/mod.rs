//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (method, path, query, body)
//!     → dispatcher.rs (OPTIONS short-circuit, ordered scan)
//!     → route.rs (method + compiled pattern check)
//!     → pattern.rs (segment match, param/query extraction)
//!     → handler future → response
//!
//! Route compilation (at server assembly):
//!     pattern string → split into literal and :param segments
//!     → frozen into an immutable Route table
//! ```
//!
//! # Design Decisions
//! - Routes compiled once at assembly, immutable at runtime
//! - No regex in the hot path, segment comparison only
//! - First match wins in registration order; there is no specificity
//!   ranking, so overlapping patterns resolve by position and the
//!   registration order is part of the public contract
//! - Explicit NOT_FOUND response rather than a silent default

pub mod dispatcher;
pub mod pattern;
pub mod route;

pub use dispatcher::Dispatcher;
pub use pattern::PathPattern;
pub use route::{Route, RouteRequest};
