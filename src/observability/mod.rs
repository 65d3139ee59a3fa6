//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via `tracing`; the subscriber is installed in
//!   main, everything else just emits events
//! - Metric updates are cheap atomic operations behind the `metrics`
//!   facade; the Prometheus endpoint is optional and config-gated
//! - The time-expression fallback counter keeps silently-lenient parsing
//!   visible without changing its behavior

pub mod metrics;
