//! Time source abstraction.
//!
//! Handlers never read the system clock directly. A `Clock` is injected at
//! server assembly so that time expressions, SSE heartbeats and the sim
//! plant resolve against the same source, and so tests can pin time.

use chrono::{DateTime, Utc};

/// Provider of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant. Intended for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
