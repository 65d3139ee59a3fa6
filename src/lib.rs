//! SCADA Supervisor API
//!
//! Exposes a melting-shop plant model over HTTP as REST plus
//! Server-Sent-Events streams. The plant itself is an external
//! collaborator reached through the `domain` traits; this crate routes,
//! paginates, resolves time expressions and manages stream lifecycles.

pub mod api;
pub mod clock;
pub mod config;
pub mod domain;
pub mod http;
pub mod observability;
pub mod protocol;
pub mod routing;
pub mod sim;
pub mod sse;

pub use clock::{Clock, SystemClock};
pub use config::SupervisorConfig;
pub use http::SupervisorServer;
