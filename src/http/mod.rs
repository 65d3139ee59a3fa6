//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, catch-all handler)
//!     → routing::Dispatcher (OPTIONS, ordered scan, params/query)
//!     → api handlers → protocol formatters or sse channel
//! ```

pub mod server;

pub use server::SupervisorServer;
