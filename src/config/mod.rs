//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, semantic checks)
//!     → SupervisorConfig (validated, immutable)
//!     → shared with the server at assembly
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the route table it shapes lives for
//!   the whole process
//! - All fields have defaults so a minimal config file works

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::{ApiConfig, ListenerConfig, ObservabilityConfig, SupervisorConfig};
