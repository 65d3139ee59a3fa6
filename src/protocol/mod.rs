//! Response protocol subsystem.
//!
//! # Data Flow
//! ```text
//! Handler result
//!     → response.rs (JSON body + protocol headers)
//!     → error.rs (structured {error:{code,message}} envelope)
//!
//! Collection shaping:
//!     → pagination.rs (page/size slicing)
//!     → cursor.rs (after/before/limit over a time-ordered feed)
//!
//! Query bounds:
//!     → time_expr.rs (relative-time grammar → absolute instant)
//! ```
//!
//! # Design Decisions
//! - Formatters are pure: payload + status in, wire bytes out
//! - Error codes are stable strings suitable for programmatic branching
//! - Paginators never sort; ordering is the caller's contract

pub mod cursor;
pub mod error;
pub mod pagination;
pub mod response;
pub mod time_expr;

pub use cursor::{CursorQuery, CursorResult};
pub use error::ApiError;
pub use pagination::PageResult;
pub use response::{json_response, Items};
