//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → headers.rs (CORS preflight and origin check)
//!     → limits.rs (in-flight cap)
//!     → handlers
//! Outgoing response:
//!     → headers.rs (nosniff, frame denial, referrer policy)
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any limit breach
//! - No trust in client input; API arguments are validated in `api`

pub mod headers;
pub mod limits;
