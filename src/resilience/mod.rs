//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to the upstream API:
//!     → per-attempt timeout (gateway)
//!     → On failure: retries.rs (check if retryable)
//!     → backoff.rs (wait with jitter, then try again)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every upstream call has a deadline
//! - Retries only for idempotent requests (GET, HEAD, etc.)
//! - Jittered backoff prevents thundering herd

pub mod backoff;
pub mod retries;
