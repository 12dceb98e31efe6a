//! Deck-optimizer API gateway.
//!
//! # Data Flow
//! ```text
//! /api/{*rest}
//!     → endpoint.rs (match, decode, enforce limits, clamp)
//!     → gateway.rs (rewrite onto upstream, timeout, retry)
//!     → upstream response passed through
//!
//! Rejections never leave the shell:
//!     error.rs → {"error": "..."} with the API's status code
//! ```

pub mod endpoint;
pub mod error;
pub mod gateway;

pub use endpoint::Endpoint;
pub use error::ApiError;
pub use gateway::{ApiGateway, GatewaySettings};
