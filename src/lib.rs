//! CardCognition web shell.
//!
//! Serves the CardCognition frontend: a persistent navbar and footer around
//! exactly one routed composition per path, plus a validating gateway to the
//! deck-optimizer API.
//!
//! ```text
//!     Browser ──▶ http::server ──┬─▶ routing::shell ──▶ render::page ──▶ HTML
//!                                │
//!                                └─▶ api::gateway ──▶ upstream deck-optimizer API
//! ```

// Core subsystems
pub mod api;
pub mod config;
pub mod http;
pub mod render;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod security;

pub use config::ShellConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Component, NavigationEvent, NavigationState, RouteTable, Shell};
