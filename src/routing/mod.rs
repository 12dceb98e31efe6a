//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation event (link, redirect, history) or direct URL load
//!     → navigation.rs (update the session's current path)
//!     → router.rs (literal path lookup, first match wins)
//!     → shell.rs (wrap composition in Navbar/Footer, or NotFound)
//!     → Return: Resolution { route, page }
//!
//! Route table construction (at startup):
//!     builder → validate (leading '/', unique, no chrome in content)
//!     → freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes built at startup, immutable at runtime
//! - Exact literal matching only
//! - Deterministic: same path always resolves to the same page
//! - Unknown paths resolve to an explicit NotFound page

pub mod component;
pub mod navigation;
pub mod router;
pub mod shell;

pub use component::{Component, Composition};
pub use navigation::{NavigationError, NavigationEvent, NavigationState};
pub use router::{Route, RouteError, RouteTable};
pub use shell::{Page, Resolution, Session, Shell};
