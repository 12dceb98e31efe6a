//! Route table and lookup.
//!
//! # Responsibilities
//! - Store the ordered route list
//! - Look up the route for a path
//! - Return the matched route or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (shared via `Arc` without locks)
//! - Exact literal path match, case-sensitive, no trailing-slash folding
//! - O(n) scan in declaration order; first match wins
//! - Explicit `None` rather than a silent default

use serde::Serialize;
use thiserror::Error;

use crate::routing::component::{Component, Composition};

/// Error raised while building a route table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route path {0:?} must start with '/'")]
    InvalidPath(String),

    #[error("route path {0:?} is declared more than once")]
    DuplicatePath(String),

    #[error("route {0:?} has an empty composition")]
    EmptyComposition(String),

    #[error("route {route:?} places chrome component {component} inside its composition")]
    ChromeInComposition { route: String, component: Component },
}

/// A literal path mapped to the components rendered for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    /// Route identifier for logging/metrics.
    pub name: String,

    /// Literal path, always starting with `/`.
    pub path: String,

    pub composition: Composition,
}

/// Ordered, immutable set of routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// The CardCognition site: landing page with the optimizer, and the docs.
    pub fn cardcognition() -> Self {
        Self {
            routes: vec![
                Route {
                    name: "home".to_string(),
                    path: "/".to_string(),
                    composition: Composition::from([
                        Component::HeroSection,
                        Component::DeckOptimizer,
                    ]),
                },
                Route {
                    name: "docs".to_string(),
                    path: "/docs".to_string(),
                    composition: Composition::from([Component::DevDocs]),
                },
            ],
        }
    }

    /// Find the first route whose path equals `path`.
    pub fn lookup(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.path == path)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::cardcognition()
    }
}

/// Collects routes in declaration order and validates them on `build`.
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    routes: Vec<Route>,
}

impl RouteTableBuilder {
    pub fn route(
        mut self,
        name: impl Into<String>,
        path: impl Into<String>,
        composition: impl Into<Composition>,
    ) -> Self {
        self.routes.push(Route {
            name: name.into(),
            path: path.into(),
            composition: composition.into(),
        });
        self
    }

    pub fn build(self) -> Result<RouteTable, RouteError> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.routes.len());

        for route in &self.routes {
            if !route.path.starts_with('/') {
                return Err(RouteError::InvalidPath(route.path.clone()));
            }
            if seen.contains(&route.path.as_str()) {
                return Err(RouteError::DuplicatePath(route.path.clone()));
            }
            if route.composition.is_empty() {
                return Err(RouteError::EmptyComposition(route.name.clone()));
            }
            if let Some(component) = route.composition.iter().find(|c| c.is_chrome()) {
                return Err(RouteError::ChromeInComposition {
                    route: route.name.clone(),
                    component,
                });
            }
            seen.push(&route.path);
        }

        Ok(RouteTable {
            routes: self.routes,
        })
    }
}
