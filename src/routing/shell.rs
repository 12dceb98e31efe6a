//! The application shell: persistent chrome around one routed composition.
//!
//! ```text
//! Navbar
//! ┌──────────────────────────┐
//! │ composition of the route │  ← exactly one, or NotFound
//! └──────────────────────────┘
//! Footer
//! ```

use std::sync::Arc;

use serde::Serialize;

use crate::routing::component::{Component, Composition};
use crate::routing::navigation::{NavigationError, NavigationEvent, NavigationState};
use crate::routing::router::RouteTable;

/// Everything rendered for one path, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Page(Vec<Component>);

impl Page {
    fn wrap(content: &Composition) -> Self {
        let mut components = Vec::with_capacity(content.components().len() + 2);
        components.push(Component::Navbar);
        components.extend(content.iter());
        components.push(Component::Footer);
        Self(components)
    }

    pub fn components(&self) -> &[Component] {
        &self.0
    }

    /// The routed part of the page, without the chrome.
    pub fn content(&self) -> &[Component] {
        &self.0[1..self.0.len() - 1]
    }
}

/// Outcome of resolving one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub path: String,

    /// Name of the matched route, `None` when the NotFound page was used.
    pub route: Option<String>,

    pub page: Page,
}

impl Resolution {
    pub fn is_match(&self) -> bool {
        self.route.is_some()
    }

    /// Route label for metrics and logs.
    pub fn route_label(&self) -> &str {
        self.route.as_deref().unwrap_or("not_found")
    }
}

/// Owns the route table and wraps every resolved composition in the chrome.
#[derive(Debug, Clone)]
pub struct Shell {
    routes: Arc<RouteTable>,
    not_found: Composition,
}

impl Shell {
    pub fn new(routes: RouteTable) -> Self {
        Self {
            routes: Arc::new(routes),
            not_found: Composition::from([Component::NotFound]),
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Resolve `path` to exactly one page.
    pub fn resolve(&self, path: &str) -> Resolution {
        match self.routes.lookup(path) {
            Some(route) => Resolution {
                path: path.to_string(),
                route: Some(route.name.clone()),
                page: Page::wrap(&route.composition),
            },
            None => {
                tracing::debug!(path = %path, "No route matched, using NotFound page");
                Resolution {
                    path: path.to_string(),
                    route: None,
                    page: Page::wrap(&self.not_found),
                }
            }
        }
    }

    /// Start a navigation session at `initial_path`.
    pub fn session(&self, initial_path: &str) -> Result<Session, NavigationError> {
        Ok(Session {
            shell: self.clone(),
            state: NavigationState::new(initial_path)?,
        })
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new(RouteTable::cardcognition())
    }
}

/// One browsing session: a shell plus its navigation state.
#[derive(Debug, Clone)]
pub struct Session {
    shell: Shell,
    state: NavigationState,
}

impl Session {
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// The page for the current path.
    pub fn current(&self) -> Resolution {
        self.shell.resolve(self.state.current())
    }

    /// Apply one navigation event and resolve the resulting path.
    pub fn dispatch(&mut self, event: NavigationEvent) -> Result<Resolution, NavigationError> {
        let kind = event.kind();
        let path = self.state.navigate(event)?;
        tracing::debug!(kind, path = %path, "Navigation event applied");
        crate::observability::metrics::record_navigation(kind);
        Ok(self.shell.resolve(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Component::*;

    #[test]
    fn test_home_page() {
        let shell = Shell::default();
        let resolution = shell.resolve("/");
        assert!(resolution.is_match());
        assert_eq!(resolution.route_label(), "home");
        assert_eq!(
            resolution.page.components(),
            &[Navbar, HeroSection, DeckOptimizer, Footer]
        );
        assert_eq!(resolution.page.content(), &[HeroSection, DeckOptimizer]);
    }

    #[test]
    fn test_docs_page() {
        let resolution = Shell::default().resolve("/docs");
        assert_eq!(resolution.page.components(), &[Navbar, DevDocs, Footer]);
    }

    #[test]
    fn test_unknown_path_gets_not_found_page() {
        let resolution = Shell::default().resolve("/missing");
        assert!(!resolution.is_match());
        assert_eq!(resolution.route_label(), "not_found");
        assert_eq!(resolution.page.components(), &[Navbar, NotFound, Footer]);
    }

    #[test]
    fn test_chrome_wraps_every_page() {
        let shell = Shell::default();
        for path in ["/", "/docs", "/missing", "/docs/"] {
            let page = shell.resolve(path).page;
            assert_eq!(page.components().first(), Some(&Navbar), "{path}");
            assert_eq!(page.components().last(), Some(&Footer), "{path}");
            assert!(page.content().iter().all(|c| !c.is_chrome()), "{path}");
        }
    }

    #[test]
    fn test_session_round_trip_restores_page() {
        let shell = Shell::default();
        let mut session = shell.session("/").unwrap();
        let start = session.current();

        let docs = session
            .dispatch(NavigationEvent::Link("/docs".into()))
            .unwrap();
        assert_eq!(docs.page.components(), &[Navbar, DevDocs, Footer]);

        let back_home = session.dispatch(NavigationEvent::Link("/".into())).unwrap();
        assert_eq!(back_home, start);
    }

    #[test]
    fn test_session_history_buttons() {
        let mut session = Shell::default().session("/docs").unwrap();
        session
            .dispatch(NavigationEvent::Programmatic("/".into()))
            .unwrap();

        let back = session.dispatch(NavigationEvent::Back).unwrap();
        assert_eq!(back.path, "/docs");
        let forward = session.dispatch(NavigationEvent::Forward).unwrap();
        assert_eq!(forward.path, "/");
        assert!(session.dispatch(NavigationEvent::Forward).is_err());
        assert_eq!(session.state().current(), "/");
    }
}
