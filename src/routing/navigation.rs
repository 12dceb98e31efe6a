//! Per-session navigation state.
//!
//! # State
//! ```text
//! entries: [ "/", "/docs", "/" ]
//!                            ^ cursor (current path)
//! ```
//!
//! # Transitions
//! - `Link` / `Programmatic`: drop entries after the cursor, push the new path
//! - `Back` / `Forward`: move the cursor, entries untouched
//!
//! The state is created from the initial location and only changes through
//! [`NavigationState::navigate`]. Everything else reads it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Something that changes the current path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum NavigationEvent {
    /// The user activated a link.
    Link(String),
    /// Code asked for a redirect.
    Programmatic(String),
    /// History back button.
    Back,
    /// History forward button.
    Forward,
}

impl NavigationEvent {
    /// Label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            NavigationEvent::Link(_) => "link",
            NavigationEvent::Programmatic(_) => "programmatic",
            NavigationEvent::Back => "back",
            NavigationEvent::Forward => "forward",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("path {0:?} must be non-empty and start with '/'")]
    InvalidPath(String),

    #[error("no history entry to go {0}")]
    NoHistory(&'static str),
}

/// Validate a navigation target.
pub fn validate_path(path: &str) -> Result<(), NavigationError> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(NavigationError::InvalidPath(path.to_string()))
    }
}

/// History stack with a cursor at the current entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    entries: Vec<String>,
    cursor: usize,
}

impl NavigationState {
    /// Start a session at `initial_path`, the location the page was loaded from.
    pub fn new(initial_path: impl Into<String>) -> Result<Self, NavigationError> {
        let initial_path = initial_path.into();
        validate_path(&initial_path)?;
        Ok(Self {
            entries: vec![initial_path],
            cursor: 0,
        })
    }

    pub fn current(&self) -> &str {
        &self.entries[self.cursor]
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Number of entries in the history stack.
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Apply one event. On error the state is left unchanged.
    pub fn navigate(&mut self, event: NavigationEvent) -> Result<&str, NavigationError> {
        match event {
            NavigationEvent::Link(path) | NavigationEvent::Programmatic(path) => {
                validate_path(&path)?;
                self.entries.truncate(self.cursor + 1);
                self.entries.push(path);
                self.cursor += 1;
            }
            NavigationEvent::Back => {
                if !self.can_go_back() {
                    return Err(NavigationError::NoHistory("back"));
                }
                self.cursor -= 1;
            }
            NavigationEvent::Forward => {
                if !self.can_go_forward() {
                    return Err(NavigationError::NoHistory("forward"));
                }
                self.cursor += 1;
            }
        }
        Ok(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(path: &str) -> NavigationEvent {
        NavigationEvent::Link(path.to_string())
    }

    #[test]
    fn test_initial_path_is_validated() {
        assert!(NavigationState::new("/docs").is_ok());
        assert_eq!(
            NavigationState::new(""),
            Err(NavigationError::InvalidPath(String::new()))
        );
        assert_eq!(
            NavigationState::new("docs"),
            Err(NavigationError::InvalidPath("docs".into()))
        );
    }

    #[test]
    fn test_link_navigation_round_trip() {
        let mut nav = NavigationState::new("/").unwrap();
        assert_eq!(nav.navigate(link("/docs")).unwrap(), "/docs");
        assert_eq!(nav.navigate(link("/")).unwrap(), "/");
        assert_eq!(nav.depth(), 3);
        assert!(nav.can_go_back());
        assert!(!nav.can_go_forward());
    }

    #[test]
    fn test_back_and_forward() {
        let mut nav = NavigationState::new("/").unwrap();
        nav.navigate(link("/docs")).unwrap();

        assert_eq!(nav.navigate(NavigationEvent::Back).unwrap(), "/");
        assert_eq!(
            nav.navigate(NavigationEvent::Back),
            Err(NavigationError::NoHistory("back"))
        );
        assert_eq!(nav.navigate(NavigationEvent::Forward).unwrap(), "/docs");
        assert_eq!(
            nav.navigate(NavigationEvent::Forward),
            Err(NavigationError::NoHistory("forward"))
        );
    }

    #[test]
    fn test_navigating_after_back_drops_forward_entries() {
        let mut nav = NavigationState::new("/").unwrap();
        nav.navigate(link("/docs")).unwrap();
        nav.navigate(NavigationEvent::Back).unwrap();
        nav.navigate(NavigationEvent::Programmatic("/missing".into()))
            .unwrap();

        assert_eq!(nav.current(), "/missing");
        assert_eq!(nav.depth(), 2);
        assert!(!nav.can_go_forward());
    }

    #[test]
    fn test_invalid_event_leaves_state_unchanged() {
        let mut nav = NavigationState::new("/docs").unwrap();
        let before = nav.clone();
        assert!(nav.navigate(link("relative")).is_err());
        assert_eq!(nav, before);
    }

    #[test]
    fn test_event_wire_format() {
        let event: NavigationEvent =
            serde_json::from_str(r#"{"kind":"link","path":"/docs"}"#).unwrap();
        assert_eq!(event, link("/docs"));

        let event: NavigationEvent = serde_json::from_str(r#"{"kind":"back"}"#).unwrap();
        assert_eq!(event, NavigationEvent::Back);
    }
}
