//! Renderable units of a page.
//!
//! Components are opaque to the router: it only orders them. What each one
//! draws is owned by the render layer.

use serde::Serialize;
use std::fmt;

/// A presentational unit the shell can place on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Component {
    Navbar,
    HeroSection,
    DeckOptimizer,
    DevDocs,
    Footer,
    /// Body of the fallback page for paths with no route.
    NotFound,
}

impl Component {
    /// Stable name used in markup and metric labels.
    pub const fn name(self) -> &'static str {
        match self {
            Component::Navbar => "Navbar",
            Component::HeroSection => "HeroSection",
            Component::DeckOptimizer => "DeckOptimizer",
            Component::DevDocs => "DevDocs",
            Component::Footer => "Footer",
            Component::NotFound => "NotFound",
        }
    }

    /// Chrome components wrap every page and never appear inside a route's
    /// composition.
    pub const fn is_chrome(self) -> bool {
        matches!(self, Component::Navbar | Component::Footer)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered list of components rendered top to bottom for one route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Composition(Vec<Component>);

impl Composition {
    pub fn new(components: impl IntoIterator<Item = Component>) -> Self {
        Self(components.into_iter().collect())
    }

    pub fn components(&self) -> &[Component] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Component> + '_ {
        self.0.iter().copied()
    }
}

impl<const N: usize> From<[Component; N]> for Composition {
    fn from(components: [Component; N]) -> Self {
        Self::new(components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chrome_components() {
        assert!(Component::Navbar.is_chrome());
        assert!(Component::Footer.is_chrome());
        assert!(!Component::DeckOptimizer.is_chrome());
        assert!(!Component::NotFound.is_chrome());
    }

    #[test]
    fn test_composition_preserves_order() {
        let composition = Composition::from([Component::HeroSection, Component::DeckOptimizer]);
        let names: Vec<_> = composition.iter().map(Component::name).collect();
        assert_eq!(names, ["HeroSection", "DeckOptimizer"]);
    }

    #[test]
    fn test_composition_serializes_as_names() {
        let composition = Composition::from([Component::DevDocs]);
        let json = serde_json::to_string(&composition).unwrap();
        assert_eq!(json, r#"["DevDocs"]"#);
    }
}
