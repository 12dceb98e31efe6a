//! HTML rendering of resolved pages.
//!
//! Each component becomes a mount point tagged with `data-component` so the
//! client bundle can hydrate it. The routed composition lives in `<main>`;
//! the chrome sits outside it.

use maud::{html, Markup, DOCTYPE};

use crate::config::SiteConfig;
use crate::routing::{Component, Resolution, RouteTable};

/// One entry in the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NavLink {
    label: String,
    path: String,
}

/// Renders resolutions into complete documents.
#[derive(Debug, Clone)]
pub struct PageRenderer {
    title: String,
    api_base: String,
    links: Vec<NavLink>,
}

impl PageRenderer {
    pub fn new(site: &SiteConfig, routes: &RouteTable) -> Self {
        let links = routes
            .routes()
            .iter()
            .map(|route| NavLink {
                label: nav_label(&route.name),
                path: route.path.clone(),
            })
            .collect();

        Self {
            title: site.title.clone(),
            api_base: site.api_base.clone(),
            links,
        }
    }

    /// Full HTML document for `resolution`.
    pub fn render(&self, resolution: &Resolution) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (self.title) }
                }
                body {
                    div class="App" {
                        (self.component(Component::Navbar, &resolution.path))
                        main {
                            @for component in resolution.page.content() {
                                (self.component(*component, &resolution.path))
                            }
                        }
                        (self.component(Component::Footer, &resolution.path))
                    }
                }
            }
        }
    }

    fn component(&self, component: Component, path: &str) -> Markup {
        match component {
            Component::Navbar => html! {
                nav data-component=(component.name()) {
                    a class="brand" href="/" { (self.title) }
                    ul {
                        @for link in &self.links {
                            li {
                                a href=(link.path)
                                    aria-current=[(link.path == path).then_some("page")] {
                                    (link.label)
                                }
                            }
                        }
                    }
                }
            },
            Component::HeroSection => html! {
                section id="hero" data-component=(component.name()) {
                    h1 { (self.title) }
                }
            },
            Component::DeckOptimizer => html! {
                section id="deck-optimizer"
                    data-component=(component.name())
                    data-api-base=(self.api_base) {}
            },
            Component::DevDocs => html! {
                section id="docs"
                    data-component=(component.name())
                    data-api-base=(self.api_base) {}
            },
            Component::NotFound => html! {
                section id="not-found" data-component=(component.name()) {
                    h1 { "Page not found" }
                    p { "Nothing lives at " code { (path) } "." }
                    a href="/" { "Back to the optimizer" }
                }
            },
            Component::Footer => html! {
                footer data-component=(component.name()) {
                    small { (self.title) }
                }
            },
        }
    }
}

/// "docs" → "Docs", "home" → "Home".
fn nav_label(route_name: &str) -> String {
    let mut chars = route_name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Shell;
    use scraper::{Html, Selector};

    fn render(path: &str) -> Html {
        let shell = Shell::default();
        let renderer = PageRenderer::new(&SiteConfig::default(), shell.routes());
        Html::parse_document(&renderer.render(&shell.resolve(path)).into_string())
    }

    fn mounted(doc: &Html) -> Vec<String> {
        let selector = Selector::parse("[data-component]").unwrap();
        doc.select(&selector)
            .filter_map(|el| el.value().attr("data-component"))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_home_document_order() {
        let doc = render("/");
        assert_eq!(
            mounted(&doc),
            ["Navbar", "HeroSection", "DeckOptimizer", "Footer"]
        );
    }

    #[test]
    fn test_docs_document_order() {
        assert_eq!(mounted(&render("/docs")), ["Navbar", "DevDocs", "Footer"]);
    }

    #[test]
    fn test_chrome_is_outside_main() {
        let doc = render("/docs");
        let in_main = Selector::parse("main [data-component]").unwrap();
        let names: Vec<_> = doc
            .select(&in_main)
            .filter_map(|el| el.value().attr("data-component"))
            .collect();
        assert_eq!(names, ["DevDocs"]);
    }

    #[test]
    fn test_navbar_marks_current_route() {
        let doc = render("/docs");
        let current = Selector::parse(r#"nav a[aria-current="page"]"#).unwrap();
        let links: Vec<_> = doc
            .select(&current)
            .filter_map(|el| el.value().attr("href"))
            .collect();
        assert_eq!(links, ["/docs"]);
    }

    #[test]
    fn test_not_found_escapes_path() {
        let shell = Shell::default();
        let renderer = PageRenderer::new(&SiteConfig::default(), shell.routes());
        let html = renderer
            .render(&shell.resolve("/<script>"))
            .into_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_optimizer_knows_api_base() {
        let doc = render("/");
        let optimizer = Selector::parse("#deck-optimizer").unwrap();
        let el = doc.select(&optimizer).next().unwrap();
        assert_eq!(el.value().attr("data-api-base"), Some("/api"));
    }

    #[test]
    fn test_nav_label() {
        assert_eq!(nav_label("docs"), "Docs");
        assert_eq!(nav_label(""), "");
    }
}
