//! Page and shell handlers.
//!
//! # Responsibilities
//! - Serve a full document for any page path (direct URL load)
//! - Answer resolution queries for in-session navigation
//! - Publish the route table
//!
//! Matched routes answer 200; the NotFound page answers 404 with the same
//! chrome.

use axum::{
    extract::{Query, State},
    http::{header, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::navigation::validate_path;
use crate::routing::Route;

/// Fallback handler: every path not claimed by another handler is a page.
pub async fn page_handler(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET, HEAD")],
            "Method not allowed",
        )
            .into_response();
    }

    let resolution = state.shell.resolve(uri.path());
    let status = if resolution.is_match() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };

    tracing::debug!(path = %resolution.path, route = resolution.route_label(), "Rendering page");
    metrics::record_page_render(resolution.route_label(), status.as_u16());

    let document = state.renderer.render(&resolution).into_string();
    (status, Html(document)).into_response()
}

#[derive(Debug, Deserialize)]
pub struct ComposeQuery {
    pub path: String,
}

/// `GET /_shell/compose?path=/docs` → the resolution as JSON.
pub async fn compose_handler(
    State(state): State<AppState>,
    Query(query): Query<ComposeQuery>,
) -> Response {
    if let Err(e) = validate_path(&query.path) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response();
    }
    Json(state.shell.resolve(&query.path)).into_response()
}

/// `GET /_shell/routes` → the route table.
pub async fn routes_handler(State(state): State<AppState>) -> Json<Vec<Route>> {
    Json(state.shell.routes().routes().to_vec())
}

pub async fn health_handler() -> &'static str {
    "ok"
}
