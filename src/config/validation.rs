//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, attempts >= 1)
//! - Check addresses, URLs and header values parse
//! - Keep the API mount off server paths and pages
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ShellConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::ShellConfig;
use crate::routing::RouteTable;

/// Paths the server claims for itself.
const RESERVED_PATHS: [&str; 2] = ["/healthz", "/_shell"];

/// Characters the router reads as captures or wildcards.
const PATH_SYNTAX: [char; 3] = ['{', '}', '*'];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check every section and collect all problems.
pub fn validate_config(config: &ShellConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("{:?} is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::new("listener.max_connections", "must be > 0"));
    }

    if let Err(message) = check_api_base(&config.site.api_base) {
        errors.push(ValidationError::new("site.api_base", message));
    }

    match Url::parse(&config.api.upstream) {
        Ok(url) if url.scheme() == "http" => {}
        Ok(url) => errors.push(ValidationError::new(
            "api.upstream",
            format!("unsupported scheme {:?}, only http upstreams are supported", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("api.upstream", e.to_string())),
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::new("timeouts.connect_secs", "must be > 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::new("retries.max_attempts", "must be >= 1"));
    }
    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::new(
            "retries.base_delay_ms",
            "must not exceed retries.max_delay_ms",
        ));
    }

    for origin in &config.cors.allowed_origins {
        if HeaderValue::from_str(origin).is_err() {
            errors.push(ValidationError::new(
                "cors.allowed_origins",
                format!("{origin:?} is not a valid header value"),
            ));
        }
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "{:?} is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// The gateway mount must be a plain literal path that shadows neither a
/// server path nor a page.
fn check_api_base(api_base: &str) -> Result<(), String> {
    if !api_base.starts_with('/') {
        return Err("must start with '/'".into());
    }
    if api_base.contains(PATH_SYNTAX) {
        return Err(format!("{api_base:?} must not contain '{{', '}}' or '*'"));
    }
    let base = api_base.trim_end_matches('/');
    if base.is_empty() {
        return Err("must not be the site root".into());
    }
    if RESERVED_PATHS.contains(&base) {
        return Err(format!("{api_base:?} is reserved"));
    }
    let shadowed = RouteTable::cardcognition()
        .routes()
        .iter()
        .find(|route| route.path == base || route.path.starts_with(&format!("{base}/")))
        .map(|route| route.path.clone());
    if let Some(path) = shadowed {
        return Err(format!("{api_base:?} would shadow the page at {path:?}"));
    }
    Ok(())
}
