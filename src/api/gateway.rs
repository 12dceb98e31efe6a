//! Forwarding to the upstream deck-optimizer API.
//!
//! # Responsibilities
//! - Validate the call locally (`Endpoint::parse`) before any upstream I/O
//! - Rewrite the URI onto the configured upstream
//! - Retry idempotent calls with backoff, bound every attempt by a timeout
//! - Swap live settings on config reload
//!
//! # Design Decisions
//! - Settings are read once per request from an `ArcSwap`, so a reload never
//!   changes policy halfway through a retry loop
//! - The request body is buffered (bounded) so retries can resend it
//! - Upstream responses, including error statuses, are passed through as-is

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::{Body, Bytes},
    http::{header, request::Parts, HeaderMap, HeaderName, Request, Uri},
    response::{IntoResponse, Response},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::api::endpoint::{is_json_content_type, Endpoint};
use crate::api::error::ApiError;
use crate::config::{ApiConfig, RetryConfig, ShellConfig};
use crate::http::request::request_id;
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;
use crate::resilience::retries::{is_retryable, max_attempts};

/// Headers that describe the client connection, not the request.
const HOP_BY_HOP: [HeaderName; 6] = [
    header::CONNECTION,
    header::HOST,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Policy that may change on reload.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewaySettings {
    pub api: ApiConfig,
    pub retries: RetryConfig,
    pub request_timeout: Duration,
}

impl GatewaySettings {
    pub fn from_config(config: &ShellConfig) -> Self {
        Self {
            api: config.api.clone(),
            retries: config.retries.clone(),
            request_timeout: Duration::from_secs(config.timeouts.request_secs),
        }
    }

    /// Absolute upstream URI for `endpoint`, keeping the caller's query.
    fn upstream_uri(&self, endpoint: &Endpoint, query: Option<&str>) -> Result<Uri, ApiError> {
        let mut target = format!(
            "{}{}",
            self.api.upstream.trim_end_matches('/'),
            endpoint.upstream_path()
        );
        if let Some(query) = query {
            target.push('?');
            target.push_str(query);
        }
        target.parse().map_err(|e| {
            tracing::error!(uri = %target, error = %e, "Invalid upstream URI");
            ApiError::Upstream
        })
    }
}

/// Validating reverse proxy for `/api/*`.
pub struct ApiGateway {
    settings: ArcSwap<GatewaySettings>,
    client: Client<HttpConnector, Body>,
}

impl ApiGateway {
    pub fn new(config: &ShellConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            settings: ArcSwap::from_pointee(GatewaySettings::from_config(config)),
            client,
        }
    }

    pub fn settings(&self) -> Arc<GatewaySettings> {
        self.settings.load_full()
    }

    /// Apply the live parts of a reloaded config.
    pub fn reload(&self, config: &ShellConfig) {
        let next = GatewaySettings::from_config(config);
        if *self.settings.load_full() == next {
            return;
        }
        tracing::info!(
            upstream = %next.api.upstream,
            enabled = next.api.enabled,
            max_attempts = next.retries.max_attempts,
            "API gateway settings reloaded"
        );
        self.settings.store(Arc::new(next));
    }

    /// Handle one request. `path` is relative to the gateway mount.
    pub async fn handle(&self, path: &str, request: Request<Body>) -> Response {
        let start = Instant::now();
        let settings = self.settings.load_full();

        let (parts, body) = request.into_parts();
        let request_id = request_id(&parts.headers).to_string();

        let endpoint = match self.admit(&settings, path, &parts) {
            Ok(endpoint) => endpoint,
            Err(e) => {
                tracing::debug!(request_id = %request_id, path = %path, error = %e, "API request rejected");
                metrics::record_api_request("rejected", e.status().as_u16(), start);
                return e.into_response();
            }
        };

        let body = match axum::body::to_bytes(body, settings.api.max_body_bytes).await {
            Ok(bytes) => bytes,
            Err(_) => {
                let e = ApiError::BodyTooLarge;
                metrics::record_api_request(endpoint.name(), e.status().as_u16(), start);
                return e.into_response();
            }
        };

        let response = match self
            .forward(&settings, &endpoint, &parts, body, &request_id)
            .await
        {
            Ok(response) => response,
            Err(e) => e.into_response(),
        };
        metrics::record_api_request(endpoint.name(), response.status().as_u16(), start);
        response
    }

    fn admit(
        &self,
        settings: &GatewaySettings,
        path: &str,
        parts: &Parts,
    ) -> Result<Endpoint, ApiError> {
        if !settings.api.enabled {
            return Err(ApiError::Disabled);
        }
        let endpoint = Endpoint::parse(&parts.method, path)?;
        if matches!(endpoint, Endpoint::Analyze { .. }) {
            let content_type = parts
                .headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok());
            if !is_json_content_type(content_type) {
                return Err(ApiError::UnsupportedContentType);
            }
        }
        Ok(endpoint)
    }

    async fn forward(
        &self,
        settings: &GatewaySettings,
        endpoint: &Endpoint,
        parts: &Parts,
        body: Bytes,
        request_id: &str,
    ) -> Result<Response, ApiError> {
        let uri = settings.upstream_uri(endpoint, parts.uri.query())?;
        let headers = forwarded_headers(&parts.headers);
        let attempts_allowed = max_attempts(&parts.method, &settings.retries);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let mut builder = Request::builder()
                .method(parts.method.clone())
                .uri(uri.clone());
            if let Some(target) = builder.headers_mut() {
                target.extend(headers.clone());
            }
            let request = builder.body(Body::from(body.clone())).map_err(|e| {
                tracing::error!(request_id = %request_id, error = %e, "Failed to build upstream request");
                ApiError::Upstream
            })?;

            let failure = match tokio::time::timeout(
                settings.request_timeout,
                self.client.request(request),
            )
            .await
            {
                Ok(Ok(response)) => {
                    let status = response.status();
                    if attempt < attempts_allowed && is_retryable(&parts.method, Some(status)) {
                        let delay = calculate_backoff(attempt, &settings.retries);
                        tracing::info!(request_id = %request_id, attempt, delay = ?delay, status = %status, "Retrying API request");
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    tracing::debug!(request_id = %request_id, endpoint = endpoint.name(), status = %status, "API request forwarded");
                    let (parts, body) = response.into_parts();
                    return Ok(Response::from_parts(parts, Body::new(body)));
                }
                Ok(Err(e)) => {
                    tracing::warn!(request_id = %request_id, attempt, error = %e, "Upstream API error");
                    ApiError::Upstream
                }
                Err(_) => {
                    tracing::warn!(request_id = %request_id, attempt, "Upstream API timed out");
                    ApiError::Timeout
                }
            };

            if attempt < attempts_allowed && is_retryable(&parts.method, None) {
                let delay = calculate_backoff(attempt, &settings.retries);
                tokio::time::sleep(delay).await;
                continue;
            }
            return Err(failure);
        }
    }
}

fn forwarded_headers(incoming: &HeaderMap) -> HeaderMap {
    let mut headers = incoming.clone();
    for name in &HOP_BY_HOP {
        headers.remove(name);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::X_REQUEST_ID;
    use axum::http::{HeaderValue, Method, StatusCode};

    fn gateway() -> ApiGateway {
        ApiGateway::new(&ShellConfig::default())
    }

    #[test]
    fn test_upstream_uri_keeps_query() {
        let mut config = ShellConfig::default();
        config.api.upstream = "http://api.internal:5000/".into();
        let settings = GatewaySettings::from_config(&config);

        let uri = settings
            .upstream_uri(&Endpoint::DbInfo, Some("fresh=1"))
            .unwrap();
        assert_eq!(uri.to_string(), "http://api.internal:5000/dbinfo?fresh=1");
    }

    #[test]
    fn test_hop_by_hop_headers_are_dropped() {
        let mut incoming = HeaderMap::new();
        incoming.insert(header::HOST, HeaderValue::from_static("cardcognition.com"));
        incoming.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        incoming.insert(X_REQUEST_ID, HeaderValue::from_static("abc"));

        let headers = forwarded_headers(&incoming);
        assert!(headers.get(header::HOST).is_none());
        assert!(headers.get(header::CONNECTION).is_none());
        assert_eq!(headers.get(X_REQUEST_ID).unwrap(), "abc");
    }

    #[test]
    fn test_reload_swaps_settings() {
        let gateway = gateway();
        let mut config = ShellConfig::default();
        config.api.upstream = "http://10.0.0.2:5000".into();
        config.retries.max_attempts = 5;

        gateway.reload(&config);
        let settings = gateway.settings();
        assert_eq!(settings.api.upstream, "http://10.0.0.2:5000");
        assert_eq!(settings.retries.max_attempts, 5);
    }

    #[tokio::test]
    async fn test_disabled_gateway() {
        let gateway = gateway();
        let mut config = ShellConfig::default();
        config.api.enabled = false;
        gateway.reload(&config);

        let request = Request::get("/api/dbinfo").body(Body::empty()).unwrap();
        let response = gateway.handle("/dbinfo", request).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_analyze_requires_json() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/analyze/krenko")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("[]"))
            .unwrap();
        let response = gateway().handle("/analyze/krenko", request).await;
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let mut config = ShellConfig::default();
        config.api.max_body_bytes = 16;
        let gateway = ApiGateway::new(&config);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/analyze/krenko")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(format!("[{}]", "\"Goblin Matron\",".repeat(8))))
            .unwrap();
        let response = gateway.handle("/analyze/krenko", request).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Request body too large.");
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_upstream() {
        // The default upstream is not listening; a local rejection proves
        // no connection was attempted.
        let long = "x".repeat(40);
        let path = format!("/{long}/info");
        let request = Request::get(format!("/api{path}"))
            .body(Body::empty())
            .unwrap();
        let response = gateway().handle(&path, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
