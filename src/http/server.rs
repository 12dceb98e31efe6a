//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router: pages, shell queries, health, API gateway
//! - Wire up middleware (request ID, tracing, timeout, limits, CORS, headers)
//! - Serve until shutdown, applying live config updates

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware,
    response::Response,
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::api::ApiGateway;
use crate::config::ShellConfig;
use crate::http::pages::{compose_handler, health_handler, page_handler, routes_handler};
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::render::PageRenderer;
use crate::routing::Shell;
use crate::security::headers::{cors_layer, with_security_headers};
use crate::security::limits::{in_flight_limit_middleware, InFlightLimit};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub shell: Shell,
    pub renderer: Arc<PageRenderer>,
    pub gateway: Arc<ApiGateway>,
    /// Mount path of the gateway, e.g. `/api`.
    pub api_base: Arc<str>,
}

/// HTTP server for the web shell.
pub struct HttpServer {
    router: Router,
    config: ShellConfig,
    gateway: Arc<ApiGateway>,
}

impl HttpServer {
    /// Server for the CardCognition route table.
    pub fn new(config: ShellConfig) -> Self {
        Self::with_shell(config, Shell::default())
    }

    pub fn with_shell(config: ShellConfig, shell: Shell) -> Self {
        let gateway = Arc::new(ApiGateway::new(&config));
        let renderer = Arc::new(PageRenderer::new(&config.site, shell.routes()));
        let api_base: Arc<str> = config.site.api_base.trim_end_matches('/').into();

        let state = AppState {
            shell,
            renderer,
            gateway: gateway.clone(),
            api_base,
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            gateway,
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The request timeout wraps page handlers only. Gateway calls are
    /// bounded per upstream attempt by the gateway itself, with the live
    /// `timeouts.request_secs`.
    #[allow(deprecated)]
    fn build_router(config: &ShellConfig, state: AppState) -> Router {
        let api_base = state.api_base.to_string();
        let limit = InFlightLimit::new(config.listener.max_connections);

        let pages: Router<AppState> = Router::new()
            .route("/healthz", get(health_handler))
            .route("/_shell/compose", get(compose_handler))
            .route("/_shell/routes", get(routes_handler))
            .fallback(page_handler)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )));

        let api: Router<AppState> = Router::new()
            .route(&api_base, any(api_handler))
            .route(&format!("{api_base}/"), any(api_handler))
            .route(&format!("{api_base}/{{*rest}}"), any(api_handler));

        let router = api
            .merge(pages)
            .with_state(state)
            .layer(middleware::from_fn_with_state(limit, in_flight_limit_middleware))
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(propagate_request_id_layer()),
            )
            .layer(cors_layer(&config.cors));

        if config.security.enable_headers {
            with_security_headers(router)
        } else {
            router
        }
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ShellConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let gateway = self.gateway.clone();
        let mut current = self.config.clone();
        tokio::spawn(async move {
            while let Some(next) = config_updates.recv().await {
                warn_restart_required(&current, &next);
                gateway.reload(&next);
                current = next;
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Gateway handler: strips the mount path and hands off.
async fn api_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let path = request
        .uri()
        .path()
        .strip_prefix(state.api_base.as_ref())
        .unwrap_or("/")
        .to_string();
    state.gateway.handle(&path, request).await
}

/// Sections baked into the router at startup. `timeouts.request_secs` applies
/// live to the gateway but the page timeout keeps its startup value.
fn warn_restart_required(current: &ShellConfig, next: &ShellConfig) {
    let sections = [
        ("listener", current.listener != next.listener),
        ("site", current.site != next.site),
        ("cors", current.cors != next.cors),
        ("security", current.security != next.security),
        ("observability", current.observability != next.observability),
        (
            "timeouts.connect_secs",
            current.timeouts.connect_secs != next.timeouts.connect_secs,
        ),
        (
            "timeouts.request_secs (pages)",
            current.timeouts.request_secs != next.timeouts.request_secs,
        ),
    ];
    for (section, changed) in sections {
        if changed {
            tracing::warn!(section, "Config change requires a restart to take effect");
        }
    }
}
