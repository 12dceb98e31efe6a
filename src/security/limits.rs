//! In-flight request limit.
//!
//! # Design Decisions
//! - One semaphore permit per request, held until the response is produced
//! - Fail fast with 503 instead of queueing when the limit is reached

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Semaphore;

/// Shared permit pool for [`in_flight_limit_middleware`].
#[derive(Clone)]
pub struct InFlightLimit {
    permits: Arc<Semaphore>,
}

impl InFlightLimit {
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_in_flight)),
        }
    }

    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

pub async fn in_flight_limit_middleware(
    State(limit): State<InFlightLimit>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match limit.permits.clone().try_acquire_owned() {
        Ok(_permit) => next.run(request).await,
        Err(_) => {
            tracing::warn!(path = %request.uri().path(), "In-flight request limit reached");
            (StatusCode::SERVICE_UNAVAILABLE, "Server busy").into_response()
        }
    }
}
