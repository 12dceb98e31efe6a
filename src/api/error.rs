//! Gateway errors and their JSON rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Why the gateway answered instead of the upstream API.
///
/// Messages match the upstream API's own error strings so the optimizer
/// component handles both sources the same way.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Commander name too long.")]
    NameTooLong,

    #[error("Count must be an integer.")]
    CountNotInteger,

    #[error("Start and end must be integers.")]
    RangeNotInteger,

    #[error("Path segment is not valid UTF-8.")]
    BadEncoding,

    #[error("Content-Type not supported!")]
    UnsupportedContentType,

    #[error("Unknown API endpoint.")]
    UnknownEndpoint,

    #[error("Method not allowed.")]
    MethodNotAllowed,

    #[error("Request body too large.")]
    BodyTooLarge,

    #[error("API gateway disabled.")]
    Disabled,

    #[error("Upstream request failed.")]
    Upstream,

    #[error("Upstream request timed out.")]
    Timeout,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NameTooLong
            | ApiError::CountNotInteger
            | ApiError::RangeNotInteger
            | ApiError::BadEncoding => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::UnknownEndpoint => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Disabled => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream => StatusCode::BAD_GATEWAY,
            ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
