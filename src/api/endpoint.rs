//! Deck-optimizer API endpoints and their request limits.
//!
//! Paths are relative to the gateway mount (`/api`). Raw segments are
//! percent-decoded before matching and re-encoded when the upstream path is
//! built, so the upstream always sees a canonical form.

use std::borrow::Cow;

use axum::http::Method;

use crate::api::error::ApiError;

/// Longest commander name the API knows ("Asmoranomardicadaistinaculdacar").
pub const MAX_COMMANDER_NAME_LEN: usize = 31;

/// Upper bound on suggestions/reductions returned per call.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A validated, normalized API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Index,
    DbInfo,
    RandomCommander,
    Card { name: String },
    CommanderInfo { commander: String },
    Suggestions { commander: String, count: i64 },
    SuggestionsRange { commander: String, start: i64, end: i64 },
    Reductions { commander: String, count: i64 },
    Analyze { commander: String },
}

impl Endpoint {
    /// Match `path` and enforce the API's argument rules.
    ///
    /// Argument errors are reported in the same order the API checks them:
    /// integer parsing before name length on range and reduction calls.
    /// A shape only claims the path when the method fits, so
    /// `GET /analyze/info` is the info call for a commander named "analyze".
    pub fn parse(method: &Method, path: &str) -> Result<Self, ApiError> {
        let trimmed = path.trim_start_matches('/');
        let raw: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };
        let segments = raw
            .iter()
            .map(|s| urlencoding::decode(s).map_err(|_| ApiError::BadEncoding))
            .collect::<Result<Vec<Cow<'_, str>>, _>>()?;
        let segments: Vec<&str> = segments.iter().map(|s| s.as_ref()).collect();

        let endpoint = match segments.as_slice() {
            [] => Endpoint::Index,
            ["dbinfo"] => Endpoint::DbInfo,
            ["random-commander"] => Endpoint::RandomCommander,
            ["cards", name] => Endpoint::Card {
                name: name.to_lowercase(),
            },
            ["analyze", commander] if *method == Method::POST => Endpoint::Analyze {
                commander: commander.to_string(),
            },
            [commander, "info"] => Endpoint::CommanderInfo {
                commander: checked_name(commander)?,
            },
            [commander, "suggestions", "range", start, end] => {
                let (start, end) = match (start.parse::<i64>(), end.parse::<i64>()) {
                    (Ok(start), Ok(end)) => (start, end),
                    _ => return Err(ApiError::RangeNotInteger),
                };
                let commander = checked_name(commander)?;
                let start = start.max(0);
                let end = end.min(start.saturating_add(MAX_PAGE_SIZE));
                Endpoint::SuggestionsRange {
                    commander,
                    start,
                    end,
                }
            }
            [commander, "suggestions", count] => {
                let count = count
                    .parse::<i64>()
                    .map_err(|_| ApiError::UnknownEndpoint)?;
                Endpoint::Suggestions {
                    commander: checked_name(commander)?,
                    count: clamp_count(count),
                }
            }
            [commander, "reductions", count] => {
                let count = count
                    .parse::<i64>()
                    .map_err(|_| ApiError::CountNotInteger)?;
                Endpoint::Reductions {
                    commander: checked_name(commander)?,
                    count: clamp_count(count),
                }
            }
            ["analyze", _] => return Err(ApiError::MethodNotAllowed),
            _ => return Err(ApiError::UnknownEndpoint),
        };

        if *method != endpoint.method() {
            return Err(ApiError::MethodNotAllowed);
        }
        Ok(endpoint)
    }

    /// The only method the endpoint accepts.
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Analyze { .. } => Method::POST,
            _ => Method::GET,
        }
    }

    /// Label for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Index => "index",
            Endpoint::DbInfo => "dbinfo",
            Endpoint::RandomCommander => "random_commander",
            Endpoint::Card { .. } => "card",
            Endpoint::CommanderInfo { .. } => "commander_info",
            Endpoint::Suggestions { .. } => "suggestions",
            Endpoint::SuggestionsRange { .. } => "suggestions_range",
            Endpoint::Reductions { .. } => "reductions",
            Endpoint::Analyze { .. } => "analyze",
        }
    }

    /// Path on the upstream API, with clamped arguments.
    pub fn upstream_path(&self) -> String {
        use urlencoding::encode;

        match self {
            Endpoint::Index => "/".to_string(),
            Endpoint::DbInfo => "/dbinfo".to_string(),
            Endpoint::RandomCommander => "/random-commander".to_string(),
            Endpoint::Card { name } => format!("/cards/{}", encode(name)),
            Endpoint::CommanderInfo { commander } => format!("/{}/info", encode(commander)),
            Endpoint::Suggestions { commander, count } => {
                format!("/{}/suggestions/{count}", encode(commander))
            }
            Endpoint::SuggestionsRange {
                commander,
                start,
                end,
            } => format!("/{}/suggestions/range/{start}/{end}", encode(commander)),
            Endpoint::Reductions { commander, count } => {
                format!("/{}/reductions/{count}", encode(commander))
            }
            Endpoint::Analyze { commander } => format!("/analyze/{}", encode(commander)),
        }
    }
}

fn checked_name(name: &str) -> Result<String, ApiError> {
    if name.chars().count() > MAX_COMMANDER_NAME_LEN {
        return Err(ApiError::NameTooLong);
    }
    Ok(name.to_string())
}

fn clamp_count(count: i64) -> i64 {
    count.clamp(0, MAX_PAGE_SIZE)
}

/// `true` when the media type (parameters ignored) is JSON.
pub fn is_json_content_type(value: Option<&str>) -> bool {
    value
        .and_then(|v| v.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}
