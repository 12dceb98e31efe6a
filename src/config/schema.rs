//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the shell
//! server. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the web shell.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ShellConfig {
    /// Listener configuration (bind address, connection cap).
    pub listener: ListenerConfig,

    /// Site-wide page settings.
    pub site: SiteConfig,

    /// Deck-optimizer API gateway.
    pub api: ApiConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Retry configuration for upstream API calls.
    pub retries: RetryConfig,

    /// Cross-origin policy.
    pub cors: CorsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent in-flight requests (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Page settings shared by every route.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Document title.
    pub title: String,

    /// Path the DeckOptimizer mount point sends API calls to.
    pub api_base: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "CardCognition".to_string(),
            api_base: "/api".to_string(),
        }
    }
}

/// Deck-optimizer API gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Forward `/api/*` to the upstream.
    pub enabled: bool,

    /// Base URL of the upstream API (e.g., "http://127.0.0.1:5000").
    pub upstream: String,

    /// Maximum request body accepted for forwarding, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            upstream: "http://127.0.0.1:5000".to_string(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries.
    pub enabled: bool,

    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

/// Origins allowed to call the shell from another site.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        let origins = [
            "https://cardcognition.com",
            "http://cardcognition.com",
            "https://www.cardcognition.com",
            "http://www.cardcognition.com",
            "https://api.cardcognition.com",
            "http://api.cardcognition.com",
            "https://www.api.cardcognition.com",
            "http://www.api.cardcognition.com",
            "http://localhost:3000",
        ];
        Self {
            allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SecurityConfig {
    /// Add security response headers.
    pub enable_headers: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: ShellConfig = toml::from_str("").unwrap();
        assert_eq!(config, ShellConfig::default());
        assert_eq!(config.site.title, "CardCognition");
        assert!(config
            .cors
            .allowed_origins
            .contains(&"http://localhost:3000".to_string()));
    }

    #[test]
    fn test_partial_sections() {
        let config: ShellConfig = toml::from_str(
            r#"
            [api]
            upstream = "http://api.internal:5000"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.upstream, "http://api.internal:5000");
        assert!(config.api.enabled);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.observability.log_level, "info");
    }
}
