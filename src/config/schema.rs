//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the River server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    pub security: SecurityConfig,

    /// Framework behavior (dev mode, ETags, asset paths).
    pub river: FrameworkConfig,

    /// Declarative routes served by static tasks.
    pub routes: Vec<RouteConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request deadline in seconds; expiry cancels in-flight segment tasks.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
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

/// Security configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Emit nosniff and (HTML mode) Content-Security-Policy headers.
    pub enable_headers: bool,
    /// Maximum action request body size in bytes.
    pub max_body_size: usize,
    /// Cookie header bytes allowed into an ETag digest.
    pub max_etag_cookie_bytes: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 2 * 1024 * 1024, // 2MB
            max_etag_cookie_bytes: 4096,
        }
    }
}

/// `[river]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FrameworkConfig {
    /// Serve source modules through the Vite dev server.
    pub is_dev: bool,

    /// Compute ETags for JSON responses and honor If-None-Match.
    pub auto_etags: bool,

    /// Prefix prepended to client asset URLs (e.g. "/public/").
    pub public_path_prefix: String,

    pub vite_dev_url: Option<String>,

    /// Mount path for action routes.
    pub actions_mount: String,

    /// Id of the element the client app mounts into.
    pub root_id: String,

    /// Namespace for head markers and the global bootstrap symbol.
    pub symbol: String,

    /// Path to the bundler's build manifest (JSON).
    pub manifest_path: Option<String>,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            is_dev: false,
            auto_etags: true,
            public_path_prefix: "/".to_string(),
            vite_dev_url: None,
            actions_mount: "/api".to_string(),
            root_id: "river-root".to_string(),
            symbol: "river".to_string(),
            manifest_path: None,
        }
    }
}

/// Declarative route.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RouteConfig {
    /// Route pattern (e.g. "", "/_index", "/users/:id", "/files/*").
    pub pattern: String,

    /// Static loader data.
    #[serde(default)]
    pub data: Option<serde_json::Value>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Redirect target signalled by the route's task.
    #[serde(default)]
    pub redirect: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.timeouts.request_secs, 30);
        assert_eq!(config.security.max_etag_cookie_bytes, 4096);
        assert_eq!(config.river.actions_mount, "/api");
        assert_eq!(config.river.root_id, "river-root");
        assert!(config.river.auto_etags);
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config: ServerConfig = toml::from_str(
            r#"
            [observability]
            log_format = "json"

            [river]
            is_dev = true
            vite_dev_url = "http://localhost:5173"

            [[routes]]
            pattern = ""
            title = "Home"

            [[routes]]
            pattern = "/users/:id"
            data = { name = "Ada" }
            "#,
        )
        .unwrap();

        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert!(config.river.is_dev);
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[1].data.as_ref().unwrap()["name"], "Ada");
    }
}
