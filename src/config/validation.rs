//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Route patterns parse and normalize to unique keys
//! - Validate value ranges (timeouts > 0, cookie cap > 0)
//! - Dev mode has a dev server to point at
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::routing::RoutePattern;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("security.max_etag_cookie_bytes must be greater than zero")]
    ZeroCookieCap,

    #[error("river.actions_mount '{0}' must be an absolute, non-root path")]
    ActionsMount(String),

    #[error("river.vite_dev_url is required when river.is_dev is set")]
    MissingViteUrl,

    #[error("river.symbol '{0}' must be non-empty and use only ASCII letters, digits, '_' or '-'")]
    InvalidSymbol(String),

    #[error("route '{pattern}': {reason}")]
    InvalidRoute { pattern: String, reason: String },

    #[error("route '{pattern}' duplicates normalized pattern '{normalized}'")]
    DuplicateRoute { pattern: String, normalized: String },
}

pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.security.max_etag_cookie_bytes == 0 {
        errors.push(ValidationError::ZeroCookieCap);
    }

    let mount = config.river.actions_mount.trim_end_matches('/');
    if !mount.starts_with('/') || mount.is_empty() {
        errors.push(ValidationError::ActionsMount(config.river.actions_mount.clone()));
    }

    if config.river.is_dev && config.river.vite_dev_url.as_deref().unwrap_or_default().is_empty() {
        errors.push(ValidationError::MissingViteUrl);
    }

    if !is_valid_symbol(&config.river.symbol) {
        errors.push(ValidationError::InvalidSymbol(config.river.symbol.clone()));
    }

    let mut seen = HashSet::new();
    for route in &config.routes {
        match RoutePattern::parse(&route.pattern) {
            Ok(pattern) => {
                if !seen.insert(pattern.normalized().to_string()) {
                    errors.push(ValidationError::DuplicateRoute {
                        pattern: route.pattern.clone(),
                        normalized: pattern.normalized().to_string(),
                    });
                }
            }
            Err(e) => errors.push(ValidationError::InvalidRoute {
                pattern: route.pattern.clone(),
                reason: e.to_string(),
            }),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// The symbol lands in a JS string, an HTML comment and a `data-` attribute
/// name, so it is restricted to `[A-Za-z0-9_-]+`.
pub fn is_valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty() && symbol.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}
