//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → River options + declarative routes, HttpServer settings
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, parse_config, ConfigError};
pub use schema::{
    FrameworkConfig, ListenerConfig, LogFormat, ObservabilityConfig, RouteConfig, SecurityConfig, ServerConfig,
    TimeoutConfig,
};
pub use validation::{is_valid_symbol, validate_config, ValidationError};
