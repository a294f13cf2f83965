//! River server library: the request-time core of a server-rendered UI
//! framework.
//!
//! A request path is matched to a nested chain of route segments, every
//! segment's loader runs concurrently, the first failing ancestor truncates
//! the reported tree, segment response mutations are merged into one
//! decision, head elements are deduplicated, and the result is served as
//! hydration JSON or as a full HTML document with a CSP-hashed bootstrap
//! script.

pub mod assets;
pub mod config;
pub mod error;
pub mod framework;
pub mod head;
pub mod http;
pub mod lifecycle;
pub mod loaders;
pub mod observability;
pub mod response;
pub mod routing;
pub mod tasks;

pub use config::ServerConfig;
pub use error::RiverError;
pub use framework::{River, RiverBuilder, RiverOptions};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
