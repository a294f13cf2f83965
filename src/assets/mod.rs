//! Client asset subsystem.
//!
//! # Data Flow
//! ```text
//! Matched chain
//!     → cache.rs (chain key = normalized patterns; hit returns stored value)
//!     → on miss: resolver.rs (AssetResolver; BuildManifest in manifest.rs)
//!     → CachedRouteMetadata { import URLs, export keys, deps }
//! ```
//!
//! # Design Decisions
//! - The cache is a constructed dependency of `River`, not a global
//! - Per-key locking (DashMap shards) so writers never block other keys
//! - Dev mode resolves source paths, production resolves hashed outputs

pub mod cache;
pub mod manifest;
pub mod resolver;

pub use cache::{chain_key, CachedRouteMetadata, RouteMetadataCache};
pub use manifest::{BuildManifest, ManifestError, PathAsset, DEV_BUILD_ID};
pub use resolver::{AssetPath, AssetResolver};
