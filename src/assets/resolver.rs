//! Asset lookup seam between route patterns and built client modules.

use std::fmt;

use crate::routing::Match;

/// Client module serving one route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPath {
    /// Source path in dev, compiled output path in production (no leading `/`).
    pub import_path: String,
    /// Export name of the route component inside the module.
    pub export_key: String,
}

/// Maps route patterns to client modules and bundle dependencies.
pub trait AssetResolver: Send + Sync + fmt::Debug {
    /// `None` when no client module is registered for the pattern.
    fn asset_path_for(&self, original_pattern: &str, is_dev: bool) -> Option<AssetPath>;

    /// Ordered, deduplicated bundle dependencies of a matched chain.
    fn deps_for(&self, matches: &[Match]) -> Vec<String>;

    /// Stylesheet bundles required by the given dependencies.
    fn css_bundles_for(&self, _deps: &[String]) -> Vec<String> {
        Vec::new()
    }
}
