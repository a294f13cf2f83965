//! Build manifest produced by the client bundler.
//!
//! ```json
//! {
//!   "buildId": "a1b2c3",
//!   "clientEntrySrc": "frontend/entry.tsx",
//!   "clientEntryOut": "assets/entry-3f9a.js",
//!   "paths": {
//!     "/users/:id": {
//!       "srcPath": "frontend/routes/user.tsx",
//!       "outPath": "assets/user-77c1.js",
//!       "exportKey": "User",
//!       "deps": ["assets/shared-19ab.js"]
//!     }
//!   },
//!   "cssBundles": { "assets/user-77c1.js": "assets/user-0d2e.css" },
//!   "criticalCss": "body{margin:0}",
//!   "stylesheetUrl": "assets/main-4b1c.css"
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::resolver::{AssetPath, AssetResolver};
use crate::routing::Match;

/// Build id used when no manifest has been produced.
pub const DEV_BUILD_ID: &str = "dev";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One route module as emitted by the bundler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathAsset {
    pub src_path: String,
    pub out_path: String,
    pub export_key: String,
    pub deps: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildManifest {
    pub build_id: String,
    pub client_entry_src: String,
    pub client_entry_out: String,
    /// Keyed by original route pattern.
    pub paths: HashMap<String, PathAsset>,
    /// Dependency → stylesheet bundle.
    pub css_bundles: HashMap<String, String>,
    pub critical_css: String,
    pub stylesheet_url: String,
}

impl BuildManifest {
    /// Empty manifest for running without a client build.
    pub fn empty() -> Self {
        Self {
            build_id: DEV_BUILD_ID.to_string(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let mut manifest: Self = serde_json::from_str(json)?;
        if manifest.build_id.is_empty() {
            manifest.build_id = DEV_BUILD_ID.to_string();
        }
        Ok(manifest)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load the manifest, or fall back to [`BuildManifest::empty`] when the file is missing.
    pub fn load_or_empty(path: Option<&Path>) -> Result<Self, ManifestError> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            Some(path) => {
                tracing::warn!(path = %path.display(), "Build manifest not found, serving without client assets");
                Ok(Self::empty())
            }
            None => Ok(Self::empty()),
        }
    }
}

impl AssetResolver for BuildManifest {
    fn asset_path_for(&self, original_pattern: &str, is_dev: bool) -> Option<AssetPath> {
        let asset = self.paths.get(original_pattern)?;
        let import_path = if is_dev { &asset.src_path } else { &asset.out_path };
        Some(AssetPath {
            import_path: import_path.clone(),
            export_key: asset.export_key.clone(),
        })
    }

    fn deps_for(&self, matches: &[Match]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut deps = Vec::new();
        for m in matches {
            let Some(asset) = self.paths.get(m.original_pattern()) else {
                continue;
            };
            for dep in std::iter::once(&asset.out_path).chain(&asset.deps) {
                if !dep.is_empty() && seen.insert(dep.as_str()) {
                    deps.push(dep.clone());
                }
            }
        }
        deps
    }

    fn css_bundles_for(&self, deps: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        deps.iter()
            .filter_map(|dep| self.css_bundles.get(dep))
            .filter(|bundle| seen.insert(bundle.as_str()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{Matcher, NestedRouter};

    const MANIFEST: &str = r#"{
        "buildId": "b42",
        "clientEntryOut": "assets/entry.js",
        "paths": {
            "": { "srcPath": "src/root.tsx", "outPath": "assets/root.js", "exportKey": "Root", "deps": ["assets/shared.js"] },
            "/users/:id": { "srcPath": "src/user.tsx", "outPath": "assets/user.js", "exportKey": "User", "deps": ["assets/shared.js", "assets/avatar.js"] }
        },
        "cssBundles": { "assets/user.js": "assets/user.css", "assets/avatar.js": "assets/user.css" }
    }"#;

    #[test]
    fn test_parse_and_lookup() {
        let manifest = BuildManifest::from_json(MANIFEST).unwrap();
        assert_eq!(manifest.build_id, "b42");

        let dev = manifest.asset_path_for("/users/:id", true).unwrap();
        assert_eq!(dev.import_path, "src/user.tsx");
        let prod = manifest.asset_path_for("/users/:id", false).unwrap();
        assert_eq!(prod.import_path, "assets/user.js");
        assert_eq!(prod.export_key, "User");
        assert!(manifest.asset_path_for("/users", false).is_none());
    }

    #[test]
    fn test_deps_are_ordered_and_deduped() {
        let manifest = BuildManifest::from_json(MANIFEST).unwrap();
        let mut router = NestedRouter::new();
        router.register("").unwrap();
        router.register("/users").unwrap();
        router.register("/users/:id").unwrap();
        let result = router.find_nested_matches("/users/7").unwrap();

        let deps = manifest.deps_for(&result.matches);
        assert_eq!(
            deps,
            vec!["assets/root.js", "assets/shared.js", "assets/user.js", "assets/avatar.js"]
        );
        assert_eq!(manifest.css_bundles_for(&deps), vec!["assets/user.css"]);
    }

    #[test]
    fn test_missing_build_id_defaults_to_dev() {
        let manifest = BuildManifest::from_json("{}").unwrap();
        assert_eq!(manifest.build_id, DEV_BUILD_ID);
        assert_eq!(BuildManifest::empty().build_id, DEV_BUILD_ID);
    }

    #[test]
    fn test_malformed_manifest() {
        assert!(matches!(
            BuildManifest::from_json("{ not json"),
            Err(ManifestError::Parse(_))
        ));
    }
}
