//! Route-chain metadata cache.
//!
//! Process-scoped, populated lazily, never evicted. Keys are bounded by the
//! number of distinct route chains, so retention is bounded too. Misses are
//! computed outside any map lock; racing writers for one key store
//! value-equal entries and the first insert wins.

use std::sync::Arc;

use dashmap::DashMap;

use crate::assets::resolver::AssetResolver;
use crate::observability::metrics;
use crate::routing::Match;

/// Per-chain module data derived from the asset resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CachedRouteMetadata {
    /// `/`-prefixed import URL per segment that has a client module.
    pub import_urls: Vec<String>,
    pub export_keys: Vec<String>,
    pub deps: Vec<String>,
}

/// Cache key of a matched chain: its normalized patterns concatenated in order.
pub fn chain_key(matches: &[Match]) -> String {
    matches.iter().map(Match::normalized_pattern).collect()
}

#[derive(Debug, Clone, Default)]
pub struct RouteMetadataCache {
    inner: Arc<DashMap<String, Arc<CachedRouteMetadata>>>,
}

impl RouteMetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the chain's metadata, computing and storing it on a miss.
    pub fn resolve(&self, matches: &[Match], resolver: &dyn AssetResolver, is_dev: bool) -> Arc<CachedRouteMetadata> {
        let key = chain_key(matches);
        if let Some(hit) = self.inner.get(&key) {
            return Arc::clone(hit.value());
        }

        let computed = Arc::new(compute(matches, resolver, is_dev));
        metrics::record_route_cache_miss();

        let stored = Arc::clone(self.inner.entry(key).or_insert(computed).value());
        metrics::record_route_cache_size(self.inner.len());
        stored
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

fn compute(matches: &[Match], resolver: &dyn AssetResolver, is_dev: bool) -> CachedRouteMetadata {
    let mut metadata = CachedRouteMetadata::default();
    for m in matches {
        // Segments without a client module are skipped.
        if let Some(asset) = resolver.asset_path_for(m.original_pattern(), is_dev) {
            metadata.import_urls.push(format!("/{}", asset.import_path.trim_start_matches('/')));
            metadata.export_keys.push(asset.export_key);
        }
    }
    metadata.deps = resolver.deps_for(matches);
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::BuildManifest;
    use crate::routing::{Matcher, NestedRouter};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Counting {
        inner: BuildManifest,
        calls: AtomicUsize,
    }

    impl AssetResolver for Counting {
        fn asset_path_for(&self, original_pattern: &str, is_dev: bool) -> Option<crate::assets::AssetPath> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.asset_path_for(original_pattern, is_dev)
        }

        fn deps_for(&self, matches: &[Match]) -> Vec<String> {
            self.inner.deps_for(matches)
        }
    }

    fn manifest() -> BuildManifest {
        BuildManifest::from_json(
            r#"{
                "paths": {
                    "": { "srcPath": "src/root.tsx", "outPath": "assets/root.js", "exportKey": "Root" },
                    "/posts/:slug": { "srcPath": "src/post.tsx", "outPath": "assets/post.js", "exportKey": "Post", "deps": ["assets/md.js"] }
                }
            }"#,
        )
        .unwrap()
    }

    fn matches(path: &str) -> Vec<Match> {
        let mut router = NestedRouter::new();
        router.register("").unwrap();
        router.register("/posts").unwrap();
        router.register("/posts/:slug").unwrap();
        router.find_nested_matches(path).unwrap().matches
    }

    #[test]
    fn test_dev_and_prod_urls() {
        let chain = matches("/posts/hello");
        let prod = RouteMetadataCache::new().resolve(&chain, &manifest(), false);
        assert_eq!(prod.import_urls, vec!["/assets/root.js", "/assets/post.js"]);
        assert_eq!(prod.export_keys, vec!["Root", "Post"]);
        assert_eq!(prod.deps, vec!["assets/root.js", "assets/post.js", "assets/md.js"]);

        let dev = RouteMetadataCache::new().resolve(&chain, &manifest(), true);
        assert_eq!(dev.import_urls, vec!["/src/root.tsx", "/src/post.tsx"]);
    }

    #[test]
    fn test_hit_skips_recomputation() {
        let resolver = Counting {
            inner: manifest(),
            calls: AtomicUsize::new(0),
        };
        let cache = RouteMetadataCache::new();
        let first = cache.resolve(&matches("/posts/a"), &resolver, false);
        let calls = resolver.calls.load(Ordering::SeqCst);
        let second = cache.resolve(&matches("/posts/b"), &resolver, false);

        assert_eq!(resolver.calls.load(Ordering::SeqCst), calls);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_chain_key_uses_normalized_patterns() {
        assert_eq!(chain_key(&matches("/posts/x")), "/posts/posts/:");
    }

    #[tokio::test]
    async fn test_concurrent_resolution_is_consistent() {
        let cache = RouteMetadataCache::new();
        let resolver = Arc::new(manifest());
        let sequential = compute(&matches("/posts/z"), resolver.as_ref(), false);

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let cache = cache.clone();
                let resolver = Arc::clone(&resolver);
                tokio::spawn(async move {
                    let chain = matches(&format!("/posts/{i}"));
                    cache.resolve(&chain, resolver.as_ref(), false)
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(*handle.await.unwrap(), sequential);
        }
        assert_eq!(cache.len(), 1);
    }
}
