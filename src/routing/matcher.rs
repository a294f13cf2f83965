//! Nested route matching.
//!
//! # Responsibilities
//! - Turn a request path into an ordered chain of matched patterns
//!   (outermost → innermost)
//! - Extract path params and splat values
//!
//! # Design Decisions
//! - The innermost (terminal) pattern is picked first by specificity, then
//!   every registered layout that is a prefix of it joins the chain
//! - Deterministic: same path and pattern set always yield the same chain
//! - Trailing slashes are ignored (`/about/` matches like `/about`)

use std::fmt;
use std::sync::Arc;

use crate::routing::pattern::{Params, PatternError, PrefixMatch, RoutePattern};

/// Produces nested matches for a request path.
pub trait Matcher: Send + Sync + fmt::Debug {
    /// Returns `None` when no route chain matches the path.
    fn find_nested_matches(&self, path: &str) -> Option<MatchResult>;
}

/// One matched segment of a route chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pattern: Arc<RoutePattern>,
}

impl Match {
    pub fn new(pattern: Arc<RoutePattern>) -> Self {
        Self { pattern }
    }

    pub fn normalized_pattern(&self) -> &str {
        self.pattern.normalized()
    }

    pub fn original_pattern(&self) -> &str {
        self.pattern.original()
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }
}

/// Outcome of nested matching. Immutable once produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// Matched segments, outermost first.
    pub matches: Vec<Match>,
    pub params: Params,
    pub splat_values: Vec<String>,
}

/// Split a request path into non-empty segments.
pub fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Pick the most specific pattern that matches the whole path.
pub fn best_full_match<'a, I>(patterns: I, segments: &[&str]) -> Option<(&'a Arc<RoutePattern>, PrefixMatch)>
where
    I: IntoIterator<Item = &'a Arc<RoutePattern>>,
{
    patterns
        .into_iter()
        .filter_map(|p| p.match_full(segments).map(|m| (p, m)))
        .max_by(|(a, _), (b, _)| a.rank().cmp(&b.rank()))
}

/// Pattern registry implementing nested matching.
#[derive(Debug, Default, Clone)]
pub struct NestedRouter {
    patterns: Vec<Arc<RoutePattern>>,
}

impl NestedRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pattern. Registering the same pattern twice is a no-op.
    pub fn register(&mut self, pattern: &str) -> Result<Arc<RoutePattern>, PatternError> {
        if let Some(existing) = self.patterns.iter().find(|p| p.original() == pattern) {
            return Ok(existing.clone());
        }
        let parsed = Arc::new(RoutePattern::parse(pattern)?);
        self.patterns.push(parsed.clone());
        Ok(parsed)
    }

    pub fn patterns(&self) -> &[Arc<RoutePattern>] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Matcher for NestedRouter {
    fn find_nested_matches(&self, path: &str) -> Option<MatchResult> {
        let segments = path_segments(path);
        let (terminal, terminal_match) = best_full_match(&self.patterns, &segments)?;

        let mut chain: Vec<&Arc<RoutePattern>> = self
            .patterns
            .iter()
            .filter(|p| p.is_ancestor_of(terminal))
            .collect();
        chain.sort_by_key(|p| p.segments().len());

        let mut params = Params::new();
        for ancestor in &chain {
            if let Some(m) = ancestor.match_prefix(&segments) {
                params.extend(m.params);
            }
        }
        params.extend(terminal_match.params);
        chain.push(terminal);

        tracing::trace!(path, chain_len = chain.len(), "Nested match found");

        Some(MatchResult {
            matches: chain.into_iter().map(|p| Match::new(p.clone())).collect(),
            params,
            splat_values: terminal_match.splat_values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router(patterns: &[&str]) -> NestedRouter {
        let mut router = NestedRouter::new();
        for p in patterns {
            router.register(p).unwrap();
        }
        router
    }

    fn chain(result: &MatchResult) -> Vec<&str> {
        result.matches.iter().map(|m| m.original_pattern()).collect()
    }

    #[test]
    fn test_nested_chain_outermost_first() {
        let router = router(&["/a/b", "", "/a"]);
        let result = router.find_nested_matches("/a/b").unwrap();
        assert_eq!(chain(&result), vec!["", "/a", "/a/b"]);
    }

    #[test]
    fn test_index_preferred_at_root() {
        let router = router(&["", "/_index", "/about"]);
        let result = router.find_nested_matches("/").unwrap();
        assert_eq!(chain(&result), vec!["", "/_index"]);

        let result = router.find_nested_matches("/about/").unwrap();
        assert_eq!(chain(&result), vec!["", "/about"]);
    }

    #[test]
    fn test_params_merged_across_chain() {
        let router = router(&["", "/users/:id", "/users/:id/posts/:post"]);
        let result = router.find_nested_matches("/users/7/posts/42").unwrap();
        assert_eq!(result.params.get("id").map(String::as_str), Some("7"));
        assert_eq!(result.params.get("post").map(String::as_str), Some("42"));
        assert_eq!(result.matches[1].normalized_pattern(), "/users/:");
    }

    #[test]
    fn test_static_beats_dynamic() {
        let router = router(&["/users/:id", "/users/new"]);
        let result = router.find_nested_matches("/users/new").unwrap();
        assert_eq!(chain(&result), vec!["/users/new"]);
    }

    #[test]
    fn test_splat_fallback() {
        let router = router(&["", "/docs", "/docs/*"]);
        let result = router.find_nested_matches("/docs/guide/intro").unwrap();
        assert_eq!(chain(&result), vec!["", "/docs", "/docs/*"]);
        assert_eq!(result.splat_values, vec!["guide", "intro"]);
    }

    #[test]
    fn test_no_match() {
        let router = router(&["/a"]);
        assert!(router.find_nested_matches("/b").is_none());
        assert!(NestedRouter::new().find_nested_matches("/").is_none());
    }
}
