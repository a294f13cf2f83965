//! Route data payload and its pure assembly.
//!
//! The JSON field names are what the client runtime reads; keep them stable.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::assets::CachedRouteMetadata;
use crate::head::{HeadBlocks, HeadElement};
use crate::loaders::{SegmentResult, TruncatedChain};
use crate::routing::{MatchResult, Params};

/// Per-request data for the active (matched, truncated) route chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivePathData {
    #[serde(skip_serializing_if = "is_false")]
    pub has_root_data: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub loaders_data: Vec<Value>,

    /// Error message per segment through the failing one; `null` for none.
    #[serde(skip_serializing_if = "all_none")]
    pub loaders_errs: Vec<Option<String>>,

    #[serde(skip_serializing_if = "Params::is_empty")]
    pub params: Params,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub splat_values: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub outermost_error_index: Option<usize>,

    #[serde(rename = "importURLs", skip_serializing_if = "Vec::is_empty")]
    pub import_urls: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub export_keys: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<String>,
}

/// Everything the client needs to render or hydrate the matched chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UIRouteOutput {
    #[serde(flatten)]
    pub active: ActivePathData,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,

    #[serde(rename = "metaHeadBlocks", skip_serializing_if = "Vec::is_empty")]
    pub meta: Vec<HeadElement>,

    #[serde(rename = "restHeadBlocks", skip_serializing_if = "Vec::is_empty")]
    pub rest: Vec<HeadElement>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub css_bundles: Vec<String>,

    #[serde(rename = "viteDevURL", skip_serializing_if = "String::is_empty")]
    pub vite_dev_url: String,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn all_none(errs: &[Option<String>]) -> bool {
    errs.iter().all(Option::is_none)
}

/// Whether the root layout (`""`) matched and has a bound task.
pub fn has_root_data(matches: &MatchResult, results: &[SegmentResult]) -> bool {
    matches
        .matches
        .first()
        .is_some_and(|m| m.normalized_pattern().is_empty())
        && results.first().is_some_and(|r| r.has_task)
}

/// Inputs to [`assemble`], all already computed.
#[derive(Debug)]
pub struct AssemblyInput<'a> {
    pub matches: &'a MatchResult,
    pub has_root_data: bool,
    pub chain: TruncatedChain,
    pub head: HeadBlocks,
    pub metadata: &'a CachedRouteMetadata,
    pub css_bundles: Vec<String>,
    pub vite_dev_url: Option<&'a str>,
}

/// Compose the route payload. Deterministic, no I/O.
pub fn assemble(input: AssemblyInput<'_>) -> UIRouteOutput {
    let limit = input.chain.module_limit();
    let HeadBlocks { title, meta, rest } = input.head;

    UIRouteOutput {
        active: ActivePathData {
            has_root_data: input.has_root_data,
            loaders_data: input.chain.loaders_data,
            loaders_errs: input.chain.loaders_errs,
            params: input.matches.params.clone(),
            splat_values: input.matches.splat_values.clone(),
            outermost_error_index: input.chain.outermost_error_index,
            import_urls: input.metadata.import_urls.iter().take(limit).cloned().collect(),
            export_keys: input.metadata.export_keys.iter().take(limit).cloned().collect(),
            deps: input.metadata.deps.clone(),
        },
        title,
        meta,
        rest,
        css_bundles: input.css_bundles,
        vite_dev_url: input.vite_dev_url.unwrap_or_default().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::truncate;
    use crate::response::ResponseProxy;
    use crate::routing::{Matcher, NestedRouter};
    use crate::tasks::TaskError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn matches() -> MatchResult {
        let mut router = NestedRouter::new();
        router.register("").unwrap();
        router.register("/a").unwrap();
        router.register("/a/:b").unwrap();
        router.find_nested_matches("/a/x").unwrap()
    }

    fn metadata() -> CachedRouteMetadata {
        CachedRouteMetadata {
            import_urls: vec!["/root.js".into(), "/a.js".into(), "/b.js".into()],
            export_keys: vec!["Root".into(), "A".into(), "B".into()],
            deps: vec!["root.js".into(), "a.js".into(), "b.js".into()],
        }
    }

    #[test]
    fn test_failure_truncates_modules_inclusive() {
        let matches = matches();
        let results = vec![
            SegmentResult::completed(Ok(json!({"user": "ada"})), ResponseProxy::new()),
            SegmentResult::failed(TaskError::new("a failed")),
            SegmentResult::completed(Ok(json!("b")), ResponseProxy::new()),
        ];
        let metadata = metadata();

        let output = assemble(AssemblyInput {
            matches: &matches,
            has_root_data: has_root_data(&matches, &results),
            chain: truncate(&results),
            head: HeadBlocks::default(),
            metadata: &metadata,
            css_bundles: Vec::new(),
            vite_dev_url: None,
        });

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["outermostErrorIndex"], 1);
        assert_eq!(json["loadersData"], json!([{"user": "ada"}]));
        assert_eq!(json["loadersErrs"], json!([null, "a failed"]));
        assert_eq!(json["importURLs"], json!(["/root.js", "/a.js"]));
        assert_eq!(json["exportKeys"], json!(["Root", "A"]));
        assert_eq!(json["hasRootData"], true);
        assert_eq!(json["params"], json!({"b": "x"}));
        assert!(json.get("viteDevURL").is_none());
    }

    #[test]
    fn test_success_omits_error_fields() {
        let matches = matches();
        let results = vec![SegmentResult::absent(), SegmentResult::absent(), SegmentResult::absent()];
        let metadata = metadata();

        let output = assemble(AssemblyInput {
            matches: &matches,
            has_root_data: has_root_data(&matches, &results),
            chain: truncate(&results),
            head: HeadBlocks {
                title: "Hi".into(),
                ..HeadBlocks::default()
            },
            metadata: &metadata,
            css_bundles: vec!["a.css".into()],
            vite_dev_url: Some("http://localhost:5173"),
        });

        let json = serde_json::to_value(&output).unwrap();
        assert!(json.get("outermostErrorIndex").is_none());
        assert!(json.get("loadersErrs").is_none());
        assert!(json.get("hasRootData").is_none());
        assert_eq!(json["loadersData"], json!([null, null, null]));
        assert_eq!(json["importURLs"].as_array().unwrap().len(), 3);
        assert_eq!(json["title"], "Hi");
        assert_eq!(json["cssBundles"], json!(["a.css"]));
        assert_eq!(json["viteDevURL"], "http://localhost:5173");
    }
}
