//! Loader orchestration and partial-failure truncation.
//!
//! # Responsibilities
//! - Run the matched chain's tasks through a [`TaskRunner`]
//! - Guarantee one result per matched segment, in match order
//! - Find the outermost failing segment and truncate the reported tree there
//!
//! # Design Decisions
//! - Sibling/descendant tasks run to completion even after a failure; their
//!   results are dropped from the report rather than proactively cancelled
//! - Truncation is a pure reducer over the result slice

use std::sync::Arc;

use serde_json::Value;

use crate::head::HeadElement;
use crate::loaders::segment::SegmentResult;
use crate::observability::metrics;
use crate::routing::MatchResult;
use crate::tasks::{RequestCtx, TaskRunner};

/// Runs loaders for a matched chain.
#[derive(Clone)]
pub struct LoaderOrchestrator {
    runner: Arc<dyn TaskRunner>,
}

impl LoaderOrchestrator {
    pub fn new(runner: Arc<dyn TaskRunner>) -> Self {
        Self { runner }
    }

    /// Run every segment's task; result `i` belongs to `matches.matches[i]`.
    pub async fn run(&self, matches: &MatchResult, request: &RequestCtx) -> Vec<SegmentResult> {
        let expected = matches.matches.len();
        let mut results = self.runner.run(matches, request).await;

        if results.len() != expected {
            tracing::warn!(
                path = %request.path(),
                expected,
                got = results.len(),
                "Task runner returned misaligned results"
            );
            results.resize_with(expected, SegmentResult::absent);
        }

        for (m, result) in matches.matches.iter().zip(&results) {
            if let Some(err) = result.outcome.error() {
                tracing::error!(
                    path = %request.path(),
                    segment = %m.original_pattern(),
                    error = %err,
                    "Loader failed"
                );
                metrics::record_loader_error(m.original_pattern());
            }
        }

        results
    }
}

/// Index of the first (outermost) segment whose task failed.
pub fn outermost_error_index(results: &[SegmentResult]) -> Option<usize> {
    results.iter().position(|r| r.outcome.error().is_some())
}

/// Reported view of a chain after truncation at the outermost failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TruncatedChain {
    /// Data for segments strictly before the failing one (`Null` when absent).
    pub loaders_data: Vec<Value>,
    /// Error messages through the failing segment, inclusive.
    pub loaders_errs: Vec<Option<String>>,
    /// Head elements from segments strictly before the failing one.
    pub head_elements: Vec<HeadElement>,
    pub outermost_error_index: Option<usize>,
}

impl TruncatedChain {
    /// How many per-segment module entries (import URLs, export keys) to keep.
    pub fn module_limit(&self) -> usize {
        self.outermost_error_index.map_or(usize::MAX, |i| i + 1)
    }
}

/// Truncate results at the outermost failing segment.
pub fn truncate(results: &[SegmentResult]) -> TruncatedChain {
    let outermost_error_index = outermost_error_index(results);
    let data_end = outermost_error_index.unwrap_or(results.len());
    let errs_end = outermost_error_index.map_or(results.len(), |i| i + 1);

    TruncatedChain {
        loaders_data: results[..data_end]
            .iter()
            .map(|r| r.outcome.data().cloned().unwrap_or(Value::Null))
            .collect(),
        loaders_errs: results[..errs_end]
            .iter()
            .map(|r| r.outcome.error().map(|e| e.message().to_string()))
            .collect(),
        head_elements: results[..data_end]
            .iter()
            .flat_map(|r| r.head_elements.iter().cloned())
            .collect(),
        outermost_error_index,
    }
}
