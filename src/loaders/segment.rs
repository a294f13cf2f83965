//! Per-segment task results.

use serde_json::Value;

use crate::head::HeadElement;
use crate::response::{ResponseMutation, ResponseProxy};
use crate::tasks::TaskError;

/// What a segment's task produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SegmentOutcome {
    /// No task bound to the segment.
    #[default]
    Absent,
    Data(Value),
    Failed(TaskError),
}

impl SegmentOutcome {
    pub fn data(&self) -> Option<&Value> {
        match self {
            SegmentOutcome::Data(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&TaskError> {
        match self {
            SegmentOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<Result<Value, TaskError>> for SegmentOutcome {
    fn from(result: Result<Value, TaskError>) -> Self {
        match result {
            Ok(value) => SegmentOutcome::Data(value),
            Err(err) => SegmentOutcome::Failed(err),
        }
    }
}

/// Result slot for one matched segment, index-aligned with the match chain.
#[derive(Debug, Clone, Default)]
pub struct SegmentResult {
    /// Whether a task was bound to the segment at all.
    pub has_task: bool,
    pub outcome: SegmentOutcome,
    pub head_elements: Vec<HeadElement>,
    pub mutation: Option<ResponseMutation>,
}

impl SegmentResult {
    pub fn absent() -> Self {
        Self::default()
    }

    /// Result of a task that ran to completion (successfully or not).
    pub fn completed(result: Result<Value, TaskError>, proxy: ResponseProxy) -> Self {
        let (head_elements, mutation) = proxy.into_parts();
        Self {
            has_task: true,
            outcome: result.into(),
            head_elements,
            mutation,
        }
    }

    /// Result of a task that never reported back.
    pub fn failed(err: TaskError) -> Self {
        Self {
            has_task: true,
            outcome: SegmentOutcome::Failed(err),
            ..Self::default()
        }
    }
}
