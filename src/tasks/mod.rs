//! Task execution subsystem.
//!
//! # Data Flow
//! ```text
//! MatchResult + RequestCtx
//!     → TaskRunner::run (one Task per matched segment, all concurrent)
//!     → each Task gets its own TaskCtx + ResponseProxy
//!     → Vec<SegmentResult>, index-aligned with the match chain
//! ```
//!
//! # Design Decisions
//! - Tasks are trait objects looked up by original route pattern
//! - No shared mutable state between concurrently running tasks
//! - Request cancellation stops awaiting tasks; unfinished slots fail

pub mod context;
pub mod error;
pub mod registry;
pub mod static_task;

use async_trait::async_trait;
use serde_json::Value;

use crate::loaders::SegmentResult;
use crate::routing::MatchResult;

pub use context::{is_json_request, RequestCtx, TaskCtx, JSON_QUERY_PARAM};
pub use error::TaskError;
pub use registry::TaskRegistry;
pub use static_task::StaticTask;

/// A unit of data-loading (or action) work bound to a route pattern.
#[async_trait]
pub trait Task: Send + Sync {
    async fn run(&self, ctx: &mut TaskCtx) -> Result<Value, TaskError>;
}

/// Runs the tasks bound to a matched chain.
#[async_trait]
pub trait TaskRunner: Send + Sync {
    /// Returns one result per matched segment, in match order.
    async fn run(&self, matches: &MatchResult, request: &RequestCtx) -> Vec<SegmentResult>;
}
