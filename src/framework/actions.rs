//! Action (query/mutation) routes served under a mount path.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::http::Method;
use futures_util::FutureExt;
use serde_json::Value;

use crate::response::{merge_mutations, MergedResponse};
use crate::routing::matcher::path_segments;
use crate::routing::{PatternError, RoutePattern};
use crate::tasks::{RequestCtx, Task, TaskCtx, TaskError};

struct ActionRoute {
    method: Method,
    pattern: Arc<RoutePattern>,
    task: Arc<dyn Task>,
}

/// Method + pattern table for action tasks.
#[derive(Default)]
pub struct ActionRouter {
    mount: String,
    routes: Vec<ActionRoute>,
}

/// Result of dispatching one action request.
#[derive(Debug)]
pub enum ActionOutcome {
    NotFound,
    /// Request path does not decode to UTF-8.
    InvalidPath,
    Completed {
        result: Result<Value, TaskError>,
        merged: MergedResponse,
    },
}

impl ActionRouter {
    pub fn new(mount: impl Into<String>) -> Self {
        let mount = mount.into();
        Self {
            mount: mount.trim_end_matches('/').to_string(),
            routes: Vec::new(),
        }
    }

    pub fn mount(&self) -> &str {
        &self.mount
    }

    /// Register a task; `pattern` is relative to the mount.
    pub fn register(&mut self, method: Method, pattern: &str, task: Arc<dyn Task>) -> Result<(), PatternError> {
        let pattern = Arc::new(RoutePattern::parse(pattern)?);
        self.routes.push(ActionRoute { method, pattern, task });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn strip_mount<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(&self.mount)?;
        (rest.is_empty() || rest.starts_with('/')).then_some(rest)
    }

    /// Match and run the action for a request.
    pub async fn dispatch(&self, request: &RequestCtx, input: Value) -> ActionOutcome {
        let Ok(path) = request.decoded_path() else {
            return ActionOutcome::InvalidPath;
        };
        let Some(rest) = self.strip_mount(&path) else {
            return ActionOutcome::NotFound;
        };
        let segments = path_segments(rest);

        let best = self
            .routes
            .iter()
            .filter(|r| r.method == *request.method())
            .filter_map(|r| r.pattern.match_full(&segments).map(|m| (r, m)))
            .max_by(|(a, _), (b, _)| a.pattern.rank().cmp(&b.pattern.rank()));
        let Some((route, matched)) = best else {
            return ActionOutcome::NotFound;
        };

        tracing::debug!(path = %request.path(), pattern = %route.pattern.original(), "Dispatching action");

        let mut ctx = TaskCtx::new(request.clone(), matched.params, matched.splat_values, input);
        let result = tokio::select! {
            biased;
            _ = request.cancellation().cancelled() => Err(TaskError::cancelled()),
            outcome = AssertUnwindSafe(route.task.run(&mut ctx)).catch_unwind() => {
                outcome.unwrap_or_else(|_| Err(TaskError::panicked()))
            }
        };

        let (_, mutation) = ctx.into_proxy().into_parts();
        ActionOutcome::Completed {
            result,
            merged: merge_mutations(std::iter::once(mutation.as_ref())),
        }
    }
}

impl fmt::Debug for ActionRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRouter")
            .field("mount", &self.mount)
            .field(
                "routes",
                &self
                    .routes
                    .iter()
                    .map(|r| format!("{} {}", r.method, r.pattern.original()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
