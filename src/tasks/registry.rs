//! Pattern-keyed task registry and concurrent runner.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;
use serde_json::Value;
use tokio::task::JoinSet;

use crate::loaders::SegmentResult;
use crate::routing::MatchResult;
use crate::tasks::{RequestCtx, Task, TaskCtx, TaskError, TaskRunner};

/// Tasks keyed by the original route pattern they are bound to.
#[derive(Clone, Default)]
pub struct TaskRegistry {
    tasks: HashMap<String, Arc<dyn Task>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, pattern: impl Into<String>, task: Arc<dyn Task>) {
        self.tasks.insert(pattern.into(), task);
    }

    pub fn get(&self, pattern: &str) -> Option<Arc<dyn Task>> {
        self.tasks.get(pattern).cloned()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl std::fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRegistry")
            .field("patterns", &self.tasks.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[async_trait]
impl TaskRunner for TaskRegistry {
    async fn run(&self, matches: &MatchResult, request: &RequestCtx) -> Vec<SegmentResult> {
        let mut results: Vec<SegmentResult> = matches.matches.iter().map(|_| SegmentResult::absent()).collect();
        let mut pending = vec![false; results.len()];
        let mut set = JoinSet::new();

        for (index, m) in matches.matches.iter().enumerate() {
            let Some(task) = self.get(m.original_pattern()) else {
                continue;
            };
            pending[index] = true;

            let mut ctx = TaskCtx::new(
                request.clone(),
                matches.params.clone(),
                matches.splat_values.clone(),
                Value::Null,
            );
            set.spawn(async move {
                let result = AssertUnwindSafe(task.run(&mut ctx))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| Err(TaskError::panicked()));
                (index, SegmentResult::completed(result, ctx.into_proxy()))
            });
        }

        let cancel = request.cancellation();
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    set.abort_all();
                    tracing::warn!(path = %request.path(), "Request cancelled while segment tasks were running");
                    break;
                }
                joined = set.join_next() => match joined {
                    Some(Ok((index, result))) => {
                        pending[index] = false;
                        results[index] = result;
                    }
                    Some(Err(e)) => {
                        tracing::error!(path = %request.path(), error = %e, "Segment task aborted");
                    }
                    None => break,
                },
            }
        }

        // Cancelled or aborted before reporting back.
        for (index, still_pending) in pending.iter().enumerate() {
            if *still_pending {
                results[index] = SegmentResult::failed(TaskError::cancelled());
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{Matcher, NestedRouter};
    use axum::http::{HeaderMap, Method, Uri};
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    struct Echo(&'static str);

    #[async_trait]
    impl Task for Echo {
        async fn run(&self, ctx: &mut TaskCtx) -> Result<Value, TaskError> {
            Ok(serde_json::json!({ "segment": self.0, "id": ctx.param("id") }))
        }
    }

    struct Sleepy;

    #[async_trait]
    impl Task for Sleepy {
        async fn run(&self, _ctx: &mut TaskCtx) -> Result<Value, TaskError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Value::Null)
        }
    }

    struct Panics;

    #[async_trait]
    impl Task for Panics {
        async fn run(&self, _ctx: &mut TaskCtx) -> Result<Value, TaskError> {
            panic!("boom");
        }
    }

    fn request(cancel: CancellationToken) -> RequestCtx {
        RequestCtx::new(Method::GET, Uri::from_static("/users/1"), HeaderMap::new(), cancel)
    }

    fn matches(path: &str) -> MatchResult {
        let mut router = NestedRouter::new();
        router.register("").unwrap();
        router.register("/users").unwrap();
        router.register("/users/:id").unwrap();
        router.find_nested_matches(path).unwrap()
    }

    #[tokio::test]
    async fn test_results_are_index_aligned() {
        let mut registry = TaskRegistry::new();
        registry.register("", Arc::new(Echo("root")));
        registry.register("/users/:id", Arc::new(Echo("user")));

        let results = registry.run(&matches("/users/1"), &request(CancellationToken::new())).await;
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].outcome.data().unwrap()["segment"], "root");
        assert!(!results[1].has_task);
        assert_eq!(results[1].outcome, crate::loaders::SegmentOutcome::Absent);
        assert_eq!(results[2].outcome.data().unwrap()["id"], "1");
    }

    #[tokio::test]
    async fn test_cancellation_fails_pending_slots() {
        let mut registry = TaskRegistry::new();
        registry.register("", Arc::new(Echo("root")));
        registry.register("/users/:id", Arc::new(Sleepy));

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let results = tokio::time::timeout(
            Duration::from_secs(5),
            registry.run(&matches("/users/1"), &request(cancel)),
        )
        .await
        .expect("runner should stop waiting once cancelled");

        assert!(results[0].outcome.data().is_some());
        assert_eq!(results[2].outcome.error(), Some(&TaskError::cancelled()));
    }

    #[tokio::test]
    async fn test_panic_becomes_segment_error() {
        let mut registry = TaskRegistry::new();
        registry.register("/users", Arc::new(Panics));

        let results = registry.run(&matches("/users/1"), &request(CancellationToken::new())).await;
        assert_eq!(results[1].outcome.error(), Some(&TaskError::panicked()));
    }
}
