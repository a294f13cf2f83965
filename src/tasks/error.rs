//! Task failure type.

use thiserror::Error;

/// Failure reported by a single segment or action task.
///
/// Carried in that segment's result slot; never a transport-level failure
/// on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TaskError {
    message: String,
}

impl TaskError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn cancelled() -> Self {
        Self::new("task cancelled")
    }

    pub fn panicked() -> Self {
        Self::new("task panicked")
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
