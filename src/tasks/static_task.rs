//! Task serving data declared in configuration.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::RouteConfig;
use crate::head::HeadElement;
use crate::tasks::{Task, TaskCtx, TaskError};

/// Returns fixed data and head elements; optionally redirects.
#[derive(Debug, Clone, Default)]
pub struct StaticTask {
    data: Value,
    head: Vec<HeadElement>,
    redirect: Option<String>,
}

impl StaticTask {
    pub fn new(data: Value) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    pub fn with_head(mut self, element: HeadElement) -> Self {
        self.head.push(element);
        self
    }

    pub fn with_redirect(mut self, target: impl Into<String>) -> Self {
        self.redirect = Some(target.into());
        self
    }

    /// Build from a config route; `None` when the route declares nothing to serve.
    pub fn from_route(route: &RouteConfig) -> Option<Self> {
        if route.data.is_none() && route.title.is_none() && route.description.is_none() && route.redirect.is_none() {
            return None;
        }

        let mut task = Self::new(route.data.clone().unwrap_or(Value::Null));
        if let Some(title) = &route.title {
            task = task.with_head(HeadElement::title(title.clone()));
        }
        if let Some(description) = &route.description {
            task = task.with_head(HeadElement::description(description.clone()));
        }
        if let Some(target) = &route.redirect {
            task = task.with_redirect(target.clone());
        }
        Some(task)
    }
}

#[async_trait]
impl Task for StaticTask {
    async fn run(&self, ctx: &mut TaskCtx) -> Result<Value, TaskError> {
        if let Some(target) = &self.redirect {
            ctx.proxy().redirect(target.clone());
        }
        ctx.proxy().add_head_elements(self.head.iter().cloned());
        Ok(self.data.clone())
    }
}
