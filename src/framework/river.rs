//! The `River` core object and its builder.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::Method;

use crate::assets::{AssetResolver, BuildManifest, RouteMetadataCache};
use crate::config::ServerConfig;
use crate::framework::actions::ActionRouter;
use crate::framework::document::{DefaultRootTemplate, RootTemplate};
use crate::framework::ssr::SsrContext;
use crate::head::{HeadElement, HeadRenderer};
use crate::loaders::LoaderOrchestrator;
use crate::routing::{Matcher, NestedRouter, PatternError};
use crate::tasks::{RequestCtx, StaticTask, Task, TaskError, TaskRegistry, TaskRunner};

/// Request-time settings, derived from [`ServerConfig`].
#[derive(Debug, Clone)]
pub struct RiverOptions {
    pub is_dev: bool,
    pub auto_etags: bool,
    pub public_path_prefix: String,
    pub vite_dev_url: Option<String>,
    pub root_id: String,
    pub symbol: String,
    pub enable_headers: bool,
    pub max_etag_cookie_bytes: usize,
    pub max_body_size: usize,
    pub actions_mount: String,
}

impl RiverOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        let river = &config.river;
        Self {
            is_dev: river.is_dev,
            auto_etags: river.auto_etags,
            public_path_prefix: river.public_path_prefix.clone(),
            vite_dev_url: river.vite_dev_url.clone(),
            root_id: river.root_id.clone(),
            symbol: river.symbol.clone(),
            enable_headers: config.security.enable_headers,
            max_etag_cookie_bytes: config.security.max_etag_cookie_bytes,
            max_body_size: config.security.max_body_size,
            actions_mount: river.actions_mount.clone(),
        }
    }

    /// Dev server URL, only when running in dev mode.
    pub fn active_vite_dev_url(&self) -> Option<&str> {
        self.vite_dev_url.as_deref().filter(|_| self.is_dev)
    }
}

impl Default for RiverOptions {
    fn default() -> Self {
        Self::from_config(&ServerConfig::default())
    }
}

/// Source of the head elements every page starts from.
#[async_trait]
pub trait DefaultHeadProvider: Send + Sync {
    async fn default_head_elements(&self, request: &RequestCtx) -> Result<Vec<HeadElement>, TaskError>;
}

#[async_trait]
impl DefaultHeadProvider for Vec<HeadElement> {
    async fn default_head_elements(&self, _request: &RequestCtx) -> Result<Vec<HeadElement>, TaskError> {
        Ok(self.clone())
    }
}

/// Request-time core: matching, loaders, metadata, head, rendering inputs.
///
/// Built once at startup and shared behind an `Arc`; all per-request state
/// lives in the request and task contexts.
pub struct River {
    pub(crate) options: RiverOptions,
    pub(crate) matcher: Arc<dyn Matcher>,
    pub(crate) orchestrator: LoaderOrchestrator,
    pub(crate) manifest: Arc<BuildManifest>,
    pub(crate) resolver: Arc<dyn AssetResolver>,
    pub(crate) metadata_cache: RouteMetadataCache,
    pub(crate) default_head: Arc<dyn DefaultHeadProvider>,
    pub(crate) root_template: Arc<dyn RootTemplate>,
    pub(crate) actions: ActionRouter,
    pub(crate) head_renderer: HeadRenderer,
}

impl River {
    pub fn builder(options: RiverOptions) -> RiverBuilder {
        RiverBuilder::new(options)
    }

    /// Build from configuration: every `[[routes]]` entry is registered and
    /// served by a [`StaticTask`] when it declares anything to serve.
    pub fn from_config(config: &ServerConfig, manifest: BuildManifest) -> Result<Self, PatternError> {
        let mut builder = Self::builder(RiverOptions::from_config(config));
        builder.manifest(manifest);
        for route in &config.routes {
            match StaticTask::from_route(route) {
                Some(task) => builder.route_with_task(&route.pattern, Arc::new(task))?,
                None => builder.route(&route.pattern)?,
            };
        }
        Ok(builder.build())
    }

    pub fn options(&self) -> &RiverOptions {
        &self.options
    }

    pub fn build_id(&self) -> &str {
        &self.manifest.build_id
    }

    pub fn manifest(&self) -> &BuildManifest {
        &self.manifest
    }

    pub fn actions(&self) -> &ActionRouter {
        &self.actions
    }

    pub fn head_renderer(&self) -> &HeadRenderer {
        &self.head_renderer
    }

    pub fn root_template(&self) -> &dyn RootTemplate {
        self.root_template.as_ref()
    }

    pub fn metadata_cache(&self) -> &RouteMetadataCache {
        &self.metadata_cache
    }

    pub fn ssr_context(&self) -> SsrContext<'_> {
        SsrContext {
            symbol: &self.options.symbol,
            is_dev: self.options.is_dev,
            build_id: self.build_id(),
            public_path_prefix: &self.options.public_path_prefix,
        }
    }
}

impl std::fmt::Debug for River {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("River")
            .field("options", &self.options)
            .field("matcher", &self.matcher)
            .field("build_id", &self.manifest.build_id)
            .field("cached_chains", &self.metadata_cache.len())
            .field("actions", &self.actions)
            .finish()
    }
}

/// Collects routes, tasks and collaborators for a [`River`].
pub struct RiverBuilder {
    options: RiverOptions,
    router: NestedRouter,
    registry: TaskRegistry,
    matcher: Option<Arc<dyn Matcher>>,
    runner: Option<Arc<dyn TaskRunner>>,
    manifest: BuildManifest,
    resolver: Option<Arc<dyn AssetResolver>>,
    default_head: Arc<dyn DefaultHeadProvider>,
    root_template: Arc<dyn RootTemplate>,
    actions: ActionRouter,
}

impl RiverBuilder {
    pub fn new(options: RiverOptions) -> Self {
        let actions = ActionRouter::new(options.actions_mount.clone());
        Self {
            options,
            router: NestedRouter::new(),
            registry: TaskRegistry::new(),
            matcher: None,
            runner: None,
            manifest: BuildManifest::empty(),
            resolver: None,
            default_head: Arc::new(Vec::<HeadElement>::new()),
            root_template: Arc::new(DefaultRootTemplate::default()),
            actions,
        }
    }

    /// Register a UI route without a loader.
    pub fn route(&mut self, pattern: &str) -> Result<&mut Self, PatternError> {
        self.router.register(pattern)?;
        Ok(self)
    }

    /// Register a UI route whose loader is `task`.
    pub fn route_with_task(&mut self, pattern: &str, task: Arc<dyn Task>) -> Result<&mut Self, PatternError> {
        let registered = self.router.register(pattern)?;
        self.registry.register(registered.original(), task);
        Ok(self)
    }

    /// Register an action under the actions mount.
    pub fn action(&mut self, method: Method, pattern: &str, task: Arc<dyn Task>) -> Result<&mut Self, PatternError> {
        self.actions.register(method, pattern, task)?;
        Ok(self)
    }

    pub fn manifest(&mut self, manifest: BuildManifest) -> &mut Self {
        self.manifest = manifest;
        self
    }

    /// Replace the manifest as asset resolver.
    pub fn resolver(&mut self, resolver: Arc<dyn AssetResolver>) -> &mut Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn default_head(&mut self, provider: Arc<dyn DefaultHeadProvider>) -> &mut Self {
        self.default_head = provider;
        self
    }

    pub fn root_template(&mut self, template: Arc<dyn RootTemplate>) -> &mut Self {
        self.root_template = template;
        self
    }

    /// Replace the built-in [`NestedRouter`]; registered routes are ignored.
    pub fn matcher(&mut self, matcher: Arc<dyn Matcher>) -> &mut Self {
        self.matcher = Some(matcher);
        self
    }

    /// Replace the built-in [`TaskRegistry`]; registered loaders are ignored.
    pub fn task_runner(&mut self, runner: Arc<dyn TaskRunner>) -> &mut Self {
        self.runner = Some(runner);
        self
    }

    pub fn build(self) -> River {
        let manifest = Arc::new(self.manifest);
        let resolver = self
            .resolver
            .unwrap_or_else(|| Arc::clone(&manifest) as Arc<dyn AssetResolver>);
        let matcher = self.matcher.unwrap_or_else(|| Arc::new(self.router));
        let runner = self.runner.unwrap_or_else(|| Arc::new(self.registry));

        tracing::debug!(build_id = %manifest.build_id, actions = self.actions.len(), "River built");

        River {
            head_renderer: HeadRenderer::new(&self.options.symbol),
            options: self.options,
            matcher,
            orchestrator: LoaderOrchestrator::new(runner),
            manifest,
            resolver,
            metadata_cache: RouteMetadataCache::new(),
            default_head: self.default_head,
            root_template: self.root_template,
            actions: self.actions,
        }
    }
}
