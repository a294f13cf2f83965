//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body, Bytes};
use axum::http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use river_server::assets::BuildManifest;
use river_server::config::ServerConfig;
use river_server::head::HeadElement;
use river_server::tasks::{StaticTask, Task, TaskCtx, TaskError};
use river_server::{HttpServer, River, RiverOptions};

pub const MANIFEST: &str = r#"{
    "buildId": "test-build",
    "clientEntrySrc": "src/entry.tsx",
    "clientEntryOut": "assets/entry-9f.js",
    "paths": {
        "": { "srcPath": "src/root.tsx", "outPath": "assets/root.js", "exportKey": "Root" },
        "/a": { "srcPath": "src/a.tsx", "outPath": "assets/a.js", "exportKey": "A" },
        "/a/b": { "srcPath": "src/b.tsx", "outPath": "assets/b.js", "exportKey": "B" },
        "/users/:id": { "srcPath": "src/user.tsx", "outPath": "assets/user.js", "exportKey": "User", "deps": ["assets/shared.js"] }
    },
    "cssBundles": { "assets/user.js": "assets/user.css" },
    "criticalCss": "body{margin:0}"
}"#;

/// Always fails with the given message.
pub struct FailingTask(pub &'static str);

#[async_trait]
impl Task for FailingTask {
    async fn run(&self, _ctx: &mut TaskCtx) -> Result<Value, TaskError> {
        Err(TaskError::new(self.0))
    }
}

/// Echoes the `id` param, sets a header and a cookie.
pub struct UserTask;

#[async_trait]
impl Task for UserTask {
    async fn run(&self, ctx: &mut TaskCtx) -> Result<Value, TaskError> {
        let id = ctx.param("id").unwrap_or_default().to_string();
        ctx.proxy()
            .set_header(header::HeaderName::from_static("x-user"), HeaderValue::from_static("seen"));
        ctx.proxy().add_cookie(HeaderValue::from_static("visited=1; Path=/"));
        ctx.proxy().add_head_element(HeadElement::title(format!("User {id}")));
        Ok(json!({ "id": id }))
    }
}

/// Chooses its own cache policy.
pub struct CachedTask;

#[async_trait]
impl Task for CachedTask {
    async fn run(&self, ctx: &mut TaskCtx) -> Result<Value, TaskError> {
        ctx.proxy()
            .set_header(header::CACHE_CONTROL, HeaderValue::from_static("public, max-age=60"));
        Ok(json!("cached"))
    }
}

/// Signals not-found from inside the loader.
pub struct MissingTask;

#[async_trait]
impl Task for MissingTask {
    async fn run(&self, ctx: &mut TaskCtx) -> Result<Value, TaskError> {
        ctx.proxy().not_found();
        Ok(Value::Null)
    }
}

/// Sleeps far past any test deadline; flags when its future is dropped.
pub struct SlowTask(pub Arc<AtomicBool>);

struct SetOnDrop(Arc<AtomicBool>);

impl Drop for SetOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Task for SlowTask {
    async fn run(&self, _ctx: &mut TaskCtx) -> Result<Value, TaskError> {
        let _flag = SetOnDrop(Arc::clone(&self.0));
        tokio::time::sleep(Duration::from_secs(300)).await;
        Ok(Value::Null)
    }
}

/// Returns its input unchanged (actions).
pub struct EchoInput;

#[async_trait]
impl Task for EchoInput {
    async fn run(&self, ctx: &mut TaskCtx) -> Result<Value, TaskError> {
        Ok(ctx.input().clone())
    }
}

pub fn manifest() -> BuildManifest {
    BuildManifest::from_json(MANIFEST).unwrap()
}

pub fn river_with(options: RiverOptions, slow_flag: Arc<AtomicBool>) -> Arc<River> {
    let mut builder = River::builder(options);
    builder.manifest(manifest());
    builder.default_head(Arc::new(vec![
        HeadElement::title("Default"),
        HeadElement::meta([("name", "viewport"), ("content", "width=device-width")]),
    ]));
    builder
        .route_with_task("", Arc::new(StaticTask::new(json!({"app": "river"})).with_head(HeadElement::title("River"))))
        .unwrap()
        .route_with_task("/_index", Arc::new(StaticTask::new(json!("home"))))
        .unwrap()
        .route_with_task("/a", Arc::new(FailingTask("a exploded")))
        .unwrap()
        .route_with_task("/a/b", Arc::new(StaticTask::new(json!("b"))))
        .unwrap()
        .route_with_task("/users/:id", Arc::new(UserTask))
        .unwrap()
        .route_with_task("/old", Arc::new(StaticTask::default().with_redirect("/new")))
        .unwrap()
        .route_with_task("/gone", Arc::new(MissingTask))
        .unwrap()
        .route_with_task("/cached", Arc::new(CachedTask))
        .unwrap()
        .route_with_task("/slow", Arc::new(SlowTask(slow_flag)))
        .unwrap()
        .route_with_task("/café", Arc::new(StaticTask::new(json!("café"))))
        .unwrap()
        .route_with_task(
            "/scripted",
            Arc::new(StaticTask::new(json!(null)).with_head(HeadElement::new("script").inner_html("window.a=1"))),
        )
        .unwrap()
        .route("/files/*")
        .unwrap();
    builder
        .action(Method::POST, "/echo", Arc::new(EchoInput))
        .unwrap()
        .action(Method::GET, "/search", Arc::new(EchoInput))
        .unwrap();
    Arc::new(builder.build())
}

pub fn river() -> Arc<River> {
    river_with(RiverOptions::default(), Arc::new(AtomicBool::new(false)))
}

pub fn app(river: Arc<River>) -> Router {
    app_with_config(&ServerConfig::default(), river)
}

pub fn app_with_config(config: &ServerConfig, river: Arc<River>) -> Router {
    HttpServer::new(config, river).router()
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, HeaderMap, Bytes) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub fn json_body(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap()
}
