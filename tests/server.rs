//! Actions, health and real-socket server tests.

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tokio::net::TcpListener;

use river_server::config::ServerConfig;
use river_server::http::BUILD_ID_HEADER;
use river_server::{HttpServer, Shutdown};

mod common;

#[tokio::test]
async fn test_health_endpoint() {
    let app = common::app(common::river());
    let (status, _, body) = common::get(&app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_post_action_echoes_json_body() {
    let app = common::app(common::river());
    let request = Request::post("/api/echo")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"todo":"write tests","done":false}"#))
        .unwrap();

    let (status, headers, body) = common::send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[BUILD_ID_HEADER], "test-build");
    assert_eq!(common::json_body(&body), json!({"todo": "write tests", "done": false}));
}

#[tokio::test]
async fn test_get_action_reads_query() {
    let app = common::app(common::river());
    let (status, _, body) = common::get(&app, "/api/search?q=rust&page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(common::json_body(&body), json!({"q": "rust", "page": "2"}));
}

#[tokio::test]
async fn test_action_rejections() {
    let app = common::app(common::river());

    let bad_json = Request::post("/api/echo").body(Body::from("{nope")).unwrap();
    let (status, _, _) = common::send(&app, bad_json).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let unknown = Request::post("/api/missing").body(Body::empty()).unwrap();
    let (status, headers, _) = common::send(&app, unknown).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(headers[BUILD_ID_HEADER], "test-build");

    // Registered for POST only.
    let (status, _, _) = common::get(&app, "/api/echo").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_action_body_limit() {
    let mut config = ServerConfig::default();
    config.security.max_body_size = 16;
    let river = river_server::River::from_config(&config, common::manifest()).unwrap();
    let app = common::app_with_config(&config, std::sync::Arc::new(river));

    // No action is registered, but the body is rejected before dispatch.
    let request = Request::post("/api/echo").body(Body::from("x".repeat(64))).unwrap();
    let (status, _, _) = common::send(&app, request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_real_socket_serves_and_drains() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(&ServerConfig::default(), common::river());
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let client = reqwest::Client::new();
    let health = client.get(format!("http://{addr}/healthz")).send().await.unwrap();
    assert_eq!(health.status(), reqwest::StatusCode::OK);
    assert_eq!(health.text().await.unwrap(), "OK");

    let data: serde_json::Value = client
        .get(format!("http://{addr}/users/5?river-json=1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(data["params"]["id"], "5");

    let redirect = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
        .get(format!("http://{addr}/old"))
        .send()
        .await
        .unwrap();
    assert_eq!(redirect.status(), reqwest::StatusCode::SEE_OTHER);

    drop(client);
    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), handle).await;
    assert!(matches!(result, Ok(Ok(Ok(())))));
}
