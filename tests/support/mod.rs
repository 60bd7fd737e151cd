#![allow(dead_code)]

pub mod fake_cluster;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use kaas_api::{
    app,
    services::build_kubernetes::Kubernetes,
    utilities::{app_state::AppState, config::Config},
};
use serde_json::Value;
use tower::ServiceExt;

use crate::support::fake_cluster::FakeCluster;

pub fn test_app(cluster: &FakeCluster) -> Router {
    test_app_with_config(cluster, Config::default())
}

pub fn test_app_with_config(cluster: &FakeCluster, config: Config) -> Router {
    app(AppState {
        kubernetes: Kubernetes::from_cluster(cluster.clone()),
        config,
    })
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

/// A POST with an arbitrary body and an optional content type.
pub fn post_raw(uri: &str, body: &str, content_type: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

/// Sends one request through the router and decodes the JSON body, if any.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("Failed to execute request.");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, body)
}
