//! End-to-End Server Tests
//!
//! Runs the router on a real TCP listener and talks to it over HTTP.

use json_cache::{api::create_router, AppState, Config};
use serde_json::{json, Value};

async fn spawn_server() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::from_config(&Config::with_root(dir.path()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });

    (dir, format!("http://{}", addr))
}

#[tokio::test]
async fn test_document_lifecycle_over_http() {
    let (_dir, base) = spawn_server().await;
    let client = reqwest::Client::new();

    let put = client
        .put(format!("{base}/docs/users/alice"))
        .json(&json!({"name": "alice", "age": 30}))
        .send()
        .await
        .unwrap();
    assert!(put.status().is_success());

    let got: Value = client
        .get(format!("{base}/docs/users/alice"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(got["document"]["age"], 30);

    let field: Value = client
        .get(format!("{base}/fields/name/users/alice"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(field["value"], "alice");

    let listed: Value = client
        .get(format!("{base}/list/users"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed["count"], 1);

    let deleted: Value = client
        .delete(format!("{base}/folders/users"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(deleted["deleted"], true);

    let missing = client
        .get(format!("{base}/docs/users/alice"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
}
