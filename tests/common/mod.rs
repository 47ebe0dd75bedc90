//! Shared utilities for integration testing.
//!
//! Runs an in-memory configuration store behind a real HTTP listener so
//! the facade is exercised over the same transport it uses in production.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use caddyctl::tree;

/// In-memory configuration tree shared with the test body.
#[derive(Clone)]
pub struct MockStore {
    root: Arc<Mutex<Value>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self { root: Arc::new(Mutex::new(json!({}))) }
    }

    /// Copy of the whole tree for assertions.
    pub fn snapshot(&self) -> Value {
        self.root.lock().unwrap().clone()
    }
}

/// Start a mock admin endpoint over `store` on an ephemeral port and
/// return its base URL.
pub async fn start_mock_admin(store: MockStore) -> String {
    let app = Router::new()
        .route("/config/", get(get_root).post(post_root))
        .route(
            "/config/{*path}",
            get(get_config).post(post_config).delete(delete_config),
        )
        .with_state(store);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Start an admin endpoint that answers every request with a server
/// error, for transport-failure tests.
#[allow(dead_code)]
pub async fn start_failing_admin() -> String {
    let app = Router::new().fallback(|| async { StatusCode::INTERNAL_SERVER_ERROR });
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn keys(path: &str) -> Vec<String> {
    path.split('/').filter(|s| !s.is_empty()).map(str::to_owned).collect()
}

async fn get_root(State(store): State<MockStore>) -> Json<Value> {
    Json(store.root.lock().unwrap().clone())
}

async fn post_root(State(store): State<MockStore>, Json(value): Json<Value>) -> StatusCode {
    *store.root.lock().unwrap() = value;
    StatusCode::OK
}

async fn get_config(
    State(store): State<MockStore>,
    Path(path): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let root = store.root.lock().unwrap();
    match tree::get(&root, &keys(&path)) {
        Some(node) => Ok(Json(node.clone())),
        None => Err(StatusCode::NOT_FOUND),
    }
}

async fn post_config(
    State(store): State<MockStore>,
    Path(path): Path<String>,
    Json(value): Json<Value>,
) -> StatusCode {
    let mut root = store.root.lock().unwrap();
    match tree::set(&mut root, value, &keys(&path)) {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::BAD_REQUEST,
    }
}

async fn delete_config(State(store): State<MockStore>, Path(path): Path<String>) -> StatusCode {
    let mut root = store.root.lock().unwrap();
    match tree::delete(&mut root, &keys(&path)) {
        Ok(true) => StatusCode::OK,
        Ok(false) => StatusCode::NOT_FOUND,
        Err(_) => StatusCode::BAD_REQUEST,
    }
}
