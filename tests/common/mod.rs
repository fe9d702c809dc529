//! Common test utilities
#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use fintech_api::config::StoreConfig;
use fintech_api::{build_router, AppState, PasswordHasher, Store, Telemetry};
use serde_json::Value;
use tower::util::ServiceExt;

/// Telemetry double that counts hook invocations
#[derive(Debug, Default)]
pub struct CountingTelemetry {
    pub users: AtomicU64,
    pub transactions: Mutex<Vec<i64>>,
}

impl CountingTelemetry {
    pub fn users(&self) -> u64 {
        self.users.load(Ordering::SeqCst)
    }

    pub fn transactions(&self) -> Vec<i64> {
        self.transactions.lock().unwrap().clone()
    }
}

impl Telemetry for CountingTelemetry {
    fn user_registered(&self) {
        self.users.fetch_add(1, Ordering::SeqCst);
    }

    fn transaction_created(&self, user_id: i64) {
        self.transactions.lock().unwrap().push(user_id);
    }
}

/// Fresh in-memory store with the schema in place
pub async fn setup_test_store() -> Store {
    Store::connect(&StoreConfig::new("sqlite::memory:"))
        .await
        .expect("Failed to open in-memory store")
}

/// Router over a fresh store, plus handles to inspect it afterwards
pub async fn setup_test_app() -> (Router, Store, Arc<CountingTelemetry>) {
    let store = setup_test_store().await;
    let telemetry = Arc::new(CountingTelemetry::default());

    // SHA-256 keeps the suite fast; Argon2 has its own coverage
    let state = AppState::new(store.clone())
        .with_hasher(PasswordHasher::Sha256)
        .with_telemetry(telemetry.clone());

    (build_router(state), store, telemetry)
}

/// Send one request and decode the JSON body (Null when empty or not JSON)
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}
