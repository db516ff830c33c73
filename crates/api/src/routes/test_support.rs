//! Shared helpers for route tests.

use std::sync::Arc;
use std::time::Duration;

use axum::response::Response;
use bazaar_core::imaging::ImagePipeline;
use bazaar_core::retry::{RetryExecutor, RetryPolicy};
use bazaar_core::storage::{BucketLayout, HttpObjectStore, StoreConfig};
use http_body_util::BodyExt;
use sea_orm::{DatabaseBackend, MockDatabase};

use crate::AppState;

/// Nothing listens here; every storage call fails fast.
pub const CLOSED_STORE_URL: &str = "http://127.0.0.1:9";

/// State over a mock database; storage calls all fail fast.
pub fn state_with(db: MockDatabase) -> AppState {
    let config =
        StoreConfig::new(CLOSED_STORE_URL, "test-key").with_timeout(Duration::from_secs(2));
    let store = HttpObjectStore::new(&config).unwrap();

    AppState {
        db: Arc::new(db.into_connection()),
        store: Arc::new(store),
        pipeline: ImagePipeline::default(),
        retry: RetryExecutor::new(RetryPolicy::immediate(1)),
        buckets: BucketLayout::default(),
    }
}

/// State whose database expects no queries.
pub fn empty_state() -> AppState {
    state_with(MockDatabase::new(DatabaseBackend::Postgres))
}

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
