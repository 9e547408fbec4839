#![allow(dead_code)]

use dailyfetch::api::HttpNewsApi;
use dailyfetch::config::{ApiConfig, ScheduleConfig};
use dailyfetch::schedule::ScheduleService;
use dailyfetch::storage::TranscriptStore;
use serde_json::json;
use std::sync::Arc;

/// Build an API client pointed at a mock server
pub fn api_client(base_url: &str) -> Arc<HttpNewsApi> {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
    };
    Arc::new(HttpNewsApi::new(&config).expect("failed to create API client"))
}

/// Build a schedule service against a mock server with the given debounce
pub fn schedule_service(base_url: &str, debounce_ms: u64) -> ScheduleService {
    let config = ScheduleConfig {
        debounce_ms,
        ..Default::default()
    };
    ScheduleService::new(api_client(base_url), config)
}

/// Helper: create a temporary transcript store backed by a temp directory.
///
/// Returns both the store and the `TempDir` so the caller keeps ownership
/// of the directory (preventing it from being removed).
pub fn create_temp_store() -> (Arc<TranscriptStore>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("failed to create tempdir");
    let db_path = dir.path().join("transcripts.db");
    let store = TranscriptStore::new_with_path(db_path).expect("failed to create store");
    (Arc::new(store), dir)
}

/// A server-side schedule record as JSON
pub fn schedule_record_json(id: &str, time: &str, topics: &[&str], enabled: bool) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Daily Fetch",
        "time": time,
        "topics": topics,
        "customTopics": [],
        "days": ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"],
        "isEnabled": enabled,
        "createdAt": "2026-01-01T00:00:00Z"
    })
}
