mod common;

use chrono::NaiveTime;
use serde_json::json;
use std::collections::BTreeSet;
use std::time::Duration;

use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn topic_set(topics: &[&str]) -> BTreeSet<String> {
    topics.iter().map(|t| t.to_string()).collect()
}

/// First-time creation: empty list seeds defaults, enabling the schedule
/// creates the record with the default topic, all seven days, and 08:00.
#[tokio::test]
async fn test_first_time_schedule_creation() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/scheduled-summaries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1..)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/scheduled-summaries"))
        .and(body_partial_json(json!({
            "name": "Daily Fetch",
            "time": "08:00",
            "topics": ["general"],
            "isEnabled": true,
            "days": ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::schedule_record_json(
            "sched-new",
            "08:00",
            &["general"],
            true,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let service = common::schedule_service(&server.uri(), 0);
    service.load().await.expect("load");

    let snap = service.snapshot();
    assert_eq!(snap.time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
    assert!(!snap.enabled);
    assert_eq!(snap.topics, topic_set(&["general"]));
    assert!(snap.record_id.is_none());

    service.set_enabled(true).await.expect("enable");

    let snap = service.snapshot();
    assert!(snap.enabled);
    assert_eq!(snap.record_id.as_deref(), Some("sched-new"));
}

/// Clearing every topic triggers the save handler but never reaches the
/// network: the update endpoint must see zero invocations.
#[tokio::test]
async fn test_save_rejected_by_empty_topic_invariant() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/scheduled-summaries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::schedule_record_json("sched-1", "09:00", &["technology"], true)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let service = common::schedule_service(&server.uri(), 0);
    service.load().await.expect("load");

    service
        .set_topics(BTreeSet::new())
        .await
        .expect("clear is a silent no-op");

    assert!(service.snapshot().topics.is_empty());
}

/// A divergent echo is not trusted: the local selection survives.
#[tokio::test]
async fn test_server_echo_mismatch_keeps_local_topics() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/scheduled-summaries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::schedule_record_json("sched-1", "09:00", &["technology"], true)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    // Server normalizes the topic set to something else entirely.
    Mock::given(method("PUT"))
        .and(path("/v1/scheduled-summaries/sched-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::schedule_record_json(
            "sched-1",
            "09:00",
            &["general"],
            true,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let service = common::schedule_service(&server.uri(), 0);
    service.load().await.expect("load");

    service
        .set_topics(topic_set(&["science"]))
        .await
        .expect("save");

    assert_eq!(service.snapshot().topics, topic_set(&["science"]));
}

/// The full-replace update carries the configured timezone and all days.
#[tokio::test]
async fn test_update_carries_timezone_and_all_days() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/scheduled-summaries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::schedule_record_json("sched-1", "09:00", &["technology"], true)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/v1/scheduled-summaries/sched-1"))
        .and(body_partial_json(json!({
            "timezone": "UTC",
            "time": "10:30",
            "days": ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"],
            "createdAt": "2026-01-01T00:00:00Z"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::schedule_record_json(
            "sched-1",
            "10:30",
            &["technology"],
            true,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let service = common::schedule_service(&server.uri(), 0);
    service.load().await.expect("load");

    service
        .set_time(NaiveTime::from_hms_opt(10, 27, 0).unwrap())
        .await
        .expect("save");
}

/// Rapid edits inside one debounce window coalesce into a single update.
#[tokio::test]
async fn test_debounce_coalesces_rapid_edits() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/scheduled-summaries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::schedule_record_json("sched-1", "09:00", &["technology"], true)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    // Only the superseding edit reaches the server.
    Mock::given(method("PUT"))
        .and(path("/v1/scheduled-summaries/sched-1"))
        .and(body_partial_json(json!({ "time": "10:40" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::schedule_record_json(
            "sched-1",
            "10:40",
            &["technology"],
            true,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let service = common::schedule_service(&server.uri(), 80);
    service.load().await.expect("load");

    service
        .set_time(NaiveTime::from_hms_opt(10, 27, 0).unwrap())
        .await
        .expect("first edit");
    service
        .set_time(NaiveTime::from_hms_opt(10, 44, 0).unwrap())
        .await
        .expect("second edit");

    // Let the debounce window elapse and the surviving save land.
    tokio::time::sleep(Duration::from_millis(400)).await;
}

/// The delete escape hatch issues a single DELETE for the record id.
#[tokio::test]
async fn test_delete_schedule_record() {
    use dailyfetch::api::NewsApi;

    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/scheduled-summaries/sched-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = common::api_client(&server.uri());
    api.delete_scheduled_summary("sched-1")
        .await
        .expect("delete");
}

/// A failed update falls back to a re-fetch; local selection is preserved.
#[tokio::test]
async fn test_failed_save_resyncs_and_preserves_selection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/scheduled-summaries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::schedule_record_json("sched-1", "09:00", &["technology"], true)
        ])))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/v1/scheduled-summaries/sched-1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let service = common::schedule_service(&server.uri(), 0);
    service.load().await.expect("load");

    service
        .set_topics(topic_set(&["science"]))
        .await
        .expect("save is fail-soft");

    assert_eq!(service.snapshot().topics, topic_set(&["science"]));
}
