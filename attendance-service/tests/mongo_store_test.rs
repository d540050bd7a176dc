//! Tests against a real MongoDB instance (`TEST_MONGODB_URI`, default
//! `mongodb://localhost:27017`). Run with `cargo test -- --ignored`.

mod common;

use common::TestApp;
use serde_json::json;

#[tokio::test]
#[ignore = "Requires MongoDB"]
async fn fresh_collection_lists_nothing() {
    let app = TestApp::spawn_mongo().await;

    assert!(app.get_records().await.is_empty());

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires MongoDB"]
async fn stored_records_come_back_without_object_id() {
    let app = TestApp::spawn_mongo().await;
    let record = json!({
        "name": "Alice",
        "date": "2024-01-01",
        "present": true,
        "cie": { "test1": 18, "test2": 19.5 }
    });

    let response = app.post_record(&record).await;
    assert_eq!(response.status().as_u16(), 200);

    let records = app.get_records().await;
    assert_eq!(records, vec![record]);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires MongoDB"]
async fn readiness_pings_mongodb() {
    let app = TestApp::spawn_mongo().await;

    let body: serde_json::Value = reqwest::get(format!("{}/ready", app.address))
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(body["store"], "mongo");

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires MongoDB"]
async fn extended_json_lookalikes_are_not_converted() {
    let app = TestApp::spawn_mongo().await;
    let record = json!({
        "x": { "$numberLong": "5" },
        "marked_at": { "$date": "2024-01-01T09:30:00Z" }
    });

    app.post_record(&record).await;
    assert_eq!(app.get_records().await, vec![record]);

    app.cleanup().await;
}
