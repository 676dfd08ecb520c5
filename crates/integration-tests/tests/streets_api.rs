//! Integration tests for the street REST API.
//!
//! Each test starts its own server over an in-memory store on an ephemeral
//! port and talks to it over real HTTP.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

use tankstellen_integration_tests::TestServer;

async fn create(client: &Client, server: &TestServer, body: &Value) -> (StatusCode, Value) {
    let resp = client
        .post(server.url("/streets"))
        .json(body)
        .send()
        .await
        .expect("Failed to create street");
    let status = resp.status();
    (status, resp.json().await.expect("Failed to read response"))
}

async fn list(client: &Client, server: &TestServer) -> Vec<Value> {
    let resp = client
        .get(server.url("/streets"))
        .send()
        .await
        .expect("Failed to list streets");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Failed to read response")
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_root_and_health() {
    let (server, _) = TestServer::spawn().await.unwrap();
    let client = Client::new();

    let resp = client.get(server.url("/")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "Streets API is running");

    let resp = client.get(server.url("/health/ready")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let (server, _) = TestServer::spawn().await.unwrap();

    let resp = Client::new()
        .get(server.url("/health"))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["x-request-id"], "trace-me");
}

// ============================================================================
// Create & List
// ============================================================================

#[tokio::test]
async fn test_create_then_list_returns_generated_id() {
    let (server, _) = TestServer::spawn().await.unwrap();
    let client = Client::new();

    let (status, body) = create(
        &client,
        &server,
        &json!({
            "address": "Bonner Str. 98",
            "coordinates": {"longitude": 6.960_644_911_005_172, "latitude": 50.916_095_041_454_554}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Street added");

    let records = list(&client, &server).await;
    assert_eq!(records.len(), 1);
    let id = records[0]["id"].as_str().unwrap();
    assert!(!id.is_empty());
    assert_eq!(body["id"], id);
    assert_eq!(records[0]["address"], "Bonner Str. 98");
}

#[tokio::test]
async fn test_record_without_coordinates_omits_field() {
    let (server, _) = TestServer::spawn().await.unwrap();
    let client = Client::new();

    let (status, _) = create(&client, &server, &json!({"address": "Aachener Str. 1"})).await;
    assert_eq!(status, StatusCode::CREATED);

    let records = list(&client, &server).await;
    assert!(records[0].get("coordinates").is_none());
}

#[tokio::test]
async fn test_create_without_address_is_rejected() {
    let (server, store) = TestServer::spawn().await.unwrap();
    let client = Client::new();

    let (status, body) = create(&client, &server, &json!({"address": "   "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
    assert!(store.is_empty().unwrap());
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_update_with_invalid_id_is_bad_request() {
    let (server, store) = TestServer::spawn().await.unwrap();
    let client = Client::new();
    create(&client, &server, &json!({"address": "Bonner Str. 98"})).await;

    let resp = client
        .put(server.url("/streets/not-a-valid-id"))
        .json(&json!({"address": "Bonner Str. 100"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Invalid ID format");

    let records = list(&client, &server).await;
    assert_eq!(records[0]["address"], "Bonner Str. 98");
    assert_eq!(store.len().unwrap(), 1);
}

#[tokio::test]
async fn test_update_replaces_address_and_coordinates() {
    let (server, _) = TestServer::spawn().await.unwrap();
    let client = Client::new();
    let (_, created) = create(
        &client,
        &server,
        &json!({"address": "Bonner Str. 98", "coordinates": {"longitude": 6.96, "latitude": 50.91}}),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let resp = client
        .put(server.url(&format!("/streets/{id}")))
        .json(&json!({"address": "Bonner Str. 100"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let records = list(&client, &server).await;
    assert_eq!(records[0]["id"], id);
    assert_eq!(records[0]["address"], "Bonner Str. 100");
    assert!(records[0].get("coordinates").is_none());
}

#[tokio::test]
async fn test_update_absent_id_is_not_found() {
    let (server, _) = TestServer::spawn().await.unwrap();

    let resp = Client::new()
        .put(server.url(&format!("/streets/{}", Uuid::new_v4())))
        .json(&json!({"address": "Bonner Str. 98"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Street not found");
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_absent_id_is_not_found() {
    let (server, _) = TestServer::spawn().await.unwrap();

    let resp = Client::new()
        .delete(server.url(&format!("/streets/{}", Uuid::new_v4())))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_invalid_id_is_bad_request() {
    let (server, _) = TestServer::spawn().await.unwrap();

    let resp = Client::new()
        .delete(server.url("/streets/12345"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_removes_record_from_listing() {
    let (server, _) = TestServer::spawn().await.unwrap();
    let client = Client::new();
    let (_, first) = create(&client, &server, &json!({"address": "Bonner Str. 98"})).await;
    create(&client, &server, &json!({"address": "Aachener Str. 1"})).await;
    let id = first["id"].as_str().unwrap();

    let resp = client
        .delete(server.url(&format!("/streets/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Street deleted");

    let records = list(&client, &server).await;
    assert_eq!(records.len(), 1);
    assert!(records.iter().all(|r| r["id"] != id));
}
