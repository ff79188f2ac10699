//! Tests for the FABDB client

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::FabDbClient;
use crate::error::SyncError;

/// Helper: one page of the listing with the given card identifiers
fn page_json(identifiers: &[&str], current_page: u32, last_page: u32) -> serde_json::Value {
    let data: Vec<serde_json::Value> = identifiers
        .iter()
        .map(|id| {
            serde_json::json!({
                "identifier": id,
                "name": id,
                "printings": []
            })
        })
        .collect();
    serde_json::json!({
        "data": data,
        "meta": { "current_page": current_page, "last_page": last_page }
    })
}

#[tokio::test]
async fn fetch_all_accumulates_every_page() {
    let mock_server = MockServer::start().await;

    for (page, ids) in [(1, ["a", "b"]), (2, ["c", "d"]), (3, ["e", "f"])] {
        Mock::given(method("GET"))
            .and(path("/api/cards"))
            .and(query_param("per_page", "100"))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&ids, page, 3)))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let client = FabDbClient::with_api_url(format!("{}/api/cards", mock_server.uri()));
    let cards = client.fetch_all().await.unwrap();

    let identifiers: Vec<&str> = cards.iter().map(|c| c.identifier.as_str()).collect();
    assert_eq!(identifiers, vec!["a", "b", "c", "d", "e", "f"]);
}

#[tokio::test]
async fn fetch_all_single_page_stops_immediately() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/cards"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&["only"], 1, 1)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = FabDbClient::with_api_url(format!("{}/api/cards", mock_server.uri()));
    let cards = client.fetch_all().await.unwrap();

    assert_eq!(cards.len(), 1);
}

#[tokio::test]
async fn fetch_all_propagates_http_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/cards"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&["a"], 1, 2)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cards"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = FabDbClient::with_api_url(format!("{}/api/cards", mock_server.uri()));
    let result = client.fetch_all().await;

    match result {
        Err(SyncError::HttpStatus(status)) => assert_eq!(status.as_u16(), 503),
        other => panic!("Expected SyncError::HttpStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_all_rejects_malformed_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = FabDbClient::with_api_url(format!("{}/api/cards", mock_server.uri()));
    assert!(client.fetch_all().await.is_err());
}

#[tokio::test]
async fn fetch_all_stops_when_server_ignores_page_parameter() {
    let mock_server = MockServer::start().await;

    // Always answers with page 1 of 3, whatever page was asked for
    Mock::given(method("GET"))
        .and(path("/api/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&["a"], 1, 3)))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = FabDbClient::with_api_url(format!("{}/api/cards", mock_server.uri()));
    let result = client.fetch_all().await;

    match result {
        Err(SyncError::PageMismatch { requested, returned }) => {
            assert_eq!((requested, returned), (2, 1));
        }
        other => panic!("Expected SyncError::PageMismatch, got: {other:?}"),
    }
}
