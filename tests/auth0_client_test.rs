//! HTTP-level tests of the management API client

use logsync::adapters::auth0::{Auth0Client, LogSource};
use logsync::config::secret_string;
use logsync::core::paginate::Paginator;
use logsync::domain::{CheckpointId, SyncError};
use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;

fn client(server: &Server) -> Auth0Client {
    Auth0Client::new(
        &server.url(),
        "client-id",
        secret_string("client-secret".to_string()),
        Duration::from_secs(5),
    )
    .unwrap()
}

async fn mock_token(server: &mut Server) -> mockito::Mock {
    let audience = format!("{}/api/v2/", server.url());
    server
        .mock("POST", "/oauth/token")
        .match_body(Matcher::PartialJson(json!({
            "grant_type": "client_credentials",
            "client_id": "client-id",
            "client_secret": "client-secret",
            "audience": audience
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "access_token": "test-token",
                "token_type": "Bearer",
                "expires_in": 86400
            })
            .to_string(),
        )
        .create_async()
        .await
}

fn page(ids: &[&str]) -> String {
    let records: Vec<_> = ids
        .iter()
        .map(|id| {
            json!({
                "_id": id,
                "type": "s",
                "date": "2023-10-16T15:30:10.123Z",
                "user_agent": "Mozilla/5.0 (Windows NT 10.0; Win64; x64)",
                "client_id": "abc123"
            })
        })
        .collect();
    serde_json::to_string(&records).unwrap()
}

#[tokio::test]
async fn test_authenticate_and_fetch_page() {
    let mut server = Server::new_async().await;
    let token = mock_token(&mut server).await;
    let logs = server
        .mock("GET", "/api/v2/logs")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("take".into(), "2".into()),
            Matcher::UrlEncoded("from".into(), "A".into()),
        ]))
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(&["B", "C"]))
        .create_async()
        .await;

    let client = client(&server);
    client.authenticate().await.unwrap();
    let records = client
        .fetch_log_page(2, Some(&CheckpointId::new("A").unwrap()))
        .await
        .unwrap();

    token.assert_async().await;
    logs.assert_async().await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id.as_str(), "B");
    assert_eq!(records[1].extra["client_id"], "abc123");
}

#[tokio::test]
async fn test_page_with_mistyped_record_still_decodes() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server).await;
    let body = json!([
        {"_id": "B", "type": "s", "date": "2023-10-16T15:30:10Z"},
        {"_id": "C", "type": null, "user_agent": 42, "date": "2023-10-16T15:31:10Z"}
    ]);
    let _logs = server
        .mock("GET", "/api/v2/logs")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let client = client(&server);
    client.authenticate().await.unwrap();
    let records = client.fetch_log_page(10, None).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].id.as_str(), "C");
    assert_eq!(records[1].event_type, "");
    assert!(records[1].user_agent.is_none());
}

#[tokio::test]
async fn test_rejected_credentials_are_authentication_errors() {
    let mut server = Server::new_async().await;
    let _token = server
        .mock("POST", "/oauth/token")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "error": "access_denied", "error_description": "Unauthorized" }).to_string(),
        )
        .create_async()
        .await;

    let err = client(&server).authenticate().await.unwrap_err();
    match err {
        SyncError::Authentication(message) => {
            assert!(message.contains("401"));
            assert!(message.contains("Unauthorized"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_page_error_is_upstream_fetch_error() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server).await;
    let _logs = server
        .mock("GET", "/api/v2/logs")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_body(json!({ "message": "Too Many Requests" }).to_string())
        .create_async()
        .await;

    let client = client(&server);
    client.authenticate().await.unwrap();
    let err = client.fetch_log_page(200, None).await.unwrap_err();

    assert!(matches!(err, SyncError::UpstreamFetch(ref m) if m.contains("429")));
}

#[tokio::test]
async fn test_paginator_walks_pages_until_empty() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server).await;
    let first = server
        .mock("GET", "/api/v2/logs")
        .match_query(Matcher::Exact("take=2".into()))
        .with_status(200)
        .with_body(page(&["1", "2"]))
        .create_async()
        .await;
    let second = server
        .mock("GET", "/api/v2/logs")
        .match_query(Matcher::Exact("take=2&from=2".into()))
        .with_status(200)
        .with_body(page(&["3"]))
        .create_async()
        .await;
    let last = server
        .mock("GET", "/api/v2/logs")
        .match_query(Matcher::Exact("take=2&from=3".into()))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let client = client(&server);
    client.authenticate().await.unwrap();
    let fetched = Paginator::new(&client)
        .with_page_size(2)
        .fetch_all(None)
        .await
        .unwrap();

    first.assert_async().await;
    second.assert_async().await;
    last.assert_async().await;
    assert_eq!(fetched.len(), 3);
    assert_eq!(fetched.cursor.unwrap().as_str(), "3");
}
