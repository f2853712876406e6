//! Retry and session-header behaviour of the shared client.

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use snow_mcp::snow_client::SessionOptions;
use snow_mcp::tools::knowledge;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use common::{client_for, result};

fn get_input(id: &str) -> knowledge::GetTaxonomyInput {
    knowledge::GetTaxonomyInput {
        taxonomy_id: id.to_string(),
    }
}

#[tokio::test]
async fn rate_limited_read_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/now/table/taxonomy/tx1"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/now/table/taxonomy/tx1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(result(json!({"sys_id": "tx1", "name": "IT"}))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = knowledge::get_taxonomy(&client, get_input("tx1")).await;

    assert!(response.success, "{}", response.message);
    assert_eq!(response.message, "Found taxonomy: IT");
}

#[tokio::test]
async fn create_is_sent_once_when_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/now/table/taxonomy"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = knowledge::create_taxonomy(
        &client,
        serde_json::from_value(json!({"name": "Facilities"})).unwrap(),
    )
    .await;

    assert!(!response.success);
    assert!(
        response.message.starts_with("Create taxonomy failed:"),
        "{}",
        response.message
    );
}

#[tokio::test]
async fn plain_server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/now/table/taxonomy/tx1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal error"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = knowledge::get_taxonomy(&client, get_input("tx1")).await;

    assert!(!response.success);
    assert!(response.message.contains("500"), "{}", response.message);
}

#[tokio::test]
async fn session_headers_reach_the_instance() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/now/table/taxonomy/tx1"))
        .and(header("X-UserToken", "tok-123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(result(json!({"sys_id": "tx1", "name": "IT"}))),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/now/table/taxonomy/tx1"))
        .and(|request: &Request| !request.headers.contains_key("x-usertoken"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(result(json!({"sys_id": "tx1", "name": "IT"}))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let shared = client.clone();
    shared
        .configure_session(SessionOptions::new().header("X-UserToken", "tok-123"))
        .unwrap();
    let first = knowledge::get_taxonomy(&client, get_input("tx1")).await;
    assert!(first.success, "{}", first.message);

    shared
        .configure_session(SessionOptions::new().remove("X-UserToken"))
        .unwrap();
    let second = knowledge::get_taxonomy(&client, get_input("tx1")).await;
    assert!(second.success, "{}", second.message);
}
