//! Attachment and elevation tools against a mock instance.

mod common;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use pretty_assertions::assert_eq;
use serde_json::json;
use snow_mcp::tools::{attachment, elevation};
use wiremock::matchers::{any, body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{client_for, result};

#[tokio::test]
async fn upload_decodes_base64_into_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/now/attachment/file"))
        .and(query_param("table_name", "incident"))
        .and(query_param("table_sys_id", "inc1"))
        .and(query_param("file_name", "notes.txt"))
        .and(header("content-type", "text/plain"))
        .and(body_string("hello attachment"))
        .respond_with(ResponseTemplate::new(201).set_body_json(result(json!({
            "sys_id": "a1",
            "file_name": "notes.txt",
            "content_type": "text/plain",
            "size_bytes": "16",
            "table_name": "incident",
            "table_sys_id": "inc1"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let input = attachment::UploadAttachmentInput {
        table_name: "incident".to_string(),
        table_sys_id: "inc1".to_string(),
        file_name: "notes.txt".to_string(),
        content_type: "text/plain".to_string(),
        file_data_base64: STANDARD.encode("hello attachment"),
        creation_time: None,
        encryption_context: None,
    };
    let response = attachment::upload_attachment(&client, input).await;

    assert!(response.success, "{}", response.message);
    assert_eq!(response.message, "Uploaded attachment: notes.txt");
    let data = response.data.unwrap();
    assert_eq!(data["sys_id"], json!("a1"));
    assert_eq!(data["size_bytes"], json!("16"));
}

#[tokio::test]
async fn invalid_base64_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let input = attachment::UploadAttachmentInput {
        table_name: "incident".to_string(),
        table_sys_id: "inc1".to_string(),
        file_name: "notes.txt".to_string(),
        content_type: "text/plain".to_string(),
        file_data_base64: "%%% not base64 %%%".to_string(),
        creation_time: None,
        encryption_context: None,
    };
    let response = attachment::upload_attachment(&client, input).await;

    assert!(!response.success);
    assert!(response
        .message
        .starts_with("Upload attachment failed: decode error:"));
}

#[tokio::test]
async fn download_returns_base64_and_metadata() {
    let server = MockServer::start().await;
    let bytes: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0, 1, 2, 255];
    Mock::given(method("GET"))
        .and(path("/api/now/attachment/a1/file"))
        .and(header("accept", "image/png"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-attachment-metadata", r#"{"file_name":"logo.png"}"#)
                .set_body_raw(bytes.clone(), "image/png"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let input = attachment::DownloadAttachmentInput {
        attachment_id: "a1".to_string(),
        accept_type: "image/png".to_string(),
    };
    let response = attachment::download_attachment(&client, input).await;

    assert!(response.success, "{}", response.message);
    let data = response.data.unwrap();
    assert_eq!(data["file_data_base64"], json!(STANDARD.encode(&bytes)));
    assert_eq!(data["content_type"], json!("image/png"));
    assert_eq!(data["content_length"], json!(8));
    assert_eq!(data["metadata"]["file_name"], json!("logo.png"));
}

#[tokio::test]
async fn list_attachments_uses_large_default_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/now/attachment"))
        .and(query_param("sysparm_limit", "1000"))
        .and(query_param("sysparm_query", "table_name=incident^table_sys_id=inc1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(result(json!([
            {"sys_id": "a1", "file_name": "one.txt"},
            {"sys_id": "a2", "file_name": "two.txt"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let input = serde_json::from_value(json!({
        "table_name": "incident",
        "table_sys_id": "inc1"
    }))
    .unwrap();
    let response = attachment::list_attachments(&client, input).await;

    assert!(response.success, "{}", response.message);
    let data = response.data.unwrap();
    assert_eq!(data["total"], json!(2));
    assert_eq!(data["attachments"][0]["file_name"], json!("one.txt"));
}

#[tokio::test]
async fn elevation_posts_role_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/now/ui/impersonate/role"))
        .and(body_json(json!({"roles": "security_admin"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(result(json!({}))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = elevation::security_elevation(
        &client,
        elevation::SecurityElevationInput {
            roles: " security_admin ".to_string(),
        },
    )
    .await;

    assert!(response.success, "{}", response.message);
    assert_eq!(
        response.data.unwrap()["elevated_roles"],
        json!("security_admin")
    );
}

#[tokio::test]
async fn elevation_rejected_by_instance() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/now/ui/impersonate/role"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = elevation::security_elevation(
        &client,
        elevation::SecurityElevationInput {
            roles: "security_admin".to_string(),
        },
    )
    .await;

    assert!(!response.success);
    assert!(response.message.contains("authentication failed"));
}
