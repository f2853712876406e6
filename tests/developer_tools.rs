//! Developer tools with multi-request flows against a mock instance.

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use snow_mcp::tools::{atf_test, dictionary, table_choice, user_role};
use wiremock::matchers::{any, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{api_error, client_for, result};

#[tokio::test]
async fn run_atf_test_queues_suite_result_when_execution_refused() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/now/atf/test/t1/execute"))
        .respond_with(ResponseTemplate::new(404).set_body_json(api_error("No such API")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/now/table/sys_atf_test_suite_result"))
        .and(body_json(json!({"test": "t1", "state": "waiting"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(result(json!({
            "sys_id": "run1",
            "test": "t1",
            "state": "waiting"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let input = serde_json::from_value(json!({"test_id": "t1"})).unwrap();
    let response = atf_test::run_atf_test(&client, input).await;

    assert!(response.success, "{}", response.message);
    assert_eq!(response.message, "ATF test execution queued");
    let data = response.data.unwrap();
    assert_eq!(data["execution_id"], json!("run1"));
    assert_eq!(data["status"], json!("waiting"));
}

#[tokio::test]
async fn choices_reorder_by_value_in_tens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/now/table/sys_choice"))
        .and(query_param("sysparm_query", "name=incident^element=category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(result(json!([
            {"sys_id": "c1", "value": "hardware"},
            {"sys_id": "c2", "value": "software"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;
    for (id, sequence) in [("c2", 10), ("c1", 20)] {
        Mock::given(method("PATCH"))
            .and(path(format!("/api/now/table/sys_choice/{}", id)))
            .and(body_json(json!({ "sequence": sequence })))
            .respond_with(ResponseTemplate::new(200).set_body_json(result(json!({"sys_id": id}))))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    let input = table_choice::ReorderChoicesInput {
        table: "incident".to_string(),
        element: "category".to_string(),
        choice_order: vec!["software".to_string(), "hardware".to_string()],
    };
    let response = table_choice::reorder_choices(&client, input).await;

    assert!(response.success, "{}", response.message);
    let data = response.data.unwrap();
    assert_eq!(data["parent"], json!("incident.category"));
    assert_eq!(
        data["reordered"],
        json!([{"sys_id": "c2", "sequence": 10}, {"sys_id": "c1", "sequence": 20}])
    );
}

#[tokio::test]
async fn unknown_choice_value_updates_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/now/table/sys_choice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(result(json!([
            {"sys_id": "c1", "value": "hardware"}
        ]))))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let input = table_choice::ReorderChoicesInput {
        table: "incident".to_string(),
        element: "category".to_string(),
        choice_order: vec!["hardware".to_string(), "network".to_string()],
    };
    let response = table_choice::reorder_choices(&client, input).await;

    assert!(!response.success);
    assert!(
        response
            .message
            .contains("no choice of incident.category has value network"),
        "{}",
        response.message
    );
}

#[tokio::test]
async fn remove_user_role_deletes_the_matching_assignment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/now/table/sys_user_has_role"))
        .and(query_param("sysparm_query", "user=u1^role=r1"))
        .and(query_param("sysparm_limit", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(result(json!([{"sys_id": "a1"}]))),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/now/table/sys_user_has_role/a1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let input = serde_json::from_value(json!({"user_id": "u1", "role_id": "r1"})).unwrap();
    let response = user_role::remove_user_role(&client, input).await;

    assert!(response.success, "{}", response.message);
    assert_eq!(response.data.unwrap()["deleted_sys_id"], json!("a1"));
}

#[tokio::test]
async fn remove_user_role_reports_missing_assignment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/now/table/sys_user_has_role"))
        .respond_with(ResponseTemplate::new(200).set_body_json(result(json!([]))))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let input = serde_json::from_value(json!({"user_id": "u1", "role_id": "r9"})).unwrap();
    let response = user_role::remove_user_role(&client, input).await;

    assert!(!response.success);
    assert!(
        response.message.contains("user u1 / role r9"),
        "{}",
        response.message
    );
}

#[tokio::test]
async fn bulk_assign_attempts_every_pair() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/now/table/sys_user_has_role"))
        .and(body_json(json!({"user": "u1", "role": "r1"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(result(json!({
            "sys_id": "a1",
            "user": "u1",
            "role": "r1"
        }))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/now/table/sys_user_has_role"))
        .and(body_json(json!({"user": "u2", "role": "r1"})))
        .respond_with(ResponseTemplate::new(400).set_body_json(api_error("Duplicate entry")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/now/table/sys_user_has_role"))
        .and(body_json(json!({"user": "u3", "role": "r1"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(result(json!({
            "sys_id": "a3",
            "user": "u3",
            "role": "r1"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let input = serde_json::from_value(json!({
        "assignments": [
            {"user_id": "u1", "role_id": "r1"},
            {"user_id": "u2", "role_id": "r1"},
            {"user_id": "u3", "role_id": "r1"}
        ]
    }))
    .unwrap();
    let response = user_role::bulk_assign_user_roles(&client, input).await;

    assert!(!response.success);
    assert!(
        response.message.ends_with("Created 2 of 3 user role assignments"),
        "{}",
        response.message
    );
    let data = response.data.unwrap();
    assert_eq!(data["created_count"], json!(2));
    assert_eq!(data["failed"][0]["index"], json!(1));
    assert_eq!(data["roles"][1]["sys_id"], json!("a3"));
}

#[tokio::test]
async fn choice_column_creates_its_choices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/now/table/sys_dictionary"))
        .respond_with(ResponseTemplate::new(201).set_body_json(result(json!({
            "sys_id": "d1",
            "name": "u_asset",
            "element": "u_tier",
            "internal_type": "choice"
        }))))
        .expect(1)
        .mount(&server)
        .await;
    for (value, sequence) in [("gold", 10), ("silver", 20)] {
        Mock::given(method("POST"))
            .and(path("/api/now/table/sys_choice"))
            .and(body_json(json!({
                "name": "u_asset",
                "element": "u_tier",
                "language": "en",
                "label": value,
                "value": value,
                "inactive": false,
                "sequence": sequence
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(result(json!({"sys_id": format!("ch-{}", value), "value": value}))),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    let input = serde_json::from_value(json!({
        "table_name": "u_asset",
        "column_name": "u_tier",
        "column_label": "Tier",
        "type": "choice",
        "choice_list": ["gold", "silver"]
    }))
    .unwrap();
    let response = dictionary::create_table_column(&client, input).await;

    assert!(response.success, "{}", response.message);
    assert_eq!(
        response.message,
        "Created table column: u_asset.u_tier with 2 choices"
    );
    let data = response.data.unwrap();
    assert_eq!(data["column"]["element"], json!("u_tier"));
    assert_eq!(data["choices_created"], json!(["gold", "silver"]));
}

#[tokio::test]
async fn column_is_read_by_table_and_element() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/now/table/sys_dictionary"))
        .and(query_param("sysparm_query", "name=u_asset^element=u_owner"))
        .respond_with(ResponseTemplate::new(200).set_body_json(result(json!([{
            "sys_id": "d2",
            "name": "u_asset",
            "element": "u_owner",
            "column_label": "Owner"
        }]))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let input = dictionary::GetTableColumnInput {
        table_name: "u_asset".to_string(),
        column_name: "u_owner".to_string(),
    };
    let response = dictionary::get_table_column(&client, input).await;

    assert!(response.success, "{}", response.message);
    assert_eq!(response.message, "Found table column: u_owner");
    assert_eq!(response.data.unwrap()["column_label"], json!("Owner"));
}
