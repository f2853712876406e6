//! Table-backed tools against a mock instance.

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use snow_mcp::tools::{atf, email_template, knowledge, portal_layout, portal_page, widget_instance};
use wiremock::matchers::{any, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{api_error, client_for, result, PASSWORD};

#[tokio::test]
async fn create_sends_defaults_and_flattens_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/now/table/sp_instance"))
        .and(body_json(json!({
            "sp_widget": "w1",
            "order": 1,
            "active": true,
            "color": "default",
            "size": "md",
            "sp_column": "c1"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(result(json!({
            "sys_id": "i1",
            "sp_widget": {"value": "w1", "display_value": "Hello World"},
            "sp_column": "c1",
            "title": "Greeting",
            "order": "1",
            "active": "true"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let input = serde_json::from_value(json!({"sp_widget": "w1", "sp_column": "c1"})).unwrap();
    let response = widget_instance::create_widget_instance(&client, input).await;

    assert!(response.success, "{}", response.message);
    assert_eq!(response.message, "Created widget instance: Greeting");
    let data = response.data.unwrap();
    assert_eq!(data["sys_id"], json!("i1"));
    assert_eq!(data["sp_widget"], json!("Hello World"));
    assert_eq!(data["glyph"], json!(""));
}

#[tokio::test]
async fn list_passes_pagination_and_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/now/table/sysevent_email_template"))
        .and(query_param("sysparm_limit", "5"))
        .and(query_param("sysparm_offset", "10"))
        .and(query_param("sysparm_query", "active=true^nameLIKEincident"))
        .and(query_param("sysparm_display_value", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(result(json!([
            {"sys_id": "t1", "name": "incident.opened"},
            {"sys_id": "t2", "name": "incident.closed"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let input = serde_json::from_value(json!({
        "active": true,
        "name_contains": "incident",
        "limit": 5,
        "offset": 10
    }))
    .unwrap();
    let response = email_template::list_email_templates(&client, input).await;

    assert!(response.success, "{}", response.message);
    assert_eq!(response.message, "Found 2 email templates");
    let data = response.data.unwrap();
    assert_eq!(data["total"], json!(2));
    assert_eq!(data["limit"], json!(5));
    assert_eq!(data["offset"], json!(10));
    assert_eq!(data["templates"][1]["name"], json!("incident.closed"));
}

#[tokio::test]
async fn list_reports_instance_total_count() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/now/table/sp_column"))
        .and(query_param("sysparm_query", "sp_row=r1^size>=6"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", "42")
                .set_body_json(result(json!([
                    {"sys_id": "c1", "size": "6"},
                    {"sys_id": "c2", "size": "12"}
                ]))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let input = serde_json::from_value(json!({"sp_row": "r1", "size_filter": ">=6"})).unwrap();
    let response = portal_layout::list_portal_columns(&client, input).await;

    assert!(response.success, "{}", response.message);
    let data = response.data.unwrap();
    assert_eq!(data["total"], json!(42));
    assert_eq!(data["count"], json!(2));
    assert_eq!(data["columns"][1]["sys_id"], json!("c2"));
}

#[tokio::test]
async fn update_sends_only_provided_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/now/table/taxonomy/tx1"))
        .and(body_json(json!({"description": "Reworded"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(result(json!({
            "sys_id": "tx1",
            "name": "IT",
            "description": "Reworded"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let input = knowledge::UpdateTaxonomyInput {
        taxonomy_id: "tx1".to_string(),
        description: Some("Reworded".to_string()),
        ..Default::default()
    };
    let response = knowledge::update_taxonomy(&client, input).await;

    assert!(response.success, "{}", response.message);
    assert_eq!(response.message, "Updated taxonomy: IT");
}

#[tokio::test]
async fn empty_update_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let input = knowledge::UpdateTaxonomyInput {
        taxonomy_id: "tx1".to_string(),
        ..Default::default()
    };
    let response = knowledge::update_taxonomy(&client, input).await;

    assert!(!response.success);
    assert_eq!(
        response.message,
        "Update taxonomy failed: validation error: no fields to update"
    );
}

#[tokio::test]
async fn created_record_can_be_fetched() {
    let server = MockServer::start().await;
    let stored = json!({
        "sys_id": "tx9",
        "name": "Facilities",
        "active": "true",
        "sys_domain": "global",
        "sys_domain_path": "/"
    });
    Mock::given(method("POST"))
        .and(path("/api/now/table/taxonomy"))
        .respond_with(ResponseTemplate::new(201).set_body_json(result(stored.clone())))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/now/table/taxonomy/tx9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(result(stored)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let created = knowledge::create_taxonomy(
        &client,
        serde_json::from_value(json!({"name": "Facilities"})).unwrap(),
    )
    .await;
    assert!(created.success, "{}", created.message);
    let sys_id = created.data.unwrap()["sys_id"].as_str().unwrap().to_string();

    let fetched = knowledge::get_taxonomy(
        &client,
        knowledge::GetTaxonomyInput {
            taxonomy_id: sys_id,
        },
    )
    .await;
    assert!(fetched.success, "{}", fetched.message);
    let data = fetched.data.unwrap();
    assert_eq!(data["name"], json!("Facilities"));
    assert_eq!(data["sys_domain"], json!("global"));
}

#[tokio::test]
async fn api_error_becomes_sanitized_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/now/table/taxonomy"))
        .respond_with(ResponseTemplate::new(400).set_body_json(api_error(&format!(
            "Invalid credentials {} in payload",
            PASSWORD
        ))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = knowledge::create_taxonomy(
        &client,
        serde_json::from_value(json!({"name": "Broken"})).unwrap(),
    )
    .await;

    assert!(!response.success);
    assert!(response.message.starts_with("Create taxonomy failed:"));
    assert!(response.message.contains("[REDACTED]"));
    assert!(!response.message.contains(PASSWORD));
    assert!(response.data.is_none());
}

#[tokio::test]
async fn missing_record_reports_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/now/table/taxonomy/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(api_error("No Record found")))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = knowledge::get_taxonomy(
        &client,
        knowledge::GetTaxonomyInput {
            taxonomy_id: "nope".to_string(),
        },
    )
    .await;

    assert!(!response.success);
    assert_eq!(response.message, "Get taxonomy failed: record not found: nope");
}

#[tokio::test]
async fn portal_page_found_by_human_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/now/table/sp_page"))
        .and(query_param("sysparm_query", "id=kb_home^ORsys_id=kb_home"))
        .and(query_param("sysparm_limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(result(json!([
            {"sys_id": "p1", "id": "kb_home", "title": "Knowledge Home"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = portal_page::get_portal_page(
        &client,
        portal_page::GetPortalPageInput {
            page_id: "kb_home".to_string(),
        },
    )
    .await;

    assert!(response.success, "{}", response.message);
    assert_eq!(response.message, "Found portal page: Knowledge Home");
    assert_eq!(response.data.unwrap()["sys_id"], json!("p1"));
}

#[tokio::test]
async fn containers_reorder_in_tens() {
    let server = MockServer::start().await;
    for (id, order) in [("c2", 10), ("c1", 20)] {
        Mock::given(method("PATCH"))
            .and(path(format!("/api/now/table/sp_container/{}", id)))
            .and(body_json(json!({ "order": order })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(result(json!({"sys_id": id, "order": order.to_string()}))),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    let input = portal_layout::ReorderPortalContainersInput {
        page_id: "p1".to_string(),
        container_order: vec!["c2".to_string(), "c1".to_string()],
    };
    let response = portal_layout::reorder_portal_containers(&client, input).await;

    assert!(response.success, "{}", response.message);
    assert_eq!(
        response.data.unwrap()["reordered"],
        json!([{"sys_id": "c2", "order": 10}, {"sys_id": "c1", "order": 20}])
    );
}

#[tokio::test]
async fn column_reorder_attempts_every_column() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/now/table/sp_column/c1"))
        .and(body_json(json!({ "order": 1 })))
        .respond_with(ResponseTemplate::new(400).set_body_json(api_error("Invalid order")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/now/table/sp_column/c2"))
        .and(body_json(json!({ "order": 2 })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(result(json!({"sys_id": "c2", "order": "2"}))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let input = portal_layout::ReorderPortalColumnsInput {
        row_id: "r1".to_string(),
        column_order: vec!["c1".to_string(), "c2".to_string()],
    };
    let response = portal_layout::reorder_portal_columns(&client, input).await;

    assert!(!response.success);
    assert!(
        response.message.starts_with("Reorder portal columns failed: only 1 of 2 were reordered"),
        "{}",
        response.message
    );
    let data = response.data.unwrap();
    assert_eq!(data["reordered"], json!([{"sys_id": "c2", "order": 2}]));
    assert_eq!(data["failed"][0]["sys_id"], json!("c1"));
}

#[tokio::test]
async fn rows_reorder_from_one() {
    let server = MockServer::start().await;
    for (id, order) in [("r3", 1), ("r1", 2), ("r2", 3)] {
        Mock::given(method("PATCH"))
            .and(path(format!("/api/now/table/sp_row/{}", id)))
            .and(body_json(json!({ "order": order })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(result(json!({"sys_id": id}))),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    let input = portal_layout::ReorderPortalRowsInput {
        container_id: Some("k1".to_string()),
        column_id: None,
        row_order: vec!["r3".to_string(), "r1".to_string(), "r2".to_string()],
    };
    let response = portal_layout::reorder_portal_rows(&client, input).await;

    assert!(response.success, "{}", response.message);
    assert_eq!(response.message, "Reordered 3 portal rows");
}

#[tokio::test]
async fn atf_step_reorder_stops_at_first_failure() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/now/table/sys_atf_step/s1"))
        .and(body_json(json!({ "order": 100 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(result(json!({"sys_id": "s1"}))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/now/table/sys_atf_step/s2"))
        .respond_with(ResponseTemplate::new(400).set_body_json(api_error("Invalid order")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/now/table/sys_atf_step/s3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let input = atf::ReorderAtfTestStepsInput {
        test_id: "t1".to_string(),
        step_order: vec!["s1".to_string(), "s2".to_string(), "s3".to_string()],
    };
    let response = atf::reorder_atf_test_steps(&client, input).await;

    assert!(!response.success);
    assert!(response.message.starts_with("Reorder ATF test steps failed at s2:"));
    assert_eq!(
        response.data.unwrap()["reordered"],
        json!([{"sys_id": "s1", "order": 100}])
    );
}

#[tokio::test]
async fn clone_copies_raw_values() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/now/table/sysevent_email_template/t1"))
        .and(query_param("sysparm_display_value", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(result(json!({
            "sys_id": "t1",
            "name": "incident.opened",
            "subject": "Incident opened",
            "message_html": "<p>Opened</p>",
            "category": "cat1",
            "active": "true",
            "advanced": "false",
            "content_type": "text/html",
            "sys_class_name": "sysevent_email_template"
        }))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/now/table/sysevent_email_template"))
        .and(body_json(json!({
            "message_html": "<p>Opened</p>",
            "category": "cat1",
            "active": "true",
            "advanced": "false",
            "content_type": "text/html",
            "sys_class_name": "sysevent_email_template",
            "name": "incident.opened.v2",
            "subject": "Incident opened",
            "description": "Cloned from: incident.opened"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(result(json!({
            "sys_id": "t2",
            "name": "incident.opened.v2"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let input = email_template::CloneEmailTemplateInput {
        template_id: "t1".to_string(),
        new_name: "incident.opened.v2".to_string(),
        new_subject: None,
    };
    let response = email_template::clone_email_template(&client, input).await;

    assert!(response.success, "{}", response.message);
    let data = response.data.unwrap();
    assert_eq!(data["sys_id"], json!("t2"));
    assert_eq!(data["cloned_from"], json!("t1"));
}

#[tokio::test]
async fn bulk_update_reports_each_failure() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/now/table/sp_instance/i1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(result(json!({"sys_id": "i1", "active": "false"}))),
        )
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/now/table/sp_instance/i2"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let input = serde_json::from_value(json!({
        "instance_ids": ["i1", "i2"],
        "active": false
    }))
    .unwrap();
    let response = widget_instance::bulk_update_widget_instances(&client, input).await;

    assert!(!response.success);
    let data = response.data.unwrap();
    assert_eq!(data["updated_count"], json!(1));
    assert_eq!(data["failed_count"], json!(1));
    assert_eq!(data["failed"][0]["sys_id"], json!("i2"));
}
