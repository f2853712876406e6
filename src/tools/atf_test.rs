//! ATF tests (`sys_atf_test`), test runs and their results.

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;
use serde_json::{json, Value};

use super::table::{self, Page, TableSpec};
use super::{default_limit, default_true, failure};
use crate::models::{flatten, text, EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// ATF tests.
pub const TESTS: TableSpec = TableSpec {
    table: "sys_atf_test",
    label: "ATF test",
    plural: "ATF tests",
    collection: "tests",
    fields: &[
        "sys_id",
        "name",
        "description",
        "active",
        "sys_scope",
        "fail_on_server_error",
        "enable_parameterized_testing",
        "copied_from",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "name",
    alternate_key: None,
};

/// Executed test results.
pub const RESULTS: TableSpec = TableSpec {
    table: "sys_atf_test_result",
    label: "ATF test result",
    plural: "ATF test results",
    collection: "results",
    fields: &[
        "sys_id",
        "test",
        "status",
        "start_time",
        "end_time",
        "output",
        "failure_count",
        "error_count",
        "step_count",
    ],
    name_field: "test",
    alternate_key: None,
};

/// Suite results, used to queue a run when the execution endpoint is unavailable.
const SUITE_RESULTS: &str = "sys_atf_test_suite_result";

/// Input parameters for the create_atf_test tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateAtfTestInput {
    /// Name of the ATF test.
    pub name: String,

    /// Description of the ATF test.
    #[serde(default)]
    pub description: Option<String>,

    /// Whether the test is active (default: true).
    #[serde(default = "default_true")]
    pub active: bool,

    /// Scoped application sys_id.
    #[serde(default)]
    pub application: Option<String>,

    /// Fail the test on a server error (default: false).
    #[serde(default)]
    pub fail_on_server_error: bool,

    /// Enable parameterized testing (default: false).
    #[serde(default)]
    pub enable_parameterized_testing: bool,

    /// sys_id of the test this one was copied from.
    #[serde(default)]
    pub copied_from: Option<String>,
}

impl CreateAtfTestInput {
    /// Request body; flags are always sent.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set("name", self.name.as_str())
            .set("active", self.active)
            .set("fail_on_server_error", self.fail_on_server_error)
            .set(
                "enable_parameterized_testing",
                self.enable_parameterized_testing,
            )
            .set_opt("description", self.description.clone())
            .set_opt("sys_scope", self.application.clone())
            .set_opt("copied_from", self.copied_from.clone())
    }
}

/// Input parameters for the update_atf_test tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateAtfTestInput {
    /// ATF test sys_id.
    pub test_id: String,

    /// New name.
    #[serde(default)]
    pub name: Option<String>,

    /// New description.
    #[serde(default)]
    pub description: Option<String>,

    /// New active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// New scoped application sys_id.
    #[serde(default)]
    pub application: Option<String>,

    /// New fail-on-server-error setting.
    #[serde(default)]
    pub fail_on_server_error: Option<bool>,

    /// New parameterized testing setting.
    #[serde(default)]
    pub enable_parameterized_testing: Option<bool>,
}

impl UpdateAtfTestInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set_opt("name", self.name.clone())
            .set_opt("description", self.description.clone())
            .set_opt("active", self.active)
            .set_opt("sys_scope", self.application.clone())
            .set_opt("fail_on_server_error", self.fail_on_server_error)
            .set_opt(
                "enable_parameterized_testing",
                self.enable_parameterized_testing,
            )
    }
}

/// Input parameters for the list_atf_tests tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListAtfTestsInput {
    /// Maximum number of tests to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// Filter by scoped application sys_id.
    #[serde(default)]
    pub application: Option<String>,

    /// Only tests whose name contains this text.
    #[serde(default)]
    pub name_contains: Option<String>,

    /// Additional encoded query.
    #[serde(default)]
    pub query: Option<String>,
}

/// Input parameters for the get_atf_test tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetAtfTestInput {
    /// ATF test sys_id.
    pub test_id: String,
}

/// Input parameters for the delete_atf_test tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteAtfTestInput {
    /// ATF test sys_id.
    pub test_id: String,
}

/// Input parameters for the run_atf_test tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RunAtfTestInput {
    /// ATF test sys_id to execute.
    pub test_id: String,

    /// Test suite sys_id to run the test as part of.
    #[serde(default)]
    pub suite_id: Option<String>,
}

/// Input parameters for the get_atf_test_results tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetAtfTestResultsInput {
    /// Only results of this test.
    #[serde(default)]
    pub test_id: Option<String>,

    /// Only results belonging to this suite result.
    #[serde(default)]
    pub suite_result_id: Option<String>,

    /// Maximum number of results to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,
}

/// Creates an ATF test.
pub async fn create_atf_test(client: &SnowClient, input: CreateAtfTestInput) -> ToolResponse {
    table::create(client, &TESTS, input.to_body()).await
}

/// Updates an ATF test.
pub async fn update_atf_test(client: &SnowClient, input: UpdateAtfTestInput) -> ToolResponse {
    table::update(client, &TESTS, &input.test_id, input.to_body()).await
}

/// Lists ATF tests.
pub async fn list_atf_tests(client: &SnowClient, input: ListAtfTestsInput) -> ToolResponse {
    let filter = EncodedQuery::new()
        .flag("active", input.active)
        .equals_opt("sys_scope", input.application.as_deref())
        .contains("name", input.name_contains.as_deref())
        .raw(input.query.as_deref());
    table::list(client, &TESTS, Page::new(input.limit, input.offset), filter).await
}

/// Gets one ATF test.
pub async fn get_atf_test(client: &SnowClient, input: GetAtfTestInput) -> ToolResponse {
    table::get(client, &TESTS, &input.test_id).await
}

/// Deletes an ATF test.
pub async fn delete_atf_test(client: &SnowClient, input: DeleteAtfTestInput) -> ToolResponse {
    table::delete(client, &TESTS, &input.test_id).await
}

/// Starts a test run.
///
/// The ATF execution endpoint is tried first. When the instance does not
/// accept it, the run is queued as a waiting suite result instead.
pub async fn run_atf_test(client: &SnowClient, input: RunAtfTestInput) -> ToolResponse {
    let test_id = input.test_id.trim();

    match client.execute_atf_test(test_id).await {
        Ok(reply) => {
            tracing::info!(test_id = %test_id, "ATF test execution triggered");
            let status = reply
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or("running")
                .to_string();
            return ToolResponse::ok(
                "ATF test execution triggered",
                json!({
                    "test_id": test_id,
                    "execution_id": reply.get("execution_id").cloned().unwrap_or(Value::Null),
                    "status": status,
                    "response": reply,
                }),
            );
        }
        Err(e) => tracing::debug!(
            test_id = %test_id,
            error = %client.sanitize_error(&e),
            "Execution endpoint refused, queueing a suite result"
        ),
    }

    let body = RecordBody::new()
        .set("test", test_id)
        .set("state", "waiting")
        .set_opt("test_suite", input.suite_id.clone());
    match client.create_record(SUITE_RESULTS, body.as_record()).await {
        Ok(record) => {
            let execution_id = text(&record, "sys_id").unwrap_or_default();
            tracing::info!(test_id = %test_id, execution_id = %execution_id, "ATF test run queued");
            ToolResponse::ok(
                "ATF test execution queued",
                json!({
                    "test_id": test_id,
                    "execution_id": execution_id,
                    "status": text(&record, "state").unwrap_or_else(|| "waiting".to_string()),
                    "response": flatten(&record, &["sys_id", "test", "test_suite", "state"]),
                }),
            )
        }
        Err(e) => failure(client, "Run ATF test", &e),
    }
}

/// Lists results of executed tests.
pub async fn get_atf_test_results(
    client: &SnowClient,
    input: GetAtfTestResultsInput,
) -> ToolResponse {
    let filter = EncodedQuery::new()
        .equals_opt("test", input.test_id.as_deref())
        .equals_opt("parent", input.suite_result_id.as_deref());
    table::list(client, &RESULTS, Page::new(input.limit, input.offset), filter).await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("atf_test")
        .operation(
            "create_atf_test",
            "Create an ATF test, optionally in a scoped application.",
        )
        .undocumented("update_atf_test")
        .operation(
            "list_atf_tests",
            "List ATF tests, filtered by active flag, application or name.",
        )
        .undocumented("get_atf_test")
        .undocumented("delete_atf_test")
        .operation(
            "run_atf_test",
            "Start an ATF test run. Falls back to queueing a suite result when the execution endpoint is unavailable.",
        )
        .operation(
            "get_atf_test_results",
            "List ATF test results for a test or a suite run.",
        )
        .params::<CreateAtfTestInput>()
        .params::<UpdateAtfTestInput>()
        .params::<ListAtfTestsInput>()
        .params::<GetAtfTestInput>()
        .params::<DeleteAtfTestInput>()
        .params::<RunAtfTestInput>()
        .params::<GetAtfTestResultsInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_body_maps_application_to_scope() {
        let input: CreateAtfTestInput =
            serde_json::from_value(json!({"name": "Login works", "application": "app1"})).unwrap();
        assert_eq!(
            Value::Object(input.to_body().into_record()),
            json!({
                "name": "Login works",
                "active": true,
                "fail_on_server_error": false,
                "enable_parameterized_testing": false,
                "sys_scope": "app1"
            })
        );
    }

    #[test]
    fn test_update_body_only_has_changes() {
        let input = UpdateAtfTestInput {
            test_id: "t1".to_string(),
            active: Some(false),
            ..Default::default()
        };
        let body = input.to_body();
        assert_eq!(body.len(), 1);
        assert_eq!(body.get("active"), Some(&json!(false)));
    }
}
