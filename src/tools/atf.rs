//! Automated Test Framework step tools (`sys_atf_step`).

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use super::table::{self, copy_fields, Page, Sequence, TableSpec};
use super::{default_limit, default_true};
use crate::models::{number, text, EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// ATF test steps.
pub const STEPS: TableSpec = TableSpec {
    table: "sys_atf_step",
    label: "ATF test step",
    plural: "ATF test steps",
    collection: "steps",
    fields: &[
        "sys_id",
        "test",
        "step_config",
        "display_name",
        "description",
        "notes",
        "order",
        "table",
        "timeout",
        "inputs",
        "callable_outputs",
        "active",
        "snapshot",
        "copied_from",
        "warning_message",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "display_name",
    alternate_key: None,
};

/// Fields carried over when a step is cloned.
const CLONED_FIELDS: &[&str] = &[
    "step_config",
    "description",
    "notes",
    "table",
    "timeout",
    "inputs",
    "callable_outputs",
    "active",
    "snapshot",
];

/// Input parameters for the create_atf_test_step tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateAtfTestStepInput {
    /// Test sys_id this step belongs to.
    pub test: String,

    /// Step config sys_id that defines the step type.
    pub step_config: String,

    /// Display name for the test step.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Description of the test step.
    #[serde(default)]
    pub description: Option<String>,

    /// Notes for the test step.
    #[serde(default)]
    pub notes: Option<String>,

    /// Execution order of the step within the test.
    #[serde(default)]
    pub order: Option<i64>,

    /// Target table for the test step.
    #[serde(default)]
    pub table: Option<String>,

    /// Timeout duration for the step (e.g., "30 seconds").
    #[serde(default)]
    pub timeout: Option<String>,

    /// Input variables for the step (JSON format).
    #[serde(default)]
    pub inputs: Option<String>,

    /// Reusable output variables (JSON format).
    #[serde(default)]
    pub callable_outputs: Option<String>,

    /// Whether the test step is active (default: true).
    #[serde(default = "default_true")]
    pub active: bool,

    /// Snapshot sys_id for UI-based steps.
    #[serde(default)]
    pub snapshot: Option<String>,
}

impl CreateAtfTestStepInput {
    /// Request body: required fields, `active`, and the optional fields given.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set("test", self.test.trim())
            .set("step_config", self.step_config.trim())
            .set("active", self.active)
            .set_opt("display_name", self.display_name.clone())
            .set_opt("description", self.description.clone())
            .set_opt("notes", self.notes.clone())
            .set_opt("order", self.order)
            .set_opt("table", self.table.clone())
            .set_opt("timeout", self.timeout.clone())
            .set_opt("inputs", self.inputs.clone())
            .set_opt("callable_outputs", self.callable_outputs.clone())
            .set_opt("snapshot", self.snapshot.clone())
    }
}

/// Input parameters for the update_atf_test_step tool.
///
/// Only the fields provided are changed.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateAtfTestStepInput {
    /// ATF test step sys_id.
    pub step_id: String,

    /// Updated display name.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Updated description.
    #[serde(default)]
    pub description: Option<String>,

    /// Updated notes.
    #[serde(default)]
    pub notes: Option<String>,

    /// Updated execution order.
    #[serde(default)]
    pub order: Option<i64>,

    /// Updated target table.
    #[serde(default)]
    pub table: Option<String>,

    /// Updated timeout duration.
    #[serde(default)]
    pub timeout: Option<String>,

    /// Updated input variables (JSON format).
    #[serde(default)]
    pub inputs: Option<String>,

    /// Updated reusable output variables (JSON format).
    #[serde(default)]
    pub callable_outputs: Option<String>,

    /// Updated active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// Updated snapshot sys_id.
    #[serde(default)]
    pub snapshot: Option<String>,
}

impl UpdateAtfTestStepInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set_opt("display_name", self.display_name.clone())
            .set_opt("description", self.description.clone())
            .set_opt("notes", self.notes.clone())
            .set_opt("order", self.order)
            .set_opt("table", self.table.clone())
            .set_opt("timeout", self.timeout.clone())
            .set_opt("inputs", self.inputs.clone())
            .set_opt("callable_outputs", self.callable_outputs.clone())
            .set_opt("active", self.active)
            .set_opt("snapshot", self.snapshot.clone())
    }
}

/// Input parameters for the list_atf_test_steps tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListAtfTestStepsInput {
    /// Maximum number of steps to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by test sys_id.
    #[serde(default)]
    pub test: Option<String>,

    /// Filter by step config sys_id.
    #[serde(default)]
    pub step_config: Option<String>,

    /// Filter by target table.
    #[serde(default)]
    pub table: Option<String>,

    /// Filter by active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// Search text matched against display name, description and notes.
    #[serde(default)]
    pub query: Option<String>,
}

impl ListAtfTestStepsInput {
    fn filter(&self) -> EncodedQuery {
        EncodedQuery::new()
            .equals_opt("test", self.test.as_deref())
            .equals_opt("step_config", self.step_config.as_deref())
            .equals_opt("table", self.table.as_deref())
            .flag("active", self.active)
            .contains_any(
                &["display_name", "description", "notes"],
                self.query.as_deref(),
            )
    }
}

/// Input parameters for the get_atf_test_step tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetAtfTestStepInput {
    /// ATF test step sys_id.
    pub step_id: String,
}

/// Input parameters for the delete_atf_test_step tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteAtfTestStepInput {
    /// ATF test step sys_id.
    pub step_id: String,
}

/// Input parameters for the clone_atf_test_step tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CloneAtfTestStepInput {
    /// Source test step sys_id to clone.
    pub source_step_id: String,

    /// Target test sys_id (defaults to the source step's test).
    #[serde(default)]
    pub target_test: Option<String>,

    /// Display name for the cloned step (default: "<source> (Copy)").
    #[serde(default)]
    pub new_display_name: Option<String>,

    /// Execution order for the cloned step (default: source order + 1).
    #[serde(default)]
    pub new_order: Option<i64>,
}

/// Input parameters for the reorder_atf_test_steps tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReorderAtfTestStepsInput {
    /// Test sys_id the steps belong to.
    pub test_id: String,

    /// Step sys_ids in the desired execution order.
    pub step_order: Vec<String>,
}

/// Creates an ATF test step.
pub async fn create_atf_test_step(
    client: &SnowClient,
    input: CreateAtfTestStepInput,
) -> ToolResponse {
    table::create(client, &STEPS, input.to_body()).await
}

/// Updates an ATF test step.
pub async fn update_atf_test_step(
    client: &SnowClient,
    input: UpdateAtfTestStepInput,
) -> ToolResponse {
    table::update(client, &STEPS, &input.step_id, input.to_body()).await
}

/// Lists ATF test steps.
pub async fn list_atf_test_steps(
    client: &SnowClient,
    input: ListAtfTestStepsInput,
) -> ToolResponse {
    let page = Page::new(input.limit, input.offset);
    table::list(client, &STEPS, page, input.filter()).await
}

/// Gets one ATF test step.
pub async fn get_atf_test_step(client: &SnowClient, input: GetAtfTestStepInput) -> ToolResponse {
    table::get(client, &STEPS, &input.step_id).await
}

/// Deletes an ATF test step.
pub async fn delete_atf_test_step(
    client: &SnowClient,
    input: DeleteAtfTestStepInput,
) -> ToolResponse {
    table::delete(client, &STEPS, &input.step_id).await
}

/// Clones an ATF test step, optionally into another test.
pub async fn clone_atf_test_step(
    client: &SnowClient,
    input: CloneAtfTestStepInput,
) -> ToolResponse {
    table::clone_record(client, &STEPS, &input.source_step_id, |source| {
        let name = input.new_display_name.clone().unwrap_or_else(|| {
            format!(
                "{} (Copy)",
                text(source, "display_name").unwrap_or_else(|| "Unnamed step".to_string())
            )
        });
        let order = input
            .new_order
            .unwrap_or_else(|| number(source, "order").unwrap_or(0) + 1);

        Ok(copy_fields(source, CLONED_FIELDS)
            .set_opt("test", input.target_test.clone().or_else(|| text(source, "test")))
            .set("display_name", name)
            .set("order", order))
    })
    .await
}

/// Renumbers the steps of a test as 100, 200, 300...
pub async fn reorder_atf_test_steps(
    client: &SnowClient,
    input: ReorderAtfTestStepsInput,
) -> ToolResponse {
    table::reorder(
        client,
        &STEPS,
        Sequence::HUNDREDS,
        &input.test_id,
        &input.step_order,
    )
    .await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("atf")
        .operation(
            "create_atf_test_step",
            "Create an ATF test step. The test and step_config sys_ids are required.",
        )
        .operation(
            "update_atf_test_step",
            "Update fields of an ATF test step. Only the fields provided are changed.",
        )
        .operation(
            "list_atf_test_steps",
            "List ATF test steps, filtered by test, step config, table, active flag or search text.",
        )
        .undocumented("get_atf_test_step")
        .undocumented("delete_atf_test_step")
        .operation(
            "clone_atf_test_step",
            "Copy an ATF test step, optionally into another test. The copy is named '<name> (Copy)' unless a new name is given.",
        )
        .operation(
            "reorder_atf_test_steps",
            "Set the execution order of a test's steps to 100, 200, 300... following the given sys_id list.",
        )
        .params::<CreateAtfTestStepInput>()
        .params::<UpdateAtfTestStepInput>()
        .params::<ListAtfTestStepsInput>()
        .params::<GetAtfTestStepInput>()
        .params::<DeleteAtfTestStepInput>()
        .params::<CloneAtfTestStepInput>()
        .params::<ReorderAtfTestStepsInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_create_body_defaults_active_and_skips_missing() {
        let input: CreateAtfTestStepInput = serde_json::from_value(json!({
            "test": "t1",
            "step_config": "cfg1",
            "order": 300
        }))
        .unwrap();
        let body = input.to_body();
        assert_eq!(
            serde_json::Value::Object(body.into_record()),
            json!({"test": "t1", "step_config": "cfg1", "active": true, "order": 300})
        );
    }

    #[test]
    fn test_update_body_only_given_fields() {
        let input = UpdateAtfTestStepInput {
            step_id: "s1".to_string(),
            notes: Some("flaky".to_string()),
            active: Some(false),
            ..Default::default()
        };
        let body = input.to_body();
        assert_eq!(body.len(), 2);
        assert_eq!(body.get("active"), Some(&json!(false)));
        assert!(body.get("step_id").is_none());
    }

    #[test]
    fn test_list_filter() {
        let input: ListAtfTestStepsInput = serde_json::from_value(json!({
            "test": "t1",
            "active": true,
            "query": "login"
        }))
        .unwrap();
        assert_eq!(input.limit, 10);
        assert_eq!(input.offset, 0);
        assert_eq!(
            input.filter().build().unwrap(),
            "test=t1^active=true^display_nameLIKElogin^ORdescriptionLIKElogin^ORnotesLIKElogin"
        );
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let result: Result<CreateAtfTestStepInput, _> =
            serde_json::from_value(json!({"test": "t1"}));
        assert!(result.is_err());
    }
}
