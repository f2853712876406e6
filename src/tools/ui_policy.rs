//! Catalog UI policy tools (`catalog_ui_policy`) and their actions
//! (`catalog_ui_policy_action`).

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use super::table::{self, copy_fields, Page, TableSpec};
use super::{default_limit, default_order};
use crate::models::{EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Catalog UI policies.
pub const POLICIES: TableSpec = TableSpec {
    table: "catalog_ui_policy",
    label: "catalog UI policy",
    plural: "catalog UI policies",
    collection: "policies",
    fields: &[
        "sys_id",
        "sys_name",
        "catalog_item",
        "variable_set",
        "applies_to",
        "description",
        "active",
        "applies_catalog",
        "applies_req_item",
        "applies_sc_task",
        "applies_target_record",
        "catalog_conditions",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "sys_name",
    alternate_key: None,
};

const CLONED_FIELDS: &[&str] = &[
    "catalog_item",
    "variable_set",
    "applies_to",
    "description",
    "active",
    "applies_catalog",
    "applies_req_item",
    "applies_sc_task",
    "applies_target_record",
    "catalog_conditions",
];

/// Variable-level actions of catalog UI policies.
pub const ACTIONS: TableSpec = TableSpec {
    table: "catalog_ui_policy_action",
    label: "catalog UI policy action",
    plural: "catalog UI policy actions",
    collection: "actions",
    fields: &[
        "sys_id",
        "ui_policy",
        "catalog_item",
        "variable_set",
        "catalog_variable",
        "variable",
        "order",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "variable",
    alternate_key: None,
};

const CLONED_ACTION_FIELDS: &[&str] = &[
    "ui_policy",
    "catalog_item",
    "variable_set",
    "catalog_variable",
    "order",
];

/// Input parameters for the create_catalog_ui_policy tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateCatalogUiPolicyInput {
    /// Name of the catalog UI policy.
    pub name: String,

    /// Catalog item sys_id this policy applies to.
    #[serde(default)]
    pub catalog_item: Option<String>,

    /// Variable set sys_id this policy applies to.
    #[serde(default)]
    pub variable_set: Option<String>,

    /// What the policy applies to: "item" (default) or "variable_set".
    #[serde(default)]
    pub applies_to: Option<String>,

    /// Description of the UI policy.
    #[serde(default)]
    pub description: Option<String>,

    /// Whether the UI policy is active (default: true).
    #[serde(default)]
    pub active: Option<bool>,

    /// Applies on a catalog item view (default: true).
    #[serde(default)]
    pub applies_catalog: Option<bool>,

    /// Applies on requested items (default: false).
    #[serde(default)]
    pub applies_req_item: Option<bool>,

    /// Applies on catalog tasks (default: false).
    #[serde(default)]
    pub applies_sc_task: Option<bool>,

    /// Applies on the target record (default: false).
    #[serde(default)]
    pub applies_target_record: Option<bool>,

    /// Catalog conditions (encoded query).
    #[serde(default)]
    pub catalog_conditions: Option<String>,
}

impl CreateCatalogUiPolicyInput {
    /// Request body; the applies/active flags are always sent.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set("sys_name", self.name.as_str())
            .set(
                "applies_to",
                self.applies_to.as_deref().unwrap_or("item"),
            )
            .set("active", self.active.unwrap_or(true))
            .set("applies_catalog", self.applies_catalog.unwrap_or(true))
            .set("applies_req_item", self.applies_req_item.unwrap_or(false))
            .set("applies_sc_task", self.applies_sc_task.unwrap_or(false))
            .set(
                "applies_target_record",
                self.applies_target_record.unwrap_or(false),
            )
            .set_opt("catalog_item", self.catalog_item.clone())
            .set_opt("variable_set", self.variable_set.clone())
            .set_opt("description", self.description.clone())
            .set_opt("catalog_conditions", self.catalog_conditions.clone())
    }
}

/// Input parameters for the update_catalog_ui_policy tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateCatalogUiPolicyInput {
    /// Catalog UI policy sys_id.
    pub policy_id: String,

    /// New name.
    #[serde(default)]
    pub name: Option<String>,

    /// New catalog item sys_id.
    #[serde(default)]
    pub catalog_item: Option<String>,

    /// New variable set sys_id.
    #[serde(default)]
    pub variable_set: Option<String>,

    /// New applies-to value.
    #[serde(default)]
    pub applies_to: Option<String>,

    /// New description.
    #[serde(default)]
    pub description: Option<String>,

    /// New active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// Applies on a catalog item view.
    #[serde(default)]
    pub applies_catalog: Option<bool>,

    /// Applies on requested items.
    #[serde(default)]
    pub applies_req_item: Option<bool>,

    /// Applies on catalog tasks.
    #[serde(default)]
    pub applies_sc_task: Option<bool>,

    /// Applies on the target record.
    #[serde(default)]
    pub applies_target_record: Option<bool>,

    /// New catalog conditions.
    #[serde(default)]
    pub catalog_conditions: Option<String>,
}

impl UpdateCatalogUiPolicyInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set_opt("sys_name", self.name.clone())
            .set_opt("catalog_item", self.catalog_item.clone())
            .set_opt("variable_set", self.variable_set.clone())
            .set_opt("applies_to", self.applies_to.clone())
            .set_opt("description", self.description.clone())
            .set_opt("active", self.active)
            .set_opt("applies_catalog", self.applies_catalog)
            .set_opt("applies_req_item", self.applies_req_item)
            .set_opt("applies_sc_task", self.applies_sc_task)
            .set_opt("applies_target_record", self.applies_target_record)
            .set_opt("catalog_conditions", self.catalog_conditions.clone())
    }
}

/// Input parameters for the list_catalog_ui_policies tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListCatalogUiPoliciesInput {
    /// Maximum number of policies to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// Filter by catalog item sys_id.
    #[serde(default)]
    pub catalog_item: Option<String>,

    /// Filter by applies-to value.
    #[serde(default)]
    pub applies_to: Option<String>,

    /// Search text matched against name and description.
    #[serde(default)]
    pub query: Option<String>,
}

/// Input parameters for the get_catalog_ui_policy tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetCatalogUiPolicyInput {
    /// Catalog UI policy sys_id.
    pub policy_id: String,
}

/// Input parameters for the delete_catalog_ui_policy tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteCatalogUiPolicyInput {
    /// Catalog UI policy sys_id.
    pub policy_id: String,
}

/// Input parameters for the clone_catalog_ui_policy tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CloneCatalogUiPolicyInput {
    /// Source policy sys_id.
    pub policy_id: String,

    /// Name of the new policy.
    pub new_name: String,
}

/// Input parameters for the create_catalog_ui_policy_action tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateCatalogUiPolicyActionInput {
    /// Name of the variable the action controls.
    pub variable: String,

    /// UI policy sys_id the action belongs to.
    #[serde(default)]
    pub ui_policy: Option<String>,

    /// Catalog item sys_id this action applies to.
    #[serde(default)]
    pub catalog_item: Option<String>,

    /// Variable set sys_id this action applies to.
    #[serde(default)]
    pub variable_set: Option<String>,

    /// Catalog variable this action applies to.
    #[serde(default)]
    pub catalog_variable: Option<String>,

    /// Order of execution (default: 100).
    #[serde(default = "default_order")]
    pub order: i64,
}

impl CreateCatalogUiPolicyActionInput {
    /// Request body; order is always sent.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set("variable", self.variable.as_str())
            .set("order", self.order)
            .set_opt("ui_policy", self.ui_policy.clone())
            .set_opt("catalog_item", self.catalog_item.clone())
            .set_opt("variable_set", self.variable_set.clone())
            .set_opt("catalog_variable", self.catalog_variable.clone())
    }
}

/// Input parameters for the update_catalog_ui_policy_action tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateCatalogUiPolicyActionInput {
    /// Catalog UI policy action sys_id.
    pub action_id: String,

    /// New variable name.
    #[serde(default)]
    pub variable: Option<String>,

    /// New catalog item sys_id.
    #[serde(default)]
    pub catalog_item: Option<String>,

    /// New variable set sys_id.
    #[serde(default)]
    pub variable_set: Option<String>,

    /// New catalog variable.
    #[serde(default)]
    pub catalog_variable: Option<String>,

    /// New order of execution.
    #[serde(default)]
    pub order: Option<i64>,
}

impl UpdateCatalogUiPolicyActionInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set_opt("variable", self.variable.clone())
            .set_opt("catalog_item", self.catalog_item.clone())
            .set_opt("variable_set", self.variable_set.clone())
            .set_opt("catalog_variable", self.catalog_variable.clone())
            .set_opt("order", self.order)
    }
}

/// Input parameters for the list_catalog_ui_policy_actions tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListCatalogUiPolicyActionsInput {
    /// Maximum number of actions to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by UI policy sys_id.
    #[serde(default)]
    pub ui_policy: Option<String>,

    /// Filter by catalog item sys_id.
    #[serde(default)]
    pub catalog_item: Option<String>,

    /// Filter by variable set sys_id.
    #[serde(default)]
    pub variable_set: Option<String>,

    /// Only actions whose variable name contains this text.
    #[serde(default)]
    pub variable: Option<String>,

    /// Search text matched against the variable and catalog variable.
    #[serde(default)]
    pub query: Option<String>,
}

/// Input parameters for the get_catalog_ui_policy_action tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetCatalogUiPolicyActionInput {
    /// Catalog UI policy action sys_id.
    pub action_id: String,
}

/// Input parameters for the delete_catalog_ui_policy_action tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteCatalogUiPolicyActionInput {
    /// Catalog UI policy action sys_id.
    pub action_id: String,
}

/// Input parameters for the clone_catalog_ui_policy_action tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CloneCatalogUiPolicyActionInput {
    /// Source action sys_id.
    pub action_id: String,

    /// Variable the copy controls.
    pub new_variable: String,
}

/// Creates a catalog UI policy.
pub async fn create_catalog_ui_policy(
    client: &SnowClient,
    input: CreateCatalogUiPolicyInput,
) -> ToolResponse {
    table::create(client, &POLICIES, input.to_body()).await
}

/// Updates a catalog UI policy.
pub async fn update_catalog_ui_policy(
    client: &SnowClient,
    input: UpdateCatalogUiPolicyInput,
) -> ToolResponse {
    table::update(client, &POLICIES, &input.policy_id, input.to_body()).await
}

/// Lists catalog UI policies.
pub async fn list_catalog_ui_policies(
    client: &SnowClient,
    input: ListCatalogUiPoliciesInput,
) -> ToolResponse {
    let filter = EncodedQuery::new()
        .flag("active", input.active)
        .equals_opt("catalog_item", input.catalog_item.as_deref())
        .equals_opt("applies_to", input.applies_to.as_deref())
        .contains_any(&["sys_name", "description"], input.query.as_deref());
    table::list(client, &POLICIES, Page::new(input.limit, input.offset), filter).await
}

/// Gets one catalog UI policy.
pub async fn get_catalog_ui_policy(
    client: &SnowClient,
    input: GetCatalogUiPolicyInput,
) -> ToolResponse {
    table::get(client, &POLICIES, &input.policy_id).await
}

/// Deletes a catalog UI policy.
pub async fn delete_catalog_ui_policy(
    client: &SnowClient,
    input: DeleteCatalogUiPolicyInput,
) -> ToolResponse {
    table::delete(client, &POLICIES, &input.policy_id).await
}

/// Copies a catalog UI policy under a new name.
pub async fn clone_catalog_ui_policy(
    client: &SnowClient,
    input: CloneCatalogUiPolicyInput,
) -> ToolResponse {
    table::clone_record(client, &POLICIES, &input.policy_id, |source| {
        Ok(copy_fields(source, CLONED_FIELDS).set("sys_name", input.new_name.as_str()))
    })
    .await
}

/// Creates a catalog UI policy action.
pub async fn create_catalog_ui_policy_action(
    client: &SnowClient,
    input: CreateCatalogUiPolicyActionInput,
) -> ToolResponse {
    table::create(client, &ACTIONS, input.to_body()).await
}

/// Updates a catalog UI policy action.
pub async fn update_catalog_ui_policy_action(
    client: &SnowClient,
    input: UpdateCatalogUiPolicyActionInput,
) -> ToolResponse {
    table::update(client, &ACTIONS, &input.action_id, input.to_body()).await
}

/// Lists catalog UI policy actions.
pub async fn list_catalog_ui_policy_actions(
    client: &SnowClient,
    input: ListCatalogUiPolicyActionsInput,
) -> ToolResponse {
    let filter = EncodedQuery::new()
        .equals_opt("ui_policy", input.ui_policy.as_deref())
        .equals_opt("catalog_item", input.catalog_item.as_deref())
        .equals_opt("variable_set", input.variable_set.as_deref())
        .contains("variable", input.variable.as_deref())
        .contains_any(&["variable", "catalog_variable"], input.query.as_deref());
    table::list(client, &ACTIONS, Page::new(input.limit, input.offset), filter).await
}

/// Gets one catalog UI policy action.
pub async fn get_catalog_ui_policy_action(
    client: &SnowClient,
    input: GetCatalogUiPolicyActionInput,
) -> ToolResponse {
    table::get(client, &ACTIONS, &input.action_id).await
}

/// Deletes a catalog UI policy action.
pub async fn delete_catalog_ui_policy_action(
    client: &SnowClient,
    input: DeleteCatalogUiPolicyActionInput,
) -> ToolResponse {
    table::delete(client, &ACTIONS, &input.action_id).await
}

/// Copies a catalog UI policy action onto another variable.
pub async fn clone_catalog_ui_policy_action(
    client: &SnowClient,
    input: CloneCatalogUiPolicyActionInput,
) -> ToolResponse {
    table::clone_record(client, &ACTIONS, &input.action_id, |source| {
        Ok(copy_fields(source, CLONED_ACTION_FIELDS).set("variable", input.new_variable.as_str()))
    })
    .await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("ui_policy")
        .operation(
            "create_catalog_ui_policy",
            "Create a catalog UI policy for a catalog item or variable set.",
        )
        .undocumented("update_catalog_ui_policy")
        .operation(
            "list_catalog_ui_policies",
            "List catalog UI policies, filtered by active flag, catalog item, applies-to or search text.",
        )
        .undocumented("get_catalog_ui_policy")
        .undocumented("delete_catalog_ui_policy")
        .operation(
            "clone_catalog_ui_policy",
            "Copy a catalog UI policy under a new name.",
        )
        .params::<CreateCatalogUiPolicyInput>()
        .params::<UpdateCatalogUiPolicyInput>()
        .params::<ListCatalogUiPoliciesInput>()
        .params::<GetCatalogUiPolicyInput>()
        .params::<DeleteCatalogUiPolicyInput>()
        .operation(
            "create_catalog_ui_policy_action",
            "Create a UI policy action controlling one catalog variable.",
        )
        .undocumented("update_catalog_ui_policy_action")
        .operation(
            "list_catalog_ui_policy_actions",
            "List catalog UI policy actions, filtered by policy, catalog item, variable set or variable.",
        )
        .undocumented("get_catalog_ui_policy_action")
        .undocumented("delete_catalog_ui_policy_action")
        .operation(
            "clone_catalog_ui_policy_action",
            "Copy a catalog UI policy action onto another variable.",
        )
        .params::<CloneCatalogUiPolicyInput>()
        .params::<CreateCatalogUiPolicyActionInput>()
        .params::<UpdateCatalogUiPolicyActionInput>()
        .params::<ListCatalogUiPolicyActionsInput>()
        .params::<GetCatalogUiPolicyActionInput>()
        .params::<DeleteCatalogUiPolicyActionInput>()
        .params::<CloneCatalogUiPolicyActionInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn test_create_body_applies_defaults() {
        let input: CreateCatalogUiPolicyInput =
            serde_json::from_value(json!({"name": "Hide cost center", "catalog_item": "ci1"}))
                .unwrap();
        assert_eq!(
            Value::Object(input.to_body().into_record()),
            json!({
                "sys_name": "Hide cost center",
                "applies_to": "item",
                "active": true,
                "applies_catalog": true,
                "applies_req_item": false,
                "applies_sc_task": false,
                "applies_target_record": false,
                "catalog_item": "ci1"
            })
        );
    }

    #[test]
    fn test_update_renames_via_sys_name() {
        let input = UpdateCatalogUiPolicyInput {
            policy_id: "p1".to_string(),
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        let body = input.to_body();
        assert_eq!(body.len(), 1);
        assert_eq!(body.get("sys_name"), Some(&json!("Renamed")));
    }

    #[test]
    fn test_action_defaults_to_order_100() {
        let input: CreateCatalogUiPolicyActionInput =
            serde_json::from_value(json!({"variable": "cost_center", "ui_policy": "p1"}))
                .unwrap();
        assert_eq!(
            Value::Object(input.to_body().into_record()),
            json!({"variable": "cost_center", "order": 100, "ui_policy": "p1"})
        );
    }
}
