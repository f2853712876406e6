//! Assignment rules (`sysrule_assignment`).

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use super::table::{self, Page, TableSpec};
use super::{default_limit, default_true};
use crate::models::{EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Assignment rules.
pub const ASSIGNMENT_RULES: TableSpec = TableSpec {
    table: "sysrule_assignment",
    label: "assignment rule",
    plural: "assignment rules",
    collection: "rules",
    fields: &[
        "sys_id",
        "name",
        "table",
        "script",
        "condition",
        "order",
        "active",
        "description",
        "inherited",
        "when_to_apply",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "name",
    alternate_key: None,
};

fn default_when_to_apply() -> String {
    "async".to_string()
}

/// Input parameters for the create_assignment_rule tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateAssignmentRuleInput {
    /// Rule name.
    pub name: String,

    /// Table the rule applies to.
    pub table: String,

    /// Script deciding the assignment.
    pub script: String,

    /// Condition (encoded query) for when the rule applies.
    #[serde(default)]
    pub condition: Option<String>,

    /// Execution order; lower runs first.
    #[serde(default)]
    pub order: Option<i64>,

    /// Whether the rule is active (default: true).
    #[serde(default = "default_true")]
    pub active: bool,

    /// Description of the rule.
    #[serde(default)]
    pub description: Option<String>,

    /// Whether the rule also applies to extended tables (default: false).
    #[serde(default)]
    pub inherited: bool,

    /// When to apply the rule: "async" (default), "sync" or "both".
    #[serde(default = "default_when_to_apply")]
    pub when_to_apply: String,
}

impl CreateAssignmentRuleInput {
    /// Request body; flags are always sent.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set("name", self.name.as_str())
            .set("table", self.table.trim())
            .set("script", self.script.as_str())
            .set("active", self.active)
            .set("inherited", self.inherited)
            .set("when_to_apply", self.when_to_apply.as_str())
            .set_opt("condition", self.condition.clone())
            .set_opt("order", self.order)
            .set_opt("description", self.description.clone())
    }
}

/// Input parameters for the update_assignment_rule tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateAssignmentRuleInput {
    /// Assignment rule sys_id.
    pub rule_id: String,

    /// New name.
    #[serde(default)]
    pub name: Option<String>,

    /// New table.
    #[serde(default)]
    pub table: Option<String>,

    /// New script.
    #[serde(default)]
    pub script: Option<String>,

    /// New condition.
    #[serde(default)]
    pub condition: Option<String>,

    /// New order.
    #[serde(default)]
    pub order: Option<i64>,

    /// New active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// New description.
    #[serde(default)]
    pub description: Option<String>,

    /// New inherited setting.
    #[serde(default)]
    pub inherited: Option<bool>,

    /// New when-to-apply setting.
    #[serde(default)]
    pub when_to_apply: Option<String>,
}

impl UpdateAssignmentRuleInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set_opt("name", self.name.clone())
            .set_opt("table", self.table.clone())
            .set_opt("script", self.script.clone())
            .set_opt("condition", self.condition.clone())
            .set_opt("order", self.order)
            .set_opt("active", self.active)
            .set_opt("description", self.description.clone())
            .set_opt("inherited", self.inherited)
            .set_opt("when_to_apply", self.when_to_apply.clone())
    }
}

/// Input parameters for the list_assignment_rules tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListAssignmentRulesInput {
    /// Maximum number of rules to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by table.
    #[serde(default)]
    pub table: Option<String>,

    /// Filter by active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// Filter by inherited setting.
    #[serde(default)]
    pub inherited: Option<bool>,

    /// Filter by when-to-apply setting.
    #[serde(default)]
    pub when_to_apply: Option<String>,

    /// Additional encoded query.
    #[serde(default)]
    pub query: Option<String>,
}

impl ListAssignmentRulesInput {
    fn filter(&self) -> EncodedQuery {
        EncodedQuery::new()
            .equals_opt("table", self.table.as_deref())
            .flag("active", self.active)
            .flag("inherited", self.inherited)
            .equals_opt("when_to_apply", self.when_to_apply.as_deref())
            .raw(self.query.as_deref())
    }
}

/// Input parameters for the get_assignment_rule tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetAssignmentRuleInput {
    /// Assignment rule sys_id.
    pub rule_id: String,
}

/// Input parameters for the delete_assignment_rule tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteAssignmentRuleInput {
    /// Assignment rule sys_id.
    pub rule_id: String,
}

/// Creates an assignment rule.
pub async fn create_assignment_rule(
    client: &SnowClient,
    input: CreateAssignmentRuleInput,
) -> ToolResponse {
    table::create(client, &ASSIGNMENT_RULES, input.to_body()).await
}

/// Updates an assignment rule.
pub async fn update_assignment_rule(
    client: &SnowClient,
    input: UpdateAssignmentRuleInput,
) -> ToolResponse {
    table::update(client, &ASSIGNMENT_RULES, &input.rule_id, input.to_body()).await
}

/// Lists assignment rules.
pub async fn list_assignment_rules(
    client: &SnowClient,
    input: ListAssignmentRulesInput,
) -> ToolResponse {
    let page = Page::new(input.limit, input.offset);
    table::list(client, &ASSIGNMENT_RULES, page, input.filter()).await
}

/// Gets one assignment rule.
pub async fn get_assignment_rule(
    client: &SnowClient,
    input: GetAssignmentRuleInput,
) -> ToolResponse {
    table::get(client, &ASSIGNMENT_RULES, &input.rule_id).await
}

/// Deletes an assignment rule.
pub async fn delete_assignment_rule(
    client: &SnowClient,
    input: DeleteAssignmentRuleInput,
) -> ToolResponse {
    table::delete(client, &ASSIGNMENT_RULES, &input.rule_id).await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("assignment_rule")
        .operation(
            "create_assignment_rule",
            "Create an assignment rule that routes records of a table to a group or user by script.",
        )
        .undocumented("update_assignment_rule")
        .operation(
            "list_assignment_rules",
            "List assignment rules, filtered by table, active flag, inheritance or timing.",
        )
        .undocumented("get_assignment_rule")
        .undocumented("delete_assignment_rule")
        .params::<CreateAssignmentRuleInput>()
        .params::<UpdateAssignmentRuleInput>()
        .params::<ListAssignmentRulesInput>()
        .params::<GetAssignmentRuleInput>()
        .params::<DeleteAssignmentRuleInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn test_create_defaults_to_async_rule() {
        let input: CreateAssignmentRuleInput = serde_json::from_value(json!({
            "name": "Network to NetOps",
            "table": "incident",
            "script": "current.assignment_group = 'netops';"
        }))
        .unwrap();
        assert_eq!(
            Value::Object(input.to_body().into_record()),
            json!({
                "name": "Network to NetOps",
                "table": "incident",
                "script": "current.assignment_group = 'netops';",
                "active": true,
                "inherited": false,
                "when_to_apply": "async"
            })
        );
    }

    #[test]
    fn test_list_filter_writes_flags_as_booleans() {
        let input: ListAssignmentRulesInput =
            serde_json::from_value(json!({"active": false, "when_to_apply": "sync"})).unwrap();
        assert_eq!(
            input.filter().build().as_deref(),
            Some("active=false^when_to_apply=sync")
        );
    }
}
