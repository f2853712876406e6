//! Inbound email actions (`sysevent_in_email_action`).
//!
//! The sender reference is stored in the `from` column; inputs call it
//! `from_user`.

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use super::table::{self, Page, TableSpec};
use super::{default_limit, default_true};
use crate::models::{EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Inbound email actions.
pub const INBOUND_ACTIONS: TableSpec = TableSpec {
    table: "sysevent_in_email_action",
    label: "inbound email action",
    plural: "inbound email actions",
    collection: "email_actions",
    fields: &[
        "sys_id",
        "name",
        "action",
        "active",
        "type",
        "table",
        "event_name",
        "stop_processing",
        "condition_script",
        "filter_condition",
        "script",
        "template",
        "from",
        "assignment_operator",
        "required_roles",
        "reply_email",
        "description",
        "order",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "name",
    alternate_key: None,
};

fn default_email_type() -> String {
    "new".to_string()
}

fn default_event_name() -> String {
    "email.read".to_string()
}

/// Settings shared by create and update.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct EmailActionDetails {
    /// Target table for the action.
    #[serde(default)]
    pub table: Option<String>,

    /// Script deciding whether the action runs.
    #[serde(default)]
    pub condition_script: Option<String>,

    /// Filter condition on the incoming email.
    #[serde(default)]
    pub filter_condition: Option<String>,

    /// Script run by the action.
    #[serde(default)]
    pub script: Option<String>,

    /// Field actions template.
    #[serde(default)]
    pub template: Option<String>,

    /// Sender user sys_id.
    #[serde(default)]
    pub from_user: Option<String>,

    /// Assignment operator.
    #[serde(default)]
    pub assignment_operator: Option<String>,

    /// Roles required to run the action.
    #[serde(default)]
    pub required_roles: Option<String>,

    /// Reply email HTML, for reply actions.
    #[serde(default)]
    pub reply_email: Option<String>,

    /// Description of the action.
    #[serde(default)]
    pub description: Option<String>,

    /// Execution order.
    #[serde(default)]
    pub order: Option<i64>,
}

impl EmailActionDetails {
    fn apply(&self, body: RecordBody) -> RecordBody {
        body.set_opt("table", self.table.clone())
            .set_opt("condition_script", self.condition_script.clone())
            .set_opt("filter_condition", self.filter_condition.clone())
            .set_opt("script", self.script.clone())
            .set_opt("template", self.template.clone())
            .set_opt("from", self.from_user.clone())
            .set_opt("assignment_operator", self.assignment_operator.clone())
            .set_opt("required_roles", self.required_roles.clone())
            .set_opt("reply_email", self.reply_email.clone())
            .set_opt("description", self.description.clone())
            .set_opt("order", self.order)
    }
}

/// Input parameters for the create_inbound_email_action tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateInboundEmailActionInput {
    /// Action name.
    pub name: String,

    /// Action type ("record_action", "reply_email"...).
    pub action: String,

    /// Whether the action is active (default: true).
    #[serde(default = "default_true")]
    pub active: bool,

    /// Email type: "new" (default), "reply" or "forward".
    #[serde(default = "default_email_type", rename = "type")]
    pub email_type: String,

    /// Triggering event (default: "email.read").
    #[serde(default = "default_event_name")]
    pub event_name: String,

    /// Stop processing later actions (default: false).
    #[serde(default)]
    pub stop_processing: bool,

    #[serde(flatten)]
    pub details: EmailActionDetails,
}

impl CreateInboundEmailActionInput {
    /// Request body; type, event and flags are always sent.
    pub fn to_body(&self) -> RecordBody {
        let body = RecordBody::new()
            .set("name", self.name.as_str())
            .set("action", self.action.as_str())
            .set("active", self.active)
            .set("type", self.email_type.as_str())
            .set("event_name", self.event_name.as_str())
            .set("stop_processing", self.stop_processing);
        self.details.apply(body)
    }
}

/// Input parameters for the update_inbound_email_action tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateInboundEmailActionInput {
    /// Inbound email action sys_id.
    pub action_id: String,

    /// New name.
    #[serde(default)]
    pub name: Option<String>,

    /// New action type.
    #[serde(default)]
    pub action: Option<String>,

    /// New active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// New email type.
    #[serde(default, rename = "type")]
    pub email_type: Option<String>,

    /// New triggering event.
    #[serde(default)]
    pub event_name: Option<String>,

    /// New stop processing flag.
    #[serde(default)]
    pub stop_processing: Option<bool>,

    #[serde(flatten)]
    pub details: EmailActionDetails,
}

impl UpdateInboundEmailActionInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        let body = RecordBody::new()
            .set_opt("name", self.name.clone())
            .set_opt("action", self.action.clone())
            .set_opt("active", self.active)
            .set_opt("type", self.email_type.clone())
            .set_opt("event_name", self.event_name.clone())
            .set_opt("stop_processing", self.stop_processing);
        self.details.apply(body)
    }
}

/// Input parameters for the list_inbound_email_actions tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListInboundEmailActionsInput {
    /// Maximum number of actions to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// Filter by action type.
    #[serde(default)]
    pub action: Option<String>,

    /// Filter by email type.
    #[serde(default, rename = "type")]
    pub email_type: Option<String>,

    /// Filter by target table.
    #[serde(default)]
    pub table: Option<String>,

    /// Filter by triggering event.
    #[serde(default)]
    pub event_name: Option<String>,

    /// Search text matched against name and description.
    #[serde(default)]
    pub query: Option<String>,
}

impl ListInboundEmailActionsInput {
    fn filter(&self) -> EncodedQuery {
        EncodedQuery::new()
            .flag("active", self.active)
            .equals_opt("action", self.action.as_deref())
            .equals_opt("type", self.email_type.as_deref())
            .equals_opt("table", self.table.as_deref())
            .equals_opt("event_name", self.event_name.as_deref())
            .contains_any(&["name", "description"], self.query.as_deref())
    }
}

/// Input parameters for the get_inbound_email_action tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetInboundEmailActionInput {
    /// Inbound email action sys_id.
    pub action_id: String,
}

/// Input parameters for the delete_inbound_email_action tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteInboundEmailActionInput {
    /// Inbound email action sys_id.
    pub action_id: String,
}

/// Creates an inbound email action.
pub async fn create_inbound_email_action(
    client: &SnowClient,
    input: CreateInboundEmailActionInput,
) -> ToolResponse {
    table::create(client, &INBOUND_ACTIONS, input.to_body()).await
}

/// Updates an inbound email action.
pub async fn update_inbound_email_action(
    client: &SnowClient,
    input: UpdateInboundEmailActionInput,
) -> ToolResponse {
    table::update(client, &INBOUND_ACTIONS, &input.action_id, input.to_body()).await
}

/// Lists inbound email actions.
pub async fn list_inbound_email_actions(
    client: &SnowClient,
    input: ListInboundEmailActionsInput,
) -> ToolResponse {
    let page = Page::new(input.limit, input.offset);
    table::list(client, &INBOUND_ACTIONS, page, input.filter()).await
}

/// Gets one inbound email action.
pub async fn get_inbound_email_action(
    client: &SnowClient,
    input: GetInboundEmailActionInput,
) -> ToolResponse {
    table::get(client, &INBOUND_ACTIONS, &input.action_id).await
}

/// Deletes an inbound email action.
pub async fn delete_inbound_email_action(
    client: &SnowClient,
    input: DeleteInboundEmailActionInput,
) -> ToolResponse {
    table::delete(client, &INBOUND_ACTIONS, &input.action_id).await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("inbound_email")
        .operation(
            "create_inbound_email_action",
            "Create an inbound email action that processes incoming mail into records or replies.",
        )
        .operation(
            "update_inbound_email_action",
            "Update an inbound email action.",
        )
        .operation(
            "list_inbound_email_actions",
            "List inbound email actions, filtered by type, table, event or search text.",
        )
        .undocumented("get_inbound_email_action")
        .undocumented("delete_inbound_email_action")
        .params::<CreateInboundEmailActionInput>()
        .params::<UpdateInboundEmailActionInput>()
        .params::<ListInboundEmailActionsInput>()
        .params::<GetInboundEmailActionInput>()
        .params::<DeleteInboundEmailActionInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_from_user_is_stored_as_from() {
        let input: CreateInboundEmailActionInput = serde_json::from_value(json!({
            "name": "Create incident",
            "action": "record_action",
            "table": "incident",
            "from_user": "u-123"
        }))
        .unwrap();
        let body = input.to_body();
        assert_eq!(body.get("from"), Some(&json!("u-123")));
        assert!(body.get("from_user").is_none());
        assert_eq!(body.get("type"), Some(&json!("new")));
        assert_eq!(body.get("event_name"), Some(&json!("email.read")));
        assert_eq!(body.get("stop_processing"), Some(&json!(false)));
    }

    #[test]
    fn test_update_sends_only_given_fields() {
        let input: UpdateInboundEmailActionInput =
            serde_json::from_value(json!({"action_id": "a1", "type": "reply"})).unwrap();
        assert_eq!(input.to_body().len(), 1);
    }
}
