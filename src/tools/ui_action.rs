//! UI action tools (`sys_ui_action`): form buttons, list banners and
//! context menu entries.

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use super::table::{self, Page, TableSpec};
use super::{default_limit, default_order, default_true};
use crate::models::{EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// UI actions.
pub const UI_ACTIONS: TableSpec = TableSpec {
    table: "sys_ui_action",
    label: "UI action",
    plural: "UI actions",
    collection: "ui_actions",
    fields: &[
        "sys_id",
        "name",
        "table",
        "action_name",
        "script",
        "condition",
        "onclick",
        "form_button",
        "list_banner_button",
        "list_choice",
        "list_context_menu",
        "active",
        "order",
        "hint",
        "client",
        "isolate_script",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "name",
    alternate_key: None,
};

/// Input parameters for the create_ui_action tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateUiActionInput {
    /// Name (button label) of the UI action.
    pub name: String,

    /// Table the action appears on.
    pub table: String,

    /// Action name, used to reference the action from scripts.
    pub action_name: String,

    /// Script run by the action.
    pub script: String,

    /// Condition controlling when the action is shown.
    #[serde(default)]
    pub condition: Option<String>,

    /// Client-side onclick function call.
    #[serde(default)]
    pub onclick: Option<String>,

    /// Show as a form button (default: true).
    #[serde(default = "default_true")]
    pub form_button: bool,

    /// Show as a list banner button (default: false).
    #[serde(default)]
    pub list_banner_button: bool,

    /// Show in the list choice menu (default: false).
    #[serde(default)]
    pub list_choice: bool,

    /// Show in the list context menu (default: false).
    #[serde(default)]
    pub list_context_menu: bool,

    /// Whether the action is active (default: true).
    #[serde(default = "default_true")]
    pub active: bool,

    /// Order among the table's actions (default: 100).
    #[serde(default = "default_order")]
    pub order: i64,

    /// Tooltip text.
    #[serde(default)]
    pub hint: Option<String>,

    /// Runs on the client (default: true).
    #[serde(default = "default_true")]
    pub client: bool,

    /// Runs the client script isolated from the page (default: true).
    #[serde(default = "default_true")]
    pub isolate_script: bool,
}

impl CreateUiActionInput {
    /// Request body; placement and runtime flags are always sent.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set("name", self.name.as_str())
            .set("table", self.table.trim())
            .set("action_name", self.action_name.as_str())
            .set("script", self.script.as_str())
            .set("form_button", self.form_button)
            .set("list_banner_button", self.list_banner_button)
            .set("list_choice", self.list_choice)
            .set("list_context_menu", self.list_context_menu)
            .set("active", self.active)
            .set("order", self.order)
            .set("client", self.client)
            .set("isolate_script", self.isolate_script)
            .set_opt("condition", self.condition.clone())
            .set_opt("onclick", self.onclick.clone())
            .set_opt("hint", self.hint.clone())
    }
}

/// Input parameters for the update_ui_action tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateUiActionInput {
    /// UI action sys_id.
    pub ui_action_id: String,

    /// New name.
    #[serde(default)]
    pub name: Option<String>,

    /// New action name.
    #[serde(default)]
    pub action_name: Option<String>,

    /// New script.
    #[serde(default)]
    pub script: Option<String>,

    /// New condition.
    #[serde(default)]
    pub condition: Option<String>,

    /// New onclick call.
    #[serde(default)]
    pub onclick: Option<String>,

    /// Show as a form button.
    #[serde(default)]
    pub form_button: Option<bool>,

    /// Show as a list banner button.
    #[serde(default)]
    pub list_banner_button: Option<bool>,

    /// Show in the list choice menu.
    #[serde(default)]
    pub list_choice: Option<bool>,

    /// Show in the list context menu.
    #[serde(default)]
    pub list_context_menu: Option<bool>,

    /// New active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// New order.
    #[serde(default)]
    pub order: Option<i64>,

    /// New tooltip text.
    #[serde(default)]
    pub hint: Option<String>,

    /// Runs on the client.
    #[serde(default)]
    pub client: Option<bool>,

    /// Runs the client script isolated.
    #[serde(default)]
    pub isolate_script: Option<bool>,
}

impl UpdateUiActionInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set_opt("name", self.name.clone())
            .set_opt("action_name", self.action_name.clone())
            .set_opt("script", self.script.clone())
            .set_opt("condition", self.condition.clone())
            .set_opt("onclick", self.onclick.clone())
            .set_opt("form_button", self.form_button)
            .set_opt("list_banner_button", self.list_banner_button)
            .set_opt("list_choice", self.list_choice)
            .set_opt("list_context_menu", self.list_context_menu)
            .set_opt("active", self.active)
            .set_opt("order", self.order)
            .set_opt("hint", self.hint.clone())
            .set_opt("client", self.client)
            .set_opt("isolate_script", self.isolate_script)
    }
}

/// Input parameters for the list_ui_actions tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListUiActionsInput {
    /// Maximum number of UI actions to return (default: 10).
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

    /// Search text matched against name, action name and table.
    #[serde(default)]
    pub query: Option<String>,
}

/// Input parameters for the get_ui_action tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetUiActionInput {
    /// UI action sys_id.
    pub ui_action_id: String,
}

/// Input parameters for the delete_ui_action tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteUiActionInput {
    /// UI action sys_id.
    pub ui_action_id: String,
}

/// Creates a UI action.
pub async fn create_ui_action(client: &SnowClient, input: CreateUiActionInput) -> ToolResponse {
    table::create(client, &UI_ACTIONS, input.to_body()).await
}

/// Updates a UI action.
pub async fn update_ui_action(client: &SnowClient, input: UpdateUiActionInput) -> ToolResponse {
    table::update(client, &UI_ACTIONS, &input.ui_action_id, input.to_body()).await
}

/// Lists UI actions.
pub async fn list_ui_actions(client: &SnowClient, input: ListUiActionsInput) -> ToolResponse {
    let filter = EncodedQuery::new()
        .equals_opt("table", input.table.as_deref())
        .flag("active", input.active)
        .contains_any(&["name", "action_name", "table"], input.query.as_deref());
    table::list(client, &UI_ACTIONS, Page::new(input.limit, input.offset), filter).await
}

/// Gets one UI action.
pub async fn get_ui_action(client: &SnowClient, input: GetUiActionInput) -> ToolResponse {
    table::get(client, &UI_ACTIONS, &input.ui_action_id).await
}

/// Deletes a UI action.
pub async fn delete_ui_action(client: &SnowClient, input: DeleteUiActionInput) -> ToolResponse {
    table::delete(client, &UI_ACTIONS, &input.ui_action_id).await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("ui_action")
        .operation(
            "create_ui_action",
            "Create a UI action (form button, list banner button or context menu entry) on a table.",
        )
        .undocumented("update_ui_action")
        .operation(
            "list_ui_actions",
            "List UI actions, filtered by table, active flag or search text.",
        )
        .undocumented("get_ui_action")
        .undocumented("delete_ui_action")
        .params::<CreateUiActionInput>()
        .params::<UpdateUiActionInput>()
        .params::<ListUiActionsInput>()
        .params::<GetUiActionInput>()
        .params::<DeleteUiActionInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_create_defaults_to_client_form_button() {
        let input: CreateUiActionInput = serde_json::from_value(json!({
            "name": "Escalate",
            "table": "incident",
            "action_name": "escalate_incident",
            "script": "escalate();"
        }))
        .unwrap();
        let body = input.to_body();
        assert_eq!(body.get("form_button"), Some(&json!(true)));
        assert_eq!(body.get("list_banner_button"), Some(&json!(false)));
        assert_eq!(body.get("client"), Some(&json!(true)));
        assert_eq!(body.get("isolate_script"), Some(&json!(true)));
        assert_eq!(body.get("order"), Some(&json!(100)));
        assert!(body.get("hint").is_none());
    }
}
