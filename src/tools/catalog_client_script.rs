//! Catalog client script tools (`catalog_script_client`).

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use super::{default_limit, default_true};
use super::table::{self, copy_fields, Page, TableSpec};
use crate::models::{EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Catalog client scripts.
pub const SCRIPTS: TableSpec = TableSpec {
    table: "catalog_script_client",
    label: "catalog client script",
    plural: "catalog client scripts",
    collection: "scripts",
    fields: &[
        "sys_id",
        "name",
        "script",
        "cat_item",
        "variable_set",
        "cat_variable",
        "applies_to",
        "applies_catalog",
        "applies_req_item",
        "applies_sc_task",
        "applies_target_record",
        "va_supported",
        "active",
        "ui_type",
        "type",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "name",
    alternate_key: None,
};

const CLONED_FIELDS: &[&str] = &[
    "script",
    "cat_item",
    "variable_set",
    "cat_variable",
    "applies_to",
    "applies_catalog",
    "applies_req_item",
    "applies_sc_task",
    "applies_target_record",
    "va_supported",
    "active",
    "ui_type",
    "type",
];

/// Input parameters for the create_catalog_client_script tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateCatalogClientScriptInput {
    /// Name of the script.
    pub name: String,

    /// Client script source.
    pub script: String,

    /// Catalog item sys_id the script applies to.
    #[serde(default)]
    pub cat_item: Option<String>,

    /// Variable set sys_id the script applies to.
    #[serde(default)]
    pub variable_set: Option<String>,

    /// Variable the script reacts to (onChange scripts).
    #[serde(default)]
    pub cat_variable: Option<String>,

    /// What the script applies to ("item" or "set").
    #[serde(default)]
    pub applies_to: Option<String>,

    /// Runs on the catalog item view (default: false).
    #[serde(default)]
    pub applies_catalog: bool,

    /// Runs on requested items (default: false).
    #[serde(default)]
    pub applies_req_item: bool,

    /// Runs on catalog tasks (default: false).
    #[serde(default)]
    pub applies_sc_task: bool,

    /// Runs on the target record (default: false).
    #[serde(default)]
    pub applies_target_record: bool,

    /// Supported in Virtual Agent (default: false).
    #[serde(default)]
    pub va_supported: bool,

    /// Whether the script is active (default: true).
    #[serde(default = "default_true")]
    pub active: bool,

    /// UI type ("0" desktop, "1" mobile, "10" all).
    #[serde(default)]
    pub ui_type: Option<String>,

    /// Script type ("onLoad", "onChange", "onSubmit", "onCellEdit").
    #[serde(default, rename = "type")]
    pub script_type: Option<String>,
}

impl CreateCatalogClientScriptInput {
    /// Request body; the applies flags are always sent.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set("name", self.name.as_str())
            .set("script", self.script.as_str())
            .set("active", self.active)
            .set("applies_catalog", self.applies_catalog)
            .set("applies_req_item", self.applies_req_item)
            .set("applies_sc_task", self.applies_sc_task)
            .set("applies_target_record", self.applies_target_record)
            .set("va_supported", self.va_supported)
            .set_opt("cat_item", self.cat_item.clone())
            .set_opt("variable_set", self.variable_set.clone())
            .set_opt("cat_variable", self.cat_variable.clone())
            .set_opt("applies_to", self.applies_to.clone())
            .set_opt("ui_type", self.ui_type.clone())
            .set_opt("type", self.script_type.clone())
    }
}

/// Input parameters for the update_catalog_client_script tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateCatalogClientScriptInput {
    /// Catalog client script sys_id.
    pub script_id: String,

    /// New name.
    #[serde(default)]
    pub name: Option<String>,

    /// New script source.
    #[serde(default)]
    pub script: Option<String>,

    /// New catalog item sys_id.
    #[serde(default)]
    pub cat_item: Option<String>,

    /// New variable set sys_id.
    #[serde(default)]
    pub variable_set: Option<String>,

    /// New variable.
    #[serde(default)]
    pub cat_variable: Option<String>,

    /// New applies-to value.
    #[serde(default)]
    pub applies_to: Option<String>,

    /// Runs on the catalog item view.
    #[serde(default)]
    pub applies_catalog: Option<bool>,

    /// Runs on requested items.
    #[serde(default)]
    pub applies_req_item: Option<bool>,

    /// Runs on catalog tasks.
    #[serde(default)]
    pub applies_sc_task: Option<bool>,

    /// Runs on the target record.
    #[serde(default)]
    pub applies_target_record: Option<bool>,

    /// Supported in Virtual Agent.
    #[serde(default)]
    pub va_supported: Option<bool>,

    /// New active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// New UI type.
    #[serde(default)]
    pub ui_type: Option<String>,

    /// New script type.
    #[serde(default, rename = "type")]
    pub script_type: Option<String>,
}

impl UpdateCatalogClientScriptInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set_opt("name", self.name.clone())
            .set_opt("script", self.script.clone())
            .set_opt("cat_item", self.cat_item.clone())
            .set_opt("variable_set", self.variable_set.clone())
            .set_opt("cat_variable", self.cat_variable.clone())
            .set_opt("applies_to", self.applies_to.clone())
            .set_opt("applies_catalog", self.applies_catalog)
            .set_opt("applies_req_item", self.applies_req_item)
            .set_opt("applies_sc_task", self.applies_sc_task)
            .set_opt("applies_target_record", self.applies_target_record)
            .set_opt("va_supported", self.va_supported)
            .set_opt("active", self.active)
            .set_opt("ui_type", self.ui_type.clone())
            .set_opt("type", self.script_type.clone())
    }
}

/// Input parameters for the list_catalog_client_scripts tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListCatalogClientScriptsInput {
    /// Maximum number of scripts to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by catalog item sys_id.
    #[serde(default)]
    pub cat_item: Option<String>,

    /// Filter by variable set sys_id.
    #[serde(default)]
    pub variable_set: Option<String>,

    /// Only scripts whose variable contains this text.
    #[serde(default)]
    pub cat_variable: Option<String>,

    /// Filter by active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// Search text matched against name and variable.
    #[serde(default)]
    pub query: Option<String>,
}

/// Input parameters for the get_catalog_client_script tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetCatalogClientScriptInput {
    /// Catalog client script sys_id.
    pub script_id: String,
}

/// Input parameters for the delete_catalog_client_script tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteCatalogClientScriptInput {
    /// Catalog client script sys_id.
    pub script_id: String,
}

/// Input parameters for the clone_catalog_client_script tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CloneCatalogClientScriptInput {
    /// Source script sys_id.
    pub script_id: String,

    /// Name of the new script.
    pub new_name: String,
}

/// Creates a catalog client script.
pub async fn create_catalog_client_script(
    client: &SnowClient,
    input: CreateCatalogClientScriptInput,
) -> ToolResponse {
    table::create(client, &SCRIPTS, input.to_body()).await
}

/// Updates a catalog client script.
pub async fn update_catalog_client_script(
    client: &SnowClient,
    input: UpdateCatalogClientScriptInput,
) -> ToolResponse {
    table::update(client, &SCRIPTS, &input.script_id, input.to_body()).await
}

/// Lists catalog client scripts.
pub async fn list_catalog_client_scripts(
    client: &SnowClient,
    input: ListCatalogClientScriptsInput,
) -> ToolResponse {
    let filter = EncodedQuery::new()
        .equals_opt("cat_item", input.cat_item.as_deref())
        .equals_opt("variable_set", input.variable_set.as_deref())
        .contains("cat_variable", input.cat_variable.as_deref())
        .flag("active", input.active)
        .contains_any(&["name", "cat_variable"], input.query.as_deref());
    table::list(client, &SCRIPTS, Page::new(input.limit, input.offset), filter).await
}

/// Gets one catalog client script, including its source.
pub async fn get_catalog_client_script(
    client: &SnowClient,
    input: GetCatalogClientScriptInput,
) -> ToolResponse {
    table::get(client, &SCRIPTS, &input.script_id).await
}

/// Deletes a catalog client script.
pub async fn delete_catalog_client_script(
    client: &SnowClient,
    input: DeleteCatalogClientScriptInput,
) -> ToolResponse {
    table::delete(client, &SCRIPTS, &input.script_id).await
}

/// Copies a catalog client script under a new name.
pub async fn clone_catalog_client_script(
    client: &SnowClient,
    input: CloneCatalogClientScriptInput,
) -> ToolResponse {
    table::clone_record(client, &SCRIPTS, &input.script_id, |source| {
        Ok(copy_fields(source, CLONED_FIELDS).set("name", input.new_name.as_str()))
    })
    .await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("catalog_client_script")
        .operation(
            "create_catalog_client_script",
            "Create a catalog client script (onLoad, onChange, onSubmit) for a catalog item or variable set.",
        )
        .undocumented("update_catalog_client_script")
        .operation(
            "list_catalog_client_scripts",
            "List catalog client scripts, filtered by catalog item, variable set, variable, active flag or search text.",
        )
        .undocumented("get_catalog_client_script")
        .undocumented("delete_catalog_client_script")
        .operation(
            "clone_catalog_client_script",
            "Copy a catalog client script under a new name.",
        )
        .params::<CreateCatalogClientScriptInput>()
        .params::<UpdateCatalogClientScriptInput>()
        .params::<ListCatalogClientScriptsInput>()
        .params::<GetCatalogClientScriptInput>()
        .params::<DeleteCatalogClientScriptInput>()
        .params::<CloneCatalogClientScriptInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn test_create_body_sends_flags() {
        let input: CreateCatalogClientScriptInput = serde_json::from_value(json!({
            "name": "Require justification",
            "script": "function onLoad() {}",
            "cat_item": "ci1",
            "type": "onLoad"
        }))
        .unwrap();
        assert_eq!(
            Value::Object(input.to_body().into_record()),
            json!({
                "name": "Require justification",
                "script": "function onLoad() {}",
                "active": true,
                "applies_catalog": false,
                "applies_req_item": false,
                "applies_sc_task": false,
                "applies_target_record": false,
                "va_supported": false,
                "cat_item": "ci1",
                "type": "onLoad"
            })
        );
    }

    #[test]
    fn test_update_script_only() {
        let input = UpdateCatalogClientScriptInput {
            script_id: "s1".to_string(),
            script: Some("function onSubmit() { return true; }".to_string()),
            ..Default::default()
        };
        let body = input.to_body();
        assert_eq!(body.len(), 1);
        assert!(body.get("script").is_some());
    }
}
