//! Email layout tools (`sys_email_layout`).

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use super::default_limit;
use super::table::{self, copy_fields, Page, TableSpec};
use crate::models::{EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Email layouts.
pub const LAYOUTS: TableSpec = TableSpec {
    table: "sys_email_layout",
    label: "email layout",
    plural: "email layouts",
    collection: "layouts",
    fields: &[
        "sys_id",
        "name",
        "description",
        "layout",
        "advanced",
        "advanced_layout",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "name",
    alternate_key: None,
};

const CLONED_FIELDS: &[&str] = &["description", "layout", "advanced", "advanced_layout"];

/// Input parameters for the create_email_layout tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateEmailLayoutInput {
    /// Name of the layout.
    pub name: String,

    /// HTML layout content.
    pub layout: String,

    /// Description of the layout.
    #[serde(default)]
    pub description: Option<String>,

    /// Whether this is an advanced layout (default: false).
    #[serde(default)]
    pub advanced: bool,

    /// Advanced XML layout content.
    #[serde(default)]
    pub advanced_layout: Option<String>,
}

impl CreateEmailLayoutInput {
    /// Request body for the new layout.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set("name", self.name.as_str())
            .set("layout", self.layout.as_str())
            .set("advanced", self.advanced)
            .set_opt("description", self.description.clone())
            .set_opt("advanced_layout", self.advanced_layout.clone())
    }
}

/// Input parameters for the update_email_layout tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateEmailLayoutInput {
    /// Email layout sys_id.
    pub layout_id: String,

    /// New name.
    #[serde(default)]
    pub name: Option<String>,

    /// New description.
    #[serde(default)]
    pub description: Option<String>,

    /// New HTML layout content.
    #[serde(default)]
    pub layout: Option<String>,

    /// New advanced flag.
    #[serde(default)]
    pub advanced: Option<bool>,

    /// New advanced XML layout content.
    #[serde(default)]
    pub advanced_layout: Option<String>,
}

impl UpdateEmailLayoutInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set_opt("name", self.name.clone())
            .set_opt("description", self.description.clone())
            .set_opt("layout", self.layout.clone())
            .set_opt("advanced", self.advanced)
            .set_opt("advanced_layout", self.advanced_layout.clone())
    }
}

/// Input parameters for the list_email_layouts tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListEmailLayoutsInput {
    /// Maximum number of layouts to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by advanced flag.
    #[serde(default)]
    pub advanced: Option<bool>,

    /// Search text matched against name and description.
    #[serde(default)]
    pub query: Option<String>,
}

/// Input parameters for the get_email_layout tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetEmailLayoutInput {
    /// Email layout sys_id.
    pub layout_id: String,
}

/// Input parameters for the delete_email_layout tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteEmailLayoutInput {
    /// Email layout sys_id.
    pub layout_id: String,
}

/// Input parameters for the clone_email_layout tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CloneEmailLayoutInput {
    /// Source layout sys_id.
    pub layout_id: String,

    /// Name of the new layout.
    pub new_name: String,
}

/// Creates an email layout.
pub async fn create_email_layout(client: &SnowClient, input: CreateEmailLayoutInput) -> ToolResponse {
    table::create(client, &LAYOUTS, input.to_body()).await
}

/// Updates an email layout.
pub async fn update_email_layout(client: &SnowClient, input: UpdateEmailLayoutInput) -> ToolResponse {
    table::update(client, &LAYOUTS, &input.layout_id, input.to_body()).await
}

/// Lists email layouts.
pub async fn list_email_layouts(client: &SnowClient, input: ListEmailLayoutsInput) -> ToolResponse {
    let filter = EncodedQuery::new()
        .flag("advanced", input.advanced)
        .contains_any(&["name", "description"], input.query.as_deref());
    table::list(client, &LAYOUTS, Page::new(input.limit, input.offset), filter).await
}

/// Gets one email layout.
pub async fn get_email_layout(client: &SnowClient, input: GetEmailLayoutInput) -> ToolResponse {
    table::get(client, &LAYOUTS, &input.layout_id).await
}

/// Deletes an email layout.
pub async fn delete_email_layout(client: &SnowClient, input: DeleteEmailLayoutInput) -> ToolResponse {
    table::delete(client, &LAYOUTS, &input.layout_id).await
}

/// Copies an email layout under a new name.
pub async fn clone_email_layout(client: &SnowClient, input: CloneEmailLayoutInput) -> ToolResponse {
    table::clone_record(client, &LAYOUTS, &input.layout_id, |source| {
        Ok(copy_fields(source, CLONED_FIELDS).set("name", input.new_name.as_str()))
    })
    .await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("email_layout")
        .operation(
            "create_email_layout",
            "Create an email layout wrapping notification content in shared HTML.",
        )
        .undocumented("update_email_layout")
        .operation(
            "list_email_layouts",
            "List email layouts, filtered by advanced flag or search text.",
        )
        .undocumented("get_email_layout")
        .undocumented("delete_email_layout")
        .operation(
            "clone_email_layout",
            "Copy an email layout under a new name.",
        )
        .params::<CreateEmailLayoutInput>()
        .params::<UpdateEmailLayoutInput>()
        .params::<ListEmailLayoutsInput>()
        .params::<GetEmailLayoutInput>()
        .params::<DeleteEmailLayoutInput>()
        .params::<CloneEmailLayoutInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn test_create_body() {
        let input: CreateEmailLayoutInput = serde_json::from_value(json!({
            "name": "Branded",
            "layout": "<div>${notification:body}</div>"
        }))
        .unwrap();
        assert_eq!(
            Value::Object(input.to_body().into_record()),
            json!({
                "name": "Branded",
                "layout": "<div>${notification:body}</div>",
                "advanced": false
            })
        );
    }
}
