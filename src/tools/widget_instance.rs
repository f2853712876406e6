//! Widget instance tools (`sp_instance`): widgets placed in portal columns.

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use super::table::{self, copy_fields, Page, TableSpec};
use super::{default_limit, default_true};
use crate::models::{text, EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Widget instances.
pub const INSTANCES: TableSpec = TableSpec {
    table: "sp_instance",
    label: "widget instance",
    plural: "widget instances",
    collection: "instances",
    fields: &[
        "sys_id",
        "sp_widget",
        "sp_column",
        "title",
        "short_description",
        "order",
        "active",
        "id",
        "widget_parameters",
        "class_name",
        "color",
        "size",
        "glyph",
        "css",
        "url",
        "roles",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "title",
    alternate_key: None,
};

/// Fields carried over to a clone besides the overridable ones.
const CLONED_FIELDS: &[&str] = &[
    "sp_widget",
    "short_description",
    "order",
    "active",
    "class_name",
    "color",
    "size",
    "glyph",
    "css",
    "url",
    "roles",
];

fn default_order() -> i64 {
    1
}

fn default_color() -> String {
    "default".to_string()
}

fn default_size() -> String {
    "md".to_string()
}

/// Input parameters for the create_widget_instance tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateWidgetInstanceInput {
    /// Widget sys_id to place.
    pub sp_widget: String,

    /// Column sys_id to place the widget in.
    #[serde(default)]
    pub sp_column: Option<String>,

    /// Instance title.
    #[serde(default)]
    pub title: Option<String>,

    /// Short description.
    #[serde(default)]
    pub short_description: Option<String>,

    /// Order within the column (default: 1).
    #[serde(default = "default_order")]
    pub order: i64,

    /// Whether the instance is active (default: true).
    #[serde(default = "default_true")]
    pub active: bool,

    /// Instance id, unique within the portal.
    #[serde(default)]
    pub id: Option<String>,

    /// Widget options as a JSON string.
    #[serde(default)]
    pub widget_parameters: Option<String>,

    /// CSS class name.
    #[serde(default)]
    pub class_name: Option<String>,

    /// Bootstrap color (default: "default").
    #[serde(default = "default_color")]
    pub color: String,

    /// Size (default: "md").
    #[serde(default = "default_size")]
    pub size: String,

    /// Glyph icon name.
    #[serde(default)]
    pub glyph: Option<String>,

    /// Instance CSS.
    #[serde(default)]
    pub css: Option<String>,

    /// Link URL.
    #[serde(default)]
    pub url: Option<String>,

    /// Roles required to see the instance.
    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

impl CreateWidgetInstanceInput {
    /// Request body for the new instance.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set("sp_widget", self.sp_widget.trim())
            .set("order", self.order)
            .set("active", self.active)
            .set("color", self.color.as_str())
            .set("size", self.size.as_str())
            .set_opt("sp_column", self.sp_column.clone())
            .set_opt("title", self.title.clone())
            .set_opt("short_description", self.short_description.clone())
            .set_opt("id", self.id.clone())
            .set_opt("widget_parameters", self.widget_parameters.clone())
            .set_opt("class_name", self.class_name.clone())
            .set_opt("glyph", self.glyph.clone())
            .set_opt("css", self.css.clone())
            .set_opt("url", self.url.clone())
            .set_list("roles", self.roles.as_deref())
    }
}

/// Field changes shared by single and bulk updates.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct WidgetInstanceChanges {
    /// New column sys_id.
    #[serde(default)]
    pub sp_column: Option<String>,

    /// New title.
    #[serde(default)]
    pub title: Option<String>,

    /// New short description.
    #[serde(default)]
    pub short_description: Option<String>,

    /// New order.
    #[serde(default)]
    pub order: Option<i64>,

    /// New active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// New widget options JSON.
    #[serde(default)]
    pub widget_parameters: Option<String>,

    /// New CSS class name.
    #[serde(default)]
    pub class_name: Option<String>,

    /// New color.
    #[serde(default)]
    pub color: Option<String>,

    /// New size.
    #[serde(default)]
    pub size: Option<String>,

    /// New glyph.
    #[serde(default)]
    pub glyph: Option<String>,

    /// New CSS.
    #[serde(default)]
    pub css: Option<String>,

    /// New link URL.
    #[serde(default)]
    pub url: Option<String>,

    /// New roles (replaces the current list).
    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

impl WidgetInstanceChanges {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set_opt("sp_column", self.sp_column.clone())
            .set_opt("title", self.title.clone())
            .set_opt("short_description", self.short_description.clone())
            .set_opt("order", self.order)
            .set_opt("active", self.active)
            .set_opt("widget_parameters", self.widget_parameters.clone())
            .set_opt("class_name", self.class_name.clone())
            .set_opt("color", self.color.clone())
            .set_opt("size", self.size.clone())
            .set_opt("glyph", self.glyph.clone())
            .set_opt("css", self.css.clone())
            .set_opt("url", self.url.clone())
            .set_list("roles", self.roles.as_deref())
    }
}

/// Input parameters for the update_widget_instance tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateWidgetInstanceInput {
    /// Widget instance sys_id.
    pub instance_id: String,

    /// Fields to change.
    #[serde(flatten)]
    pub changes: WidgetInstanceChanges,
}

/// Input parameters for the list_widget_instances tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListWidgetInstancesInput {
    /// Maximum number of instances to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by widget sys_id.
    #[serde(default)]
    pub sp_widget: Option<String>,

    /// Filter by column sys_id.
    #[serde(default)]
    pub sp_column: Option<String>,

    /// Filter by active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// Additional encoded query.
    #[serde(default)]
    pub query: Option<String>,
}

/// Input parameters for the get_widget_instance tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetWidgetInstanceInput {
    /// Widget instance sys_id.
    pub instance_id: String,
}

/// Input parameters for the delete_widget_instance tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteWidgetInstanceInput {
    /// Widget instance sys_id.
    pub instance_id: String,
}

/// Input parameters for the clone_widget_instance tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CloneWidgetInstanceInput {
    /// Source widget instance sys_id.
    pub source_instance_id: String,

    /// Column sys_id for the clone (default: the source's).
    #[serde(default)]
    pub target_column: Option<String>,

    /// Title for the clone (default: "Copy of <source title>").
    #[serde(default)]
    pub title: Option<String>,

    /// Widget options for the clone (default: the source's).
    #[serde(default)]
    pub widget_parameters: Option<String>,
}

/// Input parameters for the bulk_update_widget_instances tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BulkUpdateWidgetInstancesInput {
    /// Widget instance sys_ids to update.
    pub instance_ids: Vec<String>,

    /// Fields applied to every instance.
    #[serde(flatten)]
    pub changes: WidgetInstanceChanges,
}

/// Places a widget in a column.
pub async fn create_widget_instance(
    client: &SnowClient,
    input: CreateWidgetInstanceInput,
) -> ToolResponse {
    table::create(client, &INSTANCES, input.to_body()).await
}

/// Updates a widget instance.
pub async fn update_widget_instance(
    client: &SnowClient,
    input: UpdateWidgetInstanceInput,
) -> ToolResponse {
    table::update(
        client,
        &INSTANCES,
        &input.instance_id,
        input.changes.to_body(),
    )
    .await
}

/// Lists widget instances.
pub async fn list_widget_instances(
    client: &SnowClient,
    input: ListWidgetInstancesInput,
) -> ToolResponse {
    let filter = EncodedQuery::new()
        .equals_opt("sp_widget", input.sp_widget.as_deref())
        .equals_opt("sp_column", input.sp_column.as_deref())
        .flag("active", input.active)
        .raw(input.query.as_deref());
    table::list(client, &INSTANCES, Page::new(input.limit, input.offset), filter).await
}

/// Gets one widget instance.
pub async fn get_widget_instance(
    client: &SnowClient,
    input: GetWidgetInstanceInput,
) -> ToolResponse {
    table::get(client, &INSTANCES, &input.instance_id).await
}

/// Deletes a widget instance.
pub async fn delete_widget_instance(
    client: &SnowClient,
    input: DeleteWidgetInstanceInput,
) -> ToolResponse {
    table::delete(client, &INSTANCES, &input.instance_id).await
}

/// Copies a widget instance, optionally into another column.
pub async fn clone_widget_instance(
    client: &SnowClient,
    input: CloneWidgetInstanceInput,
) -> ToolResponse {
    table::clone_record(client, &INSTANCES, &input.source_instance_id, |source| {
        let title = input.title.clone().unwrap_or_else(|| {
            format!("Copy of {}", text(source, "title").unwrap_or_default())
        });
        Ok(copy_fields(source, CLONED_FIELDS)
            .set("title", title)
            .set_opt(
                "sp_column",
                input
                    .target_column
                    .clone()
                    .or_else(|| text(source, "sp_column")),
            )
            .set_opt(
                "widget_parameters",
                input
                    .widget_parameters
                    .clone()
                    .or_else(|| text(source, "widget_parameters")),
            ))
    })
    .await
}

/// Applies the same changes to several widget instances.
pub async fn bulk_update_widget_instances(
    client: &SnowClient,
    input: BulkUpdateWidgetInstancesInput,
) -> ToolResponse {
    table::bulk_update(
        client,
        &INSTANCES,
        &input.instance_ids,
        input.changes.to_body(),
    )
    .await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("widget_instance")
        .operation(
            "create_widget_instance",
            "Place a widget in a portal column. Only sp_widget is required.",
        )
        .undocumented("update_widget_instance")
        .operation(
            "list_widget_instances",
            "List widget instances, filtered by widget, column or active flag.",
        )
        .undocumented("get_widget_instance")
        .undocumented("delete_widget_instance")
        .operation(
            "clone_widget_instance",
            "Copy a widget instance, optionally into another column with new options.",
        )
        .operation(
            "bulk_update_widget_instances",
            "Apply the same field changes to several widget instances. Reports each failure.",
        )
        .params::<CreateWidgetInstanceInput>()
        .params::<UpdateWidgetInstanceInput>()
        .params::<ListWidgetInstancesInput>()
        .params::<GetWidgetInstanceInput>()
        .params::<DeleteWidgetInstanceInput>()
        .params::<CloneWidgetInstanceInput>()
        .params::<BulkUpdateWidgetInstancesInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_create_defaults() {
        let input: CreateWidgetInstanceInput =
            serde_json::from_value(json!({"sp_widget": " w1 ", "roles": ["itil", "admin"]}))
                .unwrap();
        let body = input.to_body();
        assert_eq!(body.get("sp_widget"), Some(&json!("w1")));
        assert_eq!(body.get("order"), Some(&json!(1)));
        assert_eq!(body.get("color"), Some(&json!("default")));
        assert_eq!(body.get("size"), Some(&json!("md")));
        assert_eq!(body.get("roles"), Some(&json!("itil,admin")));
        assert!(body.get("sp_column").is_none());
    }

    #[test]
    fn test_bulk_input_flattens_changes() {
        let input: BulkUpdateWidgetInstancesInput = serde_json::from_value(json!({
            "instance_ids": ["a", "b"],
            "active": false,
            "color": "primary"
        }))
        .unwrap();
        assert_eq!(input.instance_ids.len(), 2);
        let body = input.changes.to_body();
        assert_eq!(body.len(), 2);
        assert_eq!(body.get("active"), Some(&json!(false)));
    }
}
