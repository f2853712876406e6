//! Content types available to taxonomy topics
//! (`taxonomy_content_configuration`).

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use super::table::{self, Page, TableSpec};
use super::{default_limit, default_true};
use crate::models::{EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Content type configurations, addressed by sys_id or name.
pub const CONTENT_CONFIGS: TableSpec = TableSpec {
    table: "taxonomy_content_configuration",
    label: "taxonomy content configuration",
    plural: "taxonomy content configurations",
    collection: "configurations",
    fields: &[
        "sys_id",
        "name",
        "active",
        "description",
        "table_name",
        "display_name",
        "order",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "name",
    alternate_key: Some("name"),
};

/// Input parameters for the create_taxonomy_content_configuration tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateTaxonomyContentConfigurationInput {
    /// Configuration name.
    pub name: String,

    /// Whether the configuration is active (default: true).
    #[serde(default = "default_true")]
    pub active: bool,

    /// Description.
    #[serde(default)]
    pub description: Option<String>,

    /// Table holding the content (e.g. "kb_knowledge").
    #[serde(default)]
    pub table_name: Option<String>,

    /// Display name of the content type.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Display order.
    #[serde(default)]
    pub order: Option<i64>,
}

impl CreateTaxonomyContentConfigurationInput {
    /// Request body.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set("name", self.name.as_str())
            .set("active", self.active)
            .set_opt("description", self.description.clone())
            .set_opt("table_name", self.table_name.clone())
            .set_opt("display_name", self.display_name.clone())
            .set_opt("order", self.order)
    }
}

/// Input parameters for the update_taxonomy_content_configuration tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateTaxonomyContentConfigurationInput {
    /// Configuration sys_id or name.
    pub config_id: String,

    /// New name.
    #[serde(default)]
    pub name: Option<String>,

    /// New active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// New description.
    #[serde(default)]
    pub description: Option<String>,

    /// New table name.
    #[serde(default)]
    pub table_name: Option<String>,

    /// New display name.
    #[serde(default)]
    pub display_name: Option<String>,

    /// New display order.
    #[serde(default)]
    pub order: Option<i64>,
}

impl UpdateTaxonomyContentConfigurationInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set_opt("name", self.name.clone())
            .set_opt("active", self.active)
            .set_opt("description", self.description.clone())
            .set_opt("table_name", self.table_name.clone())
            .set_opt("display_name", self.display_name.clone())
            .set_opt("order", self.order)
    }
}

/// Input parameters for the list_taxonomy_content_configurations tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListTaxonomyContentConfigurationsInput {
    /// Maximum number of configurations to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// Filter by table name.
    #[serde(default)]
    pub table_name: Option<String>,

    /// Additional encoded query.
    #[serde(default)]
    pub query: Option<String>,
}

/// Input parameters for the get_taxonomy_content_configuration tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetTaxonomyContentConfigurationInput {
    /// Configuration sys_id or name.
    pub config_id: String,
}

/// Input parameters for the delete_taxonomy_content_configuration tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteTaxonomyContentConfigurationInput {
    /// Configuration sys_id or name.
    pub config_id: String,
}

/// Creates a content type configuration.
pub async fn create_taxonomy_content_configuration(
    client: &SnowClient,
    input: CreateTaxonomyContentConfigurationInput,
) -> ToolResponse {
    table::create(client, &CONTENT_CONFIGS, input.to_body()).await
}

/// Updates a content type configuration.
pub async fn update_taxonomy_content_configuration(
    client: &SnowClient,
    input: UpdateTaxonomyContentConfigurationInput,
) -> ToolResponse {
    table::update(client, &CONTENT_CONFIGS, &input.config_id, input.to_body()).await
}

/// Lists content type configurations.
pub async fn list_taxonomy_content_configurations(
    client: &SnowClient,
    input: ListTaxonomyContentConfigurationsInput,
) -> ToolResponse {
    let filter = EncodedQuery::new()
        .flag("active", input.active)
        .equals_opt("table_name", input.table_name.as_deref())
        .raw(input.query.as_deref());
    let page = Page::new(input.limit, input.offset);
    table::list(client, &CONTENT_CONFIGS, page, filter).await
}

/// Gets one content type configuration by sys_id or name.
pub async fn get_taxonomy_content_configuration(
    client: &SnowClient,
    input: GetTaxonomyContentConfigurationInput,
) -> ToolResponse {
    table::get(client, &CONTENT_CONFIGS, &input.config_id).await
}

/// Deletes a content type configuration.
pub async fn delete_taxonomy_content_configuration(
    client: &SnowClient,
    input: DeleteTaxonomyContentConfigurationInput,
) -> ToolResponse {
    table::delete(client, &CONTENT_CONFIGS, &input.config_id).await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("taxonomy_content")
        .operation(
            "create_taxonomy_content_configuration",
            "Create a content type configuration that taxonomy topics can connect content of.",
        )
        .undocumented("update_taxonomy_content_configuration")
        .operation(
            "list_taxonomy_content_configurations",
            "List taxonomy content type configurations, filtered by active flag or table.",
        )
        .operation(
            "get_taxonomy_content_configuration",
            "Get a taxonomy content type configuration by sys_id or name.",
        )
        .undocumented("delete_taxonomy_content_configuration")
        .params::<CreateTaxonomyContentConfigurationInput>()
        .params::<UpdateTaxonomyContentConfigurationInput>()
        .params::<ListTaxonomyContentConfigurationsInput>()
        .params::<GetTaxonomyContentConfigurationInput>()
        .params::<DeleteTaxonomyContentConfigurationInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn test_create_body() {
        let input: CreateTaxonomyContentConfigurationInput = serde_json::from_value(json!({
            "name": "Knowledge",
            "table_name": "kb_knowledge",
            "order": 200
        }))
        .unwrap();
        assert_eq!(
            Value::Object(input.to_body().into_record()),
            json!({
                "name": "Knowledge",
                "active": true,
                "table_name": "kb_knowledge",
                "order": 200
            })
        );
    }
}
