//! Knowledge taxonomy tools: taxonomies (`taxonomy`) and their topics (`topic`).

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use super::default_limit;
use super::table::{self, copy_fields, Page, TableSpec};
use crate::models::{text, EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Taxonomies.
pub const TAXONOMIES: TableSpec = TableSpec {
    table: "taxonomy",
    label: "taxonomy",
    plural: "taxonomies",
    collection: "taxonomies",
    fields: &[
        "sys_id",
        "name",
        "description",
        "active",
        "managers",
        "sys_domain",
        "sys_domain_path",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "name",
    alternate_key: None,
};

/// Taxonomy topics.
pub const TOPICS: TableSpec = TableSpec {
    table: "topic",
    label: "topic",
    plural: "topics",
    collection: "topics",
    fields: &[
        "sys_id",
        "name",
        "description",
        "taxonomy",
        "parent_topic",
        "topic_path",
        "order",
        "active",
        "topic_based_navigation",
        "icon_url",
        "banner_image_url",
        "topic_manager",
        "topic_contributor",
        "available_for",
        "not_available_for",
        "enable_user_criteria_check",
        "template",
        "apply_to_child_topics",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "name",
    alternate_key: None,
};

const TOPIC_CLONED_FIELDS: &[&str] = &[
    "parent_topic",
    "order",
    "active",
    "topic_based_navigation",
    "icon_url",
    "banner_image_url",
    "topic_manager",
    "topic_contributor",
    "available_for",
    "not_available_for",
    "enable_user_criteria_check",
    "template",
    "apply_to_child_topics",
];

// ============================================================================
// Taxonomy inputs
// ============================================================================

/// Input parameters for the create_taxonomy tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateTaxonomyInput {
    /// Name of the taxonomy (unique).
    pub name: String,

    /// Description of the taxonomy.
    #[serde(default)]
    pub description: Option<String>,

    /// Whether the taxonomy is active (default: true).
    #[serde(default)]
    pub active: Option<bool>,

    /// User criteria sys_id for taxonomy managers.
    #[serde(default)]
    pub managers: Option<String>,

    /// Domain (default: "global").
    #[serde(default)]
    pub sys_domain: Option<String>,

    /// Domain path (default: "/").
    #[serde(default)]
    pub sys_domain_path: Option<String>,
}

impl CreateTaxonomyInput {
    /// Request body; `active` and the domain fields are always sent.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set("name", self.name.as_str())
            .set("active", self.active.unwrap_or(true))
            .set("sys_domain", self.sys_domain.as_deref().unwrap_or("global"))
            .set(
                "sys_domain_path",
                self.sys_domain_path.as_deref().unwrap_or("/"),
            )
            .set_opt("description", self.description.clone())
            .set_opt("managers", self.managers.clone())
    }
}

/// Input parameters for the update_taxonomy tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateTaxonomyInput {
    /// Taxonomy sys_id.
    pub taxonomy_id: String,

    /// New name.
    #[serde(default)]
    pub name: Option<String>,

    /// New description.
    #[serde(default)]
    pub description: Option<String>,

    /// New active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// New managers user criteria sys_id.
    #[serde(default)]
    pub managers: Option<String>,

    /// New domain.
    #[serde(default)]
    pub sys_domain: Option<String>,

    /// New domain path.
    #[serde(default)]
    pub sys_domain_path: Option<String>,
}

/// Input parameters for the list_taxonomies tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListTaxonomiesInput {
    /// Maximum number of taxonomies to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// Only taxonomies whose name contains this text.
    #[serde(default)]
    pub name_contains: Option<String>,

    /// Filter by domain.
    #[serde(default)]
    pub sys_domain: Option<String>,

    /// Additional encoded query.
    #[serde(default)]
    pub query: Option<String>,
}

/// Input parameters for the get_taxonomy tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetTaxonomyInput {
    /// Taxonomy sys_id.
    pub taxonomy_id: String,
}

/// Input parameters for the delete_taxonomy tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteTaxonomyInput {
    /// Taxonomy sys_id.
    pub taxonomy_id: String,
}

/// Input parameters for the clone_taxonomy tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CloneTaxonomyInput {
    /// Source taxonomy sys_id.
    pub taxonomy_id: String,

    /// Name for the cloned taxonomy.
    pub new_name: String,

    /// Description for the clone (default: the source description).
    #[serde(default)]
    pub new_description: Option<String>,
}

// ============================================================================
// Topic inputs
// ============================================================================

/// Input parameters for the create_topic tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateTopicInput {
    /// Name of the topic.
    pub name: String,

    /// Taxonomy sys_id the topic belongs to.
    pub taxonomy: String,

    /// Description of the topic.
    #[serde(default)]
    pub description: Option<String>,

    /// Parent topic sys_id.
    #[serde(default)]
    pub parent_topic: Option<String>,

    /// Display order within the taxonomy.
    #[serde(default)]
    pub order: Option<i64>,

    /// Whether the topic is active (default: true).
    #[serde(default)]
    pub active: Option<bool>,

    /// Enable topic-based navigation (default: false).
    #[serde(default)]
    pub topic_based_navigation: Option<bool>,

    /// URL for the topic icon.
    #[serde(default)]
    pub icon_url: Option<String>,

    /// URL for the topic banner image.
    #[serde(default)]
    pub banner_image_url: Option<String>,

    /// Comma-separated user criteria sys_ids for topic managers.
    #[serde(default)]
    pub topic_manager: Option<String>,

    /// Comma-separated user criteria sys_ids for topic contributors.
    #[serde(default)]
    pub topic_contributor: Option<String>,

    /// Comma-separated user criteria sys_ids allowed to see the topic.
    #[serde(default)]
    pub available_for: Option<String>,

    /// Comma-separated user criteria sys_ids denied the topic.
    #[serde(default)]
    pub not_available_for: Option<String>,

    /// Enable user criteria checks (default: false).
    #[serde(default)]
    pub enable_user_criteria_check: Option<bool>,

    /// Service Portal page template sys_id.
    #[serde(default)]
    pub template: Option<String>,

    /// Apply template settings to child topics (default: false).
    #[serde(default)]
    pub apply_to_child_topics: Option<bool>,
}

impl CreateTopicInput {
    /// Request body; the boolean settings are always sent.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set("name", self.name.as_str())
            .set("taxonomy", self.taxonomy.trim())
            .set("active", self.active.unwrap_or(true))
            .set(
                "topic_based_navigation",
                self.topic_based_navigation.unwrap_or(false),
            )
            .set(
                "enable_user_criteria_check",
                self.enable_user_criteria_check.unwrap_or(false),
            )
            .set(
                "apply_to_child_topics",
                self.apply_to_child_topics.unwrap_or(false),
            )
            .set_opt("description", self.description.clone())
            .set_opt("parent_topic", self.parent_topic.clone())
            .set_opt("order", self.order)
            .set_opt("icon_url", self.icon_url.clone())
            .set_opt("banner_image_url", self.banner_image_url.clone())
            .set_opt("topic_manager", self.topic_manager.clone())
            .set_opt("topic_contributor", self.topic_contributor.clone())
            .set_opt("available_for", self.available_for.clone())
            .set_opt("not_available_for", self.not_available_for.clone())
            .set_opt("template", self.template.clone())
    }
}

/// Input parameters for the update_topic tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateTopicInput {
    /// Topic sys_id.
    pub topic_id: String,

    /// New name.
    #[serde(default)]
    pub name: Option<String>,

    /// New description.
    #[serde(default)]
    pub description: Option<String>,

    /// New parent topic sys_id.
    #[serde(default)]
    pub parent_topic: Option<String>,

    /// New display order.
    #[serde(default)]
    pub order: Option<i64>,

    /// New active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// New topic-based navigation setting.
    #[serde(default)]
    pub topic_based_navigation: Option<bool>,

    /// New icon URL.
    #[serde(default)]
    pub icon_url: Option<String>,

    /// New banner image URL.
    #[serde(default)]
    pub banner_image_url: Option<String>,

    /// New topic managers.
    #[serde(default)]
    pub topic_manager: Option<String>,

    /// New topic contributors.
    #[serde(default)]
    pub topic_contributor: Option<String>,

    /// New available-for criteria.
    #[serde(default)]
    pub available_for: Option<String>,

    /// New not-available-for criteria.
    #[serde(default)]
    pub not_available_for: Option<String>,

    /// New user criteria check setting.
    #[serde(default)]
    pub enable_user_criteria_check: Option<bool>,

    /// New template sys_id.
    #[serde(default)]
    pub template: Option<String>,

    /// New apply-to-child-topics setting.
    #[serde(default)]
    pub apply_to_child_topics: Option<bool>,
}

impl UpdateTopicInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set_opt("name", self.name.clone())
            .set_opt("description", self.description.clone())
            .set_opt("parent_topic", self.parent_topic.clone())
            .set_opt("order", self.order)
            .set_opt("active", self.active)
            .set_opt("topic_based_navigation", self.topic_based_navigation)
            .set_opt("icon_url", self.icon_url.clone())
            .set_opt("banner_image_url", self.banner_image_url.clone())
            .set_opt("topic_manager", self.topic_manager.clone())
            .set_opt("topic_contributor", self.topic_contributor.clone())
            .set_opt("available_for", self.available_for.clone())
            .set_opt("not_available_for", self.not_available_for.clone())
            .set_opt("enable_user_criteria_check", self.enable_user_criteria_check)
            .set_opt("template", self.template.clone())
            .set_opt("apply_to_child_topics", self.apply_to_child_topics)
    }
}

/// Input parameters for the list_topics tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListTopicsInput {
    /// Maximum number of topics to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by taxonomy sys_id.
    #[serde(default)]
    pub taxonomy: Option<String>,

    /// Filter by parent topic sys_id.
    #[serde(default)]
    pub parent_topic: Option<String>,

    /// Filter by active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// Only topics whose name contains this text.
    #[serde(default)]
    pub name_contains: Option<String>,

    /// Filter by topic-based navigation setting.
    #[serde(default)]
    pub topic_based_navigation: Option<bool>,

    /// Additional encoded query.
    #[serde(default)]
    pub query: Option<String>,
}

/// Input parameters for the get_topic tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetTopicInput {
    /// Topic sys_id.
    pub topic_id: String,
}

/// Input parameters for the delete_topic tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteTopicInput {
    /// Topic sys_id.
    pub topic_id: String,
}

/// Input parameters for the clone_topic tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CloneTopicInput {
    /// Source topic sys_id.
    pub topic_id: String,

    /// Name for the cloned topic.
    pub new_name: String,

    /// Description for the clone (default: the source description).
    #[serde(default)]
    pub new_description: Option<String>,

    /// Taxonomy for the clone (default: the source taxonomy).
    #[serde(default)]
    pub new_taxonomy: Option<String>,
}

// ============================================================================
// Taxonomy tools
// ============================================================================

/// Creates a taxonomy.
pub async fn create_taxonomy(client: &SnowClient, input: CreateTaxonomyInput) -> ToolResponse {
    table::create(client, &TAXONOMIES, input.to_body()).await
}

/// Updates a taxonomy.
pub async fn update_taxonomy(client: &SnowClient, input: UpdateTaxonomyInput) -> ToolResponse {
    let body = RecordBody::new()
        .set_opt("name", input.name)
        .set_opt("description", input.description)
        .set_opt("active", input.active)
        .set_opt("managers", input.managers)
        .set_opt("sys_domain", input.sys_domain)
        .set_opt("sys_domain_path", input.sys_domain_path);
    table::update(client, &TAXONOMIES, &input.taxonomy_id, body).await
}

/// Lists taxonomies.
pub async fn list_taxonomies(client: &SnowClient, input: ListTaxonomiesInput) -> ToolResponse {
    let filter = EncodedQuery::new()
        .flag("active", input.active)
        .contains("name", input.name_contains.as_deref())
        .equals_opt("sys_domain", input.sys_domain.as_deref())
        .raw(input.query.as_deref());
    table::list(client, &TAXONOMIES, Page::new(input.limit, input.offset), filter).await
}

/// Gets one taxonomy.
pub async fn get_taxonomy(client: &SnowClient, input: GetTaxonomyInput) -> ToolResponse {
    table::get(client, &TAXONOMIES, &input.taxonomy_id).await
}

/// Deletes a taxonomy.
pub async fn delete_taxonomy(client: &SnowClient, input: DeleteTaxonomyInput) -> ToolResponse {
    table::delete(client, &TAXONOMIES, &input.taxonomy_id).await
}

/// Copies a taxonomy under a new name. Topics are not copied.
pub async fn clone_taxonomy(client: &SnowClient, input: CloneTaxonomyInput) -> ToolResponse {
    table::clone_record(client, &TAXONOMIES, &input.taxonomy_id, |source| {
        let body = RecordBody::new()
            .set("name", input.new_name.as_str())
            .set(
                "active",
                text(source, "active").unwrap_or_else(|| "true".to_string()),
            )
            .set(
                "sys_domain",
                text(source, "sys_domain").unwrap_or_else(|| "global".to_string()),
            )
            .set(
                "sys_domain_path",
                text(source, "sys_domain_path").unwrap_or_else(|| "/".to_string()),
            )
            .set_opt(
                "description",
                input
                    .new_description
                    .clone()
                    .or_else(|| text(source, "description")),
            )
            .set_opt("managers", text(source, "managers"));
        Ok(body)
    })
    .await
}

// ============================================================================
// Topic tools
// ============================================================================

/// Creates a topic.
pub async fn create_topic(client: &SnowClient, input: CreateTopicInput) -> ToolResponse {
    table::create(client, &TOPICS, input.to_body()).await
}

/// Updates a topic.
pub async fn update_topic(client: &SnowClient, input: UpdateTopicInput) -> ToolResponse {
    table::update(client, &TOPICS, &input.topic_id, input.to_body()).await
}

/// Lists topics.
pub async fn list_topics(client: &SnowClient, input: ListTopicsInput) -> ToolResponse {
    let filter = EncodedQuery::new()
        .equals_opt("taxonomy", input.taxonomy.as_deref())
        .equals_opt("parent_topic", input.parent_topic.as_deref())
        .flag("active", input.active)
        .contains("name", input.name_contains.as_deref())
        .flag("topic_based_navigation", input.topic_based_navigation)
        .raw(input.query.as_deref());
    table::list(client, &TOPICS, Page::new(input.limit, input.offset), filter).await
}

/// Gets one topic.
pub async fn get_topic(client: &SnowClient, input: GetTopicInput) -> ToolResponse {
    table::get(client, &TOPICS, &input.topic_id).await
}

/// Deletes a topic.
pub async fn delete_topic(client: &SnowClient, input: DeleteTopicInput) -> ToolResponse {
    table::delete(client, &TOPICS, &input.topic_id).await
}

/// Copies a topic, optionally into another taxonomy.
pub async fn clone_topic(client: &SnowClient, input: CloneTopicInput) -> ToolResponse {
    table::clone_record(client, &TOPICS, &input.topic_id, |source| {
        Ok(copy_fields(source, TOPIC_CLONED_FIELDS)
            .set("name", input.new_name.as_str())
            .set_opt(
                "taxonomy",
                input.new_taxonomy.clone().or_else(|| text(source, "taxonomy")),
            )
            .set_opt(
                "description",
                input
                    .new_description
                    .clone()
                    .or_else(|| text(source, "description")),
            ))
    })
    .await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("knowledge")
        .operation(
            "create_taxonomy",
            "Create a knowledge taxonomy. Defaults to the global domain.",
        )
        .undocumented("update_taxonomy")
        .undocumented("list_taxonomies")
        .undocumented("get_taxonomy")
        .undocumented("delete_taxonomy")
        .operation(
            "clone_taxonomy",
            "Copy a taxonomy under a new name. Its topics are not copied.",
        )
        .operation(
            "create_topic",
            "Create a topic in a taxonomy, optionally under a parent topic.",
        )
        .undocumented("update_topic")
        .operation(
            "list_topics",
            "List topics, filtered by taxonomy, parent topic, flags or name.",
        )
        .undocumented("get_topic")
        .undocumented("delete_topic")
        .undocumented("clone_topic")
        .params::<CreateTaxonomyInput>()
        .params::<UpdateTaxonomyInput>()
        .params::<ListTaxonomiesInput>()
        .params::<GetTaxonomyInput>()
        .params::<DeleteTaxonomyInput>()
        .params::<CloneTaxonomyInput>()
        .params::<CreateTopicInput>()
        .params::<UpdateTopicInput>()
        .params::<ListTopicsInput>()
        .params::<GetTopicInput>()
        .params::<DeleteTopicInput>()
        .params::<CloneTopicInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn test_taxonomy_body_defaults_domain() {
        let input: CreateTaxonomyInput =
            serde_json::from_value(json!({"name": "IT Help"})).unwrap();
        assert_eq!(
            Value::Object(input.to_body().into_record()),
            json!({
                "name": "IT Help",
                "active": true,
                "sys_domain": "global",
                "sys_domain_path": "/"
            })
        );
    }

    #[test]
    fn test_topic_body_keeps_explicit_false() {
        let input: CreateTopicInput = serde_json::from_value(json!({
            "name": "Printers",
            "taxonomy": "tx1",
            "active": false,
            "order": 20
        }))
        .unwrap();
        let body = input.to_body();
        assert_eq!(body.get("active"), Some(&json!(false)));
        assert_eq!(body.get("order"), Some(&json!(20)));
        assert!(body.get("parent_topic").is_none());
    }

    #[test]
    fn test_update_topic_is_sparse() {
        let input = UpdateTopicInput {
            topic_id: "t1".to_string(),
            order: Some(5),
            ..Default::default()
        };
        assert_eq!(input.to_body().len(), 1);
    }
}
