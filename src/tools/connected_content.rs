//! Content connected to knowledge topics (`m2m_connected_content`).
//!
//! Each connection links a topic to one catalog item, knowledge article or
//! quick link under a content type configuration.

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use super::table::{self, Page, TableSpec};
use super::{default_limit, default_order};
use crate::models::{EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Topic content connections.
pub const CONNECTIONS: TableSpec = TableSpec {
    table: "m2m_connected_content",
    label: "connected content",
    plural: "connected content",
    collection: "connections",
    fields: &[
        "sys_id",
        "topic",
        "content_type",
        "catalog_item",
        "knowledge",
        "quick_link",
        "order",
        "popularity",
        "content_display_value",
        "alphabetical_order",
        "sys_domain",
        "sys_domain_path",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "content_display_value",
    alternate_key: None,
};

fn default_domain() -> String {
    "global".to_string()
}

fn default_domain_path() -> String {
    "/".to_string()
}

/// One piece of content to connect to a topic.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ContentConnection {
    /// Content type configuration sys_id.
    pub content_type: String,

    /// Catalog item sys_id.
    #[serde(default)]
    pub catalog_item: Option<String>,

    /// Knowledge article sys_id.
    #[serde(default)]
    pub knowledge: Option<String>,

    /// Quick link sys_id.
    #[serde(default)]
    pub quick_link: Option<String>,

    /// Display order (default: 100).
    #[serde(default = "default_order")]
    pub order: i64,

    /// Popularity score.
    #[serde(default)]
    pub popularity: Option<f64>,

    /// Display value of the content.
    #[serde(default)]
    pub content_display_value: Option<String>,

    /// Alphabetical ordering value.
    #[serde(default)]
    pub alphabetical_order: Option<i64>,

    /// Domain (default: "global").
    #[serde(default = "default_domain")]
    pub sys_domain: String,

    /// Domain path (default: "/").
    #[serde(default = "default_domain_path")]
    pub sys_domain_path: String,
}

impl ContentConnection {
    /// Request body connecting this content to `topic`.
    pub fn to_body(&self, topic: &str) -> RecordBody {
        RecordBody::new()
            .set("topic", topic.trim())
            .set("content_type", self.content_type.trim())
            .set("order", self.order)
            .set("sys_domain", self.sys_domain.as_str())
            .set("sys_domain_path", self.sys_domain_path.as_str())
            .set_opt("catalog_item", self.catalog_item.clone())
            .set_opt("knowledge", self.knowledge.clone())
            .set_opt("quick_link", self.quick_link.clone())
            .set_opt("popularity", self.popularity)
            .set_opt("content_display_value", self.content_display_value.clone())
            .set_opt("alphabetical_order", self.alphabetical_order)
    }
}

/// Input parameters for the create_connected_content tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateConnectedContentInput {
    /// Topic sys_id.
    pub topic: String,

    #[serde(flatten)]
    pub connection: ContentConnection,
}

/// Input parameters for the update_connected_content tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateConnectedContentInput {
    /// Connection sys_id.
    pub connection_id: String,

    /// New display order.
    #[serde(default)]
    pub order: Option<i64>,

    /// New popularity score.
    #[serde(default)]
    pub popularity: Option<f64>,

    /// New display value.
    #[serde(default)]
    pub content_display_value: Option<String>,

    /// New alphabetical ordering value.
    #[serde(default)]
    pub alphabetical_order: Option<i64>,
}

impl UpdateConnectedContentInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set_opt("order", self.order)
            .set_opt("popularity", self.popularity)
            .set_opt("content_display_value", self.content_display_value.clone())
            .set_opt("alphabetical_order", self.alphabetical_order)
    }
}

/// Input parameters for the list_connected_content tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListConnectedContentInput {
    /// Maximum number of connections to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by topic sys_id.
    #[serde(default)]
    pub topic: Option<String>,

    /// Filter by content type sys_id.
    #[serde(default)]
    pub content_type: Option<String>,

    /// Filter by catalog item sys_id.
    #[serde(default)]
    pub catalog_item: Option<String>,

    /// Filter by knowledge article sys_id.
    #[serde(default)]
    pub knowledge: Option<String>,

    /// Filter by quick link sys_id.
    #[serde(default)]
    pub quick_link: Option<String>,

    /// Filter by domain.
    #[serde(default)]
    pub sys_domain: Option<String>,

    /// Additional encoded query.
    #[serde(default)]
    pub query: Option<String>,
}

impl ListConnectedContentInput {
    fn filter(&self) -> EncodedQuery {
        EncodedQuery::new()
            .equals_opt("topic", self.topic.as_deref())
            .equals_opt("content_type", self.content_type.as_deref())
            .equals_opt("catalog_item", self.catalog_item.as_deref())
            .equals_opt("knowledge", self.knowledge.as_deref())
            .equals_opt("quick_link", self.quick_link.as_deref())
            .equals_opt("sys_domain", self.sys_domain.as_deref())
            .raw(self.query.as_deref())
    }
}

/// Input parameters for the get_connected_content tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetConnectedContentInput {
    /// Connection sys_id.
    pub connection_id: String,
}

/// Input parameters for the delete_connected_content tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteConnectedContentInput {
    /// Connection sys_id.
    pub connection_id: String,
}

/// Input parameters for the bulk_connect_content tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BulkConnectContentInput {
    /// Topic sys_id every connection is made to.
    pub topic: String,

    /// Content to connect.
    pub connections: Vec<ContentConnection>,
}

/// Connects one piece of content to a topic.
pub async fn create_connected_content(
    client: &SnowClient,
    input: CreateConnectedContentInput,
) -> ToolResponse {
    table::create(client, &CONNECTIONS, input.connection.to_body(&input.topic)).await
}

/// Updates a connection.
pub async fn update_connected_content(
    client: &SnowClient,
    input: UpdateConnectedContentInput,
) -> ToolResponse {
    table::update(client, &CONNECTIONS, &input.connection_id, input.to_body()).await
}

/// Lists connections.
pub async fn list_connected_content(
    client: &SnowClient,
    input: ListConnectedContentInput,
) -> ToolResponse {
    let page = Page::new(input.limit, input.offset);
    table::list(client, &CONNECTIONS, page, input.filter()).await
}

/// Gets one connection.
pub async fn get_connected_content(
    client: &SnowClient,
    input: GetConnectedContentInput,
) -> ToolResponse {
    table::get(client, &CONNECTIONS, &input.connection_id).await
}

/// Removes a connection.
pub async fn delete_connected_content(
    client: &SnowClient,
    input: DeleteConnectedContentInput,
) -> ToolResponse {
    table::delete(client, &CONNECTIONS, &input.connection_id).await
}

/// Connects several pieces of content to one topic, continuing past
/// failures.
pub async fn bulk_connect_content(
    client: &SnowClient,
    input: BulkConnectContentInput,
) -> ToolResponse {
    let bodies = input
        .connections
        .iter()
        .map(|connection| connection.to_body(&input.topic))
        .collect();
    table::create_each(client, &CONNECTIONS, bodies).await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("connected_content")
        .operation(
            "create_connected_content",
            "Connect a catalog item, knowledge article or quick link to a knowledge topic.",
        )
        .undocumented("update_connected_content")
        .operation(
            "list_connected_content",
            "List content connected to topics, filtered by topic, content type or connected record.",
        )
        .undocumented("get_connected_content")
        .undocumented("delete_connected_content")
        .operation(
            "bulk_connect_content",
            "Connect several pieces of content to one topic. Every connection is attempted; failures are reported per entry.",
        )
        .params::<CreateConnectedContentInput>()
        .params::<UpdateConnectedContentInput>()
        .params::<ListConnectedContentInput>()
        .params::<GetConnectedContentInput>()
        .params::<DeleteConnectedContentInput>()
        .params::<BulkConnectContentInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn test_connection_defaults() {
        let input: CreateConnectedContentInput = serde_json::from_value(json!({
            "topic": "topic-1",
            "content_type": "ct-kb",
            "knowledge": "kb-42"
        }))
        .unwrap();
        assert_eq!(
            Value::Object(input.connection.to_body(&input.topic).into_record()),
            json!({
                "topic": "topic-1",
                "content_type": "ct-kb",
                "order": 100,
                "sys_domain": "global",
                "sys_domain_path": "/",
                "knowledge": "kb-42"
            })
        );
    }
}
