//! Employee Center quick links (`sn_ex_sp_quick_link`).

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use super::table::{self, Page, TableSpec};
use super::{default_limit, default_true};
use crate::models::{EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Quick links.
pub const QUICK_LINKS: TableSpec = TableSpec {
    table: "sn_ex_sp_quick_link",
    label: "quick link",
    plural: "quick links",
    collection: "quick_links",
    fields: &[
        "sys_id",
        "name",
        "content_type",
        "active",
        "override_title",
        "override_short_desc",
        "page",
        "external_link",
        "knowledge",
        "catalog_item",
        "icon_url",
        "background_image_url",
        "additional_query_params",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "name",
    alternate_key: Some("name"),
};

/// Link target and presentation, shared by create and update.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct QuickLinkTarget {
    /// Title shown instead of the target's own.
    #[serde(default)]
    pub override_title: Option<String>,

    /// Short description shown instead of the target's own.
    #[serde(default)]
    pub override_short_desc: Option<String>,

    /// Portal page sys_id, for "page" links.
    #[serde(default)]
    pub page: Option<String>,

    /// External link sys_id, for "external_link" links.
    #[serde(default)]
    pub external_link: Option<String>,

    /// Knowledge article sys_id, for "knowledge" links.
    #[serde(default)]
    pub knowledge: Option<String>,

    /// Catalog item sys_id, for "catalog_item" links.
    #[serde(default)]
    pub catalog_item: Option<String>,

    /// Icon URL.
    #[serde(default)]
    pub icon_url: Option<String>,

    /// Background image URL.
    #[serde(default)]
    pub background_image_url: Option<String>,

    /// Extra query parameters appended to the page URL.
    #[serde(default)]
    pub additional_query_params: Option<String>,
}

impl QuickLinkTarget {
    fn apply(&self, body: RecordBody) -> RecordBody {
        body.set_opt("override_title", self.override_title.clone())
            .set_opt("override_short_desc", self.override_short_desc.clone())
            .set_opt("page", self.page.clone())
            .set_opt("external_link", self.external_link.clone())
            .set_opt("knowledge", self.knowledge.clone())
            .set_opt("catalog_item", self.catalog_item.clone())
            .set_opt("icon_url", self.icon_url.clone())
            .set_opt("background_image_url", self.background_image_url.clone())
            .set_opt(
                "additional_query_params",
                self.additional_query_params.clone(),
            )
    }
}

/// Input parameters for the create_quick_link tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateQuickLinkInput {
    /// Quick link name.
    pub name: String,

    /// Content type: "page", "external_link", "knowledge" or "catalog_item".
    pub content_type: String,

    /// Whether the link is active (default: true).
    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(flatten)]
    pub target: QuickLinkTarget,
}

impl CreateQuickLinkInput {
    /// Request body.
    pub fn to_body(&self) -> RecordBody {
        let body = RecordBody::new()
            .set("name", self.name.as_str())
            .set("content_type", self.content_type.as_str())
            .set("active", self.active);
        self.target.apply(body)
    }
}

/// Input parameters for the update_quick_link tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateQuickLinkInput {
    /// Quick link sys_id.
    pub quick_link_id: String,

    /// New name.
    #[serde(default)]
    pub name: Option<String>,

    /// New content type.
    #[serde(default)]
    pub content_type: Option<String>,

    /// New active status.
    #[serde(default)]
    pub active: Option<bool>,

    #[serde(flatten)]
    pub target: QuickLinkTarget,
}

impl UpdateQuickLinkInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        let body = RecordBody::new()
            .set_opt("name", self.name.clone())
            .set_opt("content_type", self.content_type.clone())
            .set_opt("active", self.active);
        self.target.apply(body)
    }
}

/// Input parameters for the list_quick_links tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListQuickLinksInput {
    /// Maximum number of quick links to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// Filter by content type.
    #[serde(default)]
    pub content_type: Option<String>,

    /// Additional encoded query.
    #[serde(default)]
    pub query: Option<String>,
}

/// Input parameters for the get_quick_link tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetQuickLinkInput {
    /// Quick link sys_id or name.
    pub quick_link_id: String,
}

/// Input parameters for the delete_quick_link tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteQuickLinkInput {
    /// Quick link sys_id.
    pub quick_link_id: String,
}

/// Creates a quick link.
pub async fn create_quick_link(client: &SnowClient, input: CreateQuickLinkInput) -> ToolResponse {
    table::create(client, &QUICK_LINKS, input.to_body()).await
}

/// Updates a quick link.
pub async fn update_quick_link(client: &SnowClient, input: UpdateQuickLinkInput) -> ToolResponse {
    table::update(client, &QUICK_LINKS, &input.quick_link_id, input.to_body()).await
}

/// Lists quick links.
pub async fn list_quick_links(client: &SnowClient, input: ListQuickLinksInput) -> ToolResponse {
    let filter = EncodedQuery::new()
        .flag("active", input.active)
        .equals_opt("content_type", input.content_type.as_deref())
        .raw(input.query.as_deref());
    table::list(client, &QUICK_LINKS, Page::new(input.limit, input.offset), filter).await
}

/// Gets one quick link by sys_id or name.
pub async fn get_quick_link(client: &SnowClient, input: GetQuickLinkInput) -> ToolResponse {
    table::get(client, &QUICK_LINKS, &input.quick_link_id).await
}

/// Deletes a quick link.
pub async fn delete_quick_link(client: &SnowClient, input: DeleteQuickLinkInput) -> ToolResponse {
    table::delete(client, &QUICK_LINKS, &input.quick_link_id).await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("quick_link")
        .operation(
            "create_quick_link",
            "Create an Employee Center quick link to a portal page, external link, knowledge article or catalog item.",
        )
        .undocumented("update_quick_link")
        .operation(
            "list_quick_links",
            "List Employee Center quick links, filtered by active flag or content type.",
        )
        .operation(
            "get_quick_link",
            "Get an Employee Center quick link by sys_id or name.",
        )
        .undocumented("delete_quick_link")
        .params::<CreateQuickLinkInput>()
        .params::<UpdateQuickLinkInput>()
        .params::<ListQuickLinksInput>()
        .params::<GetQuickLinkInput>()
        .params::<DeleteQuickLinkInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn test_create_body_keeps_only_given_target() {
        let input: CreateQuickLinkInput = serde_json::from_value(json!({
            "name": "Order a laptop",
            "content_type": "catalog_item",
            "catalog_item": "cat-1"
        }))
        .unwrap();
        assert_eq!(
            Value::Object(input.to_body().into_record()),
            json!({
                "name": "Order a laptop",
                "content_type": "catalog_item",
                "active": true,
                "catalog_item": "cat-1"
            })
        );
    }
}
