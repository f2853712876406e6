//! Service Portal page tools (`sp_page`).
//!
//! Pages are usually addressed by their human-readable `id` (e.g. `index`,
//! `kb_article`). Every tool taking a `page_id` accepts either that id or a
//! `sys_id`.

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use super::{default_limit, default_true};
use super::table::{self, Page, TableSpec};
use crate::models::{flag, text, EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Portal pages.
pub const PAGES: TableSpec = TableSpec {
    table: "sp_page",
    label: "portal page",
    plural: "portal pages",
    collection: "pages",
    fields: &[
        "sys_id",
        "id",
        "title",
        "short_description",
        "css",
        "public",
        "roles",
        "internal",
        "draft",
        "omit_watcher",
        "dynamic_title_structure",
        "category",
        "use_seo_script",
        "seo_script",
        "human_readable_url_structure",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "title",
    alternate_key: Some("id"),
};

/// Input parameters for the create_portal_page tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreatePortalPageInput {
    /// Unique identifier for the page (used in `?id=` URLs).
    pub id: String,

    /// Display title of the page.
    pub title: String,

    /// Short description of the page.
    #[serde(default)]
    pub short_description: Option<String>,

    /// Page-specific CSS.
    #[serde(default)]
    pub css: Option<String>,

    /// Whether the page is publicly accessible (default: false).
    #[serde(default)]
    pub public: bool,

    /// Roles required to access this page.
    #[serde(default)]
    pub roles: Option<Vec<String>>,

    /// Whether this is an internal page (default: false).
    #[serde(default)]
    pub internal: bool,

    /// Whether the page is in draft mode (default: false).
    #[serde(default)]
    pub draft: bool,

    /// Whether to omit the watcher (default: false).
    #[serde(default)]
    pub omit_watcher: bool,

    /// Dynamic page title structure.
    #[serde(default)]
    pub dynamic_title_structure: Option<String>,

    /// Page category (default: "custom").
    #[serde(default)]
    pub category: Option<String>,

    /// Whether to use an SEO script (default: false).
    #[serde(default)]
    pub use_seo_script: bool,

    /// SEO script sys_id.
    #[serde(default)]
    pub seo_script: Option<String>,

    /// Human readable URL structure.
    #[serde(default)]
    pub human_readable_url_structure: Option<String>,
}

impl CreatePortalPageInput {
    /// Request body for the new page. Roles are sent comma-separated.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set("id", self.id.trim())
            .set("title", self.title.as_str())
            .set("public", self.public)
            .set("internal", self.internal)
            .set("draft", self.draft)
            .set("omit_watcher", self.omit_watcher)
            .set("category", self.category.as_deref().unwrap_or("custom"))
            .set("use_seo_script", self.use_seo_script)
            .set_opt("short_description", self.short_description.clone())
            .set_opt("css", self.css.clone())
            .set_list("roles", self.roles.as_deref())
            .set_opt("dynamic_title_structure", self.dynamic_title_structure.clone())
            .set_opt("seo_script", self.seo_script.clone())
            .set_opt(
                "human_readable_url_structure",
                self.human_readable_url_structure.clone(),
            )
    }
}

/// Input parameters for the update_portal_page tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdatePortalPageInput {
    /// Page id or sys_id to update.
    pub page_id: String,

    /// New title.
    #[serde(default)]
    pub title: Option<String>,

    /// New short description.
    #[serde(default)]
    pub short_description: Option<String>,

    /// New CSS.
    #[serde(default)]
    pub css: Option<String>,

    /// New public setting.
    #[serde(default)]
    pub public: Option<bool>,

    /// New roles list (replaces the current one).
    #[serde(default)]
    pub roles: Option<Vec<String>>,

    /// New internal setting.
    #[serde(default)]
    pub internal: Option<bool>,

    /// New draft setting.
    #[serde(default)]
    pub draft: Option<bool>,

    /// New omit-watcher setting.
    #[serde(default)]
    pub omit_watcher: Option<bool>,

    /// New dynamic title structure.
    #[serde(default)]
    pub dynamic_title_structure: Option<String>,

    /// New category.
    #[serde(default)]
    pub category: Option<String>,

    /// New SEO script usage.
    #[serde(default)]
    pub use_seo_script: Option<bool>,

    /// New SEO script sys_id.
    #[serde(default)]
    pub seo_script: Option<String>,

    /// New human readable URL structure.
    #[serde(default)]
    pub human_readable_url_structure: Option<String>,
}

impl UpdatePortalPageInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set_opt("title", self.title.clone())
            .set_opt("short_description", self.short_description.clone())
            .set_opt("css", self.css.clone())
            .set_opt("public", self.public)
            .set_list("roles", self.roles.as_deref())
            .set_opt("internal", self.internal)
            .set_opt("draft", self.draft)
            .set_opt("omit_watcher", self.omit_watcher)
            .set_opt("dynamic_title_structure", self.dynamic_title_structure.clone())
            .set_opt("category", self.category.clone())
            .set_opt("use_seo_script", self.use_seo_script)
            .set_opt("seo_script", self.seo_script.clone())
            .set_opt(
                "human_readable_url_structure",
                self.human_readable_url_structure.clone(),
            )
    }
}

/// Input parameters for the list_portal_pages tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListPortalPagesInput {
    /// Maximum number of pages to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by category.
    #[serde(default)]
    pub category: Option<String>,

    /// Filter by public status.
    #[serde(default)]
    pub public: Option<bool>,

    /// Filter by draft status.
    #[serde(default)]
    pub draft: Option<bool>,

    /// Filter by internal status.
    #[serde(default)]
    pub internal: Option<bool>,

    /// Additional encoded query.
    #[serde(default)]
    pub query: Option<String>,
}

/// Input parameters for the get_portal_page tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetPortalPageInput {
    /// Page id or sys_id.
    pub page_id: String,
}

/// Input parameters for the delete_portal_page tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeletePortalPageInput {
    /// Page id or sys_id.
    pub page_id: String,
}

/// Input parameters for the clone_portal_page tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ClonePortalPageInput {
    /// Source page id or sys_id.
    pub source_page_id: String,

    /// New unique id for the cloned page.
    pub new_page_id: String,

    /// Title for the cloned page.
    pub new_title: String,

    /// Short description for the clone (default: the source's).
    #[serde(default)]
    pub new_short_description: Option<String>,

    /// Copy the source CSS (default: true).
    #[serde(default = "default_true")]
    pub copy_css: bool,

    /// Copy the source roles (default: true).
    #[serde(default = "default_true")]
    pub copy_roles: bool,
}

/// Creates a portal page.
pub async fn create_portal_page(client: &SnowClient, input: CreatePortalPageInput) -> ToolResponse {
    table::create(client, &PAGES, input.to_body()).await
}

/// Updates a portal page.
pub async fn update_portal_page(client: &SnowClient, input: UpdatePortalPageInput) -> ToolResponse {
    table::update(client, &PAGES, &input.page_id, input.to_body()).await
}

/// Lists portal pages.
pub async fn list_portal_pages(client: &SnowClient, input: ListPortalPagesInput) -> ToolResponse {
    let filter = EncodedQuery::new()
        .equals_opt("category", input.category.as_deref())
        .flag("public", input.public)
        .flag("draft", input.draft)
        .flag("internal", input.internal)
        .raw(input.query.as_deref());
    table::list(client, &PAGES, Page::new(input.limit, input.offset), filter).await
}

/// Gets a portal page by id or sys_id.
pub async fn get_portal_page(client: &SnowClient, input: GetPortalPageInput) -> ToolResponse {
    table::get(client, &PAGES, &input.page_id).await
}

/// Deletes a portal page.
pub async fn delete_portal_page(client: &SnowClient, input: DeletePortalPageInput) -> ToolResponse {
    table::delete(client, &PAGES, &input.page_id).await
}

/// Copies a portal page. The clone is always created as a draft.
///
/// Only the page record is copied; its containers are left behind.
pub async fn clone_portal_page(client: &SnowClient, input: ClonePortalPageInput) -> ToolResponse {
    table::clone_record(client, &PAGES, &input.source_page_id, |source| {
        let mut body = RecordBody::new()
            .set("id", input.new_page_id.trim())
            .set("title", input.new_title.as_str())
            .set(
                "short_description",
                input
                    .new_short_description
                    .clone()
                    .or_else(|| text(source, "short_description"))
                    .unwrap_or_default(),
            )
            .set(
                "category",
                text(source, "category").unwrap_or_else(|| "custom".to_string()),
            )
            .set("public", flag(source, "public").unwrap_or(false))
            .set("internal", flag(source, "internal").unwrap_or(false))
            .set("draft", true)
            .set("omit_watcher", flag(source, "omit_watcher").unwrap_or(false))
            .set(
                "use_seo_script",
                flag(source, "use_seo_script").unwrap_or(false),
            )
            .set_opt("dynamic_title_structure", text(source, "dynamic_title_structure"))
            .set_opt(
                "human_readable_url_structure",
                text(source, "human_readable_url_structure"),
            )
            .set_opt("seo_script", text(source, "seo_script"));

        if input.copy_css {
            body = body.set_opt("css", text(source, "css"));
        }
        if input.copy_roles {
            body = body.set_opt("roles", text(source, "roles"));
        }
        Ok(body)
    })
    .await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("portal_page")
        .operation(
            "create_portal_page",
            "Create a Service Portal page. The id must be unique; category defaults to 'custom'.",
        )
        .operation(
            "update_portal_page",
            "Update a Service Portal page by id or sys_id. Only the fields provided are changed.",
        )
        .undocumented("list_portal_pages")
        .operation(
            "get_portal_page",
            "Get a Service Portal page by its id (e.g. 'index') or sys_id.",
        )
        .undocumented("delete_portal_page")
        .operation(
            "clone_portal_page",
            "Copy a Service Portal page under a new id and title. The copy is created as a draft.",
        )
        .params::<CreatePortalPageInput>()
        .params::<UpdatePortalPageInput>()
        .params::<ListPortalPagesInput>()
        .params::<GetPortalPageInput>()
        .params::<DeletePortalPageInput>()
        .params::<ClonePortalPageInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_create_body_joins_roles() {
        let input: CreatePortalPageInput = serde_json::from_value(json!({
            "id": "my_page",
            "title": "My Page",
            "roles": ["itil", "admin"]
        }))
        .unwrap();
        let body = input.to_body();
        assert_eq!(body.get("roles"), Some(&json!("itil,admin")));
        assert_eq!(body.get("category"), Some(&json!("custom")));
        assert_eq!(body.get("draft"), Some(&json!(false)));
        assert!(body.get("css").is_none());
    }

    #[test]
    fn test_clone_copies_by_default() {
        let input: ClonePortalPageInput = serde_json::from_value(json!({
            "source_page_id": "index",
            "new_page_id": "index_v2",
            "new_title": "Home v2"
        }))
        .unwrap();
        assert!(input.copy_css);
        assert!(input.copy_roles);
    }

    #[test]
    fn test_pages_use_id_as_alternate_key() {
        assert_eq!(PAGES.alternate_key, Some("id"));
    }
}
