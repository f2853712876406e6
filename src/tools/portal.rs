//! Service Portal definitions (`sp_portal`).

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use super::default_limit;
use super::table::{self, Page, TableSpec};
use crate::models::{EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Portals, addressed by sys_id or URL suffix.
pub const PORTALS: TableSpec = TableSpec {
    table: "sp_portal",
    label: "portal",
    plural: "portals",
    collection: "portals",
    fields: &[
        "sys_id",
        "title",
        "url_suffix",
        "homepage",
        "login_page",
        "notfound_page",
        "theme",
        "dark_theme",
        "sc_catalog",
        "kb_knowledge_base",
        "logo",
        "icon",
        "sp_rectangle_menu",
        "default",
        "inactive",
        "hide_portal_name",
        "rtl_enabled",
        "enable_favorites",
        "enable_ais",
        "enable_certificate_based_authentication",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "title",
    alternate_key: Some("url_suffix"),
};

/// Pages, theme and content sources of a portal.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct PortalLinks {
    /// Home page sys_id.
    #[serde(default)]
    pub homepage: Option<String>,

    /// Login page sys_id.
    #[serde(default)]
    pub login_page: Option<String>,

    /// Not-found page sys_id.
    #[serde(default)]
    pub notfound_page: Option<String>,

    /// Theme sys_id.
    #[serde(default)]
    pub theme: Option<String>,

    /// Dark theme sys_id.
    #[serde(default)]
    pub dark_theme: Option<String>,

    /// Service catalog sys_id.
    #[serde(default)]
    pub sc_catalog: Option<String>,

    /// Knowledge base sys_id.
    #[serde(default)]
    pub kb_knowledge_base: Option<String>,

    /// Logo image.
    #[serde(default)]
    pub logo: Option<String>,

    /// Icon image.
    #[serde(default)]
    pub icon: Option<String>,

    /// Main menu sys_id.
    #[serde(default)]
    pub sp_rectangle_menu: Option<String>,
}

impl PortalLinks {
    fn apply(&self, body: RecordBody) -> RecordBody {
        body.set_opt("homepage", self.homepage.clone())
            .set_opt("login_page", self.login_page.clone())
            .set_opt("notfound_page", self.notfound_page.clone())
            .set_opt("theme", self.theme.clone())
            .set_opt("dark_theme", self.dark_theme.clone())
            .set_opt("sc_catalog", self.sc_catalog.clone())
            .set_opt("kb_knowledge_base", self.kb_knowledge_base.clone())
            .set_opt("logo", self.logo.clone())
            .set_opt("icon", self.icon.clone())
            .set_opt("sp_rectangle_menu", self.sp_rectangle_menu.clone())
    }
}

/// Input parameters for the create_portal tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreatePortalInput {
    /// Portal title.
    pub title: String,

    /// Unique URL suffix (e.g. "hr" for /hr).
    pub url_suffix: String,

    #[serde(flatten)]
    pub links: PortalLinks,

    /// Make this the default portal (default: false).
    #[serde(default, rename = "default")]
    pub default_portal: bool,

    /// Create the portal inactive (default: false).
    #[serde(default)]
    pub inactive: bool,

    /// Hide the portal name in the header (default: false).
    #[serde(default)]
    pub hide_portal_name: bool,

    /// Support right-to-left languages (default: false).
    #[serde(default)]
    pub rtl_enabled: bool,

    /// Enable favorites (default: false).
    #[serde(default)]
    pub enable_favorites: bool,

    /// Enable AI Search (default: false).
    #[serde(default)]
    pub enable_ais: bool,

    /// Enable certificate-based authentication (default: false).
    #[serde(default)]
    pub enable_certificate_based_authentication: bool,
}

impl CreatePortalInput {
    /// Request body; flags are always sent.
    pub fn to_body(&self) -> RecordBody {
        let body = RecordBody::new()
            .set("title", self.title.as_str())
            .set("url_suffix", self.url_suffix.trim())
            .set("default", self.default_portal)
            .set("inactive", self.inactive)
            .set("hide_portal_name", self.hide_portal_name)
            .set("rtl_enabled", self.rtl_enabled)
            .set("enable_favorites", self.enable_favorites)
            .set("enable_ais", self.enable_ais)
            .set(
                "enable_certificate_based_authentication",
                self.enable_certificate_based_authentication,
            );
        self.links.apply(body)
    }
}

/// Input parameters for the update_portal tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdatePortalInput {
    /// Portal sys_id or URL suffix.
    pub portal_id: String,

    /// New title.
    #[serde(default)]
    pub title: Option<String>,

    /// New URL suffix.
    #[serde(default)]
    pub url_suffix: Option<String>,

    #[serde(flatten)]
    pub links: PortalLinks,

    /// New default portal status.
    #[serde(default, rename = "default")]
    pub default_portal: Option<bool>,

    /// New inactive status.
    #[serde(default)]
    pub inactive: Option<bool>,

    /// New hide portal name setting.
    #[serde(default)]
    pub hide_portal_name: Option<bool>,

    /// New right-to-left setting.
    #[serde(default)]
    pub rtl_enabled: Option<bool>,

    /// New favorites setting.
    #[serde(default)]
    pub enable_favorites: Option<bool>,

    /// New AI Search setting.
    #[serde(default)]
    pub enable_ais: Option<bool>,

    /// New certificate-based authentication setting.
    #[serde(default)]
    pub enable_certificate_based_authentication: Option<bool>,
}

impl UpdatePortalInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        let body = RecordBody::new()
            .set_opt("title", self.title.clone())
            .set_opt("url_suffix", self.url_suffix.clone())
            .set_opt("default", self.default_portal)
            .set_opt("inactive", self.inactive)
            .set_opt("hide_portal_name", self.hide_portal_name)
            .set_opt("rtl_enabled", self.rtl_enabled)
            .set_opt("enable_favorites", self.enable_favorites)
            .set_opt("enable_ais", self.enable_ais)
            .set_opt(
                "enable_certificate_based_authentication",
                self.enable_certificate_based_authentication,
            );
        self.links.apply(body)
    }
}

/// Input parameters for the list_portals tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListPortalsInput {
    /// Maximum number of portals to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Only active (true) or only inactive (false) portals.
    #[serde(default)]
    pub active: Option<bool>,

    /// Filter by default portal status.
    #[serde(default, rename = "default")]
    pub default_portal: Option<bool>,

    /// Additional encoded query.
    #[serde(default)]
    pub query: Option<String>,
}

impl ListPortalsInput {
    fn filter(&self) -> EncodedQuery {
        // An unset inactive flag counts as active.
        let active = match self.active {
            Some(true) => Some("inactive=false^ORinactiveISEMPTY"),
            Some(false) => Some("inactive=true"),
            None => None,
        };
        EncodedQuery::new()
            .raw(active)
            .flag("default", self.default_portal)
            .raw(self.query.as_deref())
    }
}

/// Input parameters for the get_portal tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetPortalInput {
    /// Portal sys_id or URL suffix.
    pub portal_id: String,
}

/// Input parameters for the delete_portal tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeletePortalInput {
    /// Portal sys_id or URL suffix.
    pub portal_id: String,
}

/// Creates a portal.
pub async fn create_portal(client: &SnowClient, input: CreatePortalInput) -> ToolResponse {
    table::create(client, &PORTALS, input.to_body()).await
}

/// Updates a portal.
pub async fn update_portal(client: &SnowClient, input: UpdatePortalInput) -> ToolResponse {
    table::update(client, &PORTALS, &input.portal_id, input.to_body()).await
}

/// Lists portals.
pub async fn list_portals(client: &SnowClient, input: ListPortalsInput) -> ToolResponse {
    let page = Page::new(input.limit, input.offset);
    table::list(client, &PORTALS, page, input.filter()).await
}

/// Gets one portal by sys_id or URL suffix.
pub async fn get_portal(client: &SnowClient, input: GetPortalInput) -> ToolResponse {
    table::get(client, &PORTALS, &input.portal_id).await
}

/// Deletes a portal.
pub async fn delete_portal(client: &SnowClient, input: DeletePortalInput) -> ToolResponse {
    table::delete(client, &PORTALS, &input.portal_id).await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("portal")
        .operation(
            "create_portal",
            "Create a Service Portal with its URL suffix, pages, theme and content sources.",
        )
        .undocumented("update_portal")
        .operation(
            "list_portals",
            "List Service Portals, filtered by active or default status.",
        )
        .operation("get_portal", "Get a Service Portal by sys_id or URL suffix.")
        .undocumented("delete_portal")
        .params::<CreatePortalInput>()
        .params::<UpdatePortalInput>()
        .params::<ListPortalsInput>()
        .params::<GetPortalInput>()
        .params::<DeletePortalInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_create_sends_flags_and_links() {
        let input: CreatePortalInput = serde_json::from_value(json!({
            "title": "HR Portal",
            "url_suffix": "hr",
            "theme": "theme-1",
            "default": true
        }))
        .unwrap();
        let body = input.to_body();
        assert_eq!(body.get("default"), Some(&json!(true)));
        assert_eq!(body.get("inactive"), Some(&json!(false)));
        assert_eq!(body.get("theme"), Some(&json!("theme-1")));
        assert!(body.get("homepage").is_none());
    }

    #[test]
    fn test_active_filter_counts_empty_inactive_as_active() {
        let input: ListPortalsInput =
            serde_json::from_value(json!({"active": true, "default": false})).unwrap();
        assert_eq!(
            input.filter().build().as_deref(),
            Some("inactive=false^ORinactiveISEMPTY^default=false")
        );
    }
}
