//! Application navigator menus (`sys_app_application`) and their modules
//! (`sys_app_module`).
//!
//! Menus may be addressed by title as well as sys_id, both directly and as
//! the parent of a module.

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use super::table::{self, Page, TableSpec};
use super::{default_limit, default_true, failure};
use crate::models::{EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Application menus.
pub const MENUS: TableSpec = TableSpec {
    table: "sys_app_application",
    label: "application menu",
    plural: "application menus",
    collection: "menus",
    fields: &[
        "sys_id",
        "title",
        "name",
        "description",
        "active",
        "category",
        "roles",
        "order",
        "hint",
        "device_type",
        "view_name",
        "sys_overrides",
        "sys_domain",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "title",
    alternate_key: Some("title"),
};

/// Modules (navigator entries) of a menu.
pub const MODULES: TableSpec = TableSpec {
    table: "sys_app_module",
    label: "application module",
    plural: "application modules",
    collection: "modules",
    fields: &[
        "sys_id",
        "title",
        "application",
        "name",
        "link_type",
        "order",
        "roles",
        "active",
        "filter",
        "query",
        "hint",
        "window_name",
        "view_name",
        "mobile_title",
        "mobile_view_name",
        "device_type",
        "uncancelable",
        "override_menu_roles",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "title",
    alternate_key: None,
};

fn default_device_type() -> String {
    "browser".to_string()
}

fn default_domain() -> String {
    "global".to_string()
}

fn default_domain_path() -> String {
    "/".to_string()
}

fn default_link_type() -> String {
    "LIST".to_string()
}

fn default_mobile_view() -> String {
    "Mobile".to_string()
}

/// Menu settings shared by create and update.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct MenuSettings {
    /// Internal name.
    #[serde(default)]
    pub name: Option<String>,

    /// Description of the menu.
    #[serde(default)]
    pub description: Option<String>,

    /// Category sys_id.
    #[serde(default)]
    pub category: Option<String>,

    /// Roles required to see the menu.
    #[serde(default)]
    pub roles: Option<Vec<String>>,

    /// Display order; lower first.
    #[serde(default)]
    pub order: Option<f64>,

    /// Tooltip text.
    #[serde(default)]
    pub hint: Option<String>,

    /// View name.
    #[serde(default)]
    pub view_name: Option<String>,

    /// Sys_id of the menu this one overrides.
    #[serde(default)]
    pub sys_overrides: Option<String>,
}

impl MenuSettings {
    fn apply(&self, body: RecordBody) -> RecordBody {
        body.set_opt("name", self.name.clone())
            .set_opt("description", self.description.clone())
            .set_opt("category", self.category.clone())
            .set_list("roles", self.roles.as_deref())
            .set_opt("order", self.order)
            .set_opt("hint", self.hint.clone())
            .set_opt("view_name", self.view_name.clone())
            .set_opt("sys_overrides", self.sys_overrides.clone())
    }
}

/// Input parameters for the create_application_menu tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateApplicationMenuInput {
    /// Title shown in the navigator.
    pub title: String,

    /// Whether the menu is active (default: true).
    #[serde(default = "default_true")]
    pub active: bool,

    /// Device type (default: "browser").
    #[serde(default = "default_device_type")]
    pub device_type: String,

    /// Domain (default: "global").
    #[serde(default = "default_domain")]
    pub sys_domain: String,

    /// Domain path (default: "/").
    #[serde(default = "default_domain_path")]
    pub sys_domain_path: String,

    #[serde(flatten)]
    pub settings: MenuSettings,
}

impl CreateApplicationMenuInput {
    /// Request body.
    pub fn to_body(&self) -> RecordBody {
        let body = RecordBody::new()
            .set("title", self.title.as_str())
            .set("active", self.active)
            .set("device_type", self.device_type.as_str())
            .set("sys_domain", self.sys_domain.as_str())
            .set("sys_domain_path", self.sys_domain_path.as_str());
        self.settings.apply(body)
    }
}

/// Input parameters for the update_application_menu tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateApplicationMenuInput {
    /// Menu sys_id or title.
    pub menu_id: String,

    /// New title.
    #[serde(default)]
    pub title: Option<String>,

    /// New active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// New device type.
    #[serde(default)]
    pub device_type: Option<String>,

    #[serde(flatten)]
    pub settings: MenuSettings,
}

impl UpdateApplicationMenuInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        let body = RecordBody::new()
            .set_opt("title", self.title.clone())
            .set_opt("active", self.active)
            .set_opt("device_type", self.device_type.clone());
        self.settings.apply(body)
    }
}

/// Input parameters for the list_application_menus tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListApplicationMenusInput {
    /// Maximum number of menus to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// Filter by category sys_id.
    #[serde(default)]
    pub category: Option<String>,

    /// Filter by device type.
    #[serde(default)]
    pub device_type: Option<String>,

    /// Title contains this text.
    #[serde(default)]
    pub title: Option<String>,

    /// Additional encoded query.
    #[serde(default)]
    pub query: Option<String>,
}

/// Input parameters for the get_application_menu tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetApplicationMenuInput {
    /// Menu sys_id or title.
    pub menu_id: String,
}

/// Input parameters for the delete_application_menu tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteApplicationMenuInput {
    /// Menu sys_id or title.
    pub menu_id: String,
}

/// Module settings shared by create and update.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ModuleSettings {
    /// Table name, for list and form modules.
    #[serde(default)]
    pub name: Option<String>,

    /// Display order.
    #[serde(default)]
    pub order: Option<i64>,

    /// Comma-separated roles required to see the module.
    #[serde(default)]
    pub roles: Option<String>,

    /// Filter conditions, for list modules.
    #[serde(default)]
    pub filter: Option<String>,

    /// Additional query arguments.
    #[serde(default)]
    pub query: Option<String>,

    /// Tooltip text.
    #[serde(default)]
    pub hint: Option<String>,

    /// Window the link opens in.
    #[serde(default)]
    pub window_name: Option<String>,

    /// View name, for list and form modules.
    #[serde(default)]
    pub view_name: Option<String>,

    /// Title on mobile.
    #[serde(default)]
    pub mobile_title: Option<String>,

    /// Device type.
    #[serde(default)]
    pub device_type: Option<String>,
}

impl ModuleSettings {
    fn apply(&self, body: RecordBody) -> RecordBody {
        body.set_opt("name", self.name.clone())
            .set_opt("order", self.order)
            .set_opt("roles", self.roles.clone())
            .set_opt("filter", self.filter.clone())
            .set_opt("query", self.query.clone())
            .set_opt("hint", self.hint.clone())
            .set_opt("window_name", self.window_name.clone())
            .set_opt("view_name", self.view_name.clone())
            .set_opt("mobile_title", self.mobile_title.clone())
            .set_opt("device_type", self.device_type.clone())
    }
}

/// Input parameters for the create_app_module tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateAppModuleInput {
    /// Title shown in the navigator.
    pub title: String,

    /// Parent menu sys_id or title.
    pub application: String,

    /// Link type: "LIST" (default), "FORM", "HOMEPAGE"...
    #[serde(default = "default_link_type")]
    pub link_type: String,

    /// Whether the module is active (default: true).
    #[serde(default = "default_true")]
    pub active: bool,

    /// View name on mobile (default: "Mobile").
    #[serde(default = "default_mobile_view")]
    pub mobile_view_name: String,

    /// Whether the module is uncancelable (default: false).
    #[serde(default)]
    pub uncancelable: bool,

    /// Ignore the menu's roles (default: false).
    #[serde(default)]
    pub override_menu_roles: bool,

    #[serde(flatten)]
    pub settings: ModuleSettings,
}

impl CreateAppModuleInput {
    /// Request body for a module under the menu `application_sys_id`.
    pub fn to_body(&self, application_sys_id: &str) -> RecordBody {
        let body = RecordBody::new()
            .set("title", self.title.as_str())
            .set("application", application_sys_id)
            .set("link_type", self.link_type.as_str())
            .set("active", self.active)
            .set("mobile_view_name", self.mobile_view_name.as_str())
            .set("uncancelable", self.uncancelable)
            .set("override_menu_roles", self.override_menu_roles);
        self.settings.apply(body)
    }
}

/// Input parameters for the update_app_module tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateAppModuleInput {
    /// Module sys_id.
    pub module_id: String,

    /// New title.
    #[serde(default)]
    pub title: Option<String>,

    /// New parent menu sys_id.
    #[serde(default)]
    pub application: Option<String>,

    /// New link type.
    #[serde(default)]
    pub link_type: Option<String>,

    /// New active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// New mobile view name.
    #[serde(default)]
    pub mobile_view_name: Option<String>,

    /// New uncancelable flag.
    #[serde(default)]
    pub uncancelable: Option<bool>,

    /// New override flag.
    #[serde(default)]
    pub override_menu_roles: Option<bool>,

    #[serde(flatten)]
    pub settings: ModuleSettings,
}

impl UpdateAppModuleInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        let body = RecordBody::new()
            .set_opt("title", self.title.clone())
            .set_opt("application", self.application.clone())
            .set_opt("link_type", self.link_type.clone())
            .set_opt("active", self.active)
            .set_opt("mobile_view_name", self.mobile_view_name.clone())
            .set_opt("uncancelable", self.uncancelable)
            .set_opt("override_menu_roles", self.override_menu_roles);
        self.settings.apply(body)
    }
}

/// Input parameters for the list_app_modules tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListAppModulesInput {
    /// Maximum number of modules to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by parent menu sys_id.
    #[serde(default)]
    pub application: Option<String>,

    /// Filter by active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// Filter by table name.
    #[serde(default)]
    pub name: Option<String>,

    /// Filter by link type.
    #[serde(default)]
    pub link_type: Option<String>,

    /// Roles contain this text.
    #[serde(default)]
    pub roles: Option<String>,

    /// Additional encoded query.
    #[serde(default)]
    pub query: Option<String>,
}

impl ListAppModulesInput {
    fn filter(&self) -> EncodedQuery {
        EncodedQuery::new()
            .equals_opt("application", self.application.as_deref())
            .flag("active", self.active)
            .equals_opt("name", self.name.as_deref())
            .equals_opt("link_type", self.link_type.as_deref())
            .contains("roles", self.roles.as_deref())
            .raw(self.query.as_deref())
    }
}

/// Input parameters for the get_app_module tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetAppModuleInput {
    /// Module sys_id.
    pub module_id: String,
}

/// Input parameters for the delete_app_module tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteAppModuleInput {
    /// Module sys_id.
    pub module_id: String,
}

/// Creates an application menu.
pub async fn create_application_menu(
    client: &SnowClient,
    input: CreateApplicationMenuInput,
) -> ToolResponse {
    table::create(client, &MENUS, input.to_body()).await
}

/// Updates an application menu.
pub async fn update_application_menu(
    client: &SnowClient,
    input: UpdateApplicationMenuInput,
) -> ToolResponse {
    table::update(client, &MENUS, &input.menu_id, input.to_body()).await
}

/// Lists application menus.
pub async fn list_application_menus(
    client: &SnowClient,
    input: ListApplicationMenusInput,
) -> ToolResponse {
    let filter = EncodedQuery::new()
        .flag("active", input.active)
        .equals_opt("category", input.category.as_deref())
        .equals_opt("device_type", input.device_type.as_deref())
        .contains("title", input.title.as_deref())
        .raw(input.query.as_deref());
    table::list(client, &MENUS, Page::new(input.limit, input.offset), filter).await
}

/// Gets one application menu by sys_id or title.
pub async fn get_application_menu(
    client: &SnowClient,
    input: GetApplicationMenuInput,
) -> ToolResponse {
    table::get(client, &MENUS, &input.menu_id).await
}

/// Deletes an application menu.
pub async fn delete_application_menu(
    client: &SnowClient,
    input: DeleteApplicationMenuInput,
) -> ToolResponse {
    table::delete(client, &MENUS, &input.menu_id).await
}

/// Creates a module under a menu given by sys_id or title.
pub async fn create_app_module(client: &SnowClient, input: CreateAppModuleInput) -> ToolResponse {
    let application = match table::resolve_sys_id(client, &MENUS, input.application.trim()).await {
        Ok(sys_id) => sys_id,
        Err(e) => return failure(client, "Create application module", &e),
    };
    table::create(client, &MODULES, input.to_body(&application)).await
}

/// Updates a module.
pub async fn update_app_module(client: &SnowClient, input: UpdateAppModuleInput) -> ToolResponse {
    table::update(client, &MODULES, &input.module_id, input.to_body()).await
}

/// Lists modules.
pub async fn list_app_modules(client: &SnowClient, input: ListAppModulesInput) -> ToolResponse {
    let page = Page::new(input.limit, input.offset);
    table::list(client, &MODULES, page, input.filter()).await
}

/// Gets one module.
pub async fn get_app_module(client: &SnowClient, input: GetAppModuleInput) -> ToolResponse {
    table::get(client, &MODULES, &input.module_id).await
}

/// Deletes a module.
pub async fn delete_app_module(client: &SnowClient, input: DeleteAppModuleInput) -> ToolResponse {
    table::delete(client, &MODULES, &input.module_id).await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("menu")
        .operation(
            "create_application_menu",
            "Create an application menu in the navigator.",
        )
        .undocumented("update_application_menu")
        .operation(
            "list_application_menus",
            "List application menus, filtered by active flag, category, device type or title.",
        )
        .operation(
            "get_application_menu",
            "Get an application menu by sys_id or title.",
        )
        .undocumented("delete_application_menu")
        .operation(
            "create_app_module",
            "Create a navigator module under an application menu given by sys_id or title.",
        )
        .undocumented("update_app_module")
        .operation(
            "list_app_modules",
            "List navigator modules, filtered by menu, table, link type or roles.",
        )
        .undocumented("get_app_module")
        .undocumented("delete_app_module")
        .params::<CreateApplicationMenuInput>()
        .params::<UpdateApplicationMenuInput>()
        .params::<ListApplicationMenusInput>()
        .params::<GetApplicationMenuInput>()
        .params::<DeleteApplicationMenuInput>()
        .params::<CreateAppModuleInput>()
        .params::<UpdateAppModuleInput>()
        .params::<ListAppModulesInput>()
        .params::<GetAppModuleInput>()
        .params::<DeleteAppModuleInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_menu_roles_are_joined() {
        let input: CreateApplicationMenuInput = serde_json::from_value(json!({
            "title": "Facilities",
            "roles": ["itil", "facilities_admin"]
        }))
        .unwrap();
        let body = input.to_body();
        assert_eq!(body.get("roles"), Some(&json!("itil,facilities_admin")));
        assert_eq!(body.get("device_type"), Some(&json!("browser")));
        assert_eq!(body.get("sys_domain"), Some(&json!("global")));
    }

    #[test]
    fn test_module_body_uses_resolved_menu() {
        let input: CreateAppModuleInput = serde_json::from_value(json!({
            "title": "Open requests",
            "application": "Facilities",
            "name": "u_facility_request",
            "filter": "active=true"
        }))
        .unwrap();
        let body = input.to_body("menu-sys-id");
        assert_eq!(body.get("application"), Some(&json!("menu-sys-id")));
        assert_eq!(body.get("link_type"), Some(&json!("LIST")));
        assert_eq!(body.get("filter"), Some(&json!("active=true")));
    }

    #[test]
    fn test_module_roles_filter_is_contains() {
        let input: ListAppModulesInput =
            serde_json::from_value(json!({"roles": "itil", "active": true})).unwrap();
        assert_eq!(
            input.filter().build().as_deref(),
            Some("active=true^rolesLIKEitil")
        );
    }
}
