//! MCP server for snow-mcp.
//!
//! [`SnowServer`] implements the rmcp `ServerHandler` trait. Each tool
//! method logs the call, delegates to the matching function in
//! [`crate::tools`] and renders the resulting envelope as JSON text.

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars::{self, JsonSchema},
    tool, tool_handler, tool_router, ServerHandler,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::ToolResponse;
use crate::registry::ToolRegistry;
use crate::snow_client::SnowClient;
use crate::tools::{
    self, acl, assignment_rule, atf, atf_test, attachment, catalog, catalog_availability,
    catalog_client_script, catalog_variable, connected_content, dictionary, elevation,
    email_layout, email_template, image, inbound_email, knowledge, menu, notification, portal,
    portal_association, portal_layout, portal_page, quick_link, table_choice, taxonomy_content,
    ui_action, ui_policy, user_role, widget_instance,
};

/// Input parameters for the list_tool_catalog tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListToolCatalogInput {
    /// Only tools whose name, module or description contains this text.
    #[serde(default)]
    pub keyword: Option<String>,

    /// Include each tool's input schema (default: false).
    #[serde(default)]
    pub include_schema: bool,
}

/// The snow-mcp MCP server.
#[derive(Clone)]
pub struct SnowServer {
    /// ServiceNow client shared by every tool call.
    client: SnowClient,
    /// Catalog of tool names, descriptions and schemas.
    registry: Arc<ToolRegistry>,
    /// Tool router for MCP tool dispatch.
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl SnowServer {
    /// Creates a server around `client` and builds the tool catalog.
    pub fn new(client: SnowClient) -> Self {
        Self {
            client,
            registry: Arc::new(ToolRegistry::discover(tools::listings())),
            tool_router: Self::tool_router(),
        }
    }

    /// The tool catalog.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// A simple ping tool to verify the server is running.
    #[tool(description = "Test connectivity to the snow-mcp server. Returns 'pong' if the server is running correctly.")]
    fn ping(&self) -> String {
        tracing::debug!("ping tool called");
        "pong".to_string()
    }

    #[tool(description = "List the available ServiceNow tools with their modules and descriptions, optionally filtered by keyword.")]
    async fn list_tool_catalog(
        &self,
        Parameters(input): Parameters<ListToolCatalogInput>,
    ) -> String {
        tracing::debug!(keyword = ?input.keyword, "list_tool_catalog tool called");
        self.catalog(&input).render()
    }

    // ========================================================================
    // ATF test steps
    // ========================================================================

    #[tool(description = "Create an ATF test step. The test and step_config sys_ids are required.")]
    async fn create_atf_test_step(
        &self,
        Parameters(input): Parameters<atf::CreateAtfTestStepInput>,
    ) -> String {
        tracing::debug!("create_atf_test_step tool called");
        atf::create_atf_test_step(&self.client, input).await.render()
    }

    #[tool(description = "Update fields of an ATF test step. Only the fields provided are changed.")]
    async fn update_atf_test_step(
        &self,
        Parameters(input): Parameters<atf::UpdateAtfTestStepInput>,
    ) -> String {
        tracing::debug!("update_atf_test_step tool called");
        atf::update_atf_test_step(&self.client, input).await.render()
    }

    #[tool(description = "List ATF test steps, filtered by test, step config, table, active flag or search text.")]
    async fn list_atf_test_steps(
        &self,
        Parameters(input): Parameters<atf::ListAtfTestStepsInput>,
    ) -> String {
        tracing::debug!("list_atf_test_steps tool called");
        atf::list_atf_test_steps(&self.client, input).await.render()
    }

    #[tool(description = "Get an ATF test step by sys_id.")]
    async fn get_atf_test_step(
        &self,
        Parameters(input): Parameters<atf::GetAtfTestStepInput>,
    ) -> String {
        tracing::debug!("get_atf_test_step tool called");
        atf::get_atf_test_step(&self.client, input).await.render()
    }

    #[tool(description = "Delete an ATF test step by sys_id.")]
    async fn delete_atf_test_step(
        &self,
        Parameters(input): Parameters<atf::DeleteAtfTestStepInput>,
    ) -> String {
        tracing::debug!("delete_atf_test_step tool called");
        atf::delete_atf_test_step(&self.client, input).await.render()
    }

    #[tool(description = "Copy an ATF test step, optionally into another test. The copy is named '<name> (Copy)' unless a new name is given.")]
    async fn clone_atf_test_step(
        &self,
        Parameters(input): Parameters<atf::CloneAtfTestStepInput>,
    ) -> String {
        tracing::debug!("clone_atf_test_step tool called");
        atf::clone_atf_test_step(&self.client, input).await.render()
    }

    #[tool(description = "Set the execution order of a test's steps to 100, 200, 300... following the given sys_id list.")]
    async fn reorder_atf_test_steps(
        &self,
        Parameters(input): Parameters<atf::ReorderAtfTestStepsInput>,
    ) -> String {
        tracing::debug!("reorder_atf_test_steps tool called");
        atf::reorder_atf_test_steps(&self.client, input).await.render()
    }

    // ========================================================================
    // Service catalog
    // ========================================================================

    #[tool(description = "List service catalog items. Only active items unless active=false.")]
    async fn list_catalog_items(
        &self,
        Parameters(input): Parameters<catalog::ListCatalogItemsInput>,
    ) -> String {
        tracing::debug!("list_catalog_items tool called");
        catalog::list_catalog_items(&self.client, input).await.render()
    }

    #[tool(description = "Get a service catalog item including its variables (questions).")]
    async fn get_catalog_item(
        &self,
        Parameters(input): Parameters<catalog::GetCatalogItemInput>,
    ) -> String {
        tracing::debug!("get_catalog_item tool called");
        catalog::get_catalog_item(&self.client, input).await.render()
    }

    #[tool(description = "Create a service catalog item. Name, short_description and category are required.")]
    async fn create_catalog_item(
        &self,
        Parameters(input): Parameters<catalog::CreateCatalogItemInput>,
    ) -> String {
        tracing::debug!("create_catalog_item tool called");
        catalog::create_catalog_item(&self.client, input).await.render()
    }

    #[tool(description = "Update an existing catalog item. Only the fields provided are changed.")]
    async fn update_catalog_item(
        &self,
        Parameters(input): Parameters<catalog::UpdateCatalogItemInput>,
    ) -> String {
        tracing::debug!("update_catalog_item tool called");
        catalog::update_catalog_item(&self.client, input).await.render()
    }

    #[tool(description = "Delete a catalog item by sys_id.")]
    async fn delete_catalog_item(
        &self,
        Parameters(input): Parameters<catalog::DeleteCatalogItemInput>,
    ) -> String {
        tracing::debug!("delete_catalog_item tool called");
        catalog::delete_catalog_item(&self.client, input).await.render()
    }

    #[tool(description = "Move catalog items to another category. Reports partial success.")]
    async fn move_catalog_items(
        &self,
        Parameters(input): Parameters<catalog::MoveCatalogItemsInput>,
    ) -> String {
        tracing::debug!("move_catalog_items tool called");
        catalog::move_catalog_items(&self.client, input).await.render()
    }

    #[tool(description = "List catalog categories, with limit/offset pagination and filters.")]
    async fn list_catalog_categories(
        &self,
        Parameters(input): Parameters<catalog::ListCatalogCategoriesInput>,
    ) -> String {
        tracing::debug!("list_catalog_categories tool called");
        catalog::list_catalog_categories(&self.client, input).await.render()
    }

    #[tool(description = "Create a new catalog category.")]
    async fn create_catalog_category(
        &self,
        Parameters(input): Parameters<catalog::CreateCatalogCategoryInput>,
    ) -> String {
        tracing::debug!("create_catalog_category tool called");
        catalog::create_catalog_category(&self.client, input).await.render()
    }

    #[tool(description = "Update an existing catalog category. Only the fields provided are changed.")]
    async fn update_catalog_category(
        &self,
        Parameters(input): Parameters<catalog::UpdateCatalogCategoryInput>,
    ) -> String {
        tracing::debug!("update_catalog_category tool called");
        catalog::update_catalog_category(&self.client, input).await.render()
    }

    // ========================================================================
    // Catalog UI policies
    // ========================================================================

    #[tool(description = "Create a catalog UI policy for a catalog item or variable set.")]
    async fn create_catalog_ui_policy(
        &self,
        Parameters(input): Parameters<ui_policy::CreateCatalogUiPolicyInput>,
    ) -> String {
        tracing::debug!("create_catalog_ui_policy tool called");
        ui_policy::create_catalog_ui_policy(&self.client, input).await.render()
    }

    #[tool(description = "Update an existing catalog UI policy. Only the fields provided are changed.")]
    async fn update_catalog_ui_policy(
        &self,
        Parameters(input): Parameters<ui_policy::UpdateCatalogUiPolicyInput>,
    ) -> String {
        tracing::debug!("update_catalog_ui_policy tool called");
        ui_policy::update_catalog_ui_policy(&self.client, input).await.render()
    }

    #[tool(description = "List catalog UI policies, filtered by active flag, catalog item, applies-to or search text.")]
    async fn list_catalog_ui_policies(
        &self,
        Parameters(input): Parameters<ui_policy::ListCatalogUiPoliciesInput>,
    ) -> String {
        tracing::debug!("list_catalog_ui_policies tool called");
        ui_policy::list_catalog_ui_policies(&self.client, input).await.render()
    }

    #[tool(description = "Get a catalog UI policy by sys_id.")]
    async fn get_catalog_ui_policy(
        &self,
        Parameters(input): Parameters<ui_policy::GetCatalogUiPolicyInput>,
    ) -> String {
        tracing::debug!("get_catalog_ui_policy tool called");
        ui_policy::get_catalog_ui_policy(&self.client, input).await.render()
    }

    #[tool(description = "Delete a catalog UI policy by sys_id.")]
    async fn delete_catalog_ui_policy(
        &self,
        Parameters(input): Parameters<ui_policy::DeleteCatalogUiPolicyInput>,
    ) -> String {
        tracing::debug!("delete_catalog_ui_policy tool called");
        ui_policy::delete_catalog_ui_policy(&self.client, input).await.render()
    }

    #[tool(description = "Copy a catalog UI policy under a new name.")]
    async fn clone_catalog_ui_policy(
        &self,
        Parameters(input): Parameters<ui_policy::CloneCatalogUiPolicyInput>,
    ) -> String {
        tracing::debug!("clone_catalog_ui_policy tool called");
        ui_policy::clone_catalog_ui_policy(&self.client, input).await.render()
    }

    // ========================================================================
    // Email templates
    // ========================================================================

    #[tool(description = "Create an email template. Name, subject and message_html are required.")]
    async fn create_email_template(
        &self,
        Parameters(input): Parameters<email_template::CreateEmailTemplateInput>,
    ) -> String {
        tracing::debug!("create_email_template tool called");
        email_template::create_email_template(&self.client, input).await.render()
    }

    #[tool(description = "Update an existing email template. Only the fields provided are changed.")]
    async fn update_email_template(
        &self,
        Parameters(input): Parameters<email_template::UpdateEmailTemplateInput>,
    ) -> String {
        tracing::debug!("update_email_template tool called");
        email_template::update_email_template(&self.client, input).await.render()
    }

    #[tool(description = "List email templates, filtered by category, flags, application, content type or name.")]
    async fn list_email_templates(
        &self,
        Parameters(input): Parameters<email_template::ListEmailTemplatesInput>,
    ) -> String {
        tracing::debug!("list_email_templates tool called");
        email_template::list_email_templates(&self.client, input).await.render()
    }

    #[tool(description = "Get an email template by sys_id.")]
    async fn get_email_template(
        &self,
        Parameters(input): Parameters<email_template::GetEmailTemplateInput>,
    ) -> String {
        tracing::debug!("get_email_template tool called");
        email_template::get_email_template(&self.client, input).await.render()
    }

    #[tool(description = "Delete an email template by sys_id.")]
    async fn delete_email_template(
        &self,
        Parameters(input): Parameters<email_template::DeleteEmailTemplateInput>,
    ) -> String {
        tracing::debug!("delete_email_template tool called");
        email_template::delete_email_template(&self.client, input).await.render()
    }

    #[tool(description = "Copy an email template under a new name, optionally with a new subject.")]
    async fn clone_email_template(
        &self,
        Parameters(input): Parameters<email_template::CloneEmailTemplateInput>,
    ) -> String {
        tracing::debug!("clone_email_template tool called");
        email_template::clone_email_template(&self.client, input).await.render()
    }

    // ========================================================================
    // Knowledge taxonomies and topics
    // ========================================================================

    #[tool(description = "Create a knowledge taxonomy. Defaults to the global domain.")]
    async fn create_taxonomy(
        &self,
        Parameters(input): Parameters<knowledge::CreateTaxonomyInput>,
    ) -> String {
        tracing::debug!("create_taxonomy tool called");
        knowledge::create_taxonomy(&self.client, input).await.render()
    }

    #[tool(description = "Update an existing taxonomy. Only the fields provided are changed.")]
    async fn update_taxonomy(
        &self,
        Parameters(input): Parameters<knowledge::UpdateTaxonomyInput>,
    ) -> String {
        tracing::debug!("update_taxonomy tool called");
        knowledge::update_taxonomy(&self.client, input).await.render()
    }

    #[tool(description = "List taxonomies, with limit/offset pagination and filters.")]
    async fn list_taxonomies(
        &self,
        Parameters(input): Parameters<knowledge::ListTaxonomiesInput>,
    ) -> String {
        tracing::debug!("list_taxonomies tool called");
        knowledge::list_taxonomies(&self.client, input).await.render()
    }

    #[tool(description = "Get a taxonomy by sys_id.")]
    async fn get_taxonomy(
        &self,
        Parameters(input): Parameters<knowledge::GetTaxonomyInput>,
    ) -> String {
        tracing::debug!("get_taxonomy tool called");
        knowledge::get_taxonomy(&self.client, input).await.render()
    }

    #[tool(description = "Delete a taxonomy by sys_id.")]
    async fn delete_taxonomy(
        &self,
        Parameters(input): Parameters<knowledge::DeleteTaxonomyInput>,
    ) -> String {
        tracing::debug!("delete_taxonomy tool called");
        knowledge::delete_taxonomy(&self.client, input).await.render()
    }

    #[tool(description = "Copy a taxonomy under a new name. Its topics are not copied.")]
    async fn clone_taxonomy(
        &self,
        Parameters(input): Parameters<knowledge::CloneTaxonomyInput>,
    ) -> String {
        tracing::debug!("clone_taxonomy tool called");
        knowledge::clone_taxonomy(&self.client, input).await.render()
    }

    #[tool(description = "Create a topic in a taxonomy, optionally under a parent topic.")]
    async fn create_topic(
        &self,
        Parameters(input): Parameters<knowledge::CreateTopicInput>,
    ) -> String {
        tracing::debug!("create_topic tool called");
        knowledge::create_topic(&self.client, input).await.render()
    }

    #[tool(description = "Update an existing topic. Only the fields provided are changed.")]
    async fn update_topic(
        &self,
        Parameters(input): Parameters<knowledge::UpdateTopicInput>,
    ) -> String {
        tracing::debug!("update_topic tool called");
        knowledge::update_topic(&self.client, input).await.render()
    }

    #[tool(description = "List topics, filtered by taxonomy, parent topic, flags or name.")]
    async fn list_topics(
        &self,
        Parameters(input): Parameters<knowledge::ListTopicsInput>,
    ) -> String {
        tracing::debug!("list_topics tool called");
        knowledge::list_topics(&self.client, input).await.render()
    }

    #[tool(description = "Get a topic by sys_id.")]
    async fn get_topic(&self, Parameters(input): Parameters<knowledge::GetTopicInput>) -> String {
        tracing::debug!("get_topic tool called");
        knowledge::get_topic(&self.client, input).await.render()
    }

    #[tool(description = "Delete a topic by sys_id.")]
    async fn delete_topic(
        &self,
        Parameters(input): Parameters<knowledge::DeleteTopicInput>,
    ) -> String {
        tracing::debug!("delete_topic tool called");
        knowledge::delete_topic(&self.client, input).await.render()
    }

    #[tool(description = "Clone an existing topic.")]
    async fn clone_topic(
        &self,
        Parameters(input): Parameters<knowledge::CloneTopicInput>,
    ) -> String {
        tracing::debug!("clone_topic tool called");
        knowledge::clone_topic(&self.client, input).await.render()
    }

    // ========================================================================
    // Service Portal pages
    // ========================================================================

    #[tool(description = "Create a Service Portal page. The id must be unique; category defaults to 'custom'.")]
    async fn create_portal_page(
        &self,
        Parameters(input): Parameters<portal_page::CreatePortalPageInput>,
    ) -> String {
        tracing::debug!("create_portal_page tool called");
        portal_page::create_portal_page(&self.client, input).await.render()
    }

    #[tool(description = "Update a Service Portal page by id or sys_id. Only the fields provided are changed.")]
    async fn update_portal_page(
        &self,
        Parameters(input): Parameters<portal_page::UpdatePortalPageInput>,
    ) -> String {
        tracing::debug!("update_portal_page tool called");
        portal_page::update_portal_page(&self.client, input).await.render()
    }

    #[tool(description = "List portal pages, with limit/offset pagination and filters.")]
    async fn list_portal_pages(
        &self,
        Parameters(input): Parameters<portal_page::ListPortalPagesInput>,
    ) -> String {
        tracing::debug!("list_portal_pages tool called");
        portal_page::list_portal_pages(&self.client, input).await.render()
    }

    #[tool(description = "Get a portal page by its id (e.g. \"index\") or sys_id.")]
    async fn get_portal_page(
        &self,
        Parameters(input): Parameters<portal_page::GetPortalPageInput>,
    ) -> String {
        tracing::debug!("get_portal_page tool called");
        portal_page::get_portal_page(&self.client, input).await.render()
    }

    #[tool(description = "Delete a portal page by id or sys_id.")]
    async fn delete_portal_page(
        &self,
        Parameters(input): Parameters<portal_page::DeletePortalPageInput>,
    ) -> String {
        tracing::debug!("delete_portal_page tool called");
        portal_page::delete_portal_page(&self.client, input).await.render()
    }

    #[tool(description = "Copy a Service Portal page under a new id and title. The copy is created as a draft.")]
    async fn clone_portal_page(
        &self,
        Parameters(input): Parameters<portal_page::ClonePortalPageInput>,
    ) -> String {
        tracing::debug!("clone_portal_page tool called");
        portal_page::clone_portal_page(&self.client, input).await.render()
    }

    // ========================================================================
    // Service Portal layout
    // ========================================================================

    #[tool(description = "Create a container on a Service Portal page.")]
    async fn create_portal_container(
        &self,
        Parameters(input): Parameters<portal_layout::CreatePortalContainerInput>,
    ) -> String {
        tracing::debug!("create_portal_container tool called");
        portal_layout::create_portal_container(&self.client, input).await.render()
    }

    #[tool(description = "Update an existing portal container. Only the fields provided are changed.")]
    async fn update_portal_container(
        &self,
        Parameters(input): Parameters<portal_layout::UpdatePortalContainerInput>,
    ) -> String {
        tracing::debug!("update_portal_container tool called");
        portal_layout::update_portal_container(&self.client, input).await.render()
    }

    #[tool(description = "List portal containers, with limit/offset pagination and filters.")]
    async fn list_portal_containers(
        &self,
        Parameters(input): Parameters<portal_layout::ListPortalContainersInput>,
    ) -> String {
        tracing::debug!("list_portal_containers tool called");
        portal_layout::list_portal_containers(&self.client, input).await.render()
    }

    #[tool(description = "Get a portal container by sys_id.")]
    async fn get_portal_container(
        &self,
        Parameters(input): Parameters<portal_layout::GetPortalContainerInput>,
    ) -> String {
        tracing::debug!("get_portal_container tool called");
        portal_layout::get_portal_container(&self.client, input).await.render()
    }

    #[tool(description = "Delete a portal container by sys_id.")]
    async fn delete_portal_container(
        &self,
        Parameters(input): Parameters<portal_layout::DeletePortalContainerInput>,
    ) -> String {
        tracing::debug!("delete_portal_container tool called");
        portal_layout::delete_portal_container(&self.client, input).await.render()
    }

    #[tool(description = "Copy a container onto a page, optionally without its background or styling. Rows are not copied.")]
    async fn clone_portal_container(
        &self,
        Parameters(input): Parameters<portal_layout::ClonePortalContainerInput>,
    ) -> String {
        tracing::debug!("clone_portal_container tool called");
        portal_layout::clone_portal_container(&self.client, input).await.render()
    }

    #[tool(description = "Reorder portal containers, numbering them 10, 20, 30 in the order given. Every container is attempted.")]
    async fn reorder_portal_containers(
        &self,
        Parameters(input): Parameters<portal_layout::ReorderPortalContainersInput>,
    ) -> String {
        tracing::debug!("reorder_portal_containers tool called");
        portal_layout::reorder_portal_containers(&self.client, input).await.render()
    }

    #[tool(description = "Create a row in a container, or nested in a column.")]
    async fn create_portal_row(
        &self,
        Parameters(input): Parameters<portal_layout::CreatePortalRowInput>,
    ) -> String {
        tracing::debug!("create_portal_row tool called");
        portal_layout::create_portal_row(&self.client, input).await.render()
    }

    #[tool(description = "Update an existing portal row. Only the fields provided are changed.")]
    async fn update_portal_row(
        &self,
        Parameters(input): Parameters<portal_layout::UpdatePortalRowInput>,
    ) -> String {
        tracing::debug!("update_portal_row tool called");
        portal_layout::update_portal_row(&self.client, input).await.render()
    }

    #[tool(description = "List portal rows, with limit/offset pagination and filters.")]
    async fn list_portal_rows(
        &self,
        Parameters(input): Parameters<portal_layout::ListPortalRowsInput>,
    ) -> String {
        tracing::debug!("list_portal_rows tool called");
        portal_layout::list_portal_rows(&self.client, input).await.render()
    }

    #[tool(description = "Get a portal row by sys_id.")]
    async fn get_portal_row(
        &self,
        Parameters(input): Parameters<portal_layout::GetPortalRowInput>,
    ) -> String {
        tracing::debug!("get_portal_row tool called");
        portal_layout::get_portal_row(&self.client, input).await.render()
    }

    #[tool(description = "Delete a portal row by sys_id.")]
    async fn delete_portal_row(
        &self,
        Parameters(input): Parameters<portal_layout::DeletePortalRowInput>,
    ) -> String {
        tracing::debug!("delete_portal_row tool called");
        portal_layout::delete_portal_row(&self.client, input).await.render()
    }

    #[tool(description = "Clone an existing portal row.")]
    async fn clone_portal_row(
        &self,
        Parameters(input): Parameters<portal_layout::ClonePortalRowInput>,
    ) -> String {
        tracing::debug!("clone_portal_row tool called");
        portal_layout::clone_portal_row(&self.client, input).await.render()
    }

    #[tool(description = "Set the order of rows within a container or column to 1, 2, 3... Every row is attempted.")]
    async fn reorder_portal_rows(
        &self,
        Parameters(input): Parameters<portal_layout::ReorderPortalRowsInput>,
    ) -> String {
        tracing::debug!("reorder_portal_rows tool called");
        portal_layout::reorder_portal_rows(&self.client, input).await.render()
    }

    #[tool(description = "Create a column in a row with Bootstrap sizes (1-12) per device class.")]
    async fn create_portal_column(
        &self,
        Parameters(input): Parameters<portal_layout::CreatePortalColumnInput>,
    ) -> String {
        tracing::debug!("create_portal_column tool called");
        portal_layout::create_portal_column(&self.client, input).await.render()
    }

    #[tool(description = "Update an existing portal column. Only the fields provided are changed.")]
    async fn update_portal_column(
        &self,
        Parameters(input): Parameters<portal_layout::UpdatePortalColumnInput>,
    ) -> String {
        tracing::debug!("update_portal_column tool called");
        portal_layout::update_portal_column(&self.client, input).await.render()
    }

    #[tool(description = "List portal columns, with limit/offset pagination and filters.")]
    async fn list_portal_columns(
        &self,
        Parameters(input): Parameters<portal_layout::ListPortalColumnsInput>,
    ) -> String {
        tracing::debug!("list_portal_columns tool called");
        portal_layout::list_portal_columns(&self.client, input).await.render()
    }

    #[tool(description = "Get a portal column by sys_id.")]
    async fn get_portal_column(
        &self,
        Parameters(input): Parameters<portal_layout::GetPortalColumnInput>,
    ) -> String {
        tracing::debug!("get_portal_column tool called");
        portal_layout::get_portal_column(&self.client, input).await.render()
    }

    #[tool(description = "Delete a portal column by sys_id.")]
    async fn delete_portal_column(
        &self,
        Parameters(input): Parameters<portal_layout::DeletePortalColumnInput>,
    ) -> String {
        tracing::debug!("delete_portal_column tool called");
        portal_layout::delete_portal_column(&self.client, input).await.render()
    }

    #[tool(description = "Clone an existing portal column.")]
    async fn clone_portal_column(
        &self,
        Parameters(input): Parameters<portal_layout::ClonePortalColumnInput>,
    ) -> String {
        tracing::debug!("clone_portal_column tool called");
        portal_layout::clone_portal_column(&self.client, input).await.render()
    }

    #[tool(description = "Reorder portal columns, numbering them 1, 2, 3 in the order given. Every column is attempted.")]
    async fn reorder_portal_columns(
        &self,
        Parameters(input): Parameters<portal_layout::ReorderPortalColumnsInput>,
    ) -> String {
        tracing::debug!("reorder_portal_columns tool called");
        portal_layout::reorder_portal_columns(&self.client, input).await.render()
    }

    #[tool(description = "Create several columns in a row at once, ordered left to right.")]
    async fn create_responsive_grid(
        &self,
        Parameters(input): Parameters<portal_layout::CreateResponsiveGridInput>,
    ) -> String {
        tracing::debug!("create_responsive_grid tool called");
        portal_layout::create_responsive_grid(&self.client, input).await.render()
    }

    // ========================================================================
    // Widget instances
    // ========================================================================

    #[tool(description = "Place a widget in a portal column. Only sp_widget is required.")]
    async fn create_widget_instance(
        &self,
        Parameters(input): Parameters<widget_instance::CreateWidgetInstanceInput>,
    ) -> String {
        tracing::debug!("create_widget_instance tool called");
        widget_instance::create_widget_instance(&self.client, input).await.render()
    }

    #[tool(description = "Update an existing widget instance. Only the fields provided are changed.")]
    async fn update_widget_instance(
        &self,
        Parameters(input): Parameters<widget_instance::UpdateWidgetInstanceInput>,
    ) -> String {
        tracing::debug!("update_widget_instance tool called");
        widget_instance::update_widget_instance(&self.client, input).await.render()
    }

    #[tool(description = "List widget instances, filtered by widget, column or active flag.")]
    async fn list_widget_instances(
        &self,
        Parameters(input): Parameters<widget_instance::ListWidgetInstancesInput>,
    ) -> String {
        tracing::debug!("list_widget_instances tool called");
        widget_instance::list_widget_instances(&self.client, input).await.render()
    }

    #[tool(description = "Get a widget instance by sys_id.")]
    async fn get_widget_instance(
        &self,
        Parameters(input): Parameters<widget_instance::GetWidgetInstanceInput>,
    ) -> String {
        tracing::debug!("get_widget_instance tool called");
        widget_instance::get_widget_instance(&self.client, input).await.render()
    }

    #[tool(description = "Delete a widget instance by sys_id.")]
    async fn delete_widget_instance(
        &self,
        Parameters(input): Parameters<widget_instance::DeleteWidgetInstanceInput>,
    ) -> String {
        tracing::debug!("delete_widget_instance tool called");
        widget_instance::delete_widget_instance(&self.client, input).await.render()
    }

    #[tool(description = "Copy a widget instance, optionally into another column with new options.")]
    async fn clone_widget_instance(
        &self,
        Parameters(input): Parameters<widget_instance::CloneWidgetInstanceInput>,
    ) -> String {
        tracing::debug!("clone_widget_instance tool called");
        widget_instance::clone_widget_instance(&self.client, input).await.render()
    }

    #[tool(description = "Apply the same field changes to several widget instances. Reports each failure.")]
    async fn bulk_update_widget_instances(
        &self,
        Parameters(input): Parameters<widget_instance::BulkUpdateWidgetInstancesInput>,
    ) -> String {
        tracing::debug!("bulk_update_widget_instances tool called");
        widget_instance::bulk_update_widget_instances(&self.client, input).await.render()
    }

    // ========================================================================
    // Attachments
    // ========================================================================

    #[tool(description = "Attach a base64-encoded file to a record.")]
    async fn upload_attachment(
        &self,
        Parameters(input): Parameters<attachment::UploadAttachmentInput>,
    ) -> String {
        tracing::debug!("upload_attachment tool called");
        attachment::upload_attachment(&self.client, input).await.render()
    }

    #[tool(description = "Attach a base64-encoded file to a record using a multipart form upload.")]
    async fn upload_multipart_attachment(
        &self,
        Parameters(input): Parameters<attachment::UploadMultipartAttachmentInput>,
    ) -> String {
        tracing::debug!("upload_multipart_attachment tool called");
        attachment::upload_multipart_attachment(&self.client, input).await.render()
    }

    #[tool(description = "List attachment metadata, filtered by table, record, file name or content type.")]
    async fn list_attachments(
        &self,
        Parameters(input): Parameters<attachment::ListAttachmentsInput>,
    ) -> String {
        tracing::debug!("list_attachments tool called");
        attachment::list_attachments(&self.client, input).await.render()
    }

    #[tool(description = "Get an attachment by sys_id.")]
    async fn get_attachment(
        &self,
        Parameters(input): Parameters<attachment::GetAttachmentInput>,
    ) -> String {
        tracing::debug!("get_attachment tool called");
        attachment::get_attachment(&self.client, input).await.render()
    }

    #[tool(description = "Download an attachment. Contents are returned base64 encoded.")]
    async fn download_attachment(
        &self,
        Parameters(input): Parameters<attachment::DownloadAttachmentInput>,
    ) -> String {
        tracing::debug!("download_attachment tool called");
        attachment::download_attachment(&self.client, input).await.render()
    }

    #[tool(description = "Delete an attachment by sys_id.")]
    async fn delete_attachment(
        &self,
        Parameters(input): Parameters<attachment::DeleteAttachmentInput>,
    ) -> String {
        tracing::debug!("delete_attachment tool called");
        attachment::delete_attachment(&self.client, input).await.render()
    }

    // ========================================================================
    // ATF tests
    // ========================================================================

    #[tool(description = "Create an ATF test, optionally in a scoped application.")]
    async fn create_atf_test(
        &self,
        Parameters(input): Parameters<atf_test::CreateAtfTestInput>,
    ) -> String {
        tracing::debug!("create_atf_test tool called");
        atf_test::create_atf_test(&self.client, input).await.render()
    }

    #[tool(description = "Update an ATF test.")]
    async fn update_atf_test(
        &self,
        Parameters(input): Parameters<atf_test::UpdateAtfTestInput>,
    ) -> String {
        tracing::debug!("update_atf_test tool called");
        atf_test::update_atf_test(&self.client, input).await.render()
    }

    #[tool(description = "List ATF tests, filtered by active flag, application or name.")]
    async fn list_atf_tests(
        &self,
        Parameters(input): Parameters<atf_test::ListAtfTestsInput>,
    ) -> String {
        tracing::debug!("list_atf_tests tool called");
        atf_test::list_atf_tests(&self.client, input).await.render()
    }

    #[tool(description = "Get one ATF test.")]
    async fn get_atf_test(
        &self,
        Parameters(input): Parameters<atf_test::GetAtfTestInput>,
    ) -> String {
        tracing::debug!("get_atf_test tool called");
        atf_test::get_atf_test(&self.client, input).await.render()
    }

    #[tool(description = "Delete an ATF test.")]
    async fn delete_atf_test(
        &self,
        Parameters(input): Parameters<atf_test::DeleteAtfTestInput>,
    ) -> String {
        tracing::debug!("delete_atf_test tool called");
        atf_test::delete_atf_test(&self.client, input).await.render()
    }

    #[tool(description = "Start an ATF test run. Falls back to queueing a suite result when the execution endpoint is unavailable.")]
    async fn run_atf_test(
        &self,
        Parameters(input): Parameters<atf_test::RunAtfTestInput>,
    ) -> String {
        tracing::debug!("run_atf_test tool called");
        atf_test::run_atf_test(&self.client, input).await.render()
    }

    #[tool(description = "List ATF test results for a test or a suite run.")]
    async fn get_atf_test_results(
        &self,
        Parameters(input): Parameters<atf_test::GetAtfTestResultsInput>,
    ) -> String {
        tracing::debug!("get_atf_test_results tool called");
        atf_test::get_atf_test_results(&self.client, input).await.render()
    }

    // ========================================================================
    // Catalog variables, variable sets and question choices
    // ========================================================================

    #[tool(description = "Add a variable (question) to a catalog item.")]
    async fn create_catalog_variable(
        &self,
        Parameters(input): Parameters<catalog_variable::CreateCatalogVariableInput>,
    ) -> String {
        tracing::debug!("create_catalog_variable tool called");
        catalog_variable::create_catalog_variable(&self.client, input).await.render()
    }

    #[tool(description = "Update a catalog variable.")]
    async fn update_catalog_variable(
        &self,
        Parameters(input): Parameters<catalog_variable::UpdateCatalogVariableInput>,
    ) -> String {
        tracing::debug!("update_catalog_variable tool called");
        catalog_variable::update_catalog_variable(&self.client, input).await.render()
    }

    #[tool(description = "List the variables of a catalog item in display order.")]
    async fn list_catalog_variables(
        &self,
        Parameters(input): Parameters<catalog_variable::ListCatalogVariablesInput>,
    ) -> String {
        tracing::debug!("list_catalog_variables tool called");
        catalog_variable::list_catalog_variables(&self.client, input).await.render()
    }

    #[tool(description = "Get one catalog variable.")]
    async fn get_catalog_variable(
        &self,
        Parameters(input): Parameters<catalog_variable::GetCatalogVariableInput>,
    ) -> String {
        tracing::debug!("get_catalog_variable tool called");
        catalog_variable::get_catalog_variable(&self.client, input).await.render()
    }

    #[tool(description = "Delete a catalog variable.")]
    async fn delete_catalog_variable(
        &self,
        Parameters(input): Parameters<catalog_variable::DeleteCatalogVariableInput>,
    ) -> String {
        tracing::debug!("delete_catalog_variable tool called");
        catalog_variable::delete_catalog_variable(&self.client, input).await.render()
    }

    #[tool(description = "Create a variable set that can be shared between catalog items.")]
    async fn create_variable_set(
        &self,
        Parameters(input): Parameters<catalog_variable::CreateVariableSetInput>,
    ) -> String {
        tracing::debug!("create_variable_set tool called");
        catalog_variable::create_variable_set(&self.client, input).await.render()
    }

    #[tool(description = "Update a variable set.")]
    async fn update_variable_set(
        &self,
        Parameters(input): Parameters<catalog_variable::UpdateVariableSetInput>,
    ) -> String {
        tracing::debug!("update_variable_set tool called");
        catalog_variable::update_variable_set(&self.client, input).await.render()
    }

    #[tool(description = "List variable sets, filtered by title or internal name.")]
    async fn list_variable_sets(
        &self,
        Parameters(input): Parameters<catalog_variable::ListVariableSetsInput>,
    ) -> String {
        tracing::debug!("list_variable_sets tool called");
        catalog_variable::list_variable_sets(&self.client, input).await.render()
    }

    #[tool(description = "Get one variable set.")]
    async fn get_variable_set(
        &self,
        Parameters(input): Parameters<catalog_variable::GetVariableSetInput>,
    ) -> String {
        tracing::debug!("get_variable_set tool called");
        catalog_variable::get_variable_set(&self.client, input).await.render()
    }

    #[tool(description = "Delete a variable set.")]
    async fn delete_variable_set(
        &self,
        Parameters(input): Parameters<catalog_variable::DeleteVariableSetInput>,
    ) -> String {
        tracing::debug!("delete_variable_set tool called");
        catalog_variable::delete_variable_set(&self.client, input).await.render()
    }

    #[tool(description = "Add a choice to a choice-type catalog question.")]
    async fn create_question_choice(
        &self,
        Parameters(input): Parameters<catalog_variable::CreateQuestionChoiceInput>,
    ) -> String {
        tracing::debug!("create_question_choice tool called");
        catalog_variable::create_question_choice(&self.client, input).await.render()
    }

    #[tool(description = "Update a question choice.")]
    async fn update_question_choice(
        &self,
        Parameters(input): Parameters<catalog_variable::UpdateQuestionChoiceInput>,
    ) -> String {
        tracing::debug!("update_question_choice tool called");
        catalog_variable::update_question_choice(&self.client, input).await.render()
    }

    #[tool(description = "List question choices, filtered by question or inactive flag.")]
    async fn list_question_choices(
        &self,
        Parameters(input): Parameters<catalog_variable::ListQuestionChoicesInput>,
    ) -> String {
        tracing::debug!("list_question_choices tool called");
        catalog_variable::list_question_choices(&self.client, input).await.render()
    }

    #[tool(description = "Get one question choice.")]
    async fn get_question_choice(
        &self,
        Parameters(input): Parameters<catalog_variable::GetQuestionChoiceInput>,
    ) -> String {
        tracing::debug!("get_question_choice tool called");
        catalog_variable::get_question_choice(&self.client, input).await.render()
    }

    #[tool(description = "Delete a question choice.")]
    async fn delete_question_choice(
        &self,
        Parameters(input): Parameters<catalog_variable::DeleteQuestionChoiceInput>,
    ) -> String {
        tracing::debug!("delete_question_choice tool called");
        catalog_variable::delete_question_choice(&self.client, input).await.render()
    }

    // ========================================================================
    // Catalog client scripts
    // ========================================================================

    #[tool(description = "Create a catalog client script (onLoad, onChange, onSubmit) for a catalog item or variable set.")]
    async fn create_catalog_client_script(
        &self,
        Parameters(input): Parameters<catalog_client_script::CreateCatalogClientScriptInput>,
    ) -> String {
        tracing::debug!("create_catalog_client_script tool called");
        catalog_client_script::create_catalog_client_script(&self.client, input).await.render()
    }

    #[tool(description = "Update a catalog client script.")]
    async fn update_catalog_client_script(
        &self,
        Parameters(input): Parameters<catalog_client_script::UpdateCatalogClientScriptInput>,
    ) -> String {
        tracing::debug!("update_catalog_client_script tool called");
        catalog_client_script::update_catalog_client_script(&self.client, input).await.render()
    }

    #[tool(description = "List catalog client scripts, filtered by catalog item, variable set, variable, active flag or search text.")]
    async fn list_catalog_client_scripts(
        &self,
        Parameters(input): Parameters<catalog_client_script::ListCatalogClientScriptsInput>,
    ) -> String {
        tracing::debug!("list_catalog_client_scripts tool called");
        catalog_client_script::list_catalog_client_scripts(&self.client, input).await.render()
    }

    #[tool(description = "Get one catalog client script, including its source.")]
    async fn get_catalog_client_script(
        &self,
        Parameters(input): Parameters<catalog_client_script::GetCatalogClientScriptInput>,
    ) -> String {
        tracing::debug!("get_catalog_client_script tool called");
        catalog_client_script::get_catalog_client_script(&self.client, input).await.render()
    }

    #[tool(description = "Delete a catalog client script.")]
    async fn delete_catalog_client_script(
        &self,
        Parameters(input): Parameters<catalog_client_script::DeleteCatalogClientScriptInput>,
    ) -> String {
        tracing::debug!("delete_catalog_client_script tool called");
        catalog_client_script::delete_catalog_client_script(&self.client, input).await.render()
    }

    #[tool(description = "Copy a catalog client script under a new name.")]
    async fn clone_catalog_client_script(
        &self,
        Parameters(input): Parameters<catalog_client_script::CloneCatalogClientScriptInput>,
    ) -> String {
        tracing::debug!("clone_catalog_client_script tool called");
        catalog_client_script::clone_catalog_client_script(&self.client, input).await.render()
    }

    // ========================================================================
    // Catalog UI policy actions
    // ========================================================================

    #[tool(description = "Create a UI policy action controlling one catalog variable.")]
    async fn create_catalog_ui_policy_action(
        &self,
        Parameters(input): Parameters<ui_policy::CreateCatalogUiPolicyActionInput>,
    ) -> String {
        tracing::debug!("create_catalog_ui_policy_action tool called");
        ui_policy::create_catalog_ui_policy_action(&self.client, input).await.render()
    }

    #[tool(description = "Update a catalog UI policy action.")]
    async fn update_catalog_ui_policy_action(
        &self,
        Parameters(input): Parameters<ui_policy::UpdateCatalogUiPolicyActionInput>,
    ) -> String {
        tracing::debug!("update_catalog_ui_policy_action tool called");
        ui_policy::update_catalog_ui_policy_action(&self.client, input).await.render()
    }

    #[tool(description = "List catalog UI policy actions, filtered by policy, catalog item, variable set or variable.")]
    async fn list_catalog_ui_policy_actions(
        &self,
        Parameters(input): Parameters<ui_policy::ListCatalogUiPolicyActionsInput>,
    ) -> String {
        tracing::debug!("list_catalog_ui_policy_actions tool called");
        ui_policy::list_catalog_ui_policy_actions(&self.client, input).await.render()
    }

    #[tool(description = "Get one catalog UI policy action.")]
    async fn get_catalog_ui_policy_action(
        &self,
        Parameters(input): Parameters<ui_policy::GetCatalogUiPolicyActionInput>,
    ) -> String {
        tracing::debug!("get_catalog_ui_policy_action tool called");
        ui_policy::get_catalog_ui_policy_action(&self.client, input).await.render()
    }

    #[tool(description = "Delete a catalog UI policy action.")]
    async fn delete_catalog_ui_policy_action(
        &self,
        Parameters(input): Parameters<ui_policy::DeleteCatalogUiPolicyActionInput>,
    ) -> String {
        tracing::debug!("delete_catalog_ui_policy_action tool called");
        ui_policy::delete_catalog_ui_policy_action(&self.client, input).await.render()
    }

    #[tool(description = "Copy a catalog UI policy action onto another variable.")]
    async fn clone_catalog_ui_policy_action(
        &self,
        Parameters(input): Parameters<ui_policy::CloneCatalogUiPolicyActionInput>,
    ) -> String {
        tracing::debug!("clone_catalog_ui_policy_action tool called");
        ui_policy::clone_catalog_ui_policy_action(&self.client, input).await.render()
    }

    // ========================================================================
    // Catalog item availability
    // ========================================================================

    #[tool(description = "Make a catalog item available for a user criteria.")]
    async fn add_available_for(
        &self,
        Parameters(input): Parameters<catalog_availability::AddAvailableForInput>,
    ) -> String {
        tracing::debug!("add_available_for tool called");
        catalog_availability::add_available_for(&self.client, input).await.render()
    }

    #[tool(description = "Remove an available-for user criteria from a catalog item.")]
    async fn remove_available_for(
        &self,
        Parameters(input): Parameters<catalog_availability::RemoveAvailableForInput>,
    ) -> String {
        tracing::debug!("remove_available_for tool called");
        catalog_availability::remove_available_for(&self.client, input).await.render()
    }

    #[tool(description = "Hide a catalog item from a user criteria.")]
    async fn add_not_available_for(
        &self,
        Parameters(input): Parameters<catalog_availability::AddNotAvailableForInput>,
    ) -> String {
        tracing::debug!("add_not_available_for tool called");
        catalog_availability::add_not_available_for(&self.client, input).await.render()
    }

    #[tool(description = "Remove a not-available-for user criteria from a catalog item.")]
    async fn remove_not_available_for(
        &self,
        Parameters(input): Parameters<catalog_availability::RemoveNotAvailableForInput>,
    ) -> String {
        tracing::debug!("remove_not_available_for tool called");
        catalog_availability::remove_not_available_for(&self.client, input).await.render()
    }

    #[tool(description = "List the available-for or not-available-for user criteria of a catalog item.")]
    async fn list_available_for(
        &self,
        Parameters(input): Parameters<catalog_availability::ListAvailableForInput>,
    ) -> String {
        tracing::debug!("list_available_for tool called");
        catalog_availability::list_available_for(&self.client, input).await.render()
    }

    #[tool(description = "Replace both user criteria lists of a catalog item.")]
    async fn bulk_update_available_for(
        &self,
        Parameters(input): Parameters<catalog_availability::BulkUpdateAvailableForInput>,
    ) -> String {
        tracing::debug!("bulk_update_available_for tool called");
        catalog_availability::bulk_update_available_for(&self.client, input).await.render()
    }

    // ========================================================================
    // Email notifications
    // ========================================================================

    #[tool(description = "Create an email notification fired by an event or record changes on a table.")]
    async fn create_email_notification(
        &self,
        Parameters(input): Parameters<notification::CreateEmailNotificationInput>,
    ) -> String {
        tracing::debug!("create_email_notification tool called");
        notification::create_email_notification(&self.client, input).await.render()
    }

    #[tool(description = "Update an email notification.")]
    async fn update_email_notification(
        &self,
        Parameters(input): Parameters<notification::UpdateEmailNotificationInput>,
    ) -> String {
        tracing::debug!("update_email_notification tool called");
        notification::update_email_notification(&self.client, input).await.render()
    }

    #[tool(description = "List email notifications, filtered by active flag, table, event or category.")]
    async fn list_email_notifications(
        &self,
        Parameters(input): Parameters<notification::ListEmailNotificationsInput>,
    ) -> String {
        tracing::debug!("list_email_notifications tool called");
        notification::list_email_notifications(&self.client, input).await.render()
    }

    #[tool(description = "Get one email notification.")]
    async fn get_email_notification(
        &self,
        Parameters(input): Parameters<notification::GetEmailNotificationInput>,
    ) -> String {
        tracing::debug!("get_email_notification tool called");
        notification::get_email_notification(&self.client, input).await.render()
    }

    #[tool(description = "Delete an email notification.")]
    async fn delete_email_notification(
        &self,
        Parameters(input): Parameters<notification::DeleteEmailNotificationInput>,
    ) -> String {
        tracing::debug!("delete_email_notification tool called");
        notification::delete_email_notification(&self.client, input).await.render()
    }

    // ========================================================================
    // Email layouts
    // ========================================================================

    #[tool(description = "Create an email layout wrapping notification content in shared HTML.")]
    async fn create_email_layout(
        &self,
        Parameters(input): Parameters<email_layout::CreateEmailLayoutInput>,
    ) -> String {
        tracing::debug!("create_email_layout tool called");
        email_layout::create_email_layout(&self.client, input).await.render()
    }

    #[tool(description = "Update an email layout.")]
    async fn update_email_layout(
        &self,
        Parameters(input): Parameters<email_layout::UpdateEmailLayoutInput>,
    ) -> String {
        tracing::debug!("update_email_layout tool called");
        email_layout::update_email_layout(&self.client, input).await.render()
    }

    #[tool(description = "List email layouts, filtered by advanced flag or search text.")]
    async fn list_email_layouts(
        &self,
        Parameters(input): Parameters<email_layout::ListEmailLayoutsInput>,
    ) -> String {
        tracing::debug!("list_email_layouts tool called");
        email_layout::list_email_layouts(&self.client, input).await.render()
    }

    #[tool(description = "Get one email layout.")]
    async fn get_email_layout(
        &self,
        Parameters(input): Parameters<email_layout::GetEmailLayoutInput>,
    ) -> String {
        tracing::debug!("get_email_layout tool called");
        email_layout::get_email_layout(&self.client, input).await.render()
    }

    #[tool(description = "Delete an email layout.")]
    async fn delete_email_layout(
        &self,
        Parameters(input): Parameters<email_layout::DeleteEmailLayoutInput>,
    ) -> String {
        tracing::debug!("delete_email_layout tool called");
        email_layout::delete_email_layout(&self.client, input).await.render()
    }

    #[tool(description = "Copy an email layout under a new name.")]
    async fn clone_email_layout(
        &self,
        Parameters(input): Parameters<email_layout::CloneEmailLayoutInput>,
    ) -> String {
        tracing::debug!("clone_email_layout tool called");
        email_layout::clone_email_layout(&self.client, input).await.render()
    }

    // ========================================================================
    // UI actions
    // ========================================================================

    #[tool(description = "Create a UI action (form button, list banner button or context menu entry) on a table.")]
    async fn create_ui_action(
        &self,
        Parameters(input): Parameters<ui_action::CreateUiActionInput>,
    ) -> String {
        tracing::debug!("create_ui_action tool called");
        ui_action::create_ui_action(&self.client, input).await.render()
    }

    #[tool(description = "Update a UI action.")]
    async fn update_ui_action(
        &self,
        Parameters(input): Parameters<ui_action::UpdateUiActionInput>,
    ) -> String {
        tracing::debug!("update_ui_action tool called");
        ui_action::update_ui_action(&self.client, input).await.render()
    }

    #[tool(description = "List UI actions, filtered by table, active flag or search text.")]
    async fn list_ui_actions(
        &self,
        Parameters(input): Parameters<ui_action::ListUiActionsInput>,
    ) -> String {
        tracing::debug!("list_ui_actions tool called");
        ui_action::list_ui_actions(&self.client, input).await.render()
    }

    #[tool(description = "Get one UI action.")]
    async fn get_ui_action(
        &self,
        Parameters(input): Parameters<ui_action::GetUiActionInput>,
    ) -> String {
        tracing::debug!("get_ui_action tool called");
        ui_action::get_ui_action(&self.client, input).await.render()
    }

    #[tool(description = "Delete a UI action.")]
    async fn delete_ui_action(
        &self,
        Parameters(input): Parameters<ui_action::DeleteUiActionInput>,
    ) -> String {
        tracing::debug!("delete_ui_action tool called");
        ui_action::delete_ui_action(&self.client, input).await.render()
    }

    // ========================================================================
    // Access controls
    // ========================================================================

    #[tool(description = "Create an access control rule for a table or field.")]
    async fn create_acl(
        &self,
        Parameters(input): Parameters<acl::CreateAclInput>,
    ) -> String {
        tracing::debug!("create_acl tool called");
        acl::create_acl(&self.client, input).await.render()
    }

    #[tool(description = "Update an ACL.")]
    async fn update_acl(
        &self,
        Parameters(input): Parameters<acl::UpdateAclInput>,
    ) -> String {
        tracing::debug!("update_acl tool called");
        acl::update_acl(&self.client, input).await.render()
    }

    #[tool(description = "List access control rules, filtered by table, operation, type or active flag.")]
    async fn list_acls(
        &self,
        Parameters(input): Parameters<acl::ListAclsInput>,
    ) -> String {
        tracing::debug!("list_acls tool called");
        acl::list_acls(&self.client, input).await.render()
    }

    #[tool(description = "Get one ACL.")]
    async fn get_acl(
        &self,
        Parameters(input): Parameters<acl::GetAclInput>,
    ) -> String {
        tracing::debug!("get_acl tool called");
        acl::get_acl(&self.client, input).await.render()
    }

    #[tool(description = "Delete an ACL.")]
    async fn delete_acl(
        &self,
        Parameters(input): Parameters<acl::DeleteAclInput>,
    ) -> String {
        tracing::debug!("delete_acl tool called");
        acl::delete_acl(&self.client, input).await.render()
    }

    // ========================================================================
    // User roles
    // ========================================================================

    #[tool(description = "Assign a role to a user.")]
    async fn assign_user_role(
        &self,
        Parameters(input): Parameters<user_role::AssignUserRoleInput>,
    ) -> String {
        tracing::debug!("assign_user_role tool called");
        user_role::assign_user_role(&self.client, input).await.render()
    }

    #[tool(description = "Remove a role from a user.")]
    async fn remove_user_role(
        &self,
        Parameters(input): Parameters<user_role::RemoveUserRoleInput>,
    ) -> String {
        tracing::debug!("remove_user_role tool called");
        user_role::remove_user_role(&self.client, input).await.render()
    }

    #[tool(description = "List role assignments, filtered by user or role.")]
    async fn list_user_roles(
        &self,
        Parameters(input): Parameters<user_role::ListUserRolesInput>,
    ) -> String {
        tracing::debug!("list_user_roles tool called");
        user_role::list_user_roles(&self.client, input).await.render()
    }

    #[tool(description = "Assign several user/role pairs. Every pair is attempted; failures are reported per pair.")]
    async fn bulk_assign_user_roles(
        &self,
        Parameters(input): Parameters<user_role::BulkAssignUserRolesInput>,
    ) -> String {
        tracing::debug!("bulk_assign_user_roles tool called");
        user_role::bulk_assign_user_roles(&self.client, input).await.render()
    }

    #[tool(description = "Remove several user/role pairs. Every pair is attempted; failures are reported per pair.")]
    async fn bulk_remove_user_roles(
        &self,
        Parameters(input): Parameters<user_role::BulkRemoveUserRolesInput>,
    ) -> String {
        tracing::debug!("bulk_remove_user_roles tool called");
        user_role::bulk_remove_user_roles(&self.client, input).await.render()
    }

    // ========================================================================
    // Tables and columns
    // ========================================================================

    #[tool(description = "Create a table, optionally extending a parent table.")]
    async fn create_table(
        &self,
        Parameters(input): Parameters<dictionary::CreateTableInput>,
    ) -> String {
        tracing::debug!("create_table tool called");
        dictionary::create_table(&self.client, input).await.render()
    }

    #[tool(description = "Update a table definition, addressed by table name.")]
    async fn update_table(
        &self,
        Parameters(input): Parameters<dictionary::UpdateTableInput>,
    ) -> String {
        tracing::debug!("update_table tool called");
        dictionary::update_table(&self.client, input).await.render()
    }

    #[tool(description = "List table definitions, by default only custom (u_) tables.")]
    async fn list_tables(
        &self,
        Parameters(input): Parameters<dictionary::ListTablesInput>,
    ) -> String {
        tracing::debug!("list_tables tool called");
        dictionary::list_tables(&self.client, input).await.render()
    }

    #[tool(description = "Get a table definition by table name.")]
    async fn get_table(
        &self,
        Parameters(input): Parameters<dictionary::GetTableInput>,
    ) -> String {
        tracing::debug!("get_table tool called");
        dictionary::get_table(&self.client, input).await.render()
    }

    #[tool(description = "Add a column to a table. Choice columns can create their choices in the same call.")]
    async fn create_table_column(
        &self,
        Parameters(input): Parameters<dictionary::CreateTableColumnInput>,
    ) -> String {
        tracing::debug!("create_table_column tool called");
        dictionary::create_table_column(&self.client, input).await.render()
    }

    #[tool(description = "Update a column, addressed by table and column name.")]
    async fn update_table_column(
        &self,
        Parameters(input): Parameters<dictionary::UpdateTableColumnInput>,
    ) -> String {
        tracing::debug!("update_table_column tool called");
        dictionary::update_table_column(&self.client, input).await.render()
    }

    #[tool(description = "List the columns of a table.")]
    async fn list_table_columns(
        &self,
        Parameters(input): Parameters<dictionary::ListTableColumnsInput>,
    ) -> String {
        tracing::debug!("list_table_columns tool called");
        dictionary::list_table_columns(&self.client, input).await.render()
    }

    #[tool(description = "Get a column by table and column name.")]
    async fn get_table_column(
        &self,
        Parameters(input): Parameters<dictionary::GetTableColumnInput>,
    ) -> String {
        tracing::debug!("get_table_column tool called");
        dictionary::get_table_column(&self.client, input).await.render()
    }

    // ========================================================================
    // Table choices
    // ========================================================================

    #[tool(description = "Create a choice list entry for a table field.")]
    async fn create_choice(
        &self,
        Parameters(input): Parameters<table_choice::CreateChoiceInput>,
    ) -> String {
        tracing::debug!("create_choice tool called");
        table_choice::create_choice(&self.client, input).await.render()
    }

    #[tool(description = "Update a choice.")]
    async fn update_choice(
        &self,
        Parameters(input): Parameters<table_choice::UpdateChoiceInput>,
    ) -> String {
        tracing::debug!("update_choice tool called");
        table_choice::update_choice(&self.client, input).await.render()
    }

    #[tool(description = "List the choices of a table field in display order.")]
    async fn list_choices(
        &self,
        Parameters(input): Parameters<table_choice::ListChoicesInput>,
    ) -> String {
        tracing::debug!("list_choices tool called");
        table_choice::list_choices(&self.client, input).await.render()
    }

    #[tool(description = "Get one choice.")]
    async fn get_choice(
        &self,
        Parameters(input): Parameters<table_choice::GetChoiceInput>,
    ) -> String {
        tracing::debug!("get_choice tool called");
        table_choice::get_choice(&self.client, input).await.render()
    }

    #[tool(description = "Delete a choice.")]
    async fn delete_choice(
        &self,
        Parameters(input): Parameters<table_choice::DeleteChoiceInput>,
    ) -> String {
        tracing::debug!("delete_choice tool called");
        table_choice::delete_choice(&self.client, input).await.render()
    }

    #[tool(description = "Create several choices of one field. Every choice is attempted; failures are reported per entry.")]
    async fn bulk_create_choices(
        &self,
        Parameters(input): Parameters<table_choice::BulkCreateChoicesInput>,
    ) -> String {
        tracing::debug!("bulk_create_choices tool called");
        table_choice::bulk_create_choices(&self.client, input).await.render()
    }

    #[tool(description = "Renumber the choices of a field as 10, 20, 30... following a list of choice values.")]
    async fn reorder_choices(
        &self,
        Parameters(input): Parameters<table_choice::ReorderChoicesInput>,
    ) -> String {
        tracing::debug!("reorder_choices tool called");
        table_choice::reorder_choices(&self.client, input).await.render()
    }

    // ========================================================================
    // Assignment rules
    // ========================================================================

    #[tool(description = "Create an assignment rule that routes records of a table to a group or user by script.")]
    async fn create_assignment_rule(
        &self,
        Parameters(input): Parameters<assignment_rule::CreateAssignmentRuleInput>,
    ) -> String {
        tracing::debug!("create_assignment_rule tool called");
        assignment_rule::create_assignment_rule(&self.client, input).await.render()
    }

    #[tool(description = "Update an assignment rule.")]
    async fn update_assignment_rule(
        &self,
        Parameters(input): Parameters<assignment_rule::UpdateAssignmentRuleInput>,
    ) -> String {
        tracing::debug!("update_assignment_rule tool called");
        assignment_rule::update_assignment_rule(&self.client, input).await.render()
    }

    #[tool(description = "List assignment rules, filtered by table, active flag, inheritance or timing.")]
    async fn list_assignment_rules(
        &self,
        Parameters(input): Parameters<assignment_rule::ListAssignmentRulesInput>,
    ) -> String {
        tracing::debug!("list_assignment_rules tool called");
        assignment_rule::list_assignment_rules(&self.client, input).await.render()
    }

    #[tool(description = "Get one assignment rule.")]
    async fn get_assignment_rule(
        &self,
        Parameters(input): Parameters<assignment_rule::GetAssignmentRuleInput>,
    ) -> String {
        tracing::debug!("get_assignment_rule tool called");
        assignment_rule::get_assignment_rule(&self.client, input).await.render()
    }

    #[tool(description = "Delete an assignment rule.")]
    async fn delete_assignment_rule(
        &self,
        Parameters(input): Parameters<assignment_rule::DeleteAssignmentRuleInput>,
    ) -> String {
        tracing::debug!("delete_assignment_rule tool called");
        assignment_rule::delete_assignment_rule(&self.client, input).await.render()
    }

    // ========================================================================
    // Inbound email actions
    // ========================================================================

    #[tool(description = "Create an inbound email action that processes incoming mail into records or replies.")]
    async fn create_inbound_email_action(
        &self,
        Parameters(input): Parameters<inbound_email::CreateInboundEmailActionInput>,
    ) -> String {
        tracing::debug!("create_inbound_email_action tool called");
        inbound_email::create_inbound_email_action(&self.client, input).await.render()
    }

    #[tool(description = "Update an inbound email action.")]
    async fn update_inbound_email_action(
        &self,
        Parameters(input): Parameters<inbound_email::UpdateInboundEmailActionInput>,
    ) -> String {
        tracing::debug!("update_inbound_email_action tool called");
        inbound_email::update_inbound_email_action(&self.client, input).await.render()
    }

    #[tool(description = "List inbound email actions, filtered by type, table, event or search text.")]
    async fn list_inbound_email_actions(
        &self,
        Parameters(input): Parameters<inbound_email::ListInboundEmailActionsInput>,
    ) -> String {
        tracing::debug!("list_inbound_email_actions tool called");
        inbound_email::list_inbound_email_actions(&self.client, input).await.render()
    }

    #[tool(description = "Get one inbound email action.")]
    async fn get_inbound_email_action(
        &self,
        Parameters(input): Parameters<inbound_email::GetInboundEmailActionInput>,
    ) -> String {
        tracing::debug!("get_inbound_email_action tool called");
        inbound_email::get_inbound_email_action(&self.client, input).await.render()
    }

    #[tool(description = "Delete an inbound email action.")]
    async fn delete_inbound_email_action(
        &self,
        Parameters(input): Parameters<inbound_email::DeleteInboundEmailActionInput>,
    ) -> String {
        tracing::debug!("delete_inbound_email_action tool called");
        inbound_email::delete_inbound_email_action(&self.client, input).await.render()
    }

    // ========================================================================
    // Employee Center quick links
    // ========================================================================

    #[tool(description = "Create an Employee Center quick link to a portal page, external link, knowledge article or catalog item.")]
    async fn create_quick_link(
        &self,
        Parameters(input): Parameters<quick_link::CreateQuickLinkInput>,
    ) -> String {
        tracing::debug!("create_quick_link tool called");
        quick_link::create_quick_link(&self.client, input).await.render()
    }

    #[tool(description = "Update a quick link.")]
    async fn update_quick_link(
        &self,
        Parameters(input): Parameters<quick_link::UpdateQuickLinkInput>,
    ) -> String {
        tracing::debug!("update_quick_link tool called");
        quick_link::update_quick_link(&self.client, input).await.render()
    }

    #[tool(description = "List Employee Center quick links, filtered by active flag or content type.")]
    async fn list_quick_links(
        &self,
        Parameters(input): Parameters<quick_link::ListQuickLinksInput>,
    ) -> String {
        tracing::debug!("list_quick_links tool called");
        quick_link::list_quick_links(&self.client, input).await.render()
    }

    #[tool(description = "Get an Employee Center quick link by sys_id or name.")]
    async fn get_quick_link(
        &self,
        Parameters(input): Parameters<quick_link::GetQuickLinkInput>,
    ) -> String {
        tracing::debug!("get_quick_link tool called");
        quick_link::get_quick_link(&self.client, input).await.render()
    }

    #[tool(description = "Delete a quick link.")]
    async fn delete_quick_link(
        &self,
        Parameters(input): Parameters<quick_link::DeleteQuickLinkInput>,
    ) -> String {
        tracing::debug!("delete_quick_link tool called");
        quick_link::delete_quick_link(&self.client, input).await.render()
    }

    // ========================================================================
    // Images
    // ========================================================================

    #[tool(description = "Store an image (logo, icon...) from base64 content.")]
    async fn create_image(
        &self,
        Parameters(input): Parameters<image::CreateImageInput>,
    ) -> String {
        tracing::debug!("create_image tool called");
        image::create_image(&self.client, input).await.render()
    }

    #[tool(description = "Update an image.")]
    async fn update_image(
        &self,
        Parameters(input): Parameters<image::UpdateImageInput>,
    ) -> String {
        tracing::debug!("update_image tool called");
        image::update_image(&self.client, input).await.render()
    }

    #[tool(description = "List stored images without their content, filtered by owner, type, category or name.")]
    async fn list_images(
        &self,
        Parameters(input): Parameters<image::ListImagesInput>,
    ) -> String {
        tracing::debug!("list_images tool called");
        image::list_images(&self.client, input).await.render()
    }

    #[tool(description = "Get a stored image; set include_data to also return its base64 content.")]
    async fn get_image(
        &self,
        Parameters(input): Parameters<image::GetImageInput>,
    ) -> String {
        tracing::debug!("get_image tool called");
        image::get_image(&self.client, input).await.render()
    }

    #[tool(description = "Delete an image.")]
    async fn delete_image(
        &self,
        Parameters(input): Parameters<image::DeleteImageInput>,
    ) -> String {
        tracing::debug!("delete_image tool called");
        image::delete_image(&self.client, input).await.render()
    }

    // ========================================================================
    // Application menus and modules
    // ========================================================================

    #[tool(description = "Create an application menu in the navigator.")]
    async fn create_application_menu(
        &self,
        Parameters(input): Parameters<menu::CreateApplicationMenuInput>,
    ) -> String {
        tracing::debug!("create_application_menu tool called");
        menu::create_application_menu(&self.client, input).await.render()
    }

    #[tool(description = "Update an application menu.")]
    async fn update_application_menu(
        &self,
        Parameters(input): Parameters<menu::UpdateApplicationMenuInput>,
    ) -> String {
        tracing::debug!("update_application_menu tool called");
        menu::update_application_menu(&self.client, input).await.render()
    }

    #[tool(description = "List application menus, filtered by active flag, category, device type or title.")]
    async fn list_application_menus(
        &self,
        Parameters(input): Parameters<menu::ListApplicationMenusInput>,
    ) -> String {
        tracing::debug!("list_application_menus tool called");
        menu::list_application_menus(&self.client, input).await.render()
    }

    #[tool(description = "Get an application menu by sys_id or title.")]
    async fn get_application_menu(
        &self,
        Parameters(input): Parameters<menu::GetApplicationMenuInput>,
    ) -> String {
        tracing::debug!("get_application_menu tool called");
        menu::get_application_menu(&self.client, input).await.render()
    }

    #[tool(description = "Delete an application menu.")]
    async fn delete_application_menu(
        &self,
        Parameters(input): Parameters<menu::DeleteApplicationMenuInput>,
    ) -> String {
        tracing::debug!("delete_application_menu tool called");
        menu::delete_application_menu(&self.client, input).await.render()
    }

    #[tool(description = "Create a navigator module under an application menu given by sys_id or title.")]
    async fn create_app_module(
        &self,
        Parameters(input): Parameters<menu::CreateAppModuleInput>,
    ) -> String {
        tracing::debug!("create_app_module tool called");
        menu::create_app_module(&self.client, input).await.render()
    }

    #[tool(description = "Update a module.")]
    async fn update_app_module(
        &self,
        Parameters(input): Parameters<menu::UpdateAppModuleInput>,
    ) -> String {
        tracing::debug!("update_app_module tool called");
        menu::update_app_module(&self.client, input).await.render()
    }

    #[tool(description = "List navigator modules, filtered by menu, table, link type or roles.")]
    async fn list_app_modules(
        &self,
        Parameters(input): Parameters<menu::ListAppModulesInput>,
    ) -> String {
        tracing::debug!("list_app_modules tool called");
        menu::list_app_modules(&self.client, input).await.render()
    }

    #[tool(description = "Get one module.")]
    async fn get_app_module(
        &self,
        Parameters(input): Parameters<menu::GetAppModuleInput>,
    ) -> String {
        tracing::debug!("get_app_module tool called");
        menu::get_app_module(&self.client, input).await.render()
    }

    #[tool(description = "Delete a module.")]
    async fn delete_app_module(
        &self,
        Parameters(input): Parameters<menu::DeleteAppModuleInput>,
    ) -> String {
        tracing::debug!("delete_app_module tool called");
        menu::delete_app_module(&self.client, input).await.render()
    }

    // ========================================================================
    // Connected content
    // ========================================================================

    #[tool(description = "Connect a catalog item, knowledge article or quick link to a knowledge topic.")]
    async fn create_connected_content(
        &self,
        Parameters(input): Parameters<connected_content::CreateConnectedContentInput>,
    ) -> String {
        tracing::debug!("create_connected_content tool called");
        connected_content::create_connected_content(&self.client, input).await.render()
    }

    #[tool(description = "Update a connection.")]
    async fn update_connected_content(
        &self,
        Parameters(input): Parameters<connected_content::UpdateConnectedContentInput>,
    ) -> String {
        tracing::debug!("update_connected_content tool called");
        connected_content::update_connected_content(&self.client, input).await.render()
    }

    #[tool(description = "List content connected to topics, filtered by topic, content type or connected record.")]
    async fn list_connected_content(
        &self,
        Parameters(input): Parameters<connected_content::ListConnectedContentInput>,
    ) -> String {
        tracing::debug!("list_connected_content tool called");
        connected_content::list_connected_content(&self.client, input).await.render()
    }

    #[tool(description = "Get one connection.")]
    async fn get_connected_content(
        &self,
        Parameters(input): Parameters<connected_content::GetConnectedContentInput>,
    ) -> String {
        tracing::debug!("get_connected_content tool called");
        connected_content::get_connected_content(&self.client, input).await.render()
    }

    #[tool(description = "Remove a connection.")]
    async fn delete_connected_content(
        &self,
        Parameters(input): Parameters<connected_content::DeleteConnectedContentInput>,
    ) -> String {
        tracing::debug!("delete_connected_content tool called");
        connected_content::delete_connected_content(&self.client, input).await.render()
    }

    #[tool(description = "Connect several pieces of content to one topic. Every connection is attempted; failures are reported per entry.")]
    async fn bulk_connect_content(
        &self,
        Parameters(input): Parameters<connected_content::BulkConnectContentInput>,
    ) -> String {
        tracing::debug!("bulk_connect_content tool called");
        connected_content::bulk_connect_content(&self.client, input).await.render()
    }

    // ========================================================================
    // Portals
    // ========================================================================

    #[tool(description = "Create a Service Portal with its URL suffix, pages, theme and content sources.")]
    async fn create_portal(
        &self,
        Parameters(input): Parameters<portal::CreatePortalInput>,
    ) -> String {
        tracing::debug!("create_portal tool called");
        portal::create_portal(&self.client, input).await.render()
    }

    #[tool(description = "Update a portal.")]
    async fn update_portal(
        &self,
        Parameters(input): Parameters<portal::UpdatePortalInput>,
    ) -> String {
        tracing::debug!("update_portal tool called");
        portal::update_portal(&self.client, input).await.render()
    }

    #[tool(description = "List Service Portals, filtered by active or default status.")]
    async fn list_portals(
        &self,
        Parameters(input): Parameters<portal::ListPortalsInput>,
    ) -> String {
        tracing::debug!("list_portals tool called");
        portal::list_portals(&self.client, input).await.render()
    }

    #[tool(description = "Get a Service Portal by sys_id or URL suffix.")]
    async fn get_portal(
        &self,
        Parameters(input): Parameters<portal::GetPortalInput>,
    ) -> String {
        tracing::debug!("get_portal tool called");
        portal::get_portal(&self.client, input).await.render()
    }

    #[tool(description = "Delete a portal.")]
    async fn delete_portal(
        &self,
        Parameters(input): Parameters<portal::DeletePortalInput>,
    ) -> String {
        tracing::debug!("delete_portal tool called");
        portal::delete_portal(&self.client, input).await.render()
    }

    // ========================================================================
    // Portal catalog and taxonomy associations
    // ========================================================================

    #[tool(description = "Publish a service catalog on a portal.")]
    async fn create_portal_catalog_association(
        &self,
        Parameters(input): Parameters<portal_association::CreatePortalCatalogAssociationInput>,
    ) -> String {
        tracing::debug!("create_portal_catalog_association tool called");
        portal_association::create_portal_catalog_association(&self.client, input).await.render()
    }

    #[tool(description = "List the catalogs published on portals, filtered by portal or catalog.")]
    async fn list_portal_catalog_associations(
        &self,
        Parameters(input): Parameters<portal_association::ListPortalCatalogAssociationsInput>,
    ) -> String {
        tracing::debug!("list_portal_catalog_associations tool called");
        portal_association::list_portal_catalog_associations(&self.client, input).await.render()
    }

    #[tool(description = "Get one portal catalog association.")]
    async fn get_portal_catalog_association(
        &self,
        Parameters(input): Parameters<portal_association::GetPortalCatalogAssociationInput>,
    ) -> String {
        tracing::debug!("get_portal_catalog_association tool called");
        portal_association::get_portal_catalog_association(&self.client, input).await.render()
    }

    #[tool(description = "Remove a catalog from a portal by association sys_id.")]
    async fn delete_portal_catalog_association(
        &self,
        Parameters(input): Parameters<portal_association::DeletePortalCatalogAssociationInput>,
    ) -> String {
        tracing::debug!("delete_portal_catalog_association tool called");
        portal_association::delete_portal_catalog_association(&self.client, input).await.render()
    }

    #[tool(description = "Publish several catalogs on one portal. Every catalog is attempted; failures are reported per entry.")]
    async fn bulk_create_portal_catalog_associations(
        &self,
        Parameters(input): Parameters<portal_association::BulkCreatePortalCatalogAssociationsInput>,
    ) -> String {
        tracing::debug!("bulk_create_portal_catalog_associations tool called");
        portal_association::bulk_create_portal_catalog_associations(&self.client, input).await.render()
    }

    #[tool(description = "Publish a knowledge taxonomy on a portal.")]
    async fn create_portal_taxonomy_association(
        &self,
        Parameters(input): Parameters<portal_association::CreatePortalTaxonomyAssociationInput>,
    ) -> String {
        tracing::debug!("create_portal_taxonomy_association tool called");
        portal_association::create_portal_taxonomy_association(&self.client, input).await.render()
    }

    #[tool(description = "Update a portal taxonomy association.")]
    async fn update_portal_taxonomy_association(
        &self,
        Parameters(input): Parameters<portal_association::UpdatePortalTaxonomyAssociationInput>,
    ) -> String {
        tracing::debug!("update_portal_taxonomy_association tool called");
        portal_association::update_portal_taxonomy_association(&self.client, input).await.render()
    }

    #[tool(description = "List the taxonomies published on portals, filtered by portal or taxonomy.")]
    async fn list_portal_taxonomy_associations(
        &self,
        Parameters(input): Parameters<portal_association::ListPortalTaxonomyAssociationsInput>,
    ) -> String {
        tracing::debug!("list_portal_taxonomy_associations tool called");
        portal_association::list_portal_taxonomy_associations(&self.client, input).await.render()
    }

    #[tool(description = "Get one portal taxonomy association.")]
    async fn get_portal_taxonomy_association(
        &self,
        Parameters(input): Parameters<portal_association::GetPortalTaxonomyAssociationInput>,
    ) -> String {
        tracing::debug!("get_portal_taxonomy_association tool called");
        portal_association::get_portal_taxonomy_association(&self.client, input).await.render()
    }

    #[tool(description = "Remove a taxonomy from a portal by association sys_id.")]
    async fn delete_portal_taxonomy_association(
        &self,
        Parameters(input): Parameters<portal_association::DeletePortalTaxonomyAssociationInput>,
    ) -> String {
        tracing::debug!("delete_portal_taxonomy_association tool called");
        portal_association::delete_portal_taxonomy_association(&self.client, input).await.render()
    }

    #[tool(description = "Publish several taxonomies on one portal. Every taxonomy is attempted; failures are reported per entry.")]
    async fn bulk_create_portal_taxonomy_associations(
        &self,
        Parameters(input): Parameters<portal_association::BulkCreatePortalTaxonomyAssociationsInput>,
    ) -> String {
        tracing::debug!("bulk_create_portal_taxonomy_associations tool called");
        portal_association::bulk_create_portal_taxonomy_associations(&self.client, input).await.render()
    }

    // ========================================================================
    // Taxonomy content configurations
    // ========================================================================

    #[tool(description = "Create a content type configuration that taxonomy topics can connect content of.")]
    async fn create_taxonomy_content_configuration(
        &self,
        Parameters(input): Parameters<taxonomy_content::CreateTaxonomyContentConfigurationInput>,
    ) -> String {
        tracing::debug!("create_taxonomy_content_configuration tool called");
        taxonomy_content::create_taxonomy_content_configuration(&self.client, input).await.render()
    }

    #[tool(description = "Update a content type configuration.")]
    async fn update_taxonomy_content_configuration(
        &self,
        Parameters(input): Parameters<taxonomy_content::UpdateTaxonomyContentConfigurationInput>,
    ) -> String {
        tracing::debug!("update_taxonomy_content_configuration tool called");
        taxonomy_content::update_taxonomy_content_configuration(&self.client, input).await.render()
    }

    #[tool(description = "List taxonomy content type configurations, filtered by active flag or table.")]
    async fn list_taxonomy_content_configurations(
        &self,
        Parameters(input): Parameters<taxonomy_content::ListTaxonomyContentConfigurationsInput>,
    ) -> String {
        tracing::debug!("list_taxonomy_content_configurations tool called");
        taxonomy_content::list_taxonomy_content_configurations(&self.client, input).await.render()
    }

    #[tool(description = "Get a taxonomy content type configuration by sys_id or name.")]
    async fn get_taxonomy_content_configuration(
        &self,
        Parameters(input): Parameters<taxonomy_content::GetTaxonomyContentConfigurationInput>,
    ) -> String {
        tracing::debug!("get_taxonomy_content_configuration tool called");
        taxonomy_content::get_taxonomy_content_configuration(&self.client, input).await.render()
    }

    #[tool(description = "Delete a content type configuration.")]
    async fn delete_taxonomy_content_configuration(
        &self,
        Parameters(input): Parameters<taxonomy_content::DeleteTaxonomyContentConfigurationInput>,
    ) -> String {
        tracing::debug!("delete_taxonomy_content_configuration tool called");
        taxonomy_content::delete_taxonomy_content_configuration(&self.client, input).await.render()
    }

    // ========================================================================
    // Security elevation
    // ========================================================================

    #[tool(description = "Elevate the current session to privileged roles (e.g. security_admin) for subsequent calls.")]
    async fn security_elevation(
        &self,
        Parameters(input): Parameters<elevation::SecurityElevationInput>,
    ) -> String {
        tracing::debug!("security_elevation tool called");
        elevation::security_elevation(&self.client, input).await.render()
    }
}

impl SnowServer {
    fn catalog(&self, input: &ListToolCatalogInput) -> ToolResponse {
        let tools: Vec<Value> = self
            .registry
            .search(input.keyword.as_deref())
            .into_iter()
            .map(|entry| {
                let mut item = json!({
                    "name": entry.name,
                    "module": entry.module,
                    "description": entry.description,
                    "params": entry.params,
                });
                if input.include_schema {
                    item["schema"] = entry.schema.clone();
                }
                item
            })
            .collect();
        ToolResponse::ok(
            format!("Found {} tools", tools.len()),
            json!({ "count": tools.len(), "tools": tools }),
        )
    }
}

#[tool_handler]
impl ServerHandler for SnowServer {
    /// Returns server information for the MCP initialize handshake.
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "snow-mcp manages ServiceNow configuration records through the Table API: \
                 ATF tests and steps, catalog items, categories, variables, client scripts, \
                 UI policies and availability, email notifications, layouts and templates, \
                 inbound email actions, UI actions, ACLs, user roles, tables, columns and \
                 choices, assignment rules, navigator menus, knowledge taxonomies, topics and \
                 connected content, Service Portals with their pages, layouts, widgets and \
                 catalog and taxonomy associations, quick links, images and record \
                 attachments. Every tool returns \
                 a JSON object with success, message and data. Use list_tool_catalog to browse \
                 the tools, security_elevation before changes that need elevated roles, and \
                 'ping' to verify the server is running."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, Config};
    use pretty_assertions::assert_eq;

    fn test_client() -> SnowClient {
        let config = Config::new(
            "https://dev00000.service-now.com",
            AuthConfig::Basic {
                username: "admin".to_string(),
                password: "test_password_12345".to_string(),
            },
        )
        .expect("valid test config");
        SnowClient::new(&config).expect("Failed to create test client")
    }

    #[test]
    fn test_server_creation() {
        let server = SnowServer::new(test_client());
        let info = server.get_info();
        assert!(info.instructions.is_some());
    }

    #[test]
    fn test_server_info_has_tools_capability() {
        let server = SnowServer::new(test_client());
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn test_ping() {
        let server = SnowServer::new(test_client());
        assert_eq!(server.ping(), "pong");
    }

    #[test]
    fn test_router_and_registry_agree() {
        let server = SnowServer::new(test_client());
        let routed: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        for entry in server.registry().entries() {
            assert!(routed.contains(&entry.name), "{} is not routed", entry.name);
        }
        // ping and list_tool_catalog are server-level tools
        assert_eq!(routed.len(), server.registry().len() + 2);
    }

    #[test]
    fn test_registry_has_no_generic_entries() {
        let server = SnowServer::new(test_client());
        assert!(server.registry().generic_entries().is_empty());
    }

    #[test]
    fn test_catalog_filters_by_keyword() {
        let server = SnowServer::new(test_client());
        let response = server.catalog(&ListToolCatalogInput {
            keyword: Some("attachment".to_string()),
            include_schema: false,
        });
        assert!(response.success);
        let data = response.data.unwrap();
        assert_eq!(data["count"], json!(6));
        assert!(data["tools"][0].get("schema").is_none());
    }

    #[test]
    fn test_catalog_can_include_schemas() {
        let server = SnowServer::new(test_client());
        let response = server.catalog(&ListToolCatalogInput {
            keyword: Some("security_elevation".to_string()),
            include_schema: true,
        });
        let data = response.data.unwrap();
        assert_eq!(data["count"], json!(1));
        assert!(data["tools"][0]["schema"].is_object());
    }
}
