//! Service Portal layout tools: containers (`sp_container`), rows
//! (`sp_row`) and columns (`sp_column`).
//!
//! A page holds containers, a container holds rows, a row holds columns,
//! and a column may nest further rows.

use std::collections::BTreeMap;

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{default_limit, default_true};
use super::table::{self, Page, Sequence, TableSpec};
use crate::error::SnowError;
use crate::models::{flag, number, text, EncodedQuery, Record, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Portal containers.
pub const CONTAINERS: TableSpec = TableSpec {
    table: "sp_container",
    label: "portal container",
    plural: "portal containers",
    collection: "containers",
    fields: &[
        "sys_id",
        "name",
        "sp_page",
        "order",
        "class_name",
        "container_class_name",
        "width",
        "background_color",
        "background_image",
        "background_style",
        "bootstrap_alt",
        "subheader",
        "title",
        "semantic_tag",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "name",
    alternate_key: None,
};

/// Portal rows.
pub const ROWS: TableSpec = TableSpec {
    table: "sp_row",
    label: "portal row",
    plural: "portal rows",
    collection: "rows",
    fields: &[
        "sys_id",
        "sp_container",
        "sp_column",
        "class_name",
        "order",
        "semantic_tag",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "sys_id",
    alternate_key: None,
};

/// Portal columns.
pub const COLUMNS: TableSpec = TableSpec {
    table: "sp_column",
    label: "portal column",
    plural: "portal columns",
    collection: "columns",
    fields: &[
        "sys_id",
        "sp_row",
        "class_name",
        "order",
        "size",
        "size_xs",
        "size_sm",
        "size_lg",
        "semantic_tag",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "sys_id",
    alternate_key: None,
};

/// Responsive width fields of a column.
const SIZE_FIELDS: &[&str] = &["size", "size_xs", "size_sm", "size_lg"];

/// Order for a clone: the explicit one, else right after the source.
fn clone_order(source: &Record, explicit: Option<i64>) -> i64 {
    explicit.unwrap_or_else(|| number(source, "order").unwrap_or(0) + 1)
}

// ============================================================================
// Containers
// ============================================================================

/// Input parameters for the create_portal_container tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreatePortalContainerInput {
    /// Name of the container.
    pub name: String,

    /// Page sys_id the container belongs to.
    pub sp_page: String,

    /// Display order within the page.
    #[serde(default)]
    pub order: Option<i64>,

    /// Parent CSS class name.
    #[serde(default)]
    pub class_name: Option<String>,

    /// Container CSS class name.
    #[serde(default)]
    pub container_class_name: Option<String>,

    /// Width: "container" (default), "container-fluid", ...
    #[serde(default)]
    pub width: Option<String>,

    /// Background color.
    #[serde(default)]
    pub background_color: Option<String>,

    /// Background image attachment.
    #[serde(default)]
    pub background_image: Option<String>,

    /// Background style (default: "default").
    #[serde(default)]
    pub background_style: Option<String>,

    /// Use the Bootstrap alternative (default: false).
    #[serde(default)]
    pub bootstrap_alt: bool,

    /// Move to header (default: false).
    #[serde(default)]
    pub subheader: bool,

    /// Screen reader title.
    #[serde(default)]
    pub title: Option<String>,

    /// Semantic HTML tag.
    #[serde(default)]
    pub semantic_tag: Option<String>,
}

impl CreatePortalContainerInput {
    /// Request body for the new container.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set("name", self.name.as_str())
            .set("sp_page", self.sp_page.trim())
            .set("width", self.width.as_deref().unwrap_or("container"))
            .set(
                "background_style",
                self.background_style.as_deref().unwrap_or("default"),
            )
            .set("bootstrap_alt", self.bootstrap_alt)
            .set("subheader", self.subheader)
            .set_opt("order", self.order)
            .set_opt("class_name", self.class_name.clone())
            .set_opt("container_class_name", self.container_class_name.clone())
            .set_opt("background_color", self.background_color.clone())
            .set_opt("background_image", self.background_image.clone())
            .set_opt("title", self.title.clone())
            .set_opt("semantic_tag", self.semantic_tag.clone())
    }
}

/// Input parameters for the update_portal_container tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdatePortalContainerInput {
    /// Container sys_id.
    pub container_id: String,

    /// New name.
    #[serde(default)]
    pub name: Option<String>,

    /// New page sys_id.
    #[serde(default)]
    pub sp_page: Option<String>,

    /// New display order.
    #[serde(default)]
    pub order: Option<i64>,

    /// New parent CSS class name.
    #[serde(default)]
    pub class_name: Option<String>,

    /// New container CSS class name.
    #[serde(default)]
    pub container_class_name: Option<String>,

    /// New width.
    #[serde(default)]
    pub width: Option<String>,

    /// New background color.
    #[serde(default)]
    pub background_color: Option<String>,

    /// New background image.
    #[serde(default)]
    pub background_image: Option<String>,

    /// New background style.
    #[serde(default)]
    pub background_style: Option<String>,

    /// New Bootstrap alternative setting.
    #[serde(default)]
    pub bootstrap_alt: Option<bool>,

    /// New move-to-header setting.
    #[serde(default)]
    pub subheader: Option<bool>,

    /// New screen reader title.
    #[serde(default)]
    pub title: Option<String>,

    /// New semantic HTML tag.
    #[serde(default)]
    pub semantic_tag: Option<String>,
}

impl UpdatePortalContainerInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set_opt("name", self.name.clone())
            .set_opt("sp_page", self.sp_page.clone())
            .set_opt("order", self.order)
            .set_opt("class_name", self.class_name.clone())
            .set_opt("container_class_name", self.container_class_name.clone())
            .set_opt("width", self.width.clone())
            .set_opt("background_color", self.background_color.clone())
            .set_opt("background_image", self.background_image.clone())
            .set_opt("background_style", self.background_style.clone())
            .set_opt("bootstrap_alt", self.bootstrap_alt)
            .set_opt("subheader", self.subheader)
            .set_opt("title", self.title.clone())
            .set_opt("semantic_tag", self.semantic_tag.clone())
    }
}

/// Input parameters for the list_portal_containers tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListPortalContainersInput {
    /// Filter by page sys_id.
    #[serde(default)]
    pub sp_page: Option<String>,

    /// Filter by semantic tag.
    #[serde(default)]
    pub semantic_tag: Option<String>,

    /// Filter by width.
    #[serde(default)]
    pub width: Option<String>,

    /// Maximum number of containers to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Additional encoded query.
    #[serde(default)]
    pub query: Option<String>,
}

/// Input parameters for the get_portal_container tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetPortalContainerInput {
    /// Container sys_id.
    pub container_id: String,
}

/// Input parameters for the delete_portal_container tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeletePortalContainerInput {
    /// Container sys_id.
    pub container_id: String,
}

/// Input parameters for the clone_portal_container tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ClonePortalContainerInput {
    /// Source container sys_id.
    pub source_container_id: String,

    /// Name for the cloned container.
    pub new_name: String,

    /// Page sys_id for the clone.
    pub target_page: String,

    /// Copy background settings (default: true).
    #[serde(default = "default_true")]
    pub copy_background: bool,

    /// Copy CSS classes, width and semantic tag (default: true).
    #[serde(default = "default_true")]
    pub copy_styling: bool,

    /// Order for the clone (default: source order + 1).
    #[serde(default)]
    pub new_order: Option<i64>,
}

/// Input parameters for the reorder_portal_containers tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReorderPortalContainersInput {
    /// Page sys_id the containers belong to.
    pub page_id: String,

    /// Container sys_ids in the desired order.
    pub container_order: Vec<String>,
}

/// Creates a portal container.
pub async fn create_portal_container(
    client: &SnowClient,
    input: CreatePortalContainerInput,
) -> ToolResponse {
    table::create(client, &CONTAINERS, input.to_body()).await
}

/// Updates a portal container.
pub async fn update_portal_container(
    client: &SnowClient,
    input: UpdatePortalContainerInput,
) -> ToolResponse {
    table::update(client, &CONTAINERS, &input.container_id, input.to_body()).await
}

/// Lists portal containers.
pub async fn list_portal_containers(
    client: &SnowClient,
    input: ListPortalContainersInput,
) -> ToolResponse {
    let filter = EncodedQuery::new()
        .equals_opt("sp_page", input.sp_page.as_deref())
        .equals_opt("semantic_tag", input.semantic_tag.as_deref())
        .equals_opt("width", input.width.as_deref())
        .raw(input.query.as_deref());
    table::list(client, &CONTAINERS, Page::new(input.limit, input.offset), filter).await
}

/// Gets one portal container.
pub async fn get_portal_container(
    client: &SnowClient,
    input: GetPortalContainerInput,
) -> ToolResponse {
    table::get(client, &CONTAINERS, &input.container_id).await
}

/// Deletes a portal container.
pub async fn delete_portal_container(
    client: &SnowClient,
    input: DeletePortalContainerInput,
) -> ToolResponse {
    table::delete(client, &CONTAINERS, &input.container_id).await
}

/// Copies a container onto a page. Its rows are not copied.
pub async fn clone_portal_container(
    client: &SnowClient,
    input: ClonePortalContainerInput,
) -> ToolResponse {
    table::clone_record(client, &CONTAINERS, &input.source_container_id, |source| {
        let mut body = RecordBody::new()
            .set("name", input.new_name.as_str())
            .set("sp_page", input.target_page.trim())
            .set("order", clone_order(source, input.new_order))
            .set("subheader", flag(source, "subheader").unwrap_or(false))
            .set_opt(
                "title",
                text(source, "title").map(|t| format!("{} (Clone)", t)),
            );

        if input.copy_styling {
            for field in [
                "class_name",
                "container_class_name",
                "width",
                "bootstrap_alt",
                "semantic_tag",
            ] {
                body = body.set_opt(field, text(source, field));
            }
        }
        if input.copy_background {
            for field in ["background_color", "background_image", "background_style"] {
                body = body.set_opt(field, text(source, field));
            }
        }
        Ok(body)
    })
    .await
}

/// Renumbers the containers of a page as 10, 20, 30...
///
/// Every container is attempted; the call fails if any update did.
pub async fn reorder_portal_containers(
    client: &SnowClient,
    input: ReorderPortalContainersInput,
) -> ToolResponse {
    table::reorder(
        client,
        &CONTAINERS,
        Sequence::TENS,
        &input.page_id,
        &input.container_order,
    )
    .await
}

// ============================================================================
// Rows
// ============================================================================

/// Input parameters for the create_portal_row tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreatePortalRowInput {
    /// Container sys_id the row belongs to.
    #[serde(default)]
    pub sp_container: Option<String>,

    /// Column sys_id the row is nested in.
    #[serde(default)]
    pub sp_column: Option<String>,

    /// CSS class name.
    #[serde(default)]
    pub class_name: Option<String>,

    /// Display order within the container or column.
    #[serde(default)]
    pub order: Option<i64>,

    /// Semantic HTML tag (e.g., "section", "div").
    #[serde(default)]
    pub semantic_tag: Option<String>,
}

/// Input parameters for the update_portal_row tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdatePortalRowInput {
    /// Row sys_id.
    pub row_id: String,

    /// New container sys_id.
    #[serde(default)]
    pub sp_container: Option<String>,

    /// New column sys_id.
    #[serde(default)]
    pub sp_column: Option<String>,

    /// New CSS class name.
    #[serde(default)]
    pub class_name: Option<String>,

    /// New display order.
    #[serde(default)]
    pub order: Option<i64>,

    /// New semantic HTML tag.
    #[serde(default)]
    pub semantic_tag: Option<String>,
}

/// Input parameters for the list_portal_rows tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListPortalRowsInput {
    /// Maximum number of rows to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by container sys_id.
    #[serde(default)]
    pub sp_container: Option<String>,

    /// Filter by column sys_id.
    #[serde(default)]
    pub sp_column: Option<String>,

    /// Filter by semantic tag.
    #[serde(default)]
    pub semantic_tag: Option<String>,

    /// Additional encoded query.
    #[serde(default)]
    pub query: Option<String>,
}

/// Input parameters for the get_portal_row tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetPortalRowInput {
    /// Row sys_id.
    pub row_id: String,
}

/// Input parameters for the delete_portal_row tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeletePortalRowInput {
    /// Row sys_id.
    pub row_id: String,
}

/// Input parameters for the clone_portal_row tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ClonePortalRowInput {
    /// Source row sys_id.
    pub source_row_id: String,

    /// Container sys_id for the clone (default: the source's).
    #[serde(default)]
    pub target_container: Option<String>,

    /// Column sys_id for the clone (default: the source's).
    #[serde(default)]
    pub target_column: Option<String>,

    /// Copy the CSS class name (default: true).
    #[serde(default = "default_true")]
    pub copy_class_name: bool,

    /// Order for the clone (default: source order + 1).
    #[serde(default)]
    pub new_order: Option<i64>,

    /// Copy the semantic tag (default: true).
    #[serde(default = "default_true")]
    pub copy_semantic_tag: bool,
}

/// Input parameters for the reorder_portal_rows tool.
///
/// One of `container_id` or `column_id` names the parent.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReorderPortalRowsInput {
    /// Container sys_id the rows belong to.
    #[serde(default)]
    pub container_id: Option<String>,

    /// Column sys_id the rows are nested in.
    #[serde(default)]
    pub column_id: Option<String>,

    /// Row sys_ids in the desired order.
    pub row_order: Vec<String>,
}

/// Creates a portal row.
pub async fn create_portal_row(client: &SnowClient, input: CreatePortalRowInput) -> ToolResponse {
    let body = RecordBody::new()
        .set_opt("sp_container", input.sp_container)
        .set_opt("sp_column", input.sp_column)
        .set_opt("class_name", input.class_name)
        .set_opt("order", input.order)
        .set_opt("semantic_tag", input.semantic_tag);
    table::create(client, &ROWS, body).await
}

/// Updates a portal row.
pub async fn update_portal_row(client: &SnowClient, input: UpdatePortalRowInput) -> ToolResponse {
    let body = RecordBody::new()
        .set_opt("sp_container", input.sp_container)
        .set_opt("sp_column", input.sp_column)
        .set_opt("class_name", input.class_name)
        .set_opt("order", input.order)
        .set_opt("semantic_tag", input.semantic_tag);
    table::update(client, &ROWS, &input.row_id, body).await
}

/// Lists portal rows.
pub async fn list_portal_rows(client: &SnowClient, input: ListPortalRowsInput) -> ToolResponse {
    let filter = EncodedQuery::new()
        .equals_opt("sp_container", input.sp_container.as_deref())
        .equals_opt("sp_column", input.sp_column.as_deref())
        .equals_opt("semantic_tag", input.semantic_tag.as_deref())
        .raw(input.query.as_deref());
    table::list(client, &ROWS, Page::new(input.limit, input.offset), filter).await
}

/// Gets one portal row.
pub async fn get_portal_row(client: &SnowClient, input: GetPortalRowInput) -> ToolResponse {
    table::get(client, &ROWS, &input.row_id).await
}

/// Deletes a portal row.
pub async fn delete_portal_row(client: &SnowClient, input: DeletePortalRowInput) -> ToolResponse {
    table::delete(client, &ROWS, &input.row_id).await
}

/// Copies a row, optionally into another container or column.
pub async fn clone_portal_row(client: &SnowClient, input: ClonePortalRowInput) -> ToolResponse {
    table::clone_record(client, &ROWS, &input.source_row_id, |source| {
        let mut body = RecordBody::new()
            .set_opt(
                "sp_container",
                input
                    .target_container
                    .clone()
                    .or_else(|| text(source, "sp_container")),
            )
            .set_opt(
                "sp_column",
                input
                    .target_column
                    .clone()
                    .or_else(|| text(source, "sp_column")),
            )
            .set("order", clone_order(source, input.new_order));
        if input.copy_class_name {
            body = body.set_opt("class_name", text(source, "class_name"));
        }
        if input.copy_semantic_tag {
            body = body.set_opt("semantic_tag", text(source, "semantic_tag"));
        }
        Ok(body)
    })
    .await
}

/// Renumbers the rows of a container or column as 1, 2, 3...
///
/// Every row is attempted; the call fails if any update did.
pub async fn reorder_portal_rows(client: &SnowClient, input: ReorderPortalRowsInput) -> ToolResponse {
    let parent = match input.container_id.as_deref().or(input.column_id.as_deref()) {
        Some(parent) => parent.to_string(),
        None => {
            return super::failure(
                client,
                "Reorder portal rows",
                &SnowError::validation("either container_id or column_id is required"),
            )
        }
    };
    table::reorder(client, &ROWS, Sequence::CONSECUTIVE, &parent, &input.row_order).await
}

// ============================================================================
// Columns
// ============================================================================

/// Styling and responsive sizes of a column (Bootstrap widths 1-12).
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ColumnLayout {
    /// CSS class name.
    #[serde(default)]
    pub class_name: Option<String>,

    /// Column size on medium devices.
    #[serde(default)]
    pub size: Option<i64>,

    /// Column size on extra small devices.
    #[serde(default)]
    pub size_xs: Option<i64>,

    /// Column size on small devices.
    #[serde(default)]
    pub size_sm: Option<i64>,

    /// Column size on large devices.
    #[serde(default)]
    pub size_lg: Option<i64>,

    /// Semantic HTML tag (e.g., "aside", "article").
    #[serde(default)]
    pub semantic_tag: Option<String>,
}

impl ColumnLayout {
    fn apply(&self, body: RecordBody) -> RecordBody {
        body.set_opt("class_name", self.class_name.clone())
            .set_opt("size", self.size)
            .set_opt("size_xs", self.size_xs)
            .set_opt("size_sm", self.size_sm)
            .set_opt("size_lg", self.size_lg)
            .set_opt("semantic_tag", self.semantic_tag.clone())
    }
}

/// Input parameters for the create_portal_column tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreatePortalColumnInput {
    /// Row sys_id the column belongs to.
    pub sp_row: String,

    /// Display order within the row.
    #[serde(default)]
    pub order: Option<i64>,

    /// Styling and sizes.
    #[serde(flatten)]
    pub layout: ColumnLayout,
}

/// Input parameters for the update_portal_column tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdatePortalColumnInput {
    /// Column sys_id.
    pub column_id: String,

    /// New row sys_id.
    #[serde(default)]
    pub sp_row: Option<String>,

    /// New display order.
    #[serde(default)]
    pub order: Option<i64>,

    /// New styling and sizes.
    #[serde(flatten)]
    pub layout: ColumnLayout,
}

/// Input parameters for the list_portal_columns tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListPortalColumnsInput {
    /// Maximum number of columns to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by row sys_id.
    #[serde(default)]
    pub sp_row: Option<String>,

    /// Filter by semantic tag.
    #[serde(default)]
    pub semantic_tag: Option<String>,

    /// Filter on `size` with an operator, e.g. ">=6" or "=12".
    #[serde(default)]
    pub size_filter: Option<String>,

    /// Additional encoded query.
    #[serde(default)]
    pub query: Option<String>,
}

/// Input parameters for the get_portal_column tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetPortalColumnInput {
    /// Column sys_id.
    pub column_id: String,
}

/// Input parameters for the delete_portal_column tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeletePortalColumnInput {
    /// Column sys_id.
    pub column_id: String,
}

/// Input parameters for the clone_portal_column tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ClonePortalColumnInput {
    /// Source column sys_id.
    pub source_column_id: String,

    /// Row sys_id for the clone.
    pub target_row: String,

    /// Copy the CSS class name (default: true).
    #[serde(default = "default_true")]
    pub copy_class_name: bool,

    /// Copy all responsive sizes (default: true).
    #[serde(default = "default_true")]
    pub copy_sizes: bool,

    /// Copy the semantic tag (default: true).
    #[serde(default = "default_true")]
    pub copy_semantic_tag: bool,

    /// Order for the clone (default: source order + 1).
    #[serde(default)]
    pub new_order: Option<i64>,

    /// Sizes to override, e.g. {"size": 6, "size_sm": 12}.
    #[serde(default)]
    pub override_sizes: Option<BTreeMap<String, i64>>,
}

/// Input parameters for the reorder_portal_columns tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReorderPortalColumnsInput {
    /// Row sys_id the columns belong to.
    pub row_id: String,

    /// Column sys_ids in the desired order.
    pub column_order: Vec<String>,
}

/// Input parameters for the create_responsive_grid tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateResponsiveGridInput {
    /// Row sys_id to create the columns in.
    pub sp_row: String,

    /// One entry per column, left to right.
    pub grid_layout: Vec<ColumnLayout>,
}

/// Creates a portal column.
pub async fn create_portal_column(
    client: &SnowClient,
    input: CreatePortalColumnInput,
) -> ToolResponse {
    let body = RecordBody::new()
        .set("sp_row", input.sp_row.trim())
        .set_opt("order", input.order);
    table::create(client, &COLUMNS, input.layout.apply(body)).await
}

/// Updates a portal column.
pub async fn update_portal_column(
    client: &SnowClient,
    input: UpdatePortalColumnInput,
) -> ToolResponse {
    let body = RecordBody::new()
        .set_opt("sp_row", input.sp_row.clone())
        .set_opt("order", input.order);
    table::update(client, &COLUMNS, &input.column_id, input.layout.apply(body)).await
}

/// Lists portal columns.
pub async fn list_portal_columns(
    client: &SnowClient,
    input: ListPortalColumnsInput,
) -> ToolResponse {
    let size = input.size_filter.as_deref().map(|f| format!("size{}", f.trim()));
    let filter = EncodedQuery::new()
        .equals_opt("sp_row", input.sp_row.as_deref())
        .equals_opt("semantic_tag", input.semantic_tag.as_deref())
        .raw(size.as_deref())
        .raw(input.query.as_deref());
    table::list(client, &COLUMNS, Page::new(input.limit, input.offset), filter).await
}

/// Gets one portal column.
pub async fn get_portal_column(client: &SnowClient, input: GetPortalColumnInput) -> ToolResponse {
    table::get(client, &COLUMNS, &input.column_id).await
}

/// Deletes a portal column.
pub async fn delete_portal_column(
    client: &SnowClient,
    input: DeletePortalColumnInput,
) -> ToolResponse {
    table::delete(client, &COLUMNS, &input.column_id).await
}

/// Copies a column into a row.
///
/// `override_sizes` keys must be size fields; anything else fails before
/// the clone is created.
pub async fn clone_portal_column(
    client: &SnowClient,
    input: ClonePortalColumnInput,
) -> ToolResponse {
    table::clone_record(client, &COLUMNS, &input.source_column_id, |source| {
        let mut body = RecordBody::new()
            .set("sp_row", input.target_row.trim())
            .set("order", clone_order(source, input.new_order));
        if input.copy_class_name {
            body = body.set_opt("class_name", text(source, "class_name"));
        }
        if input.copy_semantic_tag {
            body = body.set_opt("semantic_tag", text(source, "semantic_tag"));
        }
        if input.copy_sizes {
            for field in SIZE_FIELDS {
                body = body.set_opt(field, number(source, field));
            }
        }
        for (field, size) in input.override_sizes.iter().flatten() {
            if !SIZE_FIELDS.contains(&field.as_str()) {
                return Err(SnowError::validation(format!(
                    "override_sizes key must be one of {}, got: {:?}",
                    SIZE_FIELDS.join(", "),
                    field
                )));
            }
            body = body.set(field, *size);
        }
        Ok(body)
    })
    .await
}

/// Renumbers the columns of a row as 1, 2, 3...
///
/// Every column is attempted; the call fails if any update did.
pub async fn reorder_portal_columns(
    client: &SnowClient,
    input: ReorderPortalColumnsInput,
) -> ToolResponse {
    table::reorder(
        client,
        &COLUMNS,
        Sequence::CONSECUTIVE,
        &input.row_id,
        &input.column_order,
    )
    .await
}

/// Creates one column per `grid_layout` entry with orders 1, 2, 3...
///
/// Every entry is attempted; the call fails if any column failed.
pub async fn create_responsive_grid(
    client: &SnowClient,
    input: CreateResponsiveGridInput,
) -> ToolResponse {
    let row = input.sp_row.trim();
    let mut created = Vec::new();
    let mut failed = Vec::new();

    for (index, layout) in input.grid_layout.iter().enumerate() {
        let body = RecordBody::new()
            .set("sp_row", row)
            .set("order", index as i64 + 1);
        match client
            .create_record(COLUMNS.table, layout.apply(body).as_record())
            .await
        {
            Ok(record) => created.push(Value::String(text(&record, "sys_id").unwrap_or_default())),
            Err(e) => failed.push(format!(
                "Column {}: {}",
                index + 1,
                client.sanitize_error(&e)
            )),
        }
    }

    let data = json!({ "sp_row": row, "columns": created, "failed": failed });
    if failed.is_empty() {
        tracing::info!(sp_row = %row, columns = created.len(), "Responsive grid created");
        ToolResponse::ok(
            format!("Created {} columns in responsive grid", created.len()),
            data,
        )
    } else {
        tracing::error!(sp_row = %row, failed = failed.len(), "Responsive grid incomplete");
        ToolResponse::failure_with(
            format!(
                "Create responsive grid failed: {}",
                failed.join("; ")
            ),
            data,
        )
    }
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("portal_layout")
        .operation(
            "create_portal_container",
            "Create a container on a Service Portal page.",
        )
        .undocumented("update_portal_container")
        .undocumented("list_portal_containers")
        .undocumented("get_portal_container")
        .undocumented("delete_portal_container")
        .operation(
            "clone_portal_container",
            "Copy a container onto a page, optionally without its background or styling. Rows are not copied.",
        )
        .undocumented("reorder_portal_containers")
        .operation(
            "create_portal_row",
            "Create a row in a container, or nested in a column.",
        )
        .undocumented("update_portal_row")
        .undocumented("list_portal_rows")
        .undocumented("get_portal_row")
        .undocumented("delete_portal_row")
        .undocumented("clone_portal_row")
        .operation(
            "reorder_portal_rows",
            "Set the order of rows within a container or column to 1, 2, 3... Every row is attempted.",
        )
        .operation(
            "create_portal_column",
            "Create a column in a row with Bootstrap sizes (1-12) per device class.",
        )
        .undocumented("update_portal_column")
        .undocumented("list_portal_columns")
        .undocumented("get_portal_column")
        .undocumented("delete_portal_column")
        .undocumented("clone_portal_column")
        .undocumented("reorder_portal_columns")
        .operation(
            "create_responsive_grid",
            "Create several columns in a row at once, ordered left to right.",
        )
        .params::<CreatePortalContainerInput>()
        .params::<UpdatePortalContainerInput>()
        .params::<ListPortalContainersInput>()
        .params::<GetPortalContainerInput>()
        .params::<DeletePortalContainerInput>()
        .params::<ClonePortalContainerInput>()
        .params::<ReorderPortalContainersInput>()
        .params::<CreatePortalRowInput>()
        .params::<UpdatePortalRowInput>()
        .params::<ListPortalRowsInput>()
        .params::<GetPortalRowInput>()
        .params::<DeletePortalRowInput>()
        .params::<ClonePortalRowInput>()
        .params::<ReorderPortalRowsInput>()
        .params::<CreatePortalColumnInput>()
        .params::<UpdatePortalColumnInput>()
        .params::<ListPortalColumnsInput>()
        .params::<GetPortalColumnInput>()
        .params::<DeletePortalColumnInput>()
        .params::<ClonePortalColumnInput>()
        .params::<ReorderPortalColumnsInput>()
        .params::<CreateResponsiveGridInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, Config};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_container_body_defaults() {
        let input: CreatePortalContainerInput =
            serde_json::from_value(json!({"name": "Hero", "sp_page": "p1"})).unwrap();
        assert_eq!(
            Value::Object(input.to_body().into_record()),
            json!({
                "name": "Hero",
                "sp_page": "p1",
                "width": "container",
                "background_style": "default",
                "bootstrap_alt": false,
                "subheader": false
            })
        );
    }

    #[test]
    fn test_column_layout_flattens() {
        let input: CreatePortalColumnInput =
            serde_json::from_value(json!({"sp_row": "r1", "size": 6, "size_xs": 12})).unwrap();
        assert_eq!(input.layout.size, Some(6));
        assert_eq!(input.layout.size_xs, Some(12));
        assert_eq!(input.layout.size_lg, None);
    }

    #[test]
    fn test_clone_order_follows_source() {
        let source = json!({"order": "300"}).as_object().cloned().unwrap();
        assert_eq!(clone_order(&source, None), 301);
        assert_eq!(clone_order(&source, Some(5)), 5);
        assert_eq!(clone_order(&Record::new(), None), 1);
    }

    #[tokio::test]
    async fn test_reorder_rows_requires_parent() {
        let config = Config::new(
            "http://127.0.0.1:9",
            AuthConfig::OAuth {
                token: "tok-offline".to_string(),
            },
        )
        .unwrap();
        let client = SnowClient::new(&config).unwrap();
        let input = ReorderPortalRowsInput {
            container_id: None,
            column_id: None,
            row_order: vec!["r1".to_string()],
        };
        let response = reorder_portal_rows(&client, input).await;
        assert!(!response.success);
        assert!(response.message.contains("container_id or column_id"));
    }
}
