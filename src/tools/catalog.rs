//! Service catalog tools: items (`sc_cat_item`) and categories (`sc_category`).

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;
use serde_json::{json, Value};

use super::table::{self, Page, TableSpec};
use super::{default_limit, default_true, failure};
use crate::models::{flatten, text, EncodedQuery, Record, RecordBody, TableQuery, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Catalog items.
pub const ITEMS: TableSpec = TableSpec {
    table: "sc_cat_item",
    label: "catalog item",
    plural: "catalog items",
    collection: "items",
    fields: &[
        "sys_id",
        "name",
        "short_description",
        "description",
        "category",
        "price",
        "picture",
        "active",
        "order",
    ],
    name_field: "name",
    alternate_key: None,
};

/// Catalog categories.
pub const CATEGORIES: TableSpec = TableSpec {
    table: "sc_category",
    label: "catalog category",
    plural: "catalog categories",
    collection: "categories",
    fields: &[
        "sys_id",
        "title",
        "description",
        "parent",
        "icon",
        "active",
        "order",
        "sc_catalog",
    ],
    name_field: "title",
    alternate_key: None,
};

/// Variables (questions) attached to catalog items.
const VARIABLE_TABLE: &str = "item_option_new";

const VARIABLE_FIELDS: &[&str] = &[
    "sys_id",
    "name",
    "question_text",
    "type",
    "mandatory",
    "default_value",
    "help_text",
    "order",
];

/// Optional catalog item fields shared by create and update.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct CatalogItemDetails {
    /// Detailed description of the catalog item.
    #[serde(default)]
    pub description: Option<String>,

    /// Catalog sys_id this item belongs to.
    #[serde(default)]
    pub sc_catalogs: Option<String>,

    /// Display order of the catalog item.
    #[serde(default)]
    pub order: Option<i64>,

    /// Price of the catalog item.
    #[serde(default)]
    pub price: Option<String>,

    /// List price of the catalog item.
    #[serde(default)]
    pub list_price: Option<String>,

    /// Cost of the catalog item.
    #[serde(default)]
    pub cost: Option<String>,

    /// Recurring price of the catalog item.
    #[serde(default)]
    pub recurring_price: Option<String>,

    /// Recurring frequency (e.g., "monthly").
    #[serde(default)]
    pub recurring_frequency: Option<String>,

    /// Whether the item is billable.
    #[serde(default)]
    pub billable: Option<bool>,

    /// Picture for the catalog item.
    #[serde(default)]
    pub picture: Option<String>,

    /// Icon for the catalog item.
    #[serde(default)]
    pub icon: Option<String>,

    /// Fulfillment group sys_id.
    #[serde(default)]
    pub group: Option<String>,

    /// Workflow sys_id.
    #[serde(default)]
    pub workflow: Option<String>,

    /// Delivery plan sys_id.
    #[serde(default)]
    pub delivery_plan: Option<String>,

    /// Delivery time.
    #[serde(default)]
    pub delivery_time: Option<String>,

    /// Required roles.
    #[serde(default)]
    pub roles: Option<String>,

    /// Access type (restricted, public, etc.).
    #[serde(default)]
    pub access_type: Option<String>,

    /// Availability setting.
    #[serde(default)]
    pub availability: Option<String>,

    /// Hide on Service Portal.
    #[serde(default)]
    pub hide_sp: Option<bool>,

    /// Hide cart functionality.
    #[serde(default)]
    pub no_cart: Option<bool>,

    /// Hide order functionality.
    #[serde(default)]
    pub no_order: Option<bool>,

    /// Hide from search.
    #[serde(default)]
    pub no_search: Option<bool>,

    /// Mandatory attachment.
    #[serde(default)]
    pub mandatory_attachment: Option<bool>,

    /// Taxonomy topic sys_id.
    #[serde(default)]
    pub taxonomy_topic: Option<String>,
}

impl CatalogItemDetails {
    fn apply(&self, body: RecordBody) -> RecordBody {
        body.set_opt("description", self.description.clone())
            .set_opt("sc_catalogs", self.sc_catalogs.clone())
            .set_opt("order", self.order)
            .set_opt("price", self.price.clone())
            .set_opt("list_price", self.list_price.clone())
            .set_opt("cost", self.cost.clone())
            .set_opt("recurring_price", self.recurring_price.clone())
            .set_opt("recurring_frequency", self.recurring_frequency.clone())
            .set_opt("billable", self.billable)
            .set_opt("picture", self.picture.clone())
            .set_opt("icon", self.icon.clone())
            .set_opt("group", self.group.clone())
            .set_opt("workflow", self.workflow.clone())
            .set_opt("delivery_plan", self.delivery_plan.clone())
            .set_opt("delivery_time", self.delivery_time.clone())
            .set_opt("roles", self.roles.clone())
            .set_opt("access_type", self.access_type.clone())
            .set_opt("availability", self.availability.clone())
            .set_opt("hide_sp", self.hide_sp)
            .set_opt("no_cart", self.no_cart)
            .set_opt("no_order", self.no_order)
            .set_opt("no_search", self.no_search)
            .set_opt("mandatory_attachment", self.mandatory_attachment)
            .set_opt("taxonomy_topic", self.taxonomy_topic.clone())
    }
}

/// Input parameters for the list_catalog_items tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListCatalogItemsInput {
    /// Maximum number of catalog items to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by category sys_id.
    #[serde(default)]
    pub category: Option<String>,

    /// Search text matched against name and short description.
    #[serde(default)]
    pub query: Option<String>,

    /// Only return active items (default: true).
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Input parameters for the get_catalog_item tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetCatalogItemInput {
    /// Catalog item sys_id.
    pub item_id: String,
}

/// Input parameters for the create_catalog_item tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateCatalogItemInput {
    /// Name of the catalog item.
    pub name: String,

    /// Short description of the catalog item.
    pub short_description: String,

    /// Category sys_id for the catalog item.
    pub category: String,

    /// Whether the catalog item is active (default: true).
    #[serde(default = "default_true")]
    pub active: bool,

    /// Optional item fields.
    #[serde(flatten)]
    pub details: CatalogItemDetails,
}

impl CreateCatalogItemInput {
    /// Request body for the new item.
    pub fn to_body(&self) -> RecordBody {
        let body = RecordBody::new()
            .set("name", self.name.as_str())
            .set("short_description", self.short_description.as_str())
            .set("category", self.category.trim())
            .set("active", self.active);
        self.details.apply(body)
    }
}

/// Input parameters for the update_catalog_item tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateCatalogItemInput {
    /// Catalog item sys_id.
    pub item_id: String,

    /// New name.
    #[serde(default)]
    pub name: Option<String>,

    /// New short description.
    #[serde(default)]
    pub short_description: Option<String>,

    /// New category sys_id.
    #[serde(default)]
    pub category: Option<String>,

    /// New active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// Optional item fields.
    #[serde(flatten)]
    pub details: CatalogItemDetails,
}

impl UpdateCatalogItemInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        let body = RecordBody::new()
            .set_opt("name", self.name.clone())
            .set_opt("short_description", self.short_description.clone())
            .set_opt("category", self.category.clone())
            .set_opt("active", self.active);
        self.details.apply(body)
    }
}

/// Input parameters for the delete_catalog_item tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteCatalogItemInput {
    /// Catalog item sys_id.
    pub item_id: String,
}

/// Input parameters for the move_catalog_items tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MoveCatalogItemsInput {
    /// Catalog item sys_ids to move.
    pub item_ids: Vec<String>,

    /// Category sys_id to move the items to.
    pub target_category_id: String,
}

/// Input parameters for the list_catalog_categories tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListCatalogCategoriesInput {
    /// Maximum number of categories to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Search text matched against title and description.
    #[serde(default)]
    pub query: Option<String>,

    /// Only return active categories (default: true).
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Input parameters for the create_catalog_category tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateCatalogCategoryInput {
    /// Title of the category.
    pub title: String,

    /// Description of the category.
    #[serde(default)]
    pub description: Option<String>,

    /// Parent category sys_id.
    #[serde(default)]
    pub parent: Option<String>,

    /// Icon for the category.
    #[serde(default)]
    pub icon: Option<String>,

    /// Whether the category is active (default: true).
    #[serde(default = "default_true")]
    pub active: bool,

    /// Order of the category.
    #[serde(default)]
    pub order: Option<i64>,

    /// Catalog sys_id this category belongs to.
    #[serde(default)]
    pub sc_catalog: Option<String>,
}

/// Input parameters for the update_catalog_category tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateCatalogCategoryInput {
    /// Category sys_id.
    pub category_id: String,

    /// New title.
    #[serde(default)]
    pub title: Option<String>,

    /// New description.
    #[serde(default)]
    pub description: Option<String>,

    /// New parent category sys_id.
    #[serde(default)]
    pub parent: Option<String>,

    /// New icon.
    #[serde(default)]
    pub icon: Option<String>,

    /// New active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// New order.
    #[serde(default)]
    pub order: Option<i64>,

    /// New catalog sys_id.
    #[serde(default)]
    pub sc_catalog: Option<String>,
}

/// Lists catalog items.
pub async fn list_catalog_items(client: &SnowClient, input: ListCatalogItemsInput) -> ToolResponse {
    let filter = EncodedQuery::new()
        .flag("active", input.active.then_some(true))
        .equals_opt("category", input.category.as_deref())
        .contains_any(&["short_description", "name"], input.query.as_deref());
    table::list(client, &ITEMS, Page::new(input.limit, input.offset), filter).await
}

/// Reshapes an `item_option_new` row: `question_text` is reported as `label`.
fn variable_row(record: &Record) -> Value {
    let mut row = flatten(record, VARIABLE_FIELDS);
    if let Value::Object(map) = &mut row {
        if let Some(label) = map.remove("question_text") {
            map.insert("label".to_string(), label);
        }
    }
    row
}

/// Gets a catalog item together with its variables.
///
/// A failure to read the variables is logged and reported as an empty list.
pub async fn get_catalog_item(client: &SnowClient, input: GetCatalogItemInput) -> ToolResponse {
    let item_id = input.item_id.trim();
    let item = match client
        .get_record(ITEMS.table, item_id, &TableQuery::display(ITEMS.fields))
        .await
    {
        Ok(item) => item,
        Err(e) => return failure(client, "Get catalog item", &e),
    };

    let query = TableQuery::display(VARIABLE_FIELDS).with_query(
        &EncodedQuery::new()
            .equals("cat_item", item_id)
            .raw(Some("ORDERBYorder")),
    );
    let variables: Vec<Value> = match client.list_records(VARIABLE_TABLE, &query).await {
        Ok(rows) => rows.iter().map(variable_row).collect(),
        Err(e) => {
            tracing::warn!(
                item_id = %item_id,
                error = %client.sanitize_error(&e),
                "Could not read catalog item variables"
            );
            Vec::new()
        }
    };

    let mut data = flatten(&item, ITEMS.fields);
    if let Value::Object(map) = &mut data {
        map.insert("variables".to_string(), Value::Array(variables));
    }
    ToolResponse::ok(
        format!(
            "Retrieved catalog item: {}",
            text(&item, "name").unwrap_or_default()
        ),
        data,
    )
}

/// Creates a catalog item.
pub async fn create_catalog_item(
    client: &SnowClient,
    input: CreateCatalogItemInput,
) -> ToolResponse {
    table::create(client, &ITEMS, input.to_body()).await
}

/// Updates a catalog item.
pub async fn update_catalog_item(
    client: &SnowClient,
    input: UpdateCatalogItemInput,
) -> ToolResponse {
    table::update(client, &ITEMS, &input.item_id, input.to_body()).await
}

/// Deletes a catalog item.
pub async fn delete_catalog_item(
    client: &SnowClient,
    input: DeleteCatalogItemInput,
) -> ToolResponse {
    table::delete(client, &ITEMS, &input.item_id).await
}

/// Moves catalog items to another category.
///
/// Succeeds when at least one item moved; failures are listed in
/// `data.failed_items`.
pub async fn move_catalog_items(client: &SnowClient, input: MoveCatalogItemsInput) -> ToolResponse {
    let target = input.target_category_id.trim();
    let body = RecordBody::new().set("category", target);

    let mut moved = 0usize;
    let mut failed = Vec::new();
    for item_id in &input.item_ids {
        let item_id = item_id.trim();
        match client
            .update_record(ITEMS.table, item_id, body.as_record())
            .await
        {
            Ok(_) => moved += 1,
            Err(e) => {
                let sanitized = client.sanitize_error(&e);
                tracing::error!(item_id = %item_id, error = %sanitized, "Error moving catalog item");
                failed.push(json!({ "item_id": item_id, "error": sanitized }));
            }
        }
    }

    let data = json!({
        "moved_items_count": moved,
        "failed_items": failed,
        "target_category_id": target,
    });
    if failed.is_empty() {
        ToolResponse::ok(
            format!("Moved {} catalog items to category {}", moved, target),
            data,
        )
    } else if moved > 0 {
        ToolResponse::ok(
            format!(
                "Partially moved catalog items: {} succeeded, {} failed",
                moved,
                failed.len()
            ),
            data,
        )
    } else {
        ToolResponse::failure_with("Move catalog items failed: no item could be moved", data)
    }
}

/// Lists catalog categories.
pub async fn list_catalog_categories(
    client: &SnowClient,
    input: ListCatalogCategoriesInput,
) -> ToolResponse {
    let filter = EncodedQuery::new()
        .flag("active", input.active.then_some(true))
        .contains_any(&["title", "description"], input.query.as_deref());
    table::list(client, &CATEGORIES, Page::new(input.limit, input.offset), filter).await
}

/// Creates a catalog category.
pub async fn create_catalog_category(
    client: &SnowClient,
    input: CreateCatalogCategoryInput,
) -> ToolResponse {
    let body = RecordBody::new()
        .set("title", input.title.as_str())
        .set("active", input.active)
        .set_opt("description", input.description)
        .set_opt("parent", input.parent)
        .set_opt("icon", input.icon)
        .set_opt("order", input.order)
        .set_opt("sc_catalog", input.sc_catalog);
    table::create(client, &CATEGORIES, body).await
}

/// Updates a catalog category.
pub async fn update_catalog_category(
    client: &SnowClient,
    input: UpdateCatalogCategoryInput,
) -> ToolResponse {
    let body = RecordBody::new()
        .set_opt("title", input.title)
        .set_opt("description", input.description)
        .set_opt("parent", input.parent)
        .set_opt("icon", input.icon)
        .set_opt("active", input.active)
        .set_opt("order", input.order)
        .set_opt("sc_catalog", input.sc_catalog);
    table::update(client, &CATEGORIES, &input.category_id, body).await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("catalog")
        .operation(
            "list_catalog_items",
            "List service catalog items. Only active items unless active=false.",
        )
        .operation(
            "get_catalog_item",
            "Get a service catalog item including its variables (questions).",
        )
        .operation(
            "create_catalog_item",
            "Create a service catalog item. Name, short_description and category are required.",
        )
        .undocumented("update_catalog_item")
        .undocumented("delete_catalog_item")
        .operation(
            "move_catalog_items",
            "Move catalog items to another category. Reports partial success.",
        )
        .undocumented("list_catalog_categories")
        .undocumented("create_catalog_category")
        .undocumented("update_catalog_category")
        .params::<ListCatalogItemsInput>()
        .params::<GetCatalogItemInput>()
        .params::<CreateCatalogItemInput>()
        .params::<UpdateCatalogItemInput>()
        .params::<DeleteCatalogItemInput>()
        .params::<MoveCatalogItemsInput>()
        .params::<ListCatalogCategoriesInput>()
        .params::<CreateCatalogCategoryInput>()
        .params::<UpdateCatalogCategoryInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_item_body_flattens_details() {
        let input: CreateCatalogItemInput = serde_json::from_value(json!({
            "name": "Laptop",
            "short_description": "Standard laptop",
            "category": "cat1",
            "price": "999",
            "no_cart": true
        }))
        .unwrap();
        assert_eq!(
            Value::Object(input.to_body().into_record()),
            json!({
                "name": "Laptop",
                "short_description": "Standard laptop",
                "category": "cat1",
                "active": true,
                "price": "999",
                "no_cart": true
            })
        );
    }

    #[test]
    fn test_update_item_body_is_sparse() {
        let input: UpdateCatalogItemInput =
            serde_json::from_value(json!({"item_id": "i1", "price": "10"})).unwrap();
        let body = input.to_body();
        assert_eq!(body.len(), 1);
        assert_eq!(body.get("price"), Some(&json!("10")));
    }

    #[test]
    fn test_variable_row_renames_question_text() {
        let record = json!({
            "sys_id": "v1",
            "name": "ram",
            "question_text": "How much RAM?",
            "mandatory": "true"
        })
        .as_object()
        .cloned()
        .unwrap();
        let row = variable_row(&record);
        assert_eq!(row["label"], json!("How much RAM?"));
        assert!(row.get("question_text").is_none());
        assert_eq!(row["type"], json!(""));
    }
}
