//! Table definitions (`sys_db_object`) and their columns (`sys_dictionary`).
//!
//! Tables are addressed by name or sys_id; columns by table name plus
//! column (element) name.

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;
use serde_json::json;

use super::table::{self, Page, TableSpec};
use super::table_choice::{choice_body, ChoiceEntry, CHOICES};
use super::{default_limit, default_true, failure};
use crate::models::{flatten, text, EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Table definitions.
pub const TABLES: TableSpec = TableSpec {
    table: "sys_db_object",
    label: "table",
    plural: "tables",
    collection: "tables",
    fields: &[
        "sys_id",
        "name",
        "label",
        "super_class",
        "is_extendable",
        "access",
        "sys_scope",
        "user_role",
        "number_ref",
        "audit",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "name",
    alternate_key: Some("name"),
};

/// Column definitions.
pub const COLUMNS: TableSpec = TableSpec {
    table: "sys_dictionary",
    label: "table column",
    plural: "table columns",
    collection: "columns",
    fields: &[
        "sys_id",
        "name",
        "element",
        "column_label",
        "internal_type",
        "max_length",
        "mandatory",
        "read_only",
        "reference",
        "reference_qual",
        "default_value",
        "help",
        "active",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "element",
    alternate_key: None,
};

fn default_access() -> String {
    "public".to_string()
}

fn default_column_limit() -> u32 {
    50
}

fn column_filter(table_name: &str, column_name: &str) -> EncodedQuery {
    EncodedQuery::new()
        .equals("name", table_name.trim())
        .equals("element", column_name.trim())
}

fn column_described(table_name: &str, column_name: &str) -> String {
    format!("{}.{}", table_name.trim(), column_name.trim())
}

/// Input parameters for the create_table tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateTableInput {
    /// Internal table name (e.g. "u_custom_table").
    pub name: String,

    /// Display label.
    pub label: String,

    /// Whether other tables can extend it (default: true).
    #[serde(default = "default_true")]
    pub is_extendable: bool,

    /// Access level: "public" (default), "protected" or "package_private".
    #[serde(default = "default_access")]
    pub access: String,

    /// Application scope sys_id.
    #[serde(default)]
    pub scope: Option<String>,

    /// Parent table to extend (empty for a base table).
    #[serde(default)]
    pub super_class: String,

    /// Role required to access the table.
    #[serde(default)]
    pub user_role: Option<String>,

    /// Create default access controls (default: true).
    #[serde(default = "default_true")]
    pub create_access_controls: bool,

    /// Create an application menu module (default: true).
    #[serde(default = "default_true")]
    pub create_module: bool,

    /// Add a number field (default: false).
    #[serde(default)]
    pub number_ref: bool,

    /// Audit changes (default: true).
    #[serde(default = "default_true")]
    pub audit: bool,
}

impl CreateTableInput {
    /// Request body; settings are always sent.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set("name", self.name.trim())
            .set("label", self.label.as_str())
            .set("is_extendable", self.is_extendable)
            .set("access", self.access.as_str())
            .set("super_class", self.super_class.trim())
            .set("create_access_controls", self.create_access_controls)
            .set("create_module", self.create_module)
            .set("number_ref", self.number_ref)
            .set("audit", self.audit)
            .set_opt("sys_scope", self.scope.clone())
            .set_opt("user_role", self.user_role.clone())
    }
}

/// Input parameters for the update_table tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateTableInput {
    /// Table name or sys_id.
    pub table_name: String,

    /// New label.
    #[serde(default)]
    pub label: Option<String>,

    /// New extendable setting.
    #[serde(default)]
    pub is_extendable: Option<bool>,

    /// New access level.
    #[serde(default)]
    pub access: Option<String>,

    /// New required role.
    #[serde(default)]
    pub user_role: Option<String>,

    /// New audit setting.
    #[serde(default)]
    pub audit: Option<bool>,
}

impl UpdateTableInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set_opt("label", self.label.clone())
            .set_opt("is_extendable", self.is_extendable)
            .set_opt("access", self.access.clone())
            .set_opt("user_role", self.user_role.clone())
            .set_opt("audit", self.audit)
    }
}

/// Input parameters for the list_tables tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListTablesInput {
    /// Maximum number of tables to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Only custom tables, whose names contain "u_" (default: true).
    #[serde(default = "default_true")]
    pub user_table: bool,

    /// Filter by application scope sys_id.
    #[serde(default)]
    pub scope: Option<String>,

    /// Filter by parent table.
    #[serde(default)]
    pub super_class: Option<String>,

    /// Search text matched against name and label.
    #[serde(default)]
    pub query: Option<String>,
}

impl ListTablesInput {
    fn filter(&self) -> EncodedQuery {
        let filter = if self.user_table {
            EncodedQuery::new().contains("name", Some("u_"))
        } else {
            EncodedQuery::new()
        };
        filter
            .equals_opt("sys_scope", self.scope.as_deref())
            .equals_opt("super_class", self.super_class.as_deref())
            .contains_any(&["name", "label"], self.query.as_deref())
    }
}

/// Input parameters for the get_table tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetTableInput {
    /// Table name or sys_id.
    pub table_name: String,
}

/// Input parameters for the create_table_column tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateTableColumnInput {
    /// Table to add the column to.
    pub table_name: String,

    /// Internal column name.
    pub column_name: String,

    /// Display label.
    pub column_label: String,

    /// Data type ("string", "integer", "boolean", "reference", "choice"...).
    #[serde(rename = "type")]
    pub column_type: String,

    /// Maximum length for strings.
    #[serde(default)]
    pub max_length: Option<i64>,

    /// Whether a value is required (default: false).
    #[serde(default)]
    pub mandatory: bool,

    /// Whether the field is read-only (default: false).
    #[serde(default)]
    pub read_only: bool,

    /// Referenced table, for reference columns.
    #[serde(default)]
    pub reference_table: Option<String>,

    /// Reference qualifier, for reference columns.
    #[serde(default)]
    pub reference_qualifier: Option<String>,

    /// Choice values, created as choices when the type is "choice".
    #[serde(default)]
    pub choice_list: Option<Vec<String>>,

    /// Default value.
    #[serde(default)]
    pub default_value: Option<String>,

    /// Help text.
    #[serde(default)]
    pub help_text: Option<String>,
}

impl CreateTableColumnInput {
    /// Request body for the dictionary entry.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set("name", self.table_name.trim())
            .set("element", self.column_name.trim())
            .set("column_label", self.column_label.as_str())
            .set("internal_type", self.column_type.trim())
            .set("mandatory", self.mandatory)
            .set("read_only", self.read_only)
            .set_opt("max_length", self.max_length)
            .set_opt("reference", self.reference_table.clone())
            .set_opt("reference_qual", self.reference_qualifier.clone())
            .set_opt("default_value", self.default_value.clone())
            .set_opt("help", self.help_text.clone())
    }

    /// Choices to create along with the column, numbered 10, 20, 30...
    fn choices(&self) -> Vec<ChoiceEntry> {
        if self.column_type.trim() != "choice" {
            return Vec::new();
        }
        self.choice_list
            .iter()
            .flatten()
            .zip(1..)
            .map(|(value, position)| ChoiceEntry {
                label: value.clone(),
                value: value.clone(),
                sequence: Some(position * 10),
                inactive: false,
                hint: None,
                dependent_value: None,
            })
            .collect()
    }
}

/// Input parameters for the update_table_column tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateTableColumnInput {
    /// Table holding the column.
    pub table_name: String,

    /// Column to update.
    pub column_name: String,

    /// New label.
    #[serde(default)]
    pub column_label: Option<String>,

    /// New maximum length.
    #[serde(default)]
    pub max_length: Option<i64>,

    /// New mandatory setting.
    #[serde(default)]
    pub mandatory: Option<bool>,

    /// New read-only setting.
    #[serde(default)]
    pub read_only: Option<bool>,

    /// New reference qualifier.
    #[serde(default)]
    pub reference_qualifier: Option<String>,

    /// New default value.
    #[serde(default)]
    pub default_value: Option<String>,

    /// New help text.
    #[serde(default)]
    pub help_text: Option<String>,
}

impl UpdateTableColumnInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set_opt("column_label", self.column_label.clone())
            .set_opt("max_length", self.max_length)
            .set_opt("mandatory", self.mandatory)
            .set_opt("read_only", self.read_only)
            .set_opt("reference_qual", self.reference_qualifier.clone())
            .set_opt("default_value", self.default_value.clone())
            .set_opt("help", self.help_text.clone())
    }
}

/// Input parameters for the list_table_columns tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListTableColumnsInput {
    /// Table to list columns of.
    pub table_name: String,

    /// Only active columns (default: true).
    #[serde(default = "default_true")]
    pub active: bool,

    /// Maximum number of columns to return (default: 50).
    #[serde(default = "default_column_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,
}

/// Input parameters for the get_table_column tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetTableColumnInput {
    /// Table holding the column.
    pub table_name: String,

    /// Column name.
    pub column_name: String,
}

/// Creates a table definition.
pub async fn create_table(client: &SnowClient, input: CreateTableInput) -> ToolResponse {
    table::create(client, &TABLES, input.to_body()).await
}

/// Updates a table definition, looked up by name.
pub async fn update_table(client: &SnowClient, input: UpdateTableInput) -> ToolResponse {
    table::update(client, &TABLES, &input.table_name, input.to_body()).await
}

/// Lists table definitions.
pub async fn list_tables(client: &SnowClient, input: ListTablesInput) -> ToolResponse {
    let page = Page::new(input.limit, input.offset);
    table::list(client, &TABLES, page, input.filter()).await
}

/// Gets one table definition by name.
pub async fn get_table(client: &SnowClient, input: GetTableInput) -> ToolResponse {
    table::get(client, &TABLES, &input.table_name).await
}

/// Adds a column to a table.
///
/// For choice columns with a `choice_list`, the choices are created after
/// the column; a failed choice does not undo the column and is reported in
/// `data.failed_choices`.
pub async fn create_table_column(
    client: &SnowClient,
    input: CreateTableColumnInput,
) -> ToolResponse {
    let choices = input.choices();
    if choices.is_empty() {
        return table::create(client, &COLUMNS, input.to_body()).await;
    }

    let record = match client
        .create_record(COLUMNS.table, input.to_body().as_record())
        .await
    {
        Ok(record) => record,
        Err(e) => return failure(client, "Create table column", &e),
    };
    let described = column_described(&input.table_name, &input.column_name);
    tracing::info!(column = %described, choices = choices.len(), "Column created, adding choices");

    let mut created = Vec::new();
    let mut failed = Vec::new();
    for entry in &choices {
        let body = choice_body(&input.table_name, &input.column_name, "en", entry);
        match client.create_record(CHOICES.table, body.as_record()).await {
            Ok(choice) => created.push(json!(text(&choice, "value"))),
            Err(e) => {
                let sanitized = client.sanitize_error(&e);
                tracing::warn!(column = %described, value = %entry.value, error = %sanitized, "Choice not created");
                failed.push(json!({ "value": entry.value, "error": sanitized }));
            }
        }
    }

    let data = json!({
        "column": flatten(&record, COLUMNS.fields),
        "choices_created": created,
        "failed_choices": failed,
    });
    if failed.is_empty() {
        ToolResponse::ok(
            format!(
                "Created table column: {} with {} choices",
                described,
                created.len()
            ),
            data,
        )
    } else {
        ToolResponse::failure_with(
            format!(
                "Create table column {} succeeded but {} of {} choices failed",
                described,
                failed.len(),
                choices.len()
            ),
            data,
        )
    }
}

/// Updates a column, looked up by table and column name.
pub async fn update_table_column(
    client: &SnowClient,
    input: UpdateTableColumnInput,
) -> ToolResponse {
    table::update_matching(
        client,
        &COLUMNS,
        column_filter(&input.table_name, &input.column_name),
        &column_described(&input.table_name, &input.column_name),
        input.to_body(),
    )
    .await
}

/// Lists the columns of a table.
pub async fn list_table_columns(client: &SnowClient, input: ListTableColumnsInput) -> ToolResponse {
    let filter = EncodedQuery::new().equals("name", input.table_name.trim());
    let filter = if input.active {
        filter.equals("active", "true")
    } else {
        filter
    };
    table::list(client, &COLUMNS, Page::new(input.limit, input.offset), filter).await
}

/// Gets one column by table and column name.
pub async fn get_table_column(client: &SnowClient, input: GetTableColumnInput) -> ToolResponse {
    table::get_matching(
        client,
        &COLUMNS,
        column_filter(&input.table_name, &input.column_name),
        &column_described(&input.table_name, &input.column_name),
    )
    .await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("dictionary")
        .operation(
            "create_table",
            "Create a table, optionally extending a parent table.",
        )
        .operation(
            "update_table",
            "Update a table definition, addressed by table name.",
        )
        .operation(
            "list_tables",
            "List table definitions, by default only custom (u_) tables.",
        )
        .operation("get_table", "Get a table definition by table name.")
        .operation(
            "create_table_column",
            "Add a column to a table. Choice columns can create their choices in the same call.",
        )
        .operation(
            "update_table_column",
            "Update a column, addressed by table and column name.",
        )
        .operation("list_table_columns", "List the columns of a table.")
        .operation(
            "get_table_column",
            "Get a column by table and column name.",
        )
        .params::<CreateTableInput>()
        .params::<UpdateTableInput>()
        .params::<ListTablesInput>()
        .params::<GetTableInput>()
        .params::<CreateTableColumnInput>()
        .params::<UpdateTableColumnInput>()
        .params::<ListTableColumnsInput>()
        .params::<GetTableColumnInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_list_tables_defaults_to_custom_tables() {
        let input: ListTablesInput = serde_json::from_value(json!({"query": "asset"})).unwrap();
        assert_eq!(
            input.filter().build().as_deref(),
            Some("nameLIKEu_^nameLIKEasset^ORlabelLIKEasset")
        );
    }

    #[test]
    fn test_column_body_maps_reference_fields() {
        let input: CreateTableColumnInput = serde_json::from_value(json!({
            "table_name": "u_asset",
            "column_name": "u_owner",
            "column_label": "Owner",
            "type": "reference",
            "reference_table": "sys_user",
            "help_text": "Who owns it"
        }))
        .unwrap();
        let body = input.to_body();
        assert_eq!(body.get("internal_type"), Some(&json!("reference")));
        assert_eq!(body.get("reference"), Some(&json!("sys_user")));
        assert_eq!(body.get("help"), Some(&json!("Who owns it")));
        assert!(input.choices().is_empty());
    }

    #[test]
    fn test_choice_column_numbers_choices_in_tens() {
        let input: CreateTableColumnInput = serde_json::from_value(json!({
            "table_name": "u_asset",
            "column_name": "u_tier",
            "column_label": "Tier",
            "type": "choice",
            "choice_list": ["gold", "silver"]
        }))
        .unwrap();
        let choices = input.choices();
        assert_eq!(choices.len(), 2);
        assert_eq!(choices[1].value, "silver");
        assert_eq!(choices[1].sequence, Some(20));
    }
}
