//! Catalog questions: variables (`item_option_new`), variable sets
//! (`item_option_new_set`) and the choices of choice-type questions
//! (`question_choice`).

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use super::table::{self, Page, TableSpec};
use super::{default_order, default_true};
use crate::models::{EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Catalog variables with every configurable column.
pub const VARIABLES: TableSpec = TableSpec {
    table: "item_option_new",
    label: "catalog variable",
    plural: "catalog variables",
    collection: "variables",
    fields: &[
        "sys_id",
        "cat_item",
        "variable_set",
        "name",
        "question_text",
        "type",
        "mandatory",
        "active",
        "order",
        "default_value",
        "description",
        "help_text",
        "tooltip",
        "max_length",
        "min",
        "max",
        "reference",
        "reference_qual",
        "field",
        "map_to_field",
        "choice_field",
        "choice_table",
        "list_table",
        "show_help",
        "show_help_on_load",
        "include_none",
        "unique_lookup_unique",
        "attributes",
    ],
    name_field: "name",
    alternate_key: None,
};

/// The same table reduced to the columns a listing needs.
const VARIABLE_SUMMARY: TableSpec = TableSpec {
    fields: &[
        "sys_id",
        "name",
        "question_text",
        "type",
        "mandatory",
        "order",
    ],
    ..VARIABLES
};

/// Variable sets.
pub const VARIABLE_SETS: TableSpec = TableSpec {
    table: "item_option_new_set",
    label: "variable set",
    plural: "variable sets",
    collection: "variable_sets",
    fields: &[
        "sys_id",
        "title",
        "internal_name",
        "description",
        "order",
        "display_title",
        "layout",
        "read_roles",
        "write_roles",
        "create_roles",
        "set_attributes",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "title",
    alternate_key: None,
};

const VARIABLE_SET_SUMMARY: TableSpec = TableSpec {
    fields: &["sys_id", "title", "internal_name", "order"],
    ..VARIABLE_SETS
};

/// Choices offered by choice-type questions.
pub const QUESTION_CHOICES: TableSpec = TableSpec {
    table: "question_choice",
    label: "question choice",
    plural: "question choices",
    collection: "choices",
    fields: &[
        "sys_id",
        "question",
        "value",
        "text",
        "order",
        "inactive",
        "misc",
        "rec_misc",
    ],
    name_field: "text",
    alternate_key: None,
};

fn default_variable_limit() -> u32 {
    100
}

fn default_set_limit() -> u32 {
    50
}

fn default_layout() -> String {
    "normal".to_string()
}

// ============================================================================
// Variables
// ============================================================================

/// Optional variable columns shared by create and update.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct VariableSettings {
    /// Maximum length for string variables.
    #[serde(default)]
    pub max_length: Option<i64>,

    /// Minimum value for numeric variables.
    #[serde(default)]
    pub min: Option<i64>,

    /// Maximum value for numeric variables.
    #[serde(default)]
    pub max: Option<i64>,

    /// Default value.
    #[serde(default)]
    pub default_value: Option<String>,

    /// Description of the variable.
    #[serde(default)]
    pub description: Option<String>,

    /// Help text shown with the variable.
    #[serde(default)]
    pub help_text: Option<String>,

    /// Display order.
    #[serde(default)]
    pub order: Option<i64>,

    /// Table a reference variable points at.
    #[serde(default)]
    pub reference_table: Option<String>,

    /// Encoded query restricting reference options.
    #[serde(default)]
    pub reference_qualifier: Option<String>,

    /// Field name for the variable.
    #[serde(default)]
    pub field: Option<String>,

    /// Target field this variable maps to.
    #[serde(default)]
    pub map_to_field: Option<String>,

    /// Choice field for dependent choices.
    #[serde(default)]
    pub choice_field: Option<String>,

    /// Choice table for choice variables.
    #[serde(default)]
    pub choice_table: Option<String>,

    /// Table for list collector variables.
    #[serde(default)]
    pub list_table: Option<String>,

    /// Show the help icon.
    #[serde(default)]
    pub show_help: Option<bool>,

    /// Show help expanded when the form loads.
    #[serde(default)]
    pub show_help_on_load: Option<bool>,

    /// Offer a "-- None --" option on choice variables.
    #[serde(default)]
    pub include_none: Option<bool>,

    /// Enforce unique lookup values.
    #[serde(default)]
    pub unique_lookup_unique: Option<bool>,

    /// Tooltip text.
    #[serde(default)]
    pub tooltip: Option<String>,

    /// Additional attributes.
    #[serde(default)]
    pub attributes: Option<String>,
}

impl VariableSettings {
    fn apply(&self, body: RecordBody) -> RecordBody {
        body.set_opt("max_length", self.max_length)
            .set_opt("min", self.min)
            .set_opt("max", self.max)
            .set_opt("default_value", self.default_value.clone())
            .set_opt("description", self.description.clone())
            .set_opt("help_text", self.help_text.clone())
            .set_opt("order", self.order)
            .set_opt("reference", self.reference_table.clone())
            .set_opt("reference_qual", self.reference_qualifier.clone())
            .set_opt("field", self.field.clone())
            .set_opt("map_to_field", self.map_to_field.clone())
            .set_opt("choice_field", self.choice_field.clone())
            .set_opt("choice_table", self.choice_table.clone())
            .set_opt("list_table", self.list_table.clone())
            .set_opt("show_help", self.show_help)
            .set_opt("show_help_on_load", self.show_help_on_load)
            .set_opt("include_none", self.include_none)
            .set_opt("unique_lookup_unique", self.unique_lookup_unique)
            .set_opt("tooltip", self.tooltip.clone())
            .set_opt("attributes", self.attributes.clone())
    }
}

/// Input parameters for the create_catalog_variable tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateCatalogVariableInput {
    /// Catalog item sys_id.
    pub catalog_item_id: String,

    /// Internal name of the variable.
    pub name: String,

    /// Variable type (e.g., "string", "integer", "boolean", "reference").
    #[serde(rename = "type")]
    pub variable_type: String,

    /// Label shown to the requester.
    pub label: String,

    /// Whether the variable is required (default: false).
    #[serde(default)]
    pub mandatory: bool,

    /// Optional columns.
    #[serde(flatten)]
    pub settings: VariableSettings,
}

impl CreateCatalogVariableInput {
    /// Request body; the label is stored as `question_text`.
    pub fn to_body(&self) -> RecordBody {
        let body = RecordBody::new()
            .set("cat_item", self.catalog_item_id.as_str())
            .set("name", self.name.as_str())
            .set("type", self.variable_type.as_str())
            .set("question_text", self.label.as_str())
            .set("mandatory", self.mandatory);
        self.settings.apply(body)
    }
}

/// Input parameters for the update_catalog_variable tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateCatalogVariableInput {
    /// Variable sys_id.
    pub variable_id: String,

    /// New internal name.
    #[serde(default)]
    pub name: Option<String>,

    /// New variable type.
    #[serde(default, rename = "type")]
    pub variable_type: Option<String>,

    /// New label.
    #[serde(default)]
    pub label: Option<String>,

    /// New mandatory flag.
    #[serde(default)]
    pub mandatory: Option<bool>,

    /// Optional columns to change.
    #[serde(flatten)]
    pub settings: VariableSettings,
}

impl UpdateCatalogVariableInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        let body = RecordBody::new()
            .set_opt("name", self.name.clone())
            .set_opt("type", self.variable_type.clone())
            .set_opt("question_text", self.label.clone())
            .set_opt("mandatory", self.mandatory);
        self.settings.apply(body)
    }
}

/// Input parameters for the list_catalog_variables tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListCatalogVariablesInput {
    /// Catalog item sys_id.
    pub catalog_item_id: String,

    /// Report every column rather than a summary (default: true).
    #[serde(default = "default_true")]
    pub include_details: bool,

    /// Maximum number of variables to return (default: 100).
    #[serde(default = "default_variable_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,
}

/// Input parameters for the get_catalog_variable tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetCatalogVariableInput {
    /// Variable sys_id.
    pub variable_id: String,
}

/// Input parameters for the delete_catalog_variable tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteCatalogVariableInput {
    /// Variable sys_id.
    pub variable_id: String,
}

/// Creates a variable on a catalog item.
pub async fn create_catalog_variable(
    client: &SnowClient,
    input: CreateCatalogVariableInput,
) -> ToolResponse {
    table::create(client, &VARIABLES, input.to_body()).await
}

/// Updates a catalog variable.
pub async fn update_catalog_variable(
    client: &SnowClient,
    input: UpdateCatalogVariableInput,
) -> ToolResponse {
    table::update(client, &VARIABLES, &input.variable_id, input.to_body()).await
}

/// Lists the variables of a catalog item in display order.
pub async fn list_catalog_variables(
    client: &SnowClient,
    input: ListCatalogVariablesInput,
) -> ToolResponse {
    let spec = if input.include_details {
        &VARIABLES
    } else {
        &VARIABLE_SUMMARY
    };
    let filter = EncodedQuery::new()
        .equals("cat_item", input.catalog_item_id.trim())
        .raw(Some("ORDERBYorder"));
    table::list(client, spec, Page::new(input.limit, input.offset), filter).await
}

/// Gets one catalog variable.
pub async fn get_catalog_variable(
    client: &SnowClient,
    input: GetCatalogVariableInput,
) -> ToolResponse {
    table::get(client, &VARIABLES, &input.variable_id).await
}

/// Deletes a catalog variable.
pub async fn delete_catalog_variable(
    client: &SnowClient,
    input: DeleteCatalogVariableInput,
) -> ToolResponse {
    table::delete(client, &VARIABLES, &input.variable_id).await
}

// ============================================================================
// Variable sets
// ============================================================================

/// Input parameters for the create_variable_set tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateVariableSetInput {
    /// Title of the variable set.
    pub title: String,

    /// Internal name of the variable set.
    pub internal_name: String,

    /// Description.
    #[serde(default)]
    pub description: Option<String>,

    /// Display order (default: 100).
    #[serde(default = "default_order")]
    pub order: i64,

    /// Display the set title (default: false).
    #[serde(default)]
    pub display_title: bool,

    /// Layout (default: "normal").
    #[serde(default = "default_layout")]
    pub layout: String,

    /// Roles allowed to read the set.
    #[serde(default)]
    pub read_roles: Option<Vec<String>>,

    /// Roles allowed to write the set.
    #[serde(default)]
    pub write_roles: Option<Vec<String>>,

    /// Roles allowed to create the set.
    #[serde(default)]
    pub create_roles: Option<Vec<String>>,

    /// Set attributes.
    #[serde(default)]
    pub set_attributes: Option<String>,
}

impl CreateVariableSetInput {
    /// Request body; role lists are sent comma-separated.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set("title", self.title.as_str())
            .set("internal_name", self.internal_name.as_str())
            .set("order", self.order)
            .set("display_title", self.display_title)
            .set("layout", self.layout.as_str())
            .set_opt("description", self.description.clone())
            .set_list("read_roles", self.read_roles.as_deref())
            .set_list("write_roles", self.write_roles.as_deref())
            .set_list("create_roles", self.create_roles.as_deref())
            .set_opt("set_attributes", self.set_attributes.clone())
    }
}

/// Input parameters for the update_variable_set tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateVariableSetInput {
    /// Variable set sys_id.
    pub variable_set_id: String,

    /// New title.
    #[serde(default)]
    pub title: Option<String>,

    /// New internal name.
    #[serde(default)]
    pub internal_name: Option<String>,

    /// New description.
    #[serde(default)]
    pub description: Option<String>,

    /// New display order.
    #[serde(default)]
    pub order: Option<i64>,

    /// Display the set title.
    #[serde(default)]
    pub display_title: Option<bool>,

    /// New layout.
    #[serde(default)]
    pub layout: Option<String>,

    /// Roles allowed to read the set.
    #[serde(default)]
    pub read_roles: Option<Vec<String>>,

    /// Roles allowed to write the set.
    #[serde(default)]
    pub write_roles: Option<Vec<String>>,

    /// Roles allowed to create the set.
    #[serde(default)]
    pub create_roles: Option<Vec<String>>,

    /// Set attributes.
    #[serde(default)]
    pub set_attributes: Option<String>,
}

impl UpdateVariableSetInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set_opt("title", self.title.clone())
            .set_opt("internal_name", self.internal_name.clone())
            .set_opt("description", self.description.clone())
            .set_opt("order", self.order)
            .set_opt("display_title", self.display_title)
            .set_opt("layout", self.layout.clone())
            .set_list("read_roles", self.read_roles.as_deref())
            .set_list("write_roles", self.write_roles.as_deref())
            .set_list("create_roles", self.create_roles.as_deref())
            .set_opt("set_attributes", self.set_attributes.clone())
    }
}

/// Input parameters for the list_variable_sets tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListVariableSetsInput {
    /// Only sets whose title contains this text.
    #[serde(default)]
    pub title_contains: Option<String>,

    /// Only sets whose internal name contains this text.
    #[serde(default)]
    pub internal_name_contains: Option<String>,

    /// Report every column rather than a summary (default: true).
    #[serde(default = "default_true")]
    pub include_details: bool,

    /// Maximum number of sets to return (default: 50).
    #[serde(default = "default_set_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,
}

/// Input parameters for the get_variable_set tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetVariableSetInput {
    /// Variable set sys_id.
    pub variable_set_id: String,
}

/// Input parameters for the delete_variable_set tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteVariableSetInput {
    /// Variable set sys_id.
    pub variable_set_id: String,
}

/// Creates a variable set.
pub async fn create_variable_set(
    client: &SnowClient,
    input: CreateVariableSetInput,
) -> ToolResponse {
    table::create(client, &VARIABLE_SETS, input.to_body()).await
}

/// Updates a variable set.
pub async fn update_variable_set(
    client: &SnowClient,
    input: UpdateVariableSetInput,
) -> ToolResponse {
    table::update(client, &VARIABLE_SETS, &input.variable_set_id, input.to_body()).await
}

/// Lists variable sets.
pub async fn list_variable_sets(client: &SnowClient, input: ListVariableSetsInput) -> ToolResponse {
    let spec = if input.include_details {
        &VARIABLE_SETS
    } else {
        &VARIABLE_SET_SUMMARY
    };
    let filter = EncodedQuery::new()
        .contains("title", input.title_contains.as_deref())
        .contains("internal_name", input.internal_name_contains.as_deref());
    table::list(client, spec, Page::new(input.limit, input.offset), filter).await
}

/// Gets one variable set.
pub async fn get_variable_set(client: &SnowClient, input: GetVariableSetInput) -> ToolResponse {
    table::get(client, &VARIABLE_SETS, &input.variable_set_id).await
}

/// Deletes a variable set.
pub async fn delete_variable_set(
    client: &SnowClient,
    input: DeleteVariableSetInput,
) -> ToolResponse {
    table::delete(client, &VARIABLE_SETS, &input.variable_set_id).await
}

// ============================================================================
// Question choices
// ============================================================================

/// Input parameters for the create_question_choice tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateQuestionChoiceInput {
    /// Stored value of the choice.
    pub value: String,

    /// Display text of the choice.
    pub text: String,

    /// Question (variable) sys_id the choice belongs to.
    #[serde(default)]
    pub question: Option<String>,

    /// Display order (default: 100).
    #[serde(default = "default_order")]
    pub order: i64,

    /// Whether the choice is inactive (default: false).
    #[serde(default)]
    pub inactive: bool,

    /// Price of this choice.
    #[serde(default)]
    pub misc: Option<String>,

    /// Recurring price of this choice.
    #[serde(default)]
    pub rec_misc: Option<String>,
}

impl CreateQuestionChoiceInput {
    /// Request body.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set("value", self.value.as_str())
            .set("text", self.text.as_str())
            .set("order", self.order)
            .set("inactive", self.inactive)
            .set_opt("question", self.question.clone())
            .set_opt("misc", self.misc.clone())
            .set_opt("rec_misc", self.rec_misc.clone())
    }
}

/// Input parameters for the update_question_choice tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateQuestionChoiceInput {
    /// Question choice sys_id.
    pub choice_id: String,

    /// New stored value.
    #[serde(default)]
    pub value: Option<String>,

    /// New display text.
    #[serde(default)]
    pub text: Option<String>,

    /// New question sys_id.
    #[serde(default)]
    pub question: Option<String>,

    /// New display order.
    #[serde(default)]
    pub order: Option<i64>,

    /// New inactive flag.
    #[serde(default)]
    pub inactive: Option<bool>,

    /// New price.
    #[serde(default)]
    pub misc: Option<String>,

    /// New recurring price.
    #[serde(default)]
    pub rec_misc: Option<String>,
}

impl UpdateQuestionChoiceInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set_opt("value", self.value.clone())
            .set_opt("text", self.text.clone())
            .set_opt("question", self.question.clone())
            .set_opt("order", self.order)
            .set_opt("inactive", self.inactive)
            .set_opt("misc", self.misc.clone())
            .set_opt("rec_misc", self.rec_misc.clone())
    }
}

/// Input parameters for the list_question_choices tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListQuestionChoicesInput {
    /// Filter by question sys_id.
    #[serde(default)]
    pub question: Option<String>,

    /// Filter by inactive flag.
    #[serde(default)]
    pub inactive: Option<bool>,

    /// Maximum number of choices to return (default: 50).
    #[serde(default = "default_set_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,
}

/// Input parameters for the get_question_choice tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetQuestionChoiceInput {
    /// Question choice sys_id.
    pub choice_id: String,
}

/// Input parameters for the delete_question_choice tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteQuestionChoiceInput {
    /// Question choice sys_id.
    pub choice_id: String,
}

/// Creates a question choice.
pub async fn create_question_choice(
    client: &SnowClient,
    input: CreateQuestionChoiceInput,
) -> ToolResponse {
    table::create(client, &QUESTION_CHOICES, input.to_body()).await
}

/// Updates a question choice.
pub async fn update_question_choice(
    client: &SnowClient,
    input: UpdateQuestionChoiceInput,
) -> ToolResponse {
    table::update(client, &QUESTION_CHOICES, &input.choice_id, input.to_body()).await
}

/// Lists question choices.
pub async fn list_question_choices(
    client: &SnowClient,
    input: ListQuestionChoicesInput,
) -> ToolResponse {
    let filter = EncodedQuery::new()
        .equals_opt("question", input.question.as_deref())
        .flag("inactive", input.inactive);
    table::list(
        client,
        &QUESTION_CHOICES,
        Page::new(input.limit, input.offset),
        filter,
    )
    .await
}

/// Gets one question choice.
pub async fn get_question_choice(
    client: &SnowClient,
    input: GetQuestionChoiceInput,
) -> ToolResponse {
    table::get(client, &QUESTION_CHOICES, &input.choice_id).await
}

/// Deletes a question choice.
pub async fn delete_question_choice(
    client: &SnowClient,
    input: DeleteQuestionChoiceInput,
) -> ToolResponse {
    table::delete(client, &QUESTION_CHOICES, &input.choice_id).await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("catalog_variable")
        .operation(
            "create_catalog_variable",
            "Add a variable (question) to a catalog item.",
        )
        .undocumented("update_catalog_variable")
        .operation(
            "list_catalog_variables",
            "List the variables of a catalog item in display order.",
        )
        .undocumented("get_catalog_variable")
        .undocumented("delete_catalog_variable")
        .operation(
            "create_variable_set",
            "Create a variable set that can be shared between catalog items.",
        )
        .undocumented("update_variable_set")
        .operation(
            "list_variable_sets",
            "List variable sets, filtered by title or internal name.",
        )
        .undocumented("get_variable_set")
        .undocumented("delete_variable_set")
        .operation(
            "create_question_choice",
            "Add a choice to a choice-type catalog question.",
        )
        .undocumented("update_question_choice")
        .operation(
            "list_question_choices",
            "List question choices, filtered by question or inactive flag.",
        )
        .undocumented("get_question_choice")
        .undocumented("delete_question_choice")
        .params::<CreateCatalogVariableInput>()
        .params::<UpdateCatalogVariableInput>()
        .params::<ListCatalogVariablesInput>()
        .params::<GetCatalogVariableInput>()
        .params::<DeleteCatalogVariableInput>()
        .params::<CreateVariableSetInput>()
        .params::<UpdateVariableSetInput>()
        .params::<ListVariableSetsInput>()
        .params::<GetVariableSetInput>()
        .params::<DeleteVariableSetInput>()
        .params::<CreateQuestionChoiceInput>()
        .params::<UpdateQuestionChoiceInput>()
        .params::<ListQuestionChoicesInput>()
        .params::<GetQuestionChoiceInput>()
        .params::<DeleteQuestionChoiceInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn test_variable_label_becomes_question_text() {
        let input: CreateCatalogVariableInput = serde_json::from_value(json!({
            "catalog_item_id": "ci1",
            "name": "cost_center",
            "type": "reference",
            "label": "Cost center",
            "reference_table": "cmn_cost_center"
        }))
        .unwrap();
        assert_eq!(
            Value::Object(input.to_body().into_record()),
            json!({
                "cat_item": "ci1",
                "name": "cost_center",
                "type": "reference",
                "question_text": "Cost center",
                "mandatory": false,
                "reference": "cmn_cost_center"
            })
        );
    }

    #[test]
    fn test_variable_set_roles_joined() {
        let input: CreateVariableSetInput = serde_json::from_value(json!({
            "title": "Requester details",
            "internal_name": "requester_details",
            "read_roles": ["itil", "admin"]
        }))
        .unwrap();
        let body = input.to_body();
        assert_eq!(body.get("read_roles"), Some(&json!("itil,admin")));
        assert_eq!(body.get("layout"), Some(&json!("normal")));
        assert_eq!(body.get("order"), Some(&json!(100)));
        assert!(body.get("write_roles").is_none());
    }

    #[test]
    fn test_list_summary_keeps_table() {
        assert_eq!(VARIABLE_SUMMARY.table, VARIABLES.table);
        assert!(VARIABLE_SUMMARY.fields.len() < VARIABLES.fields.len());
    }
}
