//! Choice list entries of table fields (`sys_choice`).

use std::collections::HashMap;

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use super::{default_true, failure};
use super::table::{self, Page, Sequence, TableSpec};
use crate::error::SnowError;
use crate::models::{text, EncodedQuery, RecordBody, TableQuery, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Field choices.
pub const CHOICES: TableSpec = TableSpec {
    table: "sys_choice",
    label: "choice",
    plural: "choices",
    collection: "choices",
    fields: &[
        "sys_id",
        "name",
        "element",
        "label",
        "value",
        "sequence",
        "inactive",
        "hint",
        "dependent_value",
        "language",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "label",
    alternate_key: None,
};

/// Choices are renumbered 10, 20, 30... and stop at the first failure.
pub const CHOICE_SEQUENCE: Sequence = Sequence::TENS.on("sequence").stopping();

/// Most choices of one field considered when reordering.
const FIELD_CHOICE_LIMIT: u32 = 1000;

fn default_language() -> String {
    "en".to_string()
}

fn default_choice_limit() -> u32 {
    50
}

/// One choice of a bulk create.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ChoiceEntry {
    /// Display label.
    pub label: String,

    /// Stored value.
    pub value: String,

    /// Display order (lower first).
    #[serde(default)]
    pub sequence: Option<i64>,

    /// Whether the choice is inactive (default: false).
    #[serde(default)]
    pub inactive: bool,

    /// Tooltip text.
    #[serde(default)]
    pub hint: Option<String>,

    /// Parent choice value for dependent choices.
    #[serde(default)]
    pub dependent_value: Option<String>,
}

/// Body for one choice of `table`.`element`.
pub(crate) fn choice_body(
    table: &str,
    element: &str,
    language: &str,
    entry: &ChoiceEntry,
) -> RecordBody {
    RecordBody::new()
        .set("name", table.trim())
        .set("element", element.trim())
        .set("language", language)
        .set("label", entry.label.as_str())
        .set("value", entry.value.as_str())
        .set("inactive", entry.inactive)
        .set_opt("sequence", entry.sequence)
        .set_opt("hint", entry.hint.clone())
        .set_opt("dependent_value", entry.dependent_value.clone())
}

fn field_filter(table: &str, element: &str) -> EncodedQuery {
    EncodedQuery::new()
        .equals("name", table.trim())
        .equals("element", element.trim())
}

/// Input parameters for the create_choice tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateChoiceInput {
    /// Table holding the choice field.
    pub table: String,

    /// Field (element) the choice belongs to.
    pub element: String,

    /// The choice itself.
    #[serde(flatten)]
    pub choice: ChoiceEntry,

    /// Language code (default: "en").
    #[serde(default = "default_language")]
    pub language: String,
}

/// Input parameters for the update_choice tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateChoiceInput {
    /// Choice sys_id.
    pub choice_id: String,

    /// New label.
    #[serde(default)]
    pub label: Option<String>,

    /// New value.
    #[serde(default)]
    pub value: Option<String>,

    /// New display order.
    #[serde(default)]
    pub sequence: Option<i64>,

    /// New inactive status.
    #[serde(default)]
    pub inactive: Option<bool>,

    /// New tooltip text.
    #[serde(default)]
    pub hint: Option<String>,

    /// New parent choice value.
    #[serde(default)]
    pub dependent_value: Option<String>,
}

impl UpdateChoiceInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set_opt("label", self.label.clone())
            .set_opt("value", self.value.clone())
            .set_opt("sequence", self.sequence)
            .set_opt("inactive", self.inactive)
            .set_opt("hint", self.hint.clone())
            .set_opt("dependent_value", self.dependent_value.clone())
    }
}

/// Input parameters for the list_choices tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListChoicesInput {
    /// Table holding the choice field.
    pub table: String,

    /// Field (element) to list choices of.
    pub element: String,

    /// Only active choices (default: true).
    #[serde(default = "default_true")]
    pub active_only: bool,

    /// Language code (default: "en").
    #[serde(default = "default_language")]
    pub language: String,

    /// Maximum number of choices to return (default: 50).
    #[serde(default = "default_choice_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,
}

impl ListChoicesInput {
    fn filter(&self) -> EncodedQuery {
        let filter = field_filter(&self.table, &self.element).equals("language", &self.language);
        let filter = if self.active_only {
            filter.equals("inactive", "false")
        } else {
            filter
        };
        filter.raw(Some("ORDERBYsequence^ORDERBYlabel"))
    }
}

/// Input parameters for the get_choice tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetChoiceInput {
    /// Choice sys_id.
    pub choice_id: String,
}

/// Input parameters for the delete_choice tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteChoiceInput {
    /// Choice sys_id.
    pub choice_id: String,
}

/// Input parameters for the bulk_create_choices tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BulkCreateChoicesInput {
    /// Table holding the choice field.
    pub table: String,

    /// Field (element) the choices belong to.
    pub element: String,

    /// Choices to create.
    pub choices: Vec<ChoiceEntry>,

    /// Language code (default: "en").
    #[serde(default = "default_language")]
    pub language: String,
}

/// Input parameters for the reorder_choices tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReorderChoicesInput {
    /// Table holding the choice field.
    pub table: String,

    /// Field (element) whose choices are reordered.
    pub element: String,

    /// Choice values in the desired order.
    pub choice_order: Vec<String>,
}

/// Creates a choice.
pub async fn create_choice(client: &SnowClient, input: CreateChoiceInput) -> ToolResponse {
    let body = choice_body(&input.table, &input.element, &input.language, &input.choice);
    table::create(client, &CHOICES, body).await
}

/// Updates a choice.
pub async fn update_choice(client: &SnowClient, input: UpdateChoiceInput) -> ToolResponse {
    table::update(client, &CHOICES, &input.choice_id, input.to_body()).await
}

/// Lists the choices of one field, in display order.
pub async fn list_choices(client: &SnowClient, input: ListChoicesInput) -> ToolResponse {
    let page = Page::new(input.limit, input.offset);
    table::list(client, &CHOICES, page, input.filter()).await
}

/// Gets one choice.
pub async fn get_choice(client: &SnowClient, input: GetChoiceInput) -> ToolResponse {
    table::get(client, &CHOICES, &input.choice_id).await
}

/// Deletes a choice.
pub async fn delete_choice(client: &SnowClient, input: DeleteChoiceInput) -> ToolResponse {
    table::delete(client, &CHOICES, &input.choice_id).await
}

/// Creates several choices of one field, continuing past failures.
pub async fn bulk_create_choices(
    client: &SnowClient,
    input: BulkCreateChoicesInput,
) -> ToolResponse {
    let bodies = input
        .choices
        .iter()
        .map(|entry| choice_body(&input.table, &input.element, &input.language, entry))
        .collect();
    table::create_each(client, &CHOICES, bodies).await
}

/// Renumbers the choices of a field following `choice_order`.
///
/// Values are resolved to choice sys_ids first; an unknown value fails the
/// call before anything is updated.
pub async fn reorder_choices(client: &SnowClient, input: ReorderChoicesInput) -> ToolResponse {
    const OPERATION: &str = "Reorder choices";
    let parent = format!("{}.{}", input.table.trim(), input.element.trim());

    let query = TableQuery::new()
        .with_fields(&["sys_id", "value"])
        .with_display_value(false)
        .with_limit(FIELD_CHOICE_LIMIT)
        .with_query(&field_filter(&input.table, &input.element));
    let existing = match client.list_records(CHOICES.table, &query).await {
        Ok(rows) => rows,
        Err(e) => return failure(client, OPERATION, &e),
    };

    let by_value: HashMap<String, String> = existing
        .iter()
        .filter_map(|r| Some((text(r, "value")?, text(r, "sys_id")?)))
        .collect();
    let mut ids = Vec::with_capacity(input.choice_order.len());
    let mut unknown = Vec::new();
    for value in &input.choice_order {
        match by_value.get(value.trim()) {
            Some(sys_id) => ids.push(sys_id.clone()),
            None => unknown.push(value.trim()),
        }
    }
    if !unknown.is_empty() {
        return failure(
            client,
            OPERATION,
            &SnowError::validation(format!(
                "no choice of {} has value {}",
                parent,
                unknown.join(", ")
            )),
        );
    }

    table::reorder(client, &CHOICES, CHOICE_SEQUENCE, &parent, &ids).await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("table_choice")
        .operation(
            "create_choice",
            "Create a choice list entry for a table field.",
        )
        .undocumented("update_choice")
        .operation(
            "list_choices",
            "List the choices of a table field in display order.",
        )
        .undocumented("get_choice")
        .undocumented("delete_choice")
        .operation(
            "bulk_create_choices",
            "Create several choices of one field. Every choice is attempted; failures are reported per entry.",
        )
        .operation(
            "reorder_choices",
            "Renumber the choices of a field as 10, 20, 30... following a list of choice values.",
        )
        .params::<CreateChoiceInput>()
        .params::<UpdateChoiceInput>()
        .params::<ListChoicesInput>()
        .params::<GetChoiceInput>()
        .params::<DeleteChoiceInput>()
        .params::<BulkCreateChoicesInput>()
        .params::<ReorderChoicesInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn test_create_body_flattens_choice() {
        let input: CreateChoiceInput = serde_json::from_value(json!({
            "table": "incident",
            "element": "category",
            "label": "Hardware",
            "value": "hardware",
            "sequence": 30
        }))
        .unwrap();
        let body = choice_body(&input.table, &input.element, &input.language, &input.choice);
        assert_eq!(
            Value::Object(body.into_record()),
            json!({
                "name": "incident",
                "element": "category",
                "language": "en",
                "label": "Hardware",
                "value": "hardware",
                "inactive": false,
                "sequence": 30
            })
        );
    }

    #[test]
    fn test_list_filter_orders_by_sequence() {
        let input: ListChoicesInput =
            serde_json::from_value(json!({"table": "incident", "element": "category"})).unwrap();
        assert_eq!(
            input.filter().build().as_deref(),
            Some("name=incident^element=category^language=en^inactive=false^ORDERBYsequence^ORDERBYlabel")
        );
    }
}
