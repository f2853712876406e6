//! "Available for" and "Not available for" user criteria of catalog items.
//!
//! Both lists are plain relationship tables keyed by
//! `sc_cat_item` + `user_criteria`; removal looks the row up by that pair.

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;
use serde_json::json;

use super::table::{self, matching_ids, Page, TableSpec};
use super::{default_limit, failure};
use crate::error::SnowError;
use crate::models::{EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

const RULE_FIELDS: &[&str] = &[
    "sys_id",
    "sc_cat_item",
    "user_criteria",
    "sys_created_on",
    "sys_updated_on",
];

/// Criteria a catalog item is available for.
pub const AVAILABLE_FOR: TableSpec = TableSpec {
    table: "sc_cat_item_user_criteria_mtom",
    label: "available for rule",
    plural: "available for rules",
    collection: "rules",
    fields: RULE_FIELDS,
    name_field: "user_criteria",
    alternate_key: None,
};

/// Criteria a catalog item is not available for.
pub const NOT_AVAILABLE_FOR: TableSpec = TableSpec {
    table: "sc_cat_item_user_criteria_no_mtom",
    label: "not available for rule",
    plural: "not available for rules",
    ..AVAILABLE_FOR
};

/// Which of the two criteria lists to read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    /// Users the item is offered to.
    #[default]
    Available,
    /// Users the item is hidden from.
    NotAvailable,
}

impl RuleType {
    fn spec(self) -> &'static TableSpec {
        match self {
            RuleType::Available => &AVAILABLE_FOR,
            RuleType::NotAvailable => &NOT_AVAILABLE_FOR,
        }
    }
}

/// One catalog item and user criteria pair.
struct Rule<'a> {
    catalog_item_id: &'a str,
    user_criteria_id: &'a str,
}

impl Rule<'_> {
    fn to_body(&self) -> RecordBody {
        rule_body(self.catalog_item_id, self.user_criteria_id)
    }

    fn filter(&self) -> EncodedQuery {
        EncodedQuery::new()
            .equals("sc_cat_item", self.catalog_item_id.trim())
            .equals("user_criteria", self.user_criteria_id.trim())
    }

    fn described(&self) -> String {
        format!(
            "catalog item {} / user criteria {}",
            self.catalog_item_id.trim(),
            self.user_criteria_id.trim()
        )
    }
}

macro_rules! rule_input {
    ($(#[$doc:meta])* $name:ident, $criteria_doc:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Deserialize, JsonSchema)]
        pub struct $name {
            /// Catalog item sys_id.
            pub catalog_item_id: String,

            #[doc = $criteria_doc]
            pub user_criteria_id: String,
        }

        impl $name {
            fn rule(&self) -> Rule<'_> {
                Rule {
                    catalog_item_id: &self.catalog_item_id,
                    user_criteria_id: &self.user_criteria_id,
                }
            }
        }
    };
}

rule_input!(
    /// Input parameters for the add_available_for tool.
    AddAvailableForInput,
    "User criteria sys_id to make the item available for."
);
rule_input!(
    /// Input parameters for the remove_available_for tool.
    RemoveAvailableForInput,
    "User criteria sys_id to remove from the available-for list."
);
rule_input!(
    /// Input parameters for the add_not_available_for tool.
    AddNotAvailableForInput,
    "User criteria sys_id to hide the item from."
);
rule_input!(
    /// Input parameters for the remove_not_available_for tool.
    RemoveNotAvailableForInput,
    "User criteria sys_id to remove from the not-available-for list."
);

/// Input parameters for the list_available_for tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListAvailableForInput {
    /// Catalog item sys_id.
    pub catalog_item_id: String,

    /// Which rules to list: "available" (default) or "not_available".
    #[serde(default)]
    pub rule_type: RuleType,

    /// Maximum number of rules to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,
}

/// Input parameters for the bulk_update_available_for tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BulkUpdateAvailableForInput {
    /// Catalog item sys_id.
    pub catalog_item_id: String,

    /// User criteria the item should be available for.
    #[serde(default)]
    pub available_for_criteria: Vec<String>,

    /// User criteria the item should not be available for.
    #[serde(default)]
    pub not_available_for_criteria: Vec<String>,
}

/// Most rules replaced per list by a bulk update.
const REPLACE_LIMIT: u32 = 1000;

fn rule_body(catalog_item_id: &str, user_criteria_id: &str) -> RecordBody {
    RecordBody::new()
        .set("sc_cat_item", catalog_item_id.trim())
        .set("user_criteria", user_criteria_id.trim())
}

/// Makes a catalog item available for a user criteria.
pub async fn add_available_for(client: &SnowClient, input: AddAvailableForInput) -> ToolResponse {
    table::create(client, &AVAILABLE_FOR, input.rule().to_body()).await
}

/// Removes an "available for" rule.
pub async fn remove_available_for(
    client: &SnowClient,
    input: RemoveAvailableForInput,
) -> ToolResponse {
    let rule = input.rule();
    table::delete_matching(client, &AVAILABLE_FOR, rule.filter(), &rule.described()).await
}

/// Hides a catalog item from a user criteria.
pub async fn add_not_available_for(
    client: &SnowClient,
    input: AddNotAvailableForInput,
) -> ToolResponse {
    table::create(client, &NOT_AVAILABLE_FOR, input.rule().to_body()).await
}

/// Removes a "not available for" rule.
pub async fn remove_not_available_for(
    client: &SnowClient,
    input: RemoveNotAvailableForInput,
) -> ToolResponse {
    let rule = input.rule();
    table::delete_matching(client, &NOT_AVAILABLE_FOR, rule.filter(), &rule.described()).await
}

/// Lists one of the two rule lists of a catalog item.
pub async fn list_available_for(client: &SnowClient, input: ListAvailableForInput) -> ToolResponse {
    let filter = EncodedQuery::new().equals("sc_cat_item", input.catalog_item_id.trim());
    table::list(
        client,
        input.rule_type.spec(),
        Page::new(input.limit, input.offset),
        filter,
    )
    .await
}

/// Replaces both rule lists of a catalog item.
///
/// Existing rules are deleted first; a failed deletion aborts before
/// anything new is created. New rules are then all attempted.
pub async fn bulk_update_available_for(
    client: &SnowClient,
    input: BulkUpdateAvailableForInput,
) -> ToolResponse {
    const OPERATION: &str = "Bulk update availability rules";
    let item = input.catalog_item_id.trim();
    if item.is_empty() {
        return failure(
            client,
            OPERATION,
            &SnowError::validation("catalog_item_id is required"),
        );
    }
    tracing::debug!(
        catalog_item = %item,
        available = input.available_for_criteria.len(),
        not_available = input.not_available_for_criteria.len(),
        "Replacing availability rules"
    );

    let removed = async {
        let mut removed = 0usize;
        for spec in [&AVAILABLE_FOR, &NOT_AVAILABLE_FOR] {
            let filter = EncodedQuery::new().equals("sc_cat_item", item);
            for sys_id in matching_ids(client, spec, &filter, REPLACE_LIMIT).await? {
                client.delete_record(spec.table, &sys_id).await?;
                removed += 1;
            }
        }
        Ok::<_, SnowError>(removed)
    }
    .await;
    let removed = match removed {
        Ok(count) => count,
        Err(e) => return failure(client, OPERATION, &e),
    };

    let mut failed = Vec::new();
    let mut added = [0usize; 2];
    let lists = [
        (&AVAILABLE_FOR, &input.available_for_criteria),
        (&NOT_AVAILABLE_FOR, &input.not_available_for_criteria),
    ];
    for (slot, (spec, criteria)) in lists.into_iter().enumerate() {
        for criteria_id in criteria {
            let body = rule_body(item, criteria_id);
            match client.create_record(spec.table, body.as_record()).await {
                Ok(_) => added[slot] += 1,
                Err(e) => {
                    let sanitized = client.sanitize_error(&e);
                    tracing::warn!(table = spec.table, user_criteria = %criteria_id, error = %sanitized, "Availability rule not created");
                    failed.push(json!({
                        "table": spec.table,
                        "user_criteria": criteria_id.trim(),
                        "error": sanitized,
                    }));
                }
            }
        }
    }

    let data = json!({
        "catalog_item_id": item,
        "removed_count": removed,
        "available_for_count": added[0],
        "not_available_for_count": added[1],
        "failed": failed,
    });
    if failed.is_empty() {
        tracing::info!(catalog_item = %item, removed = removed, "Availability rules replaced");
        ToolResponse::ok(
            format!("Bulk updated availability rules for catalog item {}", item),
            data,
        )
    } else {
        ToolResponse::failure_with(
            format!(
                "{} failed: {} rule(s) could not be created",
                OPERATION,
                failed.len()
            ),
            data,
        )
    }
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("catalog_availability")
        .operation(
            "add_available_for",
            "Make a catalog item available for a user criteria.",
        )
        .operation(
            "remove_available_for",
            "Remove an available-for user criteria from a catalog item.",
        )
        .operation(
            "add_not_available_for",
            "Hide a catalog item from a user criteria.",
        )
        .operation(
            "remove_not_available_for",
            "Remove a not-available-for user criteria from a catalog item.",
        )
        .operation(
            "list_available_for",
            "List the available-for or not-available-for user criteria of a catalog item.",
        )
        .operation(
            "bulk_update_available_for",
            "Replace both user criteria lists of a catalog item.",
        )
        .params::<AddAvailableForInput>()
        .params::<RemoveAvailableForInput>()
        .params::<AddNotAvailableForInput>()
        .params::<RemoveNotAvailableForInput>()
        .params::<ListAvailableForInput>()
        .params::<BulkUpdateAvailableForInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rule_type_defaults_to_available() {
        let input: ListAvailableForInput =
            serde_json::from_value(json!({"catalog_item_id": "ci1"})).unwrap();
        assert_eq!(input.rule_type, RuleType::Available);
        assert_eq!(input.rule_type.spec().table, "sc_cat_item_user_criteria_mtom");

        let input: ListAvailableForInput = serde_json::from_value(
            json!({"catalog_item_id": "ci1", "rule_type": "not_available"}),
        )
        .unwrap();
        assert_eq!(input.rule_type.spec().table, "sc_cat_item_user_criteria_no_mtom");
    }

    #[test]
    fn test_rule_filter_uses_both_ends() {
        let input = RemoveAvailableForInput {
            catalog_item_id: " ci1 ".to_string(),
            user_criteria_id: "uc1".to_string(),
        };
        assert_eq!(
            input.rule().filter().build().as_deref(),
            Some("sc_cat_item=ci1^user_criteria=uc1")
        );
    }
}
