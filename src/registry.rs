//! Explicit registry of tool operations and their input schemas.
//!
//! Each tool module publishes a [`ModuleListing`]: the operations it
//! implements and the input types it declares. [`ToolRegistry::discover`]
//! pairs them by naming convention. `create_widget` matches a type named
//! `CreateWidgetInput`, `CreateWidgetParams` or `CreateWidget`, compared
//! case-insensitively with underscores ignored. Operations without a
//! matching type get a permissive generic schema instead of failing.

use std::any::type_name;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use rmcp::schemars::{self, JsonSchema};
use serde::Serialize;
use serde_json::{json, Value};

/// Suffixes tried, in order, when pairing an operation with a type.
const PARAM_SUFFIXES: [&str; 3] = ["input", "params", ""];

/// One operation exported by a tool module.
#[derive(Debug, Clone)]
pub struct Operation {
    /// Tool name (snake_case).
    pub name: &'static str,
    /// Explicit description, if the module provides one.
    pub description: Option<&'static str>,
}

/// An input type exported by a tool module.
#[derive(Debug, Clone)]
pub struct ParamType {
    /// Unqualified type name (e.g. `CreateAtfTestStepInput`).
    pub name: &'static str,
    /// JSON schema of the type.
    pub schema: Value,
}

impl ParamType {
    /// Describes `T` by its type name and derived schema.
    pub fn of<T: JsonSchema>() -> Self {
        let full = type_name::<T>();
        let name = full.rsplit("::").next().unwrap_or(full);
        let schema = serde_json::to_value(schemars::schema_for!(T)).unwrap_or_else(|e| {
            tracing::warn!(param_type = name, error = %e, "Could not serialize schema");
            generic_schema()
        });
        Self { name, schema }
    }
}

/// Everything a tool module contributes to the registry.
#[derive(Debug, Clone)]
pub struct ModuleListing {
    /// Module name (e.g. `atf`).
    pub module: &'static str,
    /// Operations in declaration order.
    pub operations: Vec<Operation>,
    /// Input types in declaration order.
    pub params: Vec<ParamType>,
}

impl ModuleListing {
    /// Starts an empty listing.
    pub fn new(module: &'static str) -> Self {
        Self {
            module,
            operations: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Adds an operation with an explicit description.
    pub fn operation(mut self, name: &'static str, description: &'static str) -> Self {
        self.operations.push(Operation {
            name,
            description: Some(description),
        });
        self
    }

    /// Adds an operation whose description is inferred from its name.
    pub fn undocumented(mut self, name: &'static str) -> Self {
        self.operations.push(Operation {
            name,
            description: None,
        });
        self
    }

    /// Adds an input type.
    pub fn params<T: JsonSchema>(mut self) -> Self {
        self.params.push(ParamType::of::<T>());
        self
    }
}

/// A registered tool.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolEntry {
    /// Tool name.
    pub name: String,
    /// Module the tool came from.
    pub module: String,
    /// Explicit or inferred description.
    pub description: String,
    /// Name of the paired input type, if one matched.
    pub params: Option<String>,
    /// Input schema (the generic schema when unpaired).
    pub schema: Value,
    /// True when no input type matched.
    pub generic: bool,
}

/// Sorted catalog of every discovered tool.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    entries: BTreeMap<String, ToolEntry>,
}

impl ToolRegistry {
    /// Builds the registry from module listings.
    ///
    /// Duplicate tool names keep the first registration.
    pub fn discover(listings: impl IntoIterator<Item = ModuleListing>) -> Self {
        let listings: Vec<ModuleListing> = listings.into_iter().collect();

        let mut types: HashMap<String, &ParamType> = HashMap::new();
        for listing in &listings {
            for param in &listing.params {
                types.entry(normalize(param.name)).or_insert(param);
            }
        }

        let mut entries = BTreeMap::new();
        for listing in &listings {
            for operation in &listing.operations {
                let matched = candidates(operation.name)
                    .iter()
                    .find_map(|c| types.get(c).copied());

                let entry = ToolEntry {
                    name: operation.name.to_string(),
                    module: listing.module.to_string(),
                    description: operation
                        .description
                        .map(str::to_string)
                        .unwrap_or_else(|| infer_description(operation.name)),
                    params: matched.map(|p| p.name.to_string()),
                    schema: matched
                        .map(|p| p.schema.clone())
                        .unwrap_or_else(generic_schema),
                    generic: matched.is_none(),
                };

                match entries.entry(operation.name.to_string()) {
                    Entry::Vacant(slot) => {
                        slot.insert(entry);
                    }
                    Entry::Occupied(existing) => {
                        tracing::warn!(
                            tool = operation.name,
                            kept = %existing.get().module,
                            ignored = listing.module,
                            "Duplicate tool name, keeping first registration"
                        );
                    }
                }
            }
        }

        tracing::debug!(tools = entries.len(), "Tool registry built");
        Self { entries }
    }

    /// Looks up a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolEntry> {
        self.entries.get(name)
    }

    /// All tools, sorted by name.
    pub fn entries(&self) -> impl Iterator<Item = &ToolEntry> {
        self.entries.values()
    }

    /// Tools that fell back to the generic schema.
    pub fn generic_entries(&self) -> Vec<&ToolEntry> {
        self.entries().filter(|e| e.generic).collect()
    }

    /// Tools whose name, module or description contains `keyword`
    /// (case-insensitive). `None` returns everything.
    pub fn search(&self, keyword: Option<&str>) -> Vec<&ToolEntry> {
        let keyword = keyword
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty());
        self.entries()
            .filter(|e| match &keyword {
                Some(k) => {
                    e.name.contains(k.as_str())
                        || e.module.contains(k.as_str())
                        || e.description.to_lowercase().contains(k.as_str())
                }
                None => true,
            })
            .collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Schema accepting any object.
pub fn generic_schema() -> Value {
    json!({ "type": "object", "additionalProperties": true })
}

/// Lowercases and strips underscores for convention matching.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalized type names an operation may pair with, in preference order.
fn candidates(operation: &str) -> Vec<String> {
    let base = normalize(operation);
    PARAM_SUFFIXES
        .iter()
        .map(|suffix| format!("{}{}", base, suffix))
        .collect()
}

/// Derives a description from a `verb_object` tool name.
pub fn infer_description(name: &str) -> String {
    const VERBS: [(&str, &str); 8] = [
        ("create_", "Create a new"),
        ("update_", "Update an existing"),
        ("delete_", "Delete a"),
        ("get_", "Get a"),
        ("list_", "List"),
        ("clone_", "Clone an existing"),
        ("reorder_", "Reorder"),
        ("bulk_update_", "Update several"),
    ];

    for (prefix, verb) in VERBS {
        if let Some(rest) = name.strip_prefix(prefix) {
            return format!("{} {}", verb, rest.replace('_', " "));
        }
    }
    format!("Run the {} operation", name.replace('_', " "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct CreateWidgetParams {
        name: String,
    }

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct CreateCatalogUIPolicyParams {
        name: String,
    }

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct ListWidgetsInput {
        limit: u32,
    }

    fn widget_listing() -> ModuleListing {
        ModuleListing::new("widget")
            .undocumented("create_widget")
            .operation("list_widgets", "List widgets on the portal")
            .undocumented("archive_widget")
            .params::<CreateWidgetParams>()
            .params::<ListWidgetsInput>()
    }

    #[test]
    fn test_param_type_uses_short_name() {
        let param = ParamType::of::<CreateWidgetParams>();
        assert_eq!(param.name, "CreateWidgetParams");
        assert!(param.schema.to_string().contains("name"));
    }

    #[test]
    fn test_pairs_by_convention() {
        let registry = ToolRegistry::discover([widget_listing()]);

        let create = registry.get("create_widget").unwrap();
        assert_eq!(create.params.as_deref(), Some("CreateWidgetParams"));
        assert!(!create.generic);
        assert_eq!(create.description, "Create a new widget");

        let list = registry.get("list_widgets").unwrap();
        assert_eq!(list.params.as_deref(), Some("ListWidgetsInput"));
        assert_eq!(list.description, "List widgets on the portal");
    }

    #[test]
    fn test_pairing_ignores_case_and_underscores() {
        let listing = ModuleListing::new("ui_policy")
            .undocumented("create_catalog_ui_policy")
            .params::<CreateCatalogUIPolicyParams>();
        let registry = ToolRegistry::discover([listing]);
        assert_eq!(
            registry
                .get("create_catalog_ui_policy")
                .unwrap()
                .params
                .as_deref(),
            Some("CreateCatalogUIPolicyParams")
        );
    }

    #[test]
    fn test_unmatched_operation_gets_generic_schema() {
        let registry = ToolRegistry::discover([widget_listing()]);
        let archive = registry.get("archive_widget").unwrap();
        assert!(archive.generic);
        assert_eq!(archive.params, None);
        assert_eq!(archive.schema, generic_schema());
        assert_eq!(archive.description, "Run the archive widget operation");
        assert_eq!(registry.generic_entries().len(), 1);
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let second = ModuleListing::new("other").operation("create_widget", "shadow");
        let registry = ToolRegistry::discover([widget_listing(), second]);
        let create = registry.get("create_widget").unwrap();
        assert_eq!(create.module, "widget");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_entries_sorted_and_searchable() {
        let registry = ToolRegistry::discover([widget_listing()]);
        let names: Vec<_> = registry.entries().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["archive_widget", "create_widget", "list_widgets"]);

        let hits = registry.search(Some("PORTAL"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "list_widgets");
        assert_eq!(registry.search(None).len(), 3);
    }

    #[test]
    fn test_infer_description() {
        assert_eq!(infer_description("update_topic"), "Update an existing topic");
        assert_eq!(infer_description("reorder_sp_rows"), "Reorder sp rows");
        assert_eq!(
            infer_description("bulk_update_widget_instances"),
            "Update several widget instances"
        );
    }

    #[test]
    fn test_every_tool_module_pairs_its_operations() {
        let registry = ToolRegistry::discover(crate::tools::listings());
        let generic: Vec<_> = registry
            .generic_entries()
            .iter()
            .map(|e| e.name.clone())
            .collect();
        assert!(generic.is_empty(), "unpaired tools: {:?}", generic);
        assert!(registry.len() > 60);
    }
}
