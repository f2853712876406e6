//! Tool discovery by naming convention.

use rmcp::schemars::{self, JsonSchema};
use snow_mcp::registry::{generic_schema, ModuleListing, ToolRegistry};
use snow_mcp::tools;

#[allow(dead_code)]
#[derive(JsonSchema)]
struct CreateWidgetParams {
    name: String,
    template: Option<String>,
}

#[test]
fn pairs_function_with_params_type() {
    let registry = ToolRegistry::discover([ModuleListing::new("widget")
        .undocumented("create_widget")
        .params::<CreateWidgetParams>()]);

    let entry = registry.get("create_widget").expect("registered");
    assert_eq!(entry.params.as_deref(), Some("CreateWidgetParams"));
    assert!(!entry.generic);
    assert_eq!(entry.description, "Create a new widget");
    assert!(entry.schema["properties"]["name"].is_object());
}

#[test]
fn unmatched_function_gets_generic_schema() {
    let registry = ToolRegistry::discover([ModuleListing::new("widget")
        .undocumented("publish_widget")
        .params::<CreateWidgetParams>()]);

    let entry = registry.get("publish_widget").expect("registered");
    assert!(entry.generic);
    assert_eq!(entry.params, None);
    assert_eq!(entry.schema, generic_schema());
    assert_eq!(registry.generic_entries().len(), 1);
}

#[test]
fn every_shipped_tool_has_a_typed_schema() {
    let registry = ToolRegistry::discover(tools::listings());
    assert_eq!(registry.len(), 220);
    assert!(registry.generic_entries().is_empty());
    assert!(registry.get("create_responsive_grid").is_some());
    assert!(registry.get("security_elevation").is_some());
    assert!(registry.get("reorder_choices").is_some());
    assert!(registry.get("bulk_update_available_for").is_some());
    assert!(registry.get("create_taxonomy_content_configuration").is_some());
}

#[test]
fn compound_operations_pair_with_their_inputs() {
    let registry = ToolRegistry::discover(tools::listings());
    for (operation, params) in [
        ("add_not_available_for", "AddNotAvailableForInput"),
        ("get_table_column", "GetTableColumnInput"),
        ("bulk_create_portal_taxonomy_associations", "BulkCreatePortalTaxonomyAssociationsInput"),
        ("list_app_modules", "ListAppModulesInput"),
    ] {
        let entry = registry.get(operation).expect("registered");
        assert_eq!(entry.params.as_deref(), Some(params), "{}", operation);
    }
}
