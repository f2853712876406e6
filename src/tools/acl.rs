//! Access control tools (`sys_security_acl`).

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use super::table::{self, Page, TableSpec};
use super::{default_limit, default_true};
use crate::models::{EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Access control rules.
pub const ACLS: TableSpec = TableSpec {
    table: "sys_security_acl",
    label: "ACL",
    plural: "ACLs",
    collection: "acls",
    fields: &[
        "sys_id",
        "name",
        "table",
        "operation",
        "type",
        "field",
        "script",
        "condition",
        "roles",
        "active",
        "admin_overrides",
        "advanced",
        "description",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "name",
    alternate_key: None,
};

fn default_operation() -> String {
    "read".to_string()
}

fn default_acl_type() -> String {
    "record".to_string()
}

/// Input parameters for the create_acl tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateAclInput {
    /// ACL name (e.g. "incident.short_description").
    pub name: String,

    /// Table the ACL protects.
    pub table: String,

    /// Operation: "read" (default), "write", "create" or "delete".
    #[serde(default = "default_operation")]
    pub operation: String,

    /// ACL type: "record" (default) or "field".
    #[serde(default = "default_acl_type", rename = "type")]
    pub acl_type: String,

    /// Field for field-level ACLs.
    #[serde(default)]
    pub field: Option<String>,

    /// Script evaluated by the ACL.
    #[serde(default)]
    pub script: Option<String>,

    /// Condition (encoded query).
    #[serde(default)]
    pub condition: Option<String>,

    /// Comma-separated roles.
    #[serde(default)]
    pub roles: Option<String>,

    /// Whether the ACL is active (default: true).
    #[serde(default = "default_true")]
    pub active: bool,

    /// Admin role overrides the ACL (default: true).
    #[serde(default = "default_true")]
    pub admin_overrides: bool,

    /// Advanced ACL with a script (default: false).
    #[serde(default)]
    pub advanced: bool,

    /// Description of the ACL.
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateAclInput {
    /// Request body; flags are always sent.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set("name", self.name.as_str())
            .set("table", self.table.trim())
            .set("operation", self.operation.as_str())
            .set("type", self.acl_type.as_str())
            .set("active", self.active)
            .set("admin_overrides", self.admin_overrides)
            .set("advanced", self.advanced)
            .set_opt("field", self.field.clone())
            .set_opt("script", self.script.clone())
            .set_opt("condition", self.condition.clone())
            .set_opt("roles", self.roles.clone())
            .set_opt("description", self.description.clone())
    }
}

/// Input parameters for the update_acl tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateAclInput {
    /// ACL sys_id.
    pub acl_id: String,

    /// New name.
    #[serde(default)]
    pub name: Option<String>,

    /// New table.
    #[serde(default)]
    pub table: Option<String>,

    /// New operation.
    #[serde(default)]
    pub operation: Option<String>,

    /// New type.
    #[serde(default, rename = "type")]
    pub acl_type: Option<String>,

    /// New field.
    #[serde(default)]
    pub field: Option<String>,

    /// New script.
    #[serde(default)]
    pub script: Option<String>,

    /// New condition.
    #[serde(default)]
    pub condition: Option<String>,

    /// New comma-separated roles.
    #[serde(default)]
    pub roles: Option<String>,

    /// New active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// New admin override setting.
    #[serde(default)]
    pub admin_overrides: Option<bool>,

    /// New advanced flag.
    #[serde(default)]
    pub advanced: Option<bool>,

    /// New description.
    #[serde(default)]
    pub description: Option<String>,
}

impl UpdateAclInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set_opt("name", self.name.clone())
            .set_opt("table", self.table.clone())
            .set_opt("operation", self.operation.clone())
            .set_opt("type", self.acl_type.clone())
            .set_opt("field", self.field.clone())
            .set_opt("script", self.script.clone())
            .set_opt("condition", self.condition.clone())
            .set_opt("roles", self.roles.clone())
            .set_opt("active", self.active)
            .set_opt("admin_overrides", self.admin_overrides)
            .set_opt("advanced", self.advanced)
            .set_opt("description", self.description.clone())
    }
}

/// Input parameters for the list_acls tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListAclsInput {
    /// Maximum number of ACLs to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by table.
    #[serde(default)]
    pub table: Option<String>,

    /// Filter by operation.
    #[serde(default)]
    pub operation: Option<String>,

    /// Filter by type.
    #[serde(default, rename = "type")]
    pub acl_type: Option<String>,

    /// Filter by active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// Additional encoded query.
    #[serde(default)]
    pub query: Option<String>,
}

impl ListAclsInput {
    fn filter(&self) -> EncodedQuery {
        EncodedQuery::new()
            .equals_opt("table", self.table.as_deref())
            .equals_opt("operation", self.operation.as_deref())
            .equals_opt("type", self.acl_type.as_deref())
            .flag("active", self.active)
            .raw(self.query.as_deref())
    }
}

/// Input parameters for the get_acl tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetAclInput {
    /// ACL sys_id.
    pub acl_id: String,
}

/// Input parameters for the delete_acl tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteAclInput {
    /// ACL sys_id.
    pub acl_id: String,
}

/// Creates an ACL.
pub async fn create_acl(client: &SnowClient, input: CreateAclInput) -> ToolResponse {
    table::create(client, &ACLS, input.to_body()).await
}

/// Updates an ACL.
pub async fn update_acl(client: &SnowClient, input: UpdateAclInput) -> ToolResponse {
    table::update(client, &ACLS, &input.acl_id, input.to_body()).await
}

/// Lists ACLs.
pub async fn list_acls(client: &SnowClient, input: ListAclsInput) -> ToolResponse {
    let page = Page::new(input.limit, input.offset);
    table::list(client, &ACLS, page, input.filter()).await
}

/// Gets one ACL.
pub async fn get_acl(client: &SnowClient, input: GetAclInput) -> ToolResponse {
    table::get(client, &ACLS, &input.acl_id).await
}

/// Deletes an ACL.
pub async fn delete_acl(client: &SnowClient, input: DeleteAclInput) -> ToolResponse {
    table::delete(client, &ACLS, &input.acl_id).await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("acl")
        .operation(
            "create_acl",
            "Create an access control rule for a table or field.",
        )
        .undocumented("update_acl")
        .operation(
            "list_acls",
            "List access control rules, filtered by table, operation, type or active flag.",
        )
        .undocumented("get_acl")
        .undocumented("delete_acl")
        .params::<CreateAclInput>()
        .params::<UpdateAclInput>()
        .params::<ListAclsInput>()
        .params::<GetAclInput>()
        .params::<DeleteAclInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn test_create_defaults_to_record_read() {
        let input: CreateAclInput =
            serde_json::from_value(json!({"name": "incident", "table": "incident"})).unwrap();
        assert_eq!(
            Value::Object(input.to_body().into_record()),
            json!({
                "name": "incident",
                "table": "incident",
                "operation": "read",
                "type": "record",
                "active": true,
                "admin_overrides": true,
                "advanced": false
            })
        );
    }

    #[test]
    fn test_list_filter_uses_type_field() {
        let input: ListAclsInput = serde_json::from_value(
            json!({"table": "incident", "type": "field", "active": true}),
        )
        .unwrap();
        assert_eq!(
            input.filter().build().as_deref(),
            Some("table=incident^type=field^active=true")
        );
    }
}
