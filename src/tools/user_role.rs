//! User role assignments (`sys_user_has_role`).
//!
//! Assignments are addressed by their user and role; removal looks up the
//! assignment row by that pair.

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use super::default_limit;
use super::table::{self, Page, TableSpec};
use crate::models::{EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Role assignments.
pub const USER_ROLES: TableSpec = TableSpec {
    table: "sys_user_has_role",
    label: "user role assignment",
    plural: "user role assignments",
    collection: "roles",
    fields: &[
        "sys_id",
        "user",
        "role",
        "granted_by",
        "inherited",
        "state",
        "sys_created_on",
    ],
    name_field: "role",
    alternate_key: None,
};

/// One user and role pair.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UserRolePair {
    /// User sys_id.
    pub user_id: String,

    /// Role sys_id.
    pub role_id: String,
}

impl UserRolePair {
    fn to_body(&self, granted_by: Option<&str>) -> RecordBody {
        RecordBody::new()
            .set("user", self.user_id.trim())
            .set("role", self.role_id.trim())
            .set_opt("granted_by", granted_by.map(str::trim))
    }

    fn filter(&self) -> EncodedQuery {
        EncodedQuery::new()
            .equals("user", self.user_id.trim())
            .equals("role", self.role_id.trim())
    }

    fn described(&self) -> String {
        format!(
            "user {} / role {}",
            self.user_id.trim(),
            self.role_id.trim()
        )
    }
}

/// Input parameters for the assign_user_role tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AssignUserRoleInput {
    /// User sys_id to assign the role to.
    pub user_id: String,

    /// Role sys_id to assign.
    pub role_id: String,

    /// User sys_id recorded as the granter.
    #[serde(default)]
    pub granted_by: Option<String>,
}

/// Input parameters for the remove_user_role tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RemoveUserRoleInput {
    /// User sys_id to remove the role from.
    pub user_id: String,

    /// Role sys_id to remove.
    pub role_id: String,
}

/// Input parameters for the list_user_roles tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListUserRolesInput {
    /// Maximum number of assignments to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by user sys_id.
    #[serde(default)]
    pub user_id: Option<String>,

    /// Filter by role sys_id.
    #[serde(default)]
    pub role_id: Option<String>,

    /// Additional encoded query.
    #[serde(default)]
    pub query: Option<String>,
}

/// Input parameters for the bulk_assign_user_roles tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BulkAssignUserRolesInput {
    /// Assignments to create.
    pub assignments: Vec<UserRolePair>,

    /// User sys_id recorded as the granter of every assignment.
    #[serde(default)]
    pub granted_by: Option<String>,
}

/// Input parameters for the bulk_remove_user_roles tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BulkRemoveUserRolesInput {
    /// Assignments to remove.
    pub removals: Vec<UserRolePair>,
}

/// Assigns a role to a user.
pub async fn assign_user_role(client: &SnowClient, input: AssignUserRoleInput) -> ToolResponse {
    let pair = UserRolePair {
        user_id: input.user_id,
        role_id: input.role_id,
    };
    table::create(client, &USER_ROLES, pair.to_body(input.granted_by.as_deref())).await
}

/// Removes a role from a user.
pub async fn remove_user_role(client: &SnowClient, input: RemoveUserRoleInput) -> ToolResponse {
    let pair = UserRolePair {
        user_id: input.user_id,
        role_id: input.role_id,
    };
    table::delete_matching(client, &USER_ROLES, pair.filter(), &pair.described()).await
}

/// Lists role assignments.
pub async fn list_user_roles(client: &SnowClient, input: ListUserRolesInput) -> ToolResponse {
    let filter = EncodedQuery::new()
        .equals_opt("user", input.user_id.as_deref().map(str::trim))
        .equals_opt("role", input.role_id.as_deref().map(str::trim))
        .raw(input.query.as_deref());
    table::list(client, &USER_ROLES, Page::new(input.limit, input.offset), filter).await
}

/// Creates every assignment, continuing past failures.
pub async fn bulk_assign_user_roles(
    client: &SnowClient,
    input: BulkAssignUserRolesInput,
) -> ToolResponse {
    let granted_by = input.granted_by.as_deref();
    let bodies = input
        .assignments
        .iter()
        .map(|pair| pair.to_body(granted_by))
        .collect();
    table::create_each(client, &USER_ROLES, bodies).await
}

/// Removes every assignment, continuing past failures.
pub async fn bulk_remove_user_roles(
    client: &SnowClient,
    input: BulkRemoveUserRolesInput,
) -> ToolResponse {
    let targets = input
        .removals
        .iter()
        .map(|pair| (pair.filter(), pair.described()))
        .collect();
    table::delete_each(client, &USER_ROLES, targets).await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("user_role")
        .operation("assign_user_role", "Assign a role to a user.")
        .operation("remove_user_role", "Remove a role from a user.")
        .operation(
            "list_user_roles",
            "List role assignments, filtered by user or role.",
        )
        .operation(
            "bulk_assign_user_roles",
            "Assign several user/role pairs. Every pair is attempted; failures are reported per pair.",
        )
        .operation(
            "bulk_remove_user_roles",
            "Remove several user/role pairs. Every pair is attempted; failures are reported per pair.",
        )
        .params::<AssignUserRoleInput>()
        .params::<RemoveUserRoleInput>()
        .params::<ListUserRolesInput>()
        .params::<BulkAssignUserRolesInput>()
        .params::<BulkRemoveUserRolesInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn test_pair_body_and_filter() {
        let pair = UserRolePair {
            user_id: "u1 ".to_string(),
            role_id: "r1".to_string(),
        };
        assert_eq!(
            Value::Object(pair.to_body(Some("admin1")).into_record()),
            json!({"user": "u1", "role": "r1", "granted_by": "admin1"})
        );
        assert_eq!(pair.filter().build().as_deref(), Some("user=u1^role=r1"));
    }
}
