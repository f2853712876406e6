//! Security elevation: impersonating roles for the current session.

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;
use serde_json::json;

use super::failure;
use crate::error::SnowError;
use crate::models::ToolResponse;
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Input parameters for the security_elevation tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SecurityElevationInput {
    /// Comma-separated roles to elevate to (e.g., "security_admin").
    pub roles: String,
}

impl SecurityElevationInput {
    /// Normalized role list: trimmed, blanks dropped.
    fn role_list(&self) -> String {
        self.roles
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Elevates the session to the requested roles.
///
/// Later calls on the same client carry the elevated session cookies.
pub async fn security_elevation(
    client: &SnowClient,
    input: SecurityElevationInput,
) -> ToolResponse {
    let roles = input.role_list();
    if roles.is_empty() {
        return failure(
            client,
            "Security elevation",
            &SnowError::validation("roles must name at least one role"),
        );
    }

    match client.elevate_roles(&roles).await {
        Ok(response) => {
            tracing::info!(roles = %roles, "Session elevated");
            ToolResponse::ok(
                format!("Elevated session to roles: {}", roles),
                json!({ "elevated_roles": roles, "response": response }),
            )
        }
        Err(e) => failure(client, "Security elevation", &e),
    }
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("elevation")
        .operation(
            "security_elevation",
            "Elevate the current session to privileged roles (e.g. security_admin) for subsequent calls.",
        )
        .params::<SecurityElevationInput>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_list_normalized() {
        let input = SecurityElevationInput {
            roles: " security_admin , ,admin".to_string(),
        };
        assert_eq!(input.role_list(), "security_admin,admin");
    }
}
