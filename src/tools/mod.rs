//! MCP tool implementations.
//!
//! Every tool is a plain async function taking the shared [`SnowClient`]
//! and a typed input, returning a [`ToolResponse`] envelope. Tools never
//! return `Err`: transport and API failures become `success: false`
//! envelopes with a sanitized message.
//!
//! Most domains are thin descriptors over the generic operations in
//! [`table`]. Each module also exports a `listing()` used by the
//! [`crate::registry`] to pair operations with their input schemas.

pub mod acl;
pub mod assignment_rule;
pub mod atf;
pub mod atf_test;
pub mod attachment;
pub mod catalog;
pub mod catalog_availability;
pub mod catalog_client_script;
pub mod catalog_variable;
pub mod connected_content;
pub mod dictionary;
pub mod elevation;
pub mod email_layout;
pub mod email_template;
pub mod image;
pub mod inbound_email;
pub mod knowledge;
pub mod menu;
pub mod notification;
pub mod portal;
pub mod portal_association;
pub mod portal_layout;
pub mod portal_page;
pub mod quick_link;
pub mod table;
pub mod table_choice;
pub mod taxonomy_content;
pub mod ui_action;
pub mod ui_policy;
pub mod user_role;
pub mod widget_instance;

use crate::error::SnowError;
use crate::models::ToolResponse;
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Default page size for list tools.
pub(crate) fn default_limit() -> u32 {
    10
}

pub(crate) fn default_true() -> bool {
    true
}

/// Default `order` for records that sort in steps of 100.
pub(crate) fn default_order() -> i64 {
    100
}

/// Builds a failure envelope for `operation` and logs it.
pub(crate) fn failure(client: &SnowClient, operation: &str, error: &SnowError) -> ToolResponse {
    let sanitized = client.sanitize_error(error);
    tracing::error!(operation = operation, error = %sanitized, "Tool call failed");
    ToolResponse::failure(format!("{} failed: {}", operation, sanitized))
}

/// Listings of every tool module, in registration order.
pub fn listings() -> Vec<ModuleListing> {
    vec![
        atf::listing(),
        atf_test::listing(),
        catalog::listing(),
        catalog_variable::listing(),
        catalog_client_script::listing(),
        catalog_availability::listing(),
        ui_policy::listing(),
        notification::listing(),
        email_layout::listing(),
        email_template::listing(),
        inbound_email::listing(),
        ui_action::listing(),
        acl::listing(),
        user_role::listing(),
        dictionary::listing(),
        table_choice::listing(),
        assignment_rule::listing(),
        menu::listing(),
        knowledge::listing(),
        connected_content::listing(),
        portal::listing(),
        portal_association::listing(),
        taxonomy_content::listing(),
        portal_page::listing(),
        portal_layout::listing(),
        widget_instance::listing(),
        quick_link::listing(),
        image::listing(),
        attachment::listing(),
        elevation::listing(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listings_cover_every_domain() {
        let modules: Vec<_> = listings().iter().map(|l| l.module).collect();
        assert!(modules.contains(&"atf"));
        assert!(modules.contains(&"attachment"));
        assert!(modules.contains(&"elevation"));
        assert!(modules.contains(&"dictionary"));
        assert!(modules.contains(&"portal_association"));
        assert_eq!(modules.len(), 30);
    }
}
