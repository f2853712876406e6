//! Email template tools (`sysevent_email_template`).

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use super::table::{self, copy_fields, Page, TableSpec};
use super::{default_limit, default_true};
use crate::models::{text, EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Email templates.
pub const TEMPLATES: TableSpec = TableSpec {
    table: "sysevent_email_template",
    label: "email template",
    plural: "email templates",
    collection: "templates",
    fields: &[
        "sys_id",
        "name",
        "subject",
        "message_html",
        "message",
        "category",
        "active",
        "description",
        "advanced",
        "application",
        "condition",
        "content_type",
        "sys_class_name",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "name",
    alternate_key: None,
};

const CLONED_FIELDS: &[&str] = &[
    "message_html",
    "message",
    "category",
    "active",
    "advanced",
    "application",
    "condition",
    "content_type",
    "sys_class_name",
];

fn default_content_type() -> String {
    "text/html".to_string()
}

fn default_class_name() -> String {
    TEMPLATES.table.to_string()
}

/// Input parameters for the create_email_template tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateEmailTemplateInput {
    /// Name of the email template.
    pub name: String,

    /// Subject line for emails using this template.
    pub subject: String,

    /// HTML message content.
    pub message_html: String,

    /// Plain text message content.
    #[serde(default)]
    pub message: Option<String>,

    /// Category of the template.
    #[serde(default)]
    pub category: Option<String>,

    /// Whether the template is active (default: true).
    #[serde(default = "default_true")]
    pub active: bool,

    /// Description of the template.
    #[serde(default)]
    pub description: Option<String>,

    /// Whether this is an advanced template (default: false).
    #[serde(default)]
    pub advanced: bool,

    /// Application scope sys_id.
    #[serde(default)]
    pub application: Option<String>,

    /// Condition for when to use this template.
    #[serde(default)]
    pub condition: Option<String>,

    /// Content type: "text/html" (default) or "text/plain".
    #[serde(default = "default_content_type")]
    pub content_type: String,

    /// System class name (default: "sysevent_email_template").
    #[serde(default = "default_class_name")]
    pub sys_class_name: String,
}

impl CreateEmailTemplateInput {
    /// Request body for the new template.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set("name", self.name.as_str())
            .set("subject", self.subject.as_str())
            .set("message_html", self.message_html.as_str())
            .set("active", self.active)
            .set("advanced", self.advanced)
            .set("content_type", self.content_type.as_str())
            .set("sys_class_name", self.sys_class_name.as_str())
            .set_opt("message", self.message.clone())
            .set_opt("category", self.category.clone())
            .set_opt("description", self.description.clone())
            .set_opt("application", self.application.clone())
            .set_opt("condition", self.condition.clone())
    }
}

/// Input parameters for the update_email_template tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateEmailTemplateInput {
    /// Email template sys_id.
    pub template_id: String,

    /// New name.
    #[serde(default)]
    pub name: Option<String>,

    /// New subject line.
    #[serde(default)]
    pub subject: Option<String>,

    /// New HTML content.
    #[serde(default)]
    pub message_html: Option<String>,

    /// New plain text content.
    #[serde(default)]
    pub message: Option<String>,

    /// New category.
    #[serde(default)]
    pub category: Option<String>,

    /// New active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// New description.
    #[serde(default)]
    pub description: Option<String>,

    /// New advanced setting.
    #[serde(default)]
    pub advanced: Option<bool>,

    /// New application scope.
    #[serde(default)]
    pub application: Option<String>,

    /// New condition.
    #[serde(default)]
    pub condition: Option<String>,

    /// New content type.
    #[serde(default)]
    pub content_type: Option<String>,
}

impl UpdateEmailTemplateInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set_opt("name", self.name.clone())
            .set_opt("subject", self.subject.clone())
            .set_opt("message_html", self.message_html.clone())
            .set_opt("message", self.message.clone())
            .set_opt("category", self.category.clone())
            .set_opt("active", self.active)
            .set_opt("description", self.description.clone())
            .set_opt("advanced", self.advanced)
            .set_opt("application", self.application.clone())
            .set_opt("condition", self.condition.clone())
            .set_opt("content_type", self.content_type.clone())
    }
}

/// Input parameters for the list_email_templates tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListEmailTemplatesInput {
    /// Filter by category.
    #[serde(default)]
    pub category: Option<String>,

    /// Filter by active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// Filter by advanced status.
    #[serde(default)]
    pub advanced: Option<bool>,

    /// Filter by application scope.
    #[serde(default)]
    pub application: Option<String>,

    /// Filter by content type.
    #[serde(default)]
    pub content_type: Option<String>,

    /// Only templates whose name contains this text.
    #[serde(default)]
    pub name_contains: Option<String>,

    /// Maximum number of templates to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Additional encoded query, ANDed with the filters above.
    #[serde(default)]
    pub query: Option<String>,
}

impl ListEmailTemplatesInput {
    fn filter(&self) -> EncodedQuery {
        EncodedQuery::new()
            .equals_opt("category", self.category.as_deref())
            .flag("active", self.active)
            .flag("advanced", self.advanced)
            .equals_opt("application", self.application.as_deref())
            .equals_opt("content_type", self.content_type.as_deref())
            .contains("name", self.name_contains.as_deref())
            .raw(self.query.as_deref())
    }
}

/// Input parameters for the get_email_template tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetEmailTemplateInput {
    /// Email template sys_id.
    pub template_id: String,
}

/// Input parameters for the delete_email_template tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteEmailTemplateInput {
    /// Email template sys_id.
    pub template_id: String,
}

/// Input parameters for the clone_email_template tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CloneEmailTemplateInput {
    /// Email template sys_id to clone.
    pub template_id: String,

    /// Name for the cloned template.
    pub new_name: String,

    /// Subject for the cloned template (default: the source subject).
    #[serde(default)]
    pub new_subject: Option<String>,
}

/// Creates an email template.
pub async fn create_email_template(
    client: &SnowClient,
    input: CreateEmailTemplateInput,
) -> ToolResponse {
    table::create(client, &TEMPLATES, input.to_body()).await
}

/// Updates an email template.
pub async fn update_email_template(
    client: &SnowClient,
    input: UpdateEmailTemplateInput,
) -> ToolResponse {
    table::update(client, &TEMPLATES, &input.template_id, input.to_body()).await
}

/// Lists email templates.
pub async fn list_email_templates(
    client: &SnowClient,
    input: ListEmailTemplatesInput,
) -> ToolResponse {
    let page = Page::new(input.limit, input.offset);
    table::list(client, &TEMPLATES, page, input.filter()).await
}

/// Gets one email template.
pub async fn get_email_template(
    client: &SnowClient,
    input: GetEmailTemplateInput,
) -> ToolResponse {
    table::get(client, &TEMPLATES, &input.template_id).await
}

/// Deletes an email template.
pub async fn delete_email_template(
    client: &SnowClient,
    input: DeleteEmailTemplateInput,
) -> ToolResponse {
    table::delete(client, &TEMPLATES, &input.template_id).await
}

/// Copies an email template under a new name.
///
/// The copy's description records the source template name.
pub async fn clone_email_template(
    client: &SnowClient,
    input: CloneEmailTemplateInput,
) -> ToolResponse {
    table::clone_record(client, &TEMPLATES, &input.template_id, |source| {
        let subject = input
            .new_subject
            .clone()
            .or_else(|| text(source, "subject"))
            .unwrap_or_default();
        let origin = text(source, "name").unwrap_or_else(|| "Unknown".to_string());

        Ok(copy_fields(source, CLONED_FIELDS)
            .set("name", input.new_name.as_str())
            .set("subject", subject)
            .set("description", format!("Cloned from: {}", origin)))
    })
    .await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("email_template")
        .operation(
            "create_email_template",
            "Create an email template. Name, subject and message_html are required.",
        )
        .undocumented("update_email_template")
        .operation(
            "list_email_templates",
            "List email templates, filtered by category, flags, application, content type or name.",
        )
        .undocumented("get_email_template")
        .undocumented("delete_email_template")
        .operation(
            "clone_email_template",
            "Copy an email template under a new name, optionally with a new subject.",
        )
        .params::<CreateEmailTemplateInput>()
        .params::<UpdateEmailTemplateInput>()
        .params::<ListEmailTemplatesInput>()
        .params::<GetEmailTemplateInput>()
        .params::<DeleteEmailTemplateInput>()
        .params::<CloneEmailTemplateInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_create_defaults() {
        let input: CreateEmailTemplateInput = serde_json::from_value(json!({
            "name": "Welcome",
            "subject": "Hello",
            "message_html": "<p>Hi</p>"
        }))
        .unwrap();
        let body = input.to_body();
        assert_eq!(body.get("content_type"), Some(&json!("text/html")));
        assert_eq!(
            body.get("sys_class_name"),
            Some(&json!("sysevent_email_template"))
        );
        assert_eq!(body.get("advanced"), Some(&json!(false)));
        assert!(body.get("category").is_none());
    }

    #[test]
    fn test_list_filter_appends_raw_query_last() {
        let input: ListEmailTemplatesInput = serde_json::from_value(json!({
            "active": true,
            "name_contains": "incident",
            "query": "ORDERBYname"
        }))
        .unwrap();
        assert_eq!(
            input.filter().build().unwrap(),
            "active=true^nameLIKEincident^ORDERBYname"
        );
    }
}
