//! Email notification tools (`sysevent_email_action`).

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use super::table::{self, Page, TableSpec};
use super::{default_limit, default_true};
use crate::models::{EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Email notifications.
pub const NOTIFICATIONS: TableSpec = TableSpec {
    table: "sysevent_email_action",
    label: "email notification",
    plural: "email notifications",
    collection: "notifications",
    fields: &[
        "sys_id",
        "name",
        "collection",
        "event_name",
        "active",
        "subject",
        "message_html",
        "from",
        "reply_to",
        "recipient_users",
        "recipient_fields",
        "condition",
        "weight",
        "category",
        "template",
        "content_type",
        "action_insert",
        "action_update",
        "action_delete",
        "item",
        "item_table",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "name",
    alternate_key: None,
};

/// Flags sent as `false` on create unless given.
const CREATE_FLAGS: &[&str] = &[
    "include_attachments",
    "force_delivery",
    "exclude_delegates",
    "mandatory",
    "subscribable",
    "digestable",
    "action_insert",
    "action_update",
    "action_delete",
    "event_parm_1",
    "event_parm_2",
    "enable_dynamic_translation",
    "push_message_only",
];

/// Content, recipient and trigger settings shared by create and update.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NotificationSettings {
    /// Email subject line.
    #[serde(default)]
    pub subject: Option<String>,

    /// Plain-text message body.
    #[serde(default)]
    pub message: Option<String>,

    /// HTML message body.
    #[serde(default)]
    pub message_html: Option<String>,

    /// From address.
    #[serde(default)]
    pub from_address: Option<String>,

    /// Reply-to address.
    #[serde(default)]
    pub reply_to: Option<String>,

    /// User sys_ids to notify.
    #[serde(default)]
    pub recipient_users: Option<Vec<String>>,

    /// Fields holding users or groups to notify.
    #[serde(default)]
    pub recipient_fields: Option<Vec<String>>,

    /// Condition (encoded query) for sending.
    #[serde(default)]
    pub condition: Option<String>,

    /// Advanced condition script.
    #[serde(default)]
    pub advanced_condition: Option<String>,

    /// Processing weight.
    #[serde(default)]
    pub weight: Option<i64>,

    /// Notification category sys_id.
    #[serde(default)]
    pub category: Option<String>,

    /// Email template sys_id.
    #[serde(default)]
    pub template: Option<String>,

    /// Content type ("text/html" or "text/plain").
    #[serde(default)]
    pub content_type: Option<String>,

    /// Email importance.
    #[serde(default)]
    pub importance: Option<String>,

    /// Send record files along with the email.
    #[serde(default)]
    pub include_attachments: Option<bool>,

    /// Deliver even when user preferences say no.
    #[serde(default)]
    pub force_delivery: Option<bool>,

    /// Leave out delegates.
    #[serde(default)]
    pub exclude_delegates: Option<bool>,

    /// Users cannot unsubscribe.
    #[serde(default)]
    pub mandatory: Option<bool>,

    /// Users can subscribe.
    #[serde(default)]
    pub subscribable: Option<bool>,

    /// Can be sent as a digest.
    #[serde(default)]
    pub digestable: Option<bool>,

    /// Digest subject.
    #[serde(default)]
    pub digest_subject: Option<String>,

    /// Digest text.
    #[serde(default)]
    pub digest_text: Option<String>,

    /// Digest reply-to address.
    #[serde(default)]
    pub digest_reply_to: Option<String>,

    /// Digest template sys_id.
    #[serde(default)]
    pub digest_template: Option<String>,

    /// SMS alternate text.
    #[serde(default)]
    pub sms_alternate: Option<String>,

    /// Email stationery style sys_id.
    #[serde(default)]
    pub style: Option<String>,

    /// Send on record insert.
    #[serde(default)]
    pub action_insert: Option<bool>,

    /// Send on record update.
    #[serde(default)]
    pub action_update: Option<bool>,

    /// Send on record delete.
    #[serde(default)]
    pub action_delete: Option<bool>,

    /// Event parameter 1 holds a recipient.
    #[serde(default)]
    pub event_parm_1: Option<bool>,

    /// Event parameter 2 holds a recipient.
    #[serde(default)]
    pub event_parm_2: Option<bool>,

    /// Field whose change fires the event.
    #[serde(default)]
    pub affected_field_on_event: Option<String>,

    /// Translate content per recipient language.
    #[serde(default)]
    pub enable_dynamic_translation: Option<bool>,

    /// Send only push messages.
    #[serde(default)]
    pub push_message_only: Option<bool>,

    /// Push message sys_ids.
    #[serde(default)]
    pub message_list: Option<Vec<String>>,

    /// Item reference (create default: "event.parm1").
    #[serde(default)]
    pub item: Option<String>,

    /// Table of the item reference.
    #[serde(default)]
    pub item_table: Option<String>,
}

impl NotificationSettings {
    fn apply(&self, body: RecordBody) -> RecordBody {
        body.set_opt("subject", self.subject.clone())
            .set_opt("message", self.message.clone())
            .set_opt("message_html", self.message_html.clone())
            .set_opt("from", self.from_address.clone())
            .set_opt("reply_to", self.reply_to.clone())
            .set_list("recipient_users", self.recipient_users.as_deref())
            .set_list("recipient_fields", self.recipient_fields.as_deref())
            .set_opt("condition", self.condition.clone())
            .set_opt("advanced_condition", self.advanced_condition.clone())
            .set_opt("weight", self.weight)
            .set_opt("category", self.category.clone())
            .set_opt("template", self.template.clone())
            .set_opt("content_type", self.content_type.clone())
            .set_opt("importance", self.importance.clone())
            .set_opt("include_attachments", self.include_attachments)
            .set_opt("force_delivery", self.force_delivery)
            .set_opt("exclude_delegates", self.exclude_delegates)
            .set_opt("mandatory", self.mandatory)
            .set_opt("subscribable", self.subscribable)
            .set_opt("digestable", self.digestable)
            .set_opt("digest_subject", self.digest_subject.clone())
            .set_opt("digest_text", self.digest_text.clone())
            .set_opt("digest_reply_to", self.digest_reply_to.clone())
            .set_opt("digest_template", self.digest_template.clone())
            .set_opt("sms_alternate", self.sms_alternate.clone())
            .set_opt("style", self.style.clone())
            .set_opt("action_insert", self.action_insert)
            .set_opt("action_update", self.action_update)
            .set_opt("action_delete", self.action_delete)
            .set_opt("event_parm_1", self.event_parm_1)
            .set_opt("event_parm_2", self.event_parm_2)
            .set_opt("affected_field_on_event", self.affected_field_on_event.clone())
            .set_opt("enable_dynamic_translation", self.enable_dynamic_translation)
            .set_opt("push_message_only", self.push_message_only)
            .set_list("message_list", self.message_list.as_deref())
            .set_opt("item", self.item.clone())
            .set_opt("item_table", self.item_table.clone())
    }
}

/// Input parameters for the create_email_notification tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateEmailNotificationInput {
    /// Name of the notification.
    pub name: String,

    /// Table whose records trigger the notification.
    pub table: String,

    /// Event that fires the notification (e.g. "incident.commented").
    pub event_name: String,

    /// Whether the notification is active (default: true).
    #[serde(default = "default_true")]
    pub active: bool,

    /// Optional notification fields.
    #[serde(flatten)]
    pub settings: NotificationSettings,
}

impl CreateEmailNotificationInput {
    /// Request body; unset flags are sent as `false`.
    pub fn to_body(&self) -> RecordBody {
        let body = CREATE_FLAGS.iter().fold(
            RecordBody::new()
                .set("name", self.name.as_str())
                .set("collection", self.table.trim())
                .set("event_name", self.event_name.trim())
                .set("active", self.active)
                .set("weight", 0)
                .set("content_type", "text/html")
                .set("item", "event.parm1"),
            |body, flag| body.set(flag, false),
        );
        self.settings.apply(body)
    }
}

/// Input parameters for the update_email_notification tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateEmailNotificationInput {
    /// Email notification sys_id.
    pub notification_id: String,

    /// New name.
    #[serde(default)]
    pub name: Option<String>,

    /// New triggering table.
    #[serde(default)]
    pub table: Option<String>,

    /// New triggering event.
    #[serde(default)]
    pub event_name: Option<String>,

    /// New active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// Optional notification fields.
    #[serde(flatten)]
    pub settings: NotificationSettings,
}

impl UpdateEmailNotificationInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        let body = RecordBody::new()
            .set_opt("name", self.name.clone())
            .set_opt("collection", self.table.clone())
            .set_opt("event_name", self.event_name.clone())
            .set_opt("active", self.active);
        self.settings.apply(body)
    }
}

/// Input parameters for the list_email_notifications tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListEmailNotificationsInput {
    /// Maximum number of notifications to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// Filter by triggering table.
    #[serde(default)]
    pub table: Option<String>,

    /// Filter by event name.
    #[serde(default)]
    pub event_name: Option<String>,

    /// Filter by category sys_id.
    #[serde(default)]
    pub category: Option<String>,

    /// Additional encoded query.
    #[serde(default)]
    pub query: Option<String>,
}

/// Input parameters for the get_email_notification tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetEmailNotificationInput {
    /// Email notification sys_id.
    pub notification_id: String,
}

/// Input parameters for the delete_email_notification tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteEmailNotificationInput {
    /// Email notification sys_id.
    pub notification_id: String,
}

/// Creates an email notification.
pub async fn create_email_notification(
    client: &SnowClient,
    input: CreateEmailNotificationInput,
) -> ToolResponse {
    table::create(client, &NOTIFICATIONS, input.to_body()).await
}

/// Updates an email notification.
pub async fn update_email_notification(
    client: &SnowClient,
    input: UpdateEmailNotificationInput,
) -> ToolResponse {
    table::update(
        client,
        &NOTIFICATIONS,
        &input.notification_id,
        input.to_body(),
    )
    .await
}

/// Lists email notifications.
pub async fn list_email_notifications(
    client: &SnowClient,
    input: ListEmailNotificationsInput,
) -> ToolResponse {
    let filter = EncodedQuery::new()
        .flag("active", input.active)
        .equals_opt("collection", input.table.as_deref())
        .equals_opt("event_name", input.event_name.as_deref())
        .equals_opt("category", input.category.as_deref())
        .raw(input.query.as_deref());
    table::list(
        client,
        &NOTIFICATIONS,
        Page::new(input.limit, input.offset),
        filter,
    )
    .await
}

/// Gets one email notification.
pub async fn get_email_notification(
    client: &SnowClient,
    input: GetEmailNotificationInput,
) -> ToolResponse {
    table::get(client, &NOTIFICATIONS, &input.notification_id).await
}

/// Deletes an email notification.
pub async fn delete_email_notification(
    client: &SnowClient,
    input: DeleteEmailNotificationInput,
) -> ToolResponse {
    table::delete(client, &NOTIFICATIONS, &input.notification_id).await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("notification")
        .operation(
            "create_email_notification",
            "Create an email notification fired by an event or record changes on a table.",
        )
        .undocumented("update_email_notification")
        .operation(
            "list_email_notifications",
            "List email notifications, filtered by active flag, table, event or category.",
        )
        .undocumented("get_email_notification")
        .undocumented("delete_email_notification")
        .params::<CreateEmailNotificationInput>()
        .params::<UpdateEmailNotificationInput>()
        .params::<ListEmailNotificationsInput>()
        .params::<GetEmailNotificationInput>()
        .params::<DeleteEmailNotificationInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_create_body_defaults_and_renames() {
        let input: CreateEmailNotificationInput = serde_json::from_value(json!({
            "name": "Incident commented",
            "table": "incident",
            "event_name": "incident.commented",
            "from_address": "noreply@example.com",
            "recipient_users": ["u1", "u2"],
            "action_update": true
        }))
        .unwrap();
        let body = input.to_body();
        assert_eq!(body.get("collection"), Some(&json!("incident")));
        assert_eq!(body.get("from"), Some(&json!("noreply@example.com")));
        assert_eq!(body.get("recipient_users"), Some(&json!("u1,u2")));
        assert_eq!(body.get("action_update"), Some(&json!(true)));
        assert_eq!(body.get("action_insert"), Some(&json!(false)));
        assert_eq!(body.get("content_type"), Some(&json!("text/html")));
        assert_eq!(body.get("item"), Some(&json!("event.parm1")));
        assert_eq!(body.get("weight"), Some(&json!(0)));
    }

    #[test]
    fn test_update_sends_only_changes() {
        let input: UpdateEmailNotificationInput = serde_json::from_value(json!({
            "notification_id": "n1",
            "subject": "New subject"
        }))
        .unwrap();
        let body = input.to_body();
        assert_eq!(body.len(), 1);
        assert_eq!(body.get("subject"), Some(&json!("New subject")));
    }
}
