//! Attachment tools over `/api/now/attachment`.
//!
//! File contents cross the tool boundary as base64 text in both
//! directions.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;
use serde_json::{json, Value};

use super::failure;
use crate::error::SnowError;
use crate::models::{
    flatten, text, AttachmentUpload, EncodedQuery, Record, TableQuery, ToolResponse,
    ATTACHMENT_FIELDS,
};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

fn default_attachment_limit() -> u32 {
    1000
}

fn default_accept() -> String {
    "*/*".to_string()
}

fn decode_file(data: &str) -> Result<Vec<u8>, SnowError> {
    let compact: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| SnowError::Decode(format!("file_data_base64 is not valid base64: {}", e)))
}

fn uploaded(client: &SnowClient, operation: &str, result: Result<Record, SnowError>) -> ToolResponse {
    match result {
        Ok(record) => {
            let name = text(&record, "file_name").unwrap_or_default();
            tracing::info!(file_name = %name, "Attachment uploaded");
            ToolResponse::ok(
                format!("Uploaded attachment: {}", name),
                flatten(&record, ATTACHMENT_FIELDS),
            )
        }
        Err(e) => failure(client, operation, &e),
    }
}

/// Input parameters for the upload_attachment tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UploadAttachmentInput {
    /// Table of the record to attach to (e.g., "incident").
    pub table_name: String,

    /// sys_id of the record to attach to.
    pub table_sys_id: String,

    /// File name to store.
    pub file_name: String,

    /// MIME type of the file (e.g., "image/png").
    pub content_type: String,

    /// File contents, base64 encoded.
    #[serde(alias = "file_data")]
    pub file_data_base64: String,

    /// Creation time to record, "yyyy-MM-dd HH:mm:ss".
    #[serde(default)]
    pub creation_time: Option<String>,

    /// Encryption context sys_id.
    #[serde(default)]
    pub encryption_context: Option<String>,
}

/// Input parameters for the upload_multipart_attachment tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UploadMultipartAttachmentInput {
    /// Table of the record to attach to.
    pub table_name: String,

    /// sys_id of the record to attach to.
    pub table_sys_id: String,

    /// File name to store.
    pub file_name: String,

    /// MIME type of the file.
    pub content_type: String,

    /// File contents, base64 encoded.
    #[serde(alias = "file_data")]
    pub file_data_base64: String,
}

/// Input parameters for the list_attachments tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListAttachmentsInput {
    /// Maximum number of attachments to return (default: 1000).
    #[serde(default = "default_attachment_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by table name.
    #[serde(default)]
    pub table_name: Option<String>,

    /// Filter by record sys_id.
    #[serde(default)]
    pub table_sys_id: Option<String>,

    /// Filter by file name.
    #[serde(default)]
    pub file_name: Option<String>,

    /// Filter by MIME type.
    #[serde(default)]
    pub content_type: Option<String>,

    /// Additional encoded query.
    #[serde(default)]
    pub query: Option<String>,
}

/// Input parameters for the get_attachment tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetAttachmentInput {
    /// Attachment sys_id.
    pub attachment_id: String,
}

/// Input parameters for the download_attachment tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DownloadAttachmentInput {
    /// Attachment sys_id.
    pub attachment_id: String,

    /// Accept header for the download (default: "*/*").
    #[serde(default = "default_accept")]
    pub accept_type: String,
}

/// Input parameters for the delete_attachment tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteAttachmentInput {
    /// Attachment sys_id.
    pub attachment_id: String,
}

/// Uploads a base64 file as the raw request body.
///
/// Invalid base64 fails before any request is made.
pub async fn upload_attachment(client: &SnowClient, input: UploadAttachmentInput) -> ToolResponse {
    let bytes = match decode_file(&input.file_data_base64) {
        Ok(bytes) => bytes,
        Err(e) => return failure(client, "Upload attachment", &e),
    };
    tracing::debug!(
        table = %input.table_name,
        file_name = %input.file_name,
        size = bytes.len(),
        "Uploading attachment"
    );
    let upload = AttachmentUpload {
        table_name: input.table_name,
        table_sys_id: input.table_sys_id,
        file_name: input.file_name,
        content_type: input.content_type,
        bytes,
        creation_time: input.creation_time,
        encryption_context: input.encryption_context,
    };
    uploaded(
        client,
        "Upload attachment",
        client.upload_attachment(&upload).await,
    )
}

/// Uploads a base64 file as a multipart form.
pub async fn upload_multipart_attachment(
    client: &SnowClient,
    input: UploadMultipartAttachmentInput,
) -> ToolResponse {
    let bytes = match decode_file(&input.file_data_base64) {
        Ok(bytes) => bytes,
        Err(e) => return failure(client, "Upload multipart attachment", &e),
    };
    let upload = AttachmentUpload {
        table_name: input.table_name,
        table_sys_id: input.table_sys_id,
        file_name: input.file_name,
        content_type: input.content_type,
        bytes,
        creation_time: None,
        encryption_context: None,
    };
    uploaded(
        client,
        "Upload multipart attachment",
        client.upload_attachment_multipart(&upload).await,
    )
}

/// Lists attachment metadata.
pub async fn list_attachments(client: &SnowClient, input: ListAttachmentsInput) -> ToolResponse {
    let filter = EncodedQuery::new()
        .equals_opt("table_name", input.table_name.as_deref())
        .equals_opt("table_sys_id", input.table_sys_id.as_deref())
        .equals_opt("file_name", input.file_name.as_deref())
        .equals_opt("content_type", input.content_type.as_deref())
        .raw(input.query.as_deref());
    let query = TableQuery::new()
        .with_limit(input.limit)
        .with_offset(input.offset)
        .with_query(&filter)
        .with_fields(ATTACHMENT_FIELDS);

    match client.list_attachments(&query).await {
        Ok(records) => {
            let attachments: Vec<Value> = records
                .iter()
                .map(|r| flatten(r, ATTACHMENT_FIELDS))
                .collect();
            ToolResponse::ok(
                format!("Found {} attachments", attachments.len()),
                json!({
                    "total": attachments.len(),
                    "limit": input.limit,
                    "offset": input.offset,
                    "attachments": attachments,
                }),
            )
        }
        Err(e) => failure(client, "List attachments", &e),
    }
}

/// Gets one attachment's metadata.
pub async fn get_attachment(client: &SnowClient, input: GetAttachmentInput) -> ToolResponse {
    match client.get_attachment(&input.attachment_id).await {
        Ok(record) => ToolResponse::ok(
            format!(
                "Found attachment: {}",
                text(&record, "file_name").unwrap_or_default()
            ),
            flatten(&record, ATTACHMENT_FIELDS),
        ),
        Err(e) => failure(client, "Get attachment", &e),
    }
}

/// Downloads an attachment, returning its contents as base64.
///
/// The `X-Attachment-Metadata` header is decoded as JSON when it parses,
/// otherwise passed through as text.
pub async fn download_attachment(
    client: &SnowClient,
    input: DownloadAttachmentInput,
) -> ToolResponse {
    match client
        .download_attachment(&input.attachment_id, &input.accept_type)
        .await
    {
        Ok(download) => {
            let metadata = download
                .metadata
                .as_deref()
                .map(|m| serde_json::from_str(m).unwrap_or_else(|_| Value::String(m.to_string())))
                .unwrap_or(Value::Null);
            tracing::debug!(
                attachment_id = %input.attachment_id,
                size = download.bytes.len(),
                "Attachment downloaded"
            );
            ToolResponse::ok(
                format!("Downloaded attachment: {} bytes", download.bytes.len()),
                json!({
                    "attachment_id": input.attachment_id,
                    "file_data_base64": STANDARD.encode(&download.bytes),
                    "content_type": download.content_type,
                    "content_length": download.bytes.len(),
                    "metadata": metadata,
                }),
            )
        }
        Err(e) => failure(client, "Download attachment", &e),
    }
}

/// Deletes an attachment.
pub async fn delete_attachment(client: &SnowClient, input: DeleteAttachmentInput) -> ToolResponse {
    match client.delete_attachment(&input.attachment_id).await {
        Ok(()) => {
            tracing::info!(attachment_id = %input.attachment_id, "Attachment deleted");
            ToolResponse::ok(
                format!("Deleted attachment: {}", input.attachment_id),
                json!({ "deleted_sys_id": input.attachment_id }),
            )
        }
        Err(e) => failure(client, "Delete attachment", &e),
    }
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("attachment")
        .operation(
            "upload_attachment",
            "Attach a base64-encoded file to a record.",
        )
        .operation(
            "upload_multipart_attachment",
            "Attach a base64-encoded file to a record using a multipart form upload.",
        )
        .operation(
            "list_attachments",
            "List attachment metadata, filtered by table, record, file name or content type.",
        )
        .undocumented("get_attachment")
        .operation(
            "download_attachment",
            "Download an attachment. Contents are returned base64 encoded.",
        )
        .undocumented("delete_attachment")
        .params::<UploadAttachmentInput>()
        .params::<UploadMultipartAttachmentInput>()
        .params::<ListAttachmentsInput>()
        .params::<GetAttachmentInput>()
        .params::<DownloadAttachmentInput>()
        .params::<DeleteAttachmentInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_ignores_line_breaks() {
        assert_eq!(decode_file("aGVs\nbG8=").unwrap(), b"hello".to_vec());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_file("not base64!").unwrap_err();
        assert!(matches!(err, SnowError::Decode(_)));
    }

    #[test]
    fn test_upload_accepts_file_data_name() {
        let input: UploadAttachmentInput = serde_json::from_value(json!({
            "table_name": "incident",
            "table_sys_id": "inc1",
            "file_name": "notes.txt",
            "content_type": "text/plain",
            "file_data": "aGVsbG8="
        }))
        .unwrap();
        assert_eq!(input.file_data_base64, "aGVsbG8=");

        let multipart: UploadMultipartAttachmentInput = serde_json::from_value(json!({
            "table_name": "incident",
            "table_sys_id": "inc1",
            "file_name": "notes.txt",
            "content_type": "text/plain",
            "file_data": "aGVsbG8="
        }))
        .unwrap();
        assert_eq!(decode_file(&multipart.file_data_base64).unwrap(), b"hello".to_vec());
    }

    #[test]
    fn test_list_defaults() {
        let input: ListAttachmentsInput = serde_json::from_value(json!({})).unwrap();
        assert_eq!(input.limit, 1000);
        assert_eq!(input.offset, 0);

        let download: DownloadAttachmentInput =
            serde_json::from_value(json!({"attachment_id": "a1"})).unwrap();
        assert_eq!(download.accept_type, "*/*");
    }
}
