//! Attachment API payloads.

/// A binary file to store against a record.
#[derive(Debug, Clone)]
pub struct AttachmentUpload {
    /// Table of the record the file is attached to.
    pub table_name: String,
    /// `sys_id` of that record.
    pub table_sys_id: String,
    /// File name to store.
    pub file_name: String,
    /// MIME type sent as `Content-Type`.
    pub content_type: String,
    /// Decoded file contents.
    pub bytes: Vec<u8>,
    /// Optional `creation_time` query parameter.
    pub creation_time: Option<String>,
    /// Optional `encryption_context` query parameter.
    pub encryption_context: Option<String>,
}

impl AttachmentUpload {
    /// Query parameters for `POST /attachment/file`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("table_name", self.table_name.clone()),
            ("table_sys_id", self.table_sys_id.clone()),
            ("file_name", self.file_name.clone()),
        ];
        if let Some(t) = &self.creation_time {
            pairs.push(("creation_time", t.clone()));
        }
        if let Some(c) = &self.encryption_context {
            pairs.push(("encryption_context", c.clone()));
        }
        pairs
    }
}

/// A downloaded attachment body with its response metadata.
#[derive(Debug, Clone, Default)]
pub struct AttachmentDownload {
    /// Raw file contents.
    pub bytes: Vec<u8>,
    /// `Content-Type` response header.
    pub content_type: String,
    /// `X-Attachment-Metadata` response header, when present.
    pub metadata: Option<String>,
}

/// Fields reported for attachment metadata records.
pub const ATTACHMENT_FIELDS: &[&str] = &[
    "sys_id",
    "file_name",
    "content_type",
    "table_name",
    "table_sys_id",
    "size_bytes",
    "size_compressed",
    "download_link",
    "compressed",
    "image_width",
    "image_height",
    "average_image_color",
    "sys_created_on",
    "sys_created_by",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_include_optional_only_when_set() {
        let mut upload = AttachmentUpload {
            table_name: "incident".to_string(),
            table_sys_id: "abc".to_string(),
            file_name: "log.txt".to_string(),
            content_type: "text/plain".to_string(),
            bytes: b"hi".to_vec(),
            creation_time: None,
            encryption_context: None,
        };
        assert_eq!(upload.query_pairs().len(), 3);

        upload.creation_time = Some("2024-01-01 00:00:00".to_string());
        let pairs = upload.query_pairs();
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[3].0, "creation_time");
    }
}
