//! Common types shared across Table API models.
//!
//! This module defines the `result` wrapper the Table API puts around
//! every payload, the ServiceNow error document, and the `ToolResponse`
//! envelope every tool returns.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wrapper for Table API responses.
///
/// Every Table API and Attachment API response carries its payload under
/// a top-level `result` key, either an object or an array.
#[derive(Debug, Clone, Deserialize)]
pub struct TableResult<T> {
    /// The actual response payload.
    pub result: T,
}

/// Error document returned by the instance on failure.
///
/// ```json
/// {"error": {"message": "No Record found", "detail": "..."}, "status": "failure"}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// The error block.
    pub error: ApiErrorDetail,

    /// Usually `"failure"`.
    #[serde(default)]
    pub status: Option<String>,
}

/// The `error` block of an [`ApiErrorBody`].
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    /// Short message.
    #[serde(default)]
    pub message: String,

    /// Longer explanation, often null.
    #[serde(default)]
    pub detail: Option<String>,
}

/// Uniform result envelope returned by every tool.
///
/// Tools never raise: transport and API failures are folded into
/// `success: false` with a `"<Operation> failed: <error>"` message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Whether the operation succeeded.
    pub success: bool,

    /// Human-readable summary.
    pub message: String,

    /// Operation payload, if any.
    #[serde(default)]
    pub data: Option<Value>,
}

impl ToolResponse {
    /// A successful response carrying `data`.
    pub fn ok(message: impl Into<String>, data: Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// A failed response without payload.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    /// A failed response that still reports partial progress.
    pub fn failure_with(message: impl Into<String>, data: Value) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Renders the envelope as pretty JSON for the MCP text content.
    pub fn render(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            format!(
                "{{\"success\": false, \"message\": \"response rendering failed: {}\", \"data\": null}}",
                e
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_result_object() {
        let parsed: TableResult<Value> =
            serde_json::from_str(r#"{"result": {"sys_id": "abc"}}"#).unwrap();
        assert_eq!(parsed.result["sys_id"], "abc");
    }

    #[test]
    fn test_api_error_body() {
        let parsed: ApiErrorBody = serde_json::from_str(
            r#"{"error": {"message": "No Record found", "detail": null}, "status": "failure"}"#,
        )
        .unwrap();
        assert_eq!(parsed.error.message, "No Record found");
        assert!(parsed.error.detail.is_none());
        assert_eq!(parsed.status.as_deref(), Some("failure"));
    }

    #[test]
    fn test_tool_response_render_round_trip() {
        let response = ToolResponse::ok("Created", json!({"sys_id": "1"}));
        let rendered = response.render();
        let back: ToolResponse = serde_json::from_str(&rendered).unwrap();
        assert_eq!(back, response);
    }

    #[test]
    fn test_failure_has_no_data() {
        let response = ToolResponse::failure("Get topic failed: record not found: x");
        assert!(!response.success);
        assert!(response.data.is_none());
        assert!(response.render().contains("\"data\": null"));
    }
}
