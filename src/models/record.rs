//! Table records and request bodies.
//!
//! Records are kept as loose JSON maps. Tools declare which fields they
//! report and [`flatten`] turns whatever the instance returned into a flat
//! object with exactly those keys.

use serde_json::{Map, Value};

/// A ServiceNow record as returned by the Table API.
pub type Record = Map<String, Value>;

/// One page of a list call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPage {
    /// Records on this page.
    pub records: Vec<Record>,
    /// Matches across all pages, from the `X-Total-Count` header.
    pub total_count: Option<u64>,
}

/// Request body for create and update calls.
///
/// Only fields explicitly set end up in the body, so an update never
/// overwrites a column the caller did not mention.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordBody {
    fields: Record,
}

impl RecordBody {
    /// Creates an empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field unconditionally.
    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    /// Sets a field only when a value is present.
    pub fn set_opt<T: Into<Value>>(self, field: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.set(field, v),
            None => self,
        }
    }

    /// Sets a list field as the comma-separated string the Table API expects.
    pub fn set_list(self, field: &str, values: Option<&[String]>) -> Self {
        match values {
            Some(v) => self.set(field, v.join(",")),
            None => self,
        }
    }

    /// Merges arbitrary key/value pairs, overwriting existing keys.
    pub fn merge(mut self, other: Record) -> Self {
        self.fields.extend(other);
        self
    }

    /// Returns true if no field has been set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields set.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns the value set for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Borrows the body as a JSON map.
    pub fn as_record(&self) -> &Record {
        &self.fields
    }

    /// Consumes the body.
    pub fn into_record(self) -> Record {
        self.fields
    }
}

/// Collapses one Table API value to a flat scalar.
///
/// Reference fields come back as `{"value", "display_value", "link"}`
/// objects unless reference links are excluded; those collapse to the
/// display value (or the raw value). `null` becomes `""`.
pub fn scalar(value: &Value) -> Value {
    match value {
        Value::Null => Value::String(String::new()),
        Value::Object(map) => map
            .get("display_value")
            .or_else(|| map.get("value"))
            .map(scalar)
            .unwrap_or_else(|| value.clone()),
        other => other.clone(),
    }
}

/// Builds a flat output object containing exactly `fields`.
///
/// Missing fields are reported as `""`.
pub fn flatten(record: &Record, fields: &[&str]) -> Value {
    let mut out = Map::with_capacity(fields.len());
    for field in fields {
        let value = record
            .get(*field)
            .map(scalar)
            .unwrap_or_else(|| Value::String(String::new()));
        out.insert((*field).to_string(), value);
    }
    Value::Object(out)
}

/// Reads a field as a non-empty string.
///
/// Booleans and numbers are stringified. Reference objects resolve to
/// their raw `value`.
pub fn text(record: &Record, field: &str) -> Option<String> {
    let value = match record.get(field)? {
        Value::Object(map) => map.get("value")?.clone(),
        other => other.clone(),
    };
    let s = match value {
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Reads a field as a boolean (`true`, `"true"`, `"1"`).
pub fn flag(record: &Record, field: &str) -> Option<bool> {
    match text(record, field)?.as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Reads a field as an integer.
pub fn number(record: &Record, field: &str) -> Option<i64> {
    text(record, field)?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_body_only_contains_set_fields() {
        let body = RecordBody::new()
            .set("name", "Intake")
            .set_opt("description", None::<String>)
            .set_opt("order", Some(200));
        assert_eq!(body.len(), 2);
        assert!(body.get("description").is_none());
        assert_eq!(body.get("order"), Some(&json!(200)));
    }

    #[test]
    fn test_set_list_joins_with_comma() {
        let roles = vec!["admin".to_string(), "itil".to_string()];
        let body = RecordBody::new().set_list("roles", Some(&roles));
        assert_eq!(body.get("roles"), Some(&json!("admin,itil")));
    }

    #[test]
    fn test_flatten_collapses_references_and_fills_missing() {
        let rec = record(json!({
            "sys_id": "abc",
            "test": {"value": "t1", "display_value": "Login test", "link": "https://x"},
            "notes": null
        }));
        let flat = flatten(&rec, &["sys_id", "test", "notes", "order"]);
        assert_eq!(
            flat,
            json!({"sys_id": "abc", "test": "Login test", "notes": "", "order": ""})
        );
    }

    #[test]
    fn test_text_prefers_raw_reference_value() {
        let rec = record(json!({"sp_widget": {"value": "w1", "display_value": "Cool"}}));
        assert_eq!(text(&rec, "sp_widget").as_deref(), Some("w1"));
        assert_eq!(text(&rec, "missing"), None);
    }

    #[test]
    fn test_flag_and_number() {
        let rec = record(json!({"active": "true", "public": false, "order": "300"}));
        assert_eq!(flag(&rec, "active"), Some(true));
        assert_eq!(flag(&rec, "public"), Some(false));
        assert_eq!(number(&rec, "order"), Some(300));
        assert_eq!(number(&rec, "active"), None);
    }
}
