//! Generic Table API operations shared by the domain tools.
//!
//! A domain is described by a [`TableSpec`]; the functions here do the
//! request, reshape the result into the domain's flat output fields, and
//! wrap everything in a [`ToolResponse`].

use serde_json::{json, Value};

use super::failure;
use crate::error::SnowError;
use crate::models::{flatten, text, EncodedQuery, Record, RecordBody, TableQuery, ToolResponse};
use crate::snow_client::SnowClient;

/// Describes one ServiceNow table exposed as a tool domain.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    /// Table name (e.g. `sys_atf_step`).
    pub table: &'static str,
    /// Human label used in messages (e.g. `ATF test step`).
    pub label: &'static str,
    /// Plural label.
    pub plural: &'static str,
    /// Key of the array in list results.
    pub collection: &'static str,
    /// Output fields reported for each record.
    pub fields: &'static [&'static str],
    /// Field naming a record in messages.
    pub name_field: &'static str,
    /// Human-readable key that may be used instead of `sys_id`.
    pub alternate_key: Option<&'static str>,
}

impl TableSpec {
    fn display_name(&self, record: &Record) -> String {
        text(record, self.name_field)
            .or_else(|| text(record, "sys_id"))
            .unwrap_or_default()
    }
}

/// Pagination for list tools, passed through to the instance unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// `sysparm_limit`.
    pub limit: u32,
    /// `sysparm_offset`.
    pub offset: u32,
}

impl Page {
    /// Creates a page.
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }
}

/// Starts a clone body with the non-empty raw values of `fields`.
pub(crate) fn copy_fields(source: &Record, fields: &[&str]) -> RecordBody {
    fields.iter().fold(RecordBody::new(), |body, field| {
        body.set_opt(field, text(source, field))
    })
}

fn insert(data: &mut Value, key: &str, value: Value) {
    if let Value::Object(map) = data {
        map.insert(key.to_string(), value);
    }
}

/// Resolves an identifier to a `sys_id`, honouring the alternate key.
pub(crate) async fn resolve_sys_id(
    client: &SnowClient,
    spec: &TableSpec,
    id: &str,
) -> Result<String, SnowError> {
    match spec.alternate_key {
        Some(key) => {
            let record = client
                .find_record(spec.table, key, id, TableQuery::new().with_fields(&["sys_id"]))
                .await?;
            text(&record, "sys_id").ok_or_else(|| SnowError::not_found(id))
        }
        None => Ok(id.to_string()),
    }
}

/// Fetches one record with raw (non-display) values.
pub(crate) async fn fetch_raw(
    client: &SnowClient,
    spec: &TableSpec,
    id: &str,
) -> Result<Record, SnowError> {
    let query = TableQuery::new()
        .with_display_value(false)
        .excluding_reference_links();
    match spec.alternate_key {
        Some(key) => client.find_record(spec.table, key, id, query).await,
        None => client.get_record(spec.table, id, &query).await,
    }
}

/// Creates a record from `body`.
pub async fn create(client: &SnowClient, spec: &TableSpec, body: RecordBody) -> ToolResponse {
    tracing::debug!(table = spec.table, fields = body.len(), "Creating record");

    match client.create_record(spec.table, body.as_record()).await {
        Ok(record) => {
            let name = spec.display_name(&record);
            tracing::info!(table = spec.table, name = %name, "Record created");
            ToolResponse::ok(
                format!("Created {}: {}", spec.label, name),
                flatten(&record, spec.fields),
            )
        }
        Err(e) => failure(client, &format!("Create {}", spec.label), &e),
    }
}

/// Gets one record by `sys_id` (or alternate key) with display values.
pub async fn get(client: &SnowClient, spec: &TableSpec, id: &str) -> ToolResponse {
    let id = id.trim();
    tracing::debug!(table = spec.table, id = %id, "Getting record");

    let query = TableQuery::display(spec.fields);
    let result = match spec.alternate_key {
        Some(key) => client.find_record(spec.table, key, id, query).await,
        None => client.get_record(spec.table, id, &query).await,
    };

    match result {
        Ok(record) => ToolResponse::ok(
            format!("Found {}: {}", spec.label, spec.display_name(&record)),
            flatten(&record, spec.fields),
        ),
        Err(e) => failure(client, &format!("Get {}", spec.label), &e),
    }
}

/// Lists records matching `filter`.
///
/// `data` carries the flattened rows under the domain's collection key,
/// plus `count`, `limit` and `offset`. `total` is the instance's
/// `X-Total-Count` when it sends one, else the page length.
pub async fn list(
    client: &SnowClient,
    spec: &TableSpec,
    page: Page,
    filter: EncodedQuery,
) -> ToolResponse {
    tracing::debug!(
        table = spec.table,
        limit = page.limit,
        offset = page.offset,
        query = ?filter.build(),
        "Listing records"
    );

    let query = TableQuery::display(spec.fields)
        .with_limit(page.limit)
        .with_offset(page.offset)
        .with_query(&filter);

    match client.list_page(spec.table, &query).await {
        Ok(found) => {
            let rows: Vec<Value> = found
                .records
                .iter()
                .map(|r| flatten(r, spec.fields))
                .collect();
            let total = found.total_count.unwrap_or(rows.len() as u64);
            let mut data = json!({
                "total": total,
                "count": rows.len(),
                "limit": page.limit,
                "offset": page.offset,
            });
            let message = format!("Found {} {}", rows.len(), spec.plural);
            insert(&mut data, spec.collection, Value::Array(rows));
            ToolResponse::ok(message, data)
        }
        Err(e) => failure(client, &format!("List {}", spec.plural), &e),
    }
}

/// Patches the fields set in `body`.
///
/// An empty body is rejected without contacting the instance.
pub async fn update(
    client: &SnowClient,
    spec: &TableSpec,
    id: &str,
    body: RecordBody,
) -> ToolResponse {
    let operation = format!("Update {}", spec.label);
    if body.is_empty() {
        return failure(
            client,
            &operation,
            &SnowError::validation("no fields to update"),
        );
    }

    let id = id.trim();
    tracing::debug!(table = spec.table, id = %id, fields = body.len(), "Updating record");

    let result = async {
        let sys_id = resolve_sys_id(client, spec, id).await?;
        client
            .update_record(spec.table, &sys_id, body.as_record())
            .await
    }
    .await;

    match result {
        Ok(record) => ToolResponse::ok(
            format!("Updated {}: {}", spec.label, spec.display_name(&record)),
            flatten(&record, spec.fields),
        ),
        Err(e) => failure(client, &operation, &e),
    }
}

/// Deletes one record.
pub async fn delete(client: &SnowClient, spec: &TableSpec, id: &str) -> ToolResponse {
    let id = id.trim();
    tracing::debug!(table = spec.table, id = %id, "Deleting record");

    let result = async {
        let sys_id = resolve_sys_id(client, spec, id).await?;
        client.delete_record(spec.table, &sys_id).await?;
        Ok::<_, SnowError>(sys_id)
    }
    .await;

    match result {
        Ok(sys_id) => {
            tracing::info!(table = spec.table, sys_id = %sys_id, "Record deleted");
            ToolResponse::ok(
                format!("Deleted {}: {}", spec.label, sys_id),
                json!({ "deleted_sys_id": sys_id }),
            )
        }
        Err(e) => failure(client, &format!("Delete {}", spec.label), &e),
    }
}

/// Copies a record.
///
/// The source is read with raw values so references copy as `sys_id`s;
/// `build` picks the fields for the new record. `data.cloned_from` names
/// the source `sys_id`.
pub async fn clone_record<F>(
    client: &SnowClient,
    spec: &TableSpec,
    source_id: &str,
    build: F,
) -> ToolResponse
where
    F: FnOnce(&Record) -> Result<RecordBody, SnowError>,
{
    let source_id = source_id.trim();
    tracing::debug!(table = spec.table, source = %source_id, "Cloning record");

    let result = async {
        let source = fetch_raw(client, spec, source_id).await?;
        let body = build(&source)?;
        let created = client.create_record(spec.table, body.as_record()).await?;
        Ok::<_, SnowError>((source, created))
    }
    .await;

    match result {
        Ok((source, created)) => {
            let mut data = flatten(&created, spec.fields);
            let source_sys_id = text(&source, "sys_id").unwrap_or_else(|| source_id.to_string());
            insert(&mut data, "cloned_from", Value::String(source_sys_id));
            ToolResponse::ok(
                format!(
                    "Cloned {} {} to {}",
                    spec.label,
                    spec.display_name(&source),
                    spec.display_name(&created)
                ),
                data,
            )
        }
        Err(e) => failure(client, &format!("Clone {}", spec.label), &e),
    }
}

/// How a domain numbers its records when reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sequence {
    /// Field holding the position (`order`, `sequence`).
    pub field: &'static str,
    /// Value written for the first id.
    pub first: i64,
    /// Gap between consecutive ids.
    pub step: i64,
    /// Keep going after a failed update instead of stopping.
    pub attempt_all: bool,
}

impl Sequence {
    /// 100, 200, 300... stopping at the first failure.
    pub const HUNDREDS: Sequence = Sequence {
        field: "order",
        first: 100,
        step: 100,
        attempt_all: false,
    };

    /// 1, 2, 3... attempting every id.
    pub const CONSECUTIVE: Sequence = Sequence {
        field: "order",
        first: 1,
        step: 1,
        attempt_all: true,
    };

    /// 10, 20, 30... attempting every id.
    pub const TENS: Sequence = Sequence {
        field: "order",
        first: 10,
        step: 10,
        attempt_all: true,
    };

    /// Same numbering on another field.
    pub const fn on(self, field: &'static str) -> Sequence {
        Sequence { field, ..self }
    }

    /// Stop at the first failed update.
    pub const fn stopping(self) -> Sequence {
        Sequence {
            attempt_all: false,
            ..self
        }
    }

    fn position(&self, index: usize) -> i64 {
        self.first + index as i64 * self.step
    }
}

/// Rewrites the position field of each record following `ids`.
///
/// With [`Sequence::attempt_all`] every id is tried and failures are
/// collected; otherwise the first failure ends the call. Either way the
/// envelope reports what was already reordered.
pub async fn reorder(
    client: &SnowClient,
    spec: &TableSpec,
    sequence: Sequence,
    parent: &str,
    ids: &[String],
) -> ToolResponse {
    tracing::debug!(
        table = spec.table,
        parent = %parent,
        count = ids.len(),
        field = sequence.field,
        "Reordering records"
    );

    let mut reordered = Vec::with_capacity(ids.len());
    let mut failed = Vec::new();
    let mut problems = Vec::new();
    for (index, id) in ids.iter().enumerate() {
        let id = id.trim();
        let position = sequence.position(index);
        let body = RecordBody::new().set(sequence.field, position);

        if let Err(e) = client.update_record(spec.table, id, body.as_record()).await {
            let sanitized = client.sanitize_error(&e);
            if !sequence.attempt_all {
                tracing::error!(table = spec.table, sys_id = %id, error = %sanitized, "Reorder stopped");
                return ToolResponse::failure_with(
                    format!("Reorder {} failed at {}: {}", spec.plural, id, sanitized),
                    json!({ "reordered": reordered, "failed_sys_id": id }),
                );
            }
            tracing::warn!(table = spec.table, sys_id = %id, error = %sanitized, "Reorder entry failed");
            problems.push(format!("{}: {}", id, sanitized));
            failed.push(json!({ "sys_id": id, "error": sanitized }));
            continue;
        }
        let mut entry = json!({ "sys_id": id });
        insert(&mut entry, sequence.field, json!(position));
        reordered.push(entry);
    }

    if failed.is_empty() {
        return ToolResponse::ok(
            format!("Reordered {} {}", reordered.len(), spec.plural),
            json!({ "parent": parent, "reordered": reordered }),
        );
    }

    ToolResponse::failure_with(
        format!(
            "Reorder {} failed: only {} of {} were reordered ({})",
            spec.plural,
            reordered.len(),
            ids.len(),
            problems.join("; ")
        ),
        json!({ "parent": parent, "reordered": reordered, "failed": failed }),
    )
}

/// Applies the same patch to several records.
///
/// Every id is attempted. Succeeds only when none failed.
pub async fn bulk_update(
    client: &SnowClient,
    spec: &TableSpec,
    ids: &[String],
    body: RecordBody,
) -> ToolResponse {
    let operation = format!("Bulk update {}", spec.plural);
    if body.is_empty() {
        return failure(client, &operation, &SnowError::validation("no fields to update"));
    }
    if ids.is_empty() {
        return failure(client, &operation, &SnowError::validation("no ids given"));
    }

    let mut updated = Vec::new();
    let mut failed = Vec::new();
    for id in ids {
        let id = id.trim();
        match client.update_record(spec.table, id, body.as_record()).await {
            Ok(_) => updated.push(Value::String(id.to_string())),
            Err(e) => {
                let sanitized = client.sanitize_error(&e);
                tracing::warn!(table = spec.table, sys_id = %id, error = %sanitized, "Bulk update entry failed");
                failed.push(json!({ "sys_id": id, "error": sanitized }));
            }
        }
    }

    let data = json!({
        "updated_count": updated.len(),
        "failed_count": failed.len(),
        "updated": updated,
        "failed": failed,
    });
    let message = format!(
        "Updated {} of {} {}",
        updated.len(),
        ids.len(),
        spec.plural
    );
    if failed.is_empty() {
        ToolResponse::ok(message, data)
    } else {
        ToolResponse::failure_with(format!("{} failed: {}", operation, message), data)
    }
}

/// Sys_ids of every record matching `filter`, at most `limit`.
pub(crate) async fn matching_ids(
    client: &SnowClient,
    spec: &TableSpec,
    filter: &EncodedQuery,
    limit: u32,
) -> Result<Vec<String>, SnowError> {
    let query = TableQuery::new()
        .with_fields(&["sys_id"])
        .with_limit(limit)
        .with_query(filter);
    let records = client.list_records(spec.table, &query).await?;
    Ok(records.iter().filter_map(|r| text(r, "sys_id")).collect())
}

/// Gets the first record matching `filter`, with display values.
///
/// For rows addressed by a compound key (e.g. table + element).
pub async fn get_matching(
    client: &SnowClient,
    spec: &TableSpec,
    filter: EncodedQuery,
    described: &str,
) -> ToolResponse {
    tracing::debug!(table = spec.table, query = ?filter.build(), "Getting matching record");

    let query = TableQuery::display(spec.fields)
        .with_query(&filter)
        .with_limit(1);
    let result = client.list_records(spec.table, &query).await.and_then(|rows| {
        rows.into_iter()
            .next()
            .ok_or_else(|| SnowError::not_found(described))
    });

    match result {
        Ok(record) => ToolResponse::ok(
            format!("Found {}: {}", spec.label, spec.display_name(&record)),
            flatten(&record, spec.fields),
        ),
        Err(e) => failure(client, &format!("Get {}", spec.label), &e),
    }
}

/// Patches the first record matching `filter`.
pub async fn update_matching(
    client: &SnowClient,
    spec: &TableSpec,
    filter: EncodedQuery,
    described: &str,
    body: RecordBody,
) -> ToolResponse {
    let operation = format!("Update {}", spec.label);
    if body.is_empty() {
        return failure(
            client,
            &operation,
            &SnowError::validation("no fields to update"),
        );
    }
    tracing::debug!(table = spec.table, query = ?filter.build(), fields = body.len(), "Updating matching record");

    let result = async {
        let sys_id = matching_ids(client, spec, &filter, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SnowError::not_found(described))?;
        client
            .update_record(spec.table, &sys_id, body.as_record())
            .await
    }
    .await;

    match result {
        Ok(record) => ToolResponse::ok(
            format!("Updated {}: {}", spec.label, spec.display_name(&record)),
            flatten(&record, spec.fields),
        ),
        Err(e) => failure(client, &operation, &e),
    }
}

async fn delete_first(
    client: &SnowClient,
    spec: &TableSpec,
    filter: &EncodedQuery,
    described: &str,
) -> Result<String, SnowError> {
    let sys_id = matching_ids(client, spec, filter, 1)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| SnowError::not_found(described))?;
    client.delete_record(spec.table, &sys_id).await?;
    Ok(sys_id)
}

/// Deletes the first record matching `filter`.
///
/// Used for relationship rows addressed by their two ends rather than by
/// `sys_id`. `described` names the pair in the not-found error.
pub async fn delete_matching(
    client: &SnowClient,
    spec: &TableSpec,
    filter: EncodedQuery,
    described: &str,
) -> ToolResponse {
    tracing::debug!(table = spec.table, query = ?filter.build(), "Deleting matching record");

    match delete_first(client, spec, &filter, described).await {
        Ok(sys_id) => {
            tracing::info!(table = spec.table, sys_id = %sys_id, "Record deleted");
            ToolResponse::ok(
                format!("Deleted {}: {}", spec.label, sys_id),
                json!({ "deleted_sys_id": sys_id }),
            )
        }
        Err(e) => failure(client, &format!("Delete {}", spec.label), &e),
    }
}

/// Deletes the first record matching each `(filter, described)` target.
///
/// Every target is attempted. Succeeds only when none failed.
pub async fn delete_each(
    client: &SnowClient,
    spec: &TableSpec,
    targets: Vec<(EncodedQuery, String)>,
) -> ToolResponse {
    let operation = format!("Bulk delete {}", spec.plural);
    if targets.is_empty() {
        return failure(client, &operation, &SnowError::validation("nothing to delete"));
    }

    let total = targets.len();
    let mut deleted = Vec::new();
    let mut failed = Vec::new();
    for (filter, described) in targets {
        match delete_first(client, spec, &filter, &described).await {
            Ok(sys_id) => deleted.push(Value::String(sys_id)),
            Err(e) => {
                let sanitized = client.sanitize_error(&e);
                tracing::warn!(table = spec.table, target = %described, error = %sanitized, "Bulk delete entry failed");
                failed.push(json!({ "target": described, "error": sanitized }));
            }
        }
    }

    let message = format!("Deleted {} of {} {}", deleted.len(), total, spec.plural);
    let data = json!({
        "deleted_count": deleted.len(),
        "failed_count": failed.len(),
        "deleted": deleted,
        "failed": failed,
    });
    if failed.is_empty() {
        ToolResponse::ok(message, data)
    } else {
        ToolResponse::failure_with(format!("{} failed: {}", operation, message), data)
    }
}

/// Creates one record per body.
///
/// Every body is attempted. Succeeds only when none failed; `failed`
/// entries carry the body's position in the input.
pub async fn create_each(
    client: &SnowClient,
    spec: &TableSpec,
    bodies: Vec<RecordBody>,
) -> ToolResponse {
    let operation = format!("Bulk create {}", spec.plural);
    if bodies.is_empty() {
        return failure(client, &operation, &SnowError::validation("nothing to create"));
    }

    let total = bodies.len();
    let mut created = Vec::new();
    let mut failed = Vec::new();
    for (index, body) in bodies.into_iter().enumerate() {
        match client.create_record(spec.table, body.as_record()).await {
            Ok(record) => created.push(flatten(&record, spec.fields)),
            Err(e) => {
                let sanitized = client.sanitize_error(&e);
                tracing::warn!(table = spec.table, index = index, error = %sanitized, "Bulk create entry failed");
                failed.push(json!({ "index": index, "error": sanitized }));
            }
        }
    }

    let message = format!("Created {} of {} {}", created.len(), total, spec.plural);
    let clean = failed.is_empty();
    let mut data = json!({
        "created_count": created.len(),
        "failed_count": failed.len(),
        "failed": failed,
    });
    insert(&mut data, spec.collection, Value::Array(created));
    if clean {
        ToolResponse::ok(message, data)
    } else {
        ToolResponse::failure_with(format!("{} failed: {}", operation, message), data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, Config};

    const SPEC: TableSpec = TableSpec {
        table: "taxonomy",
        label: "taxonomy",
        plural: "taxonomies",
        collection: "taxonomies",
        fields: &["sys_id", "name"],
        name_field: "name",
        alternate_key: None,
    };

    fn offline_client() -> SnowClient {
        let config = Config::new(
            "http://127.0.0.1:9",
            AuthConfig::OAuth {
                token: "tok-offline".to_string(),
            },
        )
        .unwrap();
        SnowClient::new(&config).unwrap()
    }

    #[test]
    fn test_display_name_falls_back_to_sys_id() {
        let record = serde_json::json!({"sys_id": "abc"})
            .as_object()
            .cloned()
            .unwrap();
        assert_eq!(SPEC.display_name(&record), "abc");
    }

    #[test]
    fn test_sequence_positions() {
        assert_eq!(Sequence::HUNDREDS.position(2), 300);
        assert_eq!(Sequence::CONSECUTIVE.position(0), 1);
        assert_eq!(Sequence::TENS.position(3), 40);

        let choices = Sequence::TENS.on("sequence").stopping();
        assert_eq!(choices.field, "sequence");
        assert!(!choices.attempt_all);
    }

    #[tokio::test]
    async fn test_update_with_empty_body_fails_without_request() {
        let response = update(&offline_client(), &SPEC, "abc", RecordBody::new()).await;
        assert!(!response.success);
        assert_eq!(
            response.message,
            "Update taxonomy failed: validation error: no fields to update"
        );
    }

    #[tokio::test]
    async fn test_bulk_update_requires_ids() {
        let body = RecordBody::new().set("active", false);
        let response = bulk_update(&offline_client(), &SPEC, &[], body).await;
        assert!(!response.success);
        assert!(response.message.contains("no ids given"));
    }

    #[tokio::test]
    async fn test_get_rejects_unsafe_id() {
        let response = get(&offline_client(), &SPEC, "../sys_user").await;
        assert!(!response.success);
        assert!(response.message.starts_with("Get taxonomy failed: validation error"));
    }
}
