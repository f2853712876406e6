//! HTTP client for the ServiceNow REST API.
//!
//! This module provides the `SnowClient` struct for making authenticated
//! requests to the Table, Attachment and impersonation endpoints of a
//! ServiceNow instance.
//!
//! # Retry Logic
//!
//! Idempotent requests (GET, PATCH, PUT, DELETE) are retried on transient
//! failures:
//! - HTTP 429 (rate limit): `Retry-After` or exponential backoff from 100ms
//! - HTTP 502/503/504: retry after 500ms
//! - Timeouts: retry after a short delay
//!
//! POST is sent exactly once, since a replay could create a duplicate record.
//!
//! # Session
//!
//! All clones of a `SnowClient` share one [`Session`]: the connection pool,
//! the cookie jar (so role impersonation sticks) and a set of extra headers
//! that [`SnowClient::configure_session`] can change at runtime.
//!
//! # Security
//!
//! Credentials are never logged. All error messages are sanitized before
//! logging.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::auth::AuthProvider;
use crate::config::Config;
use crate::error::SnowError;
use crate::models::{
    ApiErrorBody, AttachmentDownload, AttachmentUpload, EncodedQuery, Record, RecordPage,
    TableQuery, TableResult,
};

/// Prefix of every REST endpoint on the instance.
const API_PREFIX: &str = "/api/now";

/// Accept header for JSON endpoints.
const JSON: &str = "application/json";

/// Header carrying the total number of matches for a list call.
const TOTAL_COUNT: &str = "x-total-count";

/// Maximum number of attempts for idempotent requests.
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Initial delay for exponential backoff (milliseconds).
const INITIAL_BACKOFF_MS: u64 = 100;

/// Delay before retrying after server error (milliseconds).
const SERVER_ERROR_DELAY_MS: u64 = 500;

/// Maximum length for HTTP error response bodies.
const MAX_ERROR_BODY_LEN: usize = 500;

/// Longest identifier accepted as a URL path segment.
const MAX_SEGMENT_LEN: usize = 100;

/// Shared HTTP state used by every tool call.
///
/// Holds the pooled `reqwest::Client` (with its cookie jar) and the extra
/// default headers. Header updates take a write lock, so concurrent tool
/// calls always see a consistent set.
#[derive(Debug)]
pub struct Session {
    http: Client,
    headers: RwLock<HeaderMap>,
}

impl Session {
    fn new(http: Client) -> Self {
        Self {
            http,
            headers: RwLock::new(HeaderMap::new()),
        }
    }

    /// The underlying pooled HTTP client.
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Snapshot of the extra headers applied to every request.
    pub fn headers(&self) -> HeaderMap {
        self.headers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn apply(&self, options: ParsedOptions) {
        let mut headers = self
            .headers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if options.clear {
            headers.clear();
        }
        for name in options.remove {
            headers.remove(&name);
        }
        for (name, value) in options.set {
            headers.insert(name, value);
        }
    }
}

/// Changes to the shared session, applied atomically by
/// [`SnowClient::configure_session`].
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    headers: BTreeMap<String, String>,
    remove: Vec<String>,
    clear: bool,
}

impl SessionOptions {
    /// Creates an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets (or replaces) a default header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Removes a default header.
    pub fn remove(mut self, name: impl Into<String>) -> Self {
        self.remove.push(name.into());
        self
    }

    /// Drops all previously configured headers before applying the rest.
    pub fn clear(mut self) -> Self {
        self.clear = true;
        self
    }

    fn parse(self) -> Result<ParsedOptions, SnowError> {
        let header_name = |name: &str| {
            HeaderName::from_bytes(name.trim().as_bytes())
                .map_err(|_| SnowError::validation(format!("invalid header name: {:?}", name)))
        };

        let mut set = Vec::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let value = HeaderValue::from_str(value).map_err(|_| {
                SnowError::validation(format!("invalid value for header {:?}", name))
            })?;
            set.push((header_name(name)?, value));
        }
        let remove = self
            .remove
            .iter()
            .map(|n| header_name(n))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ParsedOptions {
            set,
            remove,
            clear: self.clear,
        })
    }
}

struct ParsedOptions {
    set: Vec<(HeaderName, HeaderValue)>,
    remove: Vec<HeaderName>,
    clear: bool,
}

/// Request body variants the client can send.
enum Payload<'a> {
    Empty,
    Json(&'a Value),
    Bytes {
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

/// HTTP client for the ServiceNow REST API.
///
/// Handles authentication, request formatting, and response parsing.
/// Cloning is cheap and every clone shares the same [`Session`].
///
/// # Example
///
/// ```ignore
/// let config = Config::from_env()?;
/// let client = SnowClient::new(&config)?;
///
/// let steps = client
///     .list_records("sys_atf_step", &TableQuery::new().with_limit(10))
///     .await?;
/// ```
#[derive(Clone)]
pub struct SnowClient {
    session: Arc<Session>,

    /// Instance URL without trailing slash (e.g., `https://dev1.service-now.com`).
    base_url: String,

    /// SECURITY: holds the credentials, never log it.
    auth: AuthProvider,

    timeout: Duration,
}

impl std::fmt::Debug for SnowClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnowClient")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SnowClient {
    /// Creates a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `SnowError::HttpClient` if the HTTP client fails to initialize
    /// and `SnowError::Config` if the credentials cannot be encoded.
    pub fn new(config: &Config) -> Result<Self, SnowError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .cookie_store(true)
            .user_agent(concat!("snow-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SnowError::HttpClient)?;

        Ok(Self {
            session: Arc::new(Session::new(http)),
            base_url: config.instance_url.trim_end_matches('/').to_string(),
            auth: AuthProvider::new(&config.auth)?,
            timeout: config.timeout,
        })
    }

    /// The shared session (connection pool, cookies, default headers).
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Applies header changes to the shared session.
    ///
    /// Every clone of this client sees the new headers on its next request.
    ///
    /// # Errors
    ///
    /// Returns `SnowError::Validation` if a header name or value is invalid;
    /// in that case nothing is changed.
    pub fn configure_session(&self, options: SessionOptions) -> Result<(), SnowError> {
        let parsed = options.parse()?;
        tracing::debug!(
            set = parsed.set.len(),
            removed = parsed.remove.len(),
            clear = parsed.clear,
            "Updating session headers"
        );
        self.session.apply(parsed);
        Ok(())
    }

    /// The configured instance URL.
    pub fn instance_url(&self) -> &str {
        &self.base_url
    }

    /// Sanitizes an error for logging or returning to the caller.
    pub fn sanitize_error(&self, error: &SnowError) -> String {
        error.sanitized_display(&self.auth.secrets())
    }

    /// Validates an identifier before it is interpolated into a URL path.
    ///
    /// Table names and `sys_id`s are made of ASCII letters, digits and `_`.
    /// `-` is accepted for portal page ids. Anything else (`/`, `.`, `?`,
    /// whitespace) is rejected to prevent path traversal.
    ///
    /// # Errors
    ///
    /// Returns `SnowError::Validation` if the value is empty, too long, or
    /// contains other characters.
    pub fn validate_segment(value: &str, field_name: &str) -> Result<(), SnowError> {
        let ok = !value.is_empty()
            && value.len() <= MAX_SEGMENT_LEN
            && value
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if !ok {
            return Err(SnowError::validation(format!(
                "{} must be a non-empty identifier of letters, digits or '_', got: {:?}",
                field_name,
                value.chars().take(50).collect::<String>()
            )));
        }
        Ok(())
    }

    /// Returns the web URL for viewing a record in the instance UI.
    pub fn record_web_url(&self, table: &str, sys_id: &str) -> String {
        let target = format!("{}.do?sys_id={}", table, sys_id);
        format!(
            "{}/nav_to.do?uri={}",
            self.base_url,
            urlencoding::encode(&target)
        )
    }

    /// Tests connectivity to the instance.
    ///
    /// Reads a single `sys_user` row to verify the instance is reachable
    /// and the credentials are accepted.
    ///
    /// # Errors
    ///
    /// Returns `SnowError::ConnectionTest` with details about the failure.
    pub async fn test_connection(&self) -> Result<(), SnowError> {
        tracing::debug!("Testing connection to ServiceNow instance");

        let query = TableQuery::new().with_limit(1).with_fields(&["sys_id"]);
        match self.list_records("sys_user", &query).await {
            Ok(_) => {
                tracing::info!("Connection test successful");
                Ok(())
            }
            Err(SnowError::Authentication) => Err(SnowError::connection_test(format!(
                "Authentication failed - verify the {} credentials",
                self.auth.scheme_name()
            ))),
            Err(SnowError::Timeout { duration, .. }) => Err(SnowError::connection_test(format!(
                "Connection timed out after {:?} - verify SERVICENOW_INSTANCE_URL is correct and the instance is reachable",
                duration
            ))),
            Err(SnowError::Http(e)) => {
                let message = self.sanitize_error(&SnowError::Http(e));
                Err(SnowError::connection_test(format!(
                    "{} - verify SERVICENOW_INSTANCE_URL is correct",
                    message
                )))
            }
            Err(e) => Err(SnowError::connection_test(self.sanitize_error(&e))),
        }
    }

    // ========================================================================
    // Request plumbing
    // ========================================================================

    /// Executes an operation with retry logic for transient failures.
    ///
    /// Retries on:
    /// - HTTP 429 (rate limit) with exponential backoff
    /// - HTTP 502/503/504 with fixed delay
    /// - Timeouts with fixed delay
    ///
    /// Does not retry on client errors (4xx except 429).
    async fn with_retry<T, F, Fut>(&self, operation: &str, f: F) -> Result<T, SnowError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, SnowError>>,
    {
        let mut delay = Duration::from_millis(INITIAL_BACKOFF_MS);
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            match f().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempts < MAX_RETRY_ATTEMPTS => {
                    let actual_delay = if e.is_rate_limit() {
                        e.retry_after().unwrap_or(delay)
                    } else if matches!(e, SnowError::ServiceUnavailable { .. }) {
                        Duration::from_millis(SERVER_ERROR_DELAY_MS)
                    } else {
                        e.retry_after().unwrap_or(delay)
                    };

                    tracing::debug!(
                        operation = operation,
                        attempt = attempts,
                        max_attempts = MAX_RETRY_ATTEMPTS,
                        delay_ms = actual_delay.as_millis() as u64,
                        error = %self.sanitize_error(&e),
                        "Retrying after transient error"
                    );

                    tokio::time::sleep(actual_delay).await;

                    if e.is_rate_limit() {
                        delay *= 2;
                    }
                }
                Err(e) => {
                    if attempts > 1 {
                        tracing::debug!(
                            operation = operation,
                            attempts = attempts,
                            "All retry attempts exhausted"
                        );
                    }
                    return Err(e);
                }
            }
        }
    }

    /// Returns true for methods that are safe to replay.
    fn is_idempotent(method: &Method) -> bool {
        matches!(
            *method,
            Method::GET | Method::PATCH | Method::PUT | Method::DELETE
        )
    }

    /// Starts a request with session headers and credentials attached.
    fn build(&self, method: Method, path: &str, accept: &str) -> RequestBuilder {
        let url = format!("{}{}{}", self.base_url, API_PREFIX, path);
        let request = self
            .session
            .http
            .request(method, url)
            .header(ACCEPT, accept)
            .headers(self.session.headers());
        self.auth.apply(request)
    }

    /// Sends one request without retry.
    async fn send_once(
        &self,
        method: &Method,
        path: &str,
        query: &[(&'static str, String)],
        payload: &Payload<'_>,
        accept: &str,
    ) -> Result<Response, SnowError> {
        tracing::debug!(method = %method, path = %path, "Making ServiceNow API request");

        let mut request = self.build(method.clone(), path, accept);
        if !query.is_empty() {
            request = request.query(query);
        }
        request = match payload {
            Payload::Empty => request,
            Payload::Json(body) => request.json(body),
            Payload::Bytes {
                content_type,
                bytes,
            } => request.header(CONTENT_TYPE, *content_type).body(bytes.to_vec()),
        };

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(e, method, path))?;
        self.check(response, path).await
    }

    /// Sends a request, retrying only when the method is idempotent.
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        payload: Payload<'_>,
        accept: &str,
    ) -> Result<Response, SnowError> {
        if Self::is_idempotent(&method) {
            let operation = format!("{} {}", method, path);
            let (method, payload) = (&method, &payload);
            self.with_retry(&operation, move || {
                self.send_once(method, path, query, payload, accept)
            })
            .await
        } else {
            self.send_once(&method, path, query, &payload, accept).await
        }
    }

    /// Maps a transport failure, distinguishing timeouts.
    fn transport_error(&self, e: reqwest::Error, method: &Method, path: &str) -> SnowError {
        if e.is_timeout() {
            return SnowError::timeout(self.timeout, format!("{} {}", method, path));
        }
        SnowError::Http(e)
    }

    /// Passes successful responses through, converts the rest to errors.
    async fn check(&self, response: Response, path: &str) -> Result<Response, SnowError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(self.handle_http_error(status, response, path).await)
        }
    }

    /// Handles HTTP-level errors and converts to SnowError.
    ///
    /// Classifies errors into specific types for proper retry handling and
    /// extracts the ServiceNow error document when there is one.
    async fn handle_http_error(
        &self,
        status: StatusCode,
        response: Response,
        path: &str,
    ) -> SnowError {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        let body = response.text().await.unwrap_or_default();
        let body = self.truncate_body(&body);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SnowError::Authentication,
            StatusCode::NOT_FOUND => SnowError::NotFound {
                id: path.to_string(),
            },
            StatusCode::TOO_MANY_REQUESTS => {
                tracing::warn!("Rate limited by ServiceNow instance");
                SnowError::RateLimited { retry_after }
            }
            StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => {
                tracing::warn!(status = %status, "ServiceNow instance temporarily unavailable");
                SnowError::ServiceUnavailable { status }
            }
            _ => match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(doc) if !doc.error.message.is_empty() => SnowError::Api {
                    status,
                    message: doc.error.message,
                    detail: doc.error.detail.filter(|d| !d.is_empty()),
                },
                _ => SnowError::HttpStatus { status, body },
            },
        }
    }

    /// Sanitizes and truncates a response body for inclusion in errors.
    fn truncate_body(&self, body: &str) -> String {
        let body = SnowError::sanitize_message(body, &self.auth.secrets());
        if body.len() > MAX_ERROR_BODY_LEN {
            let mut end = MAX_ERROR_BODY_LEN;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...[truncated]", &body[..end])
        } else {
            body
        }
    }

    /// Reads and parses a JSON response body.
    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, SnowError> {
        let body = response.text().await.map_err(SnowError::Http)?;
        tracing::trace!(body = %body, "ServiceNow API response");
        serde_json::from_str(&body).map_err(SnowError::Serialization)
    }

    /// Rewrites a path-based NotFound into one naming the identifier.
    fn not_found_as(id: &str) -> impl FnOnce(SnowError) -> SnowError + '_ {
        move |e| match e {
            SnowError::NotFound { .. } => SnowError::not_found(id),
            other => other,
        }
    }

    // ========================================================================
    // Table API
    // ========================================================================

    /// Lists records of a table.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let query = TableQuery::display(&["sys_id", "name"])
    ///     .with_limit(10)
    ///     .with_query(&EncodedQuery::new().flag("active", Some(true)));
    /// let rows = client.list_records("taxonomy", &query).await?;
    /// ```
    pub async fn list_records(
        &self,
        table: &str,
        query: &TableQuery,
    ) -> Result<Vec<Record>, SnowError> {
        self.list_page(table, query).await.map(|page| page.records)
    }

    /// Lists records of a table along with the instance's total match count.
    pub async fn list_page(&self, table: &str, query: &TableQuery) -> Result<RecordPage, SnowError> {
        Self::validate_segment(table, "table")?;
        let path = format!("/table/{}", table);
        let response = self
            .send(Method::GET, &path, &query.to_pairs(), Payload::Empty, JSON)
            .await?;
        let total_count = response
            .headers()
            .get(TOTAL_COUNT)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok());
        let parsed: TableResult<Vec<Record>> = Self::parse(response).await?;
        Ok(RecordPage {
            records: parsed.result,
            total_count,
        })
    }

    /// Gets a single record by `sys_id`.
    ///
    /// # Errors
    ///
    /// Returns `SnowError::NotFound` if the record doesn't exist.
    pub async fn get_record(
        &self,
        table: &str,
        sys_id: &str,
        query: &TableQuery,
    ) -> Result<Record, SnowError> {
        Self::validate_segment(table, "table")?;
        Self::validate_segment(sys_id, "sys_id")?;
        let path = format!("/table/{}/{}", table, sys_id);
        let response = self
            .send(Method::GET, &path, &query.to_pairs(), Payload::Empty, JSON)
            .await
            .map_err(Self::not_found_as(sys_id))?;
        let parsed: TableResult<Record> = Self::parse(response).await?;
        Ok(parsed.result)
    }

    /// Finds one record whose `key_field` or `sys_id` equals `key`.
    ///
    /// Used for tables whose records are usually addressed by a
    /// human-readable id (e.g. portal pages).
    ///
    /// # Errors
    ///
    /// Returns `SnowError::NotFound` if nothing matches.
    pub async fn find_record(
        &self,
        table: &str,
        key_field: &str,
        key: &str,
        query: TableQuery,
    ) -> Result<Record, SnowError> {
        Self::validate_segment(key, key_field)?;
        let filter = EncodedQuery::new().raw(Some(&format!(
            "{}={}^ORsys_id={}",
            key_field, key, key
        )));
        let query = query.with_query(&filter).with_limit(1);
        self.list_records(table, &query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SnowError::not_found(key))
    }

    /// Creates a record and returns it as stored by the instance.
    pub async fn create_record(&self, table: &str, body: &Record) -> Result<Record, SnowError> {
        Self::validate_segment(table, "table")?;
        let path = format!("/table/{}", table);
        let body = Value::Object(body.clone());
        let response = self
            .send(Method::POST, &path, &[], Payload::Json(&body), JSON)
            .await?;
        let parsed: TableResult<Record> = Self::parse(response).await?;
        Ok(parsed.result)
    }

    /// Patches the given fields of a record.
    pub async fn update_record(
        &self,
        table: &str,
        sys_id: &str,
        body: &Record,
    ) -> Result<Record, SnowError> {
        Self::validate_segment(table, "table")?;
        Self::validate_segment(sys_id, "sys_id")?;
        let path = format!("/table/{}/{}", table, sys_id);
        let body = Value::Object(body.clone());
        let response = self
            .send(Method::PATCH, &path, &[], Payload::Json(&body), JSON)
            .await
            .map_err(Self::not_found_as(sys_id))?;
        let parsed: TableResult<Record> = Self::parse(response).await?;
        Ok(parsed.result)
    }

    /// Deletes a record.
    pub async fn delete_record(&self, table: &str, sys_id: &str) -> Result<(), SnowError> {
        Self::validate_segment(table, "table")?;
        Self::validate_segment(sys_id, "sys_id")?;
        let path = format!("/table/{}/{}", table, sys_id);
        self.send(Method::DELETE, &path, &[], Payload::Empty, JSON)
            .await
            .map_err(Self::not_found_as(sys_id))?;
        Ok(())
    }

    // ========================================================================
    // Attachment API
    // ========================================================================

    /// Uploads raw bytes via `POST /attachment/file`.
    pub async fn upload_attachment(
        &self,
        upload: &AttachmentUpload,
    ) -> Result<Record, SnowError> {
        Self::validate_segment(&upload.table_name, "table_name")?;
        Self::validate_segment(&upload.table_sys_id, "table_sys_id")?;
        let response = self
            .send(
                Method::POST,
                "/attachment/file",
                &upload.query_pairs(),
                Payload::Bytes {
                    content_type: &upload.content_type,
                    bytes: &upload.bytes,
                },
                JSON,
            )
            .await?;
        let parsed: TableResult<Record> = Self::parse(response).await?;
        Ok(parsed.result)
    }

    /// Uploads a file as `multipart/form-data` via `POST /attachment/upload`.
    pub async fn upload_attachment_multipart(
        &self,
        upload: &AttachmentUpload,
    ) -> Result<Record, SnowError> {
        Self::validate_segment(&upload.table_name, "table_name")?;
        Self::validate_segment(&upload.table_sys_id, "table_sys_id")?;

        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)
            .map_err(|_| {
                SnowError::validation(format!("invalid content_type: {:?}", upload.content_type))
            })?;
        let form = Form::new()
            .text("table_name", upload.table_name.clone())
            .text("table_sys_id", upload.table_sys_id.clone())
            .part("uploadFile", part);

        let path = "/attachment/upload";
        tracing::debug!(method = "POST", path = %path, "Making ServiceNow API request");
        let response = self
            .build(Method::POST, path, JSON)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e, &Method::POST, path))?;
        let response = self.check(response, path).await?;
        let parsed: TableResult<Record> = Self::parse(response).await?;
        Ok(parsed.result)
    }

    /// Lists attachment metadata records.
    pub async fn list_attachments(&self, query: &TableQuery) -> Result<Vec<Record>, SnowError> {
        let response = self
            .send(Method::GET, "/attachment", &query.to_pairs(), Payload::Empty, JSON)
            .await?;
        let parsed: TableResult<Vec<Record>> = Self::parse(response).await?;
        Ok(parsed.result)
    }

    /// Gets one attachment's metadata.
    pub async fn get_attachment(&self, attachment_id: &str) -> Result<Record, SnowError> {
        Self::validate_segment(attachment_id, "attachment_id")?;
        let path = format!("/attachment/{}", attachment_id);
        let response = self
            .send(Method::GET, &path, &[], Payload::Empty, JSON)
            .await
            .map_err(Self::not_found_as(attachment_id))?;
        let parsed: TableResult<Record> = Self::parse(response).await?;
        Ok(parsed.result)
    }

    /// Downloads an attachment's binary content.
    pub async fn download_attachment(
        &self,
        attachment_id: &str,
        accept: &str,
    ) -> Result<AttachmentDownload, SnowError> {
        Self::validate_segment(attachment_id, "attachment_id")?;
        let path = format!("/attachment/{}/file", attachment_id);
        let response = self
            .send(Method::GET, &path, &[], Payload::Empty, accept)
            .await
            .map_err(Self::not_found_as(attachment_id))?;

        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header("content-type").unwrap_or_default();
        let metadata = header("x-attachment-metadata");
        let bytes = response.bytes().await.map_err(SnowError::Http)?.to_vec();

        Ok(AttachmentDownload {
            bytes,
            content_type,
            metadata,
        })
    }

    /// Deletes an attachment.
    pub async fn delete_attachment(&self, attachment_id: &str) -> Result<(), SnowError> {
        Self::validate_segment(attachment_id, "attachment_id")?;
        let path = format!("/attachment/{}", attachment_id);
        self.send(Method::DELETE, &path, &[], Payload::Empty, JSON)
            .await
            .map_err(Self::not_found_as(attachment_id))?;
        Ok(())
    }

    // ========================================================================
    // Impersonation
    // ========================================================================

    /// Elevates the current session to the given comma-separated roles.
    ///
    /// The instance answers with session cookies that the shared cookie
    /// jar keeps for subsequent calls.
    pub async fn elevate_roles(&self, roles: &str) -> Result<Value, SnowError> {
        self.post_value("/ui/impersonate/role", &json!({ "roles": roles }))
            .await
    }

    /// Asks the ATF execution endpoint to run a test.
    ///
    /// Returns whatever the endpoint answered with (`Null` for an empty body).
    pub async fn execute_atf_test(&self, test_id: &str) -> Result<Value, SnowError> {
        Self::validate_segment(test_id, "test_id")?;
        let path = format!("/atf/test/{}/execute", test_id);
        self.post_value(&path, &json!({ "test_id": test_id }))
            .await
    }

    /// POSTs a JSON body to a non-table endpoint and parses the reply.
    async fn post_value(&self, path: &str, body: &Value) -> Result<Value, SnowError> {
        let response = self
            .send(Method::POST, path, &[], Payload::Json(body), JSON)
            .await?;
        let text = response.text().await.map_err(SnowError::Http)?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(SnowError::Serialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;

    /// Creates a SnowClient for unit tests without requiring env vars.
    fn test_client() -> SnowClient {
        let config = Config::new(
            "https://dev1.service-now.com/",
            AuthConfig::Basic {
                username: "admin".to_string(),
                password: "hunter2-real".to_string(),
            },
        )
        .unwrap();
        SnowClient::new(&config).unwrap()
    }

    #[test]
    fn test_validate_segment_valid() {
        assert!(SnowClient::validate_segment("sys_atf_step", "table").is_ok());
        assert!(
            SnowClient::validate_segment("0a1b2c3d4e5f60718293a4b5c6d7e8f9", "sys_id").is_ok()
        );
        assert!(SnowClient::validate_segment("my-page", "page_id").is_ok());
    }

    #[test]
    fn test_validate_segment_rejects_traversal() {
        assert!(SnowClient::validate_segment("", "sys_id").is_err());
        assert!(SnowClient::validate_segment("..", "sys_id").is_err());
        assert!(SnowClient::validate_segment("abc/def", "sys_id").is_err());
        assert!(SnowClient::validate_segment("abc?x=1", "sys_id").is_err());
        assert!(SnowClient::validate_segment("a b", "sys_id").is_err());
        assert!(SnowClient::validate_segment(&"a".repeat(101), "sys_id").is_err());
    }

    #[test]
    fn test_validate_segment_error_names_field() {
        let err = SnowClient::validate_segment("x^y", "step_id").unwrap_err();
        assert!(err.to_string().contains("step_id"));
    }

    #[test]
    fn test_instance_url_trimmed() {
        assert_eq!(test_client().instance_url(), "https://dev1.service-now.com");
    }

    #[test]
    fn test_record_web_url_encodes_target() {
        let url = test_client().record_web_url("sp_page", "abc123");
        assert_eq!(
            url,
            "https://dev1.service-now.com/nav_to.do?uri=sp_page.do%3Fsys_id%3Dabc123"
        );
    }

    #[test]
    fn test_sanitize_error_hides_password() {
        let client = test_client();
        let err = SnowError::HttpStatus {
            status: StatusCode::BAD_REQUEST,
            body: "bad login admin/hunter2-real".to_string(),
        };
        let message = client.sanitize_error(&err);
        assert!(!message.contains("hunter2-real"));
        assert!(message.contains("[REDACTED]"));
    }

    #[test]
    fn test_configure_session_shared_between_clones() {
        let client = test_client();
        let clone = client.clone();
        client
            .configure_session(SessionOptions::new().header("X-UserToken", "abc"))
            .unwrap();
        assert_eq!(
            clone.session().headers().get("x-usertoken").unwrap(),
            "abc"
        );

        client
            .configure_session(SessionOptions::new().remove("X-UserToken"))
            .unwrap();
        assert!(clone.session().headers().is_empty());
    }

    #[test]
    fn test_configure_session_invalid_header_changes_nothing() {
        let client = test_client();
        client
            .configure_session(SessionOptions::new().header("X-One", "1"))
            .unwrap();
        let err = client
            .configure_session(
                SessionOptions::new()
                    .clear()
                    .header("bad header", "v"),
            )
            .unwrap_err();
        assert!(matches!(err, SnowError::Validation(_)));
        assert_eq!(client.session().headers().len(), 1);
    }

    #[test]
    fn test_is_idempotent() {
        assert!(SnowClient::is_idempotent(&Method::GET));
        assert!(SnowClient::is_idempotent(&Method::PATCH));
        assert!(SnowClient::is_idempotent(&Method::DELETE));
        assert!(!SnowClient::is_idempotent(&Method::POST));
    }

    #[test]
    fn test_truncate_body() {
        let client = test_client();
        let long = "x".repeat(MAX_ERROR_BODY_LEN + 10);
        let truncated = client.truncate_body(&long);
        assert!(truncated.ends_with("...[truncated]"));
        assert_eq!(truncated.len(), MAX_ERROR_BODY_LEN + "...[truncated]".len());
    }
}
