//! # snow-mcp
//!
//! An MCP (Model Context Protocol) server that manages ServiceNow
//! configuration records through the Table API.
//!
//! ## Overview
//!
//! Every tool validates a typed input, issues one or a few REST calls
//! through a shared [`SnowClient`](snow_client::SnowClient) and returns a
//! `{success, message, data}` envelope. Tools never fail at the protocol
//! level: HTTP and API errors come back as `success: false` with a
//! sanitized message.
//!
//! ## Modules
//!
//! - [`config`] - Configuration loading from environment variables
//! - [`auth`] - Basic, OAuth bearer and API key request authentication
//! - [`error`] - Error types with secret-scrubbing message sanitization
//! - [`snow_client`] - HTTP client for the Table, Attachment and impersonation APIs
//! - [`models`] - Query builders, record bodies and the tool envelope
//! - [`tools`] - Tool inputs and implementations, one module per domain
//! - [`registry`] - Catalog pairing tool names with their input schemas
//! - [`server`] - MCP server implementation with tool routing
//!
//! ## Configuration
//!
//! - `SERVICENOW_INSTANCE_URL`: instance base URL, e.g. `https://dev12345.service-now.com`
//! - `SERVICENOW_AUTH_TYPE`: `basic` (default), `oauth` or `api_key`
//! - `SERVICENOW_USERNAME` / `SERVICENOW_PASSWORD` for basic auth
//! - `SERVICENOW_TOKEN` for OAuth
//! - `SERVICENOW_API_KEY` (and optionally `SERVICENOW_API_KEY_HEADER`) for API keys
//! - `SERVICENOW_TIMEOUT_SECS`: per-request timeout (default 30)
//! - `RUST_LOG`: log level (e.g., `snow_mcp=debug`)
//!
//! ## Security Considerations
//!
//! Credentials are held only in memory. They are never logged and are
//! scrubbed from every error message before it reaches a tool response.
//!
//! ## Example
//!
//! ```ignore
//! use snow_mcp::config::Config;
//! use snow_mcp::snow_client::SnowClient;
//! use snow_mcp::tools::atf::{self, ListAtfTestStepsInput};
//!
//! async fn example() -> Result<(), snow_mcp::error::SnowError> {
//!     let config = Config::from_env()?;
//!     let client = SnowClient::new(&config)?;
//!
//!     let input: ListAtfTestStepsInput =
//!         serde_json::from_value(serde_json::json!({"test": "<test sys_id>"})).unwrap();
//!     let response = atf::list_atf_test_steps(&client, input).await;
//!     println!("{}", response.render());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod server;
pub mod snow_client;
pub mod tools;
