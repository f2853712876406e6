//! snow-mcp - MCP server for the ServiceNow Table API
//!
//! This binary runs as an MCP server over stdio, letting an MCP client
//! manage ServiceNow configuration records through natural language.
//!
//! # Configuration
//!
//! Set the following environment variables (or use a `.env` file):
//!
//! - `SERVICENOW_INSTANCE_URL`: Base URL of your instance
//! - `SERVICENOW_AUTH_TYPE`: `basic` (default), `oauth` or `api_key`
//! - Credentials for the chosen auth type
//!
//! # Usage
//!
//! ```bash
//! SERVICENOW_INSTANCE_URL=https://dev12345.service-now.com \
//! SERVICENOW_USERNAME=admin SERVICENOW_PASSWORD=xxx ./snow-mcp
//! ```

use anyhow::{Context, Result};
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::{fmt, EnvFilter};

use snow_mcp::{config, server, snow_client};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    // stdout carries MCP JSON-RPC, so logs go to stderr
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("snow_mcp=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting snow-mcp server v{}", env!("CARGO_PKG_VERSION"));

    let config = config::Config::from_env().context("Failed to load configuration")?;

    tracing::debug!(
        instance_url = %config.instance_url,
        auth = ?config.auth,
        "Configuration loaded"
    );

    let client =
        snow_client::SnowClient::new(&config).context("Failed to create ServiceNow client")?;

    tracing::info!("Testing connection to ServiceNow...");
    if let Err(e) = client.test_connection().await {
        tracing::error!(error = %client.sanitize_error(&e), "Connection test failed");
        tracing::warn!(
            "Server will start but may not be able to reach ServiceNow. \
             Check configuration and network connectivity."
        );
    }

    let server = server::SnowServer::new(client);

    let registry = server.registry();
    for entry in registry.generic_entries() {
        tracing::warn!(
            tool = %entry.name,
            module = %entry.module,
            "Tool has no input schema, accepting any object"
        );
    }
    tracing::info!(tools = registry.len(), "Server initialized, starting stdio transport");

    let service = server
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })
        .context("Failed to start server")?;

    tracing::info!("Server running, waiting for requests");

    service
        .waiting()
        .await
        .context("Server error during operation")?;

    tracing::info!("Server shutting down");

    Ok(())
}
