//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use snow_mcp::config::{AuthConfig, Config};
use snow_mcp::snow_client::SnowClient;
use wiremock::MockServer;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "s3cret-test-pass";

/// A client pointed at the mock instance with basic auth.
pub fn client_for(server: &MockServer) -> SnowClient {
    let config = Config::new(
        server.uri(),
        AuthConfig::Basic {
            username: USERNAME.to_string(),
            password: PASSWORD.to_string(),
        },
    )
    .expect("mock server URI is a valid instance URL");
    SnowClient::new(&config).expect("client builds")
}

/// Wraps a value the way the Table API does.
pub fn result(value: Value) -> Value {
    json!({ "result": value })
}

/// A Table API error document.
pub fn api_error(message: &str) -> Value {
    json!({
        "error": { "message": message, "detail": "" },
        "status": "failure"
    })
}
