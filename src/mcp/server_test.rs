//! Tests for MCP server identity and error mapping

use rmcp::ServerHandler;
use rmcp::model::ErrorCode;
use serde_json::json;

use super::server::{SERVER_NAME, TickTickServer, into_mcp_error};
use crate::error::TickTickError;
use crate::schema::ValidationError;
use crate::testing::FakeApi;

#[tokio::test]
async fn test_server_info() {
    let api = FakeApi::start().await;
    let server = TickTickServer::new(api.client());

    let info = server.get_info();

    assert!(
        info.capabilities.tools.is_some(),
        "Server should support tools"
    );
    assert!(
        info.instructions.is_some(),
        "Server should provide instructions"
    );
    assert_eq!(info.server_info.name, SERVER_NAME);
    assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_validation_maps_to_invalid_params_with_issues() {
    let error = TickTickError::Validation(ValidationError::single("projectId", "required"));

    let mapped = into_mcp_error(error);

    assert_eq!(mapped.code, ErrorCode::INVALID_PARAMS);
    assert_eq!(mapped.message, "Invalid input: projectId: required");
    assert_eq!(
        mapped.data,
        Some(json!({ "issues": [{ "path": "projectId", "message": "required" }] }))
    );
}

#[test]
fn test_unknown_tool_maps_to_invalid_params() {
    let mapped = into_mcp_error(TickTickError::UnknownTool {
        name: "nope".to_string(),
    });

    assert_eq!(mapped.code, ErrorCode::INVALID_PARAMS);
    assert_eq!(mapped.message, "Unknown tool name: nope");
}

#[test]
fn test_api_error_maps_to_internal_error_with_status() {
    let mapped = into_mcp_error(TickTickError::Api {
        status: 404,
        message: "Task not found".to_string(),
        body: Some(json!({ "errorMessage": "Task not found" })),
    });

    assert_eq!(mapped.code, ErrorCode::INTERNAL_ERROR);
    assert_eq!(mapped.message, "TickTick API error (404): Task not found");
    assert_eq!(mapped.data.unwrap()["status"], 404);
}
