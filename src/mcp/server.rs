//! MCP server implementation
//!
//! Implements `ServerHandler` by hand: discovery returns the fixed catalog and
//! every call goes through the [`Dispatcher`].

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::{
        CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParams, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
};
use serde_json::json;

use crate::client::ApiClient;
use crate::error::TickTickError;

use super::catalog;
use super::dispatcher::Dispatcher;

pub const SERVER_NAME: &str = "ticktick-mcp-server";

/// MCP server exposing TickTick projects and tasks as tools.
///
/// Stateless apart from the HTTP client; cheap to clone per session.
#[derive(Clone)]
pub struct TickTickServer {
    dispatcher: Dispatcher,
}

impl TickTickServer {
    pub fn new(client: ApiClient) -> Self {
        Self {
            dispatcher: Dispatcher::new(client),
        }
    }
}

/// Map a domain error onto the protocol error surfaced to the host.
pub fn into_mcp_error(error: TickTickError) -> McpError {
    let message = error.describe();
    match &error {
        TickTickError::Validation(e) => {
            McpError::invalid_params(message, Some(json!({ "issues": e.to_json() })))
        }
        TickTickError::UnknownTool { name } => {
            McpError::invalid_params(message, Some(json!({ "tool": name })))
        }
        TickTickError::MissingArguments { tool } => {
            McpError::invalid_params(message, Some(json!({ "tool": tool })))
        }
        TickTickError::Api { status, body, .. } => McpError::internal_error(
            message,
            Some(json!({ "status": status, "body": body })),
        ),
        TickTickError::Transport { .. }
        | TickTickError::InvalidResponse { .. }
        | TickTickError::InvalidBaseUrl { .. }
        | TickTickError::Serialization(_) => McpError::internal_error(message, None),
    }
}

impl ServerHandler for TickTickServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_server_info(Implementation::new(
                SERVER_NAME.to_string(),
                env!("CARGO_PKG_VERSION").to_string(),
            ))
            .with_instructions(
                "TickTick MCP Server - Manage TickTick projects and tasks: list, create, update, \
                 complete and delete them, run batch changes, and query subtasks, the inbox and \
                 completed tasks."
                    .to_string(),
            )
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(catalog::tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let text = self
            .dispatcher
            .dispatch(&request.name, request.arguments)
            .await
            .map_err(into_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}
