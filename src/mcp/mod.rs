//! Model Context Protocol (MCP) server implementation
//!
//! - **catalog**: the sixteen tools, their descriptions and input shapes
//! - **dispatcher**: validates arguments and routes a call to its operation
//! - **server**: rmcp `ServerHandler` wrapping the dispatcher
//! - **service**: Streamable HTTP service for mounting into Axum
//!
//! The same server also runs over stdio; see the `ticktick-mcp` binary.

pub mod catalog;
pub mod dispatcher;
pub mod server;
mod service;

#[cfg(test)]
mod dispatcher_test;
#[cfg(test)]
mod server_test;

pub use dispatcher::Dispatcher;
pub use server::TickTickServer;
pub use service::create_mcp_service;
