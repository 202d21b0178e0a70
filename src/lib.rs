//! TickTick open API exposed as Model Context Protocol tools.
//!
//! - [`schema`]: shape descriptors validating tool input and remote responses
//! - [`client`]: authenticated HTTP wrapper
//! - [`operations`]: one function per tool
//! - [`mcp`]: catalog, dispatcher and rmcp server

pub mod client;
pub mod config;
pub mod error;
pub mod mcp;
pub mod models;
pub mod operations;
pub mod schema;

#[cfg(test)]
mod testing;

pub use error::{TickTickError, TickTickResult};
