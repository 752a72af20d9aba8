//! MCP surface for the tool layer.

mod server;
mod service;

#[cfg(test)]
mod server_test;

pub use server::McpServer;
pub use service::create_mcp_service;
