//! MCP Streamable HTTP service creation.
//!
//! Produces a `StreamableHttpService` that can be nested into the axum
//! router (mounted at `/mcp` by the REST layer).

use std::sync::Arc;

use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use tokio_util::sync::CancellationToken;

use crate::tools::ToolRegistry;

use super::server::McpServer;

/// Create the MCP Streamable HTTP service.
///
/// Tool invocations are stateless (every call carries its own credential),
/// so the transport runs without session management.
pub fn create_mcp_service(
    registry: Arc<ToolRegistry>,
    cancellation_token: CancellationToken,
) -> StreamableHttpService<McpServer, LocalSessionManager> {
    let service_factory = move || -> Result<McpServer, std::io::Error> {
        Ok(McpServer::new(Arc::clone(&registry)))
    };

    let mut config = StreamableHttpServerConfig::default();
    config.sse_keep_alive = None;
    config.sse_retry = None;
    config.stateful_mode = false;
    config.cancellation_token = cancellation_token;

    StreamableHttpService::new(
        service_factory,
        LocalSessionManager::default().into(),
        config,
    )
}
