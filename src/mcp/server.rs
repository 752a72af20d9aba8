//! MCP server exposing the task tools.
//!
//! A thin transport veneer: each `#[tool]` method delegates to the typed
//! handler on [`ToolRegistry`] and converts the shared error taxonomy to
//! MCP error data. The error `message` carries the stable code string; the
//! human-readable message and structured details travel in `data`.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router,
};
use serde::Serialize;
use serde_json::json;

use crate::tools::{
    AddTaskParams, CompleteTaskParams, DeleteTaskParams, ListTasksParams, ToolError, ToolRegistry,
    UpdateTaskParams,
};

#[derive(Clone)]
pub struct McpServer {
    registry: Arc<ToolRegistry>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl McpServer {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Create a new task for the authenticated user")]
    pub async fn add_task(
        &self,
        params: Parameters<AddTaskParams>,
    ) -> Result<CallToolResult, McpError> {
        let task = self.registry.add_task(params.0).await.map_err(to_mcp_error)?;
        text_result(&task)
    }

    #[tool(
        description = "Retrieve tasks for the authenticated user with optional filtering and pagination"
    )]
    pub async fn list_tasks(
        &self,
        params: Parameters<ListTasksParams>,
    ) -> Result<CallToolResult, McpError> {
        let page = self
            .registry
            .list_tasks(params.0)
            .await
            .map_err(to_mcp_error)?;
        text_result(&page)
    }

    #[tool(
        description = "Modify task title, description, or completion status for the authenticated user"
    )]
    pub async fn update_task(
        &self,
        params: Parameters<UpdateTaskParams>,
    ) -> Result<CallToolResult, McpError> {
        let task = self
            .registry
            .update_task(params.0)
            .await
            .map_err(to_mcp_error)?;
        text_result(&task)
    }

    #[tool(
        description = "Mark a task as completed for the authenticated user (idempotent operation)"
    )]
    pub async fn complete_task(
        &self,
        params: Parameters<CompleteTaskParams>,
    ) -> Result<CallToolResult, McpError> {
        let task = self
            .registry
            .complete_task(params.0)
            .await
            .map_err(to_mcp_error)?;
        text_result(&task)
    }

    #[tool(
        description = "Permanently remove a task from the database for the authenticated user"
    )]
    pub async fn delete_task(
        &self,
        params: Parameters<DeleteTaskParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .registry
            .delete_task(params.0)
            .await
            .map_err(to_mcp_error)?;
        text_result(&result)
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info.instructions = Some(
            "Todo MCP server - JWT-scoped task management \
             (tools: add_task, list_tasks, update_task, complete_task, delete_task)"
                .to_string(),
        );
        info
    }
}

fn text_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error("serialization_error", Some(json!({"error": e.to_string()}))))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn to_mcp_error(e: ToolError) -> McpError {
    let data = Some(json!({
        "message": e.public_message(),
        "details": e.details(),
    }));

    match &e {
        ToolError::Authentication | ToolError::RateLimited { .. } => {
            McpError::invalid_request(e.code(), data)
        }
        ToolError::Validation(_) | ToolError::UnknownTool(_) => {
            McpError::invalid_params(e.code(), data)
        }
        ToolError::NotFound { .. } => McpError::resource_not_found(e.code(), data),
        ToolError::Database(_) => McpError::internal_error(e.code(), data),
    }
}
