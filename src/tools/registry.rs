//! Tool registry and dispatcher.
//!
//! The tool set is a closed enum rather than a string-keyed map: adding a
//! tool means adding a variant, and the dispatcher's match is checked for
//! exhaustiveness at compile time. Name-based routing only happens at the
//! edge, where `from_name` turns an unrecognized name into `UnknownTool`.

use std::sync::Arc;

use rmcp::{schemars, schemars::JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::TokenValidator;
use crate::db::SqliteDatabase;
use crate::tools::{ToolError, ToolResult};

// =============================================================================
// Parameter Structs
// =============================================================================

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddTaskParams {
    #[schemars(description = "Bearer credential (JWT) identifying the caller")]
    pub credential: String,
    #[schemars(description = "Task title (1-255 characters)")]
    pub title: String,
    #[schemars(description = "Optional task description")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListTasksParams {
    #[schemars(description = "Bearer credential (JWT) identifying the caller")]
    pub credential: String,
    #[schemars(description = "Filter by completion status. Omit to list all tasks.")]
    pub completed: Option<bool>,
    #[schemars(description = "1-indexed page number (default: 1)")]
    pub page: Option<i64>,
    #[schemars(description = "Items per page, 1-100 (default: 20)")]
    pub page_size: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateTaskParams {
    #[schemars(description = "Bearer credential (JWT) identifying the caller")]
    pub credential: String,
    #[schemars(description = "Task ID (UUID)")]
    pub task_id: String,
    #[schemars(description = "New title (1-255 characters, optional)")]
    pub title: Option<String>,
    #[schemars(description = "New description (optional)")]
    pub description: Option<String>,
    #[schemars(description = "New completion status (optional)")]
    pub is_completed: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CompleteTaskParams {
    #[schemars(description = "Bearer credential (JWT) identifying the caller")]
    pub credential: String,
    #[schemars(description = "Task ID (UUID) to mark as completed")]
    pub task_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DeleteTaskParams {
    #[schemars(description = "Bearer credential (JWT) identifying the caller")]
    pub credential: String,
    #[schemars(description = "Task ID (UUID) to delete permanently")]
    pub task_id: String,
}

/// Result of a successful `delete_task` invocation.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteTaskResult {
    pub deleted: bool,
    pub task_id: uuid::Uuid,
}

// =============================================================================
// Tool Kinds
// =============================================================================

/// The closed set of tools this server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    AddTask,
    ListTasks,
    UpdateTask,
    CompleteTask,
    DeleteTask,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::AddTask,
        ToolKind::ListTasks,
        ToolKind::UpdateTask,
        ToolKind::CompleteTask,
        ToolKind::DeleteTask,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::AddTask => "add_task",
            ToolKind::ListTasks => "list_tasks",
            ToolKind::UpdateTask => "update_task",
            ToolKind::CompleteTask => "complete_task",
            ToolKind::DeleteTask => "delete_task",
        }
    }

    pub fn from_name(name: &str) -> Option<ToolKind> {
        ToolKind::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::AddTask => "Create a new task for the authenticated user",
            ToolKind::ListTasks => {
                "Retrieve tasks for the authenticated user with optional filtering and pagination"
            }
            ToolKind::UpdateTask => {
                "Modify task title, description, or completion status for the authenticated user"
            }
            ToolKind::CompleteTask => {
                "Mark a task as completed for the authenticated user (idempotent operation)"
            }
            ToolKind::DeleteTask => {
                "Permanently remove a task from the database for the authenticated user"
            }
        }
    }

    /// JSON schema for this tool's input.
    pub fn input_schema(self) -> Value {
        let schema = match self {
            ToolKind::AddTask => schemars::schema_for!(AddTaskParams),
            ToolKind::ListTasks => schemars::schema_for!(ListTasksParams),
            ToolKind::UpdateTask => schemars::schema_for!(UpdateTaskParams),
            ToolKind::CompleteTask => schemars::schema_for!(CompleteTaskParams),
            ToolKind::DeleteTask => schemars::schema_for!(DeleteTaskParams),
        };
        serde_json::to_value(schema).unwrap_or(Value::Null)
    }
}

/// A discoverable tool: name, description, and input schema.
#[derive(Debug, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

// =============================================================================
// Registry / Dispatcher
// =============================================================================

/// Routes named invocations to the matching handler.
///
/// Handlers hold no per-invocation state; the registry only carries the
/// injected database handle and credential validator.
#[derive(Clone)]
pub struct ToolRegistry {
    pub(crate) db: Arc<SqliteDatabase>,
    pub(crate) validator: TokenValidator,
}

impl ToolRegistry {
    pub fn new(db: Arc<SqliteDatabase>, validator: TokenValidator) -> Self {
        Self { db, validator }
    }

    /// Describe every tool for discovery.
    pub fn descriptors() -> Vec<ToolDescriptor> {
        ToolKind::ALL
            .into_iter()
            .map(|kind| ToolDescriptor {
                name: kind.name(),
                description: kind.description(),
                input_schema: kind.input_schema(),
            })
            .collect()
    }

    /// Route a named invocation with a JSON argument bag to its handler.
    ///
    /// Synchronous per call: no queuing, no batching, no retries.
    pub async fn dispatch(&self, name: &str, arguments: Value) -> ToolResult<Value> {
        let kind = ToolKind::from_name(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        match kind {
            ToolKind::AddTask => {
                let task = self.add_task(parse_params(arguments)?).await?;
                to_json(&task)
            }
            ToolKind::ListTasks => {
                let page = self.list_tasks(parse_params(arguments)?).await?;
                to_json(&page)
            }
            ToolKind::UpdateTask => {
                let task = self.update_task(parse_params(arguments)?).await?;
                to_json(&task)
            }
            ToolKind::CompleteTask => {
                let task = self.complete_task(parse_params(arguments)?).await?;
                to_json(&task)
            }
            ToolKind::DeleteTask => {
                let result = self.delete_task(parse_params(arguments)?).await?;
                to_json(&result)
            }
        }
    }
}

fn parse_params<P: serde::de::DeserializeOwned>(arguments: Value) -> ToolResult<P> {
    serde_json::from_value(arguments)
        .map_err(|e| ToolError::validation(format!("Invalid arguments: {}", e)))
}

fn to_json<T: Serialize>(value: &T) -> ToolResult<Value> {
    serde_json::to_value(value).map_err(|e| ToolError::Database(e.to_string()))
}
