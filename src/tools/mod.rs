//! Tool invocation layer.
//!
//! Mediates between an agent and the task store: a closed registry of five
//! JWT-scoped CRUD tools, dispatched by name, each producing exactly one
//! structured result or structured error.

mod error;
mod handlers;
mod registry;


pub use error::{ToolError, ToolResult};
pub use registry::{
    AddTaskParams, CompleteTaskParams, DeleteTaskParams, DeleteTaskResult, ListTasksParams,
    ToolDescriptor, ToolKind, ToolRegistry, UpdateTaskParams,
};
