//! Tool handler implementations.
//!
//! Every handler is the same thin composition:
//! verify credential, validate input, one scoped store call, shape response.
//! Handlers never retain state between invocations and never perform more
//! than one logical store operation.

use tracing::{debug, error};
use uuid::Uuid;

use crate::db::{Task, TaskFilter, TaskPage, TaskPatch};
use crate::tools::registry::{
    AddTaskParams, CompleteTaskParams, DeleteTaskParams, DeleteTaskResult, ListTasksParams,
    ToolRegistry, UpdateTaskParams,
};
use crate::tools::{ToolError, ToolResult};

impl ToolRegistry {
    pub async fn add_task(&self, params: AddTaskParams) -> ToolResult<Task> {
        let owner_id = self.validator.verify(&params.credential)?;

        let task = self
            .db
            .tasks()
            .create(owner_id, &params.title, params.description)
            .await
            .map_err(log_db_error)?;

        debug!(task_id = %task.id, "task created");
        Ok(task)
    }

    pub async fn list_tasks(&self, params: ListTasksParams) -> ToolResult<TaskPage> {
        let owner_id = self.validator.verify(&params.credential)?;

        let filter = TaskFilter {
            completed: params.completed,
            page: params.page.unwrap_or_else(|| TaskFilter::default().page),
            page_size: params
                .page_size
                .unwrap_or_else(|| TaskFilter::default().page_size),
        };

        self.db
            .tasks()
            .list(owner_id, &filter)
            .await
            .map_err(log_db_error)
    }

    pub async fn update_task(&self, params: UpdateTaskParams) -> ToolResult<Task> {
        let owner_id = self.validator.verify(&params.credential)?;
        let task_id = parse_task_id(&params.task_id)?;

        let patch = TaskPatch {
            title: params.title,
            description: params.description,
            is_completed: params.is_completed,
        };

        let task = self
            .db
            .tasks()
            .update(owner_id, task_id, patch)
            .await
            .map_err(log_db_error)?;

        debug!(task_id = %task.id, "task updated");
        Ok(task)
    }

    pub async fn complete_task(&self, params: CompleteTaskParams) -> ToolResult<Task> {
        let owner_id = self.validator.verify(&params.credential)?;
        let task_id = parse_task_id(&params.task_id)?;

        let task = self
            .db
            .tasks()
            .complete(owner_id, task_id)
            .await
            .map_err(log_db_error)?;

        debug!(task_id = %task.id, "task completed");
        Ok(task)
    }

    pub async fn delete_task(&self, params: DeleteTaskParams) -> ToolResult<DeleteTaskResult> {
        let owner_id = self.validator.verify(&params.credential)?;
        let task_id = parse_task_id(&params.task_id)?;

        self.db
            .tasks()
            .delete(owner_id, task_id)
            .await
            .map_err(log_db_error)?;

        debug!(task_id = %task_id, "task deleted");
        Ok(DeleteTaskResult {
            deleted: true,
            task_id,
        })
    }
}

fn parse_task_id(raw: &str) -> ToolResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ToolError::validation("task_id must be a valid UUID"))
}

/// Translate store errors, logging backend detail that must not reach
/// the caller.
fn log_db_error(e: crate::db::DbError) -> ToolError {
    let err = ToolError::from(e);
    if let ToolError::Database(detail) = &err {
        error!(%detail, "store operation failed");
    }
    err
}
