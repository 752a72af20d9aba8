//! SQLite task repository.
//!
//! Every query is scoped by `owner_id`. A task owned by a different subject
//! is indistinguishable from a task that does not exist.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::db::models::{normalize_description, validate_title};
use crate::db::{DbError, DbResult, MAX_PAGE_SIZE, Task, TaskFilter, TaskPage, TaskPatch};

/// SQLx-backed task repository.
pub struct SqliteTaskRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl<'a> SqliteTaskRepository<'a> {
    /// Create a new task for the given owner. Title is validated (1..=255
    /// chars after trimming); empty descriptions are normalized to NULL.
    pub async fn create(
        &self,
        owner_id: Uuid,
        title: &str,
        description: Option<String>,
    ) -> DbResult<Task> {
        let title = validate_title(title)?;
        let description = normalize_description(description);
        let now = Utc::now();

        let task = Task {
            id: Uuid::new_v4(),
            owner_id,
            title,
            description,
            is_completed: false,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO task (id, owner_id, title, description, is_completed, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(task.id.to_string())
        .bind(task.owner_id.to_string())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.is_completed)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(self.pool)
        .await
        .map_err(DbError::database)?;

        Ok(task)
    }

    /// Get a task by id, scoped by owner.
    pub async fn get(&self, owner_id: Uuid, task_id: Uuid) -> DbResult<Task> {
        let row = sqlx::query(
            "SELECT id, owner_id, title, description, is_completed, created_at, updated_at
             FROM task WHERE id = ? AND owner_id = ?",
        )
        .bind(task_id.to_string())
        .bind(owner_id.to_string())
        .fetch_optional(self.pool)
        .await
        .map_err(DbError::database)?;

        let row = row.ok_or(DbError::NotFound {
            entity: "Task",
            id: task_id.to_string(),
        })?;

        row_to_task(&row)
    }

    /// List tasks for an owner, newest first, with pagination metadata.
    pub async fn list(&self, owner_id: Uuid, filter: &TaskFilter) -> DbResult<TaskPage> {
        if filter.page < 1 {
            return Err(DbError::validation("Page must be an integer >= 1"));
        }
        if filter.page_size < 1 || filter.page_size > MAX_PAGE_SIZE {
            return Err(DbError::validation(format!(
                "Page size must be an integer between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        let mut where_clause = String::from("WHERE owner_id = ?");
        if filter.completed.is_some() {
            where_clause.push_str(" AND is_completed = ?");
        }

        let count_sql = format!("SELECT COUNT(*) FROM task {}", where_clause);
        let mut count_query = sqlx::query_scalar(&count_sql).bind(owner_id.to_string());
        if let Some(completed) = filter.completed {
            count_query = count_query.bind(completed);
        }
        let total: i64 = count_query
            .fetch_one(self.pool)
            .await
            .map_err(DbError::database)?;

        // rowid breaks ties for tasks created within the same instant.
        let sql = format!(
            "SELECT id, owner_id, title, description, is_completed, created_at, updated_at
             FROM task {}
             ORDER BY created_at DESC, rowid DESC
             LIMIT ? OFFSET ?",
            where_clause
        );

        let mut query = sqlx::query(&sql).bind(owner_id.to_string());
        if let Some(completed) = filter.completed {
            query = query.bind(completed);
        }
        let rows = query
            .bind(filter.page_size)
            .bind((filter.page - 1) * filter.page_size)
            .fetch_all(self.pool)
            .await
            .map_err(DbError::database)?;

        let items: Vec<Task> = rows.iter().map(row_to_task).collect::<DbResult<_>>()?;

        Ok(TaskPage::new(items, total, filter.page, filter.page_size))
    }

    /// Apply a partial update. Only supplied fields change; `updated_at`
    /// is refreshed even when the patch is empty.
    pub async fn update(&self, owner_id: Uuid, task_id: Uuid, patch: TaskPatch) -> DbResult<Task> {
        let mut task = self.get(owner_id, task_id).await?;

        if let Some(title) = patch.title {
            task.title = validate_title(&title)?;
        }
        if let Some(description) = patch.description {
            task.description = normalize_description(Some(description));
        }
        if let Some(is_completed) = patch.is_completed {
            task.is_completed = is_completed;
        }
        task.updated_at = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE task
            SET title = ?, description = ?, is_completed = ?, updated_at = ?
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.is_completed)
        .bind(task.updated_at)
        .bind(task.id.to_string())
        .bind(owner_id.to_string())
        .execute(self.pool)
        .await
        .map_err(DbError::database)?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                entity: "Task",
                id: task_id.to_string(),
            });
        }

        Ok(task)
    }

    /// Mark a task completed. Idempotent: completing an already-complete
    /// task succeeds and refreshes `updated_at`.
    pub async fn complete(&self, owner_id: Uuid, task_id: Uuid) -> DbResult<Task> {
        let result = sqlx::query(
            "UPDATE task SET is_completed = 1, updated_at = ? WHERE id = ? AND owner_id = ?",
        )
        .bind(Utc::now())
        .bind(task_id.to_string())
        .bind(owner_id.to_string())
        .execute(self.pool)
        .await
        .map_err(DbError::database)?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                entity: "Task",
                id: task_id.to_string(),
            });
        }

        self.get(owner_id, task_id).await
    }

    /// Hard-delete a task. A second delete of the same id is NotFound.
    pub async fn delete(&self, owner_id: Uuid, task_id: Uuid) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM task WHERE id = ? AND owner_id = ?")
            .bind(task_id.to_string())
            .bind(owner_id.to_string())
            .execute(self.pool)
            .await
            .map_err(DbError::database)?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                entity: "Task",
                id: task_id.to_string(),
            });
        }

        Ok(())
    }
}

/// Convert a database row to a Task model.
fn row_to_task(row: &sqlx::sqlite::SqliteRow) -> DbResult<Task> {
    let id: String = row.try_get("id").map_err(DbError::database)?;
    let owner_id: String = row.try_get("owner_id").map_err(DbError::database)?;

    Ok(Task {
        id: Uuid::parse_str(&id).map_err(DbError::database)?,
        owner_id: Uuid::parse_str(&owner_id).map_err(DbError::database)?,
        title: row.try_get("title").map_err(DbError::database)?,
        description: row.try_get("description").map_err(DbError::database)?,
        is_completed: row.try_get("is_completed").map_err(DbError::database)?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(DbError::database)?,
        updated_at: row
            .try_get::<DateTime<Utc>, _>("updated_at")
            .map_err(DbError::database)?,
    })
}
