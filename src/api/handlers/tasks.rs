//! Task CRUD handlers.
//!
//! Each handler authenticates through [`AuthSubject`] and issues exactly
//! one owner-scoped store call.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::api::error::ApiResult;
use crate::api::extract::AuthSubject;
use crate::api::state::AppState;
use crate::db::{Task, TaskFilter, TaskPage, TaskPatch};

#[derive(Debug, Deserialize)]
pub struct CreateTaskBody {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    pub completed: Option<bool>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

pub async fn create(
    State(state): State<AppState>,
    AuthSubject(owner_id): AuthSubject,
    Json(body): Json<CreateTaskBody>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = state
        .db
        .tasks()
        .create(owner_id, &body.title, body.description)
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list(
    State(state): State<AppState>,
    AuthSubject(owner_id): AuthSubject,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<TaskPage>> {
    let defaults = TaskFilter::default();
    let filter = TaskFilter {
        completed: query.completed,
        page: query.page.unwrap_or(defaults.page),
        page_size: query.page_size.unwrap_or(defaults.page_size),
    };

    let page = state.db.tasks().list(owner_id, &filter).await?;
    Ok(Json(page))
}

pub async fn get(
    State(state): State<AppState>,
    AuthSubject(owner_id): AuthSubject,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = state.db.tasks().get(owner_id, task_id).await?;
    Ok(Json(task))
}

pub async fn update(
    State(state): State<AppState>,
    AuthSubject(owner_id): AuthSubject,
    Path(task_id): Path<Uuid>,
    Json(body): Json<UpdateTaskBody>,
) -> ApiResult<Json<Task>> {
    let patch = TaskPatch {
        title: body.title,
        description: body.description,
        is_completed: body.is_completed,
    };

    let task = state.db.tasks().update(owner_id, task_id, patch).await?;
    Ok(Json(task))
}

pub async fn complete(
    State(state): State<AppState>,
    AuthSubject(owner_id): AuthSubject,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = state.db.tasks().complete(owner_id, task_id).await?;
    Ok(Json(task))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthSubject(owner_id): AuthSubject,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    state.db.tasks().delete(owner_id, task_id).await?;
    Ok(Json(json!({ "deleted": true, "task_id": task_id })))
}
