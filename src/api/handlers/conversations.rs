//! Conversation and message handlers.
//!
//! Message appends pass through the injected rate limiter before touching
//! the store; the other conversation routes are unmetered.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::api::error::ApiResult;
use crate::api::extract::AuthSubject;
use crate::api::state::AppState;
use crate::db::{Conversation, ConversationDetail, Message, MessageRole};

#[derive(Debug, Deserialize)]
pub struct CreateConversationBody {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AppendMessageBody {
    pub role: MessageRole,
    pub content: String,
    pub tool_calls: Option<Value>,
}

pub async fn create(
    State(state): State<AppState>,
    AuthSubject(owner_id): AuthSubject,
    Json(body): Json<CreateConversationBody>,
) -> ApiResult<(StatusCode, Json<Conversation>)> {
    let conversation = state
        .db
        .conversations()
        .create(owner_id, body.title)
        .await?;
    Ok((StatusCode::CREATED, Json(conversation)))
}

pub async fn list(
    State(state): State<AppState>,
    AuthSubject(owner_id): AuthSubject,
) -> ApiResult<Json<Vec<Conversation>>> {
    let conversations = state.db.conversations().list(owner_id).await?;
    Ok(Json(conversations))
}

pub async fn get(
    State(state): State<AppState>,
    AuthSubject(owner_id): AuthSubject,
    Path(conversation_id): Path<Uuid>,
) -> ApiResult<Json<ConversationDetail>> {
    let detail = state
        .db
        .conversations()
        .get(owner_id, conversation_id)
        .await?;
    Ok(Json(detail))
}

pub async fn append_message(
    State(state): State<AppState>,
    AuthSubject(owner_id): AuthSubject,
    Path(conversation_id): Path<Uuid>,
    Json(body): Json<AppendMessageBody>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    state.rate_limiter.check(owner_id)?;

    let message = state
        .db
        .conversations()
        .append_message(
            owner_id,
            conversation_id,
            body.role,
            &body.content,
            body.tool_calls,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}
