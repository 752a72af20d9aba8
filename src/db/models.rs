//! Domain models for the task and conversation stores.
//!
//! These models are storage-agnostic and represent the entities used
//! throughout the tool layer and the REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{DbError, DbResult};

/// Maximum title length for tasks and conversations, in characters.
pub const MAX_TITLE_LEN: usize = 255;

/// Maximum message content length, in characters.
pub const MAX_MESSAGE_LEN: usize = 50_000;

/// Default page size for task listings.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Upper bound on page size for task listings.
pub const MAX_PAGE_SIZE: i64 = 100;

/// An individual work item, always owned by exactly one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filter and pagination options for task listings.
#[derive(Debug, Clone)]
pub struct TaskFilter {
    /// Filter by completion status; `None` returns all tasks.
    pub completed: Option<bool>,
    /// 1-indexed page number.
    pub page: i64,
    /// Items per page, 1..=100.
    pub page_size: i64,
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self {
            completed: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of tasks plus pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskPage {
    pub items: Vec<Task>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl TaskPage {
    pub fn new(items: Vec<Task>, total: i64, page: i64, page_size: i64) -> Self {
        let total_pages = if total > 0 {
            (total as u64).div_ceil(page_size as u64) as i64
        } else {
            0
        };
        Self {
            items,
            total,
            page,
            page_size,
            total_pages,
        }
    }
}

/// Partial update for a task. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
}

/// A chat session owned by a single subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Role of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl std::str::FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            _ => Err(format!("Invalid message role: {}", s)),
        }
    }
}

/// A single turn in a conversation. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    /// Recorded tool invocations for this turn, if any.
    pub tool_calls: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// A conversation together with its full message history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationDetail {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}

/// Validate and normalize a task title: trimmed, 1..=255 characters.
pub fn validate_title(title: &str) -> DbResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(DbError::validation("Title is required and cannot be empty"));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(DbError::validation(format!(
            "Title must be {} characters or less",
            MAX_TITLE_LEN
        )));
    }
    Ok(trimmed.to_string())
}

/// Normalize an optional description: empty strings become `None`.
pub fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.is_empty())
}
