//! Error taxonomy for tool invocations.
//!
//! Every tool call produces either a domain object or one of these errors,
//! rendered to callers in the uniform shape
//! `{ "error": { "code", "message", "details" } }`.

use miette::Diagnostic;
use serde_json::{Value, json};
use thiserror::Error;

use crate::db::DbError;

/// Tool invocation errors.
///
/// `Database` keeps the backend detail for server-side logs; callers only
/// ever see the generic message from [`ToolError::public_message`].
#[derive(Error, Diagnostic, Debug)]
pub enum ToolError {
    #[error("Invalid, expired, or missing credential")]
    #[diagnostic(code(todo_mcp::tools::authentication))]
    Authentication,

    #[error("Validation error: {0}")]
    #[diagnostic(code(todo_mcp::tools::validation))]
    Validation(String),

    #[error("{resource} not found: '{id}'")]
    #[diagnostic(code(todo_mcp::tools::not_found))]
    NotFound { resource: &'static str, id: String },

    #[error("Rate limit exceeded, retry after {retry_after_secs}s")]
    #[diagnostic(code(todo_mcp::tools::rate_limited))]
    RateLimited { retry_after_secs: i64 },

    #[error("Database error: {0}")]
    #[diagnostic(code(todo_mcp::tools::database))]
    Database(String),

    #[error("Unknown tool: '{0}'")]
    #[diagnostic(code(todo_mcp::tools::unknown_tool))]
    UnknownTool(String),
}

impl ToolError {
    /// Authentication failures are deliberately uniform: missing, malformed,
    /// bad-signature, and expired credentials all produce this value.
    pub fn authentication() -> Self {
        ToolError::Authentication
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ToolError::Validation(message.into())
    }

    /// Stable machine-readable code for the uniform error shape.
    pub fn code(&self) -> &'static str {
        match self {
            ToolError::Authentication => "authentication_error",
            ToolError::Validation(_) => "validation_error",
            ToolError::NotFound { .. } => "not_found",
            ToolError::RateLimited { .. } => "rate_limited",
            ToolError::Database(_) => "database_error",
            ToolError::UnknownTool(_) => "unknown_tool",
        }
    }

    /// Message safe to show outside the trust boundary. Backend detail for
    /// `Database` stays in server logs only.
    pub fn public_message(&self) -> String {
        match self {
            ToolError::Database(_) => {
                "A database error occurred, please try again".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Structured details for the uniform error shape, if any.
    pub fn details(&self) -> Option<Value> {
        match self {
            ToolError::NotFound { resource, id } => {
                Some(json!({ "resource": resource, "id": id }))
            }
            ToolError::RateLimited { retry_after_secs } => {
                Some(json!({ "retry_after_secs": retry_after_secs }))
            }
            ToolError::UnknownTool(name) => Some(json!({ "tool": name })),
            _ => None,
        }
    }

    /// Render the uniform error body.
    pub fn to_body(&self) -> Value {
        json!({
            "error": {
                "code": self.code(),
                "message": self.public_message(),
                "details": self.details(),
            }
        })
    }
}

impl From<DbError> for ToolError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { entity, id } => ToolError::NotFound {
                resource: entity,
                id,
            },
            DbError::Validation { message } => ToolError::Validation(message),
            other => ToolError::Database(other.to_string()),
        }
    }
}

/// Result type for tool invocations.
pub type ToolResult<T> = Result<T, ToolError>;
