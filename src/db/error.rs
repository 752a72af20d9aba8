//! Database error types.
//!
//! Storage-backend agnostic errors for the task and conversation stores.
//! Uses miette for diagnostic output and thiserror for derive macros.

use miette::Diagnostic;
use thiserror::Error;

/// Database operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("{entity} not found: '{id}'")]
    #[diagnostic(code(todo_mcp::db::not_found))]
    NotFound { entity: &'static str, id: String },

    #[error("Validation error: {message}")]
    #[diagnostic(code(todo_mcp::db::validation))]
    Validation { message: String },

    #[error("Database error: {message}")]
    #[diagnostic(code(todo_mcp::db::database_error))]
    Database { message: String },

    #[error("Migration error: {message}")]
    #[diagnostic(code(todo_mcp::db::migration_error))]
    Migration { message: String },

    #[error("Connection error: {message}")]
    #[diagnostic(code(todo_mcp::db::connection_error))]
    Connection { message: String },
}

impl DbError {
    pub(crate) fn database(e: impl std::fmt::Display) -> Self {
        DbError::Database {
            message: e.to_string(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        DbError::Validation {
            message: message.into(),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
