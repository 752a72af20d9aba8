//! Database layer.
//!
//! # Architecture
//!
//! - `error`: storage-agnostic error types
//! - `models`: domain entities (Task, Conversation, Message)
//! - `sqlite`: SQLx-backed repositories, always scoped by owner id

mod error;
mod models;
mod sqlite;

#[cfg(test)]
mod models_test;

pub use error::{DbError, DbResult};
pub use models::*;
pub use sqlite::{SqliteConversationRepository, SqliteDatabase, SqliteTaskRepository};
