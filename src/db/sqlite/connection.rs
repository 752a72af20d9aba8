//! SQLite connection pool and migration management.

use std::path::Path;

use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use super::conversation::SqliteConversationRepository;
use super::task::SqliteTaskRepository;
use crate::db::{DbError, DbResult};

// Embed migrations from migrations/ at compile time.
static MIGRATOR: Migrator = sqlx::migrate!();

/// SQLx-backed SQLite database.
///
/// Repositories borrow the pool, so a `SqliteDatabase` can be shared
/// behind an `Arc` across request handlers.
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Open (or create) a database at the given path.
    pub async fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    /// Create an in-memory database (useful for testing).
    ///
    /// Capped at one connection: each SQLite `:memory:` connection is its
    /// own database, so a larger pool would see different data per handle.
    pub async fn in_memory() -> DbResult<Self> {
        let options = SqliteConnectOptions::new()
            .in_memory(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    /// Run pending migrations.
    pub async fn migrate(&self) -> DbResult<()> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| DbError::Migration {
                message: e.to_string(),
            })
    }

    /// Get the task repository.
    pub fn tasks(&self) -> SqliteTaskRepository<'_> {
        SqliteTaskRepository { pool: &self.pool }
    }

    /// Get the conversation repository.
    pub fn conversations(&self) -> SqliteConversationRepository<'_> {
        SqliteConversationRepository { pool: &self.pool }
    }
}
