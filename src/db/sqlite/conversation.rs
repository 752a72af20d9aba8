//! SQLite conversation repository.
//!
//! Conversations are append-only: turns are added, never edited or removed.
//! Message ownership is inherited from the conversation.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::db::{
    Conversation, ConversationDetail, DbError, DbResult, MAX_MESSAGE_LEN, MAX_TITLE_LEN, Message,
    MessageRole,
};

/// SQLx-backed conversation repository.
pub struct SqliteConversationRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl<'a> SqliteConversationRepository<'a> {
    /// Create a new conversation for the given owner.
    pub async fn create(&self, owner_id: Uuid, title: Option<String>) -> DbResult<Conversation> {
        if let Some(title) = &title
            && title.chars().count() > MAX_TITLE_LEN
        {
            return Err(DbError::validation(format!(
                "Conversation title must be {} characters or less",
                MAX_TITLE_LEN
            )));
        }

        let now = Utc::now();
        let conversation = Conversation {
            id: Uuid::new_v4(),
            owner_id,
            title,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO conversation (id, owner_id, title, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(conversation.id.to_string())
        .bind(conversation.owner_id.to_string())
        .bind(&conversation.title)
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .execute(self.pool)
        .await
        .map_err(DbError::database)?;

        Ok(conversation)
    }

    /// List an owner's conversations, most recently updated first.
    pub async fn list(&self, owner_id: Uuid) -> DbResult<Vec<Conversation>> {
        let rows = sqlx::query(
            "SELECT id, owner_id, title, created_at, updated_at
             FROM conversation WHERE owner_id = ?
             ORDER BY updated_at DESC, rowid DESC",
        )
        .bind(owner_id.to_string())
        .fetch_all(self.pool)
        .await
        .map_err(DbError::database)?;

        rows.iter().map(row_to_conversation).collect()
    }

    /// Get a conversation with its messages, oldest turn first.
    pub async fn get(&self, owner_id: Uuid, id: Uuid) -> DbResult<ConversationDetail> {
        let conversation = self.get_owned(owner_id, id).await?;

        let rows = sqlx::query(
            "SELECT id, conversation_id, role, content, tool_calls, created_at
             FROM message WHERE conversation_id = ?
             ORDER BY created_at ASC, rowid ASC",
        )
        .bind(id.to_string())
        .fetch_all(self.pool)
        .await
        .map_err(DbError::database)?;

        let messages = rows.iter().map(row_to_message).collect::<DbResult<_>>()?;

        Ok(ConversationDetail {
            conversation,
            messages,
        })
    }

    /// Append a turn to a conversation and refresh its `updated_at`.
    pub async fn append_message(
        &self,
        owner_id: Uuid,
        conversation_id: Uuid,
        role: MessageRole,
        content: &str,
        tool_calls: Option<serde_json::Value>,
    ) -> DbResult<Message> {
        if content.is_empty() {
            return Err(DbError::validation("Message content cannot be empty"));
        }
        if content.chars().count() > MAX_MESSAGE_LEN {
            return Err(DbError::validation(format!(
                "Message content must be {} characters or less",
                MAX_MESSAGE_LEN
            )));
        }

        // Ownership check doubles as the existence check.
        self.get_owned(owner_id, conversation_id).await?;

        let tool_calls_json = tool_calls
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(DbError::database)?;

        let message = Message {
            id: Uuid::new_v4(),
            conversation_id,
            role,
            content: content.to_string(),
            tool_calls,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO message (id, conversation_id, role, content, tool_calls, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(message.id.to_string())
        .bind(message.conversation_id.to_string())
        .bind(message.role.to_string())
        .bind(&message.content)
        .bind(tool_calls_json)
        .bind(message.created_at)
        .execute(self.pool)
        .await
        .map_err(DbError::database)?;

        sqlx::query("UPDATE conversation SET updated_at = ? WHERE id = ?")
            .bind(message.created_at)
            .bind(conversation_id.to_string())
            .execute(self.pool)
            .await
            .map_err(DbError::database)?;

        Ok(message)
    }

    async fn get_owned(&self, owner_id: Uuid, id: Uuid) -> DbResult<Conversation> {
        let row = sqlx::query(
            "SELECT id, owner_id, title, created_at, updated_at
             FROM conversation WHERE id = ? AND owner_id = ?",
        )
        .bind(id.to_string())
        .bind(owner_id.to_string())
        .fetch_optional(self.pool)
        .await
        .map_err(DbError::database)?;

        let row = row.ok_or(DbError::NotFound {
            entity: "Conversation",
            id: id.to_string(),
        })?;

        row_to_conversation(&row)
    }
}

fn row_to_conversation(row: &sqlx::sqlite::SqliteRow) -> DbResult<Conversation> {
    let id: String = row.try_get("id").map_err(DbError::database)?;
    let owner_id: String = row.try_get("owner_id").map_err(DbError::database)?;

    Ok(Conversation {
        id: Uuid::parse_str(&id).map_err(DbError::database)?,
        owner_id: Uuid::parse_str(&owner_id).map_err(DbError::database)?,
        title: row.try_get("title").map_err(DbError::database)?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(DbError::database)?,
        updated_at: row
            .try_get::<DateTime<Utc>, _>("updated_at")
            .map_err(DbError::database)?,
    })
}

fn row_to_message(row: &sqlx::sqlite::SqliteRow) -> DbResult<Message> {
    let id: String = row.try_get("id").map_err(DbError::database)?;
    let conversation_id: String = row.try_get("conversation_id").map_err(DbError::database)?;
    let role: String = row.try_get("role").map_err(DbError::database)?;
    let tool_calls: Option<String> = row.try_get("tool_calls").map_err(DbError::database)?;

    Ok(Message {
        id: Uuid::parse_str(&id).map_err(DbError::database)?,
        conversation_id: Uuid::parse_str(&conversation_id).map_err(DbError::database)?,
        role: role.parse().map_err(DbError::database)?,
        content: row.try_get("content").map_err(DbError::database)?,
        tool_calls: tool_calls
            .map(|s| serde_json::from_str(&s))
            .transpose()
            .map_err(DbError::database)?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(DbError::database)?,
    })
}
