//! SQLite implementation of the task and conversation stores.

mod connection;
mod conversation;
mod task;


pub use connection::SqliteDatabase;
pub use conversation::SqliteConversationRepository;
pub use task::SqliteTaskRepository;
