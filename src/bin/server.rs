//! Todo MCP server binary.
//!
//! Opens the SQLite store, runs migrations, and serves the REST and MCP
//! surfaces from a single listener. The JWT secret is taken from the
//! `TODO_JWT_SECRET` environment variable so it never appears on the
//! command line.

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use miette::Diagnostic;
use thiserror::Error;
use todo_mcp::api::{self, AppState, Config, RateLimiter};
use todo_mcp::auth::TokenValidator;
use todo_mcp::db::{DbError, SqliteDatabase};

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error("Database error: {0}")]
    #[diagnostic(code(todo_mcp::binary::database))]
    Database(#[from] DbError),

    #[error("I/O error: {0}")]
    #[diagnostic(code(todo_mcp::binary::io))]
    Io(#[from] std::io::Error),

    #[error("TODO_JWT_SECRET must be set to a non-empty value")]
    #[diagnostic(code(todo_mcp::binary::config))]
    MissingSecret,
}

#[derive(Parser)]
#[command(name = "todo-mcpd")]
#[command(author, version, about = "Todo MCP and REST server", long_about = None)]
struct Cli {
    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Database file path
    #[arg(long, default_value = "todo.db")]
    db: PathBuf,

    /// Maximum chat messages per subject per window (0 disables limiting)
    #[arg(long, default_value = "10")]
    rate_limit: u32,

    /// Rate limit window in seconds
    #[arg(long, default_value = "60")]
    rate_window_secs: i64,
}

#[tokio::main]
async fn main() -> Result<(), BinaryError> {
    api::init_tracing();

    let cli = Cli::parse();

    let secret = std::env::var("TODO_JWT_SECRET")
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or(BinaryError::MissingSecret)?;

    if let Some(parent) = cli.db.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let db = SqliteDatabase::open(&cli.db).await?;
    db.migrate().await?;

    let state = AppState::new(
        Arc::new(db),
        TokenValidator::new(secret),
        Arc::new(RateLimiter::new(cli.rate_limit, cli.rate_window_secs)),
    );

    api::run(
        &Config {
            host: cli.host,
            port: cli.port,
        },
        state,
    )
    .await?;

    Ok(())
}
