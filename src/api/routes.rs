//! HTTP route table.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::mcp::create_mcp_service;
use crate::tools::ToolRegistry;

use super::handlers::{conversations, system, tasks};
use super::state::AppState;

/// Build the application router: REST routes plus the MCP service
/// mounted at `/mcp`.
pub fn build_router(state: AppState, cancellation_token: CancellationToken) -> Router {
    let registry = Arc::new(ToolRegistry::new(
        Arc::clone(&state.db),
        state.validator.clone(),
    ));
    let mcp_service = create_mcp_service(registry, cancellation_token);

    Router::new()
        .route("/health", get(system::health))
        .route("/tasks", post(tasks::create).get(tasks::list))
        .route(
            "/tasks/{id}",
            get(tasks::get).patch(tasks::update).delete(tasks::delete),
        )
        .route("/tasks/{id}/complete", post(tasks::complete))
        .route(
            "/conversations",
            post(conversations::create).get(conversations::list),
        )
        .route("/conversations/{id}", get(conversations::get))
        .route(
            "/conversations/{id}/messages",
            post(conversations::append_message),
        )
        .nest_service("/mcp", mcp_service)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
