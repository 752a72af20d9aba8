//! REST API layer.
//!
//! Exposes the task and conversation stores over HTTP and mounts the MCP
//! service alongside them. All routes except `/health` require a bearer
//! credential; message appends additionally pass the rate limiter.

mod error;
mod extract;
mod handlers;
mod rate_limit;
mod routes;
mod state;

#[cfg(test)]
mod routes_test;

use std::net::{IpAddr, SocketAddr};

use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{ApiError, ApiResult};
pub use rate_limit::RateLimiter;
pub use routes::build_router;
pub use state::AppState;

/// Server bind configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
}

/// Initialize tracing with an env-filter fallback.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_mcp=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Bind and serve until a shutdown signal arrives.
pub async fn run(config: &Config, state: AppState) -> std::io::Result<()> {
    let cancellation_token = CancellationToken::new();
    let app = build_router(state, cancellation_token.clone());

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancellation_token))
        .await
}

async fn shutdown_signal(cancellation_token: CancellationToken) {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
    cancellation_token.cancel();
}
