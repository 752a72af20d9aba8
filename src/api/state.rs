//! Shared application state for the REST layer.

use std::sync::Arc;

use crate::auth::TokenValidator;
use crate::db::SqliteDatabase;

use super::rate_limit::RateLimiter;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<SqliteDatabase>,
    pub validator: TokenValidator,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(
        db: Arc<SqliteDatabase>,
        validator: TokenValidator,
        rate_limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            db,
            validator,
            rate_limiter,
        }
    }
}
