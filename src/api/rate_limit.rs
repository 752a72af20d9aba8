//! Per-subject sliding-window rate limiter.
//!
//! Tracks request timestamps per authenticated subject and rejects a
//! request when the window already holds the configured maximum. A limit
//! of zero disables the limiter entirely. The limiter is injected through
//! application state so tests can swap in tight or disabled limits.

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::tools::ToolError;

pub struct RateLimiter {
    max_requests: u32,
    window_secs: i64,
    hits: DashMap<Uuid, Vec<i64>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window_secs: i64) -> Self {
        Self {
            max_requests,
            window_secs,
            hits: DashMap::new(),
        }
    }

    /// Record a hit for `subject`, or reject it if the window is full.
    pub fn check(&self, subject: Uuid) -> Result<(), ToolError> {
        self.check_at(subject, Utc::now().timestamp())
    }

    /// Window arithmetic with an injected clock, used directly by tests.
    pub fn check_at(&self, subject: Uuid, now: i64) -> Result<(), ToolError> {
        if self.max_requests == 0 {
            return Ok(());
        }

        let mut timestamps = self.hits.entry(subject).or_default();
        timestamps.retain(|t| now - t < self.window_secs);

        if timestamps.len() >= self.max_requests as usize {
            let oldest = timestamps.first().copied().unwrap_or(now);
            let retry_after_secs = (oldest + self.window_secs - now).max(1);
            return Err(ToolError::RateLimited { retry_after_secs });
        }

        timestamps.push(now);
        Ok(())
    }
}
