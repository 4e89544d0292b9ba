use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub mod memory;
pub mod rest;

pub use memory::FixedWindowLimiter;
pub use rest::RestRateLimiter;

#[derive(Error, Debug)]
pub enum LimiterError {
    #[error("Rate limit backend request failed: {0}")]
    Request(String),

    #[error("Unexpected rate limit backend response: {0}")]
    InvalidResponse(String),
}

/// Verdict for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub success: bool,
    pub remaining: u32,
}

/// Requests allowed per client within a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitPolicy {
    fn decide(&self, count: u64) -> RateLimitDecision {
        let max = u64::from(self.max_requests);
        RateLimitDecision {
            success: count <= max,
            remaining: max.saturating_sub(count) as u32,
        }
    }
}

/// Counts requests per client id
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn limit(&self, client_id: &str) -> Result<RateLimitDecision, LimiterError>;
}
