use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::{LimiterError, RateLimitDecision, RateLimitPolicy, RateLimiter};

#[derive(Debug, Clone)]
struct Window {
    started: Instant,
    count: u64,
}

/// In-process fixed window counter, used when no external limiter is set up
pub struct FixedWindowLimiter {
    policy: RateLimitPolicy,
    windows: Mutex<HashMap<String, Window>>,
}

impl FixedWindowLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            windows: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RateLimiter for FixedWindowLimiter {
    async fn limit(&self, client_id: &str) -> Result<RateLimitDecision, LimiterError> {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        // Drop expired windows so the map only holds active clients
        windows.retain(|_, w| now.duration_since(w.started) < self.policy.window);

        let window = windows.entry(client_id.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        window.count += 1;

        Ok(self.policy.decide(window.count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn limiter() -> FixedWindowLimiter {
        FixedWindowLimiter::new(RateLimitPolicy {
            max_requests: 2,
            window: Duration::from_secs(60),
        })
    }

    #[tokio::test]
    async fn test_exhausts_after_max_requests() {
        let limiter = limiter();

        assert!(limiter.limit("10.0.0.1").await.unwrap().success);
        assert!(limiter.limit("10.0.0.1").await.unwrap().success);
        let third = limiter.limit("10.0.0.1").await.unwrap();
        assert!(!third.success);
        assert_eq!(third.remaining, 0);
    }

    #[tokio::test]
    async fn test_clients_are_counted_separately() {
        let limiter = limiter();

        limiter.limit("10.0.0.1").await.unwrap();
        limiter.limit("10.0.0.1").await.unwrap();
        assert!(!limiter.limit("10.0.0.1").await.unwrap().success);
        assert!(limiter.limit("10.0.0.2").await.unwrap().success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_resets_after_expiry() {
        let limiter = limiter();

        for _ in 0..3 {
            limiter.limit("10.0.0.1").await.unwrap();
        }
        assert!(!limiter.limit("10.0.0.1").await.unwrap().success);

        tokio::time::advance(Duration::from_secs(61)).await;

        let decision = limiter.limit("10.0.0.1").await.unwrap();
        assert!(decision.success);
        assert_eq!(decision.remaining, 1);
    }
}
