use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{LimiterError, RateLimitDecision, RateLimitPolicy, RateLimiter};

const KEY_PREFIX: &str = "rsvp:ratelimit";

#[derive(Debug, Deserialize)]
struct PipelineEntry {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Fixed window counter kept in a Redis REST service (Upstash pipeline API)
pub struct RestRateLimiter {
    client: Client,
    url: String,
    token: String,
    policy: RateLimitPolicy,
}

impl RestRateLimiter {
    pub fn new(url: impl Into<String>, token: impl Into<String>, policy: RateLimitPolicy) -> Self {
        Self {
            client: Client::new(),
            url: url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            policy,
        }
    }
}

#[async_trait]
impl RateLimiter for RestRateLimiter {
    async fn limit(&self, client_id: &str) -> Result<RateLimitDecision, LimiterError> {
        let key = format!("{}:{}", KEY_PREFIX, client_id);
        let window_secs = self.policy.window.as_secs().max(1);
        let commands = json!([
            ["INCR", key],
            ["EXPIRE", key, window_secs, "NX"]
        ]);

        let response = self
            .client
            .post(format!("{}/pipeline", self.url))
            .bearer_auth(&self.token)
            .json(&commands)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach rate limit backend: {}", e);
                LimiterError::Request(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LimiterError::Request(format!("{} - {}", status, body)));
        }

        let entries: Vec<PipelineEntry> = response
            .json()
            .await
            .map_err(|e| LimiterError::InvalidResponse(e.to_string()))?;

        let incr = entries
            .first()
            .ok_or_else(|| LimiterError::InvalidResponse("empty pipeline response".into()))?;
        if let Some(err) = &incr.error {
            return Err(LimiterError::InvalidResponse(err.clone()));
        }
        let count = incr
            .result
            .as_ref()
            .and_then(|v| v.as_u64())
            .ok_or_else(|| LimiterError::InvalidResponse("INCR returned no count".into()))?;

        debug!("Rate limit counter for {} is {}", key, count);
        Ok(self.policy.decide(count))
    }
}
