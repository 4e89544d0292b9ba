//! Resend email provider over its HTTP API.

use super::{EmailError, EmailMessage, EmailProvider};
use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;

pub const RESEND_API_URL: &str = "https://api.resend.com";

/// Resend email provider.
pub struct ResendProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ResendProvider {
    /// `base_url` is normally [`RESEND_API_URL`]; tests point it at a local server
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl EmailProvider for ResendProvider {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach email provider: {}", e);
                EmailError::SendFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!("Email accepted by provider for {:?}", message.to);
        Ok(())
    }
}
