//! Confirmation email sending.

mod resend;
mod templates;

pub use resend::{ResendProvider, RESEND_API_URL};
pub use templates::RsvpEmailContent;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Email sending error
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Email provider rejected the message with {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// File attached to an outgoing email, either fetched by the provider from
/// `path` or inlined as base64 `content`
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// A fully rendered transactional email
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl EmailMessage {
    pub fn new(from: String, to: &str, content: RsvpEmailContent) -> Self {
        Self {
            from,
            to: vec![to.to_string()],
            subject: content.subject,
            html: content.html,
            text: Some(content.text),
            attachments: Vec::new(),
        }
    }
}

/// Formats a sender as `Name <address>`
pub fn format_sender(address: &str, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{} <{}>", name, address),
        None => address.to_string(),
    }
}

/// Trait for email providers
#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError>;
}
