use async_trait::async_trait;
use thiserror::Error;

use crate::models::SheetRecord;

pub mod sheet;

pub use sheet::WebhookSheetSink;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Sheet request failed: {0}")]
    Request(String),

    #[error("Sheet endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Destination that records accepted RSVPs
#[async_trait]
pub trait SheetSink: Send + Sync {
    async fn append(&self, record: &SheetRecord) -> Result<(), SinkError>;
}
