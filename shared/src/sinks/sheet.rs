use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;

use super::{SheetSink, SinkError};
use crate::models::SheetRecord;

/// Posts each record to a spreadsheet web hook (e.g. an Apps Script web app)
pub struct WebhookSheetSink {
    client: Client,
    url: String,
}

impl WebhookSheetSink {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url)
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl SheetSink for WebhookSheetSink {
    async fn append(&self, record: &SheetRecord) -> Result<(), SinkError> {
        info!(
            "Appending submission_id={} to guest sheet",
            record.submission_id
        );

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(record)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach sheet endpoint: {}", e);
                SinkError::Request(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!("Sheet accepted submission_id={}", record.submission_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceStatus, RsvpSubmission};
    use mockito::Matcher;
    use serde_json::json;

    fn record() -> SheetRecord {
        let submission = RsvpSubmission {
            first_name: "Mario".to_string(),
            last_name: "Rossi".to_string(),
            attendance_status: Some(AttendanceStatus::No),
            privacy_accepted: true,
            ..Default::default()
        };
        SheetRecord::new(submission, "127.0.0.1", "unknown".to_string(), None)
    }

    #[tokio::test]
    async fn test_append_posts_record_as_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/exec")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(json!({
                "firstName": "Mario",
                "attendanceStatus": "no",
                "clientIp": "127.0.0.1"
            })))
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let sink = WebhookSheetSink::new(format!("{}/exec", server.url()));
        sink.append(&record()).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/exec")
            .with_status(503)
            .with_body("quota exceeded")
            .create_async()
            .await;

        let sink = WebhookSheetSink::new(format!("{}/exec", server.url()));
        let err = sink.append(&record()).await.unwrap_err();

        match err {
            SinkError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "quota exceeded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_request_error() {
        let sink = WebhookSheetSink::new("http://127.0.0.1:9/exec");
        let err = sink.append(&record()).await.unwrap_err();
        assert!(matches!(err, SinkError::Request(_)));
    }
}
