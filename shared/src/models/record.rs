use serde::Serialize;
use uuid::Uuid;

use super::{now_str, RsvpSubmission};

/// Row appended to the guest spreadsheet for each accepted RSVP
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SheetRecord {
    pub submission_id: String,
    pub submitted_at: String,
    #[serde(flatten)]
    pub submission: RsvpSubmission,
    pub client_ip: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<serde_json::Value>,
}

impl SheetRecord {
    pub fn new(
        submission: RsvpSubmission,
        client_ip: &str,
        location: String,
        telemetry: Option<serde_json::Value>,
    ) -> Self {
        Self {
            submission_id: Uuid::new_v4().to_string(),
            submitted_at: now_str(),
            submission,
            client_ip: client_ip.to_string(),
            location,
            telemetry,
        }
    }
}
