use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use log::{debug, error, info, warn};
use rsvp_shared::email::{EmailMessage, RsvpEmailContent};
use rsvp_shared::geo::UNKNOWN_LOCATION;
use rsvp_shared::models::{AttendanceStatus, RsvpRequest, RsvpSubmission, SheetRecord};
use rsvp_shared::validation::validate;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Identifier used when the request carries no forwarded address
pub const LOOPBACK_CLIENT: &str = "127.0.0.1";

/// First address of `x-forwarded-for`, or the loopback sentinel
pub fn client_identifier(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(LOOPBACK_CLIENT)
        .to_string()
}

/// Uppercases the first character, for greetings
pub fn capitalize_first(name: &str) -> String {
    let name = name.trim();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Folds an undecided guest's reason into the notes
pub fn merge_maybe_reason(mut submission: RsvpSubmission) -> RsvpSubmission {
    if submission.attendance_status != Some(AttendanceStatus::Maybe) {
        return submission;
    }
    let reason = match submission.maybe_reason.as_deref().map(str::trim) {
        Some(reason) if !reason.is_empty() => reason.to_string(),
        _ => return submission,
    };

    let tag = format!("[Maybe: {}]", reason);
    submission.notes = match submission.notes.as_deref().map(str::trim) {
        Some(notes) if !notes.is_empty() => Some(format!("{} {}", tag, notes)),
        _ => Some(tag),
    };
    submission
}

/// Only attending guests get a confirmation email
fn sends_confirmation(status: AttendanceStatus) -> bool {
    status == AttendanceStatus::Yes
}

// POST /api/rsvp
pub async fn submit_rsvp(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>> {
    let client_ip = client_identifier(&headers);

    match state.limiter.limit(&client_ip).await {
        Ok(decision) if !decision.success => {
            warn!("Rate limit exhausted for client {}", client_ip);
            return Err(AppError::RateLimited);
        }
        Ok(decision) => debug!(
            "Rate limit ok for client {}, {} remaining",
            client_ip, decision.remaining
        ),
        // Limiter outages fail open
        Err(e) => warn!("Rate limiter unavailable, allowing request: {}", e),
    }

    let request: RsvpRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::server_error(format!("Malformed RSVP body: {}", e)))?;

    let report = validate(&request.rsvp_data, &state.rules);
    if !report.is_valid() {
        info!(
            "Rejected RSVP from {}: invalid fields {:?}",
            client_ip,
            report.fields()
        );
        return Err(AppError::ValidationFailed(report));
    }

    let submission = merge_maybe_reason(request.rsvp_data);
    info!(
        "Accepted RSVP from {} with attendance={}",
        client_ip,
        submission
            .attendance_status
            .map(|s| s.as_str())
            .unwrap_or("unknown")
    );

    fan_out(&state, &submission, &client_ip, request.telemetry).await;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// Runs the sheet write and the email send side by side. Each branch logs
/// its own failure; neither can fail the request.
async fn fan_out(
    state: &AppState,
    submission: &RsvpSubmission,
    client_ip: &str,
    telemetry: Option<serde_json::Value>,
) {
    let sheet_task = async {
        let Some(sink) = &state.sheet else {
            return;
        };
        let location = match &state.geo {
            Some(geo) => geo.locate(client_ip).await,
            None => UNKNOWN_LOCATION.to_string(),
        };
        let record = SheetRecord::new(submission.clone(), client_ip, location, telemetry);
        if let Err(e) = sink.append(&record).await {
            error!(
                "Failed to record submission_id={} in sheet: {}",
                record.submission_id, e
            );
        }
    };

    let email_task = async {
        let Some(dispatch) = &state.email else {
            return;
        };
        let (Some(status), Some(to)) = (submission.attendance_status, submission.email_address())
        else {
            return;
        };
        if !sends_confirmation(status) {
            return;
        }

        let content = RsvpEmailContent::for_status(
            status,
            &capitalize_first(&submission.first_name),
            &dispatch.couple_name,
            dispatch.image_url.as_deref(),
        );
        let message = EmailMessage::new(dispatch.from.clone(), to, content);
        match dispatch.provider.send(&message).await {
            Ok(()) => info!("Confirmation email sent to {}", to),
            Err(e) => error!("Failed to send confirmation email to {}: {}", to, e),
        }
    };

    tokio::join!(sheet_task, email_task);
}
