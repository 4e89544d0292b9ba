use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use rsvp_shared::validation::ValidationReport;
use serde_json::json;
use thiserror::Error;

const GENERIC_SERVER_ERROR: &str = "Internal server error";

/// Outcomes of an RSVP request other than success
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Too many requests")]
    RateLimited,

    #[error("Validation failed")]
    ValidationFailed(ValidationReport),

    /// Details are logged and never sent to the client
    #[error("Server error: {0}")]
    ServerError(String),
}

impl AppError {
    pub fn server_error(message: impl Into<String>) -> Self {
        AppError::ServerError(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            AppError::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::RateLimited => json!({
                "success": false,
                "error": "Too many requests, please try again later",
            }),
            AppError::ValidationFailed(report) => json!({
                "success": false,
                "error": "Invalid data",
                "details": report,
            }),
            AppError::ServerError(detail) => {
                error!("Unhandled error while processing RSVP: {}", detail);
                json!({
                    "success": false,
                    "error": GENERIC_SERVER_ERROR,
                })
            }
        };
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_server_error_hides_details() {
        let (status, body) = body_json(AppError::server_error("secret stack trace")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], GENERIC_SERVER_ERROR);
        assert!(!body.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn test_rate_limited_is_429() {
        let (status, body) = body_json(AppError::RateLimited).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["success"], false);
        assert!(body.get("details").is_none());
    }
}
