//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::ScheduleError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// Missing or invalid bearer token
    Unauthorized(String),
    /// Error raised by the service layer
    Service(ScheduleError),
}

fn service_status(err: &ScheduleError) -> (StatusCode, &'static str) {
    match err {
        ScheduleError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ScheduleError::FormatInvalid { .. } => (StatusCode::BAD_REQUEST, "FORMAT_INVALID"),
        ScheduleError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        ScheduleError::InternalStorage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
        ScheduleError::BulkAborted { cause, .. } => service_status(cause),
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Service(e) => service_status(e).0,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            AppError::BadRequest(msg) => ApiError::new("BAD_REQUEST", msg),
            AppError::Unauthorized(msg) => ApiError::new("UNAUTHORIZED", msg),
            AppError::Service(e) => {
                let (_, code) = service_status(&e);
                // Storage details stay in the server log
                let message = match e.root_cause() {
                    ScheduleError::InternalStorage(_) => "storage failure".to_string(),
                    cause => cause.to_string(),
                };
                let error = ApiError::new(code, message);
                match e.bulk_index() {
                    Some(index) => error.with_details(format!("index={}", index)),
                    None => error,
                }
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        AppError::Service(err)
    }
}
