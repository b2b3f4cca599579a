//! Crate-wide error taxonomy and its mapping onto the HTTP error envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

use crate::api::envelope::ApiResponse;

/// Field-level validation failures, keyed by field name.
pub type FieldErrors = HashMap<String, Vec<String>>;

/// Errors surfaced to HTTP clients. Internal infrastructure code uses
/// `anyhow::Result`; handlers convert into this enum at the boundary.
#[derive(Debug)]
pub enum ApiError {
    Validation(FieldErrors),
    SessionNotFound(Uuid),
    AnalysisNotReady(Uuid),
    RateLimited { retry_after: Duration },
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn validation_single(field: &str, message: impl Into<String>) -> Self {
        let mut details = FieldErrors::new();
        details.insert(field.to_string(), vec![message.into()]);
        ApiError::Validation(details)
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::SessionNotFound(_) => "SESSION_NOT_FOUND",
            ApiError::AnalysisNotReady(_) => "ANALYSIS_NOT_READY",
            ApiError::RateLimited { .. } => "RATE_LIMIT_EXCEEDED",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AnalysisNotReady(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Validation(_) => "One or more fields failed validation".to_string(),
            ApiError::SessionNotFound(id) => format!("Session {id} was not found"),
            ApiError::AnalysisNotReady(id) => {
                format!("Analysis for session {id} has not been computed yet")
            }
            ApiError::RateLimited { retry_after } => format!(
                "Too many requests; retry after {} seconds",
                retry_after.as_secs().max(1)
            ),
            ApiError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, ApiError::Internal(_)) {
            if let ApiError::Internal(ref err) = self {
                tracing::error!(error = %err, "internal error");
            }
        }

        let status = self.status();
        let code = self.code();
        let message = self.message();
        let details = match &self {
            ApiError::Validation(details) => Some(details.clone()),
            _ => None,
        };
        let retry_after = match &self {
            ApiError::RateLimited { retry_after } => Some(retry_after.as_secs().max(1)),
            _ => None,
        };

        let body: ApiResponse<()> = ApiResponse::error(code, message, details);
        let mut response = (status, Json(body)).into_response();

        if let Some(secs) = retry_after {
            if let Ok(value) = secs.to_string().parse() {
                response.headers_mut().insert("Retry-After", value);
            }
        }

        response
    }
}
