//! Error types for the report server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inspection_report::ReportError;
use report_assembly::AssemblyError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    NotImplemented(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Generation timed out after {0}ms")]
    Timeout(u64),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            ApiError::GenerationFailed(_) | ApiError::Timeout(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        } else {
            tracing::debug!(%status, error = %self, "request rejected");
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            err if err.is_client_error() => ApiError::InvalidRequest(err.to_string()),
            ReportError::BackendUnavailable(msg) => ApiError::NotImplemented(format!(
                "PDF generation is not available on this server: {}",
                msg
            )),
            other => ApiError::GenerationFailed(other.to_string()),
        }
    }
}

impl From<AssemblyError> for ApiError {
    fn from(err: AssemblyError) -> Self {
        match err {
            AssemblyError::MissingField(_) => ApiError::InvalidRequest(err.to_string()),
            other => ApiError::GenerationFailed(other.to_string()),
        }
    }
}
