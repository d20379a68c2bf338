use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::service::automation::ReportError;
use crate::service::calendar::CalendarError;
use crate::service::notify::NotifyError;
use crate::service::storage::StorageError;

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// A collaborator (storage, webhook) is not configured.
    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    BadRequest(String),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: &'static str,
    message: String,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Report(ReportError::Notify(NotifyError::NotConfigured)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Report(ReportError::Trends(_)) | AppError::Report(ReportError::Notify(_)) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Calendar(CalendarError::Fetch(_))
            | AppError::Calendar(CalendarError::Csv(_)) => StatusCode::BAD_GATEWAY,
            AppError::Calendar(CalendarError::Storage(StorageError::NotConfigured(_))) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Calendar(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }

        let body = ErrorResponse {
            status: "error",
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
