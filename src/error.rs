use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Application errors surfaced over HTTP as `{ message, internal_code }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidParameters(String),
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParameters(message.into())
    }

    pub fn internal_code(&self) -> &'static str {
        match self {
            AppError::InvalidParameters(_) => "invalid_params",
            AppError::Database(_) => "database_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidParameters(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    internal_code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, code = self.internal_code(), "request failed");
        } else {
            warn!(error = %self, code = self.internal_code(), "request rejected");
        }
        let body = ErrorBody {
            message: self.to_string(),
            internal_code: self.internal_code(),
        };
        (status, Json(body)).into_response()
    }
}
