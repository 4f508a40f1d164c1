use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::storage::StorageError;
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error body returned when a failure is not redirected back.
#[derive(Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `NOT_FOUND`,
    /// `INVALID_CREDENTIALS`, `STORAGE_ERROR`, `PERSISTENCE_ERROR`, `INTERNAL_ERROR`.
    pub code: &'static str,
    /// Human-readable error description. Never carries internal error text.
    pub message: String,
}

/// User-facing message of a failed request.
///
/// Attached to the response extensions so `middleware::redirect_back_on_failure`
/// can turn the failure into a redirect with an error flash.
#[derive(Debug, Clone)]
pub struct FailureNotice(pub String);

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotFound(String),
    InvalidCredentials,
    Storage(StorageError),
    Persistence(DbErr),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "INVALID_CREDENTIALS",
                    message: "These credentials do not match our records.".into(),
                },
            ),
            AppError::Storage(err) => {
                tracing::error!("Storage error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "STORAGE_ERROR",
                        message: "The image could not be saved. Please try again.".into(),
                    },
                )
            }
            AppError::Persistence(err) => {
                tracing::error!("Persistence error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "PERSISTENCE_ERROR",
                        message: "The brand could not be saved. Please try again.".into(),
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let redirectable = !matches!(self, AppError::NotFound(_));
        let (status, body) = self.status_and_body();

        let notice = redirectable.then(|| FailureNotice(body.message.clone()));
        let mut response = (status, Json(body)).into_response();
        if let Some(notice) = notice {
            response.extensions_mut().insert(notice);
        }
        response
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Persistence(err)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}
