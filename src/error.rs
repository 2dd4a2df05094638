use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Username is already taken.")]
    DuplicateUsername,
    #[error("An employee with this email already exists.")]
    DuplicateEmail,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn employee_not_found(id: i64) -> Self {
        AppError::NotFound(format!("Employee does not exist with given id: {id}"))
    }
}

/// Maps a unique-constraint violation to `duplicate`, everything else to `Database`.
pub(crate) fn unique_violation_as(err: sqlx::Error, duplicate: AppError) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => duplicate,
        _ => AppError::Database(err),
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateUsername | AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Database(e) => {
                error!(error = ?e, "Database error");
                "Internal server error".to_string()
            }
            AppError::Internal(msg) => {
                error!(error = %msg, "Internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}
