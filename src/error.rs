use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::services::validation::FieldErrors;

#[derive(Error, Debug)]
pub enum AppError {
    /// Submitted form data failed validation. Handlers normally catch this
    /// and redisplay the form; it only reaches `into_response` by mistake.
    #[error("Invalid form data: {0}")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Password hashing error: {0}")]
    Password(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
            return (status, "Internal server error").into_response();
        }

        (status, self.to_string()).into_response()
    }
}
