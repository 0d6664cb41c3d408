//! Global error handling module for the Anime Catalog API
//!
//! This module provides a unified error type that handles all application
//! errors and converts them to appropriate HTTP responses with consistent
//! JSON structure.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::db::{DbError, RepositoryError};
use crate::models::ApiError;
use crate::schedule::ScheduleError;

/// Application-wide error type that unifies all error sources
#[derive(Debug, Error)]
pub enum AppError {
    /// Schedule projection / countdown configuration errors
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Database connection errors
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// Repository errors (queries, document decoding)
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Validation errors (bad request)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// SQLx database errors (direct)
    #[error("Database query error: {0}")]
    SqlxError(#[from] sqlx::Error),
}

impl AppError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request - Validation errors
            AppError::Validation(_) => StatusCode::BAD_REQUEST,

            // 404 Not Found
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Repository(RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND,

            // 500 Internal Server Error - bad catalog data and infrastructure
            AppError::Schedule(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::SqlxError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),

            AppError::Schedule(schedule_err) => match schedule_err {
                ScheduleError::Configuration(msg) => {
                    format!("Invalid schedule configuration: {}", msg)
                }
            },

            AppError::Database(db_err) => match db_err {
                DbError::ConnectionError(_) => "Database connection error".to_string(),
                DbError::HealthCheckError(_) => "Database health check failed".to_string(),
            },

            AppError::Repository(repo_err) => match repo_err {
                RepositoryError::NotFound(msg) => msg.clone(),
                RepositoryError::DecodeError(_) => "Corrupt catalog document".to_string(),
                RepositoryError::DatabaseError(_) => "Database operation failed".to_string(),
            },

            AppError::SqlxError(_) => "Database operation failed".to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_response = ApiError::new(self.user_message());

        HttpResponse::build(status).json(error_response)
    }
}

/// Result type alias for operations that can fail with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_status_code() {
        let error = AppError::validation("Invalid input");
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_status_code() {
        let error = AppError::not_found("Post not found");
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_repository_not_found_status_code() {
        let error = AppError::Repository(RepositoryError::NotFound("post 7".to_string()));
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_schedule_error_is_internal() {
        let error = AppError::Schedule(ScheduleError::Configuration(
            "intervalDays must be positive, got 0".to_string(),
        ));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error.user_message().contains("intervalDays"));
    }

    #[test]
    fn test_internal_error_status_code() {
        let error = AppError::internal("Something went wrong");
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_error_message() {
        let error = AppError::validation("Page must be positive");
        assert_eq!(error.user_message(), "Page must be positive");
    }

    #[test]
    fn test_error_display() {
        let error = AppError::validation("test error");
        assert_eq!(format!("{}", error), "Validation error: test error");

        let error = AppError::not_found("post");
        assert_eq!(format!("{}", error), "Not found: post");
    }

    #[test]
    fn test_from_schedule_error() {
        let schedule_err = ScheduleError::Configuration("bad".to_string());
        let app_err: AppError = schedule_err.into();
        assert!(matches!(app_err, AppError::Schedule(_)));
    }

    #[test]
    fn test_from_db_error() {
        let db_err = DbError::HealthCheckError("test".to_string());
        let app_err: AppError = db_err.into();
        assert!(matches!(app_err, AppError::Database(_)));
    }

    #[test]
    fn test_decode_error_user_message() {
        let decode_err = serde_json::from_str::<crate::models::Post>("{}").unwrap_err();
        let app_err: AppError = AppError::Repository(RepositoryError::DecodeError(decode_err));
        assert_eq!(app_err.user_message(), "Corrupt catalog document");
        assert_eq!(app_err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
