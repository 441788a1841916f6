//! Error conversions
//!
//! [`AppError`] from `shared::error` is the only error crossing the HTTP
//! boundary. Repository errors are mapped here.

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

use crate::db::repository::RepoError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                AppError::database("Database error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_error_mapping() {
        let e: AppError = RepoError::NotFound("Shift 1 not found".into()).into();
        assert_eq!(e.code, ErrorCode::NotFound);
        assert_eq!(e.http_status(), http::StatusCode::NOT_FOUND);

        let e: AppError = RepoError::Duplicate("email".into()).into();
        assert_eq!(e.http_status(), http::StatusCode::CONFLICT);

        let e: AppError = RepoError::Validation("bad".into()).into();
        assert_eq!(e.http_status(), http::StatusCode::BAD_REQUEST);

        let e: AppError = RepoError::Database("disk I/O error".into()).into();
        assert_eq!(e.code, ErrorCode::DatabaseError);
        // Internal details are not leaked to clients
        assert_eq!(e.message, "Database error");
    }
}
