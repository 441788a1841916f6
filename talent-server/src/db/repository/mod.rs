//! Repository Module
//!
//! Free functions over `&SqlitePool` (or a transaction connection), one
//! module per table group. Writes re-read the row so callers always get
//! the stored state back.

// Accounts
pub mod employee;
pub mod employer;
pub mod user;

// Catalog
pub mod badge;
pub mod favorite_list;
pub mod position;
pub mod venue;

// Marketplace
pub mod application;
pub mod invite;
pub mod shift;

// Time and pay
pub mod clockin;
pub mod payroll;

// Feedback
pub mod notification;
pub mod rating;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("Row not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
                RepoError::Validation(db_err.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
