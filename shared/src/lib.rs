//! Shared types for the talent marketplace
//!
//! Common types used by the server and its clients: domain models,
//! the unified error system, geo math and time helpers.

pub mod error;
pub mod geo;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
