//! Utilities
//!
//! - [`AppError`] / [`ApiResponse`] - unified error types (from `shared::error`)
//! - [`extract`] - JSON extractors rendering rejections through [`AppError`]
//! - [`logger`] - tracing setup
//! - [`validation`] - text / number checks for handlers

pub mod error;
pub mod extract;
pub mod logger;
pub mod validation;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use extract::{AppJson, ValidJson};
