//! Input validation helpers
//!
//! DTO-level rules live on the models (`validator` derives); these cover
//! the checks handlers make on top of them.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Titles: shifts, venues, positions, badges, lists
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions, bios, comments
pub const MAX_NOTE_LEN: usize = 2000;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

// ── Pagination ──────────────────────────────────────────────────────

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 500;

/// Clamp `limit` / `offset` query values
pub fn page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Money and rates: finite and non-negative
pub fn validate_amount(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!("{field} must be a finite number")));
    }
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    Ok(())
}

/// Lowercase and trim an email, rejecting obviously invalid input
pub fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    if email.len() > MAX_EMAIL_LEN || !email.contains('@') || email.starts_with('@') {
        return Err(AppError::validation("Invalid email address").with_detail("field", "email"));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Bartender", "title", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "title", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"a".repeat(201), "title", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "bio", 10).is_ok());
        assert!(validate_optional_text(&Some("short".into()), "bio", 10).is_ok());
        assert!(validate_optional_text(&Some("much too long".into()), "bio", 10).is_err());
    }

    #[test]
    fn test_amount() {
        assert!(validate_amount(0.0, "rate").is_ok());
        assert!(validate_amount(15.5, "rate").is_ok());
        assert!(validate_amount(-1.0, "rate").is_err());
        assert!(validate_amount(f64::NAN, "rate").is_err());
        assert!(validate_amount(f64::INFINITY, "rate").is_err());
    }

    #[test]
    fn test_page() {
        assert_eq!(page(None, None), (DEFAULT_LIMIT, 0));
        assert_eq!(page(Some(0), Some(-5)), (1, 0));
        assert_eq!(page(Some(10_000), Some(20)), (MAX_LIMIT, 20));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana@Example.COM ").unwrap(), "ana@example.com");
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("@example.com").is_err());
    }
}
