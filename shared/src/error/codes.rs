//! Unified error codes for the talent marketplace
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Account / employer errors
//! - 4xxx: Shift, application and invite errors
//! - 5xxx: Clock-in errors
//! - 6xxx: Payroll errors
//! - 7xxx: Catalog errors (venues, positions, badges, favorite lists)
//! - 8xxx: Employee, rating and notification errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so clients can switch on
/// a number instead of parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,
    /// Password too short
    PasswordTooShort = 1006,
    /// Email is already registered
    EmailAlreadyRegistered = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Employer account required
    EmployerRequired = 2002,
    /// Employee (talent) account required
    EmployeeRequired = 2003,
    /// Admin role required
    AdminRequired = 2004,

    // ==================== 3xxx: Account ====================
    /// User not found
    UserNotFound = 3001,
    /// Employer not found
    EmployerNotFound = 3002,
    /// Profile not found
    ProfileNotFound = 3003,

    // ==================== 4xxx: Shift ====================
    /// Shift not found
    ShiftNotFound = 4001,
    /// Shift is not open for candidates
    ShiftNotOpen = 4002,
    /// Shift has no free spots left
    ShiftFull = 4003,
    /// Shift has already started
    ShiftAlreadyStarted = 4004,
    /// Shift time window is invalid
    ShiftInvalidWindow = 4005,
    /// Shift status transition not allowed
    ShiftInvalidTransition = 4006,
    /// Shift has employees or clock-ins
    ShiftHasEmployees = 4007,
    /// Employee already works this shift
    AlreadyInShift = 4008,
    /// Employee does not work this shift
    NotInShift = 4009,
    /// Application not found
    ApplicationNotFound = 4101,
    /// Employee already applied
    AlreadyApplied = 4102,
    /// Shift restriction does not allow this employee
    ApplicationRestricted = 4103,
    /// Employee rating below shift minimum
    RatingTooLow = 4104,
    /// Invite not found
    InviteNotFound = 4201,
    /// A pending invite already exists
    InviteAlreadyPending = 4202,
    /// Invite is no longer pending
    InviteNotPending = 4203,
    /// Employee does not receive invites
    InvitesDisabled = 4204,

    // ==================== 5xxx: Clock-in ====================
    /// Clock-in not found
    ClockinNotFound = 5001,
    /// Too early to clock in
    ClockinTooEarly = 5002,
    /// Shift already ended
    ClockinAfterShiftEnded = 5003,
    /// Clock-out window closed
    ClockoutWindowClosed = 5004,
    /// Outside the venue geofence
    OutsideGeofence = 5005,
    /// Coordinates missing or out of range
    InvalidCoordinates = 5006,
    /// Already clocked in
    AlreadyClockedIn = 5007,
    /// No open clock-in
    NotClockedIn = 5008,
    /// Clock-in belongs to a closed payroll period
    ClockinLocked = 5009,

    // ==================== 6xxx: Payroll ====================
    /// Payroll period not found
    PayrollPeriodNotFound = 6001,
    /// Payroll period is not open
    PayrollPeriodNotOpen = 6002,
    /// Payroll status transition not allowed
    PayrollInvalidTransition = 6003,
    /// Payment not found
    PaymentNotFound = 6004,

    // ==================== 7xxx: Catalog ====================
    /// Venue not found
    VenueNotFound = 7001,
    /// Venue is referenced by shifts
    VenueInUse = 7002,
    /// Position not found
    PositionNotFound = 7101,
    /// Position is referenced by shifts
    PositionInUse = 7102,
    /// Badge not found
    BadgeNotFound = 7201,
    /// Favorite list not found
    FavoriteListNotFound = 7301,

    // ==================== 8xxx: Employee ====================
    /// Employee not found
    EmployeeNotFound = 8001,
    /// Rating not allowed for this shift
    RatingNotAllowed = 8101,
    /// Already rated
    AlreadyRated = 8102,
    /// Notification not found
    NotificationNotFound = 8201,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",
            ErrorCode::EmailAlreadyRegistered => "Email is already registered",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::EmployerRequired => "Employer account is required",
            ErrorCode::EmployeeRequired => "Talent account is required",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Account
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::EmployerNotFound => "Employer not found",
            ErrorCode::ProfileNotFound => "Profile not found",

            // Shift
            ErrorCode::ShiftNotFound => "Shift not found",
            ErrorCode::ShiftNotOpen => "Shift is not open",
            ErrorCode::ShiftFull => "Shift has no spots left",
            ErrorCode::ShiftAlreadyStarted => "Shift has already started",
            ErrorCode::ShiftInvalidWindow => "Shift must end after it starts",
            ErrorCode::ShiftInvalidTransition => "Shift status change is not allowed",
            ErrorCode::ShiftHasEmployees => "Shift has employees or clock-ins",
            ErrorCode::AlreadyInShift => "Employee is already working this shift",
            ErrorCode::NotInShift => "Employee is not working this shift",
            ErrorCode::ApplicationNotFound => "Application not found",
            ErrorCode::AlreadyApplied => "Already applied to this shift",
            ErrorCode::ApplicationRestricted => "Shift is restricted to selected talent",
            ErrorCode::RatingTooLow => "Rating is below the shift minimum",
            ErrorCode::InviteNotFound => "Invite not found",
            ErrorCode::InviteAlreadyPending => "A pending invite already exists",
            ErrorCode::InviteNotPending => "Invite is no longer pending",
            ErrorCode::InvitesDisabled => "Talent is not receiving invites",

            // Clock-in
            ErrorCode::ClockinNotFound => "Clock-in not found",
            ErrorCode::ClockinTooEarly => "Too early to clock in",
            ErrorCode::ClockinAfterShiftEnded => "Shift has already ended",
            ErrorCode::ClockoutWindowClosed => "Clock-out window has closed",
            ErrorCode::OutsideGeofence => "Too far from the venue",
            ErrorCode::InvalidCoordinates => "Invalid coordinates",
            ErrorCode::AlreadyClockedIn => "Already clocked in",
            ErrorCode::NotClockedIn => "Not clocked in",
            ErrorCode::ClockinLocked => "Clock-in belongs to a closed payroll period",

            // Payroll
            ErrorCode::PayrollPeriodNotFound => "Payroll period not found",
            ErrorCode::PayrollPeriodNotOpen => "Payroll period is not open",
            ErrorCode::PayrollInvalidTransition => "Payroll status change is not allowed",
            ErrorCode::PaymentNotFound => "Payment not found",

            // Catalog
            ErrorCode::VenueNotFound => "Venue not found",
            ErrorCode::VenueInUse => "Venue is used by shifts",
            ErrorCode::PositionNotFound => "Position not found",
            ErrorCode::PositionInUse => "Position is used by shifts",
            ErrorCode::BadgeNotFound => "Badge not found",
            ErrorCode::FavoriteListNotFound => "Favorite list not found",

            // Employee
            ErrorCode::EmployeeNotFound => "Talent not found",
            ErrorCode::RatingNotAllowed => "Rating is not allowed for this shift",
            ErrorCode::AlreadyRated => "Already rated",
            ErrorCode::NotificationNotFound => "Notification not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::AccountDisabled),
            1006 => Ok(ErrorCode::PasswordTooShort),
            1007 => Ok(ErrorCode::EmailAlreadyRegistered),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::EmployerRequired),
            2003 => Ok(ErrorCode::EmployeeRequired),
            2004 => Ok(ErrorCode::AdminRequired),

            // Account
            3001 => Ok(ErrorCode::UserNotFound),
            3002 => Ok(ErrorCode::EmployerNotFound),
            3003 => Ok(ErrorCode::ProfileNotFound),

            // Shift
            4001 => Ok(ErrorCode::ShiftNotFound),
            4002 => Ok(ErrorCode::ShiftNotOpen),
            4003 => Ok(ErrorCode::ShiftFull),
            4004 => Ok(ErrorCode::ShiftAlreadyStarted),
            4005 => Ok(ErrorCode::ShiftInvalidWindow),
            4006 => Ok(ErrorCode::ShiftInvalidTransition),
            4007 => Ok(ErrorCode::ShiftHasEmployees),
            4008 => Ok(ErrorCode::AlreadyInShift),
            4009 => Ok(ErrorCode::NotInShift),
            4101 => Ok(ErrorCode::ApplicationNotFound),
            4102 => Ok(ErrorCode::AlreadyApplied),
            4103 => Ok(ErrorCode::ApplicationRestricted),
            4104 => Ok(ErrorCode::RatingTooLow),
            4201 => Ok(ErrorCode::InviteNotFound),
            4202 => Ok(ErrorCode::InviteAlreadyPending),
            4203 => Ok(ErrorCode::InviteNotPending),
            4204 => Ok(ErrorCode::InvitesDisabled),

            // Clock-in
            5001 => Ok(ErrorCode::ClockinNotFound),
            5002 => Ok(ErrorCode::ClockinTooEarly),
            5003 => Ok(ErrorCode::ClockinAfterShiftEnded),
            5004 => Ok(ErrorCode::ClockoutWindowClosed),
            5005 => Ok(ErrorCode::OutsideGeofence),
            5006 => Ok(ErrorCode::InvalidCoordinates),
            5007 => Ok(ErrorCode::AlreadyClockedIn),
            5008 => Ok(ErrorCode::NotClockedIn),
            5009 => Ok(ErrorCode::ClockinLocked),

            // Payroll
            6001 => Ok(ErrorCode::PayrollPeriodNotFound),
            6002 => Ok(ErrorCode::PayrollPeriodNotOpen),
            6003 => Ok(ErrorCode::PayrollInvalidTransition),
            6004 => Ok(ErrorCode::PaymentNotFound),

            // Catalog
            7001 => Ok(ErrorCode::VenueNotFound),
            7002 => Ok(ErrorCode::VenueInUse),
            7101 => Ok(ErrorCode::PositionNotFound),
            7102 => Ok(ErrorCode::PositionInUse),
            7201 => Ok(ErrorCode::BadgeNotFound),
            7301 => Ok(ErrorCode::FavoriteListNotFound),

            // Employee
            8001 => Ok(ErrorCode::EmployeeNotFound),
            8101 => Ok(ErrorCode::RatingNotAllowed),
            8102 => Ok(ErrorCode::AlreadyRated),
            8201 => Ok(ErrorCode::NotificationNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);

        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::EmailAlreadyRegistered.code(), 1007);
        assert_eq!(ErrorCode::EmployerRequired.code(), 2002);
        assert_eq!(ErrorCode::EmployerNotFound.code(), 3002);
        assert_eq!(ErrorCode::ShiftFull.code(), 4003);
        assert_eq!(ErrorCode::AlreadyApplied.code(), 4102);
        assert_eq!(ErrorCode::InviteNotPending.code(), 4203);
        assert_eq!(ErrorCode::OutsideGeofence.code(), 5005);
        assert_eq!(ErrorCode::PayrollPeriodNotOpen.code(), 6002);
        assert_eq!(ErrorCode::VenueInUse.code(), 7002);
        assert_eq!(ErrorCode::AlreadyRated.code(), 8102);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_covers_every_variant() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::RequiredField,
            ErrorCode::AccountDisabled,
            ErrorCode::AdminRequired,
            ErrorCode::ProfileNotFound,
            ErrorCode::NotInShift,
            ErrorCode::RatingTooLow,
            ErrorCode::InvitesDisabled,
            ErrorCode::ClockinLocked,
            ErrorCode::PaymentNotFound,
            ErrorCode::FavoriteListNotFound,
            ErrorCode::NotificationNotFound,
            ErrorCode::ConfigError,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
    }

    #[test]
    fn test_serialize_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::NotFound).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&ErrorCode::ClockinTooEarly).unwrap(),
            "5002"
        );
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("4003").unwrap();
        assert_eq!(code, ErrorCode::ShiftFull);

        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::Success), "0");
        assert_eq!(format!("{}", ErrorCode::ShiftNotFound), "4001");
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(ErrorCode::OutsideGeofence.message(), "Too far from the venue");
        assert_eq!(ErrorCode::InternalError.message(), "Internal server error");
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }
}
