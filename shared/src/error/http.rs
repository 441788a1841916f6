//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::UserNotFound
            | Self::EmployerNotFound
            | Self::ProfileNotFound
            | Self::ShiftNotFound
            | Self::ApplicationNotFound
            | Self::InviteNotFound
            | Self::ClockinNotFound
            | Self::PayrollPeriodNotFound
            | Self::PaymentNotFound
            | Self::VenueNotFound
            | Self::PositionNotFound
            | Self::BadgeNotFound
            | Self::FavoriteListNotFound
            | Self::EmployeeNotFound
            | Self::NotificationNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::EmailAlreadyRegistered
            | Self::ShiftFull
            | Self::ShiftHasEmployees
            | Self::AlreadyInShift
            | Self::AlreadyApplied
            | Self::InviteAlreadyPending
            | Self::AlreadyClockedIn
            | Self::VenueInUse
            | Self::PositionInUse
            | Self::AlreadyRated => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountDisabled => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied
            | Self::EmployerRequired
            | Self::EmployeeRequired
            | Self::AdminRequired
            | Self::ApplicationRestricted
            | Self::RatingTooLow
            | Self::InvitesDisabled => StatusCode::FORBIDDEN,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
