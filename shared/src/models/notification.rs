//! In-app notifications

use serde::{Deserialize, Serialize};

/// Notification trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    InviteReceived,
    InviteAccepted,
    InviteRejected,
    InviteCancelled,
    ApplicationReceived,
    ApplicationAccepted,
    ApplicationRejected,
    ApplicationAutoAccepted,
    ShiftCancelled,
    AddedToShift,
    RemovedFromShift,
    EmployeeLeftShift,
    PayrollFinalized,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InviteReceived => "INVITE_RECEIVED",
            Self::InviteAccepted => "INVITE_ACCEPTED",
            Self::InviteRejected => "INVITE_REJECTED",
            Self::InviteCancelled => "INVITE_CANCELLED",
            Self::ApplicationReceived => "APPLICATION_RECEIVED",
            Self::ApplicationAccepted => "APPLICATION_ACCEPTED",
            Self::ApplicationRejected => "APPLICATION_REJECTED",
            Self::ApplicationAutoAccepted => "APPLICATION_AUTO_ACCEPTED",
            Self::ShiftCancelled => "SHIFT_CANCELLED",
            Self::AddedToShift => "ADDED_TO_SHIFT",
            Self::RemovedFromShift => "REMOVED_FROM_SHIFT",
            Self::EmployeeLeftShift => "EMPLOYEE_LEFT_SHIFT",
            Self::PayrollFinalized => "PAYROLL_FINALIZED",
        }
    }
}

/// Notification record; `payload` is a JSON document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub payload: String,
    pub read_at: Option<i64>,
    pub created_at: i64,
}

/// Notification list filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Unread counter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadCount {
    pub count: i64,
}
