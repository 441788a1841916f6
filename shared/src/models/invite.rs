//! Shift invites

use serde::{Deserialize, Serialize};

/// Invite status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl InviteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

/// Invite record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ShiftInvite {
    pub id: i64,
    pub sender_user_id: i64,
    pub employer_id: i64,
    pub shift_id: i64,
    pub employee_id: i64,
    pub status: InviteStatus,
    pub created_at: i64,
    pub responded_at: Option<i64>,
}

/// Send invite payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteCreate {
    pub shift_id: i64,
    pub employee_id: i64,
}

/// Employee response to an invite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteRespond {
    pub accept: bool,
}

/// Invite list filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InviteQuery {
    pub status: Option<InviteStatus>,
    pub shift_id: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
