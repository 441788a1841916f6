//! Marketplace workflows
//!
//! Business rules around shifts, applications, invites and ratings.
//! Handlers stay thin and call in here; everything below talks to the
//! repositories and sends the notifications for each transition.

pub mod applications;
pub mod invites;
pub mod ratings;
pub mod shifts;

use shared::models::{Shift, ShiftStatus};
use sqlx::SqlitePool;

use crate::db::repository::shift::{self, AssignOutcome};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Shift owned by `employer_id`; other employers get a plain not-found
pub(crate) async fn owned_shift(
    pool: &SqlitePool,
    shift_id: i64,
    employer_id: i64,
) -> AppResult<Shift> {
    match shift::find_by_id(pool, shift_id).await? {
        Some(s) if s.employer_id == employer_id => Ok(s),
        _ => Err(AppError::new(ErrorCode::ShiftNotFound)),
    }
}

pub(crate) async fn find_shift(pool: &SqlitePool, shift_id: i64) -> AppResult<Shift> {
    shift::find_by_id(pool, shift_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ShiftNotFound))
}

/// A shift can take new people: OPEN and not started
pub(crate) fn ensure_joinable(shift: &Shift, now: i64) -> AppResult<()> {
    match shift.status {
        ShiftStatus::Open => {}
        ShiftStatus::Filled => return Err(AppError::new(ErrorCode::ShiftFull)),
        other => {
            return Err(AppError::new(ErrorCode::ShiftNotOpen).with_detail("status", other.as_str()));
        }
    }
    if shift.has_started(now) {
        return Err(AppError::new(ErrorCode::ShiftAlreadyStarted));
    }
    Ok(())
}

/// Anything but a fresh assignment is an error for the caller
pub(crate) fn assigned_or_err(outcome: AssignOutcome) -> AppResult<()> {
    match outcome {
        AssignOutcome::Assigned => Ok(()),
        AssignOutcome::AlreadyAssigned => Err(AppError::new(ErrorCode::AlreadyInShift)),
        AssignOutcome::Full => Err(AppError::new(ErrorCode::ShiftFull)),
        AssignOutcome::NotOpen(status) => {
            Err(AppError::new(ErrorCode::ShiftNotOpen).with_detail("status", status.as_str()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ApplicationRestriction;

    fn shift(status: ShiftStatus, starting_at: i64) -> Shift {
        Shift {
            id: 1,
            employer_id: 1,
            venue_id: 1,
            position_id: 1,
            starting_at,
            ending_at: starting_at + 3_600_000,
            minimum_hourly_rate: 15.0,
            maximum_allowed_employees: 2,
            minimum_allowed_rating: 0.0,
            application_restriction: ApplicationRestriction::Anyone,
            status,
            description: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_joinable() {
        assert!(ensure_joinable(&shift(ShiftStatus::Open, 1_000), 0).is_ok());
        assert_eq!(
            ensure_joinable(&shift(ShiftStatus::Filled, 1_000), 0)
                .unwrap_err()
                .code,
            ErrorCode::ShiftFull
        );
        assert_eq!(
            ensure_joinable(&shift(ShiftStatus::Draft, 1_000), 0)
                .unwrap_err()
                .code,
            ErrorCode::ShiftNotOpen
        );
        assert_eq!(
            ensure_joinable(&shift(ShiftStatus::Open, 1_000), 1_000)
                .unwrap_err()
                .code,
            ErrorCode::ShiftAlreadyStarted
        );
    }

    #[test]
    fn test_assign_outcome_codes() {
        assert!(assigned_or_err(AssignOutcome::Assigned).is_ok());
        assert_eq!(
            assigned_or_err(AssignOutcome::Full).unwrap_err().code,
            ErrorCode::ShiftFull
        );
        assert_eq!(
            assigned_or_err(AssignOutcome::AlreadyAssigned)
                .unwrap_err()
                .code,
            ErrorCode::AlreadyInShift
        );
        assert_eq!(
            assigned_or_err(AssignOutcome::NotOpen(ShiftStatus::Cancelled))
                .unwrap_err()
                .code,
            ErrorCode::ShiftNotOpen
        );
    }
}
