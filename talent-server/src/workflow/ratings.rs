//! Ratings between employers and talent
//!
//! Either side may rate the other once per shift, and only for a shift
//! the talent actually worked: assigned, not cancelled, and over.

use sqlx::SqlitePool;

use super::{find_shift, owned_shift};
use crate::auth::CurrentUser;
use crate::db::repository::rating::{self, RatingTarget};
use crate::db::repository::{RepoError, shift};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Rating, RatingCreate, Shift, ShiftStatus, UserRole};

/// The shift is over and was not called off
pub fn shift_rateable(shift: &Shift, now: i64) -> bool {
    shift.status != ShiftStatus::Cancelled && now >= shift.ending_at
}

fn not_allowed(reason: &str) -> AppError {
    AppError::with_message(ErrorCode::RatingNotAllowed, reason)
}

/// Rate the other side of a worked shift
///
/// Employers name the `employee_id`; talent always rates the shift's
/// employer.
pub async fn rate(
    pool: &SqlitePool,
    user: &CurrentUser,
    data: &RatingCreate,
    now: i64,
) -> AppResult<Rating> {
    let (worked, employee_id, target) = match user.role {
        UserRole::Employer => {
            let employer_id = user.require_employer()?;
            let employee_id = data.employee_id.ok_or_else(|| {
                AppError::with_message(ErrorCode::RequiredField, "employee_id is required")
            })?;
            let worked = owned_shift(pool, data.shift_id, employer_id).await?;
            (worked, employee_id, RatingTarget::Employee(employee_id))
        }
        UserRole::Employee => {
            let employee_id = user.require_employee()?;
            let worked = find_shift(pool, data.shift_id).await?;
            let employer_id = worked.employer_id;
            (worked, employee_id, RatingTarget::Employer(employer_id))
        }
        UserRole::Admin => return Err(AppError::forbidden("Admins cannot leave ratings")),
    };

    if !shift_rateable(&worked, now) {
        return Err(not_allowed("Ratings open once the shift has ended"));
    }
    if !shift::is_assigned(pool, worked.id, employee_id).await? {
        return Err(not_allowed("The talent did not work this shift"));
    }

    let comments = data
        .comments
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    let created = rating::create(pool, user.id, worked.id, target, data.rating, comments, now)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::new(ErrorCode::AlreadyRated),
            other => other.into(),
        })?;

    tracing::info!(
        rating_id = created.id,
        shift_id = worked.id,
        sender_user_id = user.id,
        rating = created.rating,
        "Rating submitted"
    );
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ApplicationRestriction;

    fn shift_with(status: ShiftStatus, ending_at: i64) -> Shift {
        Shift {
            id: 1,
            employer_id: 1,
            venue_id: 1,
            position_id: 1,
            starting_at: ending_at - 3_600_000,
            ending_at,
            minimum_hourly_rate: 20.0,
            maximum_allowed_employees: 1,
            minimum_allowed_rating: 0.0,
            application_restriction: ApplicationRestriction::Anyone,
            status,
            description: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_rateable_after_end() {
        let s = shift_with(ShiftStatus::Completed, 10_000_000);
        assert!(shift_rateable(&s, 10_000_000));
        assert!(!shift_rateable(&s, 9_999_999));
    }

    #[test]
    fn test_cancelled_not_rateable() {
        let s = shift_with(ShiftStatus::Cancelled, 10_000_000);
        assert!(!shift_rateable(&s, 20_000_000));
    }

    #[test]
    fn test_filled_shift_rateable_once_over() {
        // The scheduler may not have closed it yet
        let s = shift_with(ShiftStatus::Filled, 10_000_000);
        assert!(shift_rateable(&s, 10_000_001));
    }
}
