//! Clock-in service
//!
//! Loads the shift, employer and venue behind a punch, runs the
//! [`rules`](super::rules) and writes the result.

use shared::geo::GeoPoint;
use shared::models::{
    ClockRequest, Clockin, ClockinCreate, ClockinQuery, ClockinUpdate, Employer, Shift,
    ShiftStatus, UserRole, Venue,
};
use shared::util::{format_millis, minutes, now_millis};
use sqlx::SqlitePool;

use super::rules::{ClockContext, validate_clock_in, validate_clock_out};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::clockin::{self, Punch};
use crate::db::repository::{RepoError, employer, payroll, shift, venue};
use crate::utils::validation::page;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Shift plus the employer and venue a punch is checked against
struct PunchTarget {
    shift: Shift,
    employer: Employer,
    venue: Venue,
}

impl PunchTarget {
    async fn load(pool: &SqlitePool, shift_id: i64) -> AppResult<Self> {
        let shift = shift::find_by_id(pool, shift_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::ShiftNotFound))?;
        let employer = employer::find_by_id(pool, shift.employer_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::EmployerNotFound))?;
        let venue = venue::find_by_id(pool, shift.venue_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::VenueNotFound))?;
        Ok(Self {
            shift,
            employer,
            venue,
        })
    }

    fn context(&self, radius_miles: f64, now: i64) -> ClockContext {
        ClockContext {
            starting_at: self.shift.starting_at,
            ending_at: self.shift.ending_at,
            clockin_delta_ms: minutes(self.employer.maximum_clockin_delta_minutes),
            clockout_delay_ms: minutes(self.employer.maximum_clockout_delay_minutes),
            venue: self.venue.location(),
            radius_miles,
            now,
        }
    }
}

/// Employee punches in
pub async fn clock_in(
    state: &ServerState,
    user: &CurrentUser,
    req: &ClockRequest,
) -> AppResult<Clockin> {
    let employee_id = user.require_employee()?;
    let pool = &state.pool;
    let now = now_millis();

    let target = PunchTarget::load(pool, req.shift_id).await?;
    if !matches!(target.shift.status, ShiftStatus::Open | ShiftStatus::Filled) {
        return Err(AppError::new(ErrorCode::ShiftNotOpen)
            .with_detail("status", target.shift.status.as_str()));
    }
    if !shift::is_assigned(pool, req.shift_id, employee_id).await? {
        return Err(AppError::new(ErrorCode::NotInShift));
    }
    if clockin::find_open(pool, req.shift_id, employee_id)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::AlreadyClockedIn));
    }

    let point = GeoPoint::new(req.latitude, req.longitude);
    let ctx = target.context(state.config.clockin_radius_miles, now);
    let distance = validate_clock_in(&ctx, point)?;

    let punch = Punch {
        at: now,
        point,
        distance_miles: distance,
    };
    let record = clockin::open(pool, req.shift_id, employee_id, user.id, punch)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::new(ErrorCode::AlreadyClockedIn),
            other => other.into(),
        })?;

    tracing::info!(
        clockin_id = record.id,
        shift_id = req.shift_id,
        employee_id,
        distance_miles = distance,
        "Clocked in"
    );
    Ok(record)
}

/// Employee punches out of their open clock-in
pub async fn clock_out(
    state: &ServerState,
    user: &CurrentUser,
    req: &ClockRequest,
) -> AppResult<Clockin> {
    let employee_id = user.require_employee()?;
    let pool = &state.pool;
    let now = now_millis();

    let open = clockin::find_open(pool, req.shift_id, employee_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::NotClockedIn))?;

    let target = PunchTarget::load(pool, req.shift_id).await?;
    let point = GeoPoint::new(req.latitude, req.longitude);
    let ctx = target.context(state.config.clockin_radius_miles, now);
    let distance = validate_clock_out(&ctx, open.started_at, point)?;

    let punch = Punch {
        at: now,
        point,
        distance_miles: distance,
    };
    let record = clockin::close(pool, open.id, punch).await.map_err(|e| match e {
        // Closed concurrently by the scheduler
        RepoError::NotFound(_) => AppError::new(ErrorCode::NotClockedIn),
        other => other.into(),
    })?;

    tracing::info!(
        clockin_id = record.id,
        shift_id = req.shift_id,
        employee_id,
        worked_minutes = record.worked_ms().unwrap_or(0) / 60_000,
        "Clocked out"
    );
    Ok(record)
}

/// Employers see clock-ins on their shifts, employees their own
pub async fn list(
    pool: &SqlitePool,
    user: &CurrentUser,
    query: &ClockinQuery,
) -> AppResult<Vec<Clockin>> {
    let (limit, offset) = page(query.limit, query.offset);
    match user.role {
        UserRole::Employer => {
            let employer_id = user.require_employer()?;
            Ok(clockin::find_for_employer(pool, employer_id, query, limit, offset).await?)
        }
        UserRole::Employee => {
            let employee_id = user.require_employee()?;
            Ok(clockin::find_for_employee(pool, employee_id, query, limit, offset).await?)
        }
        UserRole::Admin => Err(AppError::forbidden(
            "Clock-ins are visible to employers and talent only",
        )),
    }
}

/// Employer records a clock-in by hand; no geofence
pub async fn create_manual(
    pool: &SqlitePool,
    user: &CurrentUser,
    data: &ClockinCreate,
) -> AppResult<Clockin> {
    let employer_id = user.require_employer()?;
    let shift = owned_shift(pool, data.shift_id, employer_id).await?;
    if matches!(shift.status, ShiftStatus::Draft | ShiftStatus::Cancelled) {
        return Err(AppError::new(ErrorCode::ShiftNotOpen)
            .with_detail("status", shift.status.as_str()));
    }
    if !shift::is_assigned(pool, shift.id, data.employee_id).await? {
        return Err(AppError::new(ErrorCode::NotInShift));
    }
    check_times(data.started_at, data.ended_at)?;
    check_week_open(pool, employer_id, data.started_at).await?;

    let record = clockin::create_manual(
        pool,
        shift.id,
        data.employee_id,
        user.id,
        data.started_at,
        data.ended_at,
        now_millis(),
    )
    .await?;

    tracing::info!(
        clockin_id = record.id,
        shift_id = shift.id,
        employee_id = data.employee_id,
        author_user_id = user.id,
        "Manual clock-in created"
    );
    Ok(record)
}

/// Employer corrects clock-in times until the payroll period is finalized
///
/// The new start must not fall in a finalized week either.
pub async fn update_manual(
    pool: &SqlitePool,
    user: &CurrentUser,
    id: i64,
    data: &ClockinUpdate,
) -> AppResult<Clockin> {
    let employer_id = user.require_employer()?;
    let existing = clockin::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ClockinNotFound))?;
    owned_shift(pool, existing.shift_id, employer_id).await?;

    if clockin::is_locked(pool, id).await? {
        return Err(AppError::new(ErrorCode::ClockinLocked));
    }

    let started_at = data.started_at.unwrap_or(existing.started_at);
    let ended_at = data.ended_at.or(existing.ended_at);
    check_times(started_at, ended_at)?;
    check_week_open(pool, employer_id, started_at).await?;

    let record = clockin::update_times(pool, id, started_at, ended_at).await?;
    if payroll::detach_clockin(pool, id).await? {
        tracing::info!(clockin_id = id, "Payment dropped for recalculation");
    }

    tracing::info!(clockin_id = id, author_user_id = user.id, "Clock-in times updated");
    Ok(record)
}

/// Scheduler step: close clock-ins left open past the clock-out delay
pub async fn auto_clock_out(pool: &SqlitePool, now: i64) -> AppResult<u64> {
    let closed = clockin::auto_close_due(pool, now).await?;
    if closed > 0 {
        tracing::info!(closed, "Open clock-ins closed automatically");
    }
    Ok(closed)
}

async fn owned_shift(pool: &SqlitePool, shift_id: i64, employer_id: i64) -> AppResult<Shift> {
    match shift::find_by_id(pool, shift_id).await? {
        Some(s) if s.employer_id == employer_id => Ok(s),
        _ => Err(AppError::new(ErrorCode::ShiftNotFound)),
    }
}

/// Hours in a FINALIZED or PAID payroll week cannot be added or moved
async fn check_week_open(pool: &SqlitePool, employer_id: i64, started_at: i64) -> AppResult<()> {
    match payroll::closed_period_at(pool, employer_id, started_at).await? {
        Some(period) => Err(AppError::with_message(
            ErrorCode::ClockinLocked,
            format!(
                "The payroll week starting {} is already {}",
                format_millis(period.starting_at),
                period.status.as_str()
            ),
        )
        .with_detail("period_id", period.id)),
        None => Ok(()),
    }
}

fn check_times(started_at: i64, ended_at: Option<i64>) -> AppResult<()> {
    if let Some(end) = ended_at
        && end <= started_at
    {
        return Err(AppError::validation("ended_at must be after started_at")
            .with_detail("started_at", started_at)
            .with_detail("ended_at", end));
    }
    Ok(())
}
