//! Shift lifecycle, staffing and the marketplace

use std::collections::HashMap;

use serde_json::json;
use shared::geo::{GeoPoint, haversine_miles};
use shared::models::{
    ApplicationRestriction, Employer, MarketplaceQuery, MarketplaceShift, MyShiftsQuery,
    NotificationKind, Shift, ShiftCreate, ShiftDetail, ShiftQuery, ShiftStatus, ShiftUpdate, Venue,
};
use shared::util::format_millis;
use sqlx::SqlitePool;

use super::{assigned_or_err, find_shift, owned_shift};
use crate::db::repository::favorite_list::Membership;
use crate::db::repository::{employee, position, shift, venue};
use crate::notify;
use crate::utils::validation::page;
use crate::utils::{AppError, AppResult, ErrorCode};

// ── Pure rules ──────────────────────────────────────────────────────

pub fn validate_window(starting_at: i64, ending_at: i64) -> AppResult<()> {
    if ending_at <= starting_at {
        return Err(AppError::new(ErrorCode::ShiftInvalidWindow)
            .with_detail("starting_at", starting_at)
            .with_detail("ending_at", ending_at));
    }
    Ok(())
}

/// Whether an employee with this list membership may apply
pub fn restriction_allows(
    restriction: ApplicationRestriction,
    membership: Membership,
) -> AppResult<()> {
    match restriction {
        ApplicationRestriction::Anyone => Ok(()),
        ApplicationRestriction::Favorites if membership.on_any_list => Ok(()),
        ApplicationRestriction::Favorites => Err(AppError::with_message(
            ErrorCode::ApplicationRestricted,
            "Shift is open to the employer's favorite talent only",
        )),
        ApplicationRestriction::SpecificPeople => Err(AppError::with_message(
            ErrorCode::ApplicationRestricted,
            "Shift is by invitation only",
        )),
    }
}

/// Applications skip review when the employee is on an auto-accept list,
/// or on any list of an employer that auto-accepts favorites
pub fn should_auto_accept(employer: &Employer, membership: Membership) -> bool {
    membership.on_auto_accept_list
        || (employer.automatically_accept_from_favlists && membership.on_any_list)
}

/// Distance to the venue, and whether it is within the employee's range.
/// No location or no maximum means no distance filter.
pub fn distance_filter(
    employee_location: Option<GeoPoint>,
    maximum_job_distance_miles: f64,
    venue: GeoPoint,
) -> (bool, Option<f64>) {
    let Some(location) = employee_location else {
        return (true, None);
    };
    let distance = haversine_miles(location, venue);
    let in_range = maximum_job_distance_miles <= 0.0 || distance <= maximum_job_distance_miles;
    (in_range, Some(distance))
}

// ── Employer operations ─────────────────────────────────────────────

pub async fn create(
    pool: &SqlitePool,
    employer_id: i64,
    data: &ShiftCreate,
    now: i64,
) -> AppResult<Shift> {
    validate_window(data.starting_at, data.ending_at)?;

    let status = data.status.unwrap_or_default();
    match status {
        ShiftStatus::Draft => {}
        ShiftStatus::Open if data.starting_at > now => {}
        ShiftStatus::Open => {
            return Err(AppError::new(ErrorCode::ShiftAlreadyStarted)
                .with_detail("starting_at", data.starting_at));
        }
        other => {
            return Err(AppError::validation(format!(
                "A new shift must be DRAFT or OPEN, got {}",
                other.as_str()
            )));
        }
    }

    check_venue(pool, data.venue_id, employer_id).await?;
    check_position(pool, data.position_id).await?;

    let created = shift::create(pool, employer_id, data, status, now).await?;
    tracing::info!(
        shift_id = created.id,
        employer_id,
        status = created.status.as_str(),
        starting_at = %format_millis(created.starting_at),
        "Shift created"
    );
    Ok(created)
}

pub async fn update(
    pool: &SqlitePool,
    employer_id: i64,
    id: i64,
    data: &ShiftUpdate,
    now: i64,
) -> AppResult<Shift> {
    let existing = owned_shift(pool, id, employer_id).await?;
    if !existing.status.is_editable() {
        return Err(AppError::new(ErrorCode::ShiftInvalidTransition)
            .with_detail("status", existing.status.as_str()));
    }
    if existing.has_started(now) {
        return Err(AppError::new(ErrorCode::ShiftAlreadyStarted));
    }

    let starting_at = data.starting_at.unwrap_or(existing.starting_at);
    let ending_at = data.ending_at.unwrap_or(existing.ending_at);
    validate_window(starting_at, ending_at)?;
    if existing.status != ShiftStatus::Draft && starting_at <= now {
        return Err(AppError::new(ErrorCode::ShiftAlreadyStarted)
            .with_detail("starting_at", starting_at));
    }

    if let Some(venue_id) = data.venue_id {
        check_venue(pool, venue_id, employer_id).await?;
    }
    if let Some(position_id) = data.position_id {
        check_position(pool, position_id).await?;
    }
    // Capacity below the assigned count is refused by the update itself
    let updated = shift::update(pool, id, data, now).await?;
    tracing::info!(shift_id = id, status = updated.status.as_str(), "Shift updated");
    Ok(updated)
}

/// DRAFT -> OPEN
pub async fn publish(pool: &SqlitePool, employer_id: i64, id: i64, now: i64) -> AppResult<Shift> {
    let existing = owned_shift(pool, id, employer_id).await?;
    if existing.status != ShiftStatus::Draft {
        return Err(invalid_transition(&existing, ShiftStatus::Open));
    }
    if existing.has_started(now) {
        return Err(AppError::new(ErrorCode::ShiftAlreadyStarted));
    }

    if !shift::transition(pool, id, &[ShiftStatus::Draft], ShiftStatus::Open, now).await? {
        return Err(invalid_transition(&existing, ShiftStatus::Open));
    }
    tracing::info!(shift_id = id, "Shift published");
    find_shift(pool, id).await
}

/// Cancel and tell everyone involved
pub async fn cancel(pool: &SqlitePool, employer_id: i64, id: i64, now: i64) -> AppResult<Shift> {
    let existing = owned_shift(pool, id, employer_id).await?;
    if !existing.status.can_transition_to(ShiftStatus::Cancelled) {
        return Err(invalid_transition(&existing, ShiftStatus::Cancelled));
    }

    let outcome = shift::cancel(pool, id, now)
        .await?
        .ok_or_else(|| invalid_transition(&existing, ShiftStatus::Cancelled))?;

    let when = format_millis(existing.starting_at);
    let payload = json!({ "shift_id": id });
    for employee_id in outcome
        .assigned_employee_ids
        .iter()
        .chain(outcome.invited_employee_ids.iter())
    {
        notify::send_to_employee(
            pool,
            *employee_id,
            NotificationKind::ShiftCancelled,
            "Shift cancelled",
            format!("The shift starting {when} was cancelled"),
            payload.clone(),
        )
        .await;
    }

    tracing::info!(
        shift_id = id,
        assigned = outcome.assigned_employee_ids.len(),
        invites_cancelled = outcome.invited_employee_ids.len(),
        "Shift cancelled"
    );
    find_shift(pool, id).await
}

/// Only drafts, or shifts nobody worked on, can be deleted
pub async fn delete(pool: &SqlitePool, employer_id: i64, id: i64) -> AppResult<bool> {
    let existing = owned_shift(pool, id, employer_id).await?;
    if existing.status != ShiftStatus::Draft
        && (shift::count_employees(pool, id).await? > 0 || shift::has_clockins(pool, id).await?)
    {
        return Err(AppError::new(ErrorCode::ShiftHasEmployees));
    }
    let deleted = shift::delete(pool, id).await?;
    tracing::info!(shift_id = id, "Shift deleted");
    Ok(deleted)
}

pub async fn list(
    pool: &SqlitePool,
    employer_id: i64,
    query: &ShiftQuery,
) -> AppResult<Vec<Shift>> {
    let (limit, offset) = page(query.limit, query.offset);
    Ok(shift::find_by_employer(pool, employer_id, query, limit, offset).await?)
}

/// Shift with venue, position and staff
///
/// `employer_id` restricts to the owner; talent and admins see any shift.
pub async fn detail(pool: &SqlitePool, id: i64, employer_id: Option<i64>) -> AppResult<ShiftDetail> {
    let shift = match employer_id {
        Some(employer_id) => owned_shift(pool, id, employer_id).await?,
        None => find_shift(pool, id).await?,
    };
    let venue = venue::find_by_id(pool, shift.venue_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::VenueNotFound))?;
    let position = position::find_by_id(pool, shift.position_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PositionNotFound))?;
    let employees = employee::find_by_shift(pool, id).await?;
    Ok(ShiftDetail {
        shift,
        venue,
        position,
        employees,
    })
}

/// Employer puts an employee on a shift directly
pub async fn assign(
    pool: &SqlitePool,
    employer_id: i64,
    shift_id: i64,
    employee_id: i64,
    now: i64,
) -> AppResult<ShiftDetail> {
    let existing = owned_shift(pool, shift_id, employer_id).await?;
    if existing.has_started(now) {
        return Err(AppError::new(ErrorCode::ShiftAlreadyStarted));
    }
    employee::find_by_id(pool, employee_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;

    assigned_or_err(shift::assign_employee(pool, shift_id, employee_id, now).await?)?;

    notify::send_to_employee(
        pool,
        employee_id,
        NotificationKind::AddedToShift,
        "Added to a shift",
        format!(
            "You were added to the shift starting {}",
            format_millis(existing.starting_at)
        ),
        json!({ "shift_id": shift_id }),
    )
    .await;
    tracing::info!(shift_id, employee_id, "Employee assigned to shift");
    detail(pool, shift_id, Some(employer_id)).await
}

/// Employer takes an employee off a shift
pub async fn remove(
    pool: &SqlitePool,
    employer_id: i64,
    shift_id: i64,
    employee_id: i64,
    now: i64,
) -> AppResult<ShiftDetail> {
    let existing = owned_shift(pool, shift_id, employer_id).await?;
    if !existing.status.is_editable() {
        return Err(AppError::new(ErrorCode::ShiftInvalidTransition)
            .with_detail("status", existing.status.as_str()));
    }
    if !shift::remove_employee(pool, shift_id, employee_id, now).await? {
        return Err(AppError::new(ErrorCode::NotInShift));
    }

    notify::send_to_employee(
        pool,
        employee_id,
        NotificationKind::RemovedFromShift,
        "Removed from shift",
        format!(
            "You were removed from the shift starting {}",
            format_millis(existing.starting_at)
        ),
        json!({ "shift_id": shift_id }),
    )
    .await;
    tracing::info!(shift_id, employee_id, "Employee removed from shift");
    detail(pool, shift_id, Some(employer_id)).await
}

// ── Talent operations ───────────────────────────────────────────────

/// Employee drops out before the shift starts
pub async fn leave(pool: &SqlitePool, employee_id: i64, shift_id: i64, now: i64) -> AppResult<()> {
    let existing = find_shift(pool, shift_id).await?;
    if existing.has_started(now) {
        return Err(AppError::new(ErrorCode::ShiftAlreadyStarted));
    }
    if !existing.status.is_editable() {
        return Err(AppError::new(ErrorCode::ShiftInvalidTransition)
            .with_detail("status", existing.status.as_str()));
    }
    if !shift::remove_employee(pool, shift_id, employee_id, now).await? {
        return Err(AppError::new(ErrorCode::NotInShift));
    }

    notify::send_to_employer(
        pool,
        existing.employer_id,
        NotificationKind::EmployeeLeftShift,
        "Talent left a shift",
        format!(
            "A talent left the shift starting {}",
            format_millis(existing.starting_at)
        ),
        json!({ "shift_id": shift_id, "employee_id": employee_id }),
    )
    .await;
    tracing::info!(shift_id, employee_id, "Employee left shift");
    Ok(())
}

/// Open shifts this employee could take, soonest first
pub async fn marketplace(
    pool: &SqlitePool,
    employee_id: i64,
    query: &MarketplaceQuery,
    now: i64,
) -> AppResult<Vec<MarketplaceShift>> {
    let me = employee::find_by_id(pool, employee_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;
    let location = employee::find_location(pool, employee_id).await?;
    let candidates = shift::find_marketplace(pool, &me, now, query.position_id).await?;

    let mut venues: HashMap<i64, Venue> = HashMap::new();
    let mut listed = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !venues.contains_key(&candidate.venue_id) {
            match venue::find_by_id(pool, candidate.venue_id).await? {
                Some(v) => {
                    venues.insert(v.id, v);
                }
                None => continue,
            }
        }
        let Some(v) = venues.get(&candidate.venue_id) else {
            continue;
        };

        let (in_range, distance_miles) =
            distance_filter(location, me.maximum_job_distance_miles, v.location());
        if in_range {
            listed.push(MarketplaceShift {
                shift: candidate,
                venue: v.clone(),
                distance_miles,
            });
        }
    }

    let (limit, offset) = page(query.limit, query.offset);
    Ok(listed
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect())
}

/// The employee's upcoming or past shifts
pub async fn employee_shifts(
    pool: &SqlitePool,
    employee_id: i64,
    query: &MyShiftsQuery,
    now: i64,
) -> AppResult<Vec<Shift>> {
    let upcoming = match query.when.as_deref() {
        None | Some("upcoming") => true,
        Some("past") => false,
        Some(other) => {
            return Err(AppError::validation(format!(
                "when must be 'upcoming' or 'past', got '{other}'"
            )));
        }
    };
    let (limit, offset) = page(query.limit, query.offset);
    Ok(shift::find_by_employee(pool, employee_id, upcoming, now, limit, offset).await?)
}

// ── Helpers ─────────────────────────────────────────────────────────

async fn check_venue(pool: &SqlitePool, venue_id: i64, employer_id: i64) -> AppResult<()> {
    match venue::find_by_id(pool, venue_id).await? {
        Some(v) if v.employer_id == employer_id => Ok(()),
        _ => Err(AppError::new(ErrorCode::VenueNotFound)),
    }
}

async fn check_position(pool: &SqlitePool, position_id: i64) -> AppResult<()> {
    position::find_by_id(pool, position_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::new(ErrorCode::PositionNotFound))
}

fn invalid_transition(shift: &Shift, to: ShiftStatus) -> AppError {
    AppError::with_message(
        ErrorCode::ShiftInvalidTransition,
        format!(
            "Cannot move shift from {} to {}",
            shift.status.as_str(),
            to.as_str()
        ),
    )
    .with_detail("status", shift.status.as_str())
}
