//! Shift applications

use serde_json::json;
use shared::models::{ApplyResult, NotificationKind, ShiftApplication};
use shared::util::format_millis;
use sqlx::SqlitePool;

use super::shifts::{restriction_allows, should_auto_accept};
use super::{assigned_or_err, ensure_joinable, find_shift, owned_shift};
use crate::db::repository::shift::AssignOutcome;
use crate::db::repository::{RepoError, application, employee, employer, favorite_list, shift};
use crate::notify;
use crate::utils::validation::page;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Employee applies to a shift, possibly being accepted on the spot
pub async fn apply(
    pool: &SqlitePool,
    employee_id: i64,
    shift_id: i64,
    now: i64,
) -> AppResult<ApplyResult> {
    let target = find_shift(pool, shift_id).await?;
    ensure_joinable(&target, now)?;

    if shift::is_assigned(pool, shift_id, employee_id).await? {
        return Err(AppError::new(ErrorCode::AlreadyInShift));
    }
    if application::exists(pool, shift_id, employee_id).await? {
        return Err(AppError::new(ErrorCode::AlreadyApplied));
    }

    let me = employee::find_by_id(pool, employee_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;
    if me.rating < target.minimum_allowed_rating {
        return Err(AppError::new(ErrorCode::RatingTooLow)
            .with_detail("rating", me.rating)
            .with_detail("minimum_allowed_rating", target.minimum_allowed_rating));
    }

    let membership = favorite_list::membership(pool, target.employer_id, employee_id).await?;
    restriction_allows(target.application_restriction, membership)?;

    let owner = employer::find_by_id(pool, target.employer_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EmployerNotFound))?;
    let when = format_millis(target.starting_at);

    if should_auto_accept(&owner, membership) {
        assigned_or_err(shift::assign_employee(pool, shift_id, employee_id, now).await?)?;

        notify::send_to_employee(
            pool,
            employee_id,
            NotificationKind::ApplicationAutoAccepted,
            "Application accepted",
            format!("You are confirmed for the shift starting {when}"),
            json!({ "shift_id": shift_id }),
        )
        .await;
        notify::send_to_employer(
            pool,
            target.employer_id,
            NotificationKind::ApplicationAutoAccepted,
            "Favorite talent joined a shift",
            format!(
                "{} {} was accepted automatically for the shift starting {when}",
                me.first_name, me.last_name
            ),
            json!({ "shift_id": shift_id, "employee_id": employee_id }),
        )
        .await;

        tracing::info!(shift_id, employee_id, "Application auto-accepted");
        return Ok(ApplyResult {
            application: None,
            auto_accepted: true,
        });
    }

    let created = application::create(pool, shift_id, employee_id, now)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::new(ErrorCode::AlreadyApplied),
            other => other.into(),
        })?;

    notify::send_to_employer(
        pool,
        target.employer_id,
        NotificationKind::ApplicationReceived,
        "New application",
        format!(
            "{} {} applied to the shift starting {when}",
            me.first_name, me.last_name
        ),
        json!({ "shift_id": shift_id, "application_id": created.id }),
    )
    .await;

    tracing::info!(application_id = created.id, shift_id, employee_id, "Application received");
    Ok(ApplyResult {
        application: Some(created),
        auto_accepted: false,
    })
}

pub async fn list_for_shift(
    pool: &SqlitePool,
    employer_id: i64,
    shift_id: i64,
) -> AppResult<Vec<ShiftApplication>> {
    owned_shift(pool, shift_id, employer_id).await?;
    Ok(application::find_by_shift(pool, shift_id).await?)
}

pub async fn list_mine(
    pool: &SqlitePool,
    employee_id: i64,
    limit: Option<i64>,
    offset: Option<i64>,
) -> AppResult<Vec<ShiftApplication>> {
    let (limit, offset) = page(limit, offset);
    Ok(application::find_by_employee(pool, employee_id, limit, offset).await?)
}

/// Employee takes back their own application
pub async fn withdraw(pool: &SqlitePool, employee_id: i64, id: i64) -> AppResult<()> {
    match application::find_by_id(pool, id).await? {
        Some(a) if a.employee_id == employee_id => {
            application::delete(pool, id).await?;
            tracing::info!(application_id = id, employee_id, "Application withdrawn");
            Ok(())
        }
        _ => Err(AppError::new(ErrorCode::ApplicationNotFound)),
    }
}

/// Employer accepts: the applicant joins the shift
pub async fn accept(
    pool: &SqlitePool,
    employer_id: i64,
    id: i64,
    now: i64,
) -> AppResult<ShiftApplication> {
    let (app, target) = owned_application(pool, employer_id, id).await?;
    if target.has_started(now) {
        return Err(AppError::new(ErrorCode::ShiftAlreadyStarted));
    }

    match application::accept(pool, &app, now).await? {
        // Already on the shift: the application is just cleared
        AssignOutcome::AlreadyAssigned => {}
        outcome => assigned_or_err(outcome)?,
    }

    notify::send_to_employee(
        pool,
        app.employee_id,
        NotificationKind::ApplicationAccepted,
        "Application accepted",
        format!(
            "You are confirmed for the shift starting {}",
            format_millis(target.starting_at)
        ),
        json!({ "shift_id": app.shift_id }),
    )
    .await;

    tracing::info!(
        application_id = id,
        shift_id = app.shift_id,
        employee_id = app.employee_id,
        "Application accepted"
    );
    Ok(app)
}

/// Employer rejects: the application is removed
pub async fn reject(pool: &SqlitePool, employer_id: i64, id: i64) -> AppResult<ShiftApplication> {
    let (app, target) = owned_application(pool, employer_id, id).await?;
    application::delete(pool, id).await?;

    notify::send_to_employee(
        pool,
        app.employee_id,
        NotificationKind::ApplicationRejected,
        "Application declined",
        format!(
            "Your application for the shift starting {} was declined",
            format_millis(target.starting_at)
        ),
        json!({ "shift_id": app.shift_id }),
    )
    .await;

    tracing::info!(application_id = id, shift_id = app.shift_id, "Application rejected");
    Ok(app)
}

async fn owned_application(
    pool: &SqlitePool,
    employer_id: i64,
    id: i64,
) -> AppResult<(ShiftApplication, shared::models::Shift)> {
    let app = application::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ApplicationNotFound))?;
    let target = owned_shift(pool, app.shift_id, employer_id)
        .await
        .map_err(|_| AppError::new(ErrorCode::ApplicationNotFound))?;
    Ok((app, target))
}
