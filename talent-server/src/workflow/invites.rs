//! Shift invites

use serde_json::json;
use shared::models::{InviteCreate, InviteQuery, InviteStatus, NotificationKind, ShiftInvite};
use shared::util::format_millis;
use sqlx::SqlitePool;

use super::{assigned_or_err, ensure_joinable, find_shift, owned_shift};
use crate::db::repository::shift::AssignOutcome;
use crate::db::repository::{RepoError, employee, invite, shift};
use crate::notify;
use crate::utils::validation::page;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Employer invites an employee to one of its shifts
pub async fn send(
    pool: &SqlitePool,
    sender_user_id: i64,
    employer_id: i64,
    data: &InviteCreate,
    now: i64,
) -> AppResult<ShiftInvite> {
    let target = owned_shift(pool, data.shift_id, employer_id).await?;
    ensure_joinable(&target, now)?;

    let invitee = employee::find_by_id(pool, data.employee_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;
    if invitee.stop_receiving_invites {
        return Err(AppError::new(ErrorCode::InvitesDisabled));
    }
    if shift::is_assigned(pool, data.shift_id, data.employee_id).await? {
        return Err(AppError::new(ErrorCode::AlreadyInShift));
    }

    let created = invite::create(
        pool,
        sender_user_id,
        employer_id,
        data.shift_id,
        data.employee_id,
        now,
    )
    .await
    .map_err(|e| match e {
        RepoError::Duplicate(_) => AppError::new(ErrorCode::InviteAlreadyPending),
        other => other.into(),
    })?;

    notify::send_to_employee(
        pool,
        data.employee_id,
        NotificationKind::InviteReceived,
        "New shift invite",
        format!(
            "You are invited to a shift starting {}",
            format_millis(target.starting_at)
        ),
        json!({ "invite_id": created.id, "shift_id": data.shift_id }),
    )
    .await;

    tracing::info!(
        invite_id = created.id,
        shift_id = data.shift_id,
        employee_id = data.employee_id,
        "Invite sent"
    );
    Ok(created)
}

pub async fn list_mine(
    pool: &SqlitePool,
    employee_id: i64,
    query: &InviteQuery,
) -> AppResult<Vec<ShiftInvite>> {
    let (limit, offset) = page(query.limit, query.offset);
    Ok(invite::find_by_employee(pool, employee_id, query, limit, offset).await?)
}

pub async fn list_sent(
    pool: &SqlitePool,
    employer_id: i64,
    query: &InviteQuery,
) -> AppResult<Vec<ShiftInvite>> {
    let (limit, offset) = page(query.limit, query.offset);
    Ok(invite::find_by_employer(pool, employer_id, query, limit, offset).await?)
}

/// Employee accepts or rejects
///
/// Accepting a full shift fails with `ShiftFull` and leaves the invite
/// PENDING so it can be accepted if a spot frees up.
pub async fn respond(
    pool: &SqlitePool,
    employee_id: i64,
    id: i64,
    accept: bool,
    now: i64,
) -> AppResult<ShiftInvite> {
    let existing = match invite::find_by_id(pool, id).await? {
        Some(i) if i.employee_id == employee_id => i,
        _ => return Err(AppError::new(ErrorCode::InviteNotFound)),
    };
    if existing.status != InviteStatus::Pending {
        return Err(not_pending(&existing));
    }
    let target = find_shift(pool, existing.shift_id).await?;
    let when = format_millis(target.starting_at);

    let (kind, title, body) = if accept {
        if target.has_started(now) {
            return Err(AppError::new(ErrorCode::ShiftAlreadyStarted));
        }
        match invite::accept(pool, &existing, now).await? {
            AssignOutcome::AlreadyAssigned => {
                // Joined some other way; the invite is settled all the same
                invite::resolve(pool, id, InviteStatus::Accepted, now).await?;
            }
            outcome => assigned_or_err(outcome)?,
        }
        (
            NotificationKind::InviteAccepted,
            "Invite accepted",
            format!("Your invite for the shift starting {when} was accepted"),
        )
    } else {
        if !invite::resolve(pool, id, InviteStatus::Rejected, now).await? {
            return Err(not_pending(&existing));
        }
        (
            NotificationKind::InviteRejected,
            "Invite declined",
            format!("Your invite for the shift starting {when} was declined"),
        )
    };

    notify::send(
        pool,
        existing.sender_user_id,
        kind,
        title,
        body,
        json!({ "invite_id": id, "shift_id": existing.shift_id, "employee_id": employee_id }),
    )
    .await;

    tracing::info!(invite_id = id, employee_id, accept, "Invite answered");
    reload(pool, id).await
}

/// Employer withdraws a pending invite
pub async fn cancel(pool: &SqlitePool, employer_id: i64, id: i64, now: i64) -> AppResult<ShiftInvite> {
    let existing = match invite::find_by_id(pool, id).await? {
        Some(i) if i.employer_id == employer_id => i,
        _ => return Err(AppError::new(ErrorCode::InviteNotFound)),
    };
    if !invite::resolve(pool, id, InviteStatus::Cancelled, now).await? {
        return Err(not_pending(&existing));
    }

    notify::send_to_employee(
        pool,
        existing.employee_id,
        NotificationKind::InviteCancelled,
        "Invite withdrawn",
        "An invite you received was withdrawn",
        json!({ "invite_id": id, "shift_id": existing.shift_id }),
    )
    .await;

    tracing::info!(invite_id = id, "Invite cancelled");
    reload(pool, id).await
}

async fn reload(pool: &SqlitePool, id: i64) -> AppResult<ShiftInvite> {
    invite::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::InviteNotFound))
}

fn not_pending(invite: &ShiftInvite) -> AppError {
    AppError::new(ErrorCode::InviteNotPending).with_detail("status", invite.status.as_str())
}
