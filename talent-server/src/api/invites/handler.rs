//! Invite Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppJson, AppResult};
use crate::workflow::invites;
use shared::models::{InviteCreate, InviteQuery, InviteRespond, ShiftInvite};
use shared::util::now_millis;

/// GET /api/invites (sent by the caller's employer)
pub async fn sent(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<InviteQuery>,
) -> AppResult<Json<Vec<ShiftInvite>>> {
    let employer_id = current_user.require_employer()?;
    Ok(Json(invites::list_sent(&state.pool, employer_id, &query).await?))
}

/// POST /api/invites
pub async fn send(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    AppJson(payload): AppJson<InviteCreate>,
) -> AppResult<Json<ShiftInvite>> {
    let employer_id = current_user.require_employer()?;
    let created = invites::send(
        &state.pool,
        current_user.id,
        employer_id,
        &payload,
        now_millis(),
    )
    .await?;
    Ok(Json(created))
}

/// GET /api/invites/me
pub async fn mine(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<InviteQuery>,
) -> AppResult<Json<Vec<ShiftInvite>>> {
    let employee_id = current_user.require_employee()?;
    Ok(Json(invites::list_mine(&state.pool, employee_id, &query).await?))
}

/// POST /api/invites/{id}/respond
pub async fn respond(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<InviteRespond>,
) -> AppResult<Json<ShiftInvite>> {
    let employee_id = current_user.require_employee()?;
    let updated =
        invites::respond(&state.pool, employee_id, id, payload.accept, now_millis()).await?;
    Ok(Json(updated))
}

/// DELETE /api/invites/{id}
pub async fn cancel(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ShiftInvite>> {
    let employer_id = current_user.require_employer()?;
    Ok(Json(
        invites::cancel(&state.pool, employer_id, id, now_millis()).await?,
    ))
}
