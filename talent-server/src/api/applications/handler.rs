//! Application Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::PageQuery;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;
use crate::workflow::applications;
use shared::models::ShiftApplication;
use shared::util::now_millis;

/// GET /api/applications/me
pub async fn mine(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<ShiftApplication>>> {
    let employee_id = current_user.require_employee()?;
    let found =
        applications::list_mine(&state.pool, employee_id, query.limit, query.offset).await?;
    Ok(Json(found))
}

/// DELETE /api/applications/{id}
pub async fn withdraw(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let employee_id = current_user.require_employee()?;
    applications::withdraw(&state.pool, employee_id, id).await?;
    Ok(Json(true))
}

/// POST /api/applications/{id}/accept
pub async fn accept(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ShiftApplication>> {
    let employer_id = current_user.require_employer()?;
    Ok(Json(
        applications::accept(&state.pool, employer_id, id, now_millis()).await?,
    ))
}

/// POST /api/applications/{id}/reject
pub async fn reject(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ShiftApplication>> {
    let employer_id = current_user.require_employer()?;
    Ok(Json(applications::reject(&state.pool, employer_id, id).await?))
}
