//! Shift Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppResult, ValidJson};
use crate::workflow::{applications, shifts};
use shared::models::{
    ApplyResult, Shift, ShiftApplication, ShiftCreate, ShiftDetail, ShiftQuery, ShiftUpdate,
    UserRole,
};
use shared::util::now_millis;

/// GET /api/shifts
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<ShiftQuery>,
) -> AppResult<Json<Vec<Shift>>> {
    let employer_id = current_user.require_employer()?;
    Ok(Json(shifts::list(&state.pool, employer_id, &query).await?))
}

/// POST /api/shifts
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ValidJson(payload): ValidJson<ShiftCreate>,
) -> AppResult<Json<Shift>> {
    let employer_id = current_user.require_employer()?;
    let created = shifts::create(&state.pool, employer_id, &payload, now_millis()).await?;
    Ok(Json(created))
}

/// GET /api/shifts/{id}
///
/// Employers only see their own shifts; talent and admins see any.
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ShiftDetail>> {
    let owner = match current_user.role {
        UserRole::Employer => Some(current_user.require_employer()?),
        UserRole::Employee | UserRole::Admin => None,
    };
    Ok(Json(shifts::detail(&state.pool, id, owner).await?))
}

/// PUT /api/shifts/{id}
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    ValidJson(payload): ValidJson<ShiftUpdate>,
) -> AppResult<Json<Shift>> {
    let employer_id = current_user.require_employer()?;
    let updated = shifts::update(&state.pool, employer_id, id, &payload, now_millis()).await?;
    Ok(Json(updated))
}

/// DELETE /api/shifts/{id}
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let employer_id = current_user.require_employer()?;
    Ok(Json(shifts::delete(&state.pool, employer_id, id).await?))
}

/// POST /api/shifts/{id}/publish
pub async fn publish(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Shift>> {
    let employer_id = current_user.require_employer()?;
    Ok(Json(
        shifts::publish(&state.pool, employer_id, id, now_millis()).await?,
    ))
}

/// POST /api/shifts/{id}/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Shift>> {
    let employer_id = current_user.require_employer()?;
    Ok(Json(
        shifts::cancel(&state.pool, employer_id, id, now_millis()).await?,
    ))
}

/// POST /api/shifts/{id}/employees/{employee_id}
pub async fn assign(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path((id, employee_id)): Path<(i64, i64)>,
) -> AppResult<Json<ShiftDetail>> {
    let employer_id = current_user.require_employer()?;
    let detail = shifts::assign(&state.pool, employer_id, id, employee_id, now_millis()).await?;
    Ok(Json(detail))
}

/// DELETE /api/shifts/{id}/employees/{employee_id}
pub async fn remove(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path((id, employee_id)): Path<(i64, i64)>,
) -> AppResult<Json<ShiftDetail>> {
    let employer_id = current_user.require_employer()?;
    let detail = shifts::remove(&state.pool, employer_id, id, employee_id, now_millis()).await?;
    Ok(Json(detail))
}

/// POST /api/shifts/{id}/leave
pub async fn leave(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let employee_id = current_user.require_employee()?;
    shifts::leave(&state.pool, employee_id, id, now_millis()).await?;
    Ok(Json(true))
}

/// GET /api/shifts/{id}/applications
pub async fn applications(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<ShiftApplication>>> {
    let employer_id = current_user.require_employer()?;
    Ok(Json(
        applications::list_for_shift(&state.pool, employer_id, id).await?,
    ))
}

/// POST /api/shifts/{id}/apply
pub async fn apply(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApplyResult>> {
    let employee_id = current_user.require_employee()?;
    Ok(Json(
        applications::apply(&state.pool, employee_id, id, now_millis()).await?,
    ))
}
