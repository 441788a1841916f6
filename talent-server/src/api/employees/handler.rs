//! Employee Handlers
//!
//! Talent search and profiles, own settings, own shifts, badges.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use sqlx::SqlitePool;

use crate::api::PageQuery;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::rating::{self, RatingTarget};
use crate::db::repository::{badge, employee, position};
use crate::utils::validation::page;
use crate::utils::{AppError, AppResult, ErrorCode, ValidJson};
use crate::workflow::shifts;
use shared::models::{
    Employee, EmployeeDetail, EmployeeQuery, EmployeeUpdate, MyShiftsQuery, Rating, Shift,
};
use shared::util::now_millis;

async fn detail(pool: &SqlitePool, id: i64) -> AppResult<EmployeeDetail> {
    let employee = employee::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;
    Ok(EmployeeDetail {
        positions: employee::positions(pool, id).await?,
        badges: employee::badges(pool, id).await?,
        employee,
    })
}

/// GET /api/employees
///
/// Talent search for employers and admins.
pub async fn search(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<EmployeeQuery>,
) -> AppResult<Json<Vec<Employee>>> {
    if !current_user.is_admin() {
        current_user.require_employer()?;
    }
    let (limit, offset) = page(query.limit, query.offset);
    let employees = employee::search(&state.pool, &query, limit, offset).await?;
    Ok(Json(employees))
}

/// GET /api/employees/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<EmployeeDetail>> {
    Ok(Json(detail(&state.pool, id).await?))
}

/// GET /api/employees/me
pub async fn me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<EmployeeDetail>> {
    let employee_id = current_user.require_employee()?;
    Ok(Json(detail(&state.pool, employee_id).await?))
}

/// PUT /api/employees/me
pub async fn update_me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ValidJson(payload): ValidJson<EmployeeUpdate>,
) -> AppResult<Json<EmployeeDetail>> {
    let employee_id = current_user.require_employee()?;

    if let Some(ids) = &payload.position_ids {
        let mut unique = ids.clone();
        unique.sort_unstable();
        unique.dedup();
        if position::count_existing(&state.pool, &unique).await? != unique.len() {
            return Err(AppError::new(ErrorCode::PositionNotFound));
        }
    }

    employee::update(&state.pool, employee_id, payload).await?;
    Ok(Json(detail(&state.pool, employee_id).await?))
}

/// GET /api/employees/me/shifts?when=upcoming|past
pub async fn my_shifts(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<MyShiftsQuery>,
) -> AppResult<Json<Vec<Shift>>> {
    let employee_id = current_user.require_employee()?;
    let shifts = shifts::employee_shifts(&state.pool, employee_id, &query, now_millis()).await?;
    Ok(Json(shifts))
}

/// GET /api/employees/{id}/ratings (public)
pub async fn ratings(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<Rating>>> {
    if employee::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::new(ErrorCode::EmployeeNotFound));
    }
    let (limit, offset) = page(query.limit, query.offset);
    let ratings = rating::find_for(&state.pool, RatingTarget::Employee(id), limit, offset).await?;
    Ok(Json(ratings))
}

/// Employer must have had the employee on one of its shifts
async fn check_badge_access(
    pool: &SqlitePool,
    employer_id: i64,
    employee_id: i64,
    badge_id: i64,
) -> AppResult<()> {
    if employee::find_by_id(pool, employee_id).await?.is_none() {
        return Err(AppError::new(ErrorCode::EmployeeNotFound));
    }
    if badge::find_by_id(pool, badge_id).await?.is_none() {
        return Err(AppError::new(ErrorCode::BadgeNotFound));
    }
    if !employee::has_worked_for(pool, employee_id, employer_id).await? {
        return Err(AppError::with_message(
            ErrorCode::PermissionDenied,
            "Badges can only be granted to talent who worked one of your shifts",
        ));
    }
    Ok(())
}

/// POST /api/employees/{id}/badges/{badge_id}
pub async fn grant_badge(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path((id, badge_id)): Path<(i64, i64)>,
) -> AppResult<Json<EmployeeDetail>> {
    let employer_id = current_user.require_employer()?;
    check_badge_access(&state.pool, employer_id, id, badge_id).await?;

    if badge::grant(&state.pool, id, badge_id, employer_id, now_millis()).await? {
        tracing::info!(employee_id = id, badge_id, employer_id, "Badge granted");
    }
    Ok(Json(detail(&state.pool, id).await?))
}

/// DELETE /api/employees/{id}/badges/{badge_id}
pub async fn revoke_badge(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path((id, badge_id)): Path<(i64, i64)>,
) -> AppResult<Json<EmployeeDetail>> {
    let employer_id = current_user.require_employer()?;
    check_badge_access(&state.pool, employer_id, id, badge_id).await?;

    if !badge::revoke(&state.pool, id, badge_id).await? {
        return Err(AppError::new(ErrorCode::BadgeNotFound));
    }
    tracing::info!(employee_id = id, badge_id, employer_id, "Badge revoked");
    Ok(Json(detail(&state.pool, id).await?))
}
