//! Favorite List Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use sqlx::SqlitePool;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{employee, favorite_list};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode, ValidJson};
use shared::models::{FavoriteList, FavoriteListCreate, FavoriteListDetail, FavoriteListUpdate};
use shared::util::now_millis;

async fn owned(pool: &SqlitePool, id: i64, employer_id: i64) -> AppResult<FavoriteList> {
    match favorite_list::find_by_id(pool, id).await? {
        Some(list) if list.employer_id == employer_id => Ok(list),
        _ => Err(AppError::new(ErrorCode::FavoriteListNotFound)),
    }
}

async fn detail(pool: &SqlitePool, list: FavoriteList) -> AppResult<FavoriteListDetail> {
    let employees = favorite_list::employees(pool, list.id).await?;
    Ok(FavoriteListDetail { list, employees })
}

/// GET /api/favlists
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<FavoriteList>>> {
    let employer_id = current_user.require_employer()?;
    Ok(Json(
        favorite_list::find_by_employer(&state.pool, employer_id).await?,
    ))
}

/// GET /api/favlists/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<FavoriteListDetail>> {
    let employer_id = current_user.require_employer()?;
    let list = owned(&state.pool, id, employer_id).await?;
    Ok(Json(detail(&state.pool, list).await?))
}

/// POST /api/favlists
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ValidJson(payload): ValidJson<FavoriteListCreate>,
) -> AppResult<Json<FavoriteList>> {
    let employer_id = current_user.require_employer()?;
    validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;
    let created = favorite_list::create(&state.pool, employer_id, payload, now_millis()).await?;
    Ok(Json(created))
}

/// PUT /api/favlists/{id}
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    ValidJson(payload): ValidJson<FavoriteListUpdate>,
) -> AppResult<Json<FavoriteList>> {
    let employer_id = current_user.require_employer()?;
    owned(&state.pool, id, employer_id).await?;
    let updated = favorite_list::update(&state.pool, id, employer_id, payload).await?;
    Ok(Json(updated))
}

/// DELETE /api/favlists/{id}
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let employer_id = current_user.require_employer()?;
    if !favorite_list::delete(&state.pool, id, employer_id).await? {
        return Err(AppError::new(ErrorCode::FavoriteListNotFound));
    }
    Ok(Json(true))
}

/// POST /api/favlists/{id}/employees/{employee_id}
pub async fn add_employee(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path((id, employee_id)): Path<(i64, i64)>,
) -> AppResult<Json<FavoriteListDetail>> {
    let employer_id = current_user.require_employer()?;
    let list = owned(&state.pool, id, employer_id).await?;
    if employee::find_by_id(&state.pool, employee_id).await?.is_none() {
        return Err(AppError::new(ErrorCode::EmployeeNotFound));
    }
    favorite_list::add_employee(&state.pool, id, employee_id).await?;
    Ok(Json(detail(&state.pool, list).await?))
}

/// DELETE /api/favlists/{id}/employees/{employee_id}
pub async fn remove_employee(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path((id, employee_id)): Path<(i64, i64)>,
) -> AppResult<Json<FavoriteListDetail>> {
    let employer_id = current_user.require_employer()?;
    let list = owned(&state.pool, id, employer_id).await?;
    if !favorite_list::remove_employee(&state.pool, id, employee_id).await? {
        return Err(AppError::new(ErrorCode::EmployeeNotFound));
    }
    Ok(Json(detail(&state.pool, list).await?))
}
