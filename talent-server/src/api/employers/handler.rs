//! Employer Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use sqlx::SqlitePool;

use crate::api::PageQuery;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::rating::{self, RatingTarget};
use crate::db::repository::{employer, user};
use crate::utils::validation::page;
use crate::utils::{AppError, AppResult, ErrorCode, ValidJson};
use shared::models::{Employer, EmployerUpdate, Rating, User};

async fn load(pool: &SqlitePool, id: i64) -> AppResult<Employer> {
    employer::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EmployerNotFound))
}

/// GET /api/employers/{id} (public)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Employer>> {
    Ok(Json(load(&state.pool, id).await?))
}

/// GET /api/employers/me
pub async fn me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Employer>> {
    let employer_id = current_user.require_employer()?;
    Ok(Json(load(&state.pool, employer_id).await?))
}

/// PUT /api/employers/me
pub async fn update_me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ValidJson(mut payload): ValidJson<EmployerUpdate>,
) -> AppResult<Json<Employer>> {
    let employer_id = current_user.require_employer()?;
    if let Some(title) = payload.title.as_mut() {
        *title = title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::validation("title must not be empty"));
        }
    }

    let updated = employer::update(&state.pool, employer_id, payload).await?;
    tracing::info!(employer_id, user_id = current_user.id, "Employer settings updated");
    Ok(Json(updated))
}

/// GET /api/employers/me/users
pub async fn staff(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<User>>> {
    let employer_id = current_user.require_employer()?;
    let users = user::find_by_employer(&state.pool, employer_id).await?;
    Ok(Json(users))
}

/// GET /api/employers/{id}/ratings (public)
pub async fn ratings(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<Rating>>> {
    load(&state.pool, id).await?;
    let (limit, offset) = page(query.limit, query.offset);
    let ratings = rating::find_for(&state.pool, RatingTarget::Employer(id), limit, offset).await?;
    Ok(Json(ratings))
}
