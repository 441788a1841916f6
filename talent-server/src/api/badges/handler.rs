//! Badge Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{RepoError, badge};
use crate::utils::{AppError, AppResult, ErrorCode, ValidJson};
use shared::models::{Badge, BadgeCreate, BadgeUpdate};

/// GET /api/badges
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Badge>>> {
    Ok(Json(badge::find_all(&state.pool).await?))
}

/// POST /api/badges
pub async fn create(
    State(state): State<ServerState>,
    ValidJson(payload): ValidJson<BadgeCreate>,
) -> AppResult<Json<Badge>> {
    let created = badge::create(&state.pool, payload).await?;
    tracing::info!(badge_id = created.id, title = %created.title, "Badge created");
    Ok(Json(created))
}

/// PUT /api/badges/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ValidJson(payload): ValidJson<BadgeUpdate>,
) -> AppResult<Json<Badge>> {
    let updated = badge::update(&state.pool, id, payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => AppError::new(ErrorCode::BadgeNotFound),
            other => other.into(),
        })?;
    Ok(Json(updated))
}

/// DELETE /api/badges/{id}
///
/// Grants of the badge are removed with it.
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    if !badge::delete(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::BadgeNotFound));
    }
    tracing::info!(badge_id = id, "Badge deleted");
    Ok(Json(true))
}
