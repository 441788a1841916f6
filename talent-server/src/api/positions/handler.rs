//! Position Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{RepoError, position};
use crate::utils::{AppError, AppResult, ErrorCode, ValidJson};
use shared::models::{Position, PositionCreate, PositionUpdate};

/// GET /api/positions
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Position>>> {
    Ok(Json(position::find_all(&state.pool).await?))
}

/// GET /api/positions/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Position>> {
    let found = position::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PositionNotFound))?;
    Ok(Json(found))
}

/// POST /api/positions
pub async fn create(
    State(state): State<ServerState>,
    ValidJson(payload): ValidJson<PositionCreate>,
) -> AppResult<Json<Position>> {
    let created = position::create(&state.pool, payload).await?;
    tracing::info!(position_id = created.id, title = %created.title, "Position created");
    Ok(Json(created))
}

/// PUT /api/positions/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ValidJson(payload): ValidJson<PositionUpdate>,
) -> AppResult<Json<Position>> {
    let updated = position::update(&state.pool, id, payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => AppError::new(ErrorCode::PositionNotFound),
            other => other.into(),
        })?;
    Ok(Json(updated))
}

/// DELETE /api/positions/{id}
///
/// Refused while any shift references the position.
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    if position::is_in_use(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::PositionInUse));
    }
    if !position::delete(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::PositionNotFound));
    }
    tracing::info!(position_id = id, "Position deleted");
    Ok(Json(true))
}
