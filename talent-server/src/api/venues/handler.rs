//! Venue Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use sqlx::SqlitePool;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, venue};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode, ValidJson};
use shared::models::{Venue, VenueCreate, VenueUpdate};
use shared::util::now_millis;

async fn owned(pool: &SqlitePool, id: i64, employer_id: i64) -> AppResult<Venue> {
    match venue::find_by_id(pool, id).await? {
        Some(v) if v.employer_id == employer_id => Ok(v),
        _ => Err(AppError::new(ErrorCode::VenueNotFound)),
    }
}

/// GET /api/venues
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Venue>>> {
    let employer_id = current_user.require_employer()?;
    Ok(Json(venue::find_by_employer(&state.pool, employer_id).await?))
}

/// GET /api/venues/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Venue>> {
    let employer_id = current_user.require_employer()?;
    Ok(Json(owned(&state.pool, id, employer_id).await?))
}

/// POST /api/venues
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ValidJson(payload): ValidJson<VenueCreate>,
) -> AppResult<Json<Venue>> {
    let employer_id = current_user.require_employer()?;
    validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;

    let created = venue::create(&state.pool, employer_id, payload, now_millis()).await?;
    tracing::info!(venue_id = created.id, employer_id, "Venue created");
    Ok(Json(created))
}

/// PUT /api/venues/{id}
///
/// Moving a venue moves the geofence for its open shifts too.
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    ValidJson(payload): ValidJson<VenueUpdate>,
) -> AppResult<Json<Venue>> {
    let employer_id = current_user.require_employer()?;
    let updated = venue::update(&state.pool, id, employer_id, payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => AppError::new(ErrorCode::VenueNotFound),
            other => other.into(),
        })?;
    Ok(Json(updated))
}

/// DELETE /api/venues/{id}
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let employer_id = current_user.require_employer()?;
    owned(&state.pool, id, employer_id).await?;

    if venue::has_active_shifts(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::VenueInUse));
    }
    venue::delete(&state.pool, id, employer_id).await?;
    tracing::info!(venue_id = id, employer_id, "Venue deleted");
    Ok(Json(true))
}
