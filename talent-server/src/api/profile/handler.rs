//! Profile Handlers

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::user;
use crate::utils::{AppError, AppResult, ErrorCode, ValidJson};
use shared::models::{Profile, ProfileUpdate};
use shared::util::now_millis;

/// GET /api/profile
pub async fn get(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Profile>> {
    let profile = user::find_profile(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound))?;
    Ok(Json(profile))
}

/// PUT /api/profile
///
/// Latitude and longitude are only accepted as a pair.
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ValidJson(payload): ValidJson<ProfileUpdate>,
) -> AppResult<Json<Profile>> {
    if payload.latitude.is_some() != payload.longitude.is_some() {
        return Err(AppError::validation(
            "latitude and longitude must be set together",
        ));
    }
    let profile = user::update_profile(&state.pool, current_user.id, payload, now_millis()).await?;
    Ok(Json(profile))
}
