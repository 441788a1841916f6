//! Rating Handlers

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppResult, ValidJson};
use crate::workflow::ratings;
use shared::models::{Rating, RatingCreate};
use shared::util::now_millis;

/// POST /api/ratings
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ValidJson(payload): ValidJson<RatingCreate>,
) -> AppResult<Json<Rating>> {
    let created = ratings::rate(&state.pool, &current_user, &payload, now_millis()).await?;
    Ok(Json(created))
}
