//! Admin Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::PageQuery;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::user;
use crate::security_log;
use crate::utils::validation::page;
use crate::utils::{AppError, AppJson, AppResult};
use shared::models::{User, UserActiveUpdate};

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<User>>> {
    let (limit, offset) = page(query.limit, query.offset);
    let users = user::find_all(&state.pool, limit, offset).await?;
    Ok(Json(users))
}

/// PUT /api/admin/users/{id}/active
///
/// Deactivated users keep their tokens until expiry but can no longer
/// log in.
pub async fn set_active(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<UserActiveUpdate>,
) -> AppResult<Json<User>> {
    if id == current_user.id && !payload.is_active {
        return Err(AppError::validation("Admins cannot deactivate themselves"));
    }
    let updated = user::set_active(&state.pool, id, payload.is_active).await?;
    security_log!(
        "INFO",
        "user_active_changed",
        admin_id = current_user.id,
        user_id = id,
        is_active = payload.is_active
    );
    Ok(Json(updated))
}
