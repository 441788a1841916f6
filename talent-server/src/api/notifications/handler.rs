//! Notification Handlers
//!
//! Every account reads only its own notifications.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::notification;
use crate::utils::validation::page;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Notification, NotificationQuery, UnreadCount};
use shared::util::now_millis;

/// GET /api/notifications?unread=true
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<NotificationQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    let (limit, offset) = page(query.limit, query.offset);
    let found =
        notification::find_by_user(&state.pool, current_user.id, query.unread, limit, offset)
            .await?;
    Ok(Json(found))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<UnreadCount>> {
    let count = notification::unread_count(&state.pool, current_user.id).await?;
    Ok(Json(UnreadCount { count }))
}

/// POST /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !notification::mark_read(&state.pool, id, current_user.id, now_millis()).await? {
        return Err(AppError::new(ErrorCode::NotificationNotFound));
    }
    Ok(Json(true))
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<UnreadCount>> {
    notification::mark_all_read(&state.pool, current_user.id, now_millis()).await?;
    Ok(Json(UnreadCount { count: 0 }))
}
