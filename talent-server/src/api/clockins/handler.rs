//! Clock-in Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::auth::CurrentUser;
use crate::clockin::service;
use crate::core::ServerState;
use crate::utils::{AppJson, AppResult, ValidJson};
use shared::models::{ClockRequest, Clockin, ClockinCreate, ClockinQuery, ClockinUpdate};

/// POST /api/clockins/in
pub async fn clock_in(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    AppJson(payload): AppJson<ClockRequest>,
) -> AppResult<Json<Clockin>> {
    Ok(Json(service::clock_in(&state, &current_user, &payload).await?))
}

/// POST /api/clockins/out
pub async fn clock_out(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    AppJson(payload): AppJson<ClockRequest>,
) -> AppResult<Json<Clockin>> {
    Ok(Json(service::clock_out(&state, &current_user, &payload).await?))
}

/// GET /api/clockins
///
/// Employers see clock-ins on their shifts, talent their own.
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<ClockinQuery>,
) -> AppResult<Json<Vec<Clockin>>> {
    Ok(Json(service::list(&state.pool, &current_user, &query).await?))
}

/// POST /api/clockins (employer manual entry)
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ValidJson(payload): ValidJson<ClockinCreate>,
) -> AppResult<Json<Clockin>> {
    Ok(Json(
        service::create_manual(&state.pool, &current_user, &payload).await?,
    ))
}

/// PUT /api/clockins/{id}
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    ValidJson(payload): ValidJson<ClockinUpdate>,
) -> AppResult<Json<Clockin>> {
    Ok(Json(
        service::update_manual(&state.pool, &current_user, id, &payload).await?,
    ))
}
