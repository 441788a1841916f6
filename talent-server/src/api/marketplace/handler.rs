//! Marketplace Handlers

use axum::{
    Json,
    extract::{Query, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;
use crate::workflow::shifts;
use shared::models::{MarketplaceQuery, MarketplaceShift};
use shared::util::now_millis;

/// GET /api/marketplace/shifts
///
/// Open shifts the calling talent could join, soonest first. Distance to
/// the venue is included when the talent has a location on file.
pub async fn shifts(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<MarketplaceQuery>,
) -> AppResult<Json<Vec<MarketplaceShift>>> {
    let employee_id = current_user.require_employee()?;
    let found = shifts::marketplace(&state.pool, employee_id, &query, now_millis()).await?;
    Ok(Json(found))
}
