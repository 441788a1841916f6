//! Payroll Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::PageQuery;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::payroll::service;
use crate::utils::{AppResult, ValidJson};
use shared::models::{
    GenerateResult, PaymentUpdate, PayrollPayment, PayrollPeriod, PayrollPeriodDetail,
    PayrollQuery,
};
use shared::util::now_millis;

/// GET /api/payroll/periods
pub async fn list_periods(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<PayrollQuery>,
) -> AppResult<Json<Vec<PayrollPeriod>>> {
    let employer_id = current_user.require_employer()?;
    Ok(Json(
        service::list_periods(&state.pool, employer_id, &query).await?,
    ))
}

/// POST /api/payroll/periods/generate
pub async fn generate(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<GenerateResult>> {
    let employer_id = current_user.require_employer()?;
    Ok(Json(
        service::generate_periods(&state.pool, employer_id, now_millis()).await?,
    ))
}

/// GET /api/payroll/periods/{id}
pub async fn get_period(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<PayrollPeriodDetail>> {
    let employer_id = current_user.require_employer()?;
    Ok(Json(service::get_period(&state.pool, employer_id, id).await?))
}

/// POST /api/payroll/periods/{id}/finalize
pub async fn finalize(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<PayrollPeriod>> {
    let employer_id = current_user.require_employer()?;
    Ok(Json(service::finalize(&state.pool, employer_id, id).await?))
}

/// POST /api/payroll/periods/{id}/paid
pub async fn mark_paid(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<PayrollPeriod>> {
    let employer_id = current_user.require_employer()?;
    Ok(Json(service::mark_paid(&state.pool, employer_id, id).await?))
}

/// PUT /api/payroll/payments/{id}
pub async fn update_payment(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    ValidJson(payload): ValidJson<PaymentUpdate>,
) -> AppResult<Json<PayrollPayment>> {
    let employer_id = current_user.require_employer()?;
    Ok(Json(
        service::update_payment(&state.pool, employer_id, id, &payload).await?,
    ))
}

/// GET /api/payroll/payments/me
pub async fn my_payments(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<PayrollPayment>>> {
    let employee_id = current_user.require_employee()?;
    Ok(Json(
        service::employee_payments(&state.pool, employee_id, query.limit, query.offset).await?,
    ))
}
