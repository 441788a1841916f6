//! Payroll API

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/payroll", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/periods", get(handler::list_periods))
        .route("/periods/generate", post(handler::generate))
        .route("/periods/{id}", get(handler::get_period))
        .route("/periods/{id}/finalize", post(handler::finalize))
        .route("/periods/{id}/paid", post(handler::mark_paid))
        .route("/payments/me", get(handler::my_payments))
        .route("/payments/{id}", put(handler::update_payment))
}
