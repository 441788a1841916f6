//! Employer API

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/employers", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/me", get(handler::me).put(handler::update_me))
        .route("/me/users", get(handler::staff))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/ratings", get(handler::ratings))
}
