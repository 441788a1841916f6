//! Employee (talent) API

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/employees", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::search))
        .route("/me", get(handler::me).put(handler::update_me))
        .route("/me/shifts", get(handler::my_shifts))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/ratings", get(handler::ratings))
        .route(
            "/{id}/badges/{badge_id}",
            post(handler::grant_badge).delete(handler::revoke_badge),
        )
}
