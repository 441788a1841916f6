//! Application API

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/applications", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/me", get(handler::mine))
        .route("/{id}", delete(handler::withdraw))
        .route("/{id}/accept", post(handler::accept))
        .route("/{id}/reject", post(handler::reject))
}
