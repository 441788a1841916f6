//! Admin API
//!
//! User administration. Every route requires the ADMIN role.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/users", get(handler::list_users))
        .route("/users/{id}/active", put(handler::set_active))
        .layer(middleware::from_fn(require_admin))
}
