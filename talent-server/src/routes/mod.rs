//! Router assembly
//!
//! [`build_router`] registers every API module; [`build_app`] wraps it in
//! the middleware stack. Both the HTTP server and the integration tests
//! go through [`build_app`].

pub mod middleware;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api;
use crate::auth::require_auth;
use crate::core::ServerState;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Every route, without middleware or state
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Public
        .merge(api::health::router())
        .merge(api::auth::router())
        // Accounts
        .merge(api::profile::router())
        .merge(api::admin::router())
        .merge(api::employers::router())
        .merge(api::employees::router())
        // Catalog
        .merge(api::positions::router())
        .merge(api::badges::router())
        // Employer resources
        .merge(api::venues::router())
        .merge(api::favlists::router())
        // Staffing
        .merge(api::shifts::router())
        .merge(api::marketplace::router())
        .merge(api::applications::router())
        .merge(api::invites::router())
        // Time and pay
        .merge(api::clockins::router())
        .merge(api::payroll::router())
        // Feedback
        .merge(api::ratings::router())
        .merge(api::notifications::router())
}

/// The router with the full middleware stack
///
/// Layers run outermost first: auth, request id, trace, logging,
/// compression, CORS.
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(axum_middleware::from_fn_with_state(state.clone(), require_auth))
}
