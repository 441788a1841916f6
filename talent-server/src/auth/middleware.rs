//! Authentication middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;

use crate::auth::extractor::authenticate;
use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, ErrorCode};

/// Require a valid bearer token on every `/api/` route except public ones
///
/// On success the [`CurrentUser`](crate::auth::CurrentUser) is inserted into
/// the request extensions.
///
/// | Failure | Status |
/// |---------|--------|
/// | No Authorization header | 401 NotAuthenticated |
/// | Expired token | 401 TokenExpired |
/// | Bad token | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // CORS preflight
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    if is_public_route(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    let user = authenticate(&state.get_jwt_service(), token, req.uri())?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Admin-only route layer, stacked inside [`require_auth`]
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::unauthorized)?;
    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id,
            user_role = user.role.as_str(),
            uri = req.uri().path().to_string()
        );
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    Ok(next.run(req).await)
}

/// Routes reachable without a token
///
/// Non-API paths pass through so they can 404 normally. Sign-up and login
/// are public, as are reads of the catalog and of public employer /
/// employee ratings.
pub fn is_public_route(method: &Method, path: &str) -> bool {
    if !path.starts_with("/api/") {
        return true;
    }
    if method == Method::POST {
        return matches!(path, "/api/auth/login" | "/api/auth/register");
    }
    if method != Method::GET {
        return false;
    }

    let segments: Vec<&str> = path
        .trim_start_matches("/api/")
        .trim_end_matches('/')
        .split('/')
        .collect();
    let is_id = |s: &str| s.parse::<i64>().is_ok();

    match segments.as_slice() {
        ["positions"] | ["positions", _] | ["badges"] => true,
        ["employers", id] => is_id(id),
        ["employers", id, "ratings"] | ["employees", id, "ratings"] => is_id(id),
        _ => false,
    }
}
