//! Auth Handlers
//!
//! Sign-up, login, current session and password change.

use axum::{Json, extract::State};

use crate::auth::{CurrentUser, hash_password, validate_password, verify_password};
use crate::core::ServerState;
use crate::db::repository::user::{self, NewUser};
use crate::db::repository::employee;
use crate::security_log;
use crate::utils::validation::normalize_email;
use crate::utils::{AppError, AppJson, AppResult, ErrorCode, ValidJson};
use shared::models::{
    AuthResponse, LoginRequest, MeResponse, PasswordChange, RegisterRequest, User, UserRole,
};
use shared::util::now_millis;

/// POST /api/auth/register
///
/// EMPLOYEE sign-ups get a talent record, EMPLOYER sign-ups a company
/// named `employer_title`. Admins are never self-registered.
pub async fn register(
    State(state): State<ServerState>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = normalize_email(&req.email)?;
    validate_password(&req.password)?;

    if user::email_exists(&state.pool, &email).await? {
        return Err(AppError::new(ErrorCode::EmailAlreadyRegistered));
    }

    let new_user = NewUser {
        email,
        password_hash: hash_password(&req.password)?,
        first_name: req.first_name.trim().to_string(),
        last_name: req.last_name.trim().to_string(),
    };
    let now = now_millis();

    let (created, employee_id) = match req.role {
        UserRole::Employee => {
            let (u, id) = user::create_employee_account(&state.pool, new_user, now).await?;
            (u, Some(id))
        }
        UserRole::Employer => {
            let title = req
                .employer_title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .ok_or_else(|| {
                    AppError::with_message(
                        ErrorCode::RequiredField,
                        "employer_title is required for employer accounts",
                    )
                })?;
            let u = user::create_employer_account(&state.pool, new_user, title, now).await?;
            (u, None)
        }
        UserRole::Admin => return Err(AppError::forbidden("Admin accounts cannot be registered")),
    };

    tracing::info!(
        user_id = created.id,
        role = created.role.as_str(),
        "User registered"
    );
    issue_token(&state, created, employee_id)
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    AppJson(req): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = req.email.trim().to_lowercase();

    let Some(credentials) = user::find_credentials_by_email(&state.pool, &email).await? else {
        security_log!("WARN", "login_failed", reason = "user_not_found", email = email.as_str());
        return Err(AppError::invalid_credentials());
    };
    if !verify_password(&req.password, &credentials.password_hash) {
        security_log!(
            "WARN",
            "login_failed",
            reason = "invalid_password",
            user_id = credentials.user.id
        );
        return Err(AppError::invalid_credentials());
    }
    if !credentials.user.is_active {
        security_log!("WARN", "login_disabled", user_id = credentials.user.id);
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let account = credentials.user;
    let employee_id = match account.role {
        UserRole::Employee => employee::find_id_by_user(&state.pool, account.id).await?,
        _ => None,
    };

    tracing::info!(user_id = account.id, role = account.role.as_str(), "User logged in");
    issue_token(&state, account, employee_id)
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<MeResponse>> {
    let account = user::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    let profile = user::find_profile(&state.pool, current_user.id).await?;

    Ok(Json(MeResponse {
        user: account,
        profile,
        employee_id: current_user.employee_id,
    }))
}

/// POST /api/auth/password
pub async fn change_password(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    AppJson(req): AppJson<PasswordChange>,
) -> AppResult<Json<bool>> {
    let hash = user::find_password_hash(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    if !verify_password(&req.old_password, &hash) {
        security_log!(
            "WARN",
            "password_change_failed",
            user_id = current_user.id
        );
        return Err(AppError::invalid_credentials());
    }
    validate_password(&req.new_password)?;

    user::update_password(&state.pool, current_user.id, &hash_password(&req.new_password)?).await?;
    security_log!("INFO", "password_changed", user_id = current_user.id);
    Ok(Json(true))
}

fn issue_token(
    state: &ServerState,
    account: User,
    employee_id: Option<i64>,
) -> AppResult<Json<AuthResponse>> {
    let jwt_service = state.get_jwt_service();
    let token = jwt_service
        .generate_token(
            account.id,
            &account.email,
            account.role,
            account.employer_id,
            employee_id,
        )
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    Ok(Json(AuthResponse {
        token,
        expires_in: jwt_service.expires_in(),
        user: account,
        employee_id,
    }))
}
