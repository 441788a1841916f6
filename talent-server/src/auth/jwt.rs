//! JWT token service
//!
//! Issues and validates HS256 access tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::models::UserRole;
use thiserror::Error;

use crate::utils::{AppError, AppResult, ErrorCode};

const MIN_SECRET_LEN: usize = 32;

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 secret (at least 32 bytes)
    pub secret: String,
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl JwtConfig {
    /// Read `JWT_*` variables; a missing secret is only tolerated in development
    pub fn from_env(allow_generated_secret: bool) -> AppResult<Self> {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if secret.len() >= MIN_SECRET_LEN => secret,
            Ok(_) => {
                return Err(AppError::with_message(
                    ErrorCode::ConfigError,
                    format!("JWT_SECRET must be at least {MIN_SECRET_LEN} characters long"),
                ));
            }
            Err(_) if allow_generated_secret => {
                tracing::warn!("JWT_SECRET not set! Generating a temporary key for development.");
                generate_printable_secret()
            }
            Err(_) => {
                return Err(AppError::with_message(
                    ErrorCode::ConfigError,
                    "JWT_SECRET environment variable must be set outside development",
                ));
            }
        };

        Ok(Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "talent-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "talent-clients".to_string()),
        })
    }

    /// Random secret, default lifetime
    pub fn development() -> Self {
        Self {
            secret: generate_printable_secret(),
            expiration_minutes: 1440,
            issuer: "talent-server".to_string(),
            audience: "talent-clients".to_string(),
        }
    }
}

/// 64 printable characters
pub fn generate_printable_secret() -> String {
    const ALLOWED: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+";
    let mut rng = rand::thread_rng();
    (0..64)
        .map(|_| ALLOWED[rng.gen_range(0..ALLOWED.len())] as char)
        .collect()
}

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub email: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<i64>,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// JWT token service
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .field("expiration_minutes", &self.config.expiration_minutes)
            .finish()
    }
}

impl JwtService {
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue an access token for a user
    pub fn generate_token(
        &self,
        user_id: i64,
        email: &str,
        role: UserRole,
        employer_id: Option<i64>,
        employee_id: Option<i64>,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.as_str().to_string(),
            employer_id,
            employee_id,
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate signature, expiry, issuer and audience
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Extract the token from an `Authorization` header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }

    /// Token lifetime in seconds
    pub fn expires_in(&self) -> i64 {
        self.config.expiration_minutes * 60
    }
}

/// Caller context parsed from the token claims
///
/// Inserted into request extensions by [`require_auth`](super::require_auth)
/// and extracted by handlers:
///
/// ```ignore
/// async fn handler(user: CurrentUser) -> AppResult<Json<Venue>> {
///     let employer_id = user.require_employer()?;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub role: UserRole,
    pub employer_id: Option<i64>,
    pub employee_id: Option<i64>,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = String;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| format!("invalid subject: {}", claims.sub))?;
        let role =
            UserRole::parse(&claims.role).ok_or_else(|| format!("invalid role: {}", claims.role))?;
        Ok(Self {
            id,
            email: claims.email,
            role,
            employer_id: claims.employer_id,
            employee_id: claims.employee_id,
        })
    }
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Employer id of an employer staff account
    pub fn require_employer(&self) -> AppResult<i64> {
        match (self.role, self.employer_id) {
            (UserRole::Employer, Some(id)) => Ok(id),
            _ => Err(AppError::new(ErrorCode::EmployerRequired)),
        }
    }

    /// Employee id of a talent account
    pub fn require_employee(&self) -> AppResult<i64> {
        match (self.role, self.employee_id) {
            (UserRole::Employee, Some(id)) => Ok(id),
            _ => Err(AppError::new(ErrorCode::EmployeeRequired)),
        }
    }

    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::new(ErrorCode::AdminRequired))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::with_config(JwtConfig::development())
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = service();
        let token = service
            .generate_token(7, "ana@example.com", UserRole::Employee, None, Some(3))
            .expect("Failed to generate test token");

        let claims = service
            .validate_token(&token)
            .expect("Failed to validate test token");

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.email, "ana@example.com");
        assert_eq!(claims.role, "EMPLOYEE");
        assert_eq!(claims.employee_id, Some(3));
        assert_eq!(claims.employer_id, None);

        let user = CurrentUser::try_from(claims).unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.require_employee().unwrap(), 3);
        assert_eq!(
            user.require_employer().unwrap_err().code,
            ErrorCode::EmployerRequired
        );
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let token = service()
            .generate_token(1, "a@b.c", UserRole::Admin, None, None)
            .unwrap();
        assert!(matches!(
            service().validate_token(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut config = JwtConfig::development();
        config.expiration_minutes = -10;
        let service = JwtService::with_config(config);
        let token = service
            .generate_token(1, "a@b.c", UserRole::Employer, Some(1), None)
            .unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::ExpiredToken)
        ));
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }

    #[test]
    fn test_role_helpers() {
        let admin = CurrentUser {
            id: 1,
            email: "root@example.com".into(),
            role: UserRole::Admin,
            employer_id: None,
            employee_id: None,
        };
        assert!(admin.require_admin().is_ok());
        assert_eq!(
            admin.require_employee().unwrap_err().code,
            ErrorCode::EmployeeRequired
        );
    }

    #[test]
    fn test_generated_secret_is_long_enough() {
        let a = generate_printable_secret();
        let b = generate_printable_secret();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }
}
