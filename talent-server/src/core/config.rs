use crate::auth::JwtConfig;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | DATABASE_URL | sqlite:talent.db | SQLite database |
/// | HTTP_PORT | 8000 | HTTP port |
/// | ENVIRONMENT | development | development / staging / production |
/// | JWT_SECRET | random (development only) | HS256 secret, at least 32 chars |
/// | JWT_EXPIRATION_MINUTES | 1440 | Token lifetime |
/// | CLOCKIN_RADIUS_MILES | 0.1 | Geofence radius around venues |
/// | SCHEDULER_INTERVAL_SECS | 60 | Scheduler tick |
/// | LOG_LEVEL | info | Log filter (RUST_LOG wins when set) |
/// | LOG_DIR | - | Daily rolling log files |
/// | ADMIN_EMAIL / ADMIN_PASSWORD | - | Admin account created at startup if missing |
///
/// ```ignore
/// HTTP_PORT=8080 DATABASE_URL=sqlite:/data/talent.db cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub jwt: JwtConfig,
    /// Maximum distance from the venue for clock in / clock out
    pub clockin_radius_miles: f64,
    pub scheduler_interval_secs: u64,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub admin: Option<AdminSeed>,
}

/// Bootstrap admin credentials
#[derive(Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> AppResult<Self> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let jwt = JwtConfig::from_env(environment == "development")?;

        let clockin_radius_miles = env_parse("CLOCKIN_RADIUS_MILES", 0.1_f64);
        if !clockin_radius_miles.is_finite() || clockin_radius_miles <= 0.0 {
            return Err(AppError::with_message(
                ErrorCode::ConfigError,
                format!("CLOCKIN_RADIUS_MILES must be positive, got {clockin_radius_miles}"),
            ));
        }

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:talent.db".into()),
            http_port: env_parse("HTTP_PORT", 8000),
            environment,
            jwt,
            clockin_radius_miles,
            scheduler_interval_secs: env_parse("SCHEDULER_INTERVAL_SECS", 60).max(1),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            admin: match (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD")) {
                (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                    Some(AdminSeed { email, password })
                }
                _ => None,
            },
        })
    }

    /// Development defaults with an in-memory database, used by tests
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            http_port: 0,
            environment: "development".into(),
            jwt: JwtConfig::development(),
            clockin_radius_miles: 0.1,
            scheduler_interval_secs: 60,
            log_level: "info".into(),
            log_dir: None,
            admin: None,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
