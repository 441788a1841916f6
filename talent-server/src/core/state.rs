use std::sync::Arc;

use sqlx::SqlitePool;

use shared::util::now_millis;

use crate::auth::{JwtService, hash_password, validate_password};
use crate::core::{AdminSeed, Config};
use crate::db::DbService;
use crate::db::repository::user::{self, NewUser};
use crate::utils::AppResult;
use crate::utils::validation::normalize_email;

/// Server state - shared references to every service
///
/// Cheap to clone: the pool and the JWT service are reference counted.
///
/// | Field | Description |
/// |-------|-------------|
/// | config | Immutable configuration |
/// | pool | SQLite connection pool |
/// | jwt_service | Token issue / verify |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            config,
            pool,
            jwt_service,
        }
    }

    /// Open the database (running migrations) and build the state
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::new(&config.database_url).await?;
        let state = Self::new(config.clone(), db.pool);
        if let Some(seed) = &config.admin {
            state.ensure_admin(seed).await?;
        }
        Ok(state)
    }

    /// Create the bootstrap admin unless the email is already taken
    pub async fn ensure_admin(&self, seed: &AdminSeed) -> AppResult<()> {
        let email = normalize_email(&seed.email)?;
        if user::email_exists(&self.pool, &email).await? {
            return Ok(());
        }
        validate_password(&seed.password)?;

        let admin = user::create_admin(
            &self.pool,
            NewUser {
                email,
                password_hash: hash_password(&seed.password)?,
                first_name: "Admin".into(),
                last_name: "User".into(),
            },
            now_millis(),
        )
        .await?;
        tracing::info!(user_id = admin.id, "Bootstrap admin created");
        Ok(())
    }

    /// Fresh in-memory database with the schema applied
    pub async fn in_memory() -> AppResult<Self> {
        let db = DbService::in_memory().await?;
        Ok(Self::new(Config::in_memory(), db.pool))
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
