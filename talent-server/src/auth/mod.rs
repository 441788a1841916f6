//! Authentication
//!
//! - [`JwtService`] - token issue / verify
//! - [`CurrentUser`] - caller context from the bearer token
//! - [`require_auth`] - authentication middleware
//! - [`hash_password`] / [`verify_password`] - argon2 helpers

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{is_public_route, require_admin, require_auth};
pub use password::{hash_password, validate_password, verify_password};
