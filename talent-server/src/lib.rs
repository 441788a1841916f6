//! Talent Server - shift marketplace backend
//!
//! Employers post shifts at venues, talent applies or gets invited,
//! clocks in and out under geofence and time-window rules, and is paid
//! through weekly payroll periods.
//!
//! # Module layout
//!
//! ```text
//! talent-server/src/
//! ├── core/          # config, state, server, background tasks
//! ├── auth/          # JWT, argon2, extractor, middleware
//! ├── db/            # SQLite pool and repositories
//! ├── clockin/       # clock-in/out rule engine and service
//! ├── payroll/       # period alignment, pay calculation, service
//! ├── workflow/      # shift staffing: assignment, applications, invites
//! ├── notify.rs      # in-app notifications
//! ├── scheduler.rs   # shift expiry and auto clock-out
//! ├── api/           # HTTP handlers per resource
//! ├── routes/        # router assembly and middleware stack
//! └── utils/         # errors, logger, validation helpers
//! ```

pub mod api;
pub mod auth;
pub mod clockin;
pub mod core;
pub mod db;
pub mod notify;
pub mod payroll;
pub mod routes;
pub mod scheduler;
pub mod utils;
pub mod workflow;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - supports tracing field syntax
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
 _______    _            _
|__   __|  | |          | |
   | | __ _| | ___ _ __ | |_
   | |/ _` | |/ _ \ '_ \| __|
   | | (_| | |  __/ | | | |_
   |_|\__,_|_|\___|_| |_|\__|
    "#
    );
}
