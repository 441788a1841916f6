//! HTTP server startup and shutdown

use tokio::net::TcpListener;

use crate::core::{BackgroundTasks, Config, ServerState};
use crate::routes::build_app;
use crate::scheduler::ShiftScheduler;
use crate::utils::{AppError, AppResult};

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with an existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    /// Serve until ctrl-c, then stop background tasks
    pub async fn run(&self) -> AppResult<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let tasks = start_background_tasks(&state);

        let app = build_app(&state).with_state(state.clone());
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
        tracing::info!("Talent server listening on {}", addr);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| AppError::internal(format!("HTTP server failed: {e}")));

        tasks.shutdown().await;
        result
    }
}

fn start_background_tasks(state: &ServerState) -> BackgroundTasks {
    let mut tasks = BackgroundTasks::new();

    let scheduler = ShiftScheduler::new(state.clone(), tasks.shutdown_token());
    tasks.spawn("shift_scheduler", scheduler.run());
    tasks
}
