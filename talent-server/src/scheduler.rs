//! Shift housekeeping scheduler
//!
//! Registered as a background task in `Server::run`. Every
//! `scheduler_interval_secs` it closes out shifts whose end has passed
//! (COMPLETED when staffed, EXPIRED otherwise) and clocks out talent who
//! forgot to punch out within the employer's clock-out delay.

use std::time::Duration;

use shared::util::now_millis;
use tokio_util::sync::CancellationToken;

use crate::clockin::service::auto_clock_out;
use crate::core::ServerState;
use crate::db::repository::shift;
use crate::utils::AppResult;

/// What one pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub completed: u64,
    pub expired: u64,
    pub clocked_out: u64,
}

pub struct ShiftScheduler {
    state: ServerState,
    shutdown: CancellationToken,
}

impl ShiftScheduler {
    pub fn new(state: ServerState, shutdown: CancellationToken) -> Self {
        Self { state, shutdown }
    }

    /// Main loop: sweep at startup, then on every tick until shutdown
    pub async fn run(self) {
        let period = Duration::from_secs(self.state.config.scheduler_interval_secs.max(1));
        tracing::info!(interval_secs = period.as_secs(), "Shift scheduler started");

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.run_once(now_millis()).await {
                        tracing::error!(error = %e, "Shift scheduler sweep failed");
                    }
                }
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Shift scheduler received shutdown signal");
                    return;
                }
            }
        }
    }

    /// One sweep at `now`
    pub async fn run_once(&self, now: i64) -> AppResult<SweepReport> {
        let pool = &self.state.pool;

        // Clock-outs first: closing is keyed on the shift end, not its status
        let clocked_out = auto_clock_out(pool, now).await?;
        let (completed, expired) = shift::close_ended(pool, now).await?;

        let report = SweepReport {
            completed,
            expired,
            clocked_out,
        };
        if report == SweepReport::default() {
            tracing::debug!("Shift scheduler: nothing to do");
        } else {
            tracing::info!(
                completed,
                expired,
                clocked_out,
                "Shift scheduler sweep finished"
            );
        }
        Ok(report)
    }
}
