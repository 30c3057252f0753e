//! Periodic cleanup of expired verification challenges.
//!
//! Expired rows are already ignored by code consumption; this job only
//! keeps the table small.

use std::time::Duration;

use g1000_db::repositories::ChallengeRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Run the purge loop every `interval` until `cancel` is triggered.
pub async fn run(pool: PgPool, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Challenge purge job started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Challenge purge job stopping");
                break;
            }
            _ = ticker.tick() => {
                match ChallengeRepo::purge_expired(&pool).await {
                    Ok(0) => tracing::debug!("Challenge purge: nothing expired"),
                    Ok(deleted) => tracing::info!(deleted, "Challenge purge: removed expired rows"),
                    Err(e) => tracing::error!(error = %e, "Challenge purge: cleanup failed"),
                }
            }
        }
    }
}
