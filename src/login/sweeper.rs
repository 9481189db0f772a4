//! Periodic eviction of expired attempt records.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::login::tracker::AttemptTracker;

/// Shortest interval the sweeper will run at.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(10);

/// Spawn a task that purges expired records every `interval` until the
/// shutdown signal fires (or its sender is dropped).
///
/// Intervals below [`MIN_SWEEP_INTERVAL`] are raised to it.
pub fn spawn_sweeper(
    tracker: AttemptTracker,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    let interval = interval.max(MIN_SWEEP_INTERVAL);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        tracing::info!(interval_ms = interval.as_millis() as u64, "Login attempt sweeper started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tracker.purge_expired();
                }
                _ = shutdown.recv() => {
                    tracing::info!("Login attempt sweeper stopping");
                    break;
                }
            }
        }
    })
}
