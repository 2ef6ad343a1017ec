//! Background task that physically removes expired presence rows.
//!
//! Readers already ignore expired rows; this only keeps the table small.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::RepositoryProvider;
use crate::shared::shutdown::ShutdownSignal;
use crate::shared::SharedClock;

/// Start the sweeper. Runs every `interval_secs` until `shutdown` fires.
pub fn start_presence_sweeper(
    repos: Arc<dyn RepositoryProvider>,
    clock: SharedClock,
    shutdown: ShutdownSignal,
    interval_secs: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval = interval_secs, "🧹 Presence sweeper started");

        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
        let stop = shutdown.notified().wait();
        tokio::pin!(stop);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    sweep_once(repos.as_ref(), &clock).await;
                }
                _ = &mut stop => {
                    info!("🧹 Presence sweeper shutting down");
                    break;
                }
            }
        }
    })
}

/// One pass; returns how many rows were removed.
pub async fn sweep_once(repos: &dyn RepositoryProvider, clock: &SharedClock) -> u64 {
    match repos.presence().delete_expired(clock.now()).await {
        Ok(0) => 0,
        Ok(n) => {
            debug!(removed = n, "Expired presence rows removed");
            n
        }
        Err(e) => {
            warn!(error = %e, "Presence sweep failed");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SlotKey;
    use crate::infrastructure::memory::InMemoryRepositoryProvider;
    use crate::shared::{Clock, ManualClock};
    use chrono::{NaiveDate, NaiveTime, Utc};

    #[tokio::test]
    async fn removes_only_expired_rows() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let clock = ManualClock::new(Utc::now());
        let shared: SharedClock = Arc::new(clock.clone());
        let now = clock.now();
        let date = NaiveDate::from_ymd_opt(2026, 11, 2).unwrap();
        let time = NaiveTime::from_hms_opt(18, 0, 0).unwrap();

        let stale = SlotKey::new("v1", "t1", date, time);
        let fresh = SlotKey::new("v1", "t2", date, time);
        repos
            .presence()
            .upsert("a", &stale, now, now + chrono::Duration::seconds(10))
            .await
            .unwrap();
        repos
            .presence()
            .upsert("b", &fresh, now, now + chrono::Duration::seconds(120))
            .await
            .unwrap();

        clock.advance(chrono::Duration::seconds(60));
        assert_eq!(sweep_once(repos.as_ref(), &shared).await, 1);
        assert_eq!(sweep_once(repos.as_ref(), &shared).await, 0);

        let left = repos
            .presence()
            .find_live_for_venue_on("v1", date, clock.now())
            .await
            .unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].user_id, "b");
    }

    #[tokio::test(start_paused = true)]
    async fn stops_on_shutdown() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let shutdown = ShutdownSignal::new();
        let handle = start_presence_sweeper(
            repos,
            crate::shared::system_clock(),
            shutdown.clone(),
            60,
        );

        tokio::time::sleep(Duration::from_secs(120)).await;
        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper did not stop")
            .unwrap();
    }
}
