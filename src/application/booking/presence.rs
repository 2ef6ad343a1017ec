//! Presence tracking for slots with an open booking form
//!
//! Presence is advisory. Every store failure in here is logged and turned
//! into "nothing tracked" / "no viewers"; booking never waits on it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::application::events::{Event, PresenceChange, PresenceChangedEvent, SharedEventBus};
use crate::domain::{RepositoryProvider, SlotKey, SlotPresence};
use crate::shared::SharedClock;

/// Timing knobs for presence rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceSettings {
    /// Lifetime of a row after each write
    pub ttl: Duration,
    /// How often an open form re-asserts its row; must stay below `ttl`
    pub refresh_interval: Duration,
    /// Fallback re-read cadence for watchers
    pub poll_interval: Duration,
}

impl Default for PresenceSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(120),
            refresh_interval: Duration::from_secs(30),
            poll_interval: Duration::from_secs(2),
        }
    }
}

/// Result of [`PresenceTracker::end_viewing`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndViewing {
    Removed,
    /// Nothing to remove, or the store could not be reached
    Missing,
    /// The row belongs to someone else and was left alone
    NotOwner,
}

#[derive(Clone)]
pub struct PresenceTracker {
    repos: Arc<dyn RepositoryProvider>,
    events: SharedEventBus,
    clock: SharedClock,
    settings: PresenceSettings,
}

impl PresenceTracker {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        events: SharedEventBus,
        clock: SharedClock,
        settings: PresenceSettings,
    ) -> Self {
        Self {
            repos,
            events,
            clock,
            settings,
        }
    }

    pub fn settings(&self) -> PresenceSettings {
        self.settings
    }

    /// Mark `user_id` as filling out the form for `slot`.
    ///
    /// A handle from an earlier call refreshes that row in place, but only
    /// when it is the caller's row for this slot. Anything else (gone, another
    /// user's, another slot's) falls back to an upsert on the natural key.
    /// Returns the row id, or `None` when the store could not be reached.
    pub async fn begin_viewing(
        &self,
        user_id: &str,
        slot: &SlotKey,
        existing: Option<&str>,
    ) -> Option<String> {
        let now = self.clock.now();
        let expires_at = now + chrono_ttl(self.settings.ttl);

        if let Some(id) = existing {
            match self
                .repos
                .presence()
                .touch(id, user_id, slot, now, expires_at)
                .await
            {
                Ok(true) => {
                    self.publish(slot, Some(user_id), PresenceChange::Refreshed);
                    return Some(id.to_string());
                }
                Ok(false) => debug!(presence_id = %id, "No matching presence row, upserting"),
                Err(e) => {
                    warn!(presence_id = %id, error = %e, "Presence refresh failed");
                    return None;
                }
            }
        }

        match self
            .repos
            .presence()
            .upsert(user_id, slot, now, expires_at)
            .await
        {
            Ok(row) => {
                self.publish(slot, Some(user_id), PresenceChange::Upserted);
                Some(row.id)
            }
            Err(e) => {
                warn!(slot = %slot, error = %e, "Presence upsert failed");
                None
            }
        }
    }

    /// Periodic re-assertion of an open form. Same path as `begin_viewing`.
    pub async fn refresh(
        &self,
        user_id: &str,
        slot: &SlotKey,
        handle: Option<&str>,
    ) -> Option<String> {
        self.begin_viewing(user_id, slot, handle).await
    }

    /// Live rows for exactly this slot, minus the caller's own.
    pub async fn list_viewers(
        &self,
        slot: &SlotKey,
        excluding_user: Option<&str>,
    ) -> Vec<SlotPresence> {
        let now = self.clock.now();
        match self
            .repos
            .presence()
            .find_live_for_slot(slot, now, excluding_user)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                warn!(slot = %slot, error = %e, "Presence lookup failed");
                Vec::new()
            }
        }
    }

    /// Remove a row. With `caller` set, only that user's own row is removed;
    /// `None` removes whoever owns it. Expiry covers a failed delete.
    pub async fn end_viewing(&self, presence_id: &str, caller: Option<&str>) -> EndViewing {
        let row = match self.repos.presence().find_by_id(presence_id).await {
            Ok(Some(row)) => row,
            Ok(None) => return EndViewing::Missing,
            Err(e) => {
                warn!(presence_id = %presence_id, error = %e, "Presence lookup failed");
                return EndViewing::Missing;
            }
        };

        if caller.is_some_and(|user| user != row.user_id) {
            return EndViewing::NotOwner;
        }

        match self.repos.presence().delete(&row.id, &row.user_id).await {
            Ok(true) => {
                self.publish(&row.slot, Some(&row.user_id), PresenceChange::Removed);
                EndViewing::Removed
            }
            Ok(false) => EndViewing::Missing,
            Err(e) => {
                warn!(presence_id = %presence_id, error = %e, "Presence delete failed");
                EndViewing::Missing
            }
        }
    }

    /// Begin viewing now and keep the row fresh until the session is closed
    /// or dropped.
    pub fn start_session(&self, user_id: impl Into<String>, slot: SlotKey) -> ViewingSession {
        ViewingSession::start(self.clone(), user_id.into(), slot)
    }

    /// Viewer lists for `slot`, refreshed on the poll timer and on every
    /// change event for the slot's table.
    pub fn watch(&self, slot: SlotKey, excluding_user: Option<String>) -> PresenceWatch {
        PresenceWatch::start(self.clone(), slot, excluding_user)
    }

    fn publish(&self, slot: &SlotKey, user_id: Option<&str>, change: PresenceChange) {
        self.events.publish(Event::PresenceChanged(PresenceChangedEvent {
            slot: slot.clone(),
            user_id: user_id.map(String::from),
            change,
        }));
    }
}

fn chrono_ttl(ttl: Duration) -> chrono::Duration {
    chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::seconds(120))
}

/// An open booking form.
///
/// Dropping the session stops the refresh timer and fires one best-effort
/// delete in the background; `close` does the same and waits for it.
pub struct ViewingSession {
    slot: SlotKey,
    presence_id: watch::Receiver<Option<String>>,
    cancel: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ViewingSession {
    fn start(tracker: PresenceTracker, user_id: String, slot: SlotKey) -> Self {
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
        let (id_tx, id_rx) = watch::channel(None);
        let task_slot = slot.clone();

        let task = tokio::spawn(async move {
            let slot = task_slot;
            let mut handle = tracker.begin_viewing(&user_id, &slot, None).await;
            id_tx.send_replace(handle.clone());

            let mut interval = tokio::time::interval(tracker.settings.refresh_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        handle = tracker.refresh(&user_id, &slot, handle.as_deref()).await;
                        id_tx.send_replace(handle.clone());
                    }
                    // Fires on explicit close and when the session is dropped
                    _ = &mut cancel_rx => break,
                }
            }

            if let Some(id) = handle {
                tracker.end_viewing(&id, Some(&user_id)).await;
            }
        });

        Self {
            slot,
            presence_id: id_rx,
            cancel: cancel_tx,
            task,
        }
    }

    pub fn slot(&self) -> &SlotKey {
        &self.slot
    }

    /// Current row id, `None` until the first write lands or while the store
    /// is failing.
    pub fn presence_id(&self) -> Option<String> {
        self.presence_id.borrow().clone()
    }

    /// Stop refreshing and delete the row.
    pub async fn close(self) {
        let _ = self.cancel.send(());
        if let Err(e) = self.task.await {
            warn!(error = %e, "Viewing session task failed");
        }
    }
}

/// Cancellable stream of viewer lists for one slot.
///
/// Bursts of change events collapse into one re-read. Dropping the watch
/// stops its task.
pub struct PresenceWatch {
    rx: watch::Receiver<Vec<SlotPresence>>,
    task: JoinHandle<()>,
}

impl PresenceWatch {
    fn start(tracker: PresenceTracker, slot: SlotKey, excluding_user: Option<String>) -> Self {
        let (tx, rx) = watch::channel(Vec::new());
        let mut events = tracker.events.subscribe_table(slot.table_id.clone());

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tracker.settings.poll_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut bus_open = true;

            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    msg = events.recv(), if bus_open => {
                        match msg {
                            Some(_) => {
                                events.drain();
                                interval.reset();
                            }
                            None => {
                                bus_open = false;
                                continue;
                            }
                        }
                    }
                    _ = tx.closed() => break,
                }

                let viewers = tracker
                    .list_viewers(&slot, excluding_user.as_deref())
                    .await;
                if tx.send(viewers).is_err() {
                    break;
                }
            }
        });

        Self { rx, task }
    }

    /// Wait for the next viewer list. `None` once the watch has stopped.
    pub async fn changed(&mut self) -> Option<Vec<SlotPresence>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Latest list without waiting
    pub fn current(&self) -> Vec<SlotPresence> {
        self.rx.borrow().clone()
    }
}

impl Drop for PresenceWatch {
    fn drop(&mut self) {
        self.task.abort();
    }
}
