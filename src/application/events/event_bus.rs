//! Event Bus for broadcasting change notifications
//!
//! Uses tokio broadcast channel for pub/sub pattern.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};
use tokio::sync::broadcast;

use super::types::{Event, EventMessage};

const DEFAULT_CAPACITY: usize = 1024;

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventMessage>,
    subscriber_count: Arc<AtomicUsize>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            subscriber_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: Event) {
        let message = EventMessage::new(event);
        let event_type = message.event.event_type();
        let table_id = message.event.table_id().to_string();

        match self.sender.send(message) {
            Ok(count) => debug!(
                event_type,
                table_id = %table_id,
                subscribers = count,
                "Event published"
            ),
            // Nobody is watching; normal when no booking form is open
            Err(_) => debug!(event_type, table_id = %table_id, "Event published with no subscribers"),
        }
    }

    pub fn subscribe(&self) -> EventSubscriber {
        self.subscribe_filtered(None)
    }

    /// Subscribe to events for one table only
    pub fn subscribe_table(&self, table_id: impl Into<String>) -> EventSubscriber {
        self.subscribe_filtered(Some(table_id.into()))
    }

    fn subscribe_filtered(&self, table_id: Option<String>) -> EventSubscriber {
        let receiver = self.sender.subscribe();
        let count = self.subscriber_count.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(total = count, "New event subscriber");

        EventSubscriber {
            receiver,
            table_id,
            subscriber_count: self.subscriber_count.clone(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriber_count.load(Ordering::SeqCst)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EventSubscriber {
    receiver: broadcast::Receiver<EventMessage>,
    table_id: Option<String>,
    subscriber_count: Arc<AtomicUsize>,
}

impl EventSubscriber {
    fn accepts(&self, msg: &EventMessage) -> bool {
        match &self.table_id {
            Some(id) => msg.event.table_id() == id,
            None => true,
        }
    }

    /// Receive the next matching event. `None` once the bus is gone.
    ///
    /// A lagged receiver yields a synthetic wake-up via the next message it
    /// can read; missed events only matter as wake-ups anyway.
    pub async fn recv(&mut self) -> Option<EventMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(msg) if self.accepts(&msg) => return Some(msg),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(missed = count, "Event subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Drain everything already queued without waiting.
    /// Returns how many matching events were discarded.
    pub fn drain(&mut self) -> usize {
        let mut drained = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(msg) => {
                    if self.accepts(&msg) {
                        drained += 1;
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(count)) => {
                    drained += count as usize;
                }
                Err(_) => return drained,
            }
        }
    }
}

impl Drop for EventSubscriber {
    fn drop(&mut self) {
        let prev = self.subscriber_count.fetch_sub(1, Ordering::SeqCst);
        debug!(remaining = prev.saturating_sub(1), "Event subscriber dropped");
    }
}

pub type SharedEventBus = Arc<EventBus>;

pub fn create_event_bus() -> SharedEventBus {
    Arc::new(EventBus::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::events::{PresenceChange, PresenceChangedEvent, ReservationCreatedEvent};
    use crate::domain::SlotKey;
    use chrono::{NaiveDate, NaiveTime};

    fn presence_event(table_id: &str) -> Event {
        Event::PresenceChanged(PresenceChangedEvent {
            slot: SlotKey::new(
                "v1",
                table_id,
                NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
                NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            ),
            user_id: Some("u1".into()),
            change: PresenceChange::Upserted,
        })
    }

    #[tokio::test]
    async fn test_event_bus_publish_subscribe() {
        let bus = EventBus::new();
        let mut subscriber = bus.subscribe();

        bus.publish(presence_event("t1"));

        let received = tokio::time::timeout(std::time::Duration::from_millis(100), subscriber.recv())
            .await
            .expect("Timeout")
            .expect("No message");

        assert_eq!(received.event.event_type(), "presence_changed");
    }

    #[tokio::test]
    async fn table_subscription_skips_other_tables() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe_table("t2");

        bus.publish(presence_event("t1"));
        bus.publish(Event::ReservationCreated(ReservationCreatedEvent {
            reservation_id: "r1".into(),
            venue_id: "v1".into(),
            table_id: "t2".into(),
            date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        }));

        let received = tokio::time::timeout(std::time::Duration::from_millis(100), sub.recv())
            .await
            .expect("Timeout")
            .expect("No message");
        assert_eq!(received.event.event_type(), "reservation_created");
        assert_eq!(received.event.table_id(), "t2");
    }

    #[test]
    fn drain_counts_only_matching_events() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe_table("t1");

        bus.publish(presence_event("t1"));
        bus.publish(presence_event("t9"));
        bus.publish(presence_event("t1"));

        assert_eq!(sub.drain(), 2);
        assert_eq!(sub.drain(), 0);
    }

    #[test]
    fn test_subscriber_count() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);

        let sub1 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        let _sub2 = bus.subscribe_table("t1");
        assert_eq!(bus.subscriber_count(), 2);

        drop(sub1);
        assert_eq!(bus.subscriber_count(), 1);
    }
}
