//! Fan-out of one confirmation to every configured channel

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{info, warn};

use super::{Channel, DeliveryOutcome, NotificationSender, ReservationNotification};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub channel: Channel,
    pub outcome: DeliveryOutcome,
}

#[derive(Clone, Default)]
pub struct NotificationDispatcher {
    senders: Vec<Arc<dyn NotificationSender>>,
}

impl NotificationDispatcher {
    pub fn new(senders: Vec<Arc<dyn NotificationSender>>) -> Self {
        Self { senders }
    }

    /// No channels at all; used where confirmations are not wanted.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Send on every channel concurrently. One attempt each, no ordering.
    pub async fn dispatch(&self, notification: &ReservationNotification) -> Vec<DeliveryReport> {
        let sends = self.senders.iter().map(|sender| async move {
            DeliveryReport {
                channel: sender.channel(),
                outcome: sender.send(notification).await,
            }
        });
        let reports = join_all(sends).await;

        for report in &reports {
            let channel = report.channel.as_str();
            metrics::counter!(
                "notifications_sent_total",
                "channel" => channel,
                "outcome" => report.outcome.label()
            )
            .increment(1);

            match &report.outcome {
                DeliveryOutcome::Sent { message_id } => {
                    info!(channel, ?message_id, "📨 Confirmation delivered")
                }
                DeliveryOutcome::NotConfigured(reason) => {
                    warn!(channel, %reason, "Confirmation skipped")
                }
                DeliveryOutcome::Failed(reason) => {
                    warn!(channel, %reason, "Confirmation failed")
                }
            }
        }

        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::notifications::payload::sample;
    use async_trait::async_trait;
    use std::time::Duration;

    struct Fixed {
        channel: Channel,
        outcome: DeliveryOutcome,
        delay: Duration,
    }

    #[async_trait]
    impl NotificationSender for Fixed {
        fn channel(&self) -> Channel {
            self.channel
        }

        async fn send(&self, _: &ReservationNotification) -> DeliveryOutcome {
            tokio::time::sleep(self.delay).await;
            self.outcome.clone()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn runs_channels_concurrently_and_reports_each() {
        let dispatcher = NotificationDispatcher::new(vec![
            Arc::new(Fixed {
                channel: Channel::Email,
                outcome: DeliveryOutcome::Failed("boom".into()),
                delay: Duration::from_secs(5),
            }),
            Arc::new(Fixed {
                channel: Channel::Sms,
                outcome: DeliveryOutcome::Sent { message_id: None },
                delay: Duration::from_secs(5),
            }),
        ]);

        let started = tokio::time::Instant::now();
        let reports = dispatcher.dispatch(&sample()).await;

        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].channel, Channel::Email);
        assert!(!reports[0].outcome.is_sent());
        assert!(reports[1].outcome.is_sent());
    }

    #[tokio::test]
    async fn disabled_dispatcher_sends_nothing() {
        assert!(NotificationDispatcher::disabled().dispatch(&sample()).await.is_empty());
    }
}
