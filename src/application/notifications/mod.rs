//! Outbound reservation confirmations
//!
//! Two independent channels (email via SendGrid, SMS via Twilio). Each sender
//! checks its own credentials and reports an outcome instead of failing; the
//! dispatcher never lets a delivery problem reach the booking flow.

pub mod dispatcher;
pub mod email;
pub mod payload;
pub mod sms;

use async_trait::async_trait;

pub use dispatcher::{DeliveryReport, NotificationDispatcher};
pub use email::{SendGridConfig, SendGridEmailSender};
pub use payload::ReservationNotification;
pub use sms::{TwilioConfig, TwilioSmsSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Email,
    Sms,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent { message_id: Option<String> },
    /// Credentials are missing; nothing was attempted
    NotConfigured(String),
    Failed(String),
}

impl DeliveryOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sent { .. } => "sent",
            Self::NotConfigured(_) => "not_configured",
            Self::Failed(_) => "failed",
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

#[async_trait]
pub trait NotificationSender: Send + Sync {
    fn channel(&self) -> Channel;

    async fn send(&self, notification: &ReservationNotification) -> DeliveryOutcome;
}
