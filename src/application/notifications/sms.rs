//! SMS confirmations through the Twilio Messages API

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{Channel, DeliveryOutcome, NotificationSender, ReservationNotification};

pub const TWILIO_API_URL: &str = "https://api.twilio.com";

#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub from_number: Option<String>,
    pub base_url: String,
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            from_number: None,
            base_url: TWILIO_API_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TwilioResponse {
    sid: Option<String>,
    message: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

pub struct TwilioSmsSender {
    client: reqwest::Client,
    config: TwilioConfig,
}

impl TwilioSmsSender {
    pub fn new(client: reqwest::Client, config: TwilioConfig) -> Self {
        Self { client, config }
    }

    fn credentials(&self) -> Option<(&str, &str, &str)> {
        Some((
            non_empty(&self.config.account_sid)?,
            non_empty(&self.config.auth_token)?,
            non_empty(&self.config.from_number)?,
        ))
    }
}

#[async_trait]
impl NotificationSender for TwilioSmsSender {
    fn channel(&self) -> Channel {
        Channel::Sms
    }

    async fn send(&self, notification: &ReservationNotification) -> DeliveryOutcome {
        let Some((sid, token, from)) = self.credentials() else {
            return DeliveryOutcome::NotConfigured(
                "Twilio credentials not configured. Please set TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN, and TWILIO_PHONE_NUMBER in your environment variables.".into(),
            );
        };

        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.base_url.trim_end_matches('/'),
            sid
        );
        let body = notification.sms_body();

        let response = match self
            .client
            .post(&url)
            .basic_auth(sid, Some(token))
            .form(&[
                ("To", notification.customer_phone.as_str()),
                ("From", from),
                ("Body", body.as_str()),
            ])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return DeliveryOutcome::Failed(format!("Twilio request failed: {e}")),
        };

        let status = response.status();
        let parsed: Option<TwilioResponse> = response.json().await.ok();

        if !status.is_success() {
            let reason = parsed
                .and_then(|r| r.message)
                .unwrap_or_else(|| "Failed to send SMS".to_string());
            return DeliveryOutcome::Failed(reason);
        }

        let message_id = parsed.and_then(|r| r.sid);
        debug!(to = %notification.customer_phone, ?message_id, "Confirmation SMS queued");
        DeliveryOutcome::Sent { message_id }
    }
}
