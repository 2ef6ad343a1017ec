//! Email confirmations through the SendGrid v3 mail API

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use super::{Channel, DeliveryOutcome, NotificationSender, ReservationNotification};

pub const SENDGRID_API_URL: &str = "https://api.sendgrid.com";

#[derive(Debug, Clone)]
pub struct SendGridConfig {
    pub api_key: Option<String>,
    pub from_email: String,
    pub from_name: String,
    pub base_url: String,
}

impl Default for SendGridConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            from_email: "noreply@reservations.com".to_string(),
            from_name: "Restaurant Reservations".to_string(),
            base_url: SENDGRID_API_URL.to_string(),
        }
    }
}

pub struct SendGridEmailSender {
    client: reqwest::Client,
    config: SendGridConfig,
}

impl SendGridEmailSender {
    pub fn new(client: reqwest::Client, config: SendGridConfig) -> Self {
        Self { client, config }
    }

    fn request_body(&self, n: &ReservationNotification) -> serde_json::Value {
        json!({
            "personalizations": [{
                "to": [{ "email": n.customer_email, "name": n.customer_name }],
                "subject": n.email_subject(),
            }],
            "from": { "email": self.config.from_email, "name": self.config.from_name },
            "content": [{ "type": "text/html", "value": n.email_html() }],
        })
    }
}

#[async_trait]
impl NotificationSender for SendGridEmailSender {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    async fn send(&self, notification: &ReservationNotification) -> DeliveryOutcome {
        let Some(api_key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) else {
            return DeliveryOutcome::NotConfigured(
                "SendGrid API key not configured. Please set SENDGRID_API_KEY in your environment variables.".into(),
            );
        };

        let url = format!("{}/v3/mail/send", self.config.base_url.trim_end_matches('/'));
        let response = match self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&self.request_body(notification))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return DeliveryOutcome::Failed(format!("SendGrid request failed: {e}")),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return DeliveryOutcome::Failed(format!("SendGrid API error: {status} {body}"));
        }

        let message_id = response
            .headers()
            .get("x-message-id")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        debug!(to = %notification.customer_email, ?message_id, "Confirmation email accepted");
        DeliveryOutcome::Sent { message_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::notifications::payload::sample;
    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sender(base_url: &str, api_key: Option<&str>) -> SendGridEmailSender {
        SendGridEmailSender::new(
            reqwest::Client::new(),
            SendGridConfig {
                api_key: api_key.map(String::from),
                base_url: base_url.to_string(),
                ..SendGridConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn posts_mail_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/mail/send"))
            .and(bearer_token("SG.test"))
            .and(body_partial_json(serde_json::json!({
                "personalizations": [{
                    "to": [{ "email": "ada@example.com" }],
                    "subject": "Reservation Confirmed - Harbour Club",
                }],
            })))
            .respond_with(ResponseTemplate::new(202).insert_header("X-Message-Id", "msg-1"))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = sender(&server.uri(), Some("SG.test")).send(&sample()).await;
        assert_eq!(
            outcome,
            DeliveryOutcome::Sent {
                message_id: Some("msg-1".into())
            }
        );
    }

    #[tokio::test]
    async fn missing_key_is_not_configured_and_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(202))
            .expect(0)
            .mount(&server)
            .await;

        let outcome = sender(&server.uri(), None).send(&sample()).await;
        assert!(matches!(outcome, DeliveryOutcome::NotConfigured(ref m) if m.contains("SENDGRID_API_KEY")));
    }

    #[tokio::test]
    async fn api_error_is_reported_as_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let outcome = sender(&server.uri(), Some("SG.wrong")).send(&sample()).await;
        assert!(matches!(outcome, DeliveryOutcome::Failed(ref m) if m.contains("bad key")));
    }
}
