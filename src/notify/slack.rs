// src/notify/slack.rs

//! Slack incoming-webhook notifier.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::notify::{Notifier, WebhookPayload};

pub struct SlackNotifier {
    webhook_url: String,
    client: Client,
}

impl SlackNotifier {
    pub fn new(webhook_url: impl Into<String>, client: Client) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            client,
        }
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn send(&self, payload: &WebhookPayload) -> Result<()> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::delivery(status.as_u16(), body));
        }

        log::debug!(
            "Webhook accepted {} attachment(s)",
            payload.attachments.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::notify::Attachment;

    fn payload() -> WebhookPayload {
        WebhookPayload::new(vec![Attachment {
            fallback: "수강신청 안내".into(),
            color: "#941b22".into(),
            title: "전자정보공학부 학사".into(),
            text: "수강신청 안내\n\n<http://x/1|바로가기>".into(),
            ts: 1_700_000_000.5,
        }])
    }

    async fn notifier_for(server: &MockServer, status: u16, body: &str) -> SlackNotifier {
        Mock::given(method("POST"))
            .and(path("/services/T000/B000"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
        SlackNotifier::new(format!("{}/services/T000/B000", server.uri()), Client::new())
    }

    #[tokio::test]
    async fn test_send_posts_attachment_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = SlackNotifier::new(format!("{}/hook", server.uri()), Client::new());
        notifier.send(&payload()).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: Value = requests[0].body_json().unwrap();
        assert_eq!(
            body,
            json!({
                "attachments": [{
                    "fallback": "수강신청 안내",
                    "color": "#941b22",
                    "title": "전자정보공학부 학사",
                    "text": "수강신청 안내\n\n<http://x/1|바로가기>",
                    "ts": 1_700_000_000.5
                }]
            })
        );
    }

    #[tokio::test]
    async fn test_client_error_maps_to_delivery() {
        let server = MockServer::start().await;
        let notifier = notifier_for(&server, 404, "no_service").await;

        match notifier.send(&payload()).await.unwrap_err() {
            AppError::Delivery { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "no_service");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_maps_to_delivery() {
        let server = MockServer::start().await;
        let notifier = notifier_for(&server, 500, "").await;

        let err = notifier.send(&payload()).await.unwrap_err();
        assert!(matches!(err, AppError::Delivery { status: 500, .. }));
        assert!(err.is_fatal());
    }
}
