//! Outbound notifications.
//!
//! New items are rendered into Slack-style attachments and delivered through
//! a [`Notifier`]. The webhook URL is handed to the concrete notifier when it
//! is built; nothing here reads the environment.

mod render;
pub mod slack;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use render::Renderer;
pub use slack::SlackNotifier;

/// One message block of a webhook post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// Plain-text summary for clients that cannot render attachments
    pub fallback: String,
    /// Sidebar color (`#rrggbb`)
    pub color: String,
    /// Header; the board name
    pub title: String,
    /// Body in Slack mrkdwn
    pub text: String,
    /// Unix timestamp in seconds
    pub ts: f64,
}

/// Body of a webhook post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub attachments: Vec<Attachment>,
}

impl WebhookPayload {
    pub fn new(attachments: Vec<Attachment>) -> Self {
        Self { attachments }
    }
}

/// Delivery channel for rendered payloads.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one payload; a rejected post is an [`AppError::Delivery`](crate::error::AppError::Delivery).
    async fn send(&self, payload: &WebhookPayload) -> Result<()>;
}
