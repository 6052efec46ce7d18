//! Attachment rendering.

use chrono::Utc;

use crate::models::{Board, Item, NotifyConfig};
use crate::notify::{Attachment, WebhookPayload};

/// Renders items and "nothing new" placeholders into attachments.
#[derive(Debug, Clone)]
pub struct Renderer {
    untitled: String,
    link_label: String,
    no_news_text: String,
    no_news_color: String,
    batch_title: String,
    fixed_ts: Option<f64>,
}

impl Renderer {
    pub fn new(config: &NotifyConfig) -> Self {
        Self {
            untitled: config.untitled.clone(),
            link_label: config.link_label.clone(),
            no_news_text: config.no_news_text.clone(),
            no_news_color: config.no_news_color.clone(),
            batch_title: config.batch_title.clone(),
            fixed_ts: None,
        }
    }

    /// Stamp every attachment with `ts` instead of the current time.
    pub fn with_timestamp(mut self, ts: f64) -> Self {
        self.fixed_ts = Some(ts);
        self
    }

    fn timestamp(&self) -> f64 {
        self.fixed_ts
            .unwrap_or_else(|| Utc::now().timestamp_millis() as f64 / 1000.0)
    }

    /// Attachment announcing one notice of `board`.
    pub fn item(&self, board: &Board, item: &Item) -> Attachment {
        let title = item.display_title(&self.untitled);
        let text = if item.has_link() {
            format!("{}\n\n<{}|{}>", escape(title), item.link, self.link_label)
        } else {
            escape(title)
        };

        Attachment {
            fallback: title.to_string(),
            color: board.color.clone(),
            title: board.name.clone(),
            text,
            ts: self.timestamp(),
        }
    }

    /// Placeholder saying there was nothing new under `header`.
    pub fn no_news(&self, header: &str) -> Attachment {
        Attachment {
            fallback: self.no_news_text.clone(),
            color: self.no_news_color.clone(),
            title: header.to_string(),
            text: self.no_news_text.clone(),
            ts: self.timestamp(),
        }
    }

    /// Placeholder for a batched run where no board had anything new.
    pub fn batch_no_news(&self) -> Attachment {
        self.no_news(&self.batch_title)
    }

    /// Attachments for a board's new items.
    pub fn items(&self, board: &Board, items: &[Item]) -> Vec<Attachment> {
        items.iter().map(|item| self.item(board, item)).collect()
    }

    /// Post for one board: its new items, or a single placeholder.
    pub fn board_payload(&self, board: &Board, items: &[Item]) -> WebhookPayload {
        if items.is_empty() {
            WebhookPayload::new(vec![self.no_news(&board.name)])
        } else {
            WebhookPayload::new(self.items(board, items))
        }
    }
}

/// Escape the characters Slack treats as control sequences in mrkdwn.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
