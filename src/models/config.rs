//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Board;

/// Environment variable holding the Slack webhook URL.
pub const WEBHOOK_ENV: &str = "SLACK_WEBHOOK_URL";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Dedup and notification behavior
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Monitored boards
    #[serde(default = "defaults::boards")]
    pub boards: Vec<Board>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration, or return defaults when the file does not exist.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match Self::load(&path) {
            Err(AppError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("No config at {:?}. Using defaults.", path.as_ref());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.boards.is_empty() {
            return Err(AppError::validation("No boards defined"));
        }

        let mut ids = HashSet::new();
        let mut files = HashSet::new();
        for board in &self.boards {
            if board.id.trim().is_empty() {
                return Err(AppError::validation("board id is empty"));
            }
            if !ids.insert(board.id.as_str()) {
                return Err(AppError::validation(format!(
                    "duplicate board id '{}'",
                    board.id
                )));
            }
            if !files.insert(board.store_file_name()) {
                return Err(AppError::validation(format!(
                    "board '{}' shares its store file with another board",
                    board.id
                )));
            }
            if board.urls.is_empty() {
                return Err(AppError::validation(format!(
                    "board '{}' has no urls",
                    board.id
                )));
            }
            for url in &board.urls {
                url::Url::parse(url).map_err(|e| {
                    AppError::validation(format!("board '{}' url {url}: {e}", board.id))
                })?;
            }
            if !is_hex_color(&board.color) {
                return Err(AppError::validation(format!(
                    "board '{}' color '{}' is not #rrggbb",
                    board.id, board.color
                )));
            }
        }
        if self.notify.max_attachments_per_post == 0 {
            return Err(AppError::validation(
                "notify.max_attachments_per_post must be > 0",
            ));
        }
        if !is_hex_color(&self.notify.no_news_color) {
            return Err(AppError::validation("notify.no_news_color is not #rrggbb"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            notify: NotifyConfig::default(),
            boards: defaults::boards(),
        }
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Which unseen items of a board get reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoveltyPolicy {
    /// Report every unseen item
    #[default]
    AllNew,
    /// Report only the first unseen item in page order
    FirstNewOnly,
}

/// How new items are grouped into webhook posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// One post per board; a placeholder when the board had nothing new
    #[default]
    PerBoard,
    /// One post per run; a placeholder only when no board had anything new
    Batched,
}

/// When the notified set is written relative to delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistMode {
    /// Save only after the webhook accepted the post
    #[default]
    AfterSend,
    /// Save before sending; a failed post is never retried
    BeforeSend,
}

/// Dedup and notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub policy: NoveltyPolicy,

    #[serde(default)]
    pub aggregation: Aggregation,

    #[serde(default)]
    pub persist: PersistMode,

    /// Pause between per-board posts in milliseconds
    #[serde(default = "defaults::send_delay")]
    pub send_delay_ms: u64,

    /// Upper bound on attachments in one webhook post; larger runs are split
    #[serde(default = "defaults::max_attachments")]
    pub max_attachments_per_post: usize,

    /// Text of the "nothing new" message
    #[serde(default = "defaults::no_news_text")]
    pub no_news_text: String,

    /// Color of the "nothing new" message
    #[serde(default = "defaults::no_news_color")]
    pub no_news_color: String,

    /// Header of the placeholder sent in batched mode
    #[serde(default = "defaults::batch_title")]
    pub batch_title: String,

    /// Substitute for empty notice titles
    #[serde(default = "defaults::untitled")]
    pub untitled: String,

    /// Label of the hyperlink to the notice
    #[serde(default = "defaults::link_label")]
    pub link_label: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            policy: NoveltyPolicy::default(),
            aggregation: Aggregation::default(),
            persist: PersistMode::default(),
            send_delay_ms: defaults::send_delay(),
            max_attachments_per_post: defaults::max_attachments(),
            no_news_text: defaults::no_news_text(),
            no_news_color: defaults::no_news_color(),
            batch_title: defaults::batch_title(),
            untitled: defaults::untitled(),
            link_label: defaults::link_label(),
        }
    }
}

/// Secret values read from the process environment.
#[derive(Clone)]
pub struct Secrets {
    pub webhook_url: String,
}

impl Secrets {
    /// Read secrets, loading a `.env` file first when one exists.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_value(std::env::var(WEBHOOK_ENV).ok())
    }

    fn from_value(value: Option<String>) -> Result<Self> {
        match value {
            Some(url) if !url.trim().is_empty() => Ok(Self {
                webhook_url: url.trim().to_string(),
            }),
            _ => Err(AppError::config(format!("{WEBHOOK_ENV} is not set"))),
        }
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("webhook_url", &"<redacted>")
            .finish()
    }
}

mod defaults {
    use crate::models::{Board, MarkupKind};

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; ssu-notice-bot/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Notify defaults
    pub fn send_delay() -> u64 {
        5000
    }
    pub fn max_attachments() -> usize {
        50
    }
    pub fn no_news_text() -> String {
        "새로운 공지사항이 없습니다.".into()
    }
    pub fn no_news_color() -> String {
        "#aaaaaa".into()
    }
    pub fn batch_title() -> String {
        "숭실대 공지사항".into()
    }
    pub fn untitled() -> String {
        "(제목 없음)".into()
    }
    pub fn link_label() -> String {
        "바로가기".into()
    }

    // Board defaults
    pub fn boards() -> Vec<Board> {
        vec![
            Board::new(
                "infocom",
                "전자정보공학부 학사",
                &["http://infocom.ssu.ac.kr/kor/notice/undergraduate.php"],
                MarkupKind::InfocomSubject,
                "#941b22",
            ),
            Board::new(
                "infocom_grad",
                "전자정보공학부 대학원",
                &["http://infocom.ssu.ac.kr/kor/notice/graduateSchool.php"],
                MarkupKind::InfocomSubject,
                "#941b22",
            ),
            Board::new(
                "scatch",
                "SSU:catch",
                &["https://scatch.ssu.ac.kr/%ea%b3%b5%ec%a7%80%ec%82%ac%ed%95%ad/"],
                MarkupKind::ScatchNotice,
                "#016694",
            ),
            Board::new(
                "disu",
                "차세대반도체학과",
                &[
                    "https://www.disu.ac.kr/community/notice?cidx=38",
                    "https://www.disu.ac.kr/community/notice?cidx=42",
                ],
                MarkupKind::DisuTable,
                "#2596be",
            ),
        ]
    }
}
