// src/models/board.rs

//! Monitored notice board descriptor.

use serde::{Deserialize, Serialize};

/// Markup shape of a board page; selects the extractor used for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkupKind {
    /// infocom.ssu.ac.kr: `div.subject.on` wrapped in the post anchor
    InfocomSubject,
    /// scatch.ssu.ac.kr: `div.notice_col3` blocks
    ScatchNotice,
    /// disu.ac.kr: zcms program table rows
    DisuTable,
}

/// A single monitored board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    /// Unique identifier, used as the notified-set key
    pub id: String,

    /// Display name, used as the Slack attachment header
    pub name: String,

    /// Pages belonging to this board, fetched in order
    pub urls: Vec<String>,

    /// Markup shape of the pages
    pub markup: MarkupKind,

    /// Notified-set file name, relative to the storage directory
    #[serde(default)]
    pub store_file: Option<String>,

    /// Attachment color (`#rrggbb`)
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    "#aaaaaa".to_string()
}

impl Board {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        urls: &[&str],
        markup: MarkupKind,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            urls: urls.iter().map(|u| u.to_string()).collect(),
            markup,
            store_file: None,
            color: color.into(),
        }
    }

    /// File holding this board's notified links.
    pub fn store_file_name(&self) -> String {
        self.store_file
            .clone()
            .unwrap_or_else(|| default_store_file(&self.id))
    }
}

/// Default notified-set file name for a board id.
pub(crate) fn default_store_file(board_id: &str) -> String {
    format!("notified_posts_{board_id}.csv")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_file_default_and_override() {
        let mut board = Board::new(
            "scatch",
            "SSU:catch",
            &["https://scatch.ssu.ac.kr/"],
            MarkupKind::ScatchNotice,
            "#016694",
        );
        assert_eq!(board.store_file_name(), "notified_posts_scatch.csv");

        board.store_file = Some("scatch.txt".to_string());
        assert_eq!(board.store_file_name(), "scatch.txt");
    }

    #[test]
    fn test_markup_kind_snake_case() {
        let board: Board = toml::from_str(
            r##"
            id = "disu"
            name = "차세대반도체학과"
            urls = ["https://www.disu.ac.kr/community/notice?cidx=38"]
            markup = "disu_table"
            "##,
        )
        .unwrap();
        assert_eq!(board.markup, MarkupKind::DisuTable);
        assert_eq!(board.color, "#aaaaaa");
    }
}
