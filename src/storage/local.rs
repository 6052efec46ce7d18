//! Local filesystem storage implementation.
//!
//! One plain-text file per board, one link per line, UTF-8, no header.
//! Lines are sorted on write so the files diff cleanly under version control.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── notified_posts_{board}.csv
//! └── notified_posts_{board}.tmp   # only while a save is in flight
//! ```
//!
//! Lines follow CSV quoting, which older deployments also wrote: a link with a
//! comma, a quote, or surrounding whitespace is wrapped in quotes with inner
//! quotes doubled. Links containing line breaks cannot be stored and are dropped.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{Board, default_store_file};
use crate::storage::{NotifiedSet, NotifiedStore};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root_dir: PathBuf,
    files: HashMap<String, String>,
}

impl LocalStore {
    /// Create a new LocalStore rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            files: HashMap::new(),
        }
    }

    /// Register the file name of every board.
    pub fn with_boards(mut self, boards: &[Board]) -> Self {
        for board in boards {
            self.files.insert(board.id.clone(), board.store_file_name());
        }
        self
    }

    /// Storage directory.
    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    /// Full path of a board's file.
    pub fn path_for(&self, board_id: &str) -> PathBuf {
        match self.files.get(board_id) {
            Some(file) => self.root_dir.join(file),
            None => self.root_dir.join(default_store_file(board_id)),
        }
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.ensure_dir(path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Read a file as text, returning None if it doesn't exist.
    async fn read_text(&self, path: &Path) -> Result<Option<String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

/// Parse one stored line into a link.
///
/// Whitespace outside the quotes is not part of the link; whitespace inside
/// them is.
fn parse_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if line.len() >= 2 && line.starts_with('"') && line.ends_with('"') {
        let inner = &line[1..line.len() - 1];
        return Some(inner.replace("\"\"", "\""));
    }
    Some(line.to_string())
}

/// Whether a link must be quoted to survive `parse_line` unchanged.
fn needs_quotes(link: &str) -> bool {
    link.contains(['"', ','])
        || link.starts_with(char::is_whitespace)
        || link.ends_with(char::is_whitespace)
}

/// Write one link as a line, CSV-quoting it when needed.
fn render_line(link: &str, out: &mut String) {
    if needs_quotes(link) {
        out.push('"');
        out.push_str(&link.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(link);
    }
    out.push('\n');
}

/// Render a set as sorted lines.
fn render(links: &NotifiedSet) -> String {
    let mut sorted: Vec<&str> = links
        .iter()
        .map(String::as_str)
        .filter(|l| !l.is_empty() && !l.contains(['\n', '\r']))
        .collect();
    sorted.sort_unstable();

    let mut out = String::new();
    for link in sorted {
        render_line(link, &mut out);
    }
    out
}

#[async_trait]
impl NotifiedStore for LocalStore {
    async fn load(&self, board_id: &str) -> Result<NotifiedSet> {
        let path = self.path_for(board_id);
        match self.read_text(&path).await? {
            Some(text) => Ok(text.lines().filter_map(parse_line).collect()),
            None => {
                log::debug!("No notified set at {}, starting empty", path.display());
                Ok(NotifiedSet::new())
            }
        }
    }

    async fn save(&self, board_id: &str, links: &NotifiedSet) -> Result<()> {
        let path = self.path_for(board_id);
        self.write_bytes(&path, render(links).as_bytes()).await?;
        log::debug!("Saved {} links to {}", links.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MarkupKind;
    use tempfile::TempDir;

    fn set(links: &[&str]) -> NotifiedSet {
        links.iter().map(|l| l.to_string()).collect()
    }

    #[tokio::test]
    async fn test_load_missing_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());

        let loaded = store.load("infocom").await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path().join("database"));
        let links = set(&[
            "https://scatch.ssu.ac.kr/공지사항/?slug=b",
            "https://scatch.ssu.ac.kr/공지사항/?slug=a",
            "http://x/1",
        ]);

        store.save("scatch", &links).await.unwrap();
        assert_eq!(store.load("scatch").await.unwrap(), links);
        assert!(!store.path_for("scatch").with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_round_trip_keeps_quotes_commas_and_spaces() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let links = set(&[
            "\"quoted\"",
            " http://x/sp ",
            "http://x/?a=1,2",
            "http://x/\"mid\"",
            "\"",
            "http://x/plain",
        ]);

        store.save("infocom", &links).await.unwrap();
        assert_eq!(store.load("infocom").await.unwrap(), links);

        let text = std::fs::read_to_string(store.path_for("infocom")).unwrap();
        assert!(text.contains("\"http://x/?a=1,2\"\n"));
        assert!(text.contains("http://x/plain\n"));
    }

    #[tokio::test]
    async fn test_file_is_sorted_one_link_per_line() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());

        store
            .save("disu", &set(&["http://x/2", "http://x/1", "http://x/3"]))
            .await
            .unwrap();

        let text = std::fs::read_to_string(tmp.path().join("notified_posts_disu.csv")).unwrap();
        assert_eq!(text, "http://x/1\nhttp://x/2\nhttp://x/3\n");
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_state() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());

        store.save("infocom", &set(&["http://x/1", "http://x/2"])).await.unwrap();
        store.save("infocom", &set(&["http://x/3"])).await.unwrap();

        assert_eq!(store.load("infocom").await.unwrap(), set(&["http://x/3"]));
    }

    #[tokio::test]
    async fn test_reads_legacy_quoted_lines() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        std::fs::write(
            store.path_for("disu"),
            "http://x/1\r\n\"http://x/?a=1,2\"\r\n\r\n\"http://x/\"\"q\"\"\"\r\n",
        )
        .unwrap();

        let loaded = store.load("disu").await.unwrap();
        assert_eq!(
            loaded,
            set(&["http://x/1", "http://x/?a=1,2", "http://x/\"q\""])
        );
    }

    #[tokio::test]
    async fn test_board_store_file_override() {
        let tmp = TempDir::new().unwrap();
        let mut board = Board::new(
            "scatch",
            "SSU:catch",
            &["https://scatch.ssu.ac.kr/"],
            MarkupKind::ScatchNotice,
            "#016694",
        );
        board.store_file = Some("scatch.txt".to_string());
        let store = LocalStore::new(tmp.path()).with_boards(&[board]);

        store.save("scatch", &set(&["http://x/1"])).await.unwrap();
        assert!(tmp.path().join("scatch.txt").exists());
        assert_eq!(store.path_for("other"), tmp.path().join("notified_posts_other.csv"));
    }
}
