// src/services/fetch.rs

//! Board page fetching.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Board, HttpConfig, Item};
use crate::services::extractor_for;
use crate::utils::http;

/// Something that can return the body of a page.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

/// Fetches pages over HTTP with plain GET requests.
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    /// Create a source from HTTP settings.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: http::create_client(config)?,
        })
    }

    /// Create a source around an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(url, format!("HTTP {status}")));
        }
        Ok(response.text().await?)
    }
}

/// Fetch every page of a board and extract its candidate items in page order.
///
/// Any failure is reported as [`AppError::Fetch`] for the board.
pub async fn collect_candidates(source: &dyn PageSource, board: &Board) -> Result<Vec<Item>> {
    let extractor = extractor_for(board.markup);
    let mut items = Vec::new();

    for url in &board.urls {
        let base = Url::parse(url).map_err(|e| AppError::fetch(&board.id, e))?;
        let body = source
            .fetch_page(url)
            .await
            .map_err(|e| AppError::fetch(&board.id, e))?;
        let page_items = extractor
            .extract(&body, &base)
            .map_err(|e| AppError::fetch(&board.id, e))?;
        log::debug!("{}: {} items from {}", board.id, page_items.len(), url);
        items.extend(page_items);
    }

    Ok(items)
}
