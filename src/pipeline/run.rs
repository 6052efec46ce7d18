// src/pipeline/run.rs

//! One notification run over every configured board.

use std::time::Duration;

use crate::error::Result;
use crate::models::{Aggregation, Board, Config, Item, PersistMode};
use crate::notify::{Notifier, Renderer, WebhookPayload};
use crate::pipeline::dedup::{DedupEngine, Detection};
use crate::services::{PageSource, collect_candidates};
use crate::storage::NotifiedStore;

/// What happened to one board during a run.
#[derive(Debug, Clone)]
pub struct BoardReport {
    pub board_id: String,
    pub board_name: String,
    /// Number of items extracted from the board's pages
    pub candidates: usize,
    /// Items that were sent
    pub new_items: Vec<Item>,
    /// Whether fetching failed and the board was treated as empty
    pub fetch_failed: bool,
}

/// Summary of a full run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub boards: Vec<BoardReport>,
}

impl RunSummary {
    /// Total number of notified items.
    pub fn new_count(&self) -> usize {
        self.boards.iter().map(|b| b.new_items.len()).sum()
    }

    /// Boards whose pages could not be fetched.
    pub fn failed_boards(&self) -> Vec<&str> {
        self.boards
            .iter()
            .filter(|b| b.fetch_failed)
            .map(|b| b.board_id.as_str())
            .collect()
    }
}

/// Sequences extraction, dedup, notification and persistence across boards.
pub struct Orchestrator<'a> {
    config: &'a Config,
    source: &'a dyn PageSource,
    store: &'a dyn NotifiedStore,
    notifier: &'a dyn Notifier,
    renderer: Renderer,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        config: &'a Config,
        source: &'a dyn PageSource,
        store: &'a dyn NotifiedStore,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            config,
            source,
            store,
            notifier,
            renderer: Renderer::new(&config.notify),
        }
    }

    /// Replace the attachment renderer.
    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Process every board once.
    ///
    /// A board whose pages cannot be fetched is treated as having no items.
    /// A rejected webhook post aborts the run.
    pub async fn run(&self) -> Result<RunSummary> {
        match self.config.notify.aggregation {
            Aggregation::PerBoard => self.run_per_board().await,
            Aggregation::Batched => self.run_batched().await,
        }
    }

    fn engine(&self) -> DedupEngine<'a> {
        DedupEngine::new(self.store, self.config.notify.policy)
    }

    async fn candidates(&self, board: &Board) -> Result<(Vec<Item>, bool)> {
        match collect_candidates(self.source, board).await {
            Ok(items) => Ok((items, false)),
            Err(e) if !e.is_fatal() => {
                log::warn!("{}: {}; treating board as empty", board.name, e);
                Ok((Vec::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    async fn pause(&self) {
        let delay = Duration::from_millis(self.config.notify.send_delay_ms);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    async fn run_per_board(&self) -> Result<RunSummary> {
        let engine = self.engine();
        let mut summary = RunSummary::default();

        for (index, board) in self.config.boards.iter().enumerate() {
            let (candidates, fetch_failed) = self.candidates(board).await?;
            let detection = engine.evaluate(&board.id, &candidates).await?;
            let payload = self.renderer.board_payload(board, &detection.new_items);

            if index > 0 {
                self.pause().await;
            }
            self.deliver(&engine, board, &detection, payload).await?;

            log::info!(
                "{}: {} new of {} candidates",
                board.name,
                detection.new_items.len(),
                candidates.len()
            );
            summary
                .boards
                .push(report(board, candidates.len(), detection.new_items, fetch_failed));
        }

        Ok(summary)
    }

    /// Send one board's payload and persist its set in the configured order.
    async fn deliver(
        &self,
        engine: &DedupEngine<'_>,
        board: &Board,
        detection: &Detection,
        payload: WebhookPayload,
    ) -> Result<()> {
        match self.config.notify.persist {
            PersistMode::BeforeSend => {
                engine.commit(&board.id, detection).await?;
                self.send(payload).await
            }
            PersistMode::AfterSend => {
                self.send(payload).await?;
                engine.commit(&board.id, detection).await
            }
        }
    }

    /// Post a payload, split into posts of at most `max_attachments_per_post`.
    ///
    /// Chunks go out in order with the usual pause between them. A rejected
    /// chunk stops the rest.
    async fn send(&self, payload: WebhookPayload) -> Result<()> {
        let limit = self.config.notify.max_attachments_per_post.max(1);
        if payload.attachments.len() <= limit {
            return self.notifier.send(&payload).await;
        }

        let total = payload.attachments.len().div_ceil(limit);
        for (index, chunk) in payload.attachments.chunks(limit).enumerate() {
            if index > 0 {
                self.pause().await;
            }
            log::debug!(
                "Sending post {}/{} ({} attachments)",
                index + 1,
                total,
                chunk.len()
            );
            self.notifier
                .send(&WebhookPayload::new(chunk.to_vec()))
                .await?;
        }
        Ok(())
    }

    async fn run_batched(&self) -> Result<RunSummary> {
        let engine = self.engine();
        let persist = self.config.notify.persist;
        let mut summary = RunSummary::default();
        let mut attachments = Vec::new();
        let mut pending = Vec::new();

        for board in &self.config.boards {
            let (candidates, fetch_failed) = self.candidates(board).await?;
            let detection = engine.evaluate(&board.id, &candidates).await?;
            attachments.extend(self.renderer.items(board, &detection.new_items));

            if persist == PersistMode::BeforeSend {
                engine.commit(&board.id, &detection).await?;
            }

            log::info!(
                "{}: {} new of {} candidates",
                board.name,
                detection.new_items.len(),
                candidates.len()
            );
            summary.boards.push(report(
                board,
                candidates.len(),
                detection.new_items.clone(),
                fetch_failed,
            ));
            pending.push((board, detection));
        }

        if attachments.is_empty() {
            attachments.push(self.renderer.batch_no_news());
        }
        self.send(WebhookPayload::new(attachments)).await?;

        if persist == PersistMode::AfterSend {
            for (board, detection) in &pending {
                engine.commit(&board.id, detection).await?;
            }
        }

        Ok(summary)
    }
}

fn report(board: &Board, candidates: usize, new_items: Vec<Item>, fetch_failed: bool) -> BoardReport {
    BoardReport {
        board_id: board.id.clone(),
        board_name: board.name.clone(),
        candidates,
        new_items,
        fetch_failed,
    }
}
