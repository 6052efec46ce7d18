//! Novelty detection against a board's notified set.
//!
//! Given a board's candidate items and the links already posted for it,
//! decides which items are new and produces the updated set.
//!
//! Only items with a non-empty link take part: they are the only ones with a
//! stable identity. Linkless items are dropped silently.

use crate::error::Result;
use crate::models::{Item, NoveltyPolicy};
use crate::storage::{NotifiedSet, NotifiedStore};

/// Outcome of novelty detection for one board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detection {
    /// Items to notify, in candidate order
    pub new_items: Vec<Item>,
    /// Previous set plus the links of `new_items`
    pub updated: NotifiedSet,
}

impl Detection {
    pub fn has_new(&self) -> bool {
        !self.new_items.is_empty()
    }
}

/// Split `candidates` into new items under `policy`, starting from `seen`.
pub fn detect(policy: NoveltyPolicy, mut seen: NotifiedSet, candidates: &[Item]) -> Detection {
    let mut new_items = Vec::new();

    for item in candidates {
        if !item.has_link() {
            continue;
        }
        // insert() is false for links already notified or repeated on the page
        if seen.insert(item.link.clone()) {
            new_items.push(item.clone());
            if policy == NoveltyPolicy::FirstNewOnly {
                break;
            }
        }
    }

    Detection {
        new_items,
        updated: seen,
    }
}

/// Dedup engine bound to a notified-set store.
pub struct DedupEngine<'a> {
    store: &'a dyn NotifiedStore,
    policy: NoveltyPolicy,
}

impl<'a> DedupEngine<'a> {
    pub fn new(store: &'a dyn NotifiedStore, policy: NoveltyPolicy) -> Self {
        Self { store, policy }
    }

    /// Load the board's set and detect new items without persisting.
    pub async fn evaluate(&self, board_id: &str, candidates: &[Item]) -> Result<Detection> {
        let seen = self.store.load(board_id).await?;
        let known = seen.len();
        let detection = detect(self.policy, seen, candidates);
        log::debug!(
            "{}: {} candidates, {} known, {} new",
            board_id,
            candidates.len(),
            known,
            detection.new_items.len()
        );
        Ok(detection)
    }

    /// Persist the updated set, whether or not anything was new.
    pub async fn commit(&self, board_id: &str, detection: &Detection) -> Result<()> {
        self.store.save(board_id, &detection.updated).await
    }

    /// Evaluate and persist in one step.
    pub async fn process(&self, board_id: &str, candidates: &[Item]) -> Result<Detection> {
        let detection = self.evaluate(board_id, candidates).await?;
        self.commit(board_id, &detection).await?;
        Ok(detection)
    }
}
