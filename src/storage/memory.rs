//! In-memory storage used by the pipeline tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::Result;
use crate::storage::{NotifiedSet, NotifiedStore};

/// Notified sets kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sets: Mutex<HashMap<String, NotifiedSet>>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a board's set.
    pub fn with_set(self, board_id: &str, links: &[&str]) -> Self {
        self.lock_sets().insert(
            board_id.to_string(),
            links.iter().map(|l| l.to_string()).collect(),
        );
        self
    }

    /// Current set of a board, if it was ever seeded or saved.
    pub fn get(&self, board_id: &str) -> Option<NotifiedSet> {
        self.lock_sets().get(board_id).cloned()
    }

    /// Number of `save` calls so far.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_sets(&self) -> std::sync::MutexGuard<'_, HashMap<String, NotifiedSet>> {
        self.sets.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl NotifiedStore for MemoryStore {
    async fn load(&self, board_id: &str) -> Result<NotifiedSet> {
        Ok(self.get(board_id).unwrap_or_default())
    }

    async fn save(&self, board_id: &str, links: &NotifiedSet) -> Result<()> {
        self.lock_sets().insert(board_id.to_string(), links.clone());
        *self.saves.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip() {
        let store = MemoryStore::new().with_set("infocom", &["http://x/1"]);
        let mut links = store.load("infocom").await.unwrap();
        links.insert("http://x/2".to_string());

        store.save("infocom", &links).await.unwrap();
        assert_eq!(store.load("infocom").await.unwrap(), links);
        assert_eq!(store.save_count(), 1);
        assert!(store.load("scatch").await.unwrap().is_empty());
    }
}
