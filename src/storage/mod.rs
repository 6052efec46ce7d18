//! Storage abstractions for notified-set persistence.
//!
//! Each board owns one set of links that have already been posted. The set is
//! loaded once per run, mutated in memory and written back wholesale.
//!
//! ## Directory Structure
//!
//! ```text
//! database/
//! ├── notified_posts_infocom.csv
//! ├── notified_posts_infocom_grad.csv
//! ├── notified_posts_scatch.csv
//! └── notified_posts_disu.csv
//! ```

pub mod local;
#[cfg(test)]
pub mod memory;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use local::LocalStore;
#[cfg(test)]
pub use memory::MemoryStore;

/// Set of links already notified for one board.
pub type NotifiedSet = HashSet<String>;

/// Trait for notified-set storage backends.
#[async_trait]
pub trait NotifiedStore: Send + Sync {
    /// Load the set for a board; an empty set when nothing was saved yet.
    async fn load(&self, board_id: &str) -> Result<NotifiedSet>;

    /// Replace the stored set for a board.
    async fn save(&self, board_id: &str, links: &NotifiedSet) -> Result<()>;
}
