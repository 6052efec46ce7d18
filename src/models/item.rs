//! Notice item data structure.

use serde::{Deserialize, Serialize};

/// A single announcement scraped from a board page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Item {
    /// Notice title (display only, may be empty)
    pub title: String,

    /// Absolute URL of the notice; identity key for deduplication
    pub link: String,
}

impl Item {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }

    /// Items without a link have no stable identity and are never notified.
    pub fn has_link(&self) -> bool {
        !self.link.is_empty()
    }

    /// Title to show to humans, substituting `placeholder` when empty.
    pub fn display_title<'a>(&'a self, placeholder: &'a str) -> &'a str {
        if self.title.trim().is_empty() {
            placeholder
        } else {
            &self.title
        }
    }
}
