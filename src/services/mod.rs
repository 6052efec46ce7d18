//! Service layer for the notifier.
//!
//! This module contains the I/O-facing logic for:
//! - Page fetching (`PageSource`, `HttpSource`)
//! - Markup extraction (`Extractor` and one implementation per board layout)

pub mod extract;
pub mod fetch;

pub use extract::{DisuExtractor, Extractor, InfocomExtractor, ScatchExtractor, extractor_for};
pub use fetch::{HttpSource, PageSource, collect_candidates};
