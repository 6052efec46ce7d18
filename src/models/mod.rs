// src/models/mod.rs

//! Domain models for the notifier.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod board;
mod config;
mod item;

// Re-export all public types
pub use board::{Board, MarkupKind};
pub(crate) use board::default_store_file;
pub use config::{Aggregation, Config, HttpConfig, NotifyConfig, NoveltyPolicy, PersistMode, Secrets};
pub use item::Item;
