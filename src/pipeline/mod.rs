//! Pipeline entry points.
//!
//! - `dedup`: decide which candidates of a board are new
//! - `run`: process every board once and deliver notifications

pub mod dedup;
pub mod run;

pub use dedup::{DedupEngine, Detection, detect};
pub use run::{BoardReport, Orchestrator, RunSummary};
