//! Folio Runtime — batch orchestration.
//!
//! Fans independent pipeline executions out over tokio's blocking pool,
//! bounded by a worker budget, sharing only the read-only pipeline.

pub mod orchestrator;
pub mod types;

pub use orchestrator::{available_workers, BatchOutput, Orchestrator};
pub use types::*;
