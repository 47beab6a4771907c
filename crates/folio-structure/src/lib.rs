//! Folio Structure — heading classification, chapter assembly, post-processing, document model.
//!
//! Every source format converges here: structural signals from any extractor
//! become one ordered, gapless list of chapters over the normalized content.

pub mod assemble;
pub mod classify;
pub mod document;
pub mod pipeline;
pub mod postprocess;
pub mod text;
pub mod types;

pub use assemble::ChapterAssembler;
pub use classify::{Classification, HeadingClassifier};
pub use pipeline::Pipeline;
pub use postprocess::PostProcessor;
pub use types::*;
