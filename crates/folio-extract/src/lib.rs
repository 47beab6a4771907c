//! Folio Extract — the extractor side of the input contract.
//!
//! Binary containers (EPUB, PDF, DOCX) are opened by external extractors that
//! hand over JSON extraction dumps. Plain text and Markdown need no container
//! parsing, so their signal extractors live here.

pub mod format;
pub mod markdown;
pub mod normalize;
pub mod plaintext;

pub use format::{extract_path, extract_str};
pub use normalize::{normalize_content, normalize_with_positions};
