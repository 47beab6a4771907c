//! Runtime types.

use folio_structure::Document;
use serde::Serialize;

/// Aggregate figures for a finished batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub documents: usize,
    pub failed: usize,
    pub chapters: usize,
    pub words: usize,
    pub warnings: usize,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
}

impl BatchSummary {
    /// Tally successful documents and failures.
    pub fn tally<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a Document>>,
    {
        let mut summary = Self::default();
        for result in results {
            match result {
                Some(doc) => {
                    summary.documents += 1;
                    summary.chapters += doc.chapters.len();
                    summary.words += doc.word_count;
                    summary.warnings += doc.warnings.len();
                }
                None => summary.failed += 1,
            }
        }
        summary
    }
}
