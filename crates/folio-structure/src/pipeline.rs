//! Structuring pipeline: signals → candidates → chapters → document.

use folio_core::{ParseConfig, Result, Thresholds};
use tracing::{info, warn};

use crate::assemble::ChapterAssembler;
use crate::classify::HeadingClassifier;
use crate::document::DocumentParts;
use crate::postprocess::PostProcessor;
use crate::text::floor_char_boundary;
use crate::types::{ClassificationWarning, Document, Extraction, WarningReason};

/// A validated, reusable pipeline. Holds only read-only thresholds, so one
/// instance can serve any number of documents concurrently.
#[derive(Debug, Clone)]
pub struct Pipeline {
    thresholds: Thresholds,
    classifier: HeadingClassifier,
    assembler: ChapterAssembler,
    post: PostProcessor,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::with_thresholds(Thresholds::default())
    }
}

impl Pipeline {
    /// Validate `config` and build the pipeline. Invalid configuration is
    /// the only failure, and it happens here, before any document.
    pub fn new(config: &ParseConfig) -> Result<Self> {
        let thresholds = config.validate()?;
        Ok(Self::with_thresholds(thresholds))
    }

    pub fn with_thresholds(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            classifier: HeadingClassifier::new(thresholds),
            assembler: ChapterAssembler,
            post: PostProcessor::new(&thresholds),
        }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Structure one document. Never fails: degenerate input degrades to a
    /// single chapter and problems are reported as warnings.
    pub fn parse(&self, extraction: Extraction) -> Document {
        let Extraction {
            title,
            format,
            content,
            mut signals,
        } = extraction;

        // Conflicts are resolved on character boundaries, not raw offsets.
        for signal in signals.iter_mut().filter(|s| s.position < content.len()) {
            signal.position = floor_char_boundary(&content, signal.position);
        }

        let mut warnings: Vec<ClassificationWarning> = Vec::new();
        if content.trim().is_empty() {
            warn!(format = %format, "Empty content, producing a single empty chapter");
            warnings.push(ClassificationWarning::new(0, "", WarningReason::EmptyContent));
        }

        let classification = self.classifier.classify(&signals);
        warnings.extend(classification.warnings);

        let chapters = self.assembler.assemble(
            &content,
            &classification.candidates,
            title.as_deref(),
            &mut warnings,
        );
        let chapters = self.post.process(&content, chapters);

        let document = DocumentParts {
            title,
            format,
            content,
            chapters,
            warnings,
        }
        .into_document(self.thresholds.average_reading_speed_wpm);

        info!(
            format = %document.format,
            chapters = document.chapters.len(),
            words = document.word_count,
            warnings = document.warnings.len(),
            "Structured document"
        );

        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SourceFormat, StructuralSignal};

    #[test]
    fn test_invalid_config_rejected_up_front() {
        let config = ParseConfig {
            min_words_per_chapter: -5,
            ..Default::default()
        };
        assert!(Pipeline::new(&config).is_err());
    }

    #[test]
    fn test_empty_content() {
        let doc = Pipeline::default().parse(Extraction::new(SourceFormat::PlainText, ""));
        assert_eq!(doc.chapters.len(), 1);
        assert_eq!(doc.chapters[0].word_count, 0);
        assert_eq!(doc.word_count, 0);
        assert_eq!(doc.estimated_reading_time, 1);
        assert_eq!(doc.warnings[0].reason, WarningReason::EmptyContent);
    }

    #[test]
    fn test_title_used_for_fallback_chapter() {
        let extraction = Extraction::new(SourceFormat::Docx, "just some words")
            .with_title("Notes");
        let doc = Pipeline::default().parse(extraction);
        assert_eq!(doc.title.as_deref(), Some("Notes"));
        assert_eq!(doc.chapters[0].title, "Notes");
        assert_eq!(doc.format, SourceFormat::Docx);
    }

    #[test]
    fn test_mid_character_signals_resolve_by_confidence() {
        let content = format!("aé {}", vec!["word"; 150].join(" "));
        let extraction = Extraction::new(SourceFormat::Epub, content).with_signals(vec![
            StructuralSignal::pattern(1, "Chapter 1"),
            StructuralSignal::explicit_nav(2, "Real Nav", 1),
        ]);
        let doc = Pipeline::default().parse(extraction);
        let titles: Vec<&str> = doc.chapters.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Real Nav"]);
        assert_eq!(doc.warnings.len(), 1);
        assert_eq!(doc.warnings[0].text, "Chapter 1");
        assert!(matches!(
            doc.warnings[0].reason,
            WarningReason::ConflictingPosition { .. }
        ));
    }

    #[test]
    fn test_signals_flow_through() {
        let body = vec!["word"; 150].join(" ");
        let content = format!("Chapter 1\n{}\n\nChapter 2\n{}", body, body);
        let second = content.find("Chapter 2").unwrap();
        let extraction = Extraction::new(SourceFormat::PlainText, content.clone()).with_signals(vec![
            StructuralSignal::pattern(0, "Chapter 1"),
            StructuralSignal::pattern(second, "Chapter 2"),
            StructuralSignal::pattern(20, "not a heading"),
        ]);
        let doc = Pipeline::default().parse(extraction);
        assert_eq!(doc.chapters.len(), 2);
        assert_eq!(doc.chapters[1].start_position, second);
        assert_eq!(doc.chapters[1].title, "Chapter 2");
        assert_eq!(doc.warnings.len(), 1);
        assert_eq!(doc.warnings[0].reason, WarningReason::Unclassifiable);
    }
}
