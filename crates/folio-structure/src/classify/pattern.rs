//! Heading recognizers for unstructured text.

use folio_core::Thresholds;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Indexed, SignalClassifier};
use crate::types::{ClassificationWarning, HeadingCandidate, SignalKind, WarningReason};

/// Heuristic matches are less certain than structural sources.
pub const PATTERN_CONFIDENCE: f64 = 0.5;

const NUMBER: &str = r"(?:\d+|(?i:(?:one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|thirteen|fourteen|fifteen|sixteen|seventeen|eighteen|nineteen|twenty|thirty|forty|fifty|sixty|seventy|eighty|ninety|hundred)(?:[- ](?:one|two|three|four|five|six|seven|eight|nine))?))";

/// Ordered recognizers; the first match wins.
static RECOGNIZERS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        ("chapter-number", format!(r"^(?:Chapter|CHAPTER)\s+{}\b", NUMBER)),
        ("chapter-roman", r"^(?:Chapter|CHAPTER)\s+[IVXLCDM]+\b".to_string()),
        ("part-number", format!(r"^(?:Part|PART)\s+{}\b", NUMBER)),
        ("section-letter", r"^Section\s+[A-Z]\b".to_string()),
        // A bare "I" is the pronoun; a lone numeral needs its period.
        ("roman-title", r"^(?:[IVXLCDM]+\.|[IVXLCDM]{2,})\s+[A-Z][a-z]".to_string()),
        ("numbered-title", r"^\d+\.\s+[A-Z]".to_string()),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(&pattern).unwrap()))
    .collect()
});

/// Name of the first recognizer matching the first line of `text`.
pub fn recognize(text: &str) -> Option<&'static str> {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    RECOGNIZERS
        .iter()
        .find(|(_, re)| re.is_match(line))
        .map(|(name, _)| *name)
}

pub struct PatternClassifier;

impl SignalClassifier for PatternClassifier {
    fn classify(
        &self,
        signals: &[Indexed<'_>],
        _thresholds: &Thresholds,
        warnings: &mut Vec<ClassificationWarning>,
    ) -> Vec<(usize, HeadingCandidate)> {
        let mut out = Vec::new();
        for &(seq, signal) in signals {
            if recognize(&signal.text).is_none() {
                warnings.push(ClassificationWarning::new(
                    signal.position,
                    &signal.text,
                    WarningReason::Unclassifiable,
                ));
                continue;
            }
            out.push((
                seq,
                HeadingCandidate {
                    position: signal.position,
                    level: 1,
                    confidence: PATTERN_CONFIDENCE,
                    raw_text: signal.text.clone(),
                    kind: SignalKind::PatternHeuristic,
                },
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognizers() {
        assert_eq!(recognize("Chapter 1"), Some("chapter-number"));
        assert_eq!(recognize("Chapter Twenty-One: Home"), Some("chapter-number"));
        assert_eq!(recognize("CHAPTER 12"), Some("chapter-number"));
        assert_eq!(recognize("CHAPTER XIV"), Some("chapter-roman"));
        assert_eq!(recognize("Chapter IV"), Some("chapter-roman"));
        assert_eq!(recognize("Part Two"), Some("part-number"));
        assert_eq!(recognize("Section B"), Some("section-letter"));
        assert_eq!(recognize("IV. The Storm"), Some("roman-title"));
        assert_eq!(recognize("XII Rivers"), Some("roman-title"));
        assert_eq!(recognize("I. Beginnings"), Some("roman-title"));
        assert_eq!(recognize("3. Getting Started"), Some("numbered-title"));
    }

    #[test]
    fn test_first_line_only() {
        assert_eq!(recognize("\n  Chapter 3\nIt was raining."), Some("chapter-number"));
        assert_eq!(recognize("It was raining.\nChapter 3"), None);
    }

    #[test]
    fn test_prose_not_recognized() {
        assert_eq!(recognize("The chapter ended abruptly."), None);
        assert_eq!(recognize("Chapterhouse"), None);
        assert_eq!(recognize("Section b of the form"), None);
        assert_eq!(recognize("3.14 is pi"), None);
        assert_eq!(recognize(""), None);
        assert_eq!(recognize("I Never Knew"), None);
        assert_eq!(recognize("I Was There"), None);
    }

    #[test]
    fn test_candidates_are_level_one() {
        let signals = [
            crate::types::StructuralSignal::pattern(0, "Chapter 1"),
            crate::types::StructuralSignal::pattern(50, "just a line"),
        ];
        let indexed: Vec<_> = signals.iter().enumerate().collect();
        let mut warnings = Vec::new();
        let out = PatternClassifier.classify(&indexed, &Thresholds::default(), &mut warnings);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].1.level, 1);
        assert_eq!(out[0].1.confidence, 0.5);
        assert_eq!(warnings.len(), 1);
    }
}
