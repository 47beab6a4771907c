//! Heading classification: structural signals → leveled, scored candidates.
//!
//! Signals are grouped by their `SignalKind` and routed through `DISPATCH`,
//! a fixed table holding one classifier per kind. Each classifier assigns a
//! level and a base confidence; this module then applies the extractor prior,
//! the confidence floor, and same-position tie-breaking. Nothing here fails:
//! every dropped signal becomes a `ClassificationWarning`.

pub mod explicit_nav;
pub mod named_style;
pub mod pattern;
pub mod typographic;

use folio_core::Thresholds;
use tracing::debug;

use crate::types::{
    ClassificationWarning, HeadingCandidate, SignalKind, StructuralSignal, WarningReason,
};

pub use explicit_nav::ExplicitNavClassifier;
pub use named_style::NamedStyleClassifier;
pub use pattern::PatternClassifier;
pub use typographic::TypographicClassifier;

/// A signal paired with its index in the input list.
pub type Indexed<'a> = (usize, &'a StructuralSignal);

/// Classifier for one signal kind.
///
/// Receives every signal of its kind at once (typographic scoring needs
/// document-wide statistics) and returns `(input index, candidate)` pairs
/// carrying the kind's base confidence.
pub trait SignalClassifier: Sync {
    fn classify(
        &self,
        signals: &[Indexed<'_>],
        thresholds: &Thresholds,
        warnings: &mut Vec<ClassificationWarning>,
    ) -> Vec<(usize, HeadingCandidate)>;
}

/// Dispatch table keyed by signal kind.
static DISPATCH: [(SignalKind, &dyn SignalClassifier); 4] = [
    (SignalKind::ExplicitNav, &ExplicitNavClassifier),
    (SignalKind::Typographic, &TypographicClassifier),
    (SignalKind::NamedStyle, &NamedStyleClassifier),
    (SignalKind::PatternHeuristic, &PatternClassifier),
];

/// Output of a classification run.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Surviving candidates, sorted by position, at most one per position.
    pub candidates: Vec<HeadingCandidate>,
    pub warnings: Vec<ClassificationWarning>,
}

/// Turns structural signals into heading candidates.
#[derive(Debug, Clone, Default)]
pub struct HeadingClassifier {
    thresholds: Thresholds,
}

impl HeadingClassifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn classify(&self, signals: &[StructuralSignal]) -> Classification {
        let mut warnings = Vec::new();
        let mut scored: Vec<(usize, HeadingCandidate)> = Vec::with_capacity(signals.len());

        for &(kind, classifier) in DISPATCH.iter() {
            let group: Vec<Indexed<'_>> = signals
                .iter()
                .enumerate()
                .filter(|(_, s)| s.kind == kind)
                .collect();
            if group.is_empty() {
                continue;
            }
            scored.extend(classifier.classify(&group, &self.thresholds, &mut warnings));
        }

        // Extractor prior, then the floor.
        let floor = self.thresholds.heading_confidence_floor;
        let mut accepted = Vec::with_capacity(scored.len());
        for (seq, mut candidate) in scored {
            candidate.confidence = scale_confidence(candidate.confidence, signals[seq].confidence);
            if candidate.confidence < floor {
                debug!(
                    position = candidate.position,
                    confidence = candidate.confidence,
                    "Dropping low-confidence heading {:?}",
                    candidate.raw_text
                );
                warnings.push(ClassificationWarning::new(
                    candidate.position,
                    &candidate.raw_text,
                    WarningReason::LowConfidence {
                        confidence: candidate.confidence,
                    },
                ));
                continue;
            }
            accepted.push((seq, candidate));
        }

        let candidates = resolve_conflicts(accepted, &mut warnings);
        warnings.sort_by_key(|w| w.position);

        Classification {
            candidates,
            warnings,
        }
    }
}

fn scale_confidence(base: f64, prior: f64) -> f64 {
    let prior = if prior.is_finite() {
        prior.clamp(0.0, 1.0)
    } else {
        0.0
    };
    (base * prior).clamp(0.0, 1.0)
}

/// Keep one candidate per position: highest confidence, then first seen.
fn resolve_conflicts(
    mut scored: Vec<(usize, HeadingCandidate)>,
    warnings: &mut Vec<ClassificationWarning>,
) -> Vec<HeadingCandidate> {
    scored.sort_by(|(seq_a, a), (seq_b, b)| {
        a.position
            .cmp(&b.position)
            .then(b.confidence.total_cmp(&a.confidence))
            .then(seq_a.cmp(seq_b))
    });

    let mut kept: Vec<HeadingCandidate> = Vec::with_capacity(scored.len());
    for (_, candidate) in scored {
        match kept.last() {
            Some(prev) if prev.position == candidate.position => {
                debug!(
                    position = candidate.position,
                    "Dropping conflicting heading {:?}", candidate.raw_text
                );
                warnings.push(ClassificationWarning::new(
                    candidate.position,
                    &candidate.raw_text,
                    WarningReason::ConflictingPosition {
                        kept_confidence: prev.confidence,
                    },
                ));
            }
            _ => kept.push(candidate),
        }
    }
    kept
}
