//! Navigation-tree entries: position as given, level = nesting depth.

use folio_core::Thresholds;

use super::{Indexed, SignalClassifier};
use crate::types::{clamp_level, ClassificationWarning, HeadingCandidate, SignalKind};

pub struct ExplicitNavClassifier;

impl SignalClassifier for ExplicitNavClassifier {
    fn classify(
        &self,
        signals: &[Indexed<'_>],
        _thresholds: &Thresholds,
        _warnings: &mut Vec<ClassificationWarning>,
    ) -> Vec<(usize, HeadingCandidate)> {
        signals
            .iter()
            .map(|&(seq, signal)| {
                let candidate = HeadingCandidate {
                    position: signal.position,
                    level: clamp_level(signal.level_hint.unwrap_or(1)),
                    confidence: 1.0,
                    raw_text: signal.text.clone(),
                    kind: SignalKind::ExplicitNav,
                };
                (seq, candidate)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StructuralSignal;

    #[test]
    fn test_depth_becomes_level_capped() {
        let signals = [
            StructuralSignal::explicit_nav(0, "Part One", 1),
            StructuralSignal::explicit_nav(10, "Deep", 9),
            StructuralSignal::explicit_nav(20, "Zero", 0),
        ];
        let indexed: Vec<_> = signals.iter().enumerate().collect();
        let out = ExplicitNavClassifier.classify(&indexed, &Thresholds::default(), &mut Vec::new());
        let levels: Vec<u8> = out.iter().map(|(_, c)| c.level).collect();
        assert_eq!(levels, vec![1, 6, 1]);
        assert!(out.iter().all(|(_, c)| c.confidence == 1.0));
    }
}
