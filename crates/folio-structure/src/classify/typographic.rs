//! Font-size runs: headings are the statistical outliers.
//!
//! A run is a heading when its size is at least `mean + k * stddev` over every
//! sized run in the document. Distinct heading sizes are ranked, largest
//! first, to assign levels. Uniform sizes (zero deviation) yield no headings.

use std::collections::BTreeSet;

use folio_core::Thresholds;
use tracing::debug;

use super::{Indexed, SignalClassifier};
use crate::types::{
    ClassificationWarning, HeadingCandidate, SignalKind, WarningReason, MAX_LEVEL,
};

/// Deviations below this are treated as uniform typography.
const MIN_STD_DEV: f64 = 1e-6;

/// Mean and population standard deviation.
pub fn size_stats(sizes: &[f64]) -> Option<(f64, f64)> {
    if sizes.is_empty() {
        return None;
    }
    let n = sizes.len() as f64;
    let mean = sizes.iter().sum::<f64>() / n;
    let variance = sizes.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance.sqrt()))
}

// Sizes compared at 0.1pt resolution.
fn size_key(size: f64) -> i64 {
    (size * 10.0).round() as i64
}

pub struct TypographicClassifier;

impl SignalClassifier for TypographicClassifier {
    fn classify(
        &self,
        signals: &[Indexed<'_>],
        thresholds: &Thresholds,
        warnings: &mut Vec<ClassificationWarning>,
    ) -> Vec<(usize, HeadingCandidate)> {
        let mut sized = Vec::with_capacity(signals.len());
        for &(seq, signal) in signals {
            match signal.font_size {
                Some(size) if size.is_finite() && size > 0.0 => sized.push((seq, signal, size)),
                _ => warnings.push(ClassificationWarning::new(
                    signal.position,
                    &signal.text,
                    WarningReason::Unclassifiable,
                )),
            }
        }

        let sizes: Vec<f64> = sized.iter().map(|(_, _, size)| *size).collect();
        let Some((mean, std_dev)) = size_stats(&sizes) else {
            return Vec::new();
        };
        if std_dev < MIN_STD_DEV {
            debug!(runs = sizes.len(), "Uniform font sizes, no typographic headings");
            return Vec::new();
        }

        let threshold = mean + thresholds.typographic_std_dev_multiplier * std_dev;
        debug!(mean, std_dev, threshold, "Typographic heading threshold");

        let headings: Vec<_> = sized
            .into_iter()
            .filter(|(_, _, size)| *size >= threshold)
            .collect();

        // Largest size ranks first.
        let ranked: Vec<i64> = headings
            .iter()
            .map(|(_, _, size)| size_key(*size))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .rev()
            .collect();

        headings
            .into_iter()
            .map(|(seq, signal, size)| {
                let rank = ranked
                    .iter()
                    .position(|k| *k == size_key(size))
                    .unwrap_or(0);
                let level = (rank + 1).min(MAX_LEVEL as usize) as u8;
                let confidence = (0.5 + (size - threshold) / std_dev).clamp(0.0, 1.0);
                let candidate = HeadingCandidate {
                    position: signal.position,
                    level,
                    confidence,
                    raw_text: signal.text.clone(),
                    kind: SignalKind::Typographic,
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

    fn run(sizes: &[f64]) -> (Vec<(usize, HeadingCandidate)>, Vec<ClassificationWarning>) {
        let signals: Vec<StructuralSignal> = sizes
            .iter()
            .enumerate()
            .map(|(i, size)| StructuralSignal::typographic(i * 100, format!("run {}", i), *size))
            .collect();
        let indexed: Vec<_> = signals.iter().enumerate().collect();
        let mut warnings = Vec::new();
        let out = TypographicClassifier.classify(&indexed, &Thresholds::default(), &mut warnings);
        (out, warnings)
    }

    #[test]
    fn test_size_stats() {
        let (mean, sd) = size_stats(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((mean - 5.0).abs() < 1e-9);
        assert!((sd - 2.0).abs() < 1e-9);
        assert!(size_stats(&[]).is_none());
    }

    #[test]
    fn test_only_outlier_is_heading() {
        let (out, warnings) = run(&[12.0, 12.0, 12.0, 24.0, 12.0, 12.0, 30.0]);
        assert!(warnings.is_empty());
        assert_eq!(out.len(), 1);
        let (seq, candidate) = &out[0];
        assert_eq!(*seq, 6);
        assert_eq!(candidate.position, 600);
        assert_eq!(candidate.level, 1);
        assert!(candidate.confidence > 0.9);
    }

    #[test]
    fn test_uniform_sizes_yield_nothing() {
        let (out, _) = run(&[18.0, 18.0, 18.0, 18.0]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_levels_ranked_by_size() {
        let thresholds = Thresholds {
            typographic_std_dev_multiplier: 0.5,
            ..Default::default()
        };
        let mut sizes = vec![10.0; 20];
        sizes.extend([28.0, 20.0, 28.0]);
        let signals: Vec<StructuralSignal> = sizes
            .iter()
            .enumerate()
            .map(|(i, size)| StructuralSignal::typographic(i, "x", *size))
            .collect();
        let indexed: Vec<_> = signals.iter().enumerate().collect();
        let out = TypographicClassifier.classify(&indexed, &thresholds, &mut Vec::new());
        let levels: Vec<u8> = out.iter().map(|(_, c)| c.level).collect();
        assert_eq!(levels, vec![1, 2, 1]);
    }

    #[test]
    fn test_missing_font_size_warns() {
        let mut signal = StructuralSignal::typographic(5, "?", 12.0);
        signal.font_size = None;
        let signals = [signal];
        let indexed: Vec<_> = signals.iter().enumerate().collect();
        let mut warnings = Vec::new();
        let out = TypographicClassifier.classify(&indexed, &Thresholds::default(), &mut warnings);
        assert!(out.is_empty());
        assert_eq!(warnings[0].reason, WarningReason::Unclassifiable);
    }
}
