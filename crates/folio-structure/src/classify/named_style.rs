//! Paragraph style names ("Heading 2", "Title", ...).

use folio_core::Thresholds;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Indexed, SignalClassifier};
use crate::types::{
    clamp_level, ClassificationWarning, HeadingCandidate, SignalKind, WarningReason,
};

/// Confidence for an exact `Heading N` style.
pub const EXACT_CONFIDENCE: f64 = 1.0;
/// Confidence for a loosely matched heading style.
pub const FUZZY_CONFIDENCE: f64 = 0.7;

static EXACT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Heading (\d+)$").unwrap());
// Applied to the lowercased style with separators removed.
static FUZZY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:heading|h)(\d+)$").unwrap());

/// Level and confidence for a style name, if it names a heading.
pub fn match_style(style: &str) -> Option<(u8, f64)> {
    if let Some(caps) = EXACT_RE.captures(style) {
        let level = caps[1].parse::<i64>().unwrap_or(i64::MAX);
        return Some((clamp_level(level), EXACT_CONFIDENCE));
    }

    let squashed: String = style
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .collect::<String>()
        .to_lowercase();

    match squashed.as_str() {
        "title" => return Some((1, FUZZY_CONFIDENCE)),
        "subtitle" => return Some((2, FUZZY_CONFIDENCE)),
        _ => {}
    }

    FUZZY_RE.captures(&squashed).map(|caps| {
        let level = caps[1].parse::<i64>().unwrap_or(i64::MAX);
        (clamp_level(level), FUZZY_CONFIDENCE)
    })
}

pub struct NamedStyleClassifier;

impl SignalClassifier for NamedStyleClassifier {
    fn classify(
        &self,
        signals: &[Indexed<'_>],
        _thresholds: &Thresholds,
        warnings: &mut Vec<ClassificationWarning>,
    ) -> Vec<(usize, HeadingCandidate)> {
        let mut out = Vec::with_capacity(signals.len());
        for &(seq, signal) in signals {
            let matched = signal.style_name.as_deref().and_then(match_style);
            let Some((level, confidence)) = matched else {
                warnings.push(ClassificationWarning::new(
                    signal.position,
                    &signal.text,
                    WarningReason::Unclassifiable,
                ));
                continue;
            };
            out.push((
                seq,
                HeadingCandidate {
                    position: signal.position,
                    level,
                    confidence,
                    raw_text: signal.text.clone(),
                    kind: SignalKind::NamedStyle,
                },
            ));
        }
        out
    }
}
