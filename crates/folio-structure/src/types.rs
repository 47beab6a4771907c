//! Data model shared by every pipeline stage.

use serde::{Deserialize, Serialize};

/// Lowest heading level.
pub const MIN_LEVEL: u8 = 1;
/// Deepest heading level.
pub const MAX_LEVEL: u8 = 6;

/// Clamp any level value into `[1, 6]`.
pub fn clamp_level(level: i64) -> u8 {
    level.clamp(MIN_LEVEL as i64, MAX_LEVEL as i64) as u8
}

/// Source format a document was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceFormat {
    Epub,
    Pdf,
    Docx,
    Markdown,
    PlainText,
    #[default]
    Unknown,
}

impl SourceFormat {
    /// Detect format from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "epub" => Self::Epub,
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "md" | "mdx" | "markdown" => Self::Markdown,
            "txt" | "text" => Self::PlainText,
            _ => Self::Unknown,
        }
    }

    /// Whether the format is text-native (no container to open).
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Markdown | Self::PlainText)
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Epub => write!(f, "epub"),
            Self::Pdf => write!(f, "pdf"),
            Self::Docx => write!(f, "docx"),
            Self::Markdown => write!(f, "markdown"),
            Self::PlainText => write!(f, "plain-text"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Where a structural signal came from. Each kind has its own classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalKind {
    /// Entry in a packaged navigation tree (e-book table of contents).
    ExplicitNav,
    /// Text run carrying a font size (fixed-layout pages).
    Typographic,
    /// Paragraph carrying a style name (word-processor documents, heading markup).
    NamedStyle,
    /// Line of unstructured text that may look like a heading.
    PatternHeuristic,
}

impl SignalKind {
    pub fn all() -> &'static [SignalKind] {
        &[
            Self::ExplicitNav,
            Self::Typographic,
            Self::NamedStyle,
            Self::PatternHeuristic,
        ]
    }
}

fn default_confidence() -> f64 {
    1.0
}

/// A format-specific hint that a heading may start at `position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralSignal {
    pub text: String,
    /// Byte offset into the normalized content.
    #[serde(alias = "sourcePosition")]
    pub position: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_hint: Option<i64>,
    /// Extractor prior in `[0, 1]`; scales the classifier's own confidence.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    pub kind: SignalKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_name: Option<String>,
}

impl StructuralSignal {
    fn new(kind: SignalKind, position: usize, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            position,
            level_hint: None,
            confidence: default_confidence(),
            kind,
            font_size: None,
            style_name: None,
        }
    }

    /// Navigation entry at nesting `depth` (1 = top level).
    pub fn explicit_nav(position: usize, text: impl Into<String>, depth: i64) -> Self {
        Self {
            level_hint: Some(depth),
            ..Self::new(SignalKind::ExplicitNav, position, text)
        }
    }

    /// Text run rendered at `font_size` points.
    pub fn typographic(position: usize, text: impl Into<String>, font_size: f64) -> Self {
        Self {
            font_size: Some(font_size),
            ..Self::new(SignalKind::Typographic, position, text)
        }
    }

    /// Paragraph carrying the paragraph style `style`.
    pub fn named_style(position: usize, text: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            style_name: Some(style.into()),
            ..Self::new(SignalKind::NamedStyle, position, text)
        }
    }

    /// Unstructured line that may be a heading.
    pub fn pattern(position: usize, text: impl Into<String>) -> Self {
        Self::new(SignalKind::PatternHeuristic, position, text)
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }
}

/// A signal that survived classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingCandidate {
    pub position: usize,
    pub level: u8,
    pub confidence: f64,
    pub raw_text: String,
    pub kind: SignalKind,
}

/// One contiguous span of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: usize,
    pub title: String,
    pub content: String,
    pub start_position: usize,
    pub end_position: usize,
    pub level: u8,
    pub word_count: usize,
}

impl Chapter {
    /// Byte length of the span.
    pub fn len(&self) -> usize {
        self.end_position - self.start_position
    }

    pub fn is_empty(&self) -> bool {
        self.start_position == self.end_position
    }
}

/// Why a signal or candidate was dropped, or an input was degraded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum WarningReason {
    /// Scored below the confidence floor.
    LowConfidence { confidence: f64 },
    /// Another candidate at the same position was kept.
    ConflictingPosition {
        #[serde(rename = "keptConfidence")]
        kept_confidence: f64,
    },
    /// No classifier rule applies (missing font size, unrecognized style, no pattern match).
    Unclassifiable,
    /// Position lies at or beyond the end of the content.
    OutOfRange {
        #[serde(rename = "contentLength")]
        content_length: usize,
    },
    /// Content was empty; a single empty chapter was produced.
    EmptyContent,
}

/// A non-fatal problem recorded while structuring a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationWarning {
    pub position: usize,
    pub text: String,
    #[serde(flatten)]
    pub reason: WarningReason,
}

impl ClassificationWarning {
    pub fn new(position: usize, text: &str, reason: WarningReason) -> Self {
        Self {
            position,
            text: text.to_string(),
            reason,
        }
    }
}

impl std::fmt::Display for ClassificationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            WarningReason::LowConfidence { confidence } => write!(
                f,
                "dropped {:?} at {}: confidence {:.2} below floor",
                self.text, self.position, confidence
            ),
            WarningReason::ConflictingPosition { kept_confidence } => write!(
                f,
                "dropped {:?} at {}: position taken by candidate with confidence {:.2}",
                self.text, self.position, kept_confidence
            ),
            WarningReason::Unclassifiable => {
                write!(f, "dropped {:?} at {}: unclassifiable", self.text, self.position)
            }
            WarningReason::OutOfRange { content_length } => write!(
                f,
                "dropped {:?} at {}: beyond content length {}",
                self.text, self.position, content_length
            ),
            WarningReason::EmptyContent => write!(f, "empty content"),
        }
    }
}

/// Input contract: everything an extractor hands over for one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub format: SourceFormat,
    /// Normalized UTF-8 text with `\n` line endings.
    #[serde(default)]
    pub content: String,
    /// Signals ordered by position.
    #[serde(default)]
    pub signals: Vec<StructuralSignal>,
}

impl Extraction {
    pub fn new(format: SourceFormat, content: impl Into<String>) -> Self {
        Self {
            title: None,
            format,
            content: content.into(),
            signals: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_signals(mut self, signals: Vec<StructuralSignal>) -> Self {
        self.signals = signals;
        self
    }
}

/// Final structured document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub format: SourceFormat,
    pub content: String,
    pub chapters: Vec<Chapter>,
    pub word_count: usize,
    /// Minutes, at least 1.
    pub estimated_reading_time: usize,
    /// Hex SHA-256 of `content`.
    pub content_hash: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ClassificationWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_level() {
        assert_eq!(clamp_level(0), 1);
        assert_eq!(clamp_level(-4), 1);
        assert_eq!(clamp_level(3), 3);
        assert_eq!(clamp_level(9), 6);
    }

    #[test]
    fn test_source_format_from_extension() {
        assert_eq!(SourceFormat::from_extension("EPUB"), SourceFormat::Epub);
        assert_eq!(SourceFormat::from_extension("md"), SourceFormat::Markdown);
        assert_eq!(SourceFormat::from_extension("txt"), SourceFormat::PlainText);
        assert_eq!(SourceFormat::from_extension("xyz"), SourceFormat::Unknown);
        assert!(SourceFormat::Markdown.is_text());
        assert!(!SourceFormat::Pdf.is_text());
    }

    #[test]
    fn test_signal_deserializes_with_defaults() {
        let signal: StructuralSignal = serde_json::from_str(
            r#"{"text": "Intro", "sourcePosition": 12, "kind": "named-style", "styleName": "Heading 2"}"#,
        )
        .unwrap();
        assert_eq!(signal.position, 12);
        assert_eq!(signal.kind, SignalKind::NamedStyle);
        assert_eq!(signal.confidence, 1.0);
        assert_eq!(signal.style_name.as_deref(), Some("Heading 2"));
        assert_eq!(signal.level_hint, None);
    }

    #[test]
    fn test_warning_serializes_flat() {
        let warning = ClassificationWarning::new(
            5,
            "Chapter",
            WarningReason::LowConfidence { confidence: 0.2 },
        );
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["reason"], "low-confidence");
        assert_eq!(json["position"], 5);
        assert_eq!(json["confidence"], 0.2);
    }
}
