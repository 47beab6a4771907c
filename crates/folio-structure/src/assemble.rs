//! Chapter assembly: candidates + content → contiguous chapter list.

use tracing::debug;

use crate::text::{floor_char_boundary, heading_title, word_count};
use crate::types::{Chapter, ClassificationWarning, HeadingCandidate, WarningReason};

/// Leading text longer than this (trimmed, in characters) becomes its own chapter.
pub const FRONT_MATTER_MIN_CHARS: usize = 50;
/// Title of the chapter holding text before the first heading.
pub const FRONT_MATTER_TITLE: &str = "Front Matter";
/// Fallback title when there are no headings and no document title.
pub const UNTITLED: &str = "Untitled";

/// Build a chapter from a span of `content`.
pub(crate) fn make_chapter(
    content: &str,
    id: usize,
    title: String,
    level: u8,
    start: usize,
    end: usize,
) -> Chapter {
    let text = &content[start..end];
    Chapter {
        id,
        title,
        content: text.to_string(),
        start_position: start,
        end_position: end,
        level,
        word_count: word_count(text),
    }
}

/// Splits content into chapters at candidate positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChapterAssembler;

impl ChapterAssembler {
    /// Assemble chapters covering `[0, content.len())` without gaps.
    ///
    /// `candidates` must be sorted by position. Candidates at or beyond the
    /// end of the content are dropped with a warning.
    pub fn assemble(
        &self,
        content: &str,
        candidates: &[HeadingCandidate],
        document_title: Option<&str>,
        warnings: &mut Vec<ClassificationWarning>,
    ) -> Vec<Chapter> {
        let len = content.len();

        // Snap to char boundaries, drop out-of-range and duplicate positions.
        let mut heads: Vec<(usize, &HeadingCandidate)> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if candidate.position >= len {
                warnings.push(ClassificationWarning::new(
                    candidate.position,
                    &candidate.raw_text,
                    WarningReason::OutOfRange {
                        content_length: len,
                    },
                ));
                continue;
            }
            let start = floor_char_boundary(content, candidate.position);
            match heads.last_mut() {
                Some((prev_start, prev)) if *prev_start >= start => {
                    // Same character after snapping: keep the stronger heading.
                    let (kept, dropped) = if candidate.confidence > prev.confidence {
                        (candidate, std::mem::replace(prev, candidate))
                    } else {
                        (*prev, candidate)
                    };
                    debug!(
                        position = start,
                        "Dropping heading {:?} that collapses onto {:?}",
                        dropped.raw_text,
                        kept.raw_text
                    );
                    warnings.push(ClassificationWarning::new(
                        dropped.position,
                        &dropped.raw_text,
                        WarningReason::ConflictingPosition {
                            kept_confidence: kept.confidence,
                        },
                    ));
                }
                _ => heads.push((start, candidate)),
            }
        }

        if heads.is_empty() {
            let title = document_title
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(UNTITLED)
                .to_string();
            return vec![make_chapter(content, 0, title, 1, 0, len)];
        }

        let mut chapters = Vec::with_capacity(heads.len() + 1);

        // Front matter keeps its own chapter only when it carries real text.
        let first_start = heads[0].0;
        if first_start > 0 {
            let leading = content[..first_start].trim();
            if leading.chars().count() > FRONT_MATTER_MIN_CHARS {
                chapters.push(make_chapter(
                    content,
                    0,
                    FRONT_MATTER_TITLE.to_string(),
                    1,
                    0,
                    first_start,
                ));
            } else {
                heads[0].0 = 0;
            }
        }

        for (i, &(start, candidate)) in heads.iter().enumerate() {
            let end = heads.get(i + 1).map(|(next, _)| *next).unwrap_or(len);
            let id = chapters.len();
            let title = heading_title(&candidate.raw_text)
                .unwrap_or_else(|| format!("Section {}", id + 1));
            chapters.push(make_chapter(
                content,
                id,
                title,
                candidate.level,
                start,
                end,
            ));
        }

        chapters
    }
}
