//! Chapter post-processing: merge undersized chapters, split oversized ones.
//!
//! Chapters are spans of one immutable content string, so merging extends
//! the earlier span over the later one and splitting cuts a span at a
//! paragraph start. Word counts are always recomputed from the span.
//!
//! Running `process` on its own output returns it unchanged: after merging,
//! every chapter but a lone one has at least `min_words` words, and a split
//! only cuts where both sides keep at least that many.

use folio_core::Thresholds;
use tracing::debug;

use crate::assemble::make_chapter;
use crate::text::{paragraph_starts, word_count};
use crate::types::Chapter;

/// Merges and splits chapters according to the configured word limits.
#[derive(Debug, Clone, Copy)]
pub struct PostProcessor {
    min_words: usize,
    max_words: Option<usize>,
}

impl Default for PostProcessor {
    fn default() -> Self {
        Self::new(&Thresholds::default())
    }
}

impl PostProcessor {
    pub fn new(thresholds: &Thresholds) -> Self {
        Self {
            min_words: thresholds.min_words_per_chapter,
            max_words: thresholds.max_words_per_chunk,
        }
    }

    /// Merge, then split, then renumber ids `0..N-1`.
    ///
    /// `chapters` must be contiguous spans of `content`.
    pub fn process(&self, content: &str, chapters: Vec<Chapter>) -> Vec<Chapter> {
        let merged = self.merge_small(content, chapters);
        let sized = match self.max_words {
            Some(max_words) => self.split_large(content, merged, max_words),
            None => merged,
        };
        sized
            .into_iter()
            .enumerate()
            .map(|(id, chapter)| Chapter { id, ..chapter })
            .collect()
    }

    /// Fold every chapter under `min_words` into its predecessor; a short
    /// leading run folds forward into the first chapter large enough.
    pub fn merge_small(&self, content: &str, chapters: Vec<Chapter>) -> Vec<Chapter> {
        let mut out: Vec<Chapter> = Vec::with_capacity(chapters.len());
        let mut pending: Option<Chapter> = None;

        for chapter in chapters {
            let chapter = match pending.take() {
                Some(earlier) => absorb(content, earlier, &chapter),
                None => chapter,
            };

            if chapter.word_count >= self.min_words {
                out.push(chapter);
                continue;
            }

            match out.last_mut() {
                Some(prev) => {
                    debug!(
                        "Merging {:?} ({} words) into {:?}",
                        chapter.title, chapter.word_count, prev.title
                    );
                    *prev = absorb(content, prev.clone(), &chapter);
                }
                None => pending = Some(chapter),
            }
        }

        // Everything was short: one chapter holds it all.
        if let Some(rest) = pending {
            out.push(rest);
        }
        out
    }

    /// Split every chapter over `max_words` at the paragraph start nearest
    /// its midpoint, recursively.
    pub fn split_large(&self, content: &str, chapters: Vec<Chapter>, max_words: usize) -> Vec<Chapter> {
        let mut out = Vec::with_capacity(chapters.len());
        for chapter in chapters {
            if chapter.word_count <= max_words {
                out.push(chapter);
                continue;
            }

            let mut spans = Vec::new();
            self.split_span(
                content,
                chapter.start_position,
                chapter.end_position,
                max_words,
                &mut spans,
            );

            if spans.len() == 1 {
                debug!(
                    "No paragraph boundary to split {:?} ({} words)",
                    chapter.title, chapter.word_count
                );
                out.push(chapter);
                continue;
            }

            debug!("Splitting {:?} into {} parts", chapter.title, spans.len());
            for (n, (start, end)) in spans.into_iter().enumerate() {
                out.push(make_chapter(
                    content,
                    chapter.id,
                    format!("{} (part {})", chapter.title, n + 1),
                    chapter.level,
                    start,
                    end,
                ));
            }
        }
        out
    }

    fn split_span(
        &self,
        content: &str,
        start: usize,
        end: usize,
        max_words: usize,
        spans: &mut Vec<(usize, usize)>,
    ) {
        if word_count(&content[start..end]) <= max_words {
            spans.push((start, end));
            return;
        }
        match self.split_point(&content[start..end]) {
            Some(offset) => {
                self.split_span(content, start, start + offset, max_words, spans);
                self.split_span(content, start + offset, end, max_words, spans);
            }
            None => spans.push((start, end)),
        }
    }

    /// Paragraph start nearest the middle of `span` that leaves at least
    /// `min_words` (and at least one word) on each side.
    fn split_point(&self, span: &str) -> Option<usize> {
        let floor = self.min_words.max(1);
        let total = word_count(span);
        let midpoint = span.len() / 2;

        // Paragraph starts follow whitespace, so counts add up across them.
        let mut before = 0;
        let mut prev = 0;
        let mut best: Option<usize> = None;
        for boundary in paragraph_starts(span) {
            before += word_count(&span[prev..boundary]);
            prev = boundary;
            if before < floor || total - before < floor {
                continue;
            }
            let closer = best.map_or(true, |b| boundary.abs_diff(midpoint) < b.abs_diff(midpoint));
            if closer {
                best = Some(boundary);
            }
        }
        best
    }
}

/// `earlier` extended over `later`, keeping the earlier title and level.
fn absorb(content: &str, earlier: Chapter, later: &Chapter) -> Chapter {
    make_chapter(
        content,
        earlier.id,
        earlier.title,
        earlier.level,
        earlier.start_position,
        later.end_position,
    )
}
