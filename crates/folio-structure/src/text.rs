//! Text helpers: word counting, boundary snapping, paragraph breaks.

use once_cell::sync::Lazy;
use regex::Regex;

/// Longest chapter title kept, in characters.
const MAX_TITLE_CHARS: usize = 120;

// A blank line (possibly holding spaces or tabs) plus any whitespace after it.
static PARAGRAPH_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n\s*").expect("valid paragraph break pattern"));

/// Whitespace-token count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Largest char boundary of `text` that is `<= pos`.
pub fn floor_char_boundary(text: &str, pos: usize) -> usize {
    if pos >= text.len() {
        return text.len();
    }
    let mut pos = pos;
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// Byte offsets where a paragraph starts after a blank line.
///
/// Offsets are strictly inside `text` (never 0, never `text.len()`).
pub fn paragraph_starts(text: &str) -> Vec<usize> {
    PARAGRAPH_BREAK_RE
        .find_iter(text)
        .map(|m| m.end())
        .filter(|&end| end > 0 && end < text.len())
        .collect()
}

/// Title from heading text: first non-blank line, whitespace collapsed.
pub fn heading_title(text: &str) -> Option<String> {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > MAX_TITLE_CHARS {
        Some(collapsed.chars().take(MAX_TITLE_CHARS).collect())
    } else {
        Some(collapsed)
    }
}
