//! Plain text: offer heading-shaped lines to the pattern classifier.
//!
//! A line is heading-shaped when it stands alone after a blank line (or at
//! the top of the document), is short, starts with a capital letter or a
//! digit, and does not read like the end of a sentence. Only lines one of
//! the pattern recognizers accepts are emitted, so ordinary short lines
//! such as dialogue never reach the classifier.

use folio_structure::classify::pattern::recognize;
use folio_structure::StructuralSignal;

/// Longest line considered, in characters.
const MAX_HEADING_CHARS: usize = 80;
/// Most words a heading line may carry.
const MAX_HEADING_WORDS: usize = 10;

/// Lines of `content` with their starting byte offsets.
pub(crate) fn lines_with_offsets(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content.split_inclusive('\n').scan(0usize, |offset, line| {
        let start = *offset;
        *offset += line.len();
        Some((start, line.trim_end_matches(['\n', '\r'])))
    })
}

fn is_heading_shaped(line: &str) -> bool {
    let trimmed = line.trim();
    let Some(first) = trimmed.chars().next() else {
        return false;
    };
    if !(first.is_uppercase() || first.is_ascii_digit()) {
        return false;
    }
    if trimmed.chars().count() > MAX_HEADING_CHARS {
        return false;
    }
    let words = trimmed.split_whitespace().count();
    if words > MAX_HEADING_WORDS {
        return false;
    }
    match trimmed.chars().last() {
        Some(',' | ';' | '!' | '?' | '"' | '\u{201d}') => false,
        // "1." style numbering is fine, a full sentence is not.
        Some('.') => words <= 3,
        _ => true,
    }
}

/// Pattern-heuristic signals for heading-shaped lines of `content`.
pub fn extract_signals(content: &str) -> Vec<StructuralSignal> {
    let mut signals = Vec::new();
    let mut previous_blank = true;

    for (offset, line) in lines_with_offsets(content) {
        let blank = line.trim().is_empty();
        if !blank && previous_blank && is_heading_shaped(line) && recognize(line).is_some() {
            let indent = line.len() - line.trim_start().len();
            signals.push(StructuralSignal::pattern(offset + indent, line.trim()));
        }
        previous_blank = blank;
    }

    signals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_with_offsets() {
        let lines: Vec<_> = lines_with_offsets("ab\n\ncd").collect();
        assert_eq!(lines, vec![(0, "ab"), (3, ""), (4, "cd")]);
    }

    #[test]
    fn test_heading_lines_found() {
        let content = "CHAPTER I\n\nIt was a dark night.\n\n  Chapter 2\nMore text here.\n";
        let signals = extract_signals(content);
        let texts: Vec<&str> = signals.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["CHAPTER I", "Chapter 2"]);
        assert_eq!(signals[0].position, 0);
        assert_eq!(&content[signals[1].position..signals[1].position + 9], "Chapter 2");
    }

    #[test]
    fn test_sentence_lines_skipped() {
        assert!(!is_heading_shaped("She walked home after the long and tiring day at work."));
        assert!(!is_heading_shaped("Really?"));
        assert!(!is_heading_shaped("lowercase start"));
        assert!(!is_heading_shaped("\"Quoted speech\""));
        assert!(is_heading_shaped("3. Getting Started"));
        assert!(is_heading_shaped("Part Two"));
    }

    #[test]
    fn test_continuation_lines_skipped() {
        // Second line follows a non-blank line.
        let signals = extract_signals("Chapter 8\nChapter 9\n");
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].text, "Chapter 8");
    }

    #[test]
    fn test_short_unrecognized_lines_skipped() {
        let content = "Chapter IV\n\nHello there\n\nYes\n\nThe Old House\n\nIt was late.\n";
        let signals = extract_signals(content);
        let texts: Vec<&str> = signals.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Chapter IV"]);
    }
}
