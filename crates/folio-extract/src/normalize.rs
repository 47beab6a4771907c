//! Content normalization.

/// Strip a leading byte-order mark and convert `\r\n` / lone `\r` to `\n`.
pub fn normalize_content(raw: &str) -> String {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Normalize `raw` like [`normalize_content`] and move every byte offset in
/// `positions` onto the normalized text.
///
/// An offset inside a character, the BOM, or a `\r\n` pair lands on the
/// start of what that character became. Offsets past the end land on the end.
pub fn normalize_with_positions(raw: &str, positions: &mut [usize]) -> String {
    let mut order: Vec<usize> = (0..positions.len()).collect();
    order.sort_by_key(|&i| positions[i]);
    let mut pending = order.into_iter().peekable();

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let mut end = i + c.len_utf8();
        let mapped = out.len();
        match c {
            '\u{feff}' if i == 0 => {}
            '\r' => {
                if let Some(&(_, '\n')) = chars.peek() {
                    chars.next();
                    end += 1;
                }
                out.push('\n');
            }
            _ => out.push(c),
        }
        while let Some(&idx) = pending.peek() {
            if positions[idx] >= end {
                break;
            }
            positions[idx] = mapped;
            pending.next();
        }
    }

    for idx in pending {
        positions[idx] = out.len();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_endings() {
        assert_eq!(normalize_content("a\r\nb\rc\n"), "a\nb\nc\n");
    }

    #[test]
    fn test_bom_stripped() {
        assert_eq!(normalize_content("\u{feff}Title"), "Title");
        assert_eq!(normalize_content("plain"), "plain");
    }

    #[test]
    fn test_positions_follow_crlf() {
        let raw = "One\r\nbody\r\n\r\nTwo\r\nmore";
        let two = raw.find("Two").unwrap();
        let mut positions = [two, 0, raw.find("more").unwrap()];
        let content = normalize_with_positions(raw, &mut positions);
        assert_eq!(content, normalize_content(raw));
        assert!(content[positions[0]..].starts_with("Two"));
        assert_eq!(positions[1], 0);
        assert!(content[positions[2]..].starts_with("more"));
    }

    #[test]
    fn test_positions_follow_bom_and_lone_cr() {
        let raw = "\u{feff}Intro\rChapter 2\rtext";
        let mut positions = [raw.find("Chapter").unwrap(), 1, 999];
        let content = normalize_with_positions(raw, &mut positions);
        assert_eq!(content, "Intro\nChapter 2\ntext");
        assert_eq!(positions[0], 6);
        // Inside the BOM.
        assert_eq!(positions[1], 0);
        assert_eq!(positions[2], content.len());
    }

    #[test]
    fn test_positions_unchanged_when_already_normal() {
        let raw = "héllo\nworld";
        let mut positions = [0, 1, 7, 3, 2];
        let content = normalize_with_positions(raw, &mut positions);
        assert_eq!(content, raw);
        // Byte 2 sits inside 'é'.
        assert_eq!(positions, [0, 1, 7, 3, 1]);
    }
}
