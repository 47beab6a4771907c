//! Markdown: heading markup becomes named-style signals ("Heading N").

use folio_structure::StructuralSignal;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::plaintext::lines_with_offsets;

static ATX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}(#{1,6})(?:[ \t]+(.*?))?(?:[ \t]+#+)?[ \t]*$").unwrap());
static SETEXT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ {0,3}(=+|-+)[ \t]*$").unwrap());
static FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ {0,3}(```|~~~)").unwrap());
static FRONT_MATTER_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^title:\s*["']?(.*?)["']?\s*$"#).unwrap());

/// Markdown headings found in `content`, plus the front-matter title if any.
#[derive(Debug, Clone, Default)]
pub struct MarkdownStructure {
    pub title: Option<String>,
    pub signals: Vec<StructuralSignal>,
}

fn heading_style(level: usize) -> String {
    format!("Heading {}", level)
}

/// Scan `content` for ATX and setext headings, skipping fenced code and
/// YAML front matter.
pub fn extract_structure(content: &str) -> MarkdownStructure {
    let mut structure = MarkdownStructure::default();
    let mut in_fence: Option<&str> = None;
    let mut in_front_matter = false;
    // Previous line eligible to be a setext heading.
    let mut paragraph: Option<(usize, &str)> = None;

    for (index, (offset, line)) in lines_with_offsets(content).enumerate() {
        if index == 0 && line.trim_end() == "---" {
            in_front_matter = true;
            continue;
        }
        if in_front_matter {
            if line.trim_end() == "---" || line.trim_end() == "..." {
                in_front_matter = false;
            } else if let Some(caps) = FRONT_MATTER_TITLE_RE.captures(line) {
                let title = caps[1].trim();
                if !title.is_empty() {
                    structure.title = Some(title.to_string());
                }
            }
            continue;
        }

        if let Some(caps) = FENCE_RE.captures(line) {
            let marker = caps.get(1).map(|m| m.as_str()).unwrap_or("```");
            in_fence = match in_fence {
                Some(open) if open == marker => None,
                Some(open) => Some(open),
                None => Some(marker),
            };
            paragraph = None;
            continue;
        }
        if in_fence.is_some() {
            continue;
        }

        if let Some(caps) = ATX_RE.captures(line) {
            let level = caps[1].len();
            let text = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
            let indent = line.len() - line.trim_start().len();
            structure.signals.push(StructuralSignal::named_style(
                offset + indent,
                text,
                heading_style(level),
            ));
            paragraph = None;
            continue;
        }

        if let Some(caps) = SETEXT_RE.captures(line) {
            if let Some((start, text)) = paragraph.take() {
                let level = if caps[1].starts_with('=') { 1 } else { 2 };
                structure
                    .signals
                    .push(StructuralSignal::named_style(start, text.trim(), heading_style(level)));
                continue;
            }
        }

        paragraph = if line.trim().is_empty() {
            None
        } else {
            let indent = line.len() - line.trim_start().len();
            Some((offset + indent, line))
        };
    }

    structure
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styles(structure: &MarkdownStructure) -> Vec<(String, String)> {
        structure
            .signals
            .iter()
            .map(|s| (s.text.clone(), s.style_name.clone().unwrap_or_default()))
            .collect()
    }

    #[test]
    fn test_atx_headings() {
        let content = "# Title\n\nIntro.\n\n## Part A ##\ntext\n### Deep\n";
        let structure = extract_structure(content);
        assert_eq!(
            styles(&structure),
            vec![
                ("Title".to_string(), "Heading 1".to_string()),
                ("Part A".to_string(), "Heading 2".to_string()),
                ("Deep".to_string(), "Heading 3".to_string()),
            ]
        );
        let part = &structure.signals[1];
        assert!(content[part.position..].starts_with("## Part A"));
    }

    #[test]
    fn test_setext_headings() {
        let content = "Big Title\n=========\n\nbody\n\nSmaller\n-------\nmore\n";
        let structure = extract_structure(content);
        assert_eq!(
            styles(&structure),
            vec![
                ("Big Title".to_string(), "Heading 1".to_string()),
                ("Smaller".to_string(), "Heading 2".to_string()),
            ]
        );
        assert_eq!(structure.signals[0].position, 0);
    }

    #[test]
    fn test_thematic_break_is_not_heading() {
        let structure = extract_structure("para\n\n---\n\nnext\n");
        assert!(structure.signals.is_empty());
    }

    #[test]
    fn test_code_fences_ignored() {
        let content = "# Real\n```bash\n# not a heading\n```\n~~~\n# nor this\n~~~\n## Also real\n";
        let structure = extract_structure(content);
        let texts: Vec<&str> = structure.signals.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Real", "Also real"]);
    }

    #[test]
    fn test_front_matter() {
        let content = "---\ntitle: \"My Notes\"\ntags: [a]\n---\n# Start\nbody\n";
        let structure = extract_structure(content);
        assert_eq!(structure.title.as_deref(), Some("My Notes"));
        assert_eq!(structure.signals.len(), 1);
        assert_eq!(structure.signals[0].text, "Start");
    }

    #[test]
    fn test_hash_without_space_is_text() {
        let structure = extract_structure("#hashtag\n");
        assert!(structure.signals.is_empty());
    }
}
