//! Document model assembly.

use sha2::{Digest, Sha256};

use crate::text::word_count;
use crate::types::{Chapter, ClassificationWarning, Document, SourceFormat};

/// Reading-time estimate in whole minutes, never below one.
pub fn estimated_reading_time(words: usize, words_per_minute: usize) -> usize {
    (words / words_per_minute.max(1)).max(1)
}

/// Compute SHA-256 content hash.
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Everything the final container is built from.
pub struct DocumentParts {
    pub title: Option<String>,
    pub format: SourceFormat,
    pub content: String,
    pub chapters: Vec<Chapter>,
    pub warnings: Vec<ClassificationWarning>,
}

impl DocumentParts {
    /// Seal the parts into a `Document`.
    ///
    /// The word count is taken over the full content, independent of how
    /// chapters were merged or split.
    pub fn into_document(self, words_per_minute: usize) -> Document {
        let words = word_count(&self.content);
        Document {
            title: self.title,
            format: self.format,
            content_hash: content_hash(&self.content),
            content: self.content,
            chapters: self.chapters,
            word_count: words,
            estimated_reading_time: estimated_reading_time(words, words_per_minute),
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_time() {
        assert_eq!(estimated_reading_time(0, 200), 1);
        assert_eq!(estimated_reading_time(199, 200), 1);
        assert_eq!(estimated_reading_time(450, 200), 2);
        assert_eq!(estimated_reading_time(1000, 250), 4);
    }

    #[test]
    fn test_content_hash() {
        let hash = content_hash("hello");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_word_count_ignores_chapters() {
        let parts = DocumentParts {
            title: None,
            format: SourceFormat::PlainText,
            content: "one two three".to_string(),
            chapters: Vec::new(),
            warnings: Vec::new(),
        };
        let doc = parts.into_document(200);
        assert_eq!(doc.word_count, 3);
        assert_eq!(doc.estimated_reading_time, 1);
    }
}
