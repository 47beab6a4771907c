//! File reading and format dispatch.

use std::path::Path;

use folio_core::{Error, Result};
use folio_structure::{Extraction, SourceFormat};
use tracing::debug;

use crate::markdown;
use crate::normalize::{normalize_content, normalize_with_positions};
use crate::plaintext;

/// Build an extraction from raw text of a text-native format.
///
/// Unknown formats are treated as plain text.
pub fn extract_str(format: SourceFormat, raw: &str) -> Extraction {
    let content = normalize_content(raw);
    match format {
        SourceFormat::Markdown => {
            let structure = markdown::extract_structure(&content);
            Extraction {
                title: structure.title,
                format,
                signals: structure.signals,
                content,
            }
        }
        _ => {
            let signals = plaintext::extract_signals(&content);
            Extraction {
                title: None,
                format,
                signals,
                content,
            }
        }
    }
}

/// Read a file and produce its extraction.
///
/// `.json` files are extraction dumps written by an external extractor.
/// Binary formats without a dump are rejected.
pub fn extract_path(path: &Path) -> Result<Extraction> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string);

    if ext.eq_ignore_ascii_case("json") {
        return load_dump(path);
    }

    let format = SourceFormat::from_extension(ext);
    let raw = match format {
        SourceFormat::Markdown | SourceFormat::PlainText => std::fs::read_to_string(path)?,
        SourceFormat::Epub | SourceFormat::Pdf | SourceFormat::Docx => {
            return Err(Error::Input(format!(
                "{}: {} files need an external extractor; pass its JSON extraction dump instead",
                path.display(),
                format
            )));
        }
        SourceFormat::Unknown => read_unknown(path)?,
    };

    let mut extraction = extract_str(format, &raw);
    if extraction.title.is_none() {
        extraction.title = stem;
    }
    debug!(
        "Extracted {} signals from {} ({})",
        extraction.signals.len(),
        path.display(),
        extraction.format
    );
    Ok(extraction)
}

fn load_dump(path: &Path) -> Result<Extraction> {
    let raw = std::fs::read_to_string(path)?;
    let mut extraction: Extraction = serde_json::from_str(&raw)?;
    let mut positions: Vec<usize> = extraction.signals.iter().map(|s| s.position).collect();
    extraction.content = normalize_with_positions(&extraction.content, &mut positions);
    for (signal, position) in extraction.signals.iter_mut().zip(positions) {
        signal.position = position;
    }
    Ok(extraction)
}

/// Read an unknown file as text, rejecting anything that looks binary.
fn read_unknown(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)
        .map_err(|_| Error::Input(format!("{}: not a UTF-8 text file", path.display())))?;
    let control = content
        .chars()
        .filter(|c| c.is_control() && *c != '\n' && *c != '\r' && *c != '\t')
        .count();
    if control > content.len() / 10 {
        return Err(Error::Input(format!(
            "{}: looks like a binary file",
            path.display()
        )));
    }
    Ok(content)
}
