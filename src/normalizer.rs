//! Story content normalization.
//!
//! Stored story text frequently arrives with escaped newline sequences
//! (`\n` written out as two characters) mixed with real line breaks. Both are
//! treated as paragraph boundaries. Each paragraph is trimmed and has its
//! horizontal whitespace collapsed; empty lines are discarded.

use crate::error::{ReaderError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

static RE_ESCAPED_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\r\\n|\\n|\\r").unwrap());
static RE_LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").unwrap());
static RE_HORIZONTAL_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\u{00A0}]+").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Paragraph {
    pub index: usize,
    pub text: String,
}

impl Paragraph {
    pub fn word_count(&self) -> usize {
        crate::text_utils::word_count(&self.text)
    }
}

/// Split raw story content into trimmed, non-empty paragraphs.
///
/// Returns [`ReaderError::NoContent`] when nothing readable remains.
pub fn normalize_content(raw: &str) -> Result<Vec<Paragraph>> {
    let unescaped = RE_ESCAPED_NEWLINE.replace_all(raw, "\n");
    let paragraphs: Vec<Paragraph> = RE_LINE_BREAK
        .split(&unescaped)
        .map(|line| RE_HORIZONTAL_WS.replace_all(line.trim(), " ").into_owned())
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, text)| Paragraph { index, text })
        .collect();

    if paragraphs.is_empty() {
        return Err(ReaderError::NoContent);
    }
    tracing::debug!(paragraphs = paragraphs.len(), "Normalized story content");
    Ok(paragraphs)
}
