//! Pagination: group normalized paragraphs into discrete pages.
//!
//! Paragraphs are never reordered, duplicated or dropped. A page fills up to
//! the typography word budget; an image insertion point forces a break and
//! the new page carries that image. A paragraph that alone exceeds the budget
//! gets a page of its own rather than being truncated.
//!
//! Output only depends on the inputs, so re-running pagination for the same
//! story never reshuffles pages under the reader.

use crate::image_plan::ImageInsertionPoint;
use crate::normalizer::Paragraph;
use crate::text_utils::{split_sentences, word_count};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

/// Smallest budget pagination will honor.
pub const MIN_WORDS_PER_PAGE: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum PageKind {
    #[default]
    Content,
    ChapterTitle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Page {
    pub kind: PageKind,
    pub paragraphs: Vec<String>,
    pub has_image: bool,
    /// Index into the visible story images.
    pub image_index: Option<usize>,
}

impl Page {
    pub fn chapter_title() -> Self {
        Self {
            kind: PageKind::ChapterTitle,
            paragraphs: Vec::new(),
            has_image: false,
            image_index: None,
        }
    }

    fn content(paragraphs: Vec<String>, image_index: Option<usize>) -> Self {
        Self {
            kind: PageKind::Content,
            paragraphs,
            has_image: image_index.is_some(),
            image_index,
        }
    }

    pub fn is_chapter_title(&self) -> bool {
        self.kind == PageKind::ChapterTitle
    }

    pub fn word_count(&self) -> usize {
        self.paragraphs.iter().map(|p| word_count(p)).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaginationOptions {
    pub max_words_per_page: usize,
    /// Prepend a title page (chapter stories).
    pub chapter_title_page: bool,
    /// Sub-split catastrophically large paragraphs at sentence boundaries.
    pub split_oversized_paragraphs: bool,
    /// A paragraph is catastrophically large above `budget * factor` words.
    pub oversized_paragraph_factor: usize,
}

impl PaginationOptions {
    pub fn with_budget(max_words_per_page: usize) -> Self {
        Self {
            max_words_per_page,
            chapter_title_page: false,
            split_oversized_paragraphs: false,
            oversized_paragraph_factor: 3,
        }
    }
}

#[derive(Default)]
struct PageBuilder {
    paragraphs: Vec<String>,
    words: usize,
    image_index: Option<usize>,
}

impl PageBuilder {
    fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    fn push(&mut self, text: String, words: usize) {
        self.paragraphs.push(text);
        self.words += words;
    }

    fn flush_into(&mut self, pages: &mut Vec<Page>) {
        if self.is_empty() {
            return;
        }
        let finished = std::mem::take(self);
        pages.push(Page::content(finished.paragraphs, finished.image_index));
    }
}

/// Split paragraphs into pages.
pub fn split_pages(
    paragraphs: &[Paragraph],
    insertion_points: &[ImageInsertionPoint],
    options: &PaginationOptions,
) -> Vec<Page> {
    let budget = options.max_words_per_page.max(MIN_WORDS_PER_PAGE);
    // Keyed by the paragraph that opens the image page.
    let image_starts: HashMap<usize, usize> = insertion_points
        .iter()
        .map(|point| (point.after_paragraph_index + 1, point.image_index))
        .collect();

    let mut pages = Vec::new();
    if options.chapter_title_page {
        pages.push(Page::chapter_title());
    }

    let mut current = PageBuilder::default();
    for (position, paragraph) in paragraphs.iter().enumerate() {
        if let Some(&image_index) = image_starts.get(&position) {
            current.flush_into(&mut pages);
            current.image_index = Some(image_index);
        }

        for piece in paragraph_pieces(&paragraph.text, budget, options) {
            let words = word_count(&piece);
            if !current.is_empty() && current.words + words > budget {
                current.flush_into(&mut pages);
            }
            current.push(piece, words);
            if words > budget {
                current.flush_into(&mut pages);
            }
        }
    }
    current.flush_into(&mut pages);

    tracing::debug!(
        paragraphs = paragraphs.len(),
        pages = pages.len(),
        budget,
        images = insertion_points.len(),
        "Paginated story"
    );
    pages
}

fn paragraph_pieces(text: &str, budget: usize, options: &PaginationOptions) -> Vec<String> {
    let threshold = budget.saturating_mul(options.oversized_paragraph_factor.max(1));
    if !options.split_oversized_paragraphs || word_count(text) <= threshold {
        return vec![text.to_string()];
    }

    let mut pieces = Vec::new();
    let mut chunk: Vec<String> = Vec::new();
    let mut chunk_words = 0usize;
    for sentence in split_sentences(text) {
        let words = word_count(&sentence);
        if !chunk.is_empty() && chunk_words + words > budget {
            pieces.push(chunk.join(" "));
            chunk.clear();
            chunk_words = 0;
        }
        chunk.push(sentence);
        chunk_words += words;
    }
    if !chunk.is_empty() {
        pieces.push(chunk.join(" "));
    }
    pieces
}
