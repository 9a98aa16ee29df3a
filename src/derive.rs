//! Layout derivation: everything the reader shows, computed from its inputs.
//!
//! Nothing here mutates a previous layout. A change to any input produces a
//! fresh `DerivedLayout`, and the session resets navigation against it.

use crate::error::Result;
use crate::image_plan::{ImageInsertionPoint, resolve_insertion_points};
use crate::layout::LayoutMode;
use crate::normalizer::normalize_content;
use crate::pagination::{Page, PaginationOptions, split_pages};
use crate::spread::{Spread, compose_spreads, spread_index_for_page};
use crate::story::Story;
use crate::tier::{TierLimits, VisibleImages, filter_images};
use crate::typography::{FontSizeSetting, TypographyConfig, resolve};
use tracing::info;

/// Inputs that decide page and spread identity.
#[derive(Debug, Clone, Copy)]
pub struct LayoutInputs<'a> {
    pub story: &'a Story,
    pub age: i32,
    pub font_size: FontSizeSetting,
    pub account_tier: &'a str,
    pub tier_limits: &'a TierLimits,
    pub layout_mode: LayoutMode,
    pub split_oversized_paragraphs: bool,
    pub oversized_paragraph_factor: usize,
}

impl LayoutInputs<'_> {
    pub fn typography(&self) -> TypographyConfig {
        resolve(self.age, self.font_size)
    }

    pub fn pagination_options(&self) -> PaginationOptions {
        PaginationOptions {
            max_words_per_page: self.typography().max_words_per_page,
            chapter_title_page: self.story.kind().is_chapter(),
            split_oversized_paragraphs: self.split_oversized_paragraphs,
            oversized_paragraph_factor: self.oversized_paragraph_factor,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedLayout {
    pub layout_mode: LayoutMode,
    pub typography: TypographyConfig,
    pub paragraph_count: usize,
    pub images: VisibleImages,
    pub insertion_points: Vec<ImageInsertionPoint>,
    pub pages: Vec<Page>,
    /// Empty unless the layout mode uses spreads.
    pub spreads: Vec<Spread>,
}

impl DerivedLayout {
    pub fn uses_spreads(&self) -> bool {
        self.layout_mode.uses_spreads()
    }

    /// Number of navigable positions: spreads in landscape, pages otherwise.
    pub fn position_count(&self) -> usize {
        if self.uses_spreads() {
            self.spreads.len()
        } else {
            self.pages.len()
        }
    }

    /// Position showing `page_index`, clamped to the last position.
    pub fn position_for_page(&self, page_index: usize) -> usize {
        let last = self.position_count().saturating_sub(1);
        if self.uses_spreads() {
            spread_index_for_page(&self.spreads, page_index).unwrap_or(last)
        } else {
            page_index.min(last)
        }
    }

    /// First page shown at `position`.
    pub fn first_page_at(&self, position: usize) -> usize {
        if self.uses_spreads() {
            self.spreads
                .get(position)
                .map(|spread| spread.first_page_index)
                .unwrap_or_default()
        } else {
            position
        }
    }

    /// Pages visible at `position`, left to right.
    pub fn pages_at(&self, position: usize) -> Vec<&Page> {
        if self.uses_spreads() {
            self.spreads
                .get(position)
                .map(|spread| std::iter::once(&spread.left).chain(spread.right.as_ref()).collect())
                .unwrap_or_default()
        } else {
            self.pages.get(position).into_iter().collect()
        }
    }

    /// Story image URL for an image index on a page.
    pub fn image_url(&self, image_index: usize) -> Option<&str> {
        self.images.story.get(image_index).map(String::as_str)
    }
}

/// Run the whole pipeline: normalize, filter images, place them, paginate,
/// and compose spreads when the layout mode calls for them.
pub fn derive_layout(inputs: &LayoutInputs<'_>) -> Result<DerivedLayout> {
    let paragraphs = normalize_content(&inputs.story.content)?;
    let typography = inputs.typography();
    let options = inputs.pagination_options();

    let images = filter_images(
        &inputs.story.image_list(),
        inputs.story.has_cover(),
        inputs.account_tier,
        inputs.tier_limits,
    );
    let insertion_points = resolve_insertion_points(
        inputs.story.image_plan.as_ref(),
        paragraphs.len(),
        images.story.len(),
    );
    let pages = split_pages(&paragraphs, &insertion_points, &options);
    let spreads = if inputs.layout_mode.uses_spreads() {
        compose_spreads(&pages)
    } else {
        Vec::new()
    };

    info!(
        story_id = %inputs.story.id,
        layout_mode = %inputs.layout_mode,
        budget = typography.max_words_per_page,
        paragraphs = paragraphs.len(),
        images = images.story.len(),
        pages = pages.len(),
        spreads = spreads.len(),
        "Derived reader layout"
    );

    Ok(DerivedLayout {
        layout_mode: inputs.layout_mode,
        typography,
        paragraph_count: paragraphs.len(),
        images,
        insertion_points,
        pages,
        spreads,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReaderError;
    use crate::pagination::PageKind;
    use std::collections::BTreeMap;

    fn story(content: &str, images: usize) -> Story {
        Story {
            id: "story-1".to_string(),
            title: "The Fox".to_string(),
            content: content.to_string(),
            cover_image_url: None,
            story_images: (0..images).map(|i| format!("scene-{i}.png")).collect(),
            text_language: "en".to_string(),
            series_id: None,
            episode_number: None,
            series_episode_count: None,
            image_plan: None,
        }
    }

    fn inputs<'a>(story: &'a Story, limits: &'a TierLimits, mode: LayoutMode) -> LayoutInputs<'a> {
        LayoutInputs {
            story,
            age: 8,
            font_size: FontSizeSetting::Medium,
            account_tier: "premium",
            tier_limits: limits,
            layout_mode: mode,
            split_oversized_paragraphs: false,
            oversized_paragraph_factor: 3,
        }
    }

    fn paragraph(words: usize) -> String {
        vec!["word"; words].join(" ")
    }

    #[test]
    fn five_paragraphs_with_one_image() {
        let content = (0..5).map(|_| paragraph(40)).collect::<Vec<_>>().join("\\n");
        let story = story(&content, 1);
        let limits = TierLimits::new(BTreeMap::new(), "premium");
        let layout =
            derive_layout(&inputs(&story, &limits, LayoutMode::Phone)).expect("layout should derive");

        assert_eq!(layout.typography.max_words_per_page, 80);
        assert_eq!(
            layout.insertion_points,
            vec![ImageInsertionPoint {
                after_paragraph_index: 1,
                image_index: 0
            }]
        );
        let total: usize = layout.pages.iter().map(Page::word_count).sum();
        assert_eq!(total, 200);
        assert!(layout.pages[1].has_image);
        assert!(layout.spreads.is_empty());
        assert_eq!(layout.position_count(), layout.pages.len());
        assert_eq!(layout.image_url(0), Some("scene-0.png"));
    }

    #[test]
    fn landscape_composes_spreads() {
        let content = (0..5).map(|_| paragraph(40)).collect::<Vec<_>>().join("\n");
        let story = story(&content, 1);
        let limits = TierLimits::new(BTreeMap::new(), "premium");
        let layout = derive_layout(&inputs(&story, &limits, LayoutMode::Landscape))
            .expect("layout should derive");

        assert!(!layout.spreads.is_empty());
        assert_eq!(layout.position_count(), layout.spreads.len());
        let last_page = layout.pages.len() - 1;
        let position = layout.position_for_page(last_page);
        assert!(layout.pages_at(position).len() >= 1);
        assert!(layout.first_page_at(position) <= last_page);
    }

    #[test]
    fn chapter_story_opens_with_title_page() {
        let mut story = story("One. Two.", 0);
        story.series_id = Some("series".to_string());
        story.episode_number = Some(1);
        story.series_episode_count = Some(3);
        let limits = TierLimits::new(BTreeMap::new(), "premium");
        let layout =
            derive_layout(&inputs(&story, &limits, LayoutMode::Phone)).expect("layout should derive");
        assert_eq!(layout.pages[0].kind, PageKind::ChapterTitle);
        assert_eq!(layout.pages.len(), 2);
    }

    #[test]
    fn tier_limits_the_placed_images() {
        let content = (0..8).map(|_| paragraph(10)).collect::<Vec<_>>().join("\n");
        let mut story = story(&content, 4);
        story.cover_image_url = Some("cover.png".to_string());
        let mut table = BTreeMap::new();
        table.insert("free".to_string(), 2);
        let limits = TierLimits::new(table, "free");
        let mut free = inputs(&story, &limits, LayoutMode::Phone);
        free.account_tier = "free";
        let layout = derive_layout(&free).expect("layout should derive");

        assert_eq!(layout.images.cover.as_deref(), Some("cover.png"));
        assert_eq!(layout.images.story, vec!["scene-0.png".to_string()]);
        assert_eq!(layout.insertion_points.len(), 1);
    }

    #[test]
    fn empty_content_is_no_content() {
        let story = story("  \\n  ", 2);
        let limits = TierLimits::new(BTreeMap::new(), "premium");
        let err = derive_layout(&inputs(&story, &limits, LayoutMode::Phone))
            .expect_err("blank story should fail");
        assert!(matches!(err, ReaderError::NoContent));
    }
}
