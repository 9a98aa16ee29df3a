//! Landscape double-page spreads.
//!
//! Consecutive pages pair up into spreads. A chapter title page, the final
//! odd page, or a page that cannot share a spread stands alone as a `Single`
//! spread, and pairing resumes from the next page.
//!
//! When one member of a pair is illustrated, its image takes a whole half and
//! the text of both members flows together in the other half. The image side
//! alternates with the number of illustrated pages placed so far.

use crate::pagination::Page;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum SpreadVariant {
    ImageText,
    TextText,
    Single,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Spread {
    pub left: Page,
    pub right: Option<Page>,
    pub variant: SpreadVariant,
    /// Which half shows the illustration (`ImageText` only).
    pub image_side: Option<Side>,
    /// Index of `left` in the flat page list.
    pub first_page_index: usize,
}

/// What one half of a spread renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "kebab-case")]
#[ts(export)]
pub enum SpreadHalf {
    Image { image_index: usize },
    Text { paragraphs: Vec<String> },
    /// A standalone page rendered as-is, image included.
    FullPage { page: Page },
    Empty,
}

impl Spread {
    fn single(page: &Page, first_page_index: usize) -> Self {
        Self {
            left: page.clone(),
            right: None,
            variant: SpreadVariant::Single,
            image_side: None,
            first_page_index,
        }
    }

    pub fn page_count(&self) -> usize {
        1 + usize::from(self.right.is_some())
    }

    pub fn contains_page(&self, page_index: usize) -> bool {
        page_index >= self.first_page_index && page_index < self.first_page_index + self.page_count()
    }

    /// Render content for the (left, right) halves.
    pub fn halves(&self) -> (SpreadHalf, SpreadHalf) {
        let right = match (&self.variant, &self.right) {
            (SpreadVariant::Single, _) | (_, None) => {
                return (
                    SpreadHalf::FullPage {
                        page: self.left.clone(),
                    },
                    SpreadHalf::Empty,
                );
            }
            (_, Some(right)) => right,
        };

        match self.variant {
            SpreadVariant::TextText => (
                SpreadHalf::Text {
                    paragraphs: self.left.paragraphs.clone(),
                },
                SpreadHalf::Text {
                    paragraphs: right.paragraphs.clone(),
                },
            ),
            _ => {
                let image_index = self
                    .left
                    .image_index
                    .or(right.image_index)
                    .unwrap_or_default();
                let image = SpreadHalf::Image { image_index };
                let text = SpreadHalf::Text {
                    paragraphs: self
                        .left
                        .paragraphs
                        .iter()
                        .chain(right.paragraphs.iter())
                        .cloned()
                        .collect(),
                };
                match self.image_side {
                    Some(Side::Left) => (image, text),
                    _ => (text, image),
                }
            }
        }
    }
}

fn can_pair(left: &Page, right: &Page) -> bool {
    !left.is_chapter_title() && !right.is_chapter_title() && !(left.has_image && right.has_image)
}

/// Compose landscape spreads from the flat page list.
pub fn compose_spreads(pages: &[Page]) -> Vec<Spread> {
    let mut spreads = Vec::with_capacity(pages.len().div_ceil(2));
    let mut images_placed = 0usize;
    let mut index = 0;

    while index < pages.len() {
        let left = &pages[index];
        let right = match pages.get(index + 1) {
            Some(right) if can_pair(left, right) => right,
            _ => {
                if left.has_image {
                    images_placed += 1;
                }
                spreads.push(Spread::single(left, index));
                index += 1;
                continue;
            }
        };

        let spread = if left.has_image || right.has_image {
            let side = if images_placed % 2 == 0 {
                Side::Right
            } else {
                Side::Left
            };
            images_placed += 1;
            Spread {
                left: left.clone(),
                right: Some(right.clone()),
                variant: SpreadVariant::ImageText,
                image_side: Some(side),
                first_page_index: index,
            }
        } else {
            Spread {
                left: left.clone(),
                right: Some(right.clone()),
                variant: SpreadVariant::TextText,
                image_side: None,
                first_page_index: index,
            }
        };
        spreads.push(spread);
        index += 2;
    }

    tracing::debug!(pages = pages.len(), spreads = spreads.len(), "Composed spreads");
    spreads
}

/// Index of the spread showing `page_index`, if any.
pub fn spread_index_for_page(spreads: &[Spread], page_index: usize) -> Option<usize> {
    spreads
        .iter()
        .position(|spread| spread.contains_page(page_index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PageKind;
    use proptest::prelude::*;

    fn text_page(label: &str) -> Page {
        Page {
            kind: PageKind::Content,
            paragraphs: vec![format!("{label} text")],
            has_image: false,
            image_index: None,
        }
    }

    fn image_page(label: &str, image_index: usize) -> Page {
        Page {
            has_image: true,
            image_index: Some(image_index),
            ..text_page(label)
        }
    }

    #[test]
    fn three_pages_with_image_in_middle() {
        let pages = vec![text_page("p0"), image_page("p1", 0), text_page("p2")];
        let spreads = compose_spreads(&pages);

        assert_eq!(spreads.len(), 2);
        assert_eq!(spreads[0].left, pages[0]);
        assert_eq!(spreads[0].right.as_ref(), Some(&pages[1]));
        assert_eq!(spreads[0].variant, SpreadVariant::ImageText);
        assert_eq!(spreads[0].image_side, Some(Side::Right));
        assert_eq!(
            spreads[0].halves(),
            (
                SpreadHalf::Text {
                    paragraphs: vec!["p0 text".to_string(), "p1 text".to_string()]
                },
                SpreadHalf::Image { image_index: 0 },
            )
        );

        assert_eq!(spreads[1].left, pages[2]);
        assert_eq!(spreads[1].right, None);
        assert_eq!(spreads[1].variant, SpreadVariant::Single);
    }

    #[test]
    fn text_pages_keep_their_own_halves() {
        let pages = vec![text_page("a"), text_page("b")];
        let spreads = compose_spreads(&pages);
        assert_eq!(spreads[0].variant, SpreadVariant::TextText);
        assert_eq!(
            spreads[0].halves(),
            (
                SpreadHalf::Text {
                    paragraphs: vec!["a text".to_string()]
                },
                SpreadHalf::Text {
                    paragraphs: vec!["b text".to_string()]
                },
            )
        );
    }

    #[test]
    fn image_side_alternates() {
        let pages = vec![
            image_page("a", 0),
            text_page("b"),
            text_page("c"),
            image_page("d", 1),
            image_page("e", 2),
            text_page("f"),
        ];
        let spreads = compose_spreads(&pages);
        let sides: Vec<Option<Side>> = spreads.iter().map(|s| s.image_side).collect();
        assert_eq!(
            sides,
            vec![Some(Side::Right), Some(Side::Left), Some(Side::Right)]
        );
        assert_eq!(spreads[1].halves().0, SpreadHalf::Image { image_index: 1 });
    }

    #[test]
    fn chapter_title_stands_alone_and_resyncs_pairing() {
        let pages = vec![
            Page::chapter_title(),
            text_page("a"),
            text_page("b"),
            text_page("c"),
        ];
        let spreads = compose_spreads(&pages);
        let shape: Vec<(usize, SpreadVariant)> = spreads
            .iter()
            .map(|s| (s.first_page_index, s.variant))
            .collect();
        assert_eq!(
            shape,
            vec![
                (0, SpreadVariant::Single),
                (1, SpreadVariant::TextText),
                (3, SpreadVariant::Single),
            ]
        );
        assert_eq!(spread_index_for_page(&spreads, 2), Some(1));
        assert_eq!(spread_index_for_page(&spreads, 9), None);
    }

    #[test]
    fn adjacent_images_never_share_a_spread() {
        let pages = vec![image_page("a", 0), image_page("b", 1)];
        let spreads = compose_spreads(&pages);
        assert_eq!(spreads.len(), 2);
        assert!(spreads.iter().all(|s| s.variant == SpreadVariant::Single));
    }

    fn arbitrary_page() -> impl Strategy<Value = Page> {
        (0u8..10, 0usize..4).prop_map(|(roll, image)| match roll {
            0 => Page::chapter_title(),
            1..=3 => image_page("img", image),
            _ => text_page("txt"),
        })
    }

    proptest! {
        #[test]
        fn prop_spreads_cover_pages_and_never_double_up_images(
            pages in prop::collection::vec(arbitrary_page(), 0..25)
        ) {
            let spreads = compose_spreads(&pages);

            let mut next_page = 0;
            for spread in &spreads {
                prop_assert_eq!(spread.first_page_index, next_page);
                next_page += spread.page_count();

                let (left, right) = spread.halves();
                let image_halves = [&left, &right]
                    .iter()
                    .filter(|half| matches!(half, SpreadHalf::Image { .. }))
                    .count();
                prop_assert!(image_halves <= 1);

                if spread.variant == SpreadVariant::ImageText {
                    let member_images = usize::from(spread.left.has_image)
                        + usize::from(spread.right.as_ref().is_some_and(|p| p.has_image));
                    prop_assert_eq!(member_images, 1);
                    prop_assert_eq!(image_halves, 1);
                    let text_half = if matches!(left, SpreadHalf::Image { .. }) { right } else { left };
                    let text_half_is_text = matches!(text_half, SpreadHalf::Text { .. });
                    prop_assert!(text_half_is_text);
                }
            }
            prop_assert_eq!(next_page, pages.len());
        }
    }
}
