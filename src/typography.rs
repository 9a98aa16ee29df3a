//! Typography profiles derived from the reader's age and font-size choice.
//!
//! Younger readers get bigger glyphs, looser lines and fewer words per page.
//! The resolver is total: any age maps onto one of the defined brackets.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Lowest per-page budget any combination may produce.
pub const MIN_WORDS_PER_PAGE: usize = 10;

/// Font-size preference chosen by the reader.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum FontSizeSetting {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSizeSetting {
    fn font_offset_px(self) -> f32 {
        match self {
            FontSizeSetting::Small => -2.0,
            FontSizeSetting::Medium => 0.0,
            FontSizeSetting::Large => 4.0,
        }
    }

    fn word_scale(self) -> f32 {
        match self {
            FontSizeSetting::Small => 1.25,
            FontSizeSetting::Medium => 1.0,
            FontSizeSetting::Large => 0.75,
        }
    }
}

impl std::fmt::Display for FontSizeSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FontSizeSetting::Small => "small",
            FontSizeSetting::Medium => "medium",
            FontSizeSetting::Large => "large",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, TS)]
#[ts(export)]
pub struct TypographyConfig {
    /// Font size in CSS pixels.
    pub font_size: f32,
    pub line_height: f32,
    /// Letter spacing in `em`.
    pub letter_spacing: f32,
    pub max_words_per_page: usize,
}

struct AgeBracket {
    max_age: i32,
    font_size: f32,
    line_height: f32,
    letter_spacing: f32,
    words: usize,
}

// Ordered youngest first; the last bracket catches every older reader.
const AGE_BRACKETS: [AgeBracket; 4] = [
    AgeBracket {
        max_age: 5,
        font_size: 26.0,
        line_height: 1.9,
        letter_spacing: 0.06,
        words: 35,
    },
    AgeBracket {
        max_age: 7,
        font_size: 24.0,
        line_height: 1.8,
        letter_spacing: 0.04,
        words: 55,
    },
    AgeBracket {
        max_age: 9,
        font_size: 21.0,
        line_height: 1.7,
        letter_spacing: 0.02,
        words: 80,
    },
    AgeBracket {
        max_age: i32::MAX,
        font_size: 19.0,
        line_height: 1.6,
        letter_spacing: 0.01,
        words: 110,
    },
];

fn bracket_for(age: i32) -> &'static AgeBracket {
    AGE_BRACKETS
        .iter()
        .find(|bracket| age <= bracket.max_age)
        .unwrap_or(&AGE_BRACKETS[AGE_BRACKETS.len() - 1])
}

/// Resolve the typography profile for a reader.
pub fn resolve(age: i32, setting: FontSizeSetting) -> TypographyConfig {
    let bracket = bracket_for(age);
    let words = (bracket.words as f32 * setting.word_scale()).round() as usize;
    TypographyConfig {
        font_size: bracket.font_size + setting.font_offset_px(),
        line_height: bracket.line_height,
        letter_spacing: bracket.letter_spacing,
        max_words_per_page: words.max(MIN_WORDS_PER_PAGE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTINGS: [FontSizeSetting; 3] = [
        FontSizeSetting::Small,
        FontSizeSetting::Medium,
        FontSizeSetting::Large,
    ];

    #[test]
    fn younger_readers_never_get_more_words() {
        for setting in SETTINGS {
            let mut previous = 0;
            for age in 0..=16 {
                let words = resolve(age, setting).max_words_per_page;
                assert!(words >= previous, "age {age} with {setting} shrank budget");
                previous = words;
            }
        }
    }

    #[test]
    fn larger_font_fits_fewer_words() {
        for age in [4, 6, 8, 11] {
            let small = resolve(age, FontSizeSetting::Small);
            let medium = resolve(age, FontSizeSetting::Medium);
            let large = resolve(age, FontSizeSetting::Large);
            assert!(small.max_words_per_page > medium.max_words_per_page);
            assert!(medium.max_words_per_page > large.max_words_per_page);
            assert!(small.font_size < large.font_size);
        }
    }

    #[test]
    fn out_of_range_ages_clamp_to_nearest_bracket() {
        assert_eq!(
            resolve(-3, FontSizeSetting::Medium),
            resolve(3, FontSizeSetting::Medium)
        );
        assert_eq!(
            resolve(99, FontSizeSetting::Large),
            resolve(12, FontSizeSetting::Large)
        );
    }

    #[test]
    fn medium_eight_year_old_profile() {
        let config = resolve(8, FontSizeSetting::Medium);
        assert_eq!(config.max_words_per_page, 80);
        assert_eq!(config.font_size, 21.0);
    }
}
