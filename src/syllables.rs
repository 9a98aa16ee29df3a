//! Syllable coloring.
//!
//! Words are drawn with alternating color bands per syllable to help early
//! readers decode them. The running offset restarts at zero on every page and
//! grows by each word's syllable count, so the bands only depend on where a
//! word sits on its page, never on what came before the page.

use crate::pagination::Page;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use ts_rs::TS;

static RE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+|\s+").unwrap());

/// Vowel sets used to find syllable nuclei.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyllableLanguage {
    English,
    German,
    French,
    Spanish,
    Italian,
    Dutch,
    Portuguese,
    Other,
}

impl SyllableLanguage {
    /// Map an ISO-639-1 code (`"de"`, `"en-GB"`, ...) to a vowel set.
    pub fn from_code(code: &str) -> Self {
        let primary = code
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Self::English,
            "de" => Self::German,
            "fr" => Self::French,
            "es" => Self::Spanish,
            "it" => Self::Italian,
            "nl" => Self::Dutch,
            "pt" => Self::Portuguese,
            _ => Self::Other,
        }
    }

    fn vowels(self) -> &'static str {
        match self {
            Self::English => "aeiouy",
            Self::German => "aeiouyäöü",
            Self::French => "aeiouyàâæéèêëîïôœùûüÿ",
            Self::Spanish => "aeiouáéíóúü",
            Self::Italian => "aeiouàèéìíòóùú",
            Self::Dutch => "aeiouyë",
            Self::Portuguese => "aeiouáâãàéêíóôõú",
            Self::Other => "aeiouyàáâãäåæèéêëìíîïòóôõöøœùúûüýÿ",
        }
    }

    fn is_vowel(self, ch: char) -> bool {
        ch.to_lowercase().all(|lower| self.vowels().contains(lower))
    }
}

/// Split a word into syllable chunks at vowel-group boundaries.
///
/// The chunks concatenate back to `word`. Words without letters yield no
/// syllables; words with letters but no vowels count as one.
pub fn split_syllables(word: &str, language: SyllableLanguage) -> Vec<String> {
    if !word.chars().any(char::is_alphabetic) {
        return Vec::new();
    }
    let chars: Vec<char> = word.chars().collect();

    // Start and end (exclusive) of each vowel group.
    let mut nuclei: Vec<(usize, usize)> = Vec::new();
    let mut index = 0;
    while index < chars.len() {
        if chars[index].is_alphabetic() && language.is_vowel(chars[index]) {
            let start = index;
            while index < chars.len() && chars[index].is_alphabetic() && language.is_vowel(chars[index])
            {
                index += 1;
            }
            nuclei.push((start, index));
        } else {
            index += 1;
        }
    }

    if language == SyllableLanguage::English && nuclei.len() > 1 {
        if let Some(&(start, end)) = nuclei.last() {
            let is_silent_e = end - start == 1
                && chars[start].eq_ignore_ascii_case(&'e')
                && !chars[end..].iter().any(|ch| ch.is_alphabetic())
                && !chars[..start]
                    .last()
                    .is_some_and(|ch| ch.eq_ignore_ascii_case(&'l'));
            if is_silent_e {
                nuclei.pop();
            }
        }
    }

    if nuclei.len() <= 1 {
        return vec![word.to_string()];
    }

    // Consonants between nuclei: the last one opens the next syllable.
    let mut boundaries = Vec::with_capacity(nuclei.len() - 1);
    for pair in nuclei.windows(2) {
        let (_, prev_end) = pair[0];
        let (next_start, _) = pair[1];
        let gap = next_start - prev_end;
        boundaries.push(if gap == 0 { next_start } else { next_start - 1 });
    }

    let mut syllables = Vec::with_capacity(nuclei.len());
    let mut from = 0;
    for boundary in boundaries {
        syllables.push(chars[from..boundary].iter().collect());
        from = boundary;
    }
    syllables.push(chars[from..].iter().collect());
    syllables
}

pub fn count_syllables(word: &str, language: SyllableLanguage) -> usize {
    split_syllables(word, language).len()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "type", rename_all = "kebab-case")]
#[ts(export)]
pub enum ColoredToken {
    Space {
        text: String,
    },
    Word {
        text: String,
        syllables: Vec<String>,
        /// Band of each syllable, same length as `syllables`.
        bands: Vec<usize>,
        /// Running page offset at the first syllable of this word.
        offset: usize,
    },
}

/// Assigns color bands to every syllable on a page.
#[derive(Debug, Clone, Copy)]
pub struct SyllableColorAssigner {
    language: SyllableLanguage,
    band_count: usize,
}

impl SyllableColorAssigner {
    pub fn new(language: SyllableLanguage, band_count: usize) -> Self {
        Self {
            language,
            band_count: band_count.max(1),
        }
    }

    /// Color one page. The returned outer vector has one entry per paragraph.
    pub fn color_page(&self, page: &Page) -> Vec<Vec<ColoredToken>> {
        self.color_paragraphs(&page.paragraphs)
    }

    /// Color consecutive paragraphs of one page, offset starting at zero.
    pub fn color_paragraphs(&self, paragraphs: &[String]) -> Vec<Vec<ColoredToken>> {
        let mut offset = 0usize;
        paragraphs
            .iter()
            .map(|paragraph| {
                RE_TOKEN
                    .find_iter(paragraph)
                    .map(|token| {
                        let text = token.as_str();
                        if text.trim().is_empty() {
                            return ColoredToken::Space {
                                text: text.to_string(),
                            };
                        }
                        let syllables = split_syllables(text, self.language);
                        let word_offset = offset;
                        offset += syllables.len();
                        ColoredToken::Word {
                            text: text.to_string(),
                            bands: (0..syllables.len())
                                .map(|step| (word_offset + step) % self.band_count)
                                .collect(),
                            syllables,
                            offset: word_offset,
                        }
                    })
                    .collect()
            })
            .collect()
    }
}
