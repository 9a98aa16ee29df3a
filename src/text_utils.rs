//! Small text helpers shared by pagination and the session.

use unicode_normalization::UnicodeNormalization;

/// Count whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Very lightweight sentence splitter based on punctuation.
///
/// A sentence ends at `.`, `!` or `?` (plus any closing quotes or brackets
/// glued to it) followed by whitespace. Splits only ever happen on whitespace,
/// so joining the result with single spaces yields the original words.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        current.push(ch);
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        while let Some(&next) = chars.peek() {
            if next.is_whitespace() || next.is_alphanumeric() {
                break;
            }
            current.push(next);
            chars.next();
        }
        let at_boundary = chars.peek().is_none_or(|next| next.is_whitespace());
        if at_boundary {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
        }
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }

    sentences
}

/// Prepare a tapped word for lookup: strip surrounding punctuation, NFC
/// normalize and lowercase. Returns `None` when fewer than `min_chars`
/// characters remain.
pub fn clean_tapped_word(raw: &str, min_chars: usize) -> Option<String> {
    let stripped = raw.trim_matches(|c: char| !c.is_alphanumeric());
    let cleaned: String = stripped.nfc().collect::<String>().to_lowercase();
    if cleaned.chars().count() < min_chars {
        return None;
    }
    Some(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentences_keep_punctuation_and_words() {
        let text = "The cat sat. Did it purr? Yes! And then";
        let sentences = split_sentences(text);
        assert_eq!(
            sentences,
            vec!["The cat sat.", "Did it purr?", "Yes!", "And then"]
        );
        assert_eq!(sentences.join(" "), text);
    }

    #[test]
    fn closing_quotes_stay_with_their_sentence_and_decimals_do_not_split() {
        let text = "\"Run!\" she said. \"Now.\" It was 3.5 miles.";
        let sentences = split_sentences(text);
        assert_eq!(
            sentences,
            vec!["\"Run!\"", "she said.", "\"Now.\"", "It was 3.5 miles."]
        );
        assert_eq!(sentences.join(" "), text);
    }

    #[test]
    fn tapped_words_are_cleaned() {
        assert_eq!(clean_tapped_word("\"Dragon!\"", 3), Some("dragon".to_string()));
        assert_eq!(clean_tapped_word("(Über,", 3), Some("über".to_string()));
        assert_eq!(clean_tapped_word("it.", 3), None);
        assert_eq!(clean_tapped_word("...", 3), None);
    }
}
