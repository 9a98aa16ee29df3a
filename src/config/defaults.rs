use crate::typography::FontSizeSetting;
use std::collections::BTreeMap;

pub(crate) fn default_font_size() -> FontSizeSetting {
    FontSizeSetting::Medium
}

pub(crate) fn default_color_bands() -> usize {
    2
}

pub(crate) fn default_phone_max_short_side() -> f32 {
    600.0
}

pub(crate) fn default_landscape_min_width() -> f32 {
    1024.0
}

pub(crate) fn default_split_oversized_paragraphs() -> bool {
    false
}

pub(crate) fn default_oversized_paragraph_factor() -> usize {
    3
}

pub(crate) fn default_transition_lock_ms() -> u64 {
    400
}

pub(crate) fn default_quiz_pass_threshold() -> f64 {
    80.0
}

pub(crate) fn default_tier() -> String {
    "free".to_string()
}

pub(crate) fn default_tier_limits() -> BTreeMap<String, usize> {
    let mut limits = BTreeMap::new();
    limits.insert("free".to_string(), 2);
    limits.insert("standard".to_string(), 5);
    limits
}

pub(crate) fn default_unlimited_tiers() -> Vec<String> {
    vec!["premium".to_string()]
}

pub(crate) fn default_min_word_tap_chars() -> usize {
    3
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Info
}
