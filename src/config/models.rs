use crate::layout::LayoutThresholds;
use crate::tier::TierLimits;
use crate::typography::FontSizeSetting;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Flattened reader configuration; built from the nested TOML tables.
#[derive(Debug, Clone, Deserialize, serde::Serialize, PartialEq)]
pub struct ReaderConfig {
    #[serde(default = "crate::config::defaults::default_font_size")]
    pub font_size: FontSizeSetting,
    #[serde(default = "crate::config::defaults::default_color_bands")]
    pub color_bands: usize,
    #[serde(default = "crate::config::defaults::default_phone_max_short_side")]
    pub phone_max_short_side: f32,
    #[serde(default = "crate::config::defaults::default_landscape_min_width")]
    pub landscape_min_width: f32,
    #[serde(default = "crate::config::defaults::default_split_oversized_paragraphs")]
    pub split_oversized_paragraphs: bool,
    #[serde(default = "crate::config::defaults::default_oversized_paragraph_factor")]
    pub oversized_paragraph_factor: usize,
    #[serde(default = "crate::config::defaults::default_transition_lock_ms")]
    pub transition_lock_ms: u64,
    #[serde(default = "crate::config::defaults::default_quiz_pass_threshold")]
    pub quiz_pass_threshold: f64,
    #[serde(default = "crate::config::defaults::default_tier")]
    pub default_tier: String,
    #[serde(default = "crate::config::defaults::default_tier_limits")]
    pub tier_limits: BTreeMap<String, usize>,
    #[serde(default = "crate::config::defaults::default_unlimited_tiers")]
    pub unlimited_tiers: Vec<String>,
    #[serde(default = "crate::config::defaults::default_min_word_tap_chars")]
    pub min_word_tap_chars: usize,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            font_size: crate::config::defaults::default_font_size(),
            color_bands: crate::config::defaults::default_color_bands(),
            phone_max_short_side: crate::config::defaults::default_phone_max_short_side(),
            landscape_min_width: crate::config::defaults::default_landscape_min_width(),
            split_oversized_paragraphs:
                crate::config::defaults::default_split_oversized_paragraphs(),
            oversized_paragraph_factor:
                crate::config::defaults::default_oversized_paragraph_factor(),
            transition_lock_ms: crate::config::defaults::default_transition_lock_ms(),
            quiz_pass_threshold: crate::config::defaults::default_quiz_pass_threshold(),
            default_tier: crate::config::defaults::default_tier(),
            tier_limits: crate::config::defaults::default_tier_limits(),
            unlimited_tiers: crate::config::defaults::default_unlimited_tiers(),
            min_word_tap_chars: crate::config::defaults::default_min_word_tap_chars(),
            log_level: crate::config::defaults::default_log_level(),
        }
    }
}

impl ReaderConfig {
    pub fn layout_thresholds(&self) -> LayoutThresholds {
        LayoutThresholds {
            phone_max_short_side: self.phone_max_short_side,
            landscape_min_width: self.landscape_min_width,
        }
    }

    pub fn tier_limits(&self) -> TierLimits {
        let limits = self
            .tier_limits
            .iter()
            .map(|(tier, limit)| (tier.to_ascii_lowercase(), *limit))
            .collect();
        TierLimits::new(limits, self.default_tier.trim().to_ascii_lowercase())
            .with_unlimited(&self.unlimited_tiers)
    }

    pub fn transition_window(&self) -> Duration {
        Duration::from_millis(self.transition_lock_ms)
    }

    /// Clamp values a hand-edited file may have pushed out of range.
    pub fn sanitized(mut self) -> Self {
        self.color_bands = self.color_bands.clamp(1, 8);
        self.oversized_paragraph_factor = self.oversized_paragraph_factor.max(1);
        self.transition_lock_ms = self.transition_lock_ms.min(5_000);
        self.quiz_pass_threshold = if self.quiz_pass_threshold.is_finite() {
            self.quiz_pass_threshold.clamp(0.0, 100.0)
        } else {
            crate::config::defaults::default_quiz_pass_threshold()
        };
        self.min_word_tap_chars = self.min_word_tap_chars.max(1);
        self
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
