use super::defaults;
use super::models::{LogLevel, ReaderConfig};
use crate::typography::FontSizeSetting;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    appearance: AppearanceConfig,
    #[serde(default)]
    layout: LayoutConfig,
    #[serde(default)]
    pagination: PaginationConfig,
    #[serde(default)]
    navigation: NavigationConfig,
    #[serde(default)]
    quiz: QuizConfig,
    #[serde(default)]
    tiers: TiersConfig,
    #[serde(default)]
    word_tap: WordTapConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl From<ConfigTables> for ReaderConfig {
    fn from(tables: ConfigTables) -> Self {
        ReaderConfig {
            font_size: tables.appearance.font_size,
            color_bands: tables.appearance.color_bands,
            phone_max_short_side: tables.layout.phone_max_short_side,
            landscape_min_width: tables.layout.landscape_min_width,
            split_oversized_paragraphs: tables.pagination.split_oversized_paragraphs,
            oversized_paragraph_factor: tables.pagination.oversized_paragraph_factor,
            transition_lock_ms: tables.navigation.transition_lock_ms,
            quiz_pass_threshold: tables.quiz.pass_threshold,
            default_tier: tables.tiers.default_tier,
            tier_limits: tables.tiers.limits,
            unlimited_tiers: tables.tiers.unlimited,
            min_word_tap_chars: tables.word_tap.min_chars,
            log_level: tables.logging.log_level,
        }
    }
}

impl From<&ReaderConfig> for ConfigTables {
    fn from(config: &ReaderConfig) -> Self {
        ConfigTables {
            appearance: AppearanceConfig {
                font_size: config.font_size,
                color_bands: config.color_bands,
            },
            layout: LayoutConfig {
                phone_max_short_side: config.phone_max_short_side,
                landscape_min_width: config.landscape_min_width,
            },
            pagination: PaginationConfig {
                split_oversized_paragraphs: config.split_oversized_paragraphs,
                oversized_paragraph_factor: config.oversized_paragraph_factor,
            },
            navigation: NavigationConfig {
                transition_lock_ms: config.transition_lock_ms,
            },
            quiz: QuizConfig {
                pass_threshold: config.quiz_pass_threshold,
            },
            tiers: TiersConfig {
                default_tier: config.default_tier.clone(),
                limits: config.tier_limits.clone(),
                unlimited: config.unlimited_tiers.clone(),
            },
            word_tap: WordTapConfig {
                min_chars: config.min_word_tap_chars,
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct AppearanceConfig {
    #[serde(default = "defaults::default_font_size")]
    font_size: FontSizeSetting,
    #[serde(default = "defaults::default_color_bands")]
    color_bands: usize,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        AppearanceConfig {
            font_size: defaults::default_font_size(),
            color_bands: defaults::default_color_bands(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LayoutConfig {
    #[serde(default = "defaults::default_phone_max_short_side")]
    phone_max_short_side: f32,
    #[serde(default = "defaults::default_landscape_min_width")]
    landscape_min_width: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            phone_max_short_side: defaults::default_phone_max_short_side(),
            landscape_min_width: defaults::default_landscape_min_width(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct PaginationConfig {
    #[serde(default = "defaults::default_split_oversized_paragraphs")]
    split_oversized_paragraphs: bool,
    #[serde(default = "defaults::default_oversized_paragraph_factor")]
    oversized_paragraph_factor: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        PaginationConfig {
            split_oversized_paragraphs: defaults::default_split_oversized_paragraphs(),
            oversized_paragraph_factor: defaults::default_oversized_paragraph_factor(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct NavigationConfig {
    #[serde(default = "defaults::default_transition_lock_ms")]
    transition_lock_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        NavigationConfig {
            transition_lock_ms: defaults::default_transition_lock_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct QuizConfig {
    #[serde(default = "defaults::default_quiz_pass_threshold")]
    pass_threshold: f64,
}

impl Default for QuizConfig {
    fn default() -> Self {
        QuizConfig {
            pass_threshold: defaults::default_quiz_pass_threshold(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct TiersConfig {
    #[serde(default = "defaults::default_tier", rename = "default")]
    default_tier: String,
    #[serde(default = "defaults::default_unlimited_tiers")]
    unlimited: Vec<String>,
    #[serde(default = "defaults::default_tier_limits")]
    limits: BTreeMap<String, usize>,
}

impl Default for TiersConfig {
    fn default() -> Self {
        TiersConfig {
            default_tier: defaults::default_tier(),
            limits: defaults::default_tier_limits(),
            unlimited: defaults::default_unlimited_tiers(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct WordTapConfig {
    #[serde(default = "defaults::default_min_word_tap_chars")]
    min_chars: usize,
}

impl Default for WordTapConfig {
    fn default() -> Self {
        WordTapConfig {
            min_chars: defaults::default_min_word_tap_chars(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}
