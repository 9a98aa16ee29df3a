//! Viewport classification.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum LayoutMode {
    #[default]
    Phone,
    SmallTablet,
    /// Double-page spreads.
    Landscape,
}

impl LayoutMode {
    pub fn uses_spreads(self) -> bool {
        self == LayoutMode::Landscape
    }
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LayoutMode::Phone => "phone",
            LayoutMode::SmallTablet => "small-tablet",
            LayoutMode::Landscape => "landscape",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutThresholds {
    /// Viewports whose shorter side is below this are phones.
    pub phone_max_short_side: f32,
    /// Minimum width for double-page spreads.
    pub landscape_min_width: f32,
}

impl Default for LayoutThresholds {
    fn default() -> Self {
        Self {
            phone_max_short_side: 600.0,
            landscape_min_width: 1024.0,
        }
    }
}

pub fn detect_layout_mode(viewport: Viewport, thresholds: &LayoutThresholds) -> LayoutMode {
    let short_side = viewport.width.min(viewport.height);
    if short_side < thresholds.phone_max_short_side {
        LayoutMode::Phone
    } else if viewport.width > viewport.height && viewport.width >= thresholds.landscape_min_width {
        LayoutMode::Landscape
    } else {
        LayoutMode::SmallTablet
    }
}
