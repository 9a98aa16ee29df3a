//! Records supplied by the host application.
//!
//! These mirror the backend rows the host already fetched. Nothing here is
//! loaded or saved by the reader core itself.

use crate::phase::StoryKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub story_images: Vec<String>,
    #[serde(default = "default_text_language")]
    pub text_language: String,
    #[serde(default)]
    pub series_id: Option<String>,
    #[serde(default)]
    pub episode_number: Option<u32>,
    #[serde(default)]
    pub series_episode_count: Option<u32>,
    /// Authored image placement; opaque and possibly malformed.
    #[serde(default)]
    pub image_plan: Option<serde_json::Value>,
}

fn default_text_language() -> String {
    "en".to_string()
}

impl Story {
    /// Chapter stories belong to a series and know their episode number.
    pub fn kind(&self) -> StoryKind {
        match (&self.series_id, self.episode_number) {
            (Some(series_id), Some(episode_number)) if !series_id.is_empty() => {
                StoryKind::Chapter {
                    episode_number,
                    series_episode_count: self
                        .series_episode_count
                        .unwrap_or(u32::MAX),
                }
            }
            _ => StoryKind::Standalone,
        }
    }

    pub fn has_cover(&self) -> bool {
        self.cover_image_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }

    /// Cover first (when present), then story images in scene order.
    pub fn image_list(&self) -> Vec<String> {
        let mut images = Vec::with_capacity(self.story_images.len() + 1);
        if self.has_cover() {
            images.extend(self.cover_image_url.iter().cloned());
        }
        images.extend(
            self.story_images
                .iter()
                .filter(|url| !url.trim().is_empty())
                .cloned(),
        );
        images
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderProfile {
    pub age: i32,
    #[serde(default = "default_text_language")]
    pub explanation_language: String,
}

impl Default for ReaderProfile {
    fn default() -> Self {
        Self {
            age: 8,
            explanation_language: default_text_language(),
        }
    }
}

/// Reward payload shown on the end screen, passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ActivityResult(pub BTreeMap<String, f64>);
