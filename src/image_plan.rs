//! Image placement: decide after which paragraph each illustration appears.
//!
//! Authored stories may carry an image plan naming scenes and rough positions.
//! The plan is opaque JSON and frequently malformed, so anything that cannot
//! be interpreted falls back to spreading the images evenly through the text.
//!
//! Two rules hold for every placement:
//! - at most one image per paragraph boundary;
//! - nothing is placed after the final paragraph, which is reserved for the
//!   story's closing text.

use crate::error::{ReaderError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use ts_rs::TS;

const PARAGRAPH_KEYS: [&str; 3] = ["after_paragraph", "paragraph_index", "paragraph"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImageInsertionPoint {
    pub after_paragraph_index: usize,
    pub image_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SceneAnchor {
    Paragraph(i64),
    /// Fraction of the story, `0.0` = start, `1.0` = end.
    Fraction(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PlannedScene {
    image_index: usize,
    anchor: SceneAnchor,
}

/// Resolve insertion points for `image_count` story images over
/// `paragraph_count` paragraphs, honoring `plan` when it can be read.
///
/// The result is sorted by paragraph and never schedules an image after the
/// last paragraph. Images that cannot be placed are dropped.
pub fn resolve_insertion_points(
    plan: Option<&Value>,
    paragraph_count: usize,
    image_count: usize,
) -> Vec<ImageInsertionPoint> {
    if paragraph_count < 2 || image_count == 0 {
        return Vec::new();
    }

    let planned = match plan.filter(|value| !value.is_null()).map(parse_plan) {
        Some(Ok(scenes)) => Some(scenes),
        Some(Err(err)) => {
            debug!("Falling back to even image distribution: {err}");
            None
        }
        None => None,
    };

    let mut points = match planned {
        Some(scenes) => place_planned(&scenes, paragraph_count, image_count),
        None => distribute_evenly(paragraph_count, image_count),
    };
    points.sort_by_key(|point| point.after_paragraph_index);
    points
}

/// Spread `image_count` images evenly over `paragraph_count` paragraphs.
///
/// Image `i` targets `floor((i+1)*P/(N+1)) - 1`, clamped to `[0, P-2]`.
pub fn distribute_evenly(paragraph_count: usize, image_count: usize) -> Vec<ImageInsertionPoint> {
    if paragraph_count < 2 {
        return Vec::new();
    }
    let last_slot = paragraph_count - 2;
    let mut slots = SlotTable::new(last_slot);
    let mut points = Vec::with_capacity(image_count.min(last_slot + 1));

    for image_index in 0..image_count {
        let target = ((image_index + 1) * paragraph_count / (image_count + 1))
            .saturating_sub(1)
            .min(last_slot);
        match slots.claim_from(target) {
            Some(after_paragraph_index) => points.push(ImageInsertionPoint {
                after_paragraph_index,
                image_index,
            }),
            None => debug!(image_index, target, "No free paragraph slot; image dropped"),
        }
    }
    points
}

fn place_planned(
    scenes: &[PlannedScene],
    paragraph_count: usize,
    image_count: usize,
) -> Vec<ImageInsertionPoint> {
    let last_paragraph = paragraph_count - 1;
    let last_slot = paragraph_count - 2;
    let mut slots = SlotTable::new(last_slot);
    let mut placed_images = vec![false; image_count];
    let mut points = Vec::new();

    for scene in scenes {
        if scene.image_index >= image_count {
            debug!(
                image_index = scene.image_index,
                image_count, "Plan references an image that is not visible; dropped"
            );
            continue;
        }
        if placed_images[scene.image_index] {
            debug!(image_index = scene.image_index, "Image planned twice; keeping first");
            continue;
        }
        let paragraph = match scene.anchor {
            SceneAnchor::Paragraph(index) => index.clamp(0, last_paragraph as i64) as usize,
            SceneAnchor::Fraction(fraction) => {
                ((fraction.clamp(0.0, 1.0) * paragraph_count as f64).floor() as usize)
                    .min(last_paragraph)
            }
        };
        let target = paragraph.min(last_slot);
        match slots.claim_from(target) {
            Some(after_paragraph_index) => {
                placed_images[scene.image_index] = true;
                points.push(ImageInsertionPoint {
                    after_paragraph_index,
                    image_index: scene.image_index,
                });
            }
            None => debug!(
                image_index = scene.image_index,
                target, "No free paragraph slot; image dropped"
            ),
        }
    }
    points
}

/// Tracks which paragraph boundaries already hold an image.
struct SlotTable {
    taken: Vec<bool>,
}

impl SlotTable {
    fn new(last_slot: usize) -> Self {
        Self {
            taken: vec![false; last_slot + 1],
        }
    }

    /// Claim `target` or the next free slot after it.
    fn claim_from(&mut self, target: usize) -> Option<usize> {
        let slot = (target..self.taken.len()).find(|&slot| !self.taken[slot])?;
        self.taken[slot] = true;
        Some(slot)
    }
}

fn parse_plan(value: &Value) -> Result<Vec<PlannedScene>> {
    let scenes = match value {
        Value::String(encoded) => {
            let decoded: Value = serde_json::from_str(encoded)?;
            if decoded.is_string() {
                return Err(ReaderError::InvalidImagePlan(
                    "doubly encoded plan".to_string(),
                ));
            }
            return parse_plan(&decoded);
        }
        Value::Array(items) => items,
        Value::Object(map) => match map.get("scenes") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(ReaderError::InvalidImagePlan(
                    "object plan without a scenes array".to_string(),
                ));
            }
        },
        other => {
            return Err(ReaderError::InvalidImagePlan(format!(
                "unsupported plan shape: {other}"
            )));
        }
    };

    let parsed: Vec<PlannedScene> = scenes
        .iter()
        .enumerate()
        .filter_map(|(order, scene)| {
            let parsed = parse_scene(order, scene);
            if parsed.is_none() {
                debug!(order, "Skipping unreadable image plan scene");
            }
            parsed
        })
        .collect();

    if parsed.is_empty() {
        return Err(ReaderError::InvalidImagePlan(
            "plan contains no usable scenes".to_string(),
        ));
    }
    Ok(parsed)
}

fn parse_scene(order: usize, scene: &Value) -> Option<PlannedScene> {
    let object = scene.as_object()?;
    let anchor = PARAGRAPH_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_i64))
        .map(SceneAnchor::Paragraph)
        .or_else(|| {
            object
                .get("position")
                .and_then(Value::as_f64)
                .filter(|fraction| fraction.is_finite())
                .map(SceneAnchor::Fraction)
        })?;
    let image_index = match object.get("image_index") {
        Some(index) => usize::try_from(index.as_u64()?).ok()?,
        None => order,
    };
    Some(PlannedScene {
        image_index,
        anchor,
    })
}
