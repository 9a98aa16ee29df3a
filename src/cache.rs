//! Memoized layouts keyed by an input fingerprint.
//!
//! A fingerprint is a SHA-256 over every input that can change page or spread
//! identity. Resizing within the same layout mode, or toggling back to a font
//! size seen before, reuses the earlier layout instead of paginating again.

use crate::derive::{DerivedLayout, LayoutInputs, derive_layout};
use crate::error::Result;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, trace};

pub const DEFAULT_CAPACITY: usize = 8;

/// Hex digest identifying one layout derivation.
pub fn layout_fingerprint(inputs: &LayoutInputs<'_>) -> String {
    let story = inputs.story;
    let typography = inputs.typography();
    let options = inputs.pagination_options();

    let mut hasher = Sha256::new();
    hash_field(&mut hasher, story.id.as_bytes());
    hash_field(&mut hasher, story.content.as_bytes());
    for image in story.image_list() {
        hash_field(&mut hasher, image.as_bytes());
    }
    hash_field(&mut hasher, &[u8::from(story.has_cover())]);
    let plan = story
        .image_plan
        .as_ref()
        .map(|plan| plan.to_string())
        .unwrap_or_default();
    hash_field(&mut hasher, plan.as_bytes());

    hash_field(&mut hasher, &typography.font_size.to_bits().to_le_bytes());
    hash_field(&mut hasher, &typography.line_height.to_bits().to_le_bytes());
    hash_field(&mut hasher, &typography.letter_spacing.to_bits().to_le_bytes());
    hash_field(&mut hasher, &(options.max_words_per_page as u64).to_le_bytes());
    hash_field(&mut hasher, &[u8::from(options.chapter_title_page)]);
    hash_field(&mut hasher, &[u8::from(options.split_oversized_paragraphs)]);
    hash_field(&mut hasher, &(options.oversized_paragraph_factor as u64).to_le_bytes());

    let tier = inputs.account_tier.trim().to_ascii_lowercase();
    hash_field(&mut hasher, tier.as_bytes());
    let limit = inputs
        .tier_limits
        .limit_for(&tier)
        .map(|limit| limit.to_string())
        .unwrap_or_else(|| "unlimited".to_string());
    hash_field(&mut hasher, limit.as_bytes());
    hash_field(&mut hasher, inputs.layout_mode.to_string().as_bytes());

    format!("{:x}", hasher.finalize())
}

// Length-prefixed so adjacent fields cannot run into each other.
fn hash_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

/// Small least-recently-used cache of derived layouts.
#[derive(Debug)]
pub struct LayoutCache {
    capacity: usize,
    entries: HashMap<String, Arc<DerivedLayout>>,
    recency: VecDeque<String>,
    hits: u64,
    misses: u64,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl LayoutCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            recency: VecDeque::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }

    /// Return the cached layout for `inputs`, deriving it on a miss.
    /// Failed derivations are not cached.
    pub fn get_or_derive(&mut self, inputs: &LayoutInputs<'_>) -> Result<Arc<DerivedLayout>> {
        let key = layout_fingerprint(inputs);
        if let Some(layout) = self.entries.get(&key).cloned() {
            self.hits += 1;
            self.touch(&key);
            trace!(fingerprint = %key, "Layout cache hit");
            return Ok(layout);
        }

        self.misses += 1;
        let layout = Arc::new(derive_layout(inputs)?);
        self.insert(key, Arc::clone(&layout));
        Ok(layout)
    }

    fn touch(&mut self, key: &str) {
        if let Some(position) = self.recency.iter().position(|entry| entry == key) {
            if let Some(entry) = self.recency.remove(position) {
                self.recency.push_back(entry);
            }
        }
    }

    fn insert(&mut self, key: String, layout: Arc<DerivedLayout>) {
        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.recency.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            debug!(fingerprint = %oldest, "Evicted cached layout");
        }
        self.recency.push_back(key.clone());
        self.entries.insert(key, layout);
    }
}
