//! Account-tier image limits.
//!
//! The host hands over an ordered image list with the cover first and the
//! story illustrations after it in scene order. Each account tier may show a
//! limited number of those images; the cover survives every limit.

use std::collections::{BTreeMap, BTreeSet};

/// Images that survived tier filtering, split into cover and illustrations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleImages {
    pub cover: Option<String>,
    pub story: Vec<String>,
}

impl VisibleImages {
    pub fn len(&self) -> usize {
        self.story.len() + usize::from(self.cover.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-tier visible image limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierLimits {
    limits: BTreeMap<String, usize>,
    unlimited: BTreeSet<String>,
    default_tier: String,
}

impl TierLimits {
    pub fn new(limits: BTreeMap<String, usize>, default_tier: impl Into<String>) -> Self {
        Self {
            limits,
            unlimited: BTreeSet::new(),
            default_tier: default_tier.into(),
        }
    }

    /// Mark tiers that see every image.
    pub fn with_unlimited<I, S>(mut self, tiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.unlimited = tiers
            .into_iter()
            .map(|tier| tier.as_ref().trim().to_ascii_lowercase())
            .collect();
        self
    }

    /// Limit for `tier`; `None` means unlimited.
    ///
    /// Unknown tiers use the default tier's entry. A default tier missing from
    /// the table is treated as unlimited.
    pub fn limit_for(&self, tier: &str) -> Option<usize> {
        let key = tier.trim().to_ascii_lowercase();
        if self.unlimited.contains(&key) {
            return None;
        }
        self.limits
            .get(&key)
            .or_else(|| self.limits.get(&self.default_tier))
            .copied()
    }
}

/// Truncate `images` to the tier's limit, keeping order and the cover.
///
/// `has_cover` states whether `images[0]` is the cover. A limit of zero still
/// keeps the cover; the list is never reordered or padded.
pub fn filter_images(
    images: &[String],
    has_cover: bool,
    tier: &str,
    limits: &TierLimits,
) -> VisibleImages {
    let limit = limits.limit_for(tier).unwrap_or(images.len());
    let keep = if has_cover && !images.is_empty() {
        limit.max(1)
    } else {
        limit
    };
    let mut kept = images.iter().take(keep).cloned();

    let cover = if has_cover { kept.next() } else { None };
    let story: Vec<String> = kept.collect();
    if story.len() + usize::from(cover.is_some()) < images.len() {
        tracing::debug!(
            tier,
            available = images.len(),
            kept = story.len() + usize::from(cover.is_some()),
            "Truncated images for account tier"
        );
    }
    VisibleImages { cover, story }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> TierLimits {
        let mut table = BTreeMap::new();
        table.insert("free".to_string(), 2);
        table.insert("standard".to_string(), 4);
        table.insert("locked".to_string(), 0);
        TierLimits::new(table, "free")
    }

    fn images(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("img-{i}.png")).collect()
    }

    #[test]
    fn truncates_preserving_order_and_cover() {
        let visible = filter_images(&images(6), true, "free", &limits());
        assert_eq!(visible.cover.as_deref(), Some("img-0.png"));
        assert_eq!(visible.story, vec!["img-1.png".to_string()]);
        assert_eq!(visible.len(), 2);
    }

    #[test]
    fn zero_limit_still_keeps_cover() {
        let visible = filter_images(&images(3), true, "locked", &limits());
        assert_eq!(visible.cover.as_deref(), Some("img-0.png"));
        assert!(visible.story.is_empty());

        let without_cover = filter_images(&images(3), false, "locked", &limits());
        assert!(without_cover.is_empty());
    }

    #[test]
    fn unknown_tier_falls_back_to_default_and_never_pads() {
        let visible = filter_images(&images(1), true, "mystery", &limits());
        assert_eq!(visible.len(), 1);

        let standard = filter_images(&images(6), false, " Standard ", &limits());
        assert_eq!(standard.story.len(), 4);
        assert_eq!(standard.story[0], "img-0.png");
    }

    #[test]
    fn unlimited_tiers_skip_the_default() {
        let limits = limits().with_unlimited(["Premium"]);
        assert_eq!(limits.limit_for("premium"), None);
        assert_eq!(limits.limit_for("mystery"), Some(2));
    }

    #[test]
    fn missing_default_tier_is_unlimited() {
        let open = TierLimits::new(BTreeMap::new(), "premium");
        let visible = filter_images(&images(9), true, "premium", &open);
        assert_eq!(visible.len(), 9);
    }
}
