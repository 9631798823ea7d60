use std::collections::HashSet;

use crate::{
    assets::ImageAsset,
    core::{ContentHash, PerceptualHash},
    error::{PromoreelError, PromoreelResult},
};

/// Outcome of evaluating one image against the run's tracking collections.
///
/// Rejections are values, not errors: callers decide whether to log, skip,
/// or retry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DedupDecision {
    /// Novel image; the caller records its hashes and keeps it.
    Accept,
    /// Byte-identical to an already accepted image.
    RejectExactDuplicate,
    /// Within the perceptual threshold of an already accepted image.
    RejectVisualDuplicate,
    /// Under the minimum-dimension floor (icons, spacers, tracking pixels).
    RejectTooSmall,
}

/// Tunable dedup bounds.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct DedupConfig {
    /// Maximum Hamming distance (out of 64 bits) still treated as the same
    /// creative. Lower is stricter, higher collapses more aggressively.
    pub perceptual_threshold: u32,
    /// Both axes must reach this many pixels.
    pub min_dimension: u32,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            perceptual_threshold: 5,
            min_dimension: 400,
        }
    }
}

impl DedupConfig {
    pub fn validate(&self) -> PromoreelResult<()> {
        if self.perceptual_threshold > 64 {
            return Err(PromoreelError::validation(
                "perceptual_threshold must be <= 64 bits",
            ));
        }
        Ok(())
    }
}

/// Decide whether `asset` is novel relative to what this run already accepted.
///
/// Pure decision function: on [`DedupDecision::Accept`] the caller appends
/// `asset.content_hash` and `asset.perceptual_hash` to the collections it
/// threads through here. Because perceptual comparison runs against already
/// accepted hashes only, results depend on processing order (first-seen
/// wins); callers must keep input order stable.
///
/// The dimension floor is checked after both hash checks and before final
/// acceptance.
pub fn evaluate(
    asset: &ImageAsset,
    seen_content: &HashSet<ContentHash>,
    seen_perceptual: &[PerceptualHash],
    config: &DedupConfig,
) -> DedupDecision {
    if seen_content.contains(&asset.content_hash) {
        return DedupDecision::RejectExactDuplicate;
    }

    let min_distance = seen_perceptual
        .iter()
        .map(|p| p.distance(asset.perceptual_hash))
        .min();
    if matches!(min_distance, Some(d) if d <= config.perceptual_threshold) {
        return DedupDecision::RejectVisualDuplicate;
    }

    if asset.width < config.min_dimension || asset.height < config.min_dimension {
        return DedupDecision::RejectTooSmall;
    }

    DedupDecision::Accept
}
