/// Story breakdown — counts, picture check, attribute alignment and tier.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::catalog::ScrapLookup;
use crate::schema::scrap::{ScrapAttributes, ScrapId, ScrapQuality};
use crate::schema::story::{SelectionSet, StoryConfig};

/// Best possible alignment, reached when the attribute mix matches the target.
pub const MAX_ALIGNMENT: f32 = 0.8;

/// Alignment lost per empty slot, as a fraction of the filled-story value.
pub const MISSING_SLOT_PENALTY: f32 = 0.15;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("selection references unknown scrap {0}")]
    UnknownScrap(ScrapId),
}

/// Coarse quality bucket used by the story to pick its follow-up branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScoreTier {
    #[default]
    Bad,
    Medium,
    Good,
}

impl ScoreTier {
    pub fn from_total_quality(total_quality: i32) -> Self {
        match total_quality {
            q if q >= 3 => Self::Good,
            1..=2 => Self::Medium,
            _ => Self::Bad,
        }
    }
}

/// The breakdown of a story. Recomputed from scratch on every call.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StoryStats {
    pub scrap_count: u32,
    /// Number of Great scraps.
    pub quality_add: u32,
    /// Number of Bad scraps.
    pub quality_subtract: u32,
    /// `quality_add - quality_subtract`, one lower again when no scrap is an image.
    pub total_quality: i32,
    pub has_picture: bool,
    pub fact_count: u32,
    pub color_count: u32,
    pub useful_count: u32,
    /// Attribute fit against the target mix. At most [`MAX_ALIGNMENT`] and
    /// not clamped below; a badly under-filled story can go negative.
    pub alignment: f32,
    pub is_full: bool,
    pub can_publish: bool,
    pub score: ScoreTier,
    pub slot_count: u32,
}

impl StoryStats {
    /// Total attribute hits. Exceeds `scrap_count` when scraps carry
    /// more than one attribute.
    pub fn attribute_count(&self) -> u32 {
        self.fact_count + self.color_count + self.useful_count
    }

    pub fn missing_slots(&self) -> u32 {
        self.slot_count.saturating_sub(self.scrap_count)
    }
}

/// Compute the breakdown for a selection.
///
/// Every filled slot must resolve through `lookup`; an unknown id means
/// corrupted player state or broken content, so no stats are returned.
/// The selection must have no more slots than `config.slot_count`, as
/// `SelectionSet::for_config` guarantees; `scrap_count <= slot_count`
/// only holds under that precondition.
///
/// Nothing is notified here. Callers that need a "stats refreshed" signal
/// dispatch it themselves (see [`crate::core::evaluator::StoryEvaluator`]).
pub fn compute<L>(
    selection: &SelectionSet,
    config: &StoryConfig,
    lookup: &L,
) -> Result<StoryStats, ScoreError>
where
    L: ScrapLookup + ?Sized,
{
    debug_assert!(
        selection.slot_count() <= config.slot_count as usize,
        "selection has {} slots but the story has {}",
        selection.slot_count(),
        config.slot_count
    );

    let mut stats = StoryStats {
        slot_count: config.slot_count,
        ..StoryStats::default()
    };
    let mut attribute_count = 0u32;

    for id in selection.filled() {
        let scrap = lookup.lookup(id).ok_or(ScoreError::UnknownScrap(id))?;

        stats.scrap_count += 1;
        match scrap.quality {
            ScrapQuality::Bad => stats.quality_subtract += 1,
            ScrapQuality::Great => stats.quality_add += 1,
            ScrapQuality::Good => {}
        }

        if !stats.has_picture && scrap.has_image() {
            stats.has_picture = true;
        }

        for attribute in scrap.attributes.iter() {
            attribute_count += 1;
            if attribute == ScrapAttributes::FACTS {
                stats.fact_count += 1;
            } else if attribute == ScrapAttributes::COLOR {
                stats.color_count += 1;
            } else if attribute == ScrapAttributes::USEFUL {
                stats.useful_count += 1;
            }
        }
    }

    stats.total_quality = stats.quality_add as i32 - stats.quality_subtract as i32;
    if !stats.has_picture {
        stats.total_quality -= 1;
    }
    stats.can_publish = stats.scrap_count > 0;

    let target_count = config.target_count();
    if attribute_count > 0 && target_count > 0 {
        let observed = attribute_count as f32;
        let target = target_count as f32;
        let total_diff = ratio_diff(stats.fact_count, observed, config.fact_weight, target)
            + ratio_diff(stats.color_count, observed, config.color_weight, target)
            + ratio_diff(stats.useful_count, observed, config.useful_weight, target);
        stats.alignment = MAX_ALIGNMENT - total_diff;
    }

    if stats.scrap_count < config.slot_count {
        let missing = config.slot_count - stats.scrap_count;
        stats.alignment *= 1.0 - missing as f32 * MISSING_SLOT_PENALTY;
        stats.is_full = false;
    } else {
        stats.is_full = true;
    }

    stats.score = ScoreTier::from_total_quality(stats.total_quality);

    tracing::debug!(
        scraps = stats.scrap_count,
        slots = config.slot_count,
        total_quality = stats.total_quality,
        alignment = stats.alignment,
        score = ?stats.score,
        "computed story stats"
    );

    Ok(stats)
}

fn ratio_diff(count: u32, observed_total: f32, weight: u32, target_total: f32) -> f32 {
    (count as f32 / observed_total - weight as f32 / target_total).abs()
}
