//! Generation parameters and their correction rules

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Frequency used when the requested average is outside (0, 1)
pub const FALLBACK_AVG_FREQUENCY: f32 = 0.05;
/// Smallest collection the generator will build
pub const MIN_ITEMS: usize = 3;
/// Tags reserved at the end of the table when unused tags are forced
pub const FORCED_UNUSED_TAGS: usize = 2;

/// Caller-facing request for a synthetic collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParameters {
    pub num_items: usize,
    /// Lower bound; raised when too small for the requested frequencies
    pub num_tags: usize,
    pub force_unused_tags: bool,
    /// Index is the tag-set cardinality, value the target share of items
    pub cardinality_proportions: Vec<f32>,
    pub avg_tag_frequency: f32,
    pub max_tag_frequency: f32,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            num_items: 100,
            num_tags: 10,
            force_unused_tags: false,
            cardinality_proportions: vec![0.0, 0.2, 0.4, 0.2, 0.1, 0.1],
            avg_tag_frequency: 0.1,
            max_tag_frequency: 0.2,
        }
    }
}

/// Parameters after correction, as actually used for generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveParameters {
    pub num_items: usize,
    pub num_unused_tags: usize,
    pub avg_frequency: f32,
    pub max_frequency: f32,
}

impl GenerationParameters {
    /// Apply the correction rules. Invalid values are replaced, never rejected.
    pub fn corrected(&self) -> EffectiveParameters {
        let num_items = if self.num_items < MIN_ITEMS {
            debug!(requested = self.num_items, "raising item count to {}", MIN_ITEMS);
            MIN_ITEMS
        } else {
            self.num_items
        };

        let avg = self.avg_tag_frequency;
        let avg_frequency = if avg > 0.0 && avg < 1.0 {
            avg
        } else {
            debug!(requested = avg, "average tag frequency outside (0, 1), using {}", FALLBACK_AVG_FREQUENCY);
            FALLBACK_AVG_FREQUENCY
        };

        let max = self.max_tag_frequency;
        let max_frequency = if max > 0.0 && max < 1.0 && max >= avg_frequency {
            max
        } else {
            debug!(requested = max, avg = avg_frequency, "maximum tag frequency invalid, using the average");
            avg_frequency
        };

        EffectiveParameters {
            num_items,
            num_unused_tags: if self.force_unused_tags { FORCED_UNUSED_TAGS } else { 0 },
            avg_frequency,
            max_frequency,
        }
    }
}
