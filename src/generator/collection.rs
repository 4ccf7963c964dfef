//! Generated collection types and the tag assignment algorithm

use super::params::{EffectiveParameters, GenerationParameters};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Tag description. Ids are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: usize,
    pub name: String,
}

impl Tag {
    pub fn new(id: usize) -> Self {
        Tag { id, name: format!("Tag {}", id) }
    }
}

/// Generated item with the ids of the tags assigned to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: usize,
    pub name: String,
    pub tag_set: BTreeSet<usize>,
}

impl Item {
    pub fn new(id: usize) -> Self {
        Item { id, name: format!("Item {}", id), tag_set: BTreeSet::new() }
    }

    pub fn cardinality(&self) -> usize {
        self.tag_set.len()
    }
}

/// How often a tag was assigned, against its target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagOccurrenceStat {
    pub id: usize,
    pub target: usize,
    pub occurs: usize,
    /// Index 0 counts assignments to items built for cardinality 1
    pub occurs_by_cardinality: Vec<usize>,
}

impl TagOccurrenceStat {
    fn new(id: usize, num_cardinalities: usize, target: usize) -> Self {
        TagOccurrenceStat {
            id,
            target,
            occurs: 0,
            occurs_by_cardinality: vec![0; num_cardinalities],
        }
    }

    pub fn is_full(&self) -> bool {
        self.occurs >= self.target
    }
}

/// Output of one generator run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedCollection {
    /// Parameters exactly as requested
    pub parameters: GenerationParameters,
    pub effective: EffectiveParameters,
    pub num_tags: usize,
    pub requested_items_by_cardinality: Vec<usize>,
    pub actual_items_by_cardinality: Vec<usize>,
    /// Items that received fewer tags than their requested cardinality
    pub num_short_items: usize,
    pub tags: Vec<Tag>,
    pub items: Vec<Item>,
    pub tag_stats: Vec<TagOccurrenceStat>,
}

impl GeneratedCollection {
    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    /// Tags that ended up on no item
    pub fn unused_tags(&self) -> impl Iterator<Item = &TagOccurrenceStat> {
        self.tag_stats.iter().filter(|stat| stat.occurs == 0)
    }
}

/// Items to build per cardinality. Every item lands somewhere, with
/// rounding leftovers at cardinality 0.
pub(crate) fn items_by_cardinality(proportions: &[f32], num_items: usize) -> Vec<usize> {
    let mut counts = vec![0usize; proportions.len().max(1)];
    let total: f32 = proportions.iter().filter(|p| **p > 0.0).sum();

    let mut assigned = 0usize;
    if total > 0.0 {
        let scale = 1.0 / total;
        for (card, &proportion) in proportions.iter().enumerate() {
            if proportion <= 0.0 {
                continue;
            }
            let rounded = (scale * proportion * num_items as f32).round() as usize;
            let wanted = rounded.max(1);
            let count = if wanted + assigned > num_items { num_items - assigned } else { wanted };
            counts[card] = count;
            assigned += count;
        }
    }

    if assigned < num_items {
        counts[0] += num_items - assigned;
    }
    counts
}

/// Tag-slot demand: sum of cardinality times item count
fn tags_wanted(counts: &[usize]) -> usize {
    counts.iter().enumerate().skip(1).map(|(card, count)| card * count).sum()
}

fn build_tag_stats(eff: &EffectiveParameters, num_tags: usize, num_cardinalities: usize) -> Vec<TagOccurrenceStat> {
    let n = eff.num_items as f32;
    let min_frequency = eff.avg_frequency / 2.0;
    let multiple = (eff.max_frequency / min_frequency).round() as usize;
    let used = num_tags.saturating_sub(eff.num_unused_tags);
    // The cast saturates when the average is tiny next to the maximum
    let num_max = (used / 2) / multiple.saturating_add(1);
    let num_min = num_max;
    let num_avg = used - num_max - num_min;
    debug!(num_max, num_avg, num_min, "tag frequency tiers");

    (1..=num_tags)
        .map(|id| {
            let target = if id <= num_max {
                (eff.max_frequency * n) as usize
            } else if id <= num_max + num_avg {
                (eff.avg_frequency * n) as usize
            } else if id <= used {
                (min_frequency * n) as usize
            } else {
                0
            };
            TagOccurrenceStat::new(id, num_cardinalities, target)
        })
        .collect()
}

/// Round-robin cursor over the tag table
struct Cursor {
    index: usize,
    len: usize,
}

impl Cursor {
    fn step(&mut self) {
        self.index = if self.index + 1 == self.len { 0 } else { self.index + 1 };
    }

    /// Move to the next tag with capacity left. Gives up after one full
    /// lap back to the starting position.
    fn advance_to_available(&mut self, stats: &[TagOccurrenceStat]) {
        let thumb = self.index;
        while stats[self.index].is_full() {
            self.step();
            if self.index == thumb {
                break;
            }
        }
    }
}

pub(crate) fn build(parameters: &GenerationParameters) -> GeneratedCollection {
    let eff = parameters.corrected();

    // 1. Items per cardinality
    let requested = items_by_cardinality(&parameters.cardinality_proportions, eff.num_items);
    let num_cardinalities = requested.len() - 1;

    // 2. Enough tags for the requested frequencies
    let wanted = tags_wanted(&requested);
    let min_required = eff.num_unused_tags + (wanted as f32 * eff.avg_frequency).ceil() as usize;
    let num_tags = parameters.num_tags.max(min_required);
    if num_tags > parameters.num_tags {
        debug!(requested = parameters.num_tags, required = num_tags, "raising tag count");
    }

    // 3-4. Tier targets
    let mut stats = build_tag_stats(&eff, num_tags, num_cardinalities);
    let tags: Vec<Tag> = (1..=num_tags).map(Tag::new).collect();

    // 5. Items, highest cardinality first
    let mut items = Vec::with_capacity(eff.num_items);
    let mut actual = vec![0usize; requested.len()];
    let mut num_short_items = 0;
    let mut cursor = Cursor { index: 0, len: num_tags };
    if num_tags > 0 {
        while cursor.index + 1 < num_tags && stats[cursor.index].is_full() {
            cursor.index += 1;
        }
    }

    let mut remaining = 0usize;
    let mut card_index = requested.len();
    for id in 1..=eff.num_items {
        while remaining == 0 && card_index > 0 {
            card_index -= 1;
            remaining = requested[card_index];
        }
        let card = card_index;

        let mut item = Item::new(id);
        if card > 0 && num_tags > 0 && !stats[cursor.index].is_full() {
            let thumb = cursor.index;
            for _ in 0..card {
                let stat = &mut stats[cursor.index];
                stat.occurs += 1;
                stat.occurs_by_cardinality[card - 1] += 1;
                item.tag_set.insert(stat.id);

                let mut need_advance = true;
                while need_advance {
                    cursor.step();
                    if cursor.index == thumb {
                        break;
                    }
                    need_advance = stats[cursor.index].is_full();
                }
                if need_advance {
                    break;
                }
            }
        }

        if item.cardinality() < card {
            num_short_items += 1;
        }
        actual[item.cardinality()] += 1;
        items.push(item);
        remaining = remaining.saturating_sub(1);

        if num_tags > 0 {
            cursor.advance_to_available(&stats);
        }
    }

    info!(
        items = items.len(),
        tags = num_tags,
        short_items = num_short_items,
        "generated collection"
    );

    GeneratedCollection {
        parameters: parameters.clone(),
        effective: eff,
        num_tags,
        requested_items_by_cardinality: requested,
        actual_items_by_cardinality: actual,
        num_short_items,
        tags,
        items,
        tag_stats: stats,
    }
}
