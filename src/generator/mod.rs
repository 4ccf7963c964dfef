//! Deterministic synthetic data generator
//!
//! Builds a collection of items, each tagged with a set of tag ids, so that
//! the share of items per tag-set cardinality and the per-tag frequencies
//! approximate the requested parameters. No randomness is involved: the
//! same parameters always produce the same collection.

pub mod collection;
pub mod params;

pub use collection::{GeneratedCollection, Item, Tag, TagOccurrenceStat};
pub use params::{EffectiveParameters, GenerationParameters};

/// Generate a collection from `parameters`.
///
/// Invalid parameters are corrected, not rejected; the corrections are
/// visible in [`GeneratedCollection::effective`].
pub fn generate(parameters: &GenerationParameters) -> GeneratedCollection {
    collection::build(parameters)
}

use crate::graph::{CoOccurrenceGraph, GraphResult};

impl GeneratedCollection {
    /// Feed every tagged item's tag set into a new graph over this
    /// collection's tags. Tag ids are 1-based, so the graph offset is -1.
    /// Untagged items are skipped.
    pub fn to_graph(&self) -> GraphResult<CoOccurrenceGraph> {
        let mut graph = CoOccurrenceGraph::new(self.num_tags, -1);
        for item in self.items.iter().filter(|item| !item.tag_set.is_empty()) {
            graph.add(item.tag_set.iter().copied())?;
        }
        Ok(graph)
    }
}
