//! Tagnet
//!
//! Explores a synthetic collection of tagged items as a co-occurrence
//! network. Three stages form a pipeline:
//!
//! - [`generator`]: deterministic items and tags matching requested
//!   cardinality and frequency distributions
//! - [`graph`]: pairwise co-occurrence counts, connected components and
//!   three distance metrics with summary statistics
//! - [`layout`]: island and region partitioning with grid coordinates for
//!   every node and edge
//!
//! ## Example Usage
//!
//! ```rust
//! use tagnet::{generate, DistanceType, GenerationParameters, NetworkLayout};
//!
//! let collection = generate(&GenerationParameters::default());
//! let graph = collection.to_graph().unwrap();
//!
//! let stats = graph.distance_stats(DistanceType::PathLength);
//! assert!(stats.count > 0);
//!
//! let layout = NetworkLayout::with_defaults(&graph, &collection.tags);
//! assert_eq!(layout.nodes().len(), layout.num_nodes());
//! ```

#![warn(clippy::all)]

pub mod generator;
pub mod graph;
pub mod layout;

pub use generator::{generate, GeneratedCollection, GenerationParameters, Item, Tag, TagOccurrenceStat};

pub use graph::{
    CoOccurrenceGraph, DistanceErrorEntry, DistanceType, GraphError, GraphResult, IdSpace, IslandStat,
    NodeConnectStat, StatsEntry,
};

pub use layout::{EdgeEntry, IslandEntry, LayoutConfig, NetworkLayout, NodeEntry, RegionEntry, Viewport};

pub use tagnet_graph_algorithms::{MatrixError, NodePair, SymmetricMatrix};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}
