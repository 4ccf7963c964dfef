//! Layout entries handed to a renderer

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tagnet_graph_algorithms::NodePair;

/// Grid slice allotted to one connected component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IslandEntry {
    /// Lowest node id in the island
    pub id: usize,
    pub nodes: BTreeSet<usize>,
    pub width: usize,
    pub height: usize,
    pub xpos: usize,
    pub ypos: usize,
    pub min_regions: usize,
    pub max_regions: usize,
    pub max_adjacent: usize,
}

impl IslandEntry {
    pub fn size(&self) -> usize {
        self.nodes.len()
    }
}

/// Part of an island drawn as one box
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionEntry {
    /// Seed node id, or the island id for an unsplit island
    pub id: usize,
    pub island_id: usize,
    pub interior_nodes: BTreeSet<usize>,
    /// Neighbors of interior nodes that lie outside the region
    pub exterior_nodes: BTreeSet<usize>,
    pub width: usize,
    pub height: usize,
    pub xpos: usize,
    pub ypos: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub id: usize,
    pub region_id: usize,
    pub island_id: usize,
    /// Neighbors in the same region
    pub interior_links: BTreeSet<usize>,
    /// Neighbors in other regions
    pub exterior_links: BTreeSet<usize>,
    pub xpos: usize,
    pub ypos: usize,
}

/// One undirected edge with both endpoint positions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeEntry {
    pub pair: NodePair,
    pub island_id: usize,
    pub n1_region: usize,
    pub n2_region: usize,
    pub n1_pos: (usize, usize),
    pub n2_pos: (usize, usize),
}

impl EdgeEntry {
    /// Edge between two regions rather than inside one
    pub fn crosses_regions(&self) -> bool {
        self.n1_region != self.n2_region
    }
}
