//! Result types for co-occurrence graph queries

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use tagnet_graph_algorithms::NodePair;

/// Distance metric selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceType {
    /// Number of hops
    PathLength,
    /// Jaccard distance of the item sets two tags appear on
    ItemsetJaccard,
    /// Jaccard distance of the neighbor sets of two tags
    TagsetJaccard,
}

impl DistanceType {
    pub const ALL: [DistanceType; 3] = [
        DistanceType::PathLength,
        DistanceType::ItemsetJaccard,
        DistanceType::TagsetJaccard,
    ];

    /// Slot of this metric in per-metric arrays
    pub fn index(self) -> usize {
        match self {
            DistanceType::PathLength => 0,
            DistanceType::ItemsetJaccard => 1,
            DistanceType::TagsetJaccard => 2,
        }
    }
}

impl fmt::Display for DistanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DistanceType::PathLength => "path",
            DistanceType::ItemsetJaccard => "itemset",
            DistanceType::TagsetJaccard => "tagset",
        };
        f.pad(name)
    }
}

impl FromStr for DistanceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "path" | "pathlength" | "path-length" => Ok(DistanceType::PathLength),
            "itemset" | "itemset-jaccard" => Ok(DistanceType::ItemsetJaccard),
            "tagset" | "tagset-jaccard" => Ok(DistanceType::TagsetJaccard),
            other => Err(format!("unknown distance type '{}'", other)),
        }
    }
}

/// Which identifiers a statistics query reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IdSpace {
    /// Caller identifiers, as passed to `add`
    #[default]
    Original,
    /// Zero-based matrix row/column
    Index,
}

/// Descriptive statistics for a metric or one histogram bin
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatsEntry {
    /// Bin number starting at 1; 0 for whole-metric summaries
    pub id: usize,
    pub low_bound: f32,
    pub high_bound: f32,
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
}

/// Connectivity of one node to the rest of the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConnectStat {
    pub id: usize,
    /// Nodes not reachable from this one
    pub num_no_connect: usize,
    pub num_adjacent: usize,
    /// Reachable only through other nodes
    pub num_indirect: usize,
    pub min_adj_tagset: f32,
    pub max_adj_tagset: f32,
    pub avg_adj_tagset: f32,
    /// Adjacent nodes strictly closer than the average tagset distance
    pub num_below_avg: usize,
    pub adj_nodes: BTreeSet<usize>,
    pub adj_num_common: BTreeMap<usize, usize>,
    pub adj_tagset_distance: BTreeMap<usize, f32>,
}

/// One connected component with its degree distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IslandStat {
    /// Lowest node id in the island
    pub id: usize,
    pub nodes: BTreeSet<usize>,
    /// Nodes with more than four neighbors
    pub num_with_many: usize,
    /// Nodes whose degree equals `max_adjacent`
    pub num_with_max: usize,
    pub num_with_4_adj: usize,
    pub num_with_3_adj: usize,
    pub num_with_2_adj: usize,
    pub num_with_1_adj: usize,
    pub min_adjacent: usize,
    pub max_adjacent: usize,
    pub avg_adjacent: f32,
}

impl IslandStat {
    pub(crate) fn new(id: usize, nodes: BTreeSet<usize>) -> Self {
        IslandStat {
            id,
            nodes,
            num_with_many: 0,
            num_with_max: 0,
            num_with_4_adj: 0,
            num_with_3_adj: 0,
            num_with_2_adj: 0,
            num_with_1_adj: 0,
            min_adjacent: usize::MAX,
            max_adjacent: 0,
            avg_adjacent: 0.0,
        }
    }

    /// Fold one member's degree into the distribution
    pub(crate) fn record(&mut self, neighbors: usize) {
        match neighbors {
            0 => {}
            1 => self.num_with_1_adj += 1,
            2 => self.num_with_2_adj += 1,
            3 => self.num_with_3_adj += 1,
            4 => self.num_with_4_adj += 1,
            _ => self.num_with_many += 1,
        }
        self.min_adjacent = self.min_adjacent.min(neighbors);
        if neighbors > self.max_adjacent {
            self.max_adjacent = neighbors;
            self.num_with_max = 1;
        } else if neighbors == self.max_adjacent {
            self.num_with_max += 1;
        }
        self.avg_adjacent += neighbors as f32 / self.nodes.len() as f32;
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }
}

/// Distance entry that is not the minimum over its intermediates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceErrorEntry {
    /// Zero-based row/column pair
    pub pair: NodePair,
    pub recorded: f32,
    pub minimum: f32,
}
