//! Island and per-node connectivity statistics
//!
//! Two independent derivations of the same figures:
//! - `island_stats` / `node_connect_stats` read the raw occurrence matrix
//!   and the connected-component partition.
//! - `islands_from_distance_matrix` / `connect_stats_from_distance_matrix`
//!   read the derived path-length and tagset matrices.
//!
//! They agree on everything but two fields:
//! - `num_no_connect`: the raw variant counts every node outside the
//!   component, active or not. This only shows when some node never
//!   appears in a list of two or more nodes.
//! - `num_below_avg`: the raw variant counts neighbors strictly below the
//!   average tagset distance, the matrix variant also counts ties.

use super::cooccurrence::CoOccurrenceGraph;
use super::types::{DistanceType, IdSpace, IslandStat, NodeConnectStat};
use std::collections::{BTreeMap, BTreeSet};
use tagnet_graph_algorithms::NodePair;

/// Accumulates tagset distances to a node's direct neighbors
struct NeighborDistances {
    adj_nodes: BTreeSet<usize>,
    adj_num_common: BTreeMap<usize, usize>,
    adj_tagset_distance: BTreeMap<usize, f32>,
    min: f32,
    max: f32,
    sum: f32,
}

impl NeighborDistances {
    fn new() -> Self {
        NeighborDistances {
            adj_nodes: BTreeSet::new(),
            adj_num_common: BTreeMap::new(),
            adj_tagset_distance: BTreeMap::new(),
            min: 1.0,
            max: 0.0,
            sum: 0.0,
        }
    }

    fn push(&mut self, id: usize, common: usize, distance: f32) {
        self.adj_nodes.insert(id);
        self.adj_num_common.insert(id, common);
        self.adj_tagset_distance.insert(id, distance);
        self.min = self.min.min(distance);
        self.max = self.max.max(distance);
        self.sum += distance;
    }

    fn into_stat(
        self,
        id: usize,
        num_no_connect: usize,
        num_indirect: usize,
        count_ties: bool,
    ) -> NodeConnectStat {
        let num_adjacent = self.adj_nodes.len();
        let avg = if num_adjacent == 0 { 0.0 } else { self.sum / num_adjacent as f32 };
        let num_below_avg = self
            .adj_tagset_distance
            .values()
            .filter(|&&d| d < avg || (count_ties && d == avg))
            .count();
        NodeConnectStat {
            id,
            num_no_connect,
            num_adjacent,
            num_indirect,
            min_adj_tagset: self.min,
            max_adj_tagset: self.max,
            avg_adj_tagset: avg,
            num_below_avg,
            adj_nodes: self.adj_nodes,
            adj_num_common: self.adj_num_common,
            adj_tagset_distance: self.adj_tagset_distance,
        }
    }
}

impl CoOccurrenceGraph {
    fn convert(&self, rc: usize, ids: IdSpace) -> usize {
        match ids {
            IdSpace::Original => self.to_id(rc),
            IdSpace::Index => rc,
        }
    }

    /// Connected components from the occurrence data, ordered by id
    pub fn island_stats(&self) -> Vec<IslandStat> {
        self.components
            .components()
            .into_iter()
            .map(|component| {
                let nodes = component.iter().map(|&rc| self.to_id(rc)).collect();
                let mut island = IslandStat::new(self.to_id(component[0]), nodes);
                for &rc in &component {
                    island.record(self.degree(rc));
                }
                island
            })
            .collect()
    }

    /// Per-node connectivity from the occurrence data, ordered by id
    pub fn node_connect_stats(&self) -> Vec<NodeConnectStat> {
        let mut stats = Vec::new();
        for component in self.components.components() {
            for &node in &component {
                let mut neighbors = NeighborDistances::new();
                for &adj in &component {
                    if !self.adjacent(node, adj) {
                        continue;
                    }
                    let (both, either) = self.neighbor_overlap(&component, node, adj);
                    let distance = (1.0 - both as f32 / either as f32).max(super::DISTANCE_EPSILON);
                    neighbors.push(self.to_id(adj), both, distance);
                }
                let num_indirect = component.len() - neighbors.adj_nodes.len() - 1;
                stats.push(neighbors.into_stat(
                    self.to_id(node),
                    self.node_count - component.len(),
                    num_indirect,
                    false,
                ));
            }
        }
        stats.sort_by_key(|stat| stat.id);
        stats
    }

    /// Islands read off the path-length matrix, ordered by lowest member
    pub fn islands_from_distance_matrix(&self, ids: IdSpace) -> Vec<IslandStat> {
        let derived = self.derived();
        let paths = derived.matrix(DistanceType::PathLength);
        let n = self.node_count;
        let mut islands: Vec<IslandStat> = Vec::new();
        let mut island_of: Vec<Option<usize>> = vec![None; n];

        for n1 in (0..n).filter(|&rc| self.is_active(rc)) {
            let neighbors = (0..n).filter(|&m| m != n1 && paths[(n1, m)] == 1.0).count();
            let slot = match island_of[n1] {
                Some(slot) => slot,
                None => {
                    // n1 is the lowest member of a new island
                    let members: Vec<usize> =
                        (0..n).filter(|&m| m == n1 || paths[(n1, m)] != 0.0).collect();
                    let slot = islands.len();
                    for &m in &members {
                        island_of[m] = Some(slot);
                    }
                    let nodes = members.iter().map(|&m| self.convert(m, ids)).collect();
                    islands.push(IslandStat::new(self.convert(n1, ids), nodes));
                    slot
                }
            };
            islands[slot].record(neighbors);
        }
        islands
    }

    /// Per-node connectivity read off the path-length and tagset matrices
    /// for every active node, ordered by id
    pub fn connect_stats_from_distance_matrix(&self, ids: IdSpace) -> Vec<NodeConnectStat> {
        let derived = self.derived();
        let paths = derived.matrix(DistanceType::PathLength);
        let tagsets = derived.matrix(DistanceType::TagsetJaccard);
        let n = self.node_count;
        let mut stats = Vec::new();

        for n1 in (0..n).filter(|&rc| self.is_active(rc)) {
            let mut not_connected = 0;
            let mut indirect = 0;
            let mut neighbors = NeighborDistances::new();
            for n2 in (0..n).filter(|&rc| rc != n1 && self.is_active(rc)) {
                let path = paths[(n1, n2)];
                if path == 0.0 {
                    not_connected += 1;
                } else if path == 1.0 {
                    let common = derived.common.get(&NodePair::new(n1, n2)).copied().unwrap_or(0);
                    neighbors.push(self.convert(n2, ids), common, tagsets[(n1, n2)]);
                } else {
                    indirect += 1;
                }
            }
            stats.push(neighbors.into_stat(self.convert(n1, ids), not_connected, indirect, true));
        }
        stats
    }
}
