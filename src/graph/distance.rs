//! Derived distance matrices
//!
//! Direct neighbors get a path length of 1 and Jaccard distances computed
//! from the occurrence data. Every other reachable pair is filled in by
//! bounded min-plus relaxation within its connected component. A stored
//! zero means "no path".

use super::cooccurrence::CoOccurrenceGraph;
use super::types::{DistanceErrorEntry, DistanceType, StatsEntry};
use super::GraphResult;
use rustc_hash::FxHashMap;
use std::sync::{PoisonError, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;
use tagnet_graph_algorithms::{relax_component, NodePair, RunningStats, SymmetricMatrix};
use tracing::debug;

/// Smallest stored distance, so a direct pair never reads as "no path".
/// This is the smallest normal `f32`, not the smallest subnormal
/// (`f32::from_bits(1)`); only its being positive matters.
pub const DISTANCE_EPSILON: f32 = f32::MIN_POSITIVE;

/// Everything computed from the occurrence data, tagged with the graph
/// version it was computed for
#[derive(Debug)]
pub(crate) struct Derived {
    pub(crate) version: Option<u64>,
    /// Indexed by `DistanceType::index`
    pub(crate) matrices: Vec<SymmetricMatrix<f32>>,
    pub(crate) stats: [StatsEntry; 3],
    /// Common neighbors of each directly connected pair (rows/columns)
    pub(crate) common: FxHashMap<NodePair, usize>,
}

impl Derived {
    pub(crate) fn empty(node_count: usize) -> Self {
        Derived {
            version: None,
            matrices: DistanceType::ALL.iter().map(|_| SymmetricMatrix::new(node_count)).collect(),
            stats: [StatsEntry::default(); 3],
            common: FxHashMap::default(),
        }
    }

    pub(crate) fn matrix(&self, typ: DistanceType) -> &SymmetricMatrix<f32> {
        &self.matrices[typ.index()]
    }
}

/// Read access to an up-to-date `Derived`
pub(crate) enum DerivedGuard<'a> {
    Read(RwLockReadGuard<'a, Derived>),
    Write(RwLockWriteGuard<'a, Derived>),
}

impl std::ops::Deref for DerivedGuard<'_> {
    type Target = Derived;

    fn deref(&self) -> &Derived {
        match self {
            DerivedGuard::Read(guard) => guard,
            DerivedGuard::Write(guard) => guard,
        }
    }
}

impl CoOccurrenceGraph {
    /// Derived state for the current version, recomputing it if stale
    pub(crate) fn derived(&self) -> DerivedGuard<'_> {
        let guard = self.derived.read().unwrap_or_else(PoisonError::into_inner);
        if guard.version == Some(self.version) {
            return DerivedGuard::Read(guard);
        }
        drop(guard);

        let mut guard = self.derived.write().unwrap_or_else(PoisonError::into_inner);
        // Another reader may have finished the recompute while we waited
        if guard.version != Some(self.version) {
            *guard = self.compute_derived();
        }
        DerivedGuard::Write(guard)
    }

    fn compute_derived(&self) -> Derived {
        let start = Instant::now();
        let n = self.node_count;
        let mut derived = Derived::empty(n);
        let components = self.components.components();

        // 1. Direct pairs
        for component in &components {
            for (i, &a) in component.iter().enumerate() {
                for &b in &component[i + 1..] {
                    if !self.adjacent(a, b) {
                        continue;
                    }
                    let occurs = self.pair_occurs[(a, b)] as usize;
                    let union = self.participation[a] + self.participation[b] - occurs;
                    let similarity = occurs as f32 / union as f32;
                    let (both, either) = self.neighbor_overlap(component, a, b);

                    derived.matrices[DistanceType::PathLength.index()][(a, b)] = 1.0;
                    derived.matrices[DistanceType::ItemsetJaccard.index()][(a, b)] =
                        (1.0 - similarity).max(DISTANCE_EPSILON);
                    derived.matrices[DistanceType::TagsetJaccard.index()][(a, b)] =
                        (1.0 - both as f32 / either as f32).max(DISTANCE_EPSILON);
                    derived.common.insert(NodePair::new(a, b), both);
                }
            }
        }

        // 2. Indirect pairs
        let max_passes = n.saturating_sub(2);
        let mut passes = 0;
        for component in &components {
            passes = passes.max(relax_component(component, &mut derived.matrices, max_passes));
        }

        // 3. Summary statistics over active pairs
        for typ in DistanceType::ALL {
            let matrix = derived.matrix(typ);
            let stats: RunningStats = self
                .active_pairs()
                .map(|(a, b)| matrix[(a, b)] as f64)
                .collect();
            derived.stats[typ.index()] = summarize(0, &stats);
        }

        derived.version = Some(self.version);
        debug!(
            version = self.version,
            components = components.len(),
            passes,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "recomputed distances"
        );
        derived
    }

    /// (|common neighbors|, |union of neighbors|) of `a` and `b` within
    /// their component, each endpoint counting as its own neighbor
    pub(crate) fn neighbor_overlap(&self, component: &[usize], a: usize, b: usize) -> (usize, usize) {
        let mut both = 0;
        let mut either = 0;
        for &column in component {
            let near_a = column == a || self.adjacent(a, column);
            let near_b = column == b || self.adjacent(b, column);
            if near_a && near_b {
                both += 1;
                either += 1;
            } else if near_a || near_b {
                either += 1;
            }
        }
        (both, either)
    }

    /// Unordered pairs of rows/columns that both appear in some list
    pub(crate) fn active_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.node_count;
        (0..n)
            .filter(move |&a| self.is_active(a))
            .flat_map(move |a| (a + 1..n).filter(move |&b| self.is_active(b)).map(move |b| (a, b)))
    }

    /// Distance between two caller ids; `f32::INFINITY` when no path is
    /// recorded, which includes a node and itself
    pub fn distance(&self, typ: DistanceType, id1: usize, id2: usize) -> GraphResult<f32> {
        let (a, b) = (self.to_rc(id1)?, self.to_rc(id2)?);
        let value = self.derived().matrix(typ)[(a, b)];
        Ok(if value > 0.0 { value } else { f32::INFINITY })
    }

    /// Summary of a metric over all pairs of active nodes
    pub fn distance_stats(&self, typ: DistanceType) -> StatsEntry {
        self.derived().stats[typ.index()]
    }

    /// Copy of a derived distance matrix (rows/columns, zero = no path)
    pub fn distance_matrix(&self, typ: DistanceType) -> SymmetricMatrix<f32> {
        self.derived().matrix(typ).clone()
    }

    /// Common neighbor count for every directly connected pair, keyed by
    /// row/column pair
    pub fn num_common_tags(&self) -> FxHashMap<NodePair, usize> {
        self.derived().common.clone()
    }

    /// Equal-width histogram of a metric over active pairs, bins numbered
    /// from 1
    pub fn histogram(&self, typ: DistanceType, bins: usize) -> Vec<StatsEntry> {
        if bins == 0 {
            return Vec::new();
        }
        let derived = self.derived();
        let base = derived.stats[typ.index()];
        if base.count == 0 {
            return (1..=bins).map(|id| StatsEntry { id, ..StatsEntry::default() }).collect();
        }

        let interval = if base.high_bound == base.low_bound {
            1.0 / bins as f32
        } else {
            (base.high_bound - base.low_bound) / bins as f32
        };

        let mut bounds = Vec::with_capacity(bins + 1);
        bounds.push(base.low_bound);
        for i in 1..bins {
            bounds.push(bounds[i - 1] + interval);
        }
        bounds.push(base.high_bound);

        let mut accumulators = vec![RunningStats::new(); bins];
        let matrix = derived.matrix(typ);
        for (a, b) in self.active_pairs() {
            let value = matrix[(a, b)];
            let raw = ((value - base.low_bound) / interval) as isize;
            let slot = raw.clamp(0, bins as isize - 1) as usize;
            accumulators[slot].push(value as f64);
        }

        accumulators
            .iter()
            .enumerate()
            .map(|(i, stats)| StatsEntry {
                id: i + 1,
                low_bound: bounds[i],
                high_bound: bounds[i + 1],
                count: stats.count(),
                mean: stats.mean(),
                std: stats.std_dev(),
            })
            .collect()
    }

    /// Pairs that never co-occurred whose stored distance is not the
    /// minimum over intermediates `d(a, m) + d(b, m)`
    pub fn validate_distance_matrix(&self, typ: DistanceType) -> Vec<DistanceErrorEntry> {
        let derived = self.derived();
        let matrix = derived.matrix(typ);
        let n = self.node_count;
        let mut errors = Vec::new();

        for a in 0..n {
            for b in a + 1..n {
                if self.adjacent(a, b) {
                    continue;
                }
                let minimum = (0..n)
                    .filter(|&m| m != a && m != b && matrix[(a, m)] != 0.0 && matrix[(b, m)] != 0.0)
                    .map(|m| matrix[(a, m)] + matrix[(b, m)])
                    .fold(None, |best: Option<f32>, via| Some(best.map_or(via, |current| current.min(via))));
                if let Some(minimum) = minimum {
                    let recorded = matrix[(a, b)];
                    if recorded != minimum {
                        errors.push(DistanceErrorEntry {
                            pair: NodePair::new(a, b),
                            recorded,
                            minimum,
                        });
                    }
                }
            }
        }
        errors
    }
}

fn summarize(id: usize, stats: &RunningStats) -> StatsEntry {
    StatsEntry {
        id,
        low_bound: stats.min().unwrap_or(0.0) as f32,
        high_bound: stats.max().unwrap_or(0.0) as f32,
        count: stats.count(),
        mean: stats.mean(),
        std: stats.std_dev(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 0.005;

    fn graph_from(n: usize, lists: &[&[usize]]) -> CoOccurrenceGraph {
        let mut graph = CoOccurrenceGraph::new(n, 0);
        for list in lists {
            graph.add(list.iter().copied()).unwrap();
        }
        graph
    }

    #[test]
    fn test_direct_distances() {
        let graph = graph_from(3, &[&[0, 1], &[0, 1], &[1, 2]]);
        assert_eq!(graph.distance(DistanceType::PathLength, 0, 1).unwrap(), 1.0);
        // 2 shared lists out of 3
        let d = graph.distance(DistanceType::ItemsetJaccard, 0, 1).unwrap();
        assert!((d - 1.0 / 3.0).abs() < TOLERANCE);
        // 1 shared list out of 3
        let d = graph.distance(DistanceType::ItemsetJaccard, 1, 2).unwrap();
        assert!((d - 2.0 / 3.0).abs() < TOLERANCE);
        // neighbors(0) = {0,1}, neighbors(1) = {0,1,2}
        let d = graph.distance(DistanceType::TagsetJaccard, 0, 1).unwrap();
        assert!((d - 1.0 / 3.0).abs() < TOLERANCE);
        assert_eq!(graph.num_common_tags()[&NodePair::new(0, 1)], 2);
    }

    #[test]
    fn test_identical_item_sets_stay_positive() {
        let graph = graph_from(2, &[&[0, 1], &[0, 1]]);
        assert_eq!(
            graph.distance(DistanceType::ItemsetJaccard, 0, 1).unwrap(),
            DISTANCE_EPSILON
        );
        assert_eq!(
            graph.distance(DistanceType::TagsetJaccard, 0, 1).unwrap(),
            DISTANCE_EPSILON
        );
    }

    #[test]
    fn test_indirect_and_missing() {
        let graph = graph_from(5, &[&[0, 1], &[1, 2], &[3]]);
        assert_eq!(graph.distance(DistanceType::PathLength, 0, 2).unwrap(), 2.0);
        assert_eq!(graph.distance(DistanceType::PathLength, 0, 3).unwrap(), f32::INFINITY);
        assert_eq!(graph.distance(DistanceType::PathLength, 1, 1).unwrap(), f32::INFINITY);
        assert!(graph.distance(DistanceType::PathLength, 0, 9).is_err());
    }

    #[test]
    fn test_stats_cover_active_pairs() {
        // Node 4 never appears; 3 is active but unconnected
        let graph = graph_from(5, &[&[0, 1], &[1, 2], &[3]]);
        let stats = graph.distance_stats(DistanceType::PathLength);
        // Pairs among {0,1,2,3}
        assert_eq!(stats.count, 6);
        assert_eq!(stats.low_bound, 0.0);
        assert_eq!(stats.high_bound, 2.0);
        assert!((stats.mean - 4.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_recompute_after_add() {
        let mut graph = graph_from(4, &[&[0, 1], &[2, 3]]);
        assert_eq!(graph.distance(DistanceType::PathLength, 0, 3).unwrap(), f32::INFINITY);
        graph.add([1, 2]).unwrap();
        assert_eq!(graph.distance(DistanceType::PathLength, 0, 3).unwrap(), 3.0);
        assert_eq!(graph.distance_stats(DistanceType::PathLength).high_bound, 3.0);
    }

    #[test]
    fn test_histogram_bins() {
        let graph = graph_from(4, &[&[0, 1], &[1, 2], &[2, 3]]);
        // Path lengths: three 1s, two 2s, one 3
        let bins = graph.histogram(DistanceType::PathLength, 2);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].id, 1);
        assert_eq!(bins[0].low_bound, 1.0);
        assert_eq!(bins[0].high_bound, 2.0);
        assert_eq!(bins[1].high_bound, 3.0);
        assert_eq!(bins[0].count, 3);
        assert_eq!(bins[1].count, 3);
        assert!(graph.histogram(DistanceType::PathLength, 0).is_empty());
    }

    #[test]
    fn test_histogram_single_value() {
        let graph = graph_from(2, &[&[0, 1]]);
        let bins = graph.histogram(DistanceType::PathLength, 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 1);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[0].low_bound, 1.0);
        assert_eq!(bins[3].high_bound, 1.0);
    }

    #[test]
    fn test_empty_graph() {
        let graph = CoOccurrenceGraph::new(0, 0);
        let stats = graph.distance_stats(DistanceType::TagsetJaccard);
        assert_eq!(stats.count, 0);
        let bins = graph.histogram(DistanceType::TagsetJaccard, 3);
        assert_eq!(bins.len(), 3);
        assert!(bins.iter().all(|b| b.count == 0 && b.low_bound == 0.0 && b.high_bound == 0.0));
        assert!(graph.validate_distance_matrix(DistanceType::PathLength).is_empty());
    }

    #[test]
    fn test_validate_detects_tampering() {
        let graph = graph_from(3, &[&[0, 1], &[1, 2]]);
        assert!(graph.validate_distance_matrix(DistanceType::PathLength).is_empty());
        {
            let mut derived = graph.derived.write().unwrap();
            derived.matrices[DistanceType::PathLength.index()][(0, 2)] = 5.0;
        }
        let errors = graph.validate_distance_matrix(DistanceType::PathLength);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].pair, NodePair::new(0, 2));
        assert_eq!(errors[0].recorded, 5.0);
        assert_eq!(errors[0].minimum, 2.0);
    }
}
