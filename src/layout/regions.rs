//! Splitting large islands into regions
//!
//! Seeds are the best-connected nodes of an island. Every other node joins
//! the region of its nearest seed (tagset distance), or failing a seed
//! neighbor, the region of its nearest already placed neighbor. A split
//! that cannot place every node falls back to a single region.

use super::placement::div_ceil;
use super::LayoutConfig;
use crate::graph::{IslandStat, NodeConnectStat};
use std::collections::{BTreeMap, BTreeSet};

/// Outcome of splitting one island
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionSplit {
    /// One region covering the whole island
    Single,
    /// Regions ordered by seed id
    Split(Vec<RegionMembers>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMembers {
    pub seed: usize,
    pub members: BTreeSet<usize>,
}

/// (min_regions, max_regions) for an island
pub fn region_limits(
    island: &IslandStat,
    stats: &BTreeMap<usize, NodeConnectStat>,
    config: &LayoutConfig,
) -> (usize, usize) {
    let size = island.size();
    if size < config.max_split_threshold {
        return (1, 1);
    }

    let needed = div_ceil(size, config.max_split_threshold);
    let candidates = island
        .nodes
        .iter()
        .filter(|id| degree(stats, **id) >= config.seed_min_degree)
        .count();
    if candidates < needed {
        return (1, 1);
    }

    let max_regions = island.num_with_max.max(div_ceil(size, config.min_split_threshold));
    let min_regions = max_regions.min(needed);
    (min_regions, max_regions)
}

fn degree(stats: &BTreeMap<usize, NodeConnectStat>, id: usize) -> usize {
    stats.get(&id).map_or(0, |stat| stat.num_adjacent)
}

/// Highest degree threshold whose seed count falls within the limits
fn select_seeds(
    nodes: &BTreeSet<usize>,
    stats: &BTreeMap<usize, NodeConnectStat>,
    min_regions: usize,
    max_regions: usize,
    seed_min_degree: usize,
) -> Option<Vec<usize>> {
    let thresholds: BTreeSet<usize> = nodes
        .iter()
        .map(|&id| degree(stats, id))
        .filter(|&d| d >= seed_min_degree)
        .collect();

    for &threshold in thresholds.iter().rev() {
        let seeds: Vec<usize> = nodes
            .iter()
            .copied()
            .filter(|&id| degree(stats, id) >= threshold)
            .collect();
        if seeds.len() > max_regions {
            // Lower thresholds only add seeds
            return None;
        }
        if seeds.len() >= min_regions {
            return Some(seeds);
        }
    }
    None
}

/// Nearest candidate by tagset distance, ties to the lower id
fn nearest<I>(stat: &NodeConnectStat, candidates: I) -> Option<usize>
where
    I: IntoIterator<Item = usize>,
{
    let mut best: Option<(usize, f32)> = None;
    for candidate in candidates {
        let Some(&distance) = stat.adj_tagset_distance.get(&candidate) else {
            continue;
        };
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }
    best.map(|(id, _)| id)
}

/// Split an island with room for more than one region
pub fn split_island(
    nodes: &BTreeSet<usize>,
    stats: &BTreeMap<usize, NodeConnectStat>,
    min_regions: usize,
    max_regions: usize,
    config: &LayoutConfig,
) -> RegionSplit {
    if max_regions <= 1 {
        return RegionSplit::Single;
    }
    let Some(seeds) = select_seeds(nodes, stats, min_regions, max_regions, config.seed_min_degree) else {
        return RegionSplit::Single;
    };

    let capacity = config.max_split_threshold;
    let mut region_of: BTreeMap<usize, usize> = seeds.iter().map(|&seed| (seed, seed)).collect();
    let mut sizes: BTreeMap<usize, usize> = seeds.iter().map(|&seed| (seed, 1)).collect();

    // 1. Nodes next to a seed join the nearest seed with room
    for &id in nodes {
        if region_of.contains_key(&id) {
            continue;
        }
        let Some(stat) = stats.get(&id) else { continue };
        let open_seeds = seeds.iter().copied().filter(|seed| sizes[seed] < capacity);
        if let Some(seed) = nearest(stat, open_seeds) {
            region_of.insert(id, seed);
            *sizes.entry(seed).or_insert(0) += 1;
        }
    }

    // 2. The rest follow their nearest placed neighbor until nothing moves
    loop {
        let mut changed = false;
        for &id in nodes {
            if region_of.contains_key(&id) {
                continue;
            }
            let Some(stat) = stats.get(&id) else { continue };
            let placed = stat
                .adj_nodes
                .iter()
                .copied()
                .filter(|adj| region_of.get(adj).is_some_and(|region| sizes[region] < capacity));
            if let Some(adj) = nearest(stat, placed) {
                let region = region_of[&adj];
                region_of.insert(id, region);
                *sizes.entry(region).or_insert(0) += 1;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    if region_of.len() < nodes.len() {
        return RegionSplit::Single;
    }

    let mut members: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
    for (id, seed) in region_of {
        members.entry(seed).or_default().insert(id);
    }
    RegionSplit::Split(
        members
            .into_iter()
            .map(|(seed, members)| RegionMembers { seed, members })
            .collect(),
    )
}

/// Neighbors of `members` that are not members themselves
pub fn exterior_of(members: &BTreeSet<usize>, stats: &BTreeMap<usize, NodeConnectStat>) -> BTreeSet<usize> {
    members
        .iter()
        .filter_map(|id| stats.get(id))
        .flat_map(|stat| stat.adj_nodes.iter().copied())
        .filter(|adj| !members.contains(adj))
        .collect()
}
