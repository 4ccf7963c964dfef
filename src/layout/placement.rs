//! Grid geometry: island slices, region boxes and node positions

use super::entries::{EdgeEntry, IslandEntry, NodeEntry, RegionEntry};
use super::LayoutConfig;
use crate::graph::NodeConnectStat;
use std::collections::{BTreeMap, BTreeSet};
use tagnet_graph_algorithms::NodePair;

/// Columns and rows for `num_nodes` nodes at the configured aspect ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub cols: usize,
    pub rows: usize,
}

impl GridSize {
    pub fn for_nodes(num_nodes: usize, aspect_ratio: f64) -> Self {
        if num_nodes == 0 || aspect_ratio <= 0.0 {
            return GridSize { cols: 0, rows: 0 };
        }
        let n = num_nodes as f64;
        GridSize {
            cols: (n * aspect_ratio).sqrt().ceil() as usize,
            rows: (n / aspect_ratio).sqrt().ceil() as usize,
        }
    }
}

pub(crate) fn div_ceil(a: usize, b: usize) -> usize {
    if b == 0 {
        0
    } else {
        (a + b - 1) / b
    }
}

/// Columns allotted to an island of `size` nodes
pub fn island_slice_width(size: usize, num_nodes: usize, grid: GridSize, config: &LayoutConfig) -> usize {
    let proportional = div_ceil(size * grid.cols, num_nodes);
    let fitted = div_ceil(size, grid.rows);
    let padding = if config.min_split_threshold > 0 && size >= config.min_split_threshold {
        size / config.min_split_threshold
    } else {
        0
    };
    proportional.max(fitted) + padding
}

/// Columns for a region: its share of the island slice, widened until the
/// nodes fit column-major
pub fn region_width(region_size: usize, island_size: usize, island_width: usize, rows: usize) -> usize {
    let share = if island_size == 0 { 0 } else { island_width * region_size / island_size };
    share.max(div_ceil(region_size, rows)).max(1)
}

/// Place region members column-major inside the box, ascending id
pub fn place_nodes(region: &RegionEntry, stats: &BTreeMap<usize, NodeConnectStat>) -> Vec<NodeEntry> {
    let rows = region.height.max(1);
    region
        .interior_nodes
        .iter()
        .enumerate()
        .map(|(k, &id)| {
            let (interior_links, exterior_links): (BTreeSet<usize>, BTreeSet<usize>) = stats
                .get(&id)
                .map(|stat| stat.adj_nodes.iter().partition(|adj| region.interior_nodes.contains(*adj)))
                .unwrap_or_default();
            NodeEntry {
                id,
                region_id: region.id,
                island_id: region.island_id,
                interior_links,
                exterior_links,
                xpos: region.xpos + k / rows,
                ypos: region.ypos + k % rows,
            }
        })
        .collect()
}

/// One entry per adjacent pair, ordered by pair
pub fn build_edges(nodes: &[NodeEntry], stats: &BTreeMap<usize, NodeConnectStat>) -> Vec<EdgeEntry> {
    let by_id: BTreeMap<usize, &NodeEntry> = nodes.iter().map(|node| (node.id, node)).collect();
    let mut edges = Vec::new();
    for (&id, stat) in stats {
        let Some(n1) = by_id.get(&id) else { continue };
        for &adj in stat.adj_nodes.range(id + 1..) {
            let Some(n2) = by_id.get(&adj) else { continue };
            edges.push(EdgeEntry {
                pair: NodePair::new(id, adj),
                island_id: n1.island_id,
                n1_region: n1.region_id,
                n2_region: n2.region_id,
                n1_pos: (n1.xpos, n1.ypos),
                n2_pos: (n2.xpos, n2.ypos),
            });
        }
    }
    edges
}

/// Lay regions out left to right inside their island, widening the island
/// when the regions need more columns than its slice
pub fn arrange_regions(island: &mut IslandEntry, regions: &mut [RegionEntry]) {
    let mut x = island.xpos;
    for region in regions.iter_mut() {
        region.xpos = x;
        region.ypos = island.ypos;
        region.height = island.height;
        x += region.width;
    }
    island.width = island.width.max(x - island.xpos);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_size() {
        // sqrt(125) = 11.18, sqrt(20) = 4.47
        assert_eq!(GridSize::for_nodes(50, 2.5), GridSize { cols: 12, rows: 5 });
        assert_eq!(GridSize::for_nodes(10, 2.5), GridSize { cols: 5, rows: 2 });
        assert_eq!(GridSize::for_nodes(0, 2.5), GridSize { cols: 0, rows: 0 });
    }

    #[test]
    fn test_island_slice_width() {
        let config = LayoutConfig::default();
        let grid = GridSize::for_nodes(50, 2.5);
        // Whole grid: max(12, 10) + 50/20
        assert_eq!(island_slice_width(50, 50, grid, &config), 14);
        let grid = GridSize::for_nodes(15, 2.5);
        // cols 7, rows 3: max(ceil(9*7/15), ceil(9/3))
        assert_eq!(island_slice_width(9, 15, grid, &config), 5);
        assert_eq!(island_slice_width(3, 15, grid, &config), 2);
    }

    #[test]
    fn test_region_width() {
        assert_eq!(region_width(30, 60, 20, 5), 10);
        // 10 nodes in 5 rows need 2 columns
        assert_eq!(region_width(10, 100, 10, 5), 2);
        assert_eq!(region_width(1, 100, 10, 5), 1);
    }

    #[test]
    fn test_place_nodes_column_major() {
        let region = RegionEntry {
            id: 1,
            island_id: 1,
            interior_nodes: [1, 2, 3, 4, 5].into_iter().collect(),
            exterior_nodes: BTreeSet::new(),
            width: 2,
            height: 3,
            xpos: 4,
            ypos: 1,
        };
        let nodes = place_nodes(&region, &BTreeMap::new());
        let positions: Vec<(usize, usize)> = nodes.iter().map(|n| (n.xpos, n.ypos)).collect();
        assert_eq!(positions, vec![(4, 1), (4, 2), (4, 3), (5, 1), (5, 2)]);
    }

    #[test]
    fn test_arrange_regions_widens_island() {
        let mut island = IslandEntry {
            id: 1,
            nodes: (1..=12).collect(),
            width: 5,
            height: 2,
            xpos: 3,
            ypos: 1,
            min_regions: 2,
            max_regions: 2,
            max_adjacent: 4,
        };
        let region = |id: usize, width: usize| RegionEntry {
            id,
            island_id: 1,
            interior_nodes: BTreeSet::new(),
            exterior_nodes: BTreeSet::new(),
            width,
            height: 0,
            xpos: 0,
            ypos: 0,
        };
        let mut regions = vec![region(1, 3), region(7, 4)];
        arrange_regions(&mut island, &mut regions);

        assert_eq!((regions[0].xpos, regions[0].ypos, regions[0].height), (3, 1, 2));
        // Pushed right by the first region's width
        assert_eq!(regions[1].xpos, 6);
        assert_eq!(island.width, 7);
    }
}
