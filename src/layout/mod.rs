//! Grid layout of a co-occurrence network
//!
//! A `NetworkLayout` snapshots the island and node statistics of a graph
//! when it is built and never reads the graph again. Islands are laid out
//! left to right; large islands are split into regions around their best
//! connected nodes; nodes fill their region's box column by column.
//!
//! The island/region/node/edge collections are computed together on first
//! access and stay frozen for the life of the layout. Rebuild the layout
//! to reflect a changed graph.

pub mod entries;
pub mod placement;
pub mod regions;
pub mod viewport;

pub use entries::{EdgeEntry, IslandEntry, NodeEntry, RegionEntry};
pub use placement::GridSize;
pub use regions::{RegionMembers, RegionSplit};
pub use viewport::{scale_factor, Viewport};

use crate::generator::Tag;
use crate::graph::{CoOccurrenceGraph, IslandStat, NodeConnectStat};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::{debug, info};

/// Layout tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Columns per row of the overall grid
    pub aspect_ratio: f64,
    /// Empty cells around the grid
    pub margin: usize,
    /// Islands this large get extra columns; also the target region size
    pub min_split_threshold: usize,
    /// Islands below this size are never split; also the region capacity
    pub max_split_threshold: usize,
    /// Smallest degree a region seed may have
    pub seed_min_degree: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 2.5,
            margin: 1,
            min_split_threshold: 20,
            max_split_threshold: 50,
            seed_min_degree: 3,
        }
    }
}

/// Frozen result of a layout pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub width: usize,
    pub height: usize,
    pub islands: Vec<IslandEntry>,
    pub regions: Vec<RegionEntry>,
    pub nodes: Vec<NodeEntry>,
    pub edges: Vec<EdgeEntry>,
}

#[derive(Debug)]
pub struct NetworkLayout {
    config: LayoutConfig,
    tags: FxHashMap<usize, Tag>,
    island_stats: Vec<IslandStat>,
    node_stats: BTreeMap<usize, NodeConnectStat>,
    num_nodes: usize,
    grid: GridSize,
    snapshot: OnceLock<LayoutSnapshot>,
}

impl NetworkLayout {
    pub fn new(graph: &CoOccurrenceGraph, tags: &[Tag], config: LayoutConfig) -> Self {
        let island_stats = graph.island_stats();
        let node_stats = graph
            .node_connect_stats()
            .into_iter()
            .map(|stat| (stat.id, stat))
            .collect();
        let num_nodes = island_stats.iter().map(IslandStat::size).sum();
        let grid = GridSize::for_nodes(num_nodes, config.aspect_ratio);
        debug!(num_nodes, cols = grid.cols, rows = grid.rows, "layout grid");

        NetworkLayout {
            config,
            tags: tags.iter().map(|tag| (tag.id, tag.clone())).collect(),
            island_stats,
            node_stats,
            num_nodes,
            grid,
            snapshot: OnceLock::new(),
        }
    }

    pub fn with_defaults(graph: &CoOccurrenceGraph, tags: &[Tag]) -> Self {
        Self::new(graph, tags, LayoutConfig::default())
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Nodes that belong to an island
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Grid columns including margins
    pub fn width(&self) -> usize {
        self.snapshot().width
    }

    /// Grid rows including margins
    pub fn height(&self) -> usize {
        self.snapshot().height
    }

    pub fn islands(&self) -> &[IslandEntry] {
        &self.snapshot().islands
    }

    pub fn regions(&self) -> &[RegionEntry] {
        &self.snapshot().regions
    }

    /// Nodes ordered by id
    pub fn nodes(&self) -> &[NodeEntry] {
        &self.snapshot().nodes
    }

    /// Edges ordered by node pair
    pub fn edges(&self) -> &[EdgeEntry] {
        &self.snapshot().edges
    }

    /// Compute all collections now. Later calls are no-ops.
    pub fn cache_results(&self) -> &LayoutSnapshot {
        self.snapshot()
    }

    /// Tag metadata captured at construction
    pub fn tag(&self, id: usize) -> Option<&Tag> {
        self.tags.get(&id)
    }

    pub fn node(&self, id: usize) -> Option<&NodeEntry> {
        let nodes = self.nodes();
        nodes.binary_search_by_key(&id, |node| node.id).ok().map(|i| &nodes[i])
    }

    /// Node under a display point, if one lies within the hit radius
    pub fn node_at(&self, view: &Viewport, x: f64, y: f64) -> Option<&NodeEntry> {
        let (grid_x, grid_y) = view.to_grid(x, y);
        viewport::nearest_node(self.nodes(), grid_x, grid_y)
    }

    fn snapshot(&self) -> &LayoutSnapshot {
        self.snapshot.get_or_init(|| self.compute())
    }

    fn compute(&self) -> LayoutSnapshot {
        let config = &self.config;
        let margin = config.margin;
        let rows = self.grid.rows;

        // 1. Island slices and region membership
        let mut islands = Vec::with_capacity(self.island_stats.len());
        let mut splits = Vec::with_capacity(self.island_stats.len());
        for stat in &self.island_stats {
            let (min_regions, max_regions) = regions::region_limits(stat, &self.node_stats, config);
            let split = regions::split_island(&stat.nodes, &self.node_stats, min_regions, max_regions, config);
            if max_regions > 1 && split == RegionSplit::Single {
                debug!(island = stat.id, size = stat.size(), "region split fell back to a single region");
            }
            islands.push(IslandEntry {
                id: stat.id,
                nodes: stat.nodes.clone(),
                width: placement::island_slice_width(stat.size(), self.num_nodes, self.grid, config),
                height: rows,
                xpos: 0,
                ypos: margin,
                min_regions,
                max_regions,
                max_adjacent: stat.max_adjacent,
            });
            splits.push(split);
        }

        // 2. Region boxes, islands left to right
        let mut all_regions = Vec::new();
        let mut x = margin;
        for (island, split) in islands.iter_mut().zip(splits) {
            island.xpos = x;
            let mut island_regions = match split {
                RegionSplit::Single => vec![RegionEntry {
                    id: island.id,
                    island_id: island.id,
                    interior_nodes: island.nodes.clone(),
                    exterior_nodes: Default::default(),
                    width: island.width,
                    height: rows,
                    xpos: 0,
                    ypos: 0,
                }],
                RegionSplit::Split(members) => members
                    .into_iter()
                    .map(|region| RegionEntry {
                        id: region.seed,
                        island_id: island.id,
                        width: placement::region_width(region.members.len(), island.size(), island.width, rows),
                        height: rows,
                        xpos: 0,
                        ypos: 0,
                        exterior_nodes: regions::exterior_of(&region.members, &self.node_stats),
                        interior_nodes: region.members,
                    })
                    .collect(),
            };
            placement::arrange_regions(island, &mut island_regions);
            x += island.width;
            all_regions.extend(island_regions);
        }

        // 3. Nodes and edges
        let mut nodes: Vec<NodeEntry> = all_regions
            .iter()
            .flat_map(|region| placement::place_nodes(region, &self.node_stats))
            .collect();
        nodes.sort_by_key(|node| node.id);
        let edges = placement::build_edges(&nodes, &self.node_stats);

        let snapshot = LayoutSnapshot {
            width: x + margin,
            height: rows + 2 * margin,
            islands,
            regions: all_regions,
            nodes,
            edges,
        };
        info!(
            islands = snapshot.islands.len(),
            regions = snapshot.regions.len(),
            width = snapshot.width,
            height = snapshot.height,
            "network layout computed"
        );
        snapshot
    }
}
