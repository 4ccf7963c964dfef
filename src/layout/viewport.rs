//! Mapping between display points and grid cells

use super::entries::NodeEntry;
use serde::{Deserialize, Serialize};

/// Smallest display units per grid cell
pub const MIN_SCALE_FACTOR: f64 = 10.0;
/// Hit-test radius in grid cells
pub const HIT_RADIUS: f64 = 5.0;

/// Display units per grid cell so the whole grid fits the display,
/// never below `MIN_SCALE_FACTOR`
pub fn scale_factor(grid_width: usize, grid_height: usize, display_width: f64, display_height: f64) -> f64 {
    let by_width = display_width / grid_width as f64;
    let by_height = display_height / grid_height as f64;
    MIN_SCALE_FACTOR.max(by_width.min(by_height))
}

/// Display transform: fit factor, user zoom and pan offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub factor: f64,
    pub zoom: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Viewport {
    /// Unzoomed, unpanned view fitting the grid to the display
    pub fn fit(grid_width: usize, grid_height: usize, display_width: f64, display_height: f64) -> Self {
        Viewport {
            factor: scale_factor(grid_width, grid_height, display_width, display_height),
            zoom: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Grid coordinates of a display point. Cells are centred, so the
    /// centre of cell (x, y) maps back to exactly (x, y).
    pub fn to_grid(&self, x: f64, y: f64) -> (f64, f64) {
        let adjusted_x = x / self.zoom - self.offset_x;
        let adjusted_y = y / self.zoom - self.offset_y;
        (adjusted_x / self.factor - 0.5, adjusted_y / self.factor - 0.5)
    }
}

/// Closest node within `HIT_RADIUS` of a grid point; on a tie the later
/// entry wins
pub fn nearest_node(nodes: &[NodeEntry], grid_x: f64, grid_y: f64) -> Option<&NodeEntry> {
    let mut best: Option<(&NodeEntry, f64)> = None;
    for node in nodes {
        let dx = grid_x - node.xpos as f64;
        let dy = grid_y - node.ypos as f64;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance >= HIT_RADIUS {
            continue;
        }
        match best {
            Some((_, best_distance)) if distance > best_distance => {}
            _ => best = Some((node, distance)),
        }
    }
    best.map(|(node, _)| node)
}
