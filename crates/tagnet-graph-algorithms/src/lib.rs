pub mod common;
pub mod community;
pub mod matrix;
pub mod pathfinding;
pub mod stats;

pub use common::NodePair;
pub use community::DisjointSet;
pub use matrix::{MatrixError, MatrixResult, SymmetricMatrix};
pub use pathfinding::relax_component;
pub use stats::RunningStats;
