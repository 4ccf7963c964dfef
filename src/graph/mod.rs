//! Co-occurrence graph engine
//!
//! This module turns lists of co-occurring node ids into:
//! - pairwise occurrence counts and node participation
//! - incrementally maintained connected components
//! - path-length, itemset Jaccard and tagset Jaccard distance matrices
//! - summary statistics, histograms and connectivity reports

pub mod connectivity;
pub mod cooccurrence;
pub mod distance;
pub mod types;

use tagnet_graph_algorithms::MatrixError;
use thiserror::Error;

pub use cooccurrence::CoOccurrenceGraph;
pub use distance::DISTANCE_EPSILON;
pub use types::{DistanceErrorEntry, DistanceType, IdSpace, IslandStat, NodeConnectStat, StatsEntry};

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node {id} is outside the graph ({node_count} nodes)")]
    NodeOutOfRange { id: usize, node_count: usize },

    #[error("Graphs use different id offsets: {left} vs {right}")]
    OffsetMismatch { left: isize, right: isize },

    #[error("Matrix error: {0}")]
    Matrix(#[from] MatrixError),
}

pub type GraphResult<T> = Result<T, GraphError>;
