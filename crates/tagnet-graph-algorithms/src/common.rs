//! Shared identifier types for graph algorithms

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// An unordered pair of nodes stored in canonical (low, high) order.
///
/// Usable as a map key for anything keyed by an undirected edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodePair {
    pub n1: usize,
    pub n2: usize,
}

impl NodePair {
    pub fn new(a: usize, b: usize) -> Self {
        if a > b {
            NodePair { n1: b, n2: a }
        } else {
            NodePair { n1: a, n2: b }
        }
    }

    /// The endpoint that is not `node`, if `node` is one of the pair
    pub fn other(&self, node: usize) -> Option<usize> {
        if node == self.n1 {
            Some(self.n2)
        } else if node == self.n2 {
            Some(self.n1)
        } else {
            None
        }
    }
}

impl From<(usize, usize)> for NodePair {
    fn from((a, b): (usize, usize)) -> Self {
        NodePair::new(a, b)
    }
}

impl fmt::Display for NodePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.n1, self.n2)
    }
}
