//! Connected components
//!
//! Incremental union-find over a fixed node range. Components grow as
//! co-occurrence lists are merged in and never split.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Union-Find with union by size and path compression
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
    /// Nodes that have been part of at least one union call
    member: Vec<bool>,
}

impl DisjointSet {
    pub fn new(size: usize) -> Self {
        DisjointSet {
            parent: (0..size).collect(),
            size: vec![1; size],
            member: vec![false; size],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Root of the set holding `i`, compressing the path on the way
    pub fn find(&mut self, i: usize) -> usize {
        let root = self.root(i);
        let mut curr = i;
        while self.parent[curr] != root {
            let next = self.parent[curr];
            self.parent[curr] = root;
            curr = next;
        }
        root
    }

    /// Root of the set holding `i` without modifying the structure
    pub fn root(&self, i: usize) -> usize {
        let mut curr = i;
        while self.parent[curr] != curr {
            curr = self.parent[curr];
        }
        curr
    }

    pub fn union(&mut self, i: usize, j: usize) -> usize {
        self.member[i] = true;
        self.member[j] = true;
        let root_i = self.find(i);
        let root_j = self.find(j);
        if root_i == root_j {
            return root_i;
        }

        let (big, small) = if self.size[root_i] >= self.size[root_j] {
            (root_i, root_j)
        } else {
            (root_j, root_i)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
        big
    }

    /// Merge every node of `nodes` into one set. A single node becomes a
    /// (possibly singleton) component of its own.
    pub fn union_all(&mut self, nodes: &[usize]) {
        let Some((&first, rest)) = nodes.split_first() else {
            return;
        };
        self.member[first] = true;
        for &node in rest {
            self.union(first, node);
        }
    }

    pub fn same_set(&self, i: usize, j: usize) -> bool {
        self.root(i) == self.root(j)
    }

    /// Whether `i` has been added to any component
    pub fn contains(&self, i: usize) -> bool {
        self.member.get(i).copied().unwrap_or(false)
    }

    /// Every component among member nodes. Each component is sorted
    /// ascending and components are ordered by their smallest node.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let n = self.parent.len();
        let mut slot_of_root: Vec<Option<usize>> = vec![None; n];
        let mut components: Vec<Vec<usize>> = Vec::new();

        // Ascending scan keeps members sorted and orders components by first member
        for i in 0..n {
            if !self.member[i] {
                continue;
            }
            let root = self.root(i);
            match slot_of_root[root] {
                Some(slot) => components[slot].push(i),
                None => {
                    slot_of_root[root] = Some(components.len());
                    components.push(vec![i]);
                }
            }
        }
        components
    }
}
