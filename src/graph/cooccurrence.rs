//! Co-occurrence graph storage
//!
//! Nodes are identified by caller ids shifted by a fixed offset into the
//! zero-based rows/columns of the occurrence matrix. Lists are append-only:
//! every `add` bumps the version and leaves the derived distances stale
//! until the next query recomputes them.

use super::distance::Derived;
use super::GraphError;
use super::GraphResult;
use indexmap::IndexMap;
use std::sync::RwLock;
use tagnet_graph_algorithms::{DisjointSet, SymmetricMatrix};

/// Undirected graph of nodes that co-occur in lists
#[derive(Debug)]
pub struct CoOccurrenceGraph {
    pub(crate) node_count: usize,
    pub(crate) offset: isize,
    /// Lists holding both nodes of a pair; the diagonal is unused
    pub(crate) pair_occurs: SymmetricMatrix<i16>,
    /// Lists holding each node
    pub(crate) participation: Vec<usize>,
    pub(crate) lists_added: usize,
    /// Canonical (sorted, zero-based) list -> times added
    pub(crate) unique_lists: IndexMap<Vec<usize>, usize>,
    pub(crate) components: DisjointSet,
    pub(crate) version: u64,
    pub(crate) derived: RwLock<Derived>,
}

impl CoOccurrenceGraph {
    /// Create a graph over `node_count` nodes. `offset` is added to a caller
    /// id to get its row, e.g. -1 for 1-based tag ids.
    pub fn new(node_count: usize, offset: isize) -> Self {
        CoOccurrenceGraph {
            node_count,
            offset,
            pair_occurs: SymmetricMatrix::new(node_count),
            participation: vec![0; node_count],
            lists_added: 0,
            unique_lists: IndexMap::new(),
            components: DisjointSet::new(node_count),
            version: 0,
            derived: RwLock::new(Derived::empty(node_count)),
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn offset(&self) -> isize {
        self.offset
    }

    /// Bumped by every `add`
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Row/column of a caller id
    pub fn to_rc(&self, id: usize) -> GraphResult<usize> {
        let rc = id as isize + self.offset;
        if rc < 0 || rc as usize >= self.node_count {
            return Err(GraphError::NodeOutOfRange {
                id,
                node_count: self.node_count,
            });
        }
        Ok(rc as usize)
    }

    /// Caller id of a row/column
    pub fn to_id(&self, rc: usize) -> usize {
        (rc as isize - self.offset) as usize
    }

    /// Record one list of co-occurring nodes.
    ///
    /// Every id is checked before anything is modified, so a rejected list
    /// leaves the graph untouched. Duplicate ids count once.
    pub fn add<I>(&mut self, ids: I) -> GraphResult<()>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut list = ids
            .into_iter()
            .map(|id| self.to_rc(id))
            .collect::<GraphResult<Vec<usize>>>()?;
        list.sort_unstable();
        list.dedup();

        for (i, &row) in list.iter().enumerate() {
            self.participation[row] += 1;
            for &column in &list[i + 1..] {
                let cell = &mut self.pair_occurs[(row, column)];
                *cell = cell.saturating_add(1);
            }
        }

        self.components.union_all(&list);
        self.lists_added += 1;
        *self.unique_lists.entry(list).or_insert(0) += 1;
        self.version += 1;
        Ok(())
    }

    /// Fold every list recorded by `other` into this graph, as if each had
    /// been added here. Both graphs must have the same size and offset.
    pub fn merge(&mut self, other: &CoOccurrenceGraph) -> GraphResult<()> {
        if self.offset != other.offset {
            return Err(GraphError::OffsetMismatch {
                left: self.offset,
                right: other.offset,
            });
        }
        self.pair_occurs.combine(&other.pair_occurs, i16::saturating_add)?;

        for (count, &added) in self.participation.iter_mut().zip(&other.participation) {
            *count += added;
        }
        for (list, &count) in &other.unique_lists {
            self.components.union_all(list);
            *self.unique_lists.entry(list.clone()).or_insert(0) += count;
        }
        self.lists_added += other.lists_added;
        self.version += 1;
        Ok(())
    }

    /// Number of lists holding `id`
    pub fn participation(&self, id: usize) -> GraphResult<usize> {
        Ok(self.participation[self.to_rc(id)?])
    }

    /// Number of distinct nodes `id` co-occurred with (its degree)
    pub fn co_occurring_count(&self, id: usize) -> GraphResult<usize> {
        Ok(self.degree(self.to_rc(id)?))
    }

    /// Lists holding both `a` and `b`
    pub fn pair_occurrences(&self, a: usize, b: usize) -> GraphResult<usize> {
        let (ra, rb) = (self.to_rc(a)?, self.to_rc(b)?);
        if ra == rb {
            return Ok(0);
        }
        Ok(self.pair_occurs[(ra, rb)] as usize)
    }

    pub fn lists_added(&self) -> usize {
        self.lists_added
    }

    /// Number of distinct lists added
    pub fn unique_lists(&self) -> usize {
        self.unique_lists.len()
    }

    /// Times a list with exactly these ids was added
    pub fn list_occurrences<I>(&self, ids: I) -> GraphResult<usize>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut list = ids
            .into_iter()
            .map(|id| self.to_rc(id))
            .collect::<GraphResult<Vec<usize>>>()?;
        list.sort_unstable();
        list.dedup();
        Ok(self.unique_lists.get(&list).copied().unwrap_or(0))
    }

    /// Distinct lists in first-seen order, with caller ids and counts
    pub fn lists(&self) -> Vec<(Vec<usize>, usize)> {
        self.unique_lists
            .iter()
            .map(|(list, &count)| (list.iter().map(|&rc| self.to_id(rc)).collect(), count))
            .collect()
    }

    /// Connected components in caller ids, each sorted, ordered by lowest id
    pub fn components(&self) -> Vec<Vec<usize>> {
        self.components
            .components()
            .into_iter()
            .map(|component| component.into_iter().map(|rc| self.to_id(rc)).collect())
            .collect()
    }

    /// Whether the row/column appeared in any list
    pub(crate) fn is_active(&self, rc: usize) -> bool {
        self.participation[rc] > 0
    }

    pub(crate) fn adjacent(&self, a: usize, b: usize) -> bool {
        a != b && self.pair_occurs[(a, b)] > 0
    }

    pub(crate) fn degree(&self, rc: usize) -> usize {
        (0..self.node_count).filter(|&m| self.adjacent(rc, m)).count()
    }
}
