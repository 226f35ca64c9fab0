//! Output types for k-nearest-neighbor queries.

/// One neighbor found by a k-nearest-neighbor query.
#[derive(Debug, PartialEq)]
pub struct Neighbor<'a, T> {
    item: &'a T,
    distance: f64,
}

impl<T> Clone for Neighbor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Neighbor<'_, T> {}

impl<'a, T> Neighbor<'a, T> {
    pub(crate) fn new(item: &'a T, distance: f64) -> Self {
        Self { item, distance }
    }

    /// The indexed item.
    pub fn item(&self) -> &'a T {
        self.item
    }

    /// Exact metric distance from the query.
    pub fn distance(&self) -> f64 {
        self.distance
    }
}

/// Result of a k-nearest-neighbor query.
///
/// Neighbors are sorted by ascending distance; ties keep the order in which
/// the search discovered them.
#[derive(Debug)]
pub struct KnnResult<'a, T> {
    neighbors: Vec<Neighbor<'a, T>>,
    /// Pairs taken off the priority queue.
    pairs_visited: usize,
    /// Child pairs discarded because their lower bound could not beat the
    /// current k-th distance.
    pairs_pruned: usize,
}

impl<'a, T> KnnResult<'a, T> {
    pub(crate) fn new(
        neighbors: Vec<Neighbor<'a, T>>,
        pairs_visited: usize,
        pairs_pruned: usize,
    ) -> Self {
        Self {
            neighbors,
            pairs_visited,
            pairs_pruned,
        }
    }

    pub(crate) fn empty() -> Self {
        Self::new(Vec::new(), 0, 0)
    }

    /// Returns the neighbors, nearest first.
    pub fn neighbors(&self) -> &[Neighbor<'a, T>] {
        &self.neighbors
    }

    /// Consumes the result, returning the neighbors.
    pub fn into_neighbors(self) -> Vec<Neighbor<'a, T>> {
        self.neighbors
    }

    /// Iterates over the neighbor items, nearest first.
    pub fn items(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.neighbors.iter().map(|n| n.item)
    }

    /// Returns the number of neighbors found.
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Returns true if no neighbors were found.
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Returns the number of pairs taken off the priority queue.
    pub fn pairs_visited(&self) -> usize {
        self.pairs_visited
    }

    /// Returns the number of child pairs discarded by pruning.
    pub fn pairs_pruned(&self) -> usize {
        self.pairs_pruned
    }
}
