//! Exact k-nearest-neighbor search by best-first branch and bound.
//!
//! The search walks the tree with a min-priority queue of *boundable pairs*:
//! a tree node or entry paired with the query item, keyed by a lower bound on
//! the distance between the two. For an entry the bound is the exact metric
//! distance; for a node it is the separation between the node envelope and
//! the query envelope (0 if they overlap).
//!
//! ```text
//! queue <- (root, query)
//! loop pop min pair
//!   ├─ full result list and bound >= worst accepted -> stop
//!   ├─ entry -> insert by rank, drop the (k+1)-th, update worst
//!   └─ node  -> push each child whose bound < worst, discard the rest
//! ```
//!
//! The bound of a node never exceeds the distance of anything beneath it,
//! so neither the stop rule nor the discard rule can lose a true neighbor.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use sweights_geometry::{Coord, DistanceMethod, Envelope};

use crate::config::KnnQuery;
use crate::error::IndexError;
use crate::result::{KnnResult, Neighbor};
use crate::tree::{Children, SpatialIndex};

/// Distance metric between indexed items, with a matching envelope bound.
///
/// `lower_bound(a, b)` must never exceed `distance(x, y)` for any items `x`
/// and `y` whose envelopes lie inside `a` and `b` respectively. The default
/// bound is the Euclidean envelope separation, which is valid for any metric
/// that dominates Euclidean distance (Euclidean itself, Manhattan).
pub trait ItemDistance<T> {
    /// Exact distance between two items.
    fn distance(&self, a: &T, b: &T) -> f64;

    /// Lower bound on the distance between items inside two envelopes.
    fn lower_bound(&self, a: &Envelope, b: &Envelope) -> f64 {
        a.distance(b)
    }
}

/// [`ItemDistance`] for point items under a [`DistanceMethod`].
///
/// `locate` extracts the coordinate of an item. The envelope bound uses the
/// same method, which is tighter than the default for Manhattan.
#[derive(Debug, Clone, Copy)]
pub struct PointDistance<F> {
    method: DistanceMethod,
    locate: F,
}

impl<F> PointDistance<F> {
    /// Creates a point metric.
    pub fn new(method: DistanceMethod, locate: F) -> Self {
        Self { method, locate }
    }

    /// Returns the distance method.
    pub fn method(&self) -> DistanceMethod {
        self.method
    }
}

impl<T, F> ItemDistance<T> for PointDistance<F>
where
    F: Fn(&T) -> Coord<f64>,
{
    fn distance(&self, a: &T, b: &T) -> f64 {
        self.method.distance((self.locate)(a), (self.locate)(b))
    }

    fn lower_bound(&self, a: &Envelope, b: &Envelope) -> f64 {
        a.distance_with(b, self.method)
    }
}

/// The tree side of a boundable pair. The other side is always the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundable {
    Node(usize),
    Entry(usize),
}

#[derive(Debug, Clone, Copy)]
struct BoundablePair {
    side: Boundable,
    distance: f64,
    /// Push order; breaks distance ties first-in first-out.
    seq: u64,
}

impl PartialEq for BoundablePair {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BoundablePair {}

impl PartialOrd for BoundablePair {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed so that `BinaryHeap` (a max-heap) pops the smallest distance.
impl Ord for BoundablePair {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Mutable state of one search.
struct Search<'q> {
    queue: BinaryHeap<BoundablePair>,
    /// `(entry index, distance)` sorted by ascending distance.
    best: Vec<(usize, f64)>,
    worst: f64,
    seq: u64,
    k: usize,
    query: &'q KnnQuery,
    pruned: usize,
}

impl Search<'_> {
    fn offer(&mut self, side: Boundable, distance: f64) {
        if self.query.pruning() && distance >= self.worst {
            self.pruned += 1;
            return;
        }
        self.queue.push(BoundablePair {
            side,
            distance,
            seq: self.seq,
        });
        self.seq += 1;
    }

    fn accept(&mut self, entry: usize, distance: f64) {
        let pos = self.best.partition_point(|&(_, d)| d <= distance);
        self.best.insert(pos, (entry, distance));
        if self.best.len() > self.k {
            self.best.pop();
        }
        if self.best.len() == self.k {
            self.worst = self.best[self.k - 1].1;
        }
    }

    fn is_done(&self, pair: &BoundablePair) -> bool {
        self.query.pruning() && self.best.len() == self.k && pair.distance >= self.worst
    }
}

impl<T> SpatialIndex<T> {
    /// Finds the `query.k()` items nearest to `item` under `metric`.
    ///
    /// `envelope` is the query item's envelope, used for node lower bounds.
    /// The query item does not need to be in the index; if it is, it will be
    /// found at distance 0 like any other item, and callers that want to
    /// exclude it must ask for one extra neighbor.
    ///
    /// Returns fewer than `k` neighbors only when the index holds fewer than
    /// `k` items. An empty index yields an empty result.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidK`] if `k` is zero, or
    /// [`IndexError::NonFiniteQuery`] if `envelope` has a non-finite bound.
    pub fn k_nearest<'a, D>(
        &'a self,
        item: &T,
        envelope: &Envelope,
        metric: &D,
        query: &KnnQuery,
    ) -> Result<KnnResult<'a, T>, IndexError>
    where
        D: ItemDistance<T> + ?Sized,
    {
        query.validate()?;
        if !envelope.is_finite() {
            return Err(IndexError::NonFiniteQuery);
        }
        let Some(root) = self.root else {
            return Ok(KnnResult::empty());
        };

        let k = query.k();
        let mut search = Search {
            queue: BinaryHeap::new(),
            best: Vec::with_capacity(k + 1),
            worst: f64::INFINITY,
            seq: 0,
            k,
            query,
            pruned: 0,
        };
        search.offer(
            Boundable::Node(root),
            metric.lower_bound(&self.nodes[root].envelope, envelope),
        );

        let mut visited = 0;
        while let Some(pair) = search.queue.pop() {
            visited += 1;
            if search.is_done(&pair) {
                break;
            }
            match pair.side {
                Boundable::Entry(e) => search.accept(e, pair.distance),
                Boundable::Node(n) => match &self.nodes[n].children {
                    Children::Nodes(range) => {
                        for child in range.clone() {
                            let bound = metric.lower_bound(&self.nodes[child].envelope, envelope);
                            search.offer(Boundable::Node(child), bound);
                        }
                    }
                    Children::Entries(range) => {
                        for e in range.clone() {
                            let d = metric.distance(&self.entries[e].item, item);
                            search.offer(Boundable::Entry(e), d);
                        }
                    }
                },
            }
        }

        let neighbors = search
            .best
            .iter()
            .map(|&(e, d)| Neighbor::new(&self.entries[e].item, d))
            .collect();
        Ok(KnnResult::new(neighbors, visited, search.pruned))
    }

    /// Convenience wrapper around [`k_nearest`](Self::k_nearest) for the
    /// single nearest item.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::NonFiniteQuery`] if `envelope` is non-finite.
    pub fn nearest<'a, D>(
        &'a self,
        item: &T,
        envelope: &Envelope,
        metric: &D,
    ) -> Result<Option<Neighbor<'a, T>>, IndexError>
    where
        D: ItemDistance<T> + ?Sized,
    {
        let result = self.k_nearest(item, envelope, metric, &KnnQuery::new(1))?;
        Ok(result.neighbors().first().copied())
    }
}
