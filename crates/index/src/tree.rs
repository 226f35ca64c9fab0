//! Sort-Tile-Recursive bulk loading and envelope range queries.

use std::ops::Range;

use sweights_geometry::{Coord, Envelope};
use tracing::debug;

use crate::config::IndexConfig;
use crate::error::IndexError;

/// An indexed item together with its envelope and insertion position.
#[derive(Debug, Clone)]
pub(crate) struct Entry<T> {
    pub(crate) envelope: Envelope,
    pub(crate) item: T,
    pub(crate) ordinal: usize,
}

/// Children of a tree node: either a run of entries (leaf node) or a run of
/// nodes one level down. Both are contiguous ranges in the owning arrays.
#[derive(Debug, Clone)]
pub(crate) enum Children {
    Entries(Range<usize>),
    Nodes(Range<usize>),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) envelope: Envelope,
    pub(crate) children: Children,
}

/// Static R-tree over item envelopes, packed bottom-up with the
/// Sort-Tile-Recursive algorithm.
///
/// The index is immutable once built; building is the only way to obtain
/// one, so a query can never run against an unbuilt tree. It is `Sync`
/// whenever `T` is, which lets callers issue queries from several threads.
///
/// # Example
///
/// ```
/// use sweights_geometry::{Coord, Envelope};
/// use sweights_index::SpatialIndex;
///
/// let points = [(0.0, 0.0), (1.0, 0.0), (5.0, 0.0)];
/// let index = SpatialIndex::from_points(
///     points.iter().enumerate().map(|(i, &(x, y))| (Coord { x, y }, i)),
/// )
/// .unwrap();
///
/// let hits = index.range_query(&Envelope::around(Coord { x: 0.0, y: 0.0 }, 2.0));
/// assert_eq!(hits, vec![&0, &1]);
/// ```
#[derive(Debug, Clone)]
pub struct SpatialIndex<T> {
    pub(crate) entries: Vec<Entry<T>>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: Option<usize>,
}

impl<T> SpatialIndex<T> {
    /// Bulk-loads an index from `(envelope, item)` pairs with the default
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::NonFiniteEnvelope`] if any envelope has a
    /// non-finite bound.
    pub fn build<I>(items: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = (Envelope, T)>,
    {
        Self::build_with_config(items, &IndexConfig::default())
    }

    /// Bulk-loads an index of point items with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::NonFiniteEnvelope`] if any coordinate is
    /// non-finite.
    pub fn from_points<I>(points: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = (Coord<f64>, T)>,
    {
        Self::build(points.into_iter().map(|(p, item)| (Envelope::from_point(p), item)))
    }

    /// Bulk-loads an index from `(envelope, item)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidNodeCapacity`] if the configuration is
    /// invalid, or [`IndexError::NonFiniteEnvelope`] for a non-finite
    /// envelope.
    pub fn build_with_config<I>(items: I, config: &IndexConfig) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = (Envelope, T)>,
    {
        config.validate()?;
        let capacity = config.node_capacity();

        let mut entries = Vec::new();
        for (ordinal, (envelope, item)) in items.into_iter().enumerate() {
            if !envelope.is_finite() {
                return Err(IndexError::NonFiniteEnvelope { ordinal });
            }
            entries.push(Entry {
                envelope,
                item,
                ordinal,
            });
        }

        if entries.is_empty() {
            return Ok(Self {
                entries,
                nodes: Vec::new(),
                root: None,
            });
        }

        str_order(&mut entries, capacity, |e| e.envelope.center());

        // Leaf level: consecutive runs of `capacity` entries.
        let mut level: Vec<Node> = entries
            .chunks(capacity)
            .enumerate()
            .map(|(i, chunk)| {
                let start = i * capacity;
                Node {
                    envelope: envelope_of(chunk.iter().map(|e| &e.envelope)),
                    children: Children::Entries(start..start + chunk.len()),
                }
            })
            .collect();

        let mut nodes: Vec<Node> = Vec::new();
        let mut depth = 1;
        while level.len() > 1 {
            str_order(&mut level, capacity, |n| n.envelope.center());
            let base = nodes.len();
            let parents: Vec<Node> = level
                .chunks(capacity)
                .enumerate()
                .map(|(i, chunk)| {
                    let start = base + i * capacity;
                    Node {
                        envelope: envelope_of(chunk.iter().map(|n| &n.envelope)),
                        children: Children::Nodes(start..start + chunk.len()),
                    }
                })
                .collect();
            nodes.append(&mut level);
            level = parents;
            depth += 1;
        }
        nodes.append(&mut level);
        let root = nodes.len() - 1;

        debug!(
            n_items = entries.len(),
            n_nodes = nodes.len(),
            depth,
            "spatial index built"
        );

        Ok(Self {
            entries,
            nodes,
            root: Some(root),
        })
    }

    /// Number of indexed items.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the index holds no items.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Envelope of every indexed item, or `None` for an empty index.
    pub fn bounds(&self) -> Option<Envelope> {
        self.root.map(|r| self.nodes[r].envelope)
    }

    /// Returns every item whose envelope intersects `query`, in insertion
    /// order.
    ///
    /// This is a bounding-box filter only; exact containment or distance
    /// tests are up to the caller.
    pub fn range_query(&self, query: &Envelope) -> Vec<&T> {
        let Some(root) = self.root else {
            return Vec::new();
        };

        let mut hits: Vec<&Entry<T>> = Vec::new();
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if !node.envelope.intersects(query) {
                continue;
            }
            match &node.children {
                Children::Entries(range) => hits.extend(
                    self.entries[range.clone()]
                        .iter()
                        .filter(|e| e.envelope.intersects(query)),
                ),
                Children::Nodes(range) => stack.extend(range.clone()),
            }
        }

        hits.sort_unstable_by_key(|e| e.ordinal);
        hits.into_iter().map(|e| &e.item).collect()
    }

    /// Iterates over all items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &T> {
        let mut all: Vec<&Entry<T>> = self.entries.iter().collect();
        all.sort_unstable_by_key(|e| e.ordinal);
        all.into_iter().map(|e| &e.item)
    }
}

/// Smallest envelope covering every envelope in `iter`.
///
/// Callers guarantee `iter` is non-empty.
fn envelope_of<'a>(mut iter: impl Iterator<Item = &'a Envelope>) -> Envelope {
    let first = iter.next().copied();
    debug_assert!(first.is_some(), "envelope_of called on an empty run");
    let mut acc = first.unwrap_or(Envelope::from_point(Coord { x: 0.0, y: 0.0 }));
    for e in iter {
        acc.expand_to_include(e);
    }
    acc
}

/// Reorders `items` into Sort-Tile-Recursive packing order.
///
/// Items are sorted by centre x and cut into `ceil(sqrt(P))` vertical slices,
/// where `P = ceil(n / capacity)` is the number of parent nodes; each slice
/// is then sorted by centre y. Slice length is a multiple of `capacity`, so
/// consecutive `capacity`-sized chunks never straddle two slices. Sorting is
/// stable, which keeps equal centres in insertion order.
fn str_order<E>(items: &mut [E], capacity: usize, center: impl Fn(&E) -> Coord<f64>) {
    let n = items.len();
    if n <= capacity {
        return;
    }
    let parent_count = n.div_ceil(capacity);
    let slice_count = (parent_count as f64).sqrt().ceil() as usize;
    let slice_len = capacity * parent_count.div_ceil(slice_count);

    items.sort_by(|a, b| center(a).x.total_cmp(&center(b).x));
    for slice in items.chunks_mut(slice_len) {
        slice.sort_by(|a, b| center(a).y.total_cmp(&center(b).y));
    }
}
