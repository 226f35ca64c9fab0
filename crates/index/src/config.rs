//! Configuration for index construction and k-nearest-neighbor queries.

use crate::error::IndexError;

/// Default maximum number of children per tree node.
pub const DEFAULT_NODE_CAPACITY: usize = 10;

/// Configuration for bulk-loading a [`SpatialIndex`](crate::SpatialIndex).
///
/// # Example
///
/// ```
/// use sweights_index::IndexConfig;
///
/// let config = IndexConfig::new().with_node_capacity(4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Maximum children per node (leaf entries or child nodes).
    node_capacity: usize,
}

impl IndexConfig {
    /// Creates a configuration with `node_capacity = 10`.
    pub fn new() -> Self {
        Self {
            node_capacity: DEFAULT_NODE_CAPACITY,
        }
    }

    /// Sets the maximum number of children per node.
    pub fn with_node_capacity(mut self, capacity: usize) -> Self {
        self.node_capacity = capacity;
        self
    }

    /// Returns the maximum number of children per node.
    pub fn node_capacity(&self) -> usize {
        self.node_capacity
    }

    /// Validates this configuration.
    ///
    /// Returns an error if the node capacity is below 2.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.node_capacity < 2 {
            return Err(IndexError::InvalidNodeCapacity {
                capacity: self.node_capacity,
            });
        }
        Ok(())
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters of a single k-nearest-neighbor query.
///
/// Pruning is on by default. Turning it off makes the search visit every
/// pair reachable from the root, which is only useful to check that pruning
/// never changes the answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnnQuery {
    k: usize,
    pruning: bool,
}

impl KnnQuery {
    /// Creates a query for the `k` nearest items with pruning enabled.
    pub fn new(k: usize) -> Self {
        Self { k, pruning: true }
    }

    /// Enables or disables branch-and-bound pruning.
    pub fn with_pruning(mut self, pruning: bool) -> Self {
        self.pruning = pruning;
        self
    }

    /// Returns the number of neighbors requested.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns whether pruning is enabled.
    pub fn pruning(&self) -> bool {
        self.pruning
    }

    /// Validates this query.
    ///
    /// Returns an error if `k` is zero.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.k < 1 {
            return Err(IndexError::InvalidK { k: self.k });
        }
        Ok(())
    }
}
