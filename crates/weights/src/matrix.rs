//! The sparse weight matrix.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::entity::FeatureId;

/// Persisted body format of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixKind {
    /// One `primary secondary value` line per pair.
    Distance,
    /// A count line and a neighbor-list line per primary.
    Contiguity,
}

impl MatrixKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Contiguity => "contiguity",
        }
    }
}

/// Sparse directed weight matrix keyed by feature id.
///
/// Rows keep insertion order, so serialization is deterministic. Symmetry is
/// not enforced: `a -> b` may exist without `b -> a`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMatrix {
    kind: MatrixKind,
    type_name: String,
    unique_field_name: String,
    rows: IndexMap<FeatureId, HashMap<FeatureId, f64>>,
}

/// Summary of neighbor counts across rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborStats {
    pub features: usize,
    pub pairs: usize,
    pub min_neighbors: usize,
    pub max_neighbors: usize,
    pub mean_neighbors: f64,
    /// Rows with no neighbors.
    pub islands: usize,
}

impl WeightMatrix {
    /// Creates an empty matrix.
    pub fn new(
        kind: MatrixKind,
        type_name: impl Into<String>,
        unique_field_name: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            type_name: type_name.into(),
            unique_field_name: unique_field_name.into(),
            rows: IndexMap::new(),
        }
    }

    /// Adds an empty row for `id` if none exists yet.
    pub fn add_row(&mut self, id: FeatureId) {
        self.rows.entry(id).or_default();
    }

    /// Records `value` for the pair `primary -> secondary`, replacing any
    /// previous value.
    pub fn visit(&mut self, primary: FeatureId, secondary: FeatureId, value: f64) {
        self.rows.entry(primary).or_default().insert(secondary, value);
    }

    pub fn is_neighbor(&self, primary: &FeatureId, secondary: &FeatureId) -> bool {
        self.rows
            .get(primary)
            .is_some_and(|row| row.contains_key(secondary))
    }

    /// Weight of `primary -> secondary`, or `0.0` if they are not neighbors.
    pub fn get_weight(&self, primary: &FeatureId, secondary: &FeatureId) -> f64 {
        self.rows
            .get(primary)
            .and_then(|row| row.get(secondary))
            .copied()
            .unwrap_or(0.0)
    }

    /// Number of rows, including rows without neighbors.
    pub fn feature_count(&self) -> usize {
        self.rows.len()
    }

    /// Row ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &FeatureId> {
        self.rows.keys()
    }

    /// Neighbors of `id` with their weights, in no particular order.
    pub fn neighbors<'a>(
        &'a self,
        id: &FeatureId,
    ) -> impl Iterator<Item = (&'a FeatureId, f64)> + use<'a> {
        self.rows
            .get(id)
            .into_iter()
            .flat_map(|row| row.iter().map(|(k, &v)| (k, v)))
    }

    /// Neighbors of `id` ordered by id.
    pub fn sorted_neighbors(&self, id: &FeatureId) -> Vec<(&FeatureId, f64)> {
        let mut out: Vec<_> = self.neighbors(id).collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }

    pub fn neighbor_count(&self, id: &FeatureId) -> usize {
        self.rows.get(id).map_or(0, HashMap::len)
    }

    /// Sum of the weights in the row of `id`.
    pub fn row_sum(&self, id: &FeatureId) -> f64 {
        self.rows.get(id).map_or(0.0, |row| row.values().sum())
    }

    /// Total number of directed pairs.
    pub fn pair_count(&self) -> usize {
        self.rows.values().map(HashMap::len).sum()
    }

    /// Sum of every weight in the matrix.
    pub fn total_weight(&self) -> f64 {
        self.rows.values().flat_map(|row| row.values()).sum()
    }

    pub fn kind(&self) -> MatrixKind {
        self.kind
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn unique_field_name(&self) -> &str {
        &self.unique_field_name
    }

    pub(crate) fn rows_mut(&mut self) -> impl Iterator<Item = &mut HashMap<FeatureId, f64>> {
        self.rows.values_mut()
    }

    /// Neighbor count statistics. An empty matrix reports all zeros.
    pub fn neighbor_stats(&self) -> NeighborStats {
        let counts: Vec<usize> = self.rows.values().map(HashMap::len).collect();
        let pairs: usize = counts.iter().sum();
        NeighborStats {
            features: counts.len(),
            pairs,
            min_neighbors: counts.iter().copied().min().unwrap_or(0),
            max_neighbors: counts.iter().copied().max().unwrap_or(0),
            mean_neighbors: if counts.is_empty() {
                0.0
            } else {
                pairs as f64 / counts.len() as f64
            },
            islands: counts.iter().filter(|&&c| c == 0).count(),
        }
    }
}
