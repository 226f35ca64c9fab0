//! Error types for the sweights-weights crate.

use sweights_index::IndexError;

/// Error type for all fallible operations in the sweights-weights crate.
///
/// Covers builder configuration errors and spatial index failures. Data
/// problems with individual entities are not errors: those entities are
/// skipped and reported in the build diagnostics.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WeightsError {
    /// Spatial index error.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// Returned when the distance band width is negative or non-finite.
    #[error("distance band width must be finite and >= 0, got {width}")]
    InvalidBandWidth {
        /// The invalid band width.
        width: f64,
    },

    /// Returned when the neighbor count is outside `1..=max`.
    #[error("number of neighbors must be in 1..={max}, got {k}")]
    InvalidNeighborCount {
        /// The requested neighbor count.
        k: usize,
        /// The largest accepted value.
        max: usize,
    },

    /// Returned when the contiguity order is outside `1..=max`.
    #[error("contiguity order must be in 1..={max}, got {order}")]
    InvalidContiguityOrder {
        /// The requested order.
        order: usize,
        /// The largest accepted value.
        max: usize,
    },

    /// Returned when a field name is empty.
    #[error("{field} must not be empty")]
    EmptyFieldName {
        /// Which configuration field was empty.
        field: &'static str,
    },
}
