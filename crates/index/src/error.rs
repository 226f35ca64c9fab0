//! Error types for the sweights-index crate.

/// Error type for all fallible operations in the sweights-index crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum IndexError {
    /// Returned when a k-nearest-neighbor query asks for zero neighbors.
    #[error("k must be >= 1, got {k}")]
    InvalidK {
        /// The invalid k value.
        k: usize,
    },

    /// Returned when the node capacity cannot form a tree.
    #[error("node capacity must be >= 2, got {capacity}")]
    InvalidNodeCapacity {
        /// The invalid capacity.
        capacity: usize,
    },

    /// Returned when an inserted envelope has a NaN or infinite bound.
    #[error("non-finite envelope for item {ordinal}")]
    NonFiniteEnvelope {
        /// Insertion position of the offending item.
        ordinal: usize,
    },

    /// Returned when a query envelope has a NaN or infinite bound.
    #[error("non-finite query envelope")]
    NonFiniteQuery,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_k() {
        let e = IndexError::InvalidK { k: 0 };
        assert_eq!(e.to_string(), "k must be >= 1, got 0");
    }

    #[test]
    fn error_invalid_node_capacity() {
        let e = IndexError::InvalidNodeCapacity { capacity: 1 };
        assert_eq!(e.to_string(), "node capacity must be >= 2, got 1");
    }

    #[test]
    fn error_non_finite_envelope() {
        let e = IndexError::NonFiniteEnvelope { ordinal: 7 };
        assert_eq!(e.to_string(), "non-finite envelope for item 7");
    }

    #[test]
    fn error_non_finite_query() {
        assert_eq!(
            IndexError::NonFiniteQuery.to_string(),
            "non-finite query envelope"
        );
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<IndexError>();
    }
}
