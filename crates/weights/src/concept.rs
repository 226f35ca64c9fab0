//! Spatial concepts, standardization modes and related enums.

use crate::matrix::MatrixKind;

/// Polygon adjacency flavour, named after chess moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContiguityType {
    /// Any shared boundary point (edges and nodes).
    Queen,
    /// A shared boundary of positive length (edges only).
    Rook,
    /// Shared vertices only, no shared edge (nodes only).
    Bishops,
}

/// How neighbors are defined and weighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpatialConcept {
    /// `1 / d` beyond unit distance.
    #[default]
    InverseDistance,
    /// `1 / d^2` beyond unit distance.
    InverseDistanceSquared,
    /// Weight 1 inside the band, nothing outside.
    FixedDistanceBand,
    /// Weight 1 inside the band, decaying as `1 / (d - band + 1)` outside.
    ///
    /// The weight never reaches 0, so every other point becomes a neighbor
    /// regardless of the band width.
    ZoneOfIndifference,
    /// Queen contiguity.
    ContiguityEdgesAndNodes,
    /// Rook contiguity.
    ContiguityEdgesOnly,
    /// Bishops contiguity.
    ContiguityNodesOnly,
    /// Weight 1 for each of the k nearest points.
    KNearestNeighbors,
}

impl SpatialConcept {
    /// All concepts, in declaration order.
    pub const ALL: [SpatialConcept; 8] = [
        Self::InverseDistance,
        Self::InverseDistanceSquared,
        Self::FixedDistanceBand,
        Self::ZoneOfIndifference,
        Self::ContiguityEdgesAndNodes,
        Self::ContiguityEdgesOnly,
        Self::ContiguityNodesOnly,
        Self::KNearestNeighbors,
    ];

    /// The contiguity flavour, or `None` for distance-based concepts.
    pub fn contiguity_type(self) -> Option<ContiguityType> {
        match self {
            Self::ContiguityEdgesAndNodes => Some(ContiguityType::Queen),
            Self::ContiguityEdgesOnly => Some(ContiguityType::Rook),
            Self::ContiguityNodesOnly => Some(ContiguityType::Bishops),
            _ => None,
        }
    }

    pub fn is_contiguity(self) -> bool {
        self.contiguity_type().is_some()
    }

    /// Persisted body format for matrices built with this concept.
    pub fn matrix_kind(self) -> MatrixKind {
        if self.is_contiguity() {
            MatrixKind::Contiguity
        } else {
            MatrixKind::Distance
        }
    }

    /// Decay exponent for the inverse-distance concepts.
    pub fn beta(self) -> Option<f64> {
        match self {
            Self::InverseDistance => Some(1.0),
            Self::InverseDistanceSquared => Some(2.0),
            _ => None,
        }
    }

    /// Whether a nonzero band width truncates weights of this concept.
    pub fn is_band_truncated(self) -> bool {
        matches!(
            self,
            Self::InverseDistance | Self::InverseDistanceSquared | Self::KNearestNeighbors
        )
    }

    /// Whether the concept has a band width, auto-detected when configured as 0.
    pub fn uses_band_width(self) -> bool {
        matches!(
            self,
            Self::InverseDistance
                | Self::InverseDistanceSquared
                | Self::FixedDistanceBand
                | Self::ZoneOfIndifference
        )
    }

    /// Canonical name, used as the matrix type name and in config files.
    pub fn name(self) -> &'static str {
        match self {
            Self::InverseDistance => "inverse_distance",
            Self::InverseDistanceSquared => "inverse_distance_squared",
            Self::FixedDistanceBand => "fixed_distance_band",
            Self::ZoneOfIndifference => "zone_of_indifference",
            Self::ContiguityEdgesAndNodes => "contiguity_edges_nodes",
            Self::ContiguityEdgesOnly => "contiguity_edges_only",
            Self::ContiguityNodesOnly => "contiguity_nodes_only",
            Self::KNearestNeighbors => "k_nearest_neighbors",
        }
    }
}

/// Rescaling applied to raw weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Standardization {
    /// Raw weights.
    #[default]
    None,
    /// Each row divided by its own weight sum.
    Row,
    /// Every weight divided by one global divisor, see [`GlobalDivisor`].
    Global,
}

impl Standardization {
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Row => "row",
            Self::Global => "global",
        }
    }
}

/// Divisor used by [`Standardization::Global`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GlobalDivisor {
    /// Sum of the observed attribute over all loaded points. This is the
    /// historic behaviour and the default.
    #[default]
    ObservedSum,
    /// Sum of all computed weights in the matrix.
    WeightSum,
}

impl GlobalDivisor {
    pub fn name(self) -> &'static str {
        match self {
            Self::ObservedSum => "observed_sum",
            Self::WeightSum => "weight_sum",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguity_mapping() {
        assert_eq!(
            SpatialConcept::ContiguityEdgesAndNodes.contiguity_type(),
            Some(ContiguityType::Queen)
        );
        assert_eq!(
            SpatialConcept::ContiguityEdgesOnly.contiguity_type(),
            Some(ContiguityType::Rook)
        );
        assert_eq!(
            SpatialConcept::ContiguityNodesOnly.contiguity_type(),
            Some(ContiguityType::Bishops)
        );
        let contiguous = SpatialConcept::ALL
            .iter()
            .filter(|c| c.is_contiguity())
            .count();
        assert_eq!(contiguous, 3);
    }

    #[test]
    fn test_matrix_kind() {
        for concept in SpatialConcept::ALL {
            let expected = if concept.is_contiguity() {
                MatrixKind::Contiguity
            } else {
                MatrixKind::Distance
            };
            assert_eq!(concept.matrix_kind(), expected);
        }
    }

    #[test]
    fn test_beta() {
        assert_eq!(SpatialConcept::InverseDistance.beta(), Some(1.0));
        assert_eq!(SpatialConcept::InverseDistanceSquared.beta(), Some(2.0));
        assert_eq!(SpatialConcept::FixedDistanceBand.beta(), None);
    }

    #[test]
    fn test_truncation_and_band_use() {
        assert!(SpatialConcept::KNearestNeighbors.is_band_truncated());
        assert!(!SpatialConcept::KNearestNeighbors.uses_band_width());
        assert!(!SpatialConcept::FixedDistanceBand.is_band_truncated());
        assert!(!SpatialConcept::ZoneOfIndifference.is_band_truncated());
        assert!(SpatialConcept::ZoneOfIndifference.uses_band_width());
        assert!(!SpatialConcept::ContiguityEdgesOnly.uses_band_width());
    }

    #[test]
    fn test_names_unique() {
        let mut names: Vec<&str> = SpatialConcept::ALL.iter().map(|c| c.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SpatialConcept::ALL.len());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Standardization::default(), Standardization::None);
        assert_eq!(GlobalDivisor::default(), GlobalDivisor::ObservedSum);
        assert_eq!(SpatialConcept::default(), SpatialConcept::InverseDistance);
    }
}
