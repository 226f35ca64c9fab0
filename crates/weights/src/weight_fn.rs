//! Neighbor weight functions and band width auto-detection.
//!
//! | Concept | Weight |
//! |---------|--------|
//! | `InverseDistance` | `d <= 1 ? 1 : 1 / d` |
//! | `InverseDistanceSquared` | `d <= 1 ? 1 : 1 / d^2` |
//! | `FixedDistanceBand` | `d <= band ? 1 : 0` |
//! | `ZoneOfIndifference` | `d > band ? 1 / (d - band + 1) : 1` |
//! | `KNearestNeighbors` | `1` for pairs in the k-nearest result |
//! | contiguity | `1` for adjacent pairs |
//!
//! The inverse-distance and k-nearest concepts are additionally truncated
//! to `0` beyond a nonzero band width.

use sweights_geometry::{Coord, DistanceMethod};

use crate::concept::SpatialConcept;

/// Multiplicative margin applied to an auto-detected band width so that the
/// farthest nearest-neighbor pair is not lost to rounding at the boundary.
pub const BAND_WIDTH_MARGIN: f64 = 1.0001;

/// Inverse-distance decay: `1` up to unit distance, `1 / d^beta` beyond.
pub fn inverse_distance(distance: f64, beta: f64) -> f64 {
    if distance <= 1.0 {
        1.0
    } else {
        1.0 / distance.powf(beta)
    }
}

/// Raw weight of a pair at `distance` under `concept`.
///
/// `band_width` is the band actually in force (configured or detected);
/// `0.0` disables truncation. The result is `0.0` for pairs that are not
/// neighbors.
pub fn neighbor_weight(concept: SpatialConcept, distance: f64, band_width: f64) -> f64 {
    let raw = match concept {
        SpatialConcept::InverseDistance | SpatialConcept::InverseDistanceSquared => {
            inverse_distance(distance, concept.beta().unwrap_or(1.0))
        }
        SpatialConcept::FixedDistanceBand => {
            if distance <= band_width {
                1.0
            } else {
                0.0
            }
        }
        SpatialConcept::ZoneOfIndifference => {
            if distance > band_width {
                1.0 / ((distance - band_width) + 1.0)
            } else {
                1.0
            }
        }
        SpatialConcept::KNearestNeighbors
        | SpatialConcept::ContiguityEdgesAndNodes
        | SpatialConcept::ContiguityEdgesOnly
        | SpatialConcept::ContiguityNodesOnly => 1.0,
    };

    if concept.is_band_truncated() && band_width > 0.0 && distance > band_width {
        0.0
    } else {
        raw
    }
}

/// Detects a band width that gives every point at least one neighbor.
///
/// Computes each point's nearest-neighbor distance by brute force, takes the
/// largest, and applies [`BAND_WIDTH_MARGIN`]. This is O(n^2). Fewer than two
/// points yield `0.0`.
pub fn auto_band_width(points: &[Coord<f64>], method: DistanceMethod) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let max_nearest = points
        .iter()
        .enumerate()
        .map(|(i, &a)| {
            points
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, &b)| method.distance(a, b))
                .fold(f64::INFINITY, f64::min)
        })
        .fold(0.0, f64::max);
    max_nearest * BAND_WIDTH_MARGIN
}
