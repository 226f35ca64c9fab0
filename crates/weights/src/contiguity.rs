//! Polygon contiguity: queen, rook and bishops adjacency.
//!
//! Candidates come from an envelope range query; adjacency is then decided
//! from the DE-9IM intersection matrix of the two geometries. The highest
//! dimension of the interior/boundary intersections tells shared edges
//! (dimension >= 1) from shared vertices only (dimension 0).

use geo::coordinate_position::CoordPos;
use geo::dimensions::Dimensions;
use geo::{BoundingRect, Geometry, Relate};
use rayon::prelude::*;
use sweights_geometry::Envelope;
use sweights_index::{IndexConfig, SpatialIndex};
use tracing::debug;

use crate::concept::ContiguityType;
use crate::error::WeightsError;
use crate::point::SpatialPoint;

/// Highest dimension of the intersection of `a` and `b`, or `None` if they
/// are disjoint.
pub fn intersection_dimension(a: &Geometry<f64>, b: &Geometry<f64>) -> Option<u8> {
    let im = a.relate(b);
    if !im.is_intersects() {
        return None;
    }
    let cells = [
        (CoordPos::Inside, CoordPos::Inside),
        (CoordPos::Inside, CoordPos::OnBoundary),
        (CoordPos::OnBoundary, CoordPos::Inside),
        (CoordPos::OnBoundary, CoordPos::OnBoundary),
    ];
    cells
        .into_iter()
        .filter_map(|(l, r)| match im.get(l, r) {
            Dimensions::Empty => None,
            Dimensions::ZeroDimensional => Some(0),
            Dimensions::OneDimensional => Some(1),
            Dimensions::TwoDimensional => Some(2),
        })
        .max()
}

/// Whether `a` and `b` are adjacent under `kind`.
///
/// Rook and bishops partition queen adjacency: every intersecting pair is
/// exactly one of the two.
pub fn is_adjacent(a: &Geometry<f64>, b: &Geometry<f64>, kind: ContiguityType) -> bool {
    match (kind, intersection_dimension(a, b)) {
        (_, None) => false,
        (ContiguityType::Queen, Some(_)) => true,
        (ContiguityType::Rook, Some(d)) => d >= 1,
        (ContiguityType::Bishops, Some(d)) => d == 0,
    }
}

fn envelope_of(point: &SpatialPoint<'_>) -> Envelope {
    point
        .geometry()
        .and_then(|g| g.bounding_rect())
        .map_or_else(|| Envelope::from_point(point.location()), Envelope::from)
}

/// Adjacent point positions for every point, in point order.
///
/// Points without a geometry have no neighbors. Self adjacency is never
/// reported here; the builder adds it when configured.
///
/// # Errors
///
/// Returns [`WeightsError::Index`] if the index cannot be built.
pub fn contiguity_neighbors(
    points: &[SpatialPoint<'_>],
    kind: ContiguityType,
    index_config: &IndexConfig,
) -> Result<Vec<Vec<usize>>, WeightsError> {
    let envelopes: Vec<Envelope> = points.iter().map(envelope_of).collect();
    let index = SpatialIndex::build_with_config(
        envelopes.iter().copied().zip(0..points.len()),
        index_config,
    )?;

    let rows: Vec<Vec<usize>> = (0..points.len())
        .into_par_iter()
        .map(|i| {
            let Some(primary) = points[i].geometry() else {
                return Vec::new();
            };
            index
                .range_query(&envelopes[i])
                .into_iter()
                .copied()
                .filter(|&j| j != i)
                .filter(|&j| {
                    points[j]
                        .geometry()
                        .is_some_and(|secondary| is_adjacent(primary, secondary, kind))
                })
                .collect()
        })
        .collect();

    debug!(
        kind = ?kind,
        n_pairs = rows.iter().map(Vec::len).sum::<usize>(),
        "contiguity neighbors found"
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Polygon, polygon};

    fn square(x: f64, y: f64) -> Geometry<f64> {
        let p: Polygon<f64> = polygon![
            (x: x, y: y),
            (x: x + 1.0, y: y),
            (x: x + 1.0, y: y + 1.0),
            (x: x, y: y + 1.0),
        ];
        Geometry::Polygon(p)
    }

    #[test]
    fn test_shared_edge() {
        let a = square(0.0, 0.0);
        let b = square(1.0, 0.0);
        assert_eq!(intersection_dimension(&a, &b), Some(1));
        assert!(is_adjacent(&a, &b, ContiguityType::Queen));
        assert!(is_adjacent(&a, &b, ContiguityType::Rook));
        assert!(!is_adjacent(&a, &b, ContiguityType::Bishops));
    }

    #[test]
    fn test_shared_corner() {
        let a = square(0.0, 0.0);
        let b = square(1.0, 1.0);
        assert_eq!(intersection_dimension(&a, &b), Some(0));
        assert!(is_adjacent(&a, &b, ContiguityType::Queen));
        assert!(!is_adjacent(&a, &b, ContiguityType::Rook));
        assert!(is_adjacent(&a, &b, ContiguityType::Bishops));
    }

    #[test]
    fn test_disjoint() {
        let a = square(0.0, 0.0);
        let b = square(3.0, 0.0);
        assert_eq!(intersection_dimension(&a, &b), None);
        for kind in [ContiguityType::Queen, ContiguityType::Rook, ContiguityType::Bishops] {
            assert!(!is_adjacent(&a, &b, kind));
        }
    }

    #[test]
    fn test_overlap_counts_as_edge() {
        let a = square(0.0, 0.0);
        let b = square(0.5, 0.5);
        assert_eq!(intersection_dimension(&a, &b), Some(2));
        assert!(is_adjacent(&a, &b, ContiguityType::Rook));
    }
}
