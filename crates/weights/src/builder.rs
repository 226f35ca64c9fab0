//! The build entry point: load, discover neighbors, weight, standardize.

use rayon::prelude::*;
use sweights_geometry::{Coord, DistanceMethod, Envelope};
use sweights_index::{IndexConfig, KnnQuery, PointDistance, SpatialIndex};
use tracing::{debug, info, warn};

use crate::concept::SpatialConcept;
use crate::config::BuilderConfig;
use crate::contiguity::contiguity_neighbors;
use crate::entity::SpatialEntity;
use crate::error::WeightsError;
use crate::matrix::WeightMatrix;
use crate::point::{LoadOptions, LoadSummary, SkippedEntity, SpatialPoint, load_points};
use crate::standardize::standardize;
use crate::weight_fn::{auto_band_width, neighbor_weight};

/// Facts about a finished build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildDiagnostics {
    /// Band width in force: configured, or detected when configured as 0.
    pub band_width: f64,
    /// Whether `band_width` was detected.
    pub band_width_detected: bool,
    /// Contiguity order actually applied; always 1 for contiguity concepts
    /// and `None` otherwise.
    pub contiguity_order: Option<usize>,
    /// Directed neighbor pairs in the matrix, self pairs included.
    pub pair_count: usize,
    /// Entities left out of the build.
    pub skipped: Vec<SkippedEntity>,
}

/// Result of [`build_weights`].
#[derive(Debug, Clone)]
pub struct WeightsBuild {
    pub matrix: WeightMatrix,
    pub summary: LoadSummary,
    pub diagnostics: BuildDiagnostics,
}

/// Builds a weight matrix over `entities`.
///
/// Every loaded entity gets a row, in input order, even if it ends up with
/// no neighbors. Pairs whose raw weight is 0 are not recorded.
///
/// # Errors
///
/// Returns an error if `config` is invalid or the spatial index cannot be
/// built. Entities that cannot be placed are skipped, not errors.
#[tracing::instrument(skip_all, fields(concept = config.spatial_concept().name()))]
pub fn build_weights<'a, E, I>(
    entities: I,
    config: &BuilderConfig,
) -> Result<WeightsBuild, WeightsError>
where
    E: SpatialEntity + ?Sized + 'a,
    I: IntoIterator<Item = &'a E>,
{
    config.validate()?;
    let concept = config.spatial_concept();

    let loaded = load_points(
        entities,
        &LoadOptions {
            observed_field: config.observed_field(),
            population_field: config.population_field(),
            require_geometry: concept.is_contiguity(),
        },
    );
    let points = loaded.points;

    let mut band_width = config.distance_band_width();
    let mut band_width_detected = false;
    let mut contiguity_order = None;

    let rows: Rows = match concept.contiguity_type() {
        Some(kind) => {
            if config.contiguity_order() > 1 {
                warn!(
                    requested = config.contiguity_order(),
                    "contiguity order above 1 is not supported, using order 1"
                );
            }
            contiguity_order = Some(1);
            contiguity_neighbors(&points, kind, &config.index_config())?
                .into_iter()
                .map(|row| row.into_iter().map(|j| (j, 1.0)).collect())
                .collect()
        }
        None if concept.uses_band_width() => {
            if band_width == 0.0 {
                let locations: Vec<Coord<f64>> = points.iter().map(|p| p.location()).collect();
                band_width = auto_band_width(&locations, config.distance_method());
                band_width_detected = true;
                warn!(band_width, "distance band width auto-detected");
            }
            distance_rows(&points, config, band_width)?
        }
        None => {
            debug_assert_eq!(concept, SpatialConcept::KNearestNeighbors);
            knn_rows(&points, config, band_width)?
        }
    };

    let mut matrix = WeightMatrix::new(
        concept.matrix_kind(),
        concept.name(),
        config.unique_field_name(),
    );
    let self_weight = neighbor_weight(concept, 0.0, band_width);
    for (point, row) in points.iter().zip(rows) {
        matrix.add_row(point.id().clone());
        if config.self_neighbors() {
            matrix.visit(point.id().clone(), point.id().clone(), self_weight);
        }
        for (j, w) in row {
            if w != 0.0 {
                matrix.visit(point.id().clone(), points[j].id().clone(), w);
            }
        }
    }

    let pair_count = matrix.pair_count();
    info!(
        n_features = matrix.feature_count(),
        n_pairs = pair_count,
        n_skipped = loaded.skipped.len(),
        "weight matrix built"
    );

    standardize(
        &mut matrix,
        config.standardization(),
        config.global_divisor(),
        loaded.summary.observed().sum,
    );

    Ok(WeightsBuild {
        matrix,
        summary: loaded.summary,
        diagnostics: BuildDiagnostics {
            band_width,
            band_width_detected,
            contiguity_order,
            pair_count,
            skipped: loaded.skipped,
        },
    })
}

type Rows = Vec<Vec<(usize, f64)>>;

fn point_index(
    points: &[SpatialPoint<'_>],
    config: &IndexConfig,
) -> Result<SpatialIndex<usize>, WeightsError> {
    Ok(SpatialIndex::build_with_config(
        points
            .iter()
            .enumerate()
            .map(|(i, p)| (Envelope::from_point(p.location()), i)),
        config,
    )?)
}

/// Every other point with its weight, for the exhaustive paths.
fn all_pairs(
    points: &[SpatialPoint<'_>],
    i: usize,
    concept: SpatialConcept,
    method: DistanceMethod,
    band_width: f64,
) -> Vec<(usize, f64)> {
    let at = points[i].location();
    points
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != i)
        .map(|(j, p)| (j, neighbor_weight(concept, method.distance(at, p.location()), band_width)))
        .collect()
}

fn distance_rows(
    points: &[SpatialPoint<'_>],
    config: &BuilderConfig,
    band_width: f64,
) -> Result<Rows, WeightsError> {
    let concept = config.spatial_concept();
    let method = config.distance_method();

    if concept == SpatialConcept::ZoneOfIndifference {
        // weights decay but never vanish past the band
        return Ok((0..points.len())
            .into_par_iter()
            .map(|i| all_pairs(points, i, concept, method, band_width))
            .collect());
    }

    let index = point_index(points, &config.index_config())?;
    let rows: Rows = (0..points.len())
        .into_par_iter()
        .map(|i| {
            let at = points[i].location();
            index
                .range_query(&Envelope::around(at, band_width))
                .into_iter()
                .copied()
                .filter(|&j| j != i)
                .filter_map(|j| {
                    let d = method.distance(at, points[j].location());
                    (d <= band_width).then(|| (j, neighbor_weight(concept, d, band_width)))
                })
                .collect()
        })
        .collect();
    debug!(band_width, "distance neighbors found");
    Ok(rows)
}

fn knn_rows(
    points: &[SpatialPoint<'_>],
    config: &BuilderConfig,
    band_width: f64,
) -> Result<Rows, WeightsError> {
    let concept = config.spatial_concept();
    let method = config.distance_method();
    let k = config.number_of_neighbors();

    if k + 1 >= points.len() {
        debug!(k, n_points = points.len(), "k covers every point, emitting all pairs");
        return Ok((0..points.len())
            .into_par_iter()
            .map(|i| all_pairs(points, i, concept, method, band_width))
            .collect());
    }

    let index = point_index(points, &config.index_config())?;
    let metric = PointDistance::new(method, |j: &usize| points[*j].location());
    // one extra so the query point itself can be dropped
    let query = KnnQuery::new(k + 1);

    let rows = (0..points.len())
        .into_par_iter()
        .map(|i| -> Result<Vec<(usize, f64)>, WeightsError> {
            let envelope = Envelope::from_point(points[i].location());
            let result = index.k_nearest(&i, &envelope, &metric, &query)?;
            Ok(result
                .neighbors()
                .iter()
                .filter(|n| *n.item() != i)
                .take(k)
                .map(|n| (*n.item(), neighbor_weight(concept, n.distance(), band_width)))
                .collect())
        })
        .collect::<Result<Rows, WeightsError>>()?;
    debug!(k, "k-nearest neighbors found");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concept::Standardization;
    use crate::entity::{Feature, FeatureId};
    use approx::assert_abs_diff_eq;

    fn id(v: i64) -> FeatureId {
        FeatureId::Int(v)
    }

    fn line() -> Vec<Feature> {
        vec![
            Feature::point(0i64, 0.0, 0.0),
            Feature::point(1i64, 1.0, 0.0),
            Feature::point(2i64, 5.0, 0.0),
        ]
    }

    #[test]
    fn test_fixed_band() {
        let config = BuilderConfig::new()
            .with_spatial_concept(SpatialConcept::FixedDistanceBand)
            .with_distance_band_width(2.0);
        let build = build_weights(&line(), &config).unwrap();
        let m = &build.matrix;
        assert!(m.is_neighbor(&id(0), &id(1)));
        assert!(m.is_neighbor(&id(1), &id(0)));
        assert!(!m.is_neighbor(&id(0), &id(2)));
        assert!(!m.is_neighbor(&id(1), &id(2)));
        assert_eq!(m.feature_count(), 3);
        assert_eq!(m.neighbor_count(&id(2)), 0);
        assert_eq!(build.diagnostics.pair_count, 2);
        assert!(!build.diagnostics.band_width_detected);
        assert_eq!(build.diagnostics.contiguity_order, None);
    }

    #[test]
    fn test_inverse_distance_auto_band() {
        let build = build_weights(&line(), &BuilderConfig::new()).unwrap();
        let d = &build.diagnostics;
        assert!(d.band_width_detected);
        assert_abs_diff_eq!(d.band_width, 4.0004, epsilon = 1e-12);
        let m = &build.matrix;
        assert_eq!(m.get_weight(&id(0), &id(1)), 1.0);
        assert_abs_diff_eq!(m.get_weight(&id(1), &id(2)), 0.25, epsilon = 1e-15);
        // 5.0 lies beyond the band
        assert!(!m.is_neighbor(&id(0), &id(2)));
    }

    #[test]
    fn test_band_detected_only_for_band_concepts() {
        for concept in SpatialConcept::ALL.into_iter().filter(|c| !c.is_contiguity()) {
            let config = BuilderConfig::new()
                .with_spatial_concept(concept)
                .with_number_of_neighbors(1);
            let d = build_weights(&line(), &config).unwrap().diagnostics;
            assert_eq!(d.band_width_detected, concept.uses_band_width(), "{}", concept.name());
            if !concept.uses_band_width() {
                assert_eq!(d.band_width, 0.0);
            }
        }
    }

    #[test]
    fn test_zone_of_indifference_reaches_everyone() {
        let config = BuilderConfig::new()
            .with_spatial_concept(SpatialConcept::ZoneOfIndifference)
            .with_distance_band_width(2.0);
        let m = build_weights(&line(), &config).unwrap().matrix;
        assert_eq!(m.get_weight(&id(0), &id(1)), 1.0);
        assert_abs_diff_eq!(m.get_weight(&id(0), &id(2)), 0.25, epsilon = 1e-15);
        assert_abs_diff_eq!(m.get_weight(&id(2), &id(1)), 1.0 / 3.0, epsilon = 1e-15);
    }

    #[test]
    fn test_knn_asymmetric() {
        let config = BuilderConfig::new()
            .with_spatial_concept(SpatialConcept::KNearestNeighbors)
            .with_number_of_neighbors(1);
        let m = build_weights(&line(), &config).unwrap().matrix;
        assert!(m.is_neighbor(&id(0), &id(1)));
        assert!(m.is_neighbor(&id(1), &id(0)));
        assert!(m.is_neighbor(&id(2), &id(1)));
        assert!(!m.is_neighbor(&id(1), &id(2)));
        assert_eq!(m.pair_count(), 3);
    }

    #[test]
    fn test_knn_all_pairs_fallback() {
        let config = BuilderConfig::new()
            .with_spatial_concept(SpatialConcept::KNearestNeighbors)
            .with_number_of_neighbors(5);
        let m = build_weights(&line(), &config).unwrap().matrix;
        assert_eq!(m.pair_count(), 6);
    }

    #[test]
    fn test_knn_truncated_by_band() {
        let config = BuilderConfig::new()
            .with_spatial_concept(SpatialConcept::KNearestNeighbors)
            .with_number_of_neighbors(1)
            .with_distance_band_width(2.0);
        let m = build_weights(&line(), &config).unwrap().matrix;
        assert!(!m.is_neighbor(&id(2), &id(1)));
        assert_eq!(m.neighbor_count(&id(2)), 0);
    }

    #[test]
    fn test_self_neighbors() {
        let config = BuilderConfig::new()
            .with_spatial_concept(SpatialConcept::FixedDistanceBand)
            .with_distance_band_width(2.0)
            .with_self_neighbors(true);
        let m = build_weights(&line(), &config).unwrap().matrix;
        for v in 0..3 {
            assert!(m.is_neighbor(&id(v), &id(v)));
            assert_eq!(m.get_weight(&id(v), &id(v)), 1.0);
        }
    }

    #[test]
    fn test_row_standardization() {
        let config = BuilderConfig::new()
            .with_spatial_concept(SpatialConcept::ZoneOfIndifference)
            .with_distance_band_width(0.5)
            .with_standardization(Standardization::Row);
        let m = build_weights(&line(), &config).unwrap().matrix;
        for v in 0..3 {
            assert_abs_diff_eq!(m.row_sum(&id(v)), 1.0, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_empty_input() {
        let features: Vec<Feature> = Vec::new();
        let build = build_weights(&features, &BuilderConfig::new()).unwrap();
        assert_eq!(build.matrix.feature_count(), 0);
        assert_eq!(build.diagnostics.band_width, 0.0);
        assert_eq!(build.summary.count(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = BuilderConfig::new().with_distance_band_width(-1.0);
        assert!(matches!(
            build_weights(&line(), &config),
            Err(WeightsError::InvalidBandWidth { .. })
        ));
    }
}
