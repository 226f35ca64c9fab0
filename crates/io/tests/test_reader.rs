//! Integration test: round-trip matrices through weights files.

use std::path::Path;

use approx::assert_abs_diff_eq;
use geo::{Geometry, Polygon, polygon};
use sweights_io::{WeightsIoError, WriterConfig, read_weights, write_weights};
use sweights_weights::{
    BuilderConfig, Feature, FeatureId, MatrixKind, SpatialConcept, Standardization, build_weights,
};

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
fn read_weights_file_not_found() {
    let path = Path::new("/tmp/sweights_test_nonexistent_file.swm");
    let err = read_weights(path, MatrixKind::Distance).unwrap_err();
    assert!(
        matches!(err, WeightsIoError::FileNotFound { .. }),
        "expected FileNotFound, got {err:?}",
    );
}

#[test]
fn distance_round_trip() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("idw.swm");

    let features: Vec<Feature> = (0..12usize)
        .map(|i| Feature::point(i, (i % 4) as f64 * 1.5, (i / 4) as f64 * 2.5))
        .collect();
    let config = BuilderConfig::new()
        .with_spatial_concept(SpatialConcept::InverseDistanceSquared)
        .with_distance_band_width(4.0)
        .with_standardization(Standardization::Row);
    let built = build_weights(&features, &config).unwrap().matrix;
    write_weights(&path, &built, &WriterConfig::default()).unwrap();

    let read = read_weights(&path, MatrixKind::Distance).unwrap();
    assert_eq!(read.type_name(), built.type_name());
    assert_eq!(read.unique_field_name(), built.unique_field_name());
    assert_eq!(read.pair_count(), built.pair_count());
    for a in built.ids() {
        for (b, w) in built.neighbors(a) {
            assert_abs_diff_eq!(read.get_weight(a, b), w, epsilon = 0.0);
        }
    }
}

#[test]
fn contiguity_round_trip_keeps_islands() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("queen.swm");

    let features = vec![
        Feature::with_geometry(10i64, square(0.0, 0.0)),
        Feature::with_geometry(11i64, square(1.0, 0.0)),
        Feature::with_geometry(12i64, square(1.0, 1.0)),
        Feature::with_geometry(13i64, square(9.0, 9.0)),
    ];
    let config = BuilderConfig::new().with_spatial_concept(SpatialConcept::ContiguityEdgesAndNodes);
    let built = build_weights(&features, &config).unwrap().matrix;
    write_weights(&path, &built, &WriterConfig::default()).unwrap();

    let read = read_weights(&path, MatrixKind::Contiguity).unwrap();
    assert_eq!(read, built);
    assert_eq!(read.neighbor_count(&FeatureId::Int(13)), 0);
    assert_eq!(read.neighbor_count(&FeatureId::Int(10)), 2);
}

#[test]
fn zero_padded_and_signed_ids_round_trip() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("padded.swm");

    let features = vec![
        Feature::with_geometry("007", square(0.0, 0.0)),
        Feature::with_geometry("+7", square(1.0, 0.0)),
        Feature::with_geometry(7i64, square(2.0, 0.0)),
    ];
    let config = BuilderConfig::new().with_spatial_concept(SpatialConcept::ContiguityEdgesOnly);
    let built = build_weights(&features, &config).unwrap().matrix;
    write_weights(&path, &built, &WriterConfig::default()).unwrap();

    let read = read_weights(&path, MatrixKind::Contiguity).unwrap();
    assert_eq!(read, built);
    assert_eq!(read.feature_count(), 3);
    assert!(read.is_neighbor(&FeatureId::from("007"), &FeatureId::from("+7")));
    assert!(read.is_neighbor(&FeatureId::from("+7"), &FeatureId::Int(7)));
    assert!(!read.is_neighbor(&FeatureId::from("007"), &FeatureId::Int(7)));
}
