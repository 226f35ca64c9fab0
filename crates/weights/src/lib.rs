//! Spatial weight matrix construction.
//!
//! Given entities exposing an id, a centroid and named numeric attributes,
//! [`build_weights`] decides which pairs are neighbors and how strongly they
//! relate, then standardizes the weights.
//!
//! | Concept | Neighbor discovery |
//! |---------|--------------------|
//! | inverse distance, fixed band | envelope range query by band width |
//! | zone of indifference | every other point |
//! | k nearest neighbors | branch-and-bound search on the spatial index |
//! | queen, rook, bishops contiguity | envelope prefilter, then DE-9IM test |
//!
//! # Quick start
//!
//! ```
//! use sweights_weights::{BuilderConfig, Feature, FeatureId, SpatialConcept, build_weights};
//!
//! let features = vec![
//!     Feature::point(0i64, 0.0, 0.0),
//!     Feature::point(1i64, 1.0, 0.0),
//!     Feature::point(2i64, 5.0, 0.0),
//! ];
//! let config = BuilderConfig::new()
//!     .with_spatial_concept(SpatialConcept::FixedDistanceBand)
//!     .with_distance_band_width(2.0);
//! let build = build_weights(&features, &config).unwrap();
//! assert!(build.matrix.is_neighbor(&FeatureId::Int(0), &FeatureId::Int(1)));
//! assert!(!build.matrix.is_neighbor(&FeatureId::Int(0), &FeatureId::Int(2)));
//! ```

pub mod builder;
pub mod concept;
pub mod config;
pub mod contiguity;
pub mod entity;
pub mod error;
pub mod matrix;
pub mod point;
pub mod standardize;
pub mod weight_fn;

pub use builder::{BuildDiagnostics, WeightsBuild, build_weights};
pub use concept::{ContiguityType, GlobalDivisor, SpatialConcept, Standardization};
pub use config::{BuilderConfig, MAX_CONTIGUITY_ORDER, MAX_NEIGHBORS};
pub use entity::{AttributeValue, DEFAULT_ATTRIBUTE_VALUE, Feature, FeatureId, SpatialEntity};
pub use error::WeightsError;
pub use matrix::{MatrixKind, NeighborStats, WeightMatrix};
pub use point::{LoadSummary, PowerSums, SkipReason, SkippedEntity, SpatialPoint};
pub use sweights_geometry::DistanceMethod;
pub use weight_fn::{BAND_WIDTH_MARGIN, auto_band_width, neighbor_weight};
