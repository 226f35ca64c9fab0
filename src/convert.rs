//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Result, bail};

use sweights_io::WriterConfig;
use sweights_weights::{
    BuilderConfig, DistanceMethod, GlobalDivisor, MatrixKind, SpatialConcept, Standardization,
};

use crate::config::{IoToml, WeightsToml};

/// Parses a spatial concept name into the corresponding enum variant.
///
/// Accepts the canonical names plus the chess aliases for contiguity.
pub fn parse_concept(s: &str) -> Result<SpatialConcept> {
    let lower = s.to_lowercase();
    if let Some(c) = SpatialConcept::ALL.into_iter().find(|c| c.name() == lower) {
        return Ok(c);
    }
    match lower.as_str() {
        "queen" => Ok(SpatialConcept::ContiguityEdgesAndNodes),
        "rook" => Ok(SpatialConcept::ContiguityEdgesOnly),
        "bishops" => Ok(SpatialConcept::ContiguityNodesOnly),
        "knn" => Ok(SpatialConcept::KNearestNeighbors),
        other => bail!("unknown spatial concept: {other:?}"),
    }
}

/// Parses a standardization name into the corresponding enum variant.
pub fn parse_standardization(s: &str) -> Result<Standardization> {
    match s.to_lowercase().as_str() {
        "none" => Ok(Standardization::None),
        "row" => Ok(Standardization::Row),
        "global" => Ok(Standardization::Global),
        other => bail!("unknown standardization: {other:?}"),
    }
}

/// Parses a distance method name into the corresponding enum variant.
pub fn parse_distance_method(s: &str) -> Result<DistanceMethod> {
    match s.to_lowercase().as_str() {
        "euclidean" => Ok(DistanceMethod::Euclidean),
        "manhattan" => Ok(DistanceMethod::Manhattan),
        other => bail!("unknown distance method: {other:?}"),
    }
}

/// Parses a global divisor name into the corresponding enum variant.
pub fn parse_global_divisor(s: &str) -> Result<GlobalDivisor> {
    match s.to_lowercase().as_str() {
        "observed_sum" => Ok(GlobalDivisor::ObservedSum),
        "weight_sum" => Ok(GlobalDivisor::WeightSum),
        other => bail!("unknown global divisor: {other:?}"),
    }
}

/// Parses a weights file body kind.
pub fn parse_matrix_kind(s: &str) -> Result<MatrixKind> {
    match s.to_lowercase().as_str() {
        "distance" => Ok(MatrixKind::Distance),
        "contiguity" => Ok(MatrixKind::Contiguity),
        other => bail!("unknown matrix kind: {other:?}"),
    }
}

/// Builds a [`BuilderConfig`] from the TOML weights configuration.
///
/// `concept` overrides the configured concept name when given.
pub fn build_builder_config(weights: &WeightsToml, concept: Option<&str>) -> Result<BuilderConfig> {
    let concept = parse_concept(concept.unwrap_or(&weights.concept))?;
    let mut cfg = BuilderConfig::new()
        .with_spatial_concept(concept)
        .with_standardization(parse_standardization(&weights.standardization)?)
        .with_distance_method(parse_distance_method(&weights.distance_method)?)
        .with_distance_band_width(weights.band_width)
        .with_number_of_neighbors(weights.neighbors)
        .with_self_neighbors(weights.self_neighbors)
        .with_unique_field_name(&weights.unique_field)
        .with_contiguity_order(weights.contiguity_order)
        .with_global_divisor(parse_global_divisor(&weights.global_divisor)?)
        .with_node_capacity(weights.node_capacity);
    if let Some(ref f) = weights.observed_field {
        cfg = cfg.with_observed_field(f);
    }
    if let Some(ref f) = weights.population_field {
        cfg = cfg.with_population_field(f);
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`WriterConfig`] from the TOML I/O configuration.
pub fn build_writer_config(io: &IoToml) -> Result<WriterConfig> {
    let mut cfg = WriterConfig::new();
    if let Some(p) = io.precision {
        cfg = cfg.with_precision(p);
    }
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concept_names_and_aliases() {
        for c in SpatialConcept::ALL {
            assert_eq!(parse_concept(c.name()).unwrap(), c);
        }
        assert_eq!(
            parse_concept("Queen").unwrap(),
            SpatialConcept::ContiguityEdgesAndNodes
        );
        assert_eq!(parse_concept("KNN").unwrap(), SpatialConcept::KNearestNeighbors);
        let err = parse_concept("gravity").unwrap_err();
        assert_eq!(err.to_string(), "unknown spatial concept: \"gravity\"");
    }

    #[test]
    fn enum_parsers() {
        assert_eq!(parse_standardization("ROW").unwrap(), Standardization::Row);
        assert!(parse_standardization("column").is_err());
        assert_eq!(
            parse_distance_method("manhattan").unwrap(),
            DistanceMethod::Manhattan
        );
        assert!(parse_distance_method("chebyshev").is_err());
        assert_eq!(
            parse_global_divisor("weight_sum").unwrap(),
            GlobalDivisor::WeightSum
        );
        assert!(parse_global_divisor("sum").is_err());
        assert_eq!(parse_matrix_kind("contiguity").unwrap(), MatrixKind::Contiguity);
        assert!(parse_matrix_kind("gwt").is_err());
    }

    #[test]
    fn builder_config_from_toml() {
        let mut weights = WeightsToml::default();
        weights.observed_field = Some("z".to_string());
        weights.band_width = 2.5;
        let cfg = build_builder_config(&weights, Some("fixed_distance_band")).unwrap();
        assert_eq!(cfg.spatial_concept(), SpatialConcept::FixedDistanceBand);
        assert_eq!(cfg.distance_band_width(), 2.5);
        assert_eq!(cfg.observed_field(), Some("z"));
        assert_eq!(cfg.population_field(), None);
    }

    #[test]
    fn invalid_builder_config_rejected() {
        let mut weights = WeightsToml::default();
        weights.concept = "knn".to_string();
        weights.neighbors = 50;
        let err = build_builder_config(&weights, None).unwrap_err();
        assert!(err.to_string().contains("number of neighbors"));
    }

    #[test]
    fn writer_config_precision() {
        let io = IoToml {
            precision: Some(4),
            ..IoToml::default()
        };
        assert_eq!(build_writer_config(&io).unwrap().precision(), Some(4));
        let io = IoToml {
            precision: Some(40),
            ..IoToml::default()
        };
        assert!(build_writer_config(&io).is_err());
    }
}
