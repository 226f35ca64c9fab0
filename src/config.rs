use std::path::PathBuf;

use serde::Deserialize;

/// Top-level sweights configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SweightsConfig {
    /// I/O settings.
    #[serde(default)]
    pub io: IoToml,

    /// Weight matrix settings.
    #[serde(default)]
    pub weights: WeightsToml,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    /// GeoJSON feature collection to read.
    pub input: Option<PathBuf>,
    /// Weights text file to write.
    pub output: Option<PathBuf>,
    /// Fixed decimals for distance values.
    #[serde(default)]
    pub precision: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightsToml {
    #[serde(default = "default_concept")]
    pub concept: String,
    #[serde(default = "default_standardization")]
    pub standardization: String,
    #[serde(default = "default_distance_method")]
    pub distance_method: String,
    /// 0 requests auto-detection.
    #[serde(default)]
    pub band_width: f64,
    #[serde(default = "default_neighbors")]
    pub neighbors: usize,
    #[serde(default)]
    pub self_neighbors: bool,
    #[serde(default = "default_unique_field")]
    pub unique_field: String,
    #[serde(default)]
    pub observed_field: Option<String>,
    #[serde(default)]
    pub population_field: Option<String>,
    #[serde(default = "default_contiguity_order")]
    pub contiguity_order: usize,
    #[serde(default = "default_global_divisor")]
    pub global_divisor: String,
    #[serde(default = "default_node_capacity")]
    pub node_capacity: usize,
}

impl Default for WeightsToml {
    fn default() -> Self {
        Self {
            concept: default_concept(),
            standardization: default_standardization(),
            distance_method: default_distance_method(),
            band_width: 0.0,
            neighbors: default_neighbors(),
            self_neighbors: false,
            unique_field: default_unique_field(),
            observed_field: None,
            population_field: None,
            contiguity_order: default_contiguity_order(),
            global_divisor: default_global_divisor(),
            node_capacity: default_node_capacity(),
        }
    }
}

fn default_concept() -> String {
    "inverse_distance".to_string()
}
fn default_standardization() -> String {
    "none".to_string()
}
fn default_distance_method() -> String {
    "euclidean".to_string()
}
fn default_neighbors() -> usize {
    8
}
fn default_unique_field() -> String {
    "id".to_string()
}
fn default_contiguity_order() -> usize {
    1
}
fn default_global_divisor() -> String {
    "observed_sum".to_string()
}
fn default_node_capacity() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: SweightsConfig = toml::from_str("").unwrap();
        assert!(config.io.input.is_none());
        assert_eq!(config.weights.concept, "inverse_distance");
        assert_eq!(config.weights.neighbors, 8);
        assert_eq!(config.weights.band_width, 0.0);
        assert_eq!(config.weights.node_capacity, 10);
    }

    #[test]
    fn full_file() {
        let text = r#"
            [io]
            input = "tracts.geojson"
            output = "tracts.swm"
            precision = 6

            [weights]
            concept = "k_nearest_neighbors"
            neighbors = 4
            standardization = "row"
            observed_field = "income"
        "#;
        let config: SweightsConfig = toml::from_str(text).unwrap();
        assert_eq!(config.io.input, Some(PathBuf::from("tracts.geojson")));
        assert_eq!(config.io.precision, Some(6));
        assert_eq!(config.weights.concept, "k_nearest_neighbors");
        assert_eq!(config.weights.neighbors, 4);
        assert_eq!(config.weights.observed_field.as_deref(), Some("income"));
        assert_eq!(config.weights.distance_method, "euclidean");
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = toml::from_str::<SweightsConfig>("[weights]\nbandwidth = 2.0\n");
        assert!(err.is_err());
    }
}
