//! Configuration for a weight matrix build.

use sweights_geometry::DistanceMethod;
use sweights_index::{DEFAULT_NODE_CAPACITY, IndexConfig};

use crate::concept::{GlobalDivisor, SpatialConcept, Standardization};
use crate::error::WeightsError;

/// Largest accepted neighbor count for [`SpatialConcept::KNearestNeighbors`].
pub const MAX_NEIGHBORS: usize = 24;

/// Largest accepted contiguity order.
pub const MAX_CONTIGUITY_ORDER: usize = 12;

/// Configuration for [`build_weights`](crate::build_weights).
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use sweights_weights::{BuilderConfig, SpatialConcept, Standardization};
///
/// let config = BuilderConfig::new()
///     .with_spatial_concept(SpatialConcept::FixedDistanceBand)
///     .with_distance_band_width(2.0)
///     .with_standardization(Standardization::Row);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    spatial_concept: SpatialConcept,
    standardization: Standardization,
    distance_method: DistanceMethod,
    distance_band_width: f64,
    number_of_neighbors: usize,
    self_neighbors: bool,
    unique_field_name: String,
    observed_field: Option<String>,
    population_field: Option<String>,
    contiguity_order: usize,
    global_divisor: GlobalDivisor,
    node_capacity: usize,
}

impl BuilderConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `InverseDistance`, no standardization, Euclidean distance,
    /// band width `0.0` (auto-detect), 8 neighbors, no self neighbors,
    /// unique field `"id"`, no observed or population field, contiguity
    /// order 1, observed-sum global divisor, node capacity 10.
    pub fn new() -> Self {
        Self {
            spatial_concept: SpatialConcept::InverseDistance,
            standardization: Standardization::None,
            distance_method: DistanceMethod::Euclidean,
            distance_band_width: 0.0,
            number_of_neighbors: 8,
            self_neighbors: false,
            unique_field_name: "id".to_string(),
            observed_field: None,
            population_field: None,
            contiguity_order: 1,
            global_divisor: GlobalDivisor::ObservedSum,
            node_capacity: DEFAULT_NODE_CAPACITY,
        }
    }

    pub fn with_spatial_concept(mut self, concept: SpatialConcept) -> Self {
        self.spatial_concept = concept;
        self
    }

    pub fn with_standardization(mut self, standardization: Standardization) -> Self {
        self.standardization = standardization;
        self
    }

    pub fn with_distance_method(mut self, method: DistanceMethod) -> Self {
        self.distance_method = method;
        self
    }

    /// Sets the band width; `0.0` requests auto-detection.
    pub fn with_distance_band_width(mut self, width: f64) -> Self {
        self.distance_band_width = width;
        self
    }

    /// Sets k for [`SpatialConcept::KNearestNeighbors`].
    pub fn with_number_of_neighbors(mut self, k: usize) -> Self {
        self.number_of_neighbors = k;
        self
    }

    /// Whether each entity is recorded as its own neighbor.
    pub fn with_self_neighbors(mut self, enabled: bool) -> Self {
        self.self_neighbors = enabled;
        self
    }

    /// Sets the unique field name written to the matrix header.
    pub fn with_unique_field_name(mut self, name: impl Into<String>) -> Self {
        self.unique_field_name = name.into();
        self
    }

    /// Sets the attribute read as the observed value.
    pub fn with_observed_field(mut self, name: impl Into<String>) -> Self {
        self.observed_field = Some(name.into());
        self
    }

    /// Sets the attribute read as the population value.
    pub fn with_population_field(mut self, name: impl Into<String>) -> Self {
        self.population_field = Some(name.into());
        self
    }

    /// Sets the contiguity order. Only order 1 has an effect.
    pub fn with_contiguity_order(mut self, order: usize) -> Self {
        self.contiguity_order = order;
        self
    }

    pub fn with_global_divisor(mut self, divisor: GlobalDivisor) -> Self {
        self.global_divisor = divisor;
        self
    }

    /// Sets the spatial index node capacity.
    pub fn with_node_capacity(mut self, capacity: usize) -> Self {
        self.node_capacity = capacity;
        self
    }

    // --- Accessors ---

    pub fn spatial_concept(&self) -> SpatialConcept {
        self.spatial_concept
    }

    pub fn standardization(&self) -> Standardization {
        self.standardization
    }

    pub fn distance_method(&self) -> DistanceMethod {
        self.distance_method
    }

    /// Configured band width; `0.0` means auto-detect.
    pub fn distance_band_width(&self) -> f64 {
        self.distance_band_width
    }

    pub fn number_of_neighbors(&self) -> usize {
        self.number_of_neighbors
    }

    pub fn self_neighbors(&self) -> bool {
        self.self_neighbors
    }

    pub fn unique_field_name(&self) -> &str {
        &self.unique_field_name
    }

    pub fn observed_field(&self) -> Option<&str> {
        self.observed_field.as_deref()
    }

    pub fn population_field(&self) -> Option<&str> {
        self.population_field.as_deref()
    }

    pub fn contiguity_order(&self) -> usize {
        self.contiguity_order
    }

    pub fn global_divisor(&self) -> GlobalDivisor {
        self.global_divisor
    }

    /// Index configuration derived from the node capacity.
    pub fn index_config(&self) -> IndexConfig {
        IndexConfig::new().with_node_capacity(self.node_capacity)
    }

    /// Validates all parameters.
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter found.
    pub fn validate(&self) -> Result<(), WeightsError> {
        let w = self.distance_band_width;
        if !w.is_finite() || w < 0.0 {
            return Err(WeightsError::InvalidBandWidth { width: w });
        }
        if self.spatial_concept == SpatialConcept::KNearestNeighbors
            && !(1..=MAX_NEIGHBORS).contains(&self.number_of_neighbors)
        {
            return Err(WeightsError::InvalidNeighborCount {
                k: self.number_of_neighbors,
                max: MAX_NEIGHBORS,
            });
        }
        if !(1..=MAX_CONTIGUITY_ORDER).contains(&self.contiguity_order) {
            return Err(WeightsError::InvalidContiguityOrder {
                order: self.contiguity_order,
                max: MAX_CONTIGUITY_ORDER,
            });
        }
        if self.unique_field_name.trim().is_empty() {
            return Err(WeightsError::EmptyFieldName {
                field: "unique_field_name",
            });
        }
        self.index_config().validate()?;
        Ok(())
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self::new()
    }
}
