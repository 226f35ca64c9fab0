//! Loading entities into [`SpatialPoint`] records with running summary sums.

use geo::{Coord, Geometry};
use tracing::{debug, warn};

use crate::entity::{FeatureId, SpatialEntity, numeric_attribute};

/// One loaded entity: identity, centroid and attribute values.
///
/// The geometry reference is only kept when the concept needs it
/// (contiguity); distance-based builds work on centroids alone.
#[derive(Debug, Clone)]
pub struct SpatialPoint<'a> {
    id: FeatureId,
    location: Coord<f64>,
    observed: f64,
    population: f64,
    geometry: Option<&'a Geometry<f64>>,
}

impl<'a> SpatialPoint<'a> {
    /// Creates a point record without a geometry reference.
    pub fn new(id: FeatureId, location: Coord<f64>, observed: f64, population: f64) -> Self {
        Self {
            id,
            location,
            observed,
            population,
            geometry: None,
        }
    }

    pub fn id(&self) -> &FeatureId {
        &self.id
    }

    /// Centroid coordinate.
    pub fn location(&self) -> Coord<f64> {
        self.location
    }

    /// Value of the observed ("z") attribute.
    pub fn observed(&self) -> f64 {
        self.observed
    }

    /// Value of the population attribute (1.0 when not configured).
    pub fn population(&self) -> f64 {
        self.population
    }

    pub fn geometry(&self) -> Option<&'a Geometry<f64>> {
        self.geometry
    }
}

/// Running sums of a value and its 2nd, 3rd and 4th powers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PowerSums {
    pub sum: f64,
    pub sum2: f64,
    pub sum3: f64,
    pub sum4: f64,
}

impl PowerSums {
    /// Adds one value.
    pub fn push(&mut self, v: f64) {
        let v2 = v * v;
        self.sum += v;
        self.sum2 += v2;
        self.sum3 += v2 * v;
        self.sum4 += v2 * v2;
    }
}

/// Summary sums accumulated while loading, for downstream moment-based
/// statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadSummary {
    count: usize,
    observed: PowerSums,
    population: Option<PowerSums>,
}

impl LoadSummary {
    /// Creates an empty summary; `with_population` enables the second field.
    pub fn new(with_population: bool) -> Self {
        Self {
            count: 0,
            observed: PowerSums::default(),
            population: with_population.then(PowerSums::default),
        }
    }

    fn push(&mut self, observed: f64, population: f64) {
        self.count += 1;
        self.observed.push(observed);
        if let Some(p) = self.population.as_mut() {
            p.push(population);
        }
    }

    /// Number of points loaded.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Power sums of the observed attribute.
    pub fn observed(&self) -> &PowerSums {
        &self.observed
    }

    /// Power sums of the population attribute, if one was configured.
    pub fn population(&self) -> Option<&PowerSums> {
        self.population.as_ref()
    }

    /// Mean of the observed attribute. Returns 0.0 if nothing was loaded.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.observed.sum / self.count as f64
    }

    /// Population variance (N denominator) of the observed attribute.
    /// Returns 0.0 if nothing was loaded.
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let n = self.count as f64;
        let m = self.observed.sum / n;
        (self.observed.sum2 / n - m * m).max(0.0)
    }

    /// Mean of the population attribute, if one was configured.
    pub fn population_mean(&self) -> Option<f64> {
        let p = self.population.as_ref()?;
        if self.count == 0 {
            return Some(0.0);
        }
        Some(p.sum / self.count as f64)
    }
}

/// Why an entity was left out of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The entity could not report a centroid.
    MissingCentroid,
    /// The centroid has a NaN or infinite coordinate.
    NonFiniteCentroid,
    /// A contiguity concept was requested and the entity has no geometry.
    MissingGeometry,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingCentroid => "missing centroid",
            Self::NonFiniteCentroid => "non-finite centroid",
            Self::MissingGeometry => "missing geometry",
        }
    }
}

/// An entity excluded from a build.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedEntity {
    pub id: FeatureId,
    pub reason: SkipReason,
}

/// Output of the load pass.
#[derive(Debug, Clone)]
pub struct LoadedPoints<'a> {
    pub points: Vec<SpatialPoint<'a>>,
    pub summary: LoadSummary,
    pub skipped: Vec<SkippedEntity>,
}

/// Which attributes to read and whether geometry is required.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions<'f> {
    pub observed_field: Option<&'f str>,
    pub population_field: Option<&'f str>,
    pub require_geometry: bool,
}

/// Loads entities into point records.
///
/// Entities that cannot be placed are skipped, reported once each at warn
/// level, and listed in [`LoadedPoints::skipped`]; the rest load normally.
pub fn load_points<'a, E, I>(entities: I, options: &LoadOptions<'_>) -> LoadedPoints<'a>
where
    E: SpatialEntity + ?Sized + 'a,
    I: IntoIterator<Item = &'a E>,
{
    let mut points = Vec::new();
    let mut skipped = Vec::new();
    let mut summary = LoadSummary::new(options.population_field.is_some());

    for entity in entities {
        let id = entity.id();
        let placed = match entity.centroid() {
            None => Err(SkipReason::MissingCentroid),
            Some(c) if !(c.x.is_finite() && c.y.is_finite()) => Err(SkipReason::NonFiniteCentroid),
            Some(c) => match entity.geometry() {
                None if options.require_geometry => Err(SkipReason::MissingGeometry),
                g => Ok((c, g)),
            },
        };

        let (location, geometry) = match placed {
            Ok(v) => v,
            Err(reason) => {
                warn!(id = %id, reason = reason.as_str(), "skipping entity");
                skipped.push(SkippedEntity { id, reason });
                continue;
            }
        };

        let observed = numeric_attribute(entity, options.observed_field);
        let population = numeric_attribute(entity, options.population_field);
        summary.push(observed, population);
        points.push(SpatialPoint {
            id,
            location,
            observed,
            population,
            geometry: if options.require_geometry { geometry } else { None },
        });
    }

    debug!(
        n_points = points.len(),
        n_skipped = skipped.len(),
        "entities loaded"
    );

    LoadedPoints {
        points,
        summary,
        skipped,
    }
}
