//! GeoJSON feature collections as builder entities.

use std::path::Path;

use anyhow::{Context, Result};
use geo::{Centroid, Coord, Geometry};
use geojson::{FeatureCollection, GeoJson, JsonObject, JsonValue, feature::Id};
use sweights_weights::{AttributeValue, FeatureId, SpatialEntity};
use tracing::{info, warn};

/// One GeoJSON feature converted to `geo` types.
#[derive(Debug, Clone)]
pub struct GeoJsonEntity {
    id: FeatureId,
    geometry: Option<Geometry<f64>>,
    centroid: Option<Coord<f64>>,
    properties: JsonObject,
}

impl SpatialEntity for GeoJsonEntity {
    fn id(&self) -> FeatureId {
        self.id.clone()
    }

    fn centroid(&self) -> Option<Coord<f64>> {
        self.centroid
    }

    fn attribute(&self, name: &str) -> Option<AttributeValue> {
        match self.properties.get(name)? {
            JsonValue::Number(n) => n.as_f64().map(AttributeValue::Number),
            JsonValue::String(s) => Some(AttributeValue::Text(s.clone())),
            JsonValue::Null => None,
            other => Some(AttributeValue::Text(other.to_string())),
        }
    }

    fn geometry(&self) -> Option<&Geometry<f64>> {
        self.geometry.as_ref()
    }
}

fn id_from_json(value: &JsonValue) -> Option<FeatureId> {
    match value {
        JsonValue::Number(n) => Some(match n.as_i64() {
            Some(v) => FeatureId::Int(v),
            None => FeatureId::Text(n.to_string()),
        }),
        JsonValue::String(s) => Some(FeatureId::Text(s.clone())),
        _ => None,
    }
}

/// Id from the unique field, else the feature id, else the position.
fn resolve_id(feature: &geojson::Feature, unique_field: &str, ordinal: usize) -> FeatureId {
    if let Some(id) = feature.property(unique_field).and_then(id_from_json) {
        return id;
    }
    match &feature.id {
        Some(Id::String(s)) => FeatureId::Text(s.clone()),
        Some(Id::Number(n)) => id_from_json(&JsonValue::Number(n.clone()))
            .unwrap_or_else(|| FeatureId::from(ordinal)),
        None => FeatureId::from(ordinal),
    }
}

/// Parses a GeoJSON `FeatureCollection` from text.
///
/// Features whose geometry cannot be converted keep no geometry; the builder
/// then skips and reports them.
pub fn parse_features(text: &str, unique_field: &str) -> Result<Vec<GeoJsonEntity>> {
    let geojson: GeoJson = text.parse().context("invalid GeoJSON")?;
    let collection =
        FeatureCollection::try_from(geojson).context("GeoJSON is not a FeatureCollection")?;

    let entities = collection
        .features
        .into_iter()
        .enumerate()
        .map(|(ordinal, feature)| {
            let id = resolve_id(&feature, unique_field, ordinal);
            let geometry = feature.geometry.and_then(|g| {
                Geometry::<f64>::try_from(g)
                    .inspect_err(|e| warn!(id = %id, error = %e, "unsupported geometry"))
                    .ok()
            });
            let centroid = geometry.as_ref().and_then(|g| g.centroid()).map(|p| p.0);
            GeoJsonEntity {
                id,
                geometry,
                centroid,
                properties: feature.properties.unwrap_or_default(),
            }
        })
        .collect();
    Ok(entities)
}

/// Reads a GeoJSON `FeatureCollection` file.
pub fn read_features(path: &Path, unique_field: &str) -> Result<Vec<GeoJsonEntity>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read GeoJSON: {}", path.display()))?;
    let entities = parse_features(&text, unique_field)
        .with_context(|| format!("failed to parse GeoJSON: {}", path.display()))?;
    info!(path = %path.display(), n_features = entities.len(), "features loaded");
    Ok(entities)
}
