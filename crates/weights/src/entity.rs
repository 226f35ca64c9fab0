//! The entity interface consumed by the builder.
//!
//! Reading features from a data source is the caller's job; the builder only
//! needs an identity, a centroid, named numeric attributes and, for the
//! contiguity concepts, the full geometry.

use std::collections::HashMap;
use std::fmt;

use geo::{Centroid, Coord, Geometry};

/// Identity of a spatial entity.
///
/// Uniqueness is the caller's responsibility and is not checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureId {
    /// Integer identity, the common case for feature ids.
    Int(i64),
    /// Any other identity.
    Text(String),
}

impl FeatureId {
    /// Parses an identity token. Only the canonical text of an integer
    /// becomes [`FeatureId::Int`]; `"007"` or `"+7"` stay [`FeatureId::Text`]
    /// so they are not merged with `7`.
    pub fn parse(token: &str) -> Self {
        match token.parse::<i64>() {
            Ok(v) if v.to_string() == token => Self::Int(v),
            _ => Self::Text(token.to_string()),
        }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FeatureId {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<usize> for FeatureId {
    fn from(v: usize) -> Self {
        i64::try_from(v).map_or_else(|_| Self::Text(v.to_string()), Self::Int)
    }
}

impl From<&str> for FeatureId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FeatureId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Raw attribute value as held by the data source.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
}

/// Value substituted for a missing or unparsable numeric attribute.
pub const DEFAULT_ATTRIBUTE_VALUE: f64 = 1.0;

impl AttributeValue {
    /// Numeric reading of this value, or [`DEFAULT_ATTRIBUTE_VALUE`] if it is
    /// text that does not parse or a non-finite number.
    pub fn as_f64(&self) -> f64 {
        let v = match self {
            Self::Number(v) => *v,
            Self::Text(s) => s.trim().parse::<f64>().unwrap_or(DEFAULT_ATTRIBUTE_VALUE),
        };
        if v.is_finite() { v } else { DEFAULT_ATTRIBUTE_VALUE }
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// A spatial entity the builder can load.
pub trait SpatialEntity {
    /// Identity of the entity.
    fn id(&self) -> FeatureId;

    /// Representative point, or `None` if it cannot be determined.
    fn centroid(&self) -> Option<Coord<f64>>;

    /// Raw value of a named attribute, or `None` if absent.
    fn attribute(&self, name: &str) -> Option<AttributeValue>;

    /// Full geometry, needed only by the contiguity concepts.
    fn geometry(&self) -> Option<&Geometry<f64>> {
        None
    }
}

/// Evaluates a named numeric attribute with the documented fallback.
///
/// No field, a missing attribute and an unparsable value all read as
/// [`DEFAULT_ATTRIBUTE_VALUE`].
pub fn numeric_attribute<E: SpatialEntity + ?Sized>(entity: &E, field: Option<&str>) -> f64 {
    field
        .and_then(|name| entity.attribute(name))
        .map_or(DEFAULT_ATTRIBUTE_VALUE, |v| v.as_f64())
}

/// An in-memory entity: identity, optional geometry, explicit or derived
/// centroid, and a bag of attributes.
#[derive(Debug, Clone)]
pub struct Feature {
    id: FeatureId,
    geometry: Option<Geometry<f64>>,
    centroid: Option<Coord<f64>>,
    attributes: HashMap<String, AttributeValue>,
}

impl Feature {
    /// A point feature located at `(x, y)`.
    pub fn point(id: impl Into<FeatureId>, x: f64, y: f64) -> Self {
        let at = Coord { x, y };
        Self {
            id: id.into(),
            geometry: Some(Geometry::Point(at.into())),
            centroid: Some(at),
            attributes: HashMap::new(),
        }
    }

    /// A feature with arbitrary geometry; its centroid is computed from it.
    pub fn with_geometry(id: impl Into<FeatureId>, geometry: Geometry<f64>) -> Self {
        let centroid = geometry.centroid().map(|p| p.0);
        Self {
            id: id.into(),
            geometry: Some(geometry),
            centroid,
            attributes: HashMap::new(),
        }
    }

    /// A feature with no geometry at all.
    pub fn without_geometry(id: impl Into<FeatureId>) -> Self {
        Self {
            id: id.into(),
            geometry: None,
            centroid: None,
            attributes: HashMap::new(),
        }
    }

    /// Adds or replaces an attribute.
    pub fn with_attribute(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }
}

impl SpatialEntity for Feature {
    fn id(&self) -> FeatureId {
        self.id.clone()
    }

    fn centroid(&self) -> Option<Coord<f64>> {
        self.centroid
    }

    fn attribute(&self, name: &str) -> Option<AttributeValue> {
        self.attributes.get(name).cloned()
    }

    fn geometry(&self) -> Option<&Geometry<f64>> {
        self.geometry.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use geo::polygon;

    #[test]
    fn test_feature_id_parse() {
        assert_eq!(FeatureId::parse("42"), FeatureId::Int(42));
        assert_eq!(FeatureId::parse("-7"), FeatureId::Int(-7));
        assert_eq!(FeatureId::parse("A-1"), FeatureId::Text("A-1".to_string()));
        assert_eq!(FeatureId::parse("4.5"), FeatureId::Text("4.5".to_string()));
        assert_eq!(FeatureId::parse("007"), FeatureId::Text("007".to_string()));
        assert_eq!(FeatureId::parse("+7"), FeatureId::Text("+7".to_string()));
        assert_eq!(FeatureId::parse("-0"), FeatureId::Text("-0".to_string()));
    }

    #[test]
    fn test_feature_id_display() {
        assert_eq!(FeatureId::Int(3).to_string(), "3");
        assert_eq!(FeatureId::from("tract_9").to_string(), "tract_9");
    }

    #[test]
    fn test_feature_id_order() {
        let mut ids = vec![FeatureId::from("b"), FeatureId::Int(10), FeatureId::Int(2)];
        ids.sort();
        assert_eq!(ids, vec![FeatureId::Int(2), FeatureId::Int(10), FeatureId::from("b")]);
    }

    #[test]
    fn test_attribute_fallback() {
        assert_eq!(AttributeValue::Number(3.5).as_f64(), 3.5);
        assert_eq!(AttributeValue::from(" 2.25 ").as_f64(), 2.25);
        assert_eq!(AttributeValue::from("n/a").as_f64(), 1.0);
        assert_eq!(AttributeValue::Number(f64::NAN).as_f64(), 1.0);
        assert_eq!(AttributeValue::Number(f64::INFINITY).as_f64(), 1.0);
    }

    #[test]
    fn test_numeric_attribute() {
        let f = Feature::point(1i64, 0.0, 0.0)
            .with_attribute("pop", 120.0)
            .with_attribute("bad", "x");
        assert_eq!(numeric_attribute(&f, Some("pop")), 120.0);
        assert_eq!(numeric_attribute(&f, Some("bad")), 1.0);
        assert_eq!(numeric_attribute(&f, Some("missing")), 1.0);
        assert_eq!(numeric_attribute(&f, None), 1.0);
    }

    #[test]
    fn test_polygon_feature_centroid() {
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 2.0, y: 0.0),
            (x: 2.0, y: 2.0),
            (x: 0.0, y: 2.0),
        ];
        let f = Feature::with_geometry("sq", Geometry::Polygon(square));
        let c = f.centroid().unwrap();
        assert_abs_diff_eq!(c.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.y, 1.0, epsilon = 1e-12);
        assert!(f.geometry().is_some());
    }

    #[test]
    fn test_feature_without_geometry() {
        let f = Feature::without_geometry(5i64);
        assert_eq!(f.centroid(), None);
        assert!(f.geometry().is_none());
        assert_eq!(f.id(), FeatureId::Int(5));
    }
}
