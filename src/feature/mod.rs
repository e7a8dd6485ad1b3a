mod load_geo_json;
mod source;

use std::collections::HashMap;

use geo::coords_iter::CoordsIter;
use geo::{Coordinate, Geometry, GeometryCollection, Rect};

pub use load_geo_json::{load_features, read_geo_json_features, to_geo_json};
pub use source::FeatureSource;


#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    String(String),
    Number(f64),
    Array(Vec<PropertyValue>),
}

impl From<serde_json::Value> for PropertyValue {
    fn from(val: serde_json::Value) -> Self {
        Self::from(&val)
    }
}

impl From<&serde_json::Value> for PropertyValue {
    fn from(val: &serde_json::Value) -> Self {
        match val {
            serde_json::Value::Null => Self::Null,
            // nested objects are kept as their JSON text
            serde_json::Value::Object(_) => Self::String(val.to_string()),
            serde_json::Value::Bool(v) => Self::Bool(*v),
            serde_json::Value::String(v) => Self::String(v.clone()),
            serde_json::Value::Number(v) => Self::Number(v.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::Array(v) => Self::Array(v.iter().map(|e| e.into()).collect()),
        }
    }
}

impl From<PropertyValue> for serde_json::Value {
    fn from(val: PropertyValue) -> Self {
        match val {
            PropertyValue::Null => serde_json::Value::Null,
            PropertyValue::Bool(b) => serde_json::Value::Bool(b),
            PropertyValue::String(s) => serde_json::Value::String(s),
            PropertyValue::Number(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            PropertyValue::Array(v) => serde_json::Value::Array(v.into_iter().map(|e| e.into()).collect()),
        }
    }
}

/// A feature of a layer.
///
/// Clipping never touches `geometry`; it produces a copy carrying a clipped geometry next to
/// the original one.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: String,
    pub geometry: Geometry<f64>,
    pub properties: HashMap<String, PropertyValue>,
    envelope: Option<Rect<f64>>,
    clipped_geometry: Option<Geometry<f64>>,
}

impl Feature {
    pub fn new(id: impl Into<String>, geometry: Geometry<f64>) -> Self {
        let envelope = envelope_of(&geometry);
        Feature {
            id: id.into(),
            geometry,
            properties: HashMap::new(),
            envelope,
            clipped_geometry: None,
        }
    }

    pub fn with_properties(mut self, properties: HashMap<String, PropertyValue>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_clipped_geometry(mut self, clipped_geometry: Geometry<f64>) -> Self {
        self.clipped_geometry = Some(clipped_geometry);
        self
    }

    /// bounding rectangle of the original geometry, `None` if it has no coordinates
    pub fn envelope(&self) -> Option<Rect<f64>> {
        self.envelope
    }

    pub fn is_clipped(&self) -> bool {
        self.clipped_geometry.is_some()
    }

    pub fn clipped_geometry(&self) -> Option<&Geometry<f64>> {
        self.clipped_geometry.as_ref()
    }

    /// the geometry to hand to a renderer
    pub fn render_geometry(&self) -> &Geometry<f64> {
        self.clipped_geometry.as_ref().unwrap_or(&self.geometry)
    }
}

fn envelope_of(geometry: &Geometry<f64>) -> Option<Rect<f64>> {
    geometry.coords_iter().fold(None, |acc: Option<Rect<f64>>, c: Coordinate<f64>| match acc {
        None => Some(Rect::new(c, c)),
        Some(rect) => Some(Rect::new(
            Coordinate { x: rect.min().x.min(c.x), y: rect.min().y.min(c.y) },
            Coordinate { x: rect.max().x.max(c.x), y: rect.max().y.max(c.y) },
        )),
    })
}

/// geometry standing in for "nothing left" after clipping
pub fn empty_geometry() -> Geometry<f64> {
    Geometry::GeometryCollection(GeometryCollection(vec![]))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection(pub Vec<Feature>);

impl std::ops::Deref for FeatureCollection {
    type Target = Vec<Feature>;
    fn deref(&self) -> &Vec<Feature> {
        &self.0
    }
}

impl std::ops::DerefMut for FeatureCollection {
    fn deref_mut(&mut self) -> &mut Vec<Feature> {
        &mut self.0
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        FeatureCollection(iter.into_iter().collect())
    }
}

impl IntoIterator for FeatureCollection {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FeatureCollection {
    pub fn new() -> Self {
        FeatureCollection(Vec::<Feature>::new())
    }

    pub fn ids(&self) -> Vec<&str> {
        self.iter().map(|f| f.id.as_str()).collect()
    }
}
