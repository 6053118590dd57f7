//! In-memory geodata model
//!
//! A [`Dataset`] is the full collection of layers consumed or produced by
//! one pipeline run; a [`Layer`] is a named feature collection with an
//! ordered field schema; a [`Feature`] is one record with attribute values
//! and exactly one geometry. Input and normalized datasets are distinct
//! owned instances — the transformation engine never mutates its input.

use chrono::NaiveDateTime;
use geo::Geometry;
use std::collections::HashMap;

/// Semantic type of a layer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// 64-bit integer
    Integer,
    /// Double-precision float
    Real,
    /// Date/time without timezone
    DateTime,
    /// Free-form text
    Text,
}

/// One field of a layer schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name, unique within the layer.
    pub name: String,

    /// Semantic type of the field.
    pub field_type: FieldType,

    /// Optional field width carried over from the source schema.
    pub width: Option<u32>,

    /// Optional numeric precision carried over from the source schema.
    pub precision: Option<u32>,
}

impl FieldDef {
    /// Creates a field definition without width or precision.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            width: None,
            precision: None,
        }
    }

    /// Sets the field width.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Sets the numeric precision.
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }
}

/// A single attribute value. Absent values are not stored at all.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Real(f64),
    DateTime(NaiveDateTime),
    Text(String),
}

impl FieldValue {
    /// Coerces the value to an integer; `None` if it cannot be interpreted
    /// as one (e.g. non-numeric text or a datetime).
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            FieldValue::Real(value) => Some(value.trunc() as i64),
            FieldValue::Text(value) => value.trim().parse().ok(),
            FieldValue::DateTime(_) => None,
        }
    }

    /// Coerces the value to a double; `None` if it cannot be interpreted
    /// as one.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(value) => Some(*value as f64),
            FieldValue::Real(value) => Some(*value),
            FieldValue::Text(value) => value.trim().parse().ok(),
            FieldValue::DateTime(_) => None,
        }
    }

    /// Renders the value as text.
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Integer(value) => value.to_string(),
            FieldValue::Real(value) => value.to_string(),
            FieldValue::DateTime(value) => value.format("%Y-%m-%dT%H:%M:%S").to_string(),
            FieldValue::Text(value) => value.clone(),
        }
    }
}

/// One record of a layer: attribute values plus one geometry.
#[derive(Debug, Clone)]
pub struct Feature {
    /// Feature identity, unique within the layer.
    pub id: i64,

    /// Attribute values keyed by field name. Fields without a value are
    /// simply absent (null).
    pub attributes: HashMap<String, FieldValue>,

    /// The feature geometry.
    pub geometry: Geometry<f64>,
}

impl Feature {
    /// Creates a feature without attributes.
    pub fn new(id: i64, geometry: Geometry<f64>) -> Self {
        Self {
            id,
            attributes: HashMap::new(),
            geometry,
        }
    }

    /// Returns the attribute value for `name`, if set.
    pub fn attribute(&self, name: &str) -> Option<&FieldValue> {
        self.attributes.get(name)
    }

    /// Sets an attribute value.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: FieldValue) {
        self.attributes.insert(name.into(), value);
    }
}

/// A named feature collection with an ordered field schema.
#[derive(Debug, Clone)]
pub struct Layer {
    name: String,
    schema: Vec<FieldDef>,
    features: Vec<Feature>,
    next_id: i64,
}

impl Layer {
    /// Creates an empty layer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: Vec::new(),
            features: Vec::new(),
            next_id: 1,
        }
    }

    /// Layer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ordered field schema.
    pub fn schema(&self) -> &[FieldDef] {
        &self.schema
    }

    /// Returns the field definition for `name`, if present.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.schema.iter().find(|field| field.name == name)
    }

    /// Appends a field to the schema.
    pub fn add_field(&mut self, field: FieldDef) {
        self.schema.push(field);
    }

    /// Removes a field from the schema and from all features. No-op if the
    /// field does not exist.
    pub fn remove_field(&mut self, name: &str) {
        self.schema.retain(|field| field.name != name);
        for feature in &mut self.features {
            feature.attributes.remove(name);
        }
    }

    /// The features of the layer, in insertion order.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Mutable access to the features.
    pub fn features_mut(&mut self) -> &mut Vec<Feature> {
        &mut self.features
    }

    /// Appends a feature, keeping the id allocator ahead of existing ids.
    pub fn push_feature(&mut self, feature: Feature) {
        self.next_id = self.next_id.max(feature.id + 1);
        self.features.push(feature);
    }

    /// Allocates a fresh feature id, never reusing an existing one.
    pub fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Number of features in the layer.
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}

/// An ordered collection of layers owned by one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    layers: Vec<Layer>,
}

impl Dataset {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a layer. Layer order is preserved.
    pub fn push_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Returns the layer named `name`, if present.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.name() == name)
    }

    /// The layers in insertion order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// `true` if the dataset has no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::point;

    fn point_geometry() -> Geometry<f64> {
        Geometry::Point(point!(x: 2600000.0, y: 1200000.0))
    }

    #[test]
    fn test_field_value_integer_coercion() {
        assert_eq!(FieldValue::Integer(7).as_integer(), Some(7));
        assert_eq!(FieldValue::Real(7.9).as_integer(), Some(7));
        assert_eq!(FieldValue::Text(" 42 ".to_string()).as_integer(), Some(42));
        assert_eq!(FieldValue::Text("abc".to_string()).as_integer(), None);
    }

    #[test]
    fn test_field_value_real_coercion() {
        assert_eq!(FieldValue::Text("3.25".to_string()).as_real(), Some(3.25));
        assert_eq!(FieldValue::Integer(3).as_real(), Some(3.0));
        assert_eq!(FieldValue::Text("n/a".to_string()).as_real(), None);
    }

    #[test]
    fn test_layer_remove_field_clears_attributes() {
        let mut layer = Layer::new("betrieb");
        layer.add_field(FieldDef::new("identifikator_be", FieldType::Text));
        layer.add_field(FieldDef::new("bezugsjahr", FieldType::DateTime));

        let mut feature = Feature::new(1, point_geometry());
        feature.set_attribute("identifikator_be", FieldValue::Text("BE-1".to_string()));
        layer.push_feature(feature);

        layer.remove_field("identifikator_be");
        assert!(layer.field("identifikator_be").is_none());
        assert!(layer.features()[0].attribute("identifikator_be").is_none());

        // removing an absent field is a no-op
        layer.remove_field("does_not_exist");
        assert_eq!(layer.schema().len(), 1);
    }

    #[test]
    fn test_layer_id_allocation_never_reuses() {
        let mut layer = Layer::new("rebbaukataster");
        layer.push_feature(Feature::new(10, point_geometry()));
        layer.push_feature(Feature::new(3, point_geometry()));

        let id = layer.allocate_id();
        assert_eq!(id, 11);
        assert_eq!(layer.allocate_id(), 12);
    }

    #[test]
    fn test_dataset_lookup_preserves_order() {
        let mut dataset = Dataset::new();
        dataset.push_layer(Layer::new("betrieb"));
        dataset.push_layer(Layer::new("produktionsstaette"));

        assert_eq!(dataset.layers()[0].name(), "betrieb");
        assert!(dataset.layer("produktionsstaette").is_some());
        assert!(dataset.layer("missing").is_none());
    }
}
