//! GeoJSON dataset I/O
//!
//! Raw and normalized datasets are directories holding one GeoJSON
//! `FeatureCollection` file per layer. Reading builds the in-memory
//! [`Dataset`] model; the input field schema is taken from the property
//! types as the reader encounters them (the normalized target schema is
//! always defined by the topic's transform plan, never inferred).

use crate::domain::{Dataset, Feature, FieldDef, FieldType, FieldValue, HarvestError, Layer, Result};
use geojson::feature::Id;
use geojson::{FeatureCollection, GeoJson};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// File extension of layer files.
const LAYER_EXTENSION: &str = "geojson";

/// Reads every layer file in `dir` into a dataset. Layers are ordered by
/// file name so repeated reads are deterministic.
pub fn read_dataset(dir: &Path) -> Result<Dataset> {
    let mut paths: Vec<_> = fs::read_dir(dir)
        .map_err(|e| HarvestError::Io(format!("Failed to read {}: {e}", dir.display())))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case(LAYER_EXTENSION))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();

    let mut dataset = Dataset::new();
    for path in paths {
        dataset.push_layer(read_layer(&path)?);
    }
    Ok(dataset)
}

/// Reads a single layer file. The layer name is the file stem.
pub fn read_layer(path: &Path) -> Result<Layer> {
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .ok_or_else(|| HarvestError::Io(format!("Invalid layer file name: {}", path.display())))?;

    let contents = fs::read_to_string(path)
        .map_err(|e| HarvestError::Io(format!("Failed to read {}: {e}", path.display())))?;
    let geojson: GeoJson = contents
        .parse()
        .map_err(|e| HarvestError::Serialization(format!("Invalid GeoJSON in {name}: {e}")))?;
    let collection = FeatureCollection::try_from(geojson)
        .map_err(|e| HarvestError::Serialization(format!("Layer {name} is not a FeatureCollection: {e}")))?;

    let mut layer = Layer::new(name.clone());
    let mut seen_fields: HashSet<String> = HashSet::new();

    for (index, geojson_feature) in collection.features.into_iter().enumerate() {
        let geometry = geojson_feature
            .geometry
            .ok_or_else(|| {
                HarvestError::Serialization(format!("Feature without geometry in layer {name}"))
            })
            .and_then(|geometry| {
                geo::Geometry::<f64>::try_from(geometry.value).map_err(|e| {
                    HarvestError::Serialization(format!("Unsupported geometry in layer {name}: {e}"))
                })
            })?;

        let id = match &geojson_feature.id {
            Some(Id::Number(number)) => number.as_i64(),
            Some(Id::String(text)) => text.parse().ok(),
            None => None,
        };

        let mut feature = Feature::new(id.unwrap_or(index as i64 + 1), geometry);
        if let Some(properties) = geojson_feature.properties {
            for (key, value) in properties {
                let Some(field_value) = field_value_from_json(&value) else {
                    continue;
                };
                if seen_fields.insert(key.clone()) {
                    layer.add_field(FieldDef::new(key.clone(), field_type_of(&field_value)));
                }
                feature.set_attribute(key, field_value);
            }
        }
        layer.push_feature(feature);
    }

    Ok(layer)
}

/// Writes every layer of `dataset` into `dir`, one file per layer.
pub fn write_dataset(dataset: &Dataset, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    for layer in dataset.layers() {
        let path = dir.join(format!("{}.{LAYER_EXTENSION}", layer.name()));
        write_layer(layer, &path)?;
    }
    Ok(())
}

/// Writes a single layer as a GeoJSON `FeatureCollection`.
pub fn write_layer(layer: &Layer, path: &Path) -> Result<()> {
    let features = layer
        .features()
        .iter()
        .map(|feature| {
            let mut properties = serde_json::Map::new();
            for field in layer.schema() {
                if let Some(value) = feature.attribute(&field.name) {
                    properties.insert(field.name.clone(), field_value_to_json(value));
                }
            }

            geojson::Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(
                    &feature.geometry,
                ))),
                id: Some(Id::Number(feature.id.into())),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    fs::write(path, GeoJson::from(collection).to_string())
        .map_err(|e| HarvestError::Io(format!("Failed to write {}: {e}", path.display())))?;
    Ok(())
}

fn field_value_from_json(value: &serde_json::Value) -> Option<FieldValue> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::Number(number) => {
            if let Some(integer) = number.as_i64() {
                Some(FieldValue::Integer(integer))
            } else {
                number.as_f64().map(FieldValue::Real)
            }
        }
        serde_json::Value::String(text) => Some(FieldValue::Text(text.clone())),
        serde_json::Value::Bool(flag) => Some(FieldValue::Text(flag.to_string())),
        other => Some(FieldValue::Text(other.to_string())),
    }
}

fn field_value_to_json(value: &FieldValue) -> serde_json::Value {
    match value {
        FieldValue::Integer(integer) => serde_json::Value::from(*integer),
        FieldValue::Real(real) => serde_json::Value::from(*real),
        FieldValue::DateTime(_) | FieldValue::Text(_) => serde_json::Value::from(value.as_text()),
    }
}

fn field_type_of(value: &FieldValue) -> FieldType {
    match value {
        FieldValue::Integer(_) => FieldType::Integer,
        FieldValue::Real(_) => FieldType::Real,
        FieldValue::DateTime(_) => FieldType::DateTime,
        FieldValue::Text(_) => FieldType::Text,
    }
}
