//! Layer transformation engine
//!
//! Rewrites one source layer into the canonical target layout: schema
//! construction with per-field overrides, feature copy with type coercion,
//! LNF domain-code filtering and multipart-to-singlepart decomposition.
//! The input layer is read-only; the engine always builds a new layer.

use super::dates::parse_partial_date;
use super::geometry;
use crate::domain::{
    Feature, FieldDef, FieldType, FieldValue, InvalidGeometryError, Layer, Result,
};

/// Name of the LNF domain-code field.
const LNF_CODE_FIELD: &str = "lnf_code";

/// A target-type override for one source field.
#[derive(Debug, Clone)]
pub struct FieldOverride {
    /// Source field name.
    pub name: String,

    /// Target semantic type.
    pub field_type: FieldType,

    /// Optional target width.
    pub width: Option<u32>,
}

impl FieldOverride {
    /// Creates an override without a width.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            width: None,
        }
    }
}

/// Options controlling a single layer transform.
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    /// Target-type overrides, keyed by source field name.
    pub field_overrides: Vec<FieldOverride>,

    /// Fields removed from the target schema.
    pub fields_to_drop: Vec<String>,

    /// Remove features carrying an excluded LNF code.
    pub filter_lnf_codes: bool,

    /// Decompose multipart geometries into one feature per part.
    pub explode_multipart: bool,
}

impl TransformOptions {
    /// Adds an override coercing `name` to `field_type`.
    pub fn override_field(mut self, name: &str, field_type: FieldType) -> Self {
        self.field_overrides.push(FieldOverride::new(name, field_type));
        self
    }

    /// Drops `name` from the target schema.
    pub fn drop_field(mut self, name: &str) -> Self {
        self.fields_to_drop.push(name.to_string());
        self
    }

    /// Enables LNF domain-code filtering.
    pub fn filter_lnf_codes(mut self) -> Self {
        self.filter_lnf_codes = true;
        self
    }

    /// Enables multipart decomposition.
    pub fn explode_multipart(mut self) -> Self {
        self.explode_multipart = true;
        self
    }

    fn override_for(&self, name: &str) -> Option<&FieldOverride> {
        self.field_overrides
            .iter()
            .find(|field_override| field_override.name == name)
    }
}

/// Transforms `input` into a normalized layer.
///
/// # Errors
///
/// Returns [`InvalidGeometryError`] when a feature geometry violates
/// polygon validity rules (fatal for the whole layer), or a transform
/// error when a datetime-coerced field holds a malformed value.
pub fn transform_layer(input: &Layer, options: &TransformOptions) -> Result<Layer> {
    let mut output = Layer::new(input.name());

    // Schema: input order, overrides applied in place, drops afterwards.
    for field in input.schema() {
        match options.override_for(&field.name) {
            Some(field_override) => {
                let mut def = FieldDef::new(field.name.clone(), field_override.field_type);
                def.width = field_override.width;
                output.add_field(def);
            }
            None => output.add_field(field.clone()),
        }
    }
    for name in &options.fields_to_drop {
        output.remove_field(name);
    }

    let schema: Vec<FieldDef> = output.schema().to_vec();
    for feature in input.features() {
        if let Err(reason) = geometry::validate(&feature.geometry) {
            tracing::error!(
                layer = input.name(),
                feature_id = feature.id,
                reason = %reason,
                "Feature geometry is invalid"
            );
            return Err(InvalidGeometryError::new(feature.id).into());
        }

        let mut copied = Feature::new(feature.id, feature.geometry.clone());
        for field in &schema {
            let Some(value) = feature.attribute(&field.name) else {
                continue;
            };
            match field.field_type {
                FieldType::Integer => {
                    if let Some(integer) = value.as_integer() {
                        copied.set_attribute(field.name.clone(), FieldValue::Integer(integer));
                    }
                }
                FieldType::Real => {
                    if let Some(real) = value.as_real() {
                        copied.set_attribute(field.name.clone(), FieldValue::Real(real));
                    }
                }
                FieldType::DateTime => match value {
                    FieldValue::DateTime(datetime) => {
                        copied.set_attribute(field.name.clone(), FieldValue::DateTime(*datetime));
                    }
                    other => {
                        if let Some(datetime) = parse_partial_date(&other.as_text())? {
                            copied
                                .set_attribute(field.name.clone(), FieldValue::DateTime(datetime));
                        }
                    }
                },
                FieldType::Text => {
                    copied.set_attribute(field.name.clone(), FieldValue::Text(value.as_text()));
                }
            }
        }
        output.push_feature(copied);
    }

    if options.filter_lnf_codes {
        filter_lnf_codes(&mut output);
    }
    if options.explode_multipart {
        explode_multipart(&mut output);
    }

    Ok(output)
}

/// `true` for LNF codes excluded from normalized output (921-928, 950, 951).
fn is_excluded_lnf_code(code: i64) -> bool {
    (921..=928).contains(&code) || code == 950 || code == 951
}

/// Removes features whose `lnf_code` lies in the excluded set.
fn filter_lnf_codes(layer: &mut Layer) {
    layer.features_mut().retain(|feature| {
        let code = feature
            .attribute(LNF_CODE_FIELD)
            .and_then(FieldValue::as_integer)
            .unwrap_or(0);
        !is_excluded_lnf_code(code)
    });
}

/// Replaces every multipart feature (part count > 1) with one feature per
/// part. New features clone all attributes and receive fresh ids.
fn explode_multipart(layer: &mut Layer) {
    let features = std::mem::take(layer.features_mut());
    for feature in features {
        if geometry::part_count(&feature.geometry) > 1 {
            for part in geometry::parts(&feature.geometry) {
                let id = layer.allocate_id();
                layer.push_feature(Feature {
                    id,
                    attributes: feature.attributes.clone(),
                    geometry: part,
                });
            }
        } else {
            layer.push_feature(feature);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Geometry, MultiPolygon};

    fn square(origin: f64, size: f64) -> geo::Polygon<f64> {
        polygon![
            (x: origin, y: origin),
            (x: origin + size, y: origin),
            (x: origin + size, y: origin + size),
            (x: origin, y: origin + size),
        ]
    }

    fn input_layer() -> Layer {
        let mut layer = Layer::new("rebbaukataster");
        layer.add_field(FieldDef::new("t_id", FieldType::Text));
        layer.add_field(FieldDef::new("aenderungsdatum", FieldType::Text));
        layer.add_field(FieldDef::new("flaeche", FieldType::Text));
        layer.add_field(FieldDef::new("bemerkung", FieldType::Text));

        let mut feature = Feature::new(1, Geometry::Polygon(square(0.0, 10.0)));
        feature.set_attribute("t_id", FieldValue::Text("17".to_string()));
        feature.set_attribute("aenderungsdatum", FieldValue::Text("2023-04".to_string()));
        feature.set_attribute("flaeche", FieldValue::Text("12.5".to_string()));
        feature.set_attribute("bemerkung", FieldValue::Text("ok".to_string()));
        layer.push_feature(feature);
        layer
    }

    #[test]
    fn test_schema_overrides_and_drops() {
        let options = TransformOptions::default()
            .override_field("t_id", FieldType::Integer)
            .override_field("aenderungsdatum", FieldType::DateTime)
            .drop_field("bemerkung");

        let output = transform_layer(&input_layer(), &options).unwrap();
        let names: Vec<&str> = output.schema().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["t_id", "aenderungsdatum", "flaeche"]);
        assert_eq!(output.field("t_id").unwrap().field_type, FieldType::Integer);
        assert_eq!(
            output.field("aenderungsdatum").unwrap().field_type,
            FieldType::DateTime
        );
        // Unlisted fields keep their original definition.
        assert_eq!(output.field("flaeche").unwrap().field_type, FieldType::Text);
    }

    #[test]
    fn test_feature_copy_coerces_by_target_type() {
        let options = TransformOptions::default()
            .override_field("t_id", FieldType::Integer)
            .override_field("aenderungsdatum", FieldType::DateTime)
            .override_field("flaeche", FieldType::Real);

        let output = transform_layer(&input_layer(), &options).unwrap();
        let feature = &output.features()[0];
        assert_eq!(feature.attribute("t_id"), Some(&FieldValue::Integer(17)));
        assert_eq!(feature.attribute("flaeche"), Some(&FieldValue::Real(12.5)));
        match feature.attribute("aenderungsdatum") {
            Some(FieldValue::DateTime(datetime)) => {
                assert_eq!(datetime.to_string(), "2023-04-01 00:00:00");
            }
            other => panic!("expected datetime, got {other:?}"),
        }
    }

    #[test]
    fn test_unparseable_integer_stays_null() {
        let mut layer = Layer::new("betrieb");
        layer.add_field(FieldDef::new("anzahl", FieldType::Text));
        let mut feature = Feature::new(1, Geometry::Polygon(square(0.0, 10.0)));
        feature.set_attribute("anzahl", FieldValue::Text("unbekannt".to_string()));
        layer.push_feature(feature);

        let options = TransformOptions::default().override_field("anzahl", FieldType::Integer);
        let output = transform_layer(&layer, &options).unwrap();
        assert!(output.features()[0].attribute("anzahl").is_none());
    }

    #[test]
    fn test_empty_date_stays_null() {
        let mut layer = Layer::new("betrieb");
        layer.add_field(FieldDef::new("bezugsjahr", FieldType::Text));
        let mut feature = Feature::new(1, Geometry::Polygon(square(0.0, 10.0)));
        feature.set_attribute("bezugsjahr", FieldValue::Text(String::new()));
        layer.push_feature(feature);

        let options = TransformOptions::default().override_field("bezugsjahr", FieldType::DateTime);
        let output = transform_layer(&layer, &options).unwrap();
        assert!(output.features()[0].attribute("bezugsjahr").is_none());
    }

    #[test]
    fn test_malformed_date_fails_the_layer() {
        let mut layer = Layer::new("betrieb");
        layer.add_field(FieldDef::new("bezugsjahr", FieldType::Text));
        let mut feature = Feature::new(1, Geometry::Polygon(square(0.0, 10.0)));
        feature.set_attribute("bezugsjahr", FieldValue::Text("morgen".to_string()));
        layer.push_feature(feature);

        let options = TransformOptions::default().override_field("bezugsjahr", FieldType::DateTime);
        assert!(transform_layer(&layer, &options).is_err());
    }

    #[test]
    fn test_lnf_filter_removes_excluded_codes() {
        let mut layer = Layer::new("bff_qualitaet_2_flaechen");
        layer.add_field(FieldDef::new("lnf_code", FieldType::Integer));

        for (id, code) in [(1, 910), (2, 921), (3, 928), (4, 950), (5, 951), (6, 601)] {
            let mut feature = Feature::new(id, Geometry::Polygon(square(0.0, 10.0)));
            feature.set_attribute("lnf_code", FieldValue::Integer(code));
            layer.push_feature(feature);
        }

        let options = TransformOptions {
            filter_lnf_codes: true,
            ..Default::default()
        };
        let output = transform_layer(&layer, &options).unwrap();

        let codes: Vec<i64> = output
            .features()
            .iter()
            .filter_map(|f| f.attribute("lnf_code").and_then(FieldValue::as_integer))
            .collect();
        assert_eq!(codes, vec![910, 601]);
    }

    #[test]
    fn test_feature_without_lnf_code_survives_filter() {
        let mut layer = Layer::new("bff_vernetzung_flaechen");
        layer.add_field(FieldDef::new("lnf_code", FieldType::Integer));
        layer.push_feature(Feature::new(1, Geometry::Polygon(square(0.0, 10.0))));

        let options = TransformOptions {
            filter_lnf_codes: true,
            ..Default::default()
        };
        let output = transform_layer(&layer, &options).unwrap();
        assert_eq!(output.feature_count(), 1);
    }

    #[test]
    fn test_multipart_decomposition() {
        let mut layer = Layer::new("perimeter_ln_sf");
        layer.add_field(FieldDef::new("bezugsjahr", FieldType::Text));

        let multi = Geometry::MultiPolygon(MultiPolygon(vec![
            square(0.0, 5.0),
            square(10.0, 5.0),
            square(20.0, 5.0),
        ]));
        let mut feature = Feature::new(1, multi);
        feature.set_attribute("bezugsjahr", FieldValue::Text("2023".to_string()));
        layer.push_feature(feature);

        let options = TransformOptions {
            explode_multipart: true,
            ..Default::default()
        };
        let output = transform_layer(&layer, &options).unwrap();

        assert_eq!(output.feature_count(), 3);
        for feature in output.features() {
            assert!(matches!(feature.geometry, Geometry::Polygon(_)));
            assert_ne!(feature.id, 1, "exploded parts receive fresh ids");
            assert_eq!(
                feature.attribute("bezugsjahr"),
                Some(&FieldValue::Text("2023".to_string()))
            );
        }
    }

    #[test]
    fn test_single_part_multi_geometry_passes_through() {
        let mut layer = Layer::new("perimeter_ln_sf");
        let multi = Geometry::MultiPolygon(MultiPolygon(vec![square(0.0, 5.0)]));
        layer.push_feature(Feature::new(1, multi));

        let options = TransformOptions {
            explode_multipart: true,
            ..Default::default()
        };
        let output = transform_layer(&layer, &options).unwrap();
        assert_eq!(output.feature_count(), 1);
        assert_eq!(output.features()[0].id, 1);
        assert!(matches!(
            output.features()[0].geometry,
            Geometry::MultiPolygon(_)
        ));
    }

    #[test]
    fn test_invalid_geometry_aborts_layer_with_feature_id() {
        let mut layer = Layer::new("perimeter_ln_sf");
        layer.push_feature(Feature::new(1, Geometry::Polygon(square(0.0, 10.0))));

        let bowtie = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 10.0, y: 0.0),
            (x: 0.0, y: 10.0),
        ];
        layer.push_feature(Feature::new(2, Geometry::Polygon(bowtie)));

        let err = transform_layer(&layer, &TransformOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid geometry for feature with ID 2");
    }

    #[test]
    fn test_valid_donut_decomposes_normally() {
        let donut = geo::Polygon::new(
            square(0.0, 10.0).exterior().clone(),
            vec![square(4.0, 2.0).exterior().clone()],
        );
        let mut layer = Layer::new("perimeter_ln_sf");
        layer.push_feature(Feature::new(
            1,
            Geometry::MultiPolygon(MultiPolygon(vec![donut, square(20.0, 5.0)])),
        ));

        let options = TransformOptions {
            explode_multipart: true,
            ..Default::default()
        };
        let output = transform_layer(&layer, &options).unwrap();
        assert_eq!(output.feature_count(), 2);
    }
}
