//! Per-topic transform plans
//!
//! Each topic declares its normalization as data: an ordered list of layer
//! steps (transform options plus an optional join) and an optional
//! auxiliary topic dependency. The registry resolves a plan per base topic
//! at the start of a run; there is no per-topic code.

use crate::core::transform::TransformOptions;
use crate::domain::{BaseTopic, FieldType};

/// A join against the auxiliary topic's normalized layer.
#[derive(Debug, Clone)]
pub struct JoinStep {
    /// Layer of the auxiliary dataset to join against.
    pub aux_layer: &'static str,

    /// Linkage field present in both layers.
    pub on: &'static str,

    /// Fields copied from the matching auxiliary feature.
    pub take: &'static [&'static str],

    /// Remove the linkage field from the output once joined.
    pub drop_key: bool,
}

/// One layer transformation step of a topic plan.
#[derive(Debug, Clone)]
pub struct LayerStep {
    /// Source and target layer name.
    pub layer: &'static str,

    /// Transform options for the layer.
    pub options: TransformOptions,

    /// Optional join executed after the transform.
    pub join: Option<JoinStep>,
}

impl LayerStep {
    fn new(layer: &'static str, options: TransformOptions) -> Self {
        Self {
            layer,
            options,
            join: None,
        }
    }

    fn with_join(mut self, join: JoinStep) -> Self {
        self.join = Some(join);
        self
    }
}

/// The declarative processing plan of one topic.
#[derive(Debug, Clone)]
pub struct TopicPlan {
    /// Auxiliary topic whose data this topic's transform depends on.
    pub aux_topic: Option<BaseTopic>,

    /// Layer steps in execution order.
    pub steps: Vec<LayerStep>,
}

/// Common overrides: `t_id` becomes an integer, the given fields become
/// datetimes.
fn standard_overrides(date_fields: &[&str]) -> TransformOptions {
    let mut options = TransformOptions::default().override_field("t_id", FieldType::Integer);
    for field in date_fields {
        options = options.override_field(field, FieldType::DateTime);
    }
    options
}

/// Resolves the transform plan for `base_topic`.
pub fn plan_for(base_topic: BaseTopic) -> TopicPlan {
    match base_topic {
        BaseTopic::PerimeterLnSf => TopicPlan {
            aux_topic: None,
            steps: vec![LayerStep::new(
                "perimeter_ln_sf",
                standard_overrides(&["bezugsjahr"])
                    .drop_field("_part_number")
                    .drop_field("_geometry_name")
                    .explode_multipart(),
            )],
        },
        BaseTopic::Rebbaukataster => TopicPlan {
            aux_topic: None,
            steps: vec![LayerStep::new(
                "rebbaukataster",
                standard_overrides(&["aenderungsdatum"]).explode_multipart(),
            )],
        },
        BaseTopic::PerimeterTerrassenreben => TopicPlan {
            aux_topic: None,
            steps: vec![LayerStep::new(
                "perimeter_terrassenreben",
                standard_overrides(&["aenderungsdatum"]).explode_multipart(),
            )],
        },
        BaseTopic::Biodiversitaetsfoerderflaechen => {
            let date_fields = [
                "bezugsjahr",
                "schnittzeitpunkt",
                "verpflichtung_von",
                "verpflichtung_bis",
            ];
            TopicPlan {
                aux_topic: None,
                steps: vec![
                    LayerStep::new(
                        "bff_qualitaet_2_flaechen",
                        standard_overrides(&date_fields)
                            .filter_lnf_codes()
                            .explode_multipart(),
                    ),
                    LayerStep::new(
                        "bff_vernetzung_flaechen",
                        standard_overrides(&date_fields)
                            .filter_lnf_codes()
                            .explode_multipart(),
                    ),
                ],
            }
        }
        BaseTopic::Bewirtschaftungseinheit => TopicPlan {
            aux_topic: None,
            steps: vec![
                LayerStep::new(
                    "betrieb",
                    standard_overrides(&["bezugsjahr"]).explode_multipart(),
                ),
                LayerStep::new(
                    "bewirtschaftungseinheit",
                    standard_overrides(&["bezugsjahr"])
                        .drop_field("identifikator_be")
                        .explode_multipart(),
                ),
                LayerStep::new(
                    "produktionsstaette",
                    standard_overrides(&["bezugsjahr"]).explode_multipart(),
                ),
            ],
        },
        BaseTopic::Nutzungsflaechen => TopicPlan {
            aux_topic: Some(BaseTopic::Bewirtschaftungseinheit),
            steps: vec![LayerStep::new(
                "nutzungsflaechen",
                standard_overrides(&["bezugsjahr", "verpflichtung_von", "verpflichtung_bis"])
                    .filter_lnf_codes()
                    .explode_multipart(),
            )
            .with_join(JoinStep {
                aux_layer: "bewirtschaftungseinheit",
                on: "identifikator_be",
                take: &["betriebsnummer"],
                drop_key: true,
            })],
        },
    }
}
