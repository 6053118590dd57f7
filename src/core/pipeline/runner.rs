//! Topic pipeline runner
//!
//! Drives one topic/canton pair end to end: prepare (token + export +
//! download, concurrently for a declared auxiliary topic), transform the
//! declared layers in order, package the normalized dataset and publish
//! it. Every step returns a typed result; the runner is the single
//! boundary converting errors into a [`ProcessingResult`].

use super::package::zip_directory;
use super::plan::{plan_for, JoinStep, TopicPlan};
use crate::adapters::dataset as dataset_io;
use crate::adapters::geodienste::GeodiensteApi;
use crate::adapters::storage::ArtifactStore;
use crate::config::HarvestConfig;
use crate::core::export::ExportCoordinator;
use crate::core::transform::transform_layer;
use crate::domain::{
    Dataset, FieldDef, FieldType, FieldValue, HarvestError, Layer, ProcessingResult, Result, Topic,
};
use chrono::Local;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::watch;

/// Runs the processing pipeline for single topics.
pub struct TopicPipeline<'a> {
    api: &'a dyn GeodiensteApi,
    store: &'a dyn ArtifactStore,
    config: &'a HarvestConfig,
    shutdown: watch::Receiver<bool>,
}

impl<'a> TopicPipeline<'a> {
    /// Creates a pipeline over the given collaborators.
    pub fn new(
        api: &'a dyn GeodiensteApi,
        store: &'a dyn ArtifactStore,
        config: &'a HarvestConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            api,
            store,
            config,
            shutdown,
        }
    }

    /// Processes `topic` and returns its result. Never returns an error:
    /// every failure is converted into the result, and scratch files are
    /// removed best-effort either way.
    pub async fn process(&self, topic: &Topic) -> ProcessingResult {
        tracing::info!(topic = %topic, "Processing topic");
        let placeholder = ProcessingResult::in_progress(topic);
        let scratch = self.scratch_dir(topic);

        let outcome = self.run(topic, &scratch).await;

        if scratch.exists() {
            if let Err(e) = std::fs::remove_dir_all(&scratch) {
                tracing::warn!(
                    scratch = %scratch.display(),
                    error = %e,
                    "Failed to clean up scratch directory"
                );
            }
        }

        match outcome {
            Ok(download_url) => {
                tracing::info!(topic = %topic, url = %download_url, "Topic processed");
                placeholder.succeeded(download_url)
            }
            Err(error) => {
                tracing::error!(topic = %topic, error = %error, "Topic processing failed");
                placeholder.failed(&error)
            }
        }
    }

    /// Scratch directory exclusive to this (canton, topic) pair.
    fn scratch_dir(&self, topic: &Topic) -> PathBuf {
        self.config
            .processing
            .temp_root
            .join(topic.canton.code())
            .join(topic.base_topic.id())
    }

    fn ensure_active(&self) -> Result<()> {
        if *self.shutdown.borrow() {
            return Err(HarvestError::Cancelled);
        }
        Ok(())
    }

    async fn run(&self, topic: &Topic, scratch: &Path) -> Result<String> {
        let plan = plan_for(topic.base_topic);
        let input_dir = scratch.join("input");
        let aux_dir = scratch.join("aux");

        // Preparing
        tracing::info!(topic = %topic, "Preparing data");
        let token = self
            .config
            .resolve_token(topic.base_topic, topic.canton)?;

        let aux_dataset = match plan.aux_topic {
            Some(aux_base) => {
                let aux_topic = Topic::derived(aux_base, topic.canton);
                let aux_token = self.config.resolve_token(aux_base, topic.canton)?;
                tokio::try_join!(
                    self.export_and_download(topic, &token, &input_dir),
                    self.export_and_download(&aux_topic, &aux_token, &aux_dir),
                )?;
                Some(dataset_io::read_dataset(&aux_dir)?)
            }
            None => {
                self.export_and_download(topic, &token, &input_dir).await?;
                None
            }
        };
        let input = dataset_io::read_dataset(&input_dir)?;

        // Transforming
        self.ensure_active()?;
        tracing::info!(topic = %topic, "Transforming layers");
        let mut normalized = Dataset::new();
        for step in &plan.steps {
            let source = input.layer(step.layer).ok_or_else(|| {
                HarvestError::Transform(format!("Input dataset has no layer {}", step.layer))
            })?;
            let mut output = transform_layer(source, &step.options)?;

            if let Some(join) = &step.join {
                let aux = aux_dataset.as_ref().ok_or_else(|| {
                    HarvestError::Transform(format!(
                        "Layer {} declares a join but the plan has no auxiliary topic",
                        step.layer
                    ))
                })?;
                let aux_layer = normalized_aux_layer(&plan, join, aux)?;
                join_aux_layer(&mut output, &aux_layer, join);
            }

            normalized.push_layer(output);
        }

        // Packaging
        let output_dir = scratch.join("output");
        dataset_io::write_dataset(&normalized, &output_dir)?;
        let zip_name = format!(
            "{}_{}_{}.zip",
            topic.base_topic.id(),
            topic.canton,
            Local::now().format("%Y%m%d%H%M"),
        );
        let archive_path = scratch.join(&zip_name);
        zip_directory(&output_dir, &archive_path)?;

        // Publishing
        self.ensure_active()?;
        tracing::info!(topic = %topic, artifact = %zip_name, "Publishing artifact");
        self.store
            .upload_file(&format!("{}/{zip_name}", topic.canton), &archive_path)
            .await
    }

    async fn export_and_download(
        &self,
        topic: &Topic,
        token: &str,
        destination: &Path,
    ) -> Result<PathBuf> {
        self.ensure_active()?;
        let resolved = ExportCoordinator::new(self.api)
            .submit_and_resolve(topic, token)
            .await?;
        self.ensure_active()?;
        self.api
            .download_export(&resolved.download_url, destination)
            .await
    }
}

/// Transforms the auxiliary layer a join refers to, keeping the linkage
/// field even when the auxiliary topic's own plan drops it.
fn normalized_aux_layer(plan: &TopicPlan, join: &JoinStep, aux: &Dataset) -> Result<Layer> {
    let aux_base = plan.aux_topic.ok_or_else(|| {
        HarvestError::Transform("Join without auxiliary topic declaration".to_string())
    })?;
    let aux_plan = plan_for(aux_base);
    let step = aux_plan
        .steps
        .iter()
        .find(|step| step.layer == join.aux_layer)
        .ok_or_else(|| {
            HarvestError::Transform(format!(
                "Auxiliary topic {aux_base} has no layer {}",
                join.aux_layer
            ))
        })?;

    let mut options = step.options.clone();
    options.fields_to_drop.retain(|field| field != join.on);

    let source = aux.layer(join.aux_layer).ok_or_else(|| {
        HarvestError::Transform(format!("Auxiliary dataset has no layer {}", join.aux_layer))
    })?;
    transform_layer(source, &options)
}

/// Copies the join's `take` fields from the matching auxiliary feature
/// into every output feature, then optionally drops the linkage field.
/// Features without a match keep the taken fields null.
fn join_aux_layer(output: &mut Layer, aux: &Layer, join: &JoinStep) {
    for name in join.take {
        match aux.field(name) {
            Some(def) => output.add_field(def.clone()),
            None => output.add_field(FieldDef::new(*name, FieldType::Text)),
        }
    }

    let mut index: HashMap<String, &crate::domain::Feature> = HashMap::new();
    for feature in aux.features() {
        if let Some(key) = feature.attribute(join.on).map(FieldValue::as_text) {
            index.entry(key).or_insert(feature);
        }
    }

    for feature in output.features_mut() {
        let Some(key) = feature.attribute(join.on).map(FieldValue::as_text) else {
            continue;
        };
        if let Some(aux_feature) = index.get(&key) {
            for name in join.take {
                if let Some(value) = aux_feature.attribute(name) {
                    feature.set_attribute(*name, value.clone());
                }
            }
        }
    }

    if join.drop_key {
        output.remove_field(join.on);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Feature;
    use geo::{point, Geometry};

    fn point_geometry() -> Geometry<f64> {
        Geometry::Point(point!(x: 2600000.0, y: 1200000.0))
    }

    fn join() -> JoinStep {
        JoinStep {
            aux_layer: "bewirtschaftungseinheit",
            on: "identifikator_be",
            take: &["betriebsnummer"],
            drop_key: true,
        }
    }

    fn aux_layer() -> Layer {
        let mut layer = Layer::new("bewirtschaftungseinheit");
        layer.add_field(FieldDef::new("identifikator_be", FieldType::Text));
        layer.add_field(FieldDef::new("betriebsnummer", FieldType::Text));

        let mut feature = Feature::new(1, point_geometry());
        feature.set_attribute("identifikator_be", FieldValue::Text("BE-1".to_string()));
        feature.set_attribute("betriebsnummer", FieldValue::Text("4711".to_string()));
        layer.push_feature(feature);
        layer
    }

    #[test]
    fn test_join_copies_fields_and_drops_key() {
        let mut output = Layer::new("nutzungsflaechen");
        output.add_field(FieldDef::new("identifikator_be", FieldType::Text));

        let mut matched = Feature::new(1, point_geometry());
        matched.set_attribute("identifikator_be", FieldValue::Text("BE-1".to_string()));
        output.push_feature(matched);

        let mut unmatched = Feature::new(2, point_geometry());
        unmatched.set_attribute("identifikator_be", FieldValue::Text("BE-9".to_string()));
        output.push_feature(unmatched);

        join_aux_layer(&mut output, &aux_layer(), &join());

        assert!(output.field("betriebsnummer").is_some());
        assert!(output.field("identifikator_be").is_none());
        assert_eq!(
            output.features()[0].attribute("betriebsnummer"),
            Some(&FieldValue::Text("4711".to_string()))
        );
        assert!(output.features()[1].attribute("betriebsnummer").is_none());
        assert!(output.features()[0].attribute("identifikator_be").is_none());
    }

    #[test]
    fn test_normalized_aux_layer_keeps_linkage_field() {
        let plan = plan_for(crate::domain::BaseTopic::Nutzungsflaechen);
        let mut aux = Dataset::new();
        aux.push_layer(aux_layer());

        let normalized = normalized_aux_layer(&plan, &join(), &aux).unwrap();
        // The bewirtschaftungseinheit plan drops identifikator_be, but the
        // join needs it to match features.
        assert!(normalized.field("identifikator_be").is_some());
    }
}
