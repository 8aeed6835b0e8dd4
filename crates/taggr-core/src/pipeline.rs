//! The inference pipeline orchestrator.
//!
//! A [`Tagger`] loads the model, tag metadata, and output map once, then
//! serves any number of inference requests. Each request owns its own
//! tensor and probability vector; nothing is shared mutably, so results
//! are identical no matter which thread runs the heavy stages.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::config::{Config, LimitsConfig};
use crate::decode;
use crate::engine::Engine;
use crate::error::{DecodeError, EngineError, Result, TaggrError};
use crate::labels::OutputMap;
use crate::metadata::TagMetadata;
use crate::preprocess;
use crate::ranker;
use crate::types::TagOutput;

/// A loaded tagger: model session plus vocabulary snapshot.
pub struct Tagger {
    engine: Arc<Engine>,
    metadata: TagMetadata,
    output_map: Arc<OutputMap>,
    limits: LimitsConfig,
}

impl Tagger {
    /// Load model and vocabulary from filesystem paths.
    pub fn load(
        model_path: &Path,
        tags_path: &Path,
        labels_path: &Path,
        limits: LimitsConfig,
    ) -> Result<Self> {
        tracing::info!("Loading tagger model from {:?}", model_path);
        let engine = Engine::load(model_path)?;
        let metadata = TagMetadata::load(tags_path)?;
        let output_map = OutputMap::load(labels_path)?;
        Self::assemble(engine, metadata, output_map, limits)
    }

    /// Load model and vocabulary from in-memory byte streams.
    pub fn from_bytes(
        model_bytes: &[u8],
        tags_csv: impl Read,
        labels_json: impl Read,
        limits: LimitsConfig,
    ) -> Result<Self> {
        let engine = Engine::load_from_bytes(model_bytes)?;
        let metadata = TagMetadata::from_reader(tags_csv)?;
        let output_map = OutputMap::from_reader(labels_json)?;
        Self::assemble(engine, metadata, output_map, limits)
    }

    /// Load using the paths from a [`Config`].
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::load(
            &config.model_path(),
            &config.tags_path(),
            &config.labels_path(),
            config.limits.clone(),
        )
    }

    fn assemble(
        engine: Engine,
        metadata: TagMetadata,
        output_map: OutputMap,
        limits: LimitsConfig,
    ) -> Result<Self> {
        tracing::debug!(
            "Tagger ready: {} tags in metadata, {} output positions",
            metadata.len(),
            output_map.len()
        );
        Ok(Self {
            engine: Arc::new(engine),
            metadata,
            output_map: Arc::new(output_map),
            limits,
        })
    }

    /// Number of model output positions.
    pub fn output_len(&self) -> usize {
        self.output_map.len()
    }

    /// Tag an image read from a filesystem path.
    pub async fn tag_path(&self, path: &Path) -> Result<TagOutput> {
        let bytes = tokio::fs::read(path).await?;
        self.tag_bytes(bytes).await
    }

    /// Tag an image from an in-memory encoded byte buffer.
    ///
    /// Decode + preprocess and the engine call run on blocking worker
    /// threads; the caller's task stays responsive. Dropping the returned
    /// future cancels the request, freeing all intermediate buffers.
    pub async fn tag_bytes(&self, image_bytes: Vec<u8>) -> Result<TagOutput> {
        let limits = self.limits.clone();
        let tensor = tokio::task::spawn_blocking(move || {
            let image = decode::decode_bytes(&image_bytes, &limits)?;
            Ok::<_, TaggrError>(preprocess::preprocess(&image))
        })
        .await
        .map_err(|e| {
            TaggrError::Decode(DecodeError::Unreadable {
                message: format!("Preprocess task failed: {e}"),
            })
        })??;

        let engine = Arc::clone(&self.engine);
        let expected_len = self.output_map.len();
        let probs = tokio::task::spawn_blocking(move || engine.predict(&tensor, expected_len))
            .await
            .map_err(|e| {
                TaggrError::Engine(EngineError::Inference {
                    message: format!("Inference task failed: {e}"),
                })
            })??;

        ranker::rank(&probs, &self.output_map, &self.metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_reports_missing_model() {
        let dir = tempfile::tempdir().unwrap();
        let tags = dir.path().join("tags.csv");
        let labels = dir.path().join("labels.json");
        std::fs::write(&tags, "name,category,best_threshold\na,0,0.5\n").unwrap();
        std::fs::write(&labels, r#"{ "tags": ["a"] }"#).unwrap();

        let result = Tagger::load(
            &dir.path().join("missing.onnx"),
            &tags,
            &labels,
            LimitsConfig::default(),
        );
        assert!(matches!(result, Err(TaggrError::Engine(_))));
    }

    #[test]
    fn test_from_bytes_with_garbage_model_fails() {
        // Engine load runs first, so a garbage model short-circuits the
        // request whatever the vocabulary looks like.
        let result = Tagger::from_bytes(
            b"junk",
            "name,category,best_threshold\n".as_bytes(),
            r#"{ "tags": [] }"#.as_bytes(),
            LimitsConfig::default(),
        );
        assert!(matches!(result, Err(TaggrError::Engine(_))));
    }
}
