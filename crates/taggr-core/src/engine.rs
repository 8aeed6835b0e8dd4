//! ONNX Runtime session management for the tagger model.
//!
//! The model is a frozen black box: a fixed-shape float tensor goes in,
//! named float outputs come out. This adapter locates the output stream
//! named `"prediction"` and hands back the flat probability vector,
//! validated against the expected vocabulary size.

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;

use crate::error::EngineError;

/// Name of the probability output stream.
const OUTPUT_NAME: &str = "prediction";

/// Input tensor name used when the model metadata exposes none.
const FALLBACK_INPUT_NAME: &str = "input";

/// Wraps an ONNX Runtime session for the tagger model.
///
/// Uses a `Mutex` because `Session::run` requires `&mut self`.
pub struct Engine {
    session: Mutex<Session>,
    /// Name of the input tensor (detected from model metadata).
    input_name: String,
}

impl Engine {
    /// Load the tagger model from an ONNX file on disk.
    pub fn load(model_path: &Path) -> Result<Self, EngineError> {
        let session = Session::builder()
            .map_err(|e| EngineError::Load {
                message: format!("Failed to create ONNX session builder: {e}"),
            })?
            .commit_from_file(model_path)
            .map_err(|e| EngineError::Load {
                message: format!("Failed to load ONNX model from {model_path:?}: {e}"),
            })?;
        Ok(Self::from_session(session))
    }

    /// Load the tagger model from an in-memory ONNX artifact.
    pub fn load_from_bytes(model_bytes: &[u8]) -> Result<Self, EngineError> {
        let session = Session::builder()
            .map_err(|e| EngineError::Load {
                message: format!("Failed to create ONNX session builder: {e}"),
            })?
            .commit_from_memory(model_bytes)
            .map_err(|e| EngineError::Load {
                message: format!("Failed to load ONNX model from memory: {e}"),
            })?;
        Ok(Self::from_session(session))
    }

    fn from_session(session: Session) -> Self {
        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .unwrap_or_else(|| FALLBACK_INPUT_NAME.to_string());

        tracing::debug!(
            "Loaded tagger model (input: {:?}, outputs: {:?})",
            input_name,
            session
                .outputs()
                .iter()
                .map(|o| o.name())
                .collect::<Vec<_>>()
        );

        Self {
            session: Mutex::new(session),
            input_name,
        }
    }

    /// Run the model on a preprocessed image tensor.
    ///
    /// Input shape: \[1, 3, 384, 384\] (NCHW, normalized). Returns the
    /// flat probability vector from the `"prediction"` output, which must
    /// have exactly `expected_len` values; a mismatch is surfaced rather
    /// than truncated or padded.
    pub fn predict(
        &self,
        tensor: &Array4<f32>,
        expected_len: usize,
    ) -> Result<Vec<f32>, EngineError> {
        // Convert ndarray to (shape, flat_data) for ort.
        let shape: Vec<i64> = tensor.shape().iter().map(|&d| d as i64).collect();
        let flat_data: Vec<f32> = tensor.iter().copied().collect();

        let input_value =
            Value::from_array((shape, flat_data)).map_err(|e| EngineError::Inference {
                message: format!("Failed to create input tensor: {e}"),
            })?;

        let inputs = ort::inputs![self.input_name.as_str() => input_value];

        let mut session = self.session.lock().map_err(|e| EngineError::Inference {
            message: format!("Session lock poisoned: {e}"),
        })?;

        let outputs = session.run(inputs).map_err(|e| EngineError::Inference {
            message: format!("ONNX inference failed: {e}"),
        })?;

        let prediction = outputs
            .iter()
            .find(|(name, _)| *name == OUTPUT_NAME)
            .ok_or_else(|| EngineError::MissingOutput {
                name: OUTPUT_NAME.to_string(),
            })?;

        let (_, data) =
            prediction
                .1
                .try_extract_tensor::<f32>()
                .map_err(|e| EngineError::Inference {
                    message: format!("Failed to extract prediction tensor: {e}"),
                })?;

        // The output is [1, N] or [N]; either way the flat element count
        // must match the output map.
        if data.len() != expected_len {
            return Err(EngineError::OutputLengthMismatch {
                expected: expected_len,
                actual: data.len(),
            });
        }

        Ok(data.to_vec())
    }
}
