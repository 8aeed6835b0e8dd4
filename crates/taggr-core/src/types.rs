//! Core data types for the taggr inference pipeline.

use serde::{Deserialize, Serialize};

/// A single predicted tag with its probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagInfo {
    /// The tag name, exactly as spelled in the vocabulary
    pub label: String,

    /// Predicted probability from 0.0 to 1.0
    pub score: f32,
}

impl TagInfo {
    /// Create a new tag prediction.
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// The complete output of one inference request.
///
/// Each list is ordered by descending score. General and character tags
/// are thresholded and capped; rating tags are reported exhaustively
/// (the rating vocabulary is a small closed category).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagOutput {
    /// General content tags (category 0), score above per-tag threshold, at most 50
    pub general: Vec<TagInfo>,

    /// Character tags (category 4), score above per-tag threshold, at most 30
    pub character: Vec<TagInfo>,

    /// Rating tags (category 9), unfiltered and uncapped
    pub rating: Vec<TagInfo>,
}
