//! Tag metadata loading.
//!
//! The tag vocabulary ships as a CSV with header `name,category,best_threshold`.
//! Category is an open integer code (0 = general, 4 = character, 9 = rating
//! in current vocabularies; other codes load fine and simply produce no
//! output group). `best_threshold` is the per-tag score cutoff determined
//! offline.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::ParseError;

/// One row of the tag vocabulary.
#[derive(Debug, Clone, Deserialize)]
pub struct TagRecord {
    /// Tag name, unique within the vocabulary
    pub name: String,
    /// Tag group code
    pub category: i32,
    /// Per-tag score cutoff in [0, 1]
    pub best_threshold: f32,
}

/// The loaded tag vocabulary, keyed by tag name.
///
/// Immutable once loaded; one snapshot serves any number of inference
/// requests.
#[derive(Debug)]
pub struct TagMetadata {
    by_name: HashMap<String, TagRecord>,
}

impl TagMetadata {
    /// Parse tag metadata from any byte stream.
    ///
    /// Every field is required. A missing or unparseable field fails with
    /// the offending row number; duplicate tag names are rejected.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ParseError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let mut by_name = HashMap::new();
        for (i, result) in csv_reader.deserialize::<TagRecord>().enumerate() {
            // Row 1 is the header, so data rows start at 2.
            let row = i + 2;
            let record = result.map_err(|e| ParseError::MalformedRow {
                row,
                message: e.to_string(),
            })?;
            let name = record.name.clone();
            if by_name.insert(name.clone(), record).is_some() {
                return Err(ParseError::DuplicateTag { name, row });
            }
        }

        tracing::info!("Loaded tag metadata: {} tags", by_name.len());
        Ok(Self { by_name })
    }

    /// Load tag metadata from a CSV file on disk.
    pub fn load(path: &Path) -> Result<Self, ParseError> {
        let file = std::fs::File::open(path).map_err(csv::Error::from)?;
        Self::from_reader(file)
    }

    /// Look up a tag record by name.
    pub fn get(&self, name: &str) -> Option<&TagRecord> {
        self.by_name.get(name)
    }

    /// Number of tags in the vocabulary.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
