//! Output map loading.
//!
//! The model's flat prediction vector carries no names; a JSON document
//! of the form `{ "tags": ["tag_a", "tag_b", ...] }` links position i of
//! the vector to the i-th listed tag name. Order is the whole contract,
//! so it is preserved exactly as given.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::ParseError;

#[derive(Debug, Deserialize)]
struct LabelDocument {
    tags: Vec<String>,
}

/// Ordered mapping from model output positions to tag names.
pub struct OutputMap {
    names: Vec<String>,
}

impl OutputMap {
    /// Parse an output map from any byte stream.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ParseError> {
        let doc: LabelDocument = serde_json::from_reader(reader)?;
        tracing::info!("Loaded output map: {} positions", doc.tags.len());
        Ok(Self { names: doc.tags })
    }

    /// Load an output map from a JSON file on disk.
    pub fn load(path: &Path) -> Result<Self, ParseError> {
        let file = std::fs::File::open(path)
            .map_err(|e| ParseError::Json(serde_json::Error::io(e)))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// All tag names in model output order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of model output positions.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_preserved() {
        let json = r#"{ "tags": ["zebra", "apple", "zebra_print", "1girl"] }"#;
        let map = OutputMap::from_reader(json.as_bytes()).unwrap();
        assert_eq!(map.len(), 4);
        assert_eq!(map.names(), ["zebra", "apple", "zebra_print", "1girl"]);
    }

    #[test]
    fn test_extra_fields_ignored() {
        // Real model config files carry architecture fields alongside tags
        let json = r#"{ "model": "caformer_b36", "tags": ["a", "b"] }"#;
        let map = OutputMap::from_reader(json.as_bytes()).unwrap();
        assert_eq!(map.names(), ["a", "b"]);
    }

    #[test]
    fn test_missing_tags_field_rejected() {
        let json = r#"{ "labels": ["a"] }"#;
        assert!(OutputMap::from_reader(json.as_bytes()).is_err());
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(OutputMap::from_reader(b"{ tags: [".as_slice()).is_err());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "tags": ["x", "y"] }"#).unwrap();

        let map = OutputMap::load(&path).unwrap();
        assert_eq!(map.names(), ["x", "y"]);
    }
}
