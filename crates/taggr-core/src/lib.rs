//! taggr core - image tagging inference pipeline.
//!
//! Classifies an image against a fixed tag vocabulary using a pretrained
//! ONNX tagger model and returns ranked predictions split into general,
//! character, and rating groups.
//!
//! # Architecture
//!
//! ```text
//! Image → Decode → Preprocess (pad/resize/normalize) → ONNX → Rank/Filter
//!                         Tag metadata CSV + output map JSON ↗
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use taggr_core::{Config, Tagger};
//!
//! #[tokio::main]
//! async fn main() -> taggr_core::Result<()> {
//!     let config = Config::load()?;
//!     let tagger = Tagger::from_config(&config)?;
//!
//!     let result = tagger.tag_path("./image.jpg".as_ref()).await?;
//!     println!("General tags: {:?}", result.general);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod decode;
pub mod engine;
pub mod error;
pub mod labels;
pub mod metadata;
pub mod pipeline;
pub mod preprocess;
pub mod ranker;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{
    ConfigError, DecodeError, EngineError, ParseError, Result, TaggrError,
};
pub use labels::OutputMap;
pub use metadata::{TagMetadata, TagRecord};
pub use pipeline::Tagger;
pub use types::{TagInfo, TagOutput};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
