//! Error types for the taggr inference pipeline.
//!
//! Errors are organized by stage. Every error is request-fatal: a failed
//! stage aborts the whole inference request and no partial result is
//! returned to the caller.

use thiserror::Error;

/// Top-level error type for taggr operations.
#[derive(Error, Debug)]
pub enum TaggrError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Image decoding errors
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Tag metadata / output map parsing errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Model engine errors
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// A tag named by the output map has no metadata record.
    ///
    /// Without the record its category and threshold are unknown, so the
    /// prediction cannot be classified; skipping it silently would hide a
    /// mismatched vocabulary.
    #[error("Tag {name:?} from the output map has no metadata record")]
    TagNotFound { name: String },

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Image decoding errors.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The image data could not be decoded
    #[error("Unreadable image: {message}")]
    Unreadable { message: String },

    /// Image dimensions exceed the configured limit
    #[error("Image too large: {width}x{height} > {max_dim}")]
    TooLarge {
        width: u32,
        height: u32,
        max_dim: u32,
    },
}

/// Tag metadata and output-map parsing errors.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A CSV row is missing a field or has an unparseable value
    #[error("Malformed tag record at row {row}: {message}")]
    MalformedRow { row: usize, message: String },

    /// Two metadata rows share the same tag name
    #[error("Duplicate tag name {name:?} at row {row}")]
    DuplicateTag { name: String, row: usize },

    /// CSV reader-level failure (bad header, I/O mid-read)
    #[error("Failed to read tag metadata: {0}")]
    Csv(#[from] csv::Error),

    /// Output map JSON failure
    #[error("Failed to parse output map: {0}")]
    Json(#[from] serde_json::Error),
}

/// Model engine errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The model artifact could not be loaded into a session
    #[error("Failed to load model: {message}")]
    Load { message: String },

    /// Running the session failed
    #[error("Inference failed: {message}")]
    Inference { message: String },

    /// The model produced no output with the expected name
    #[error("Model has no output named {name:?}")]
    MissingOutput { name: String },

    /// The prediction vector length does not match the output map
    #[error("Output length mismatch: model produced {actual} values, output map has {expected} tags")]
    OutputLengthMismatch { expected: usize, actual: usize },
}

/// Convenience type alias for taggr results.
pub type Result<T> = std::result::Result<T, TaggrError>;
