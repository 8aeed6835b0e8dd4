//! Image decoding with format sniffing and dimension validation.

use image::{DynamicImage, GenericImageView};

use crate::config::LimitsConfig;
use crate::error::DecodeError;

/// Decode an image from an in-memory byte buffer.
///
/// The format is detected from the content, not from any file extension,
/// so misnamed files decode correctly. Dimension limits are enforced
/// before the image is handed to preprocessing.
pub fn decode_bytes(bytes: &[u8], limits: &LimitsConfig) -> Result<DynamicImage, DecodeError> {
    use std::io::Cursor;

    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::Unreadable {
            message: format!("Cannot detect image format: {e}"),
        })?;

    let image = reader.decode().map_err(|e| DecodeError::Unreadable {
        message: e.to_string(),
    })?;

    let (width, height) = image.dimensions();
    if width > limits.max_image_dimension || height > limits.max_image_dimension {
        return Err(DecodeError::TooLarge {
            width,
            height,
            max_dim: limits.max_image_dimension,
        });
    }

    Ok(image)
}
