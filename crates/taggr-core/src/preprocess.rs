//! Image preprocessing for the tagger model.
//!
//! The model expects:
//! - Input size: 384×384 pixels
//! - Normalization: ImageNet per-channel mean/std in RGB order
//! - Tensor layout: NCHW [batch, channels, height, width]
//!
//! Small images are first padded onto a white square canvas (floor 512)
//! so the model never sees upscaled noise; large images pad to their own
//! longest side. The square canvas is then stretch-resized to 384×384
//! with a bicubic kernel and center-cropped.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use ndarray::Array4;

/// Number of color channels (RGB).
const CHANNELS: usize = 3;

/// Minimum side of the square padding canvas.
const PAD_FLOOR: u32 = 512;

/// Model input width/height.
pub const INPUT_SIZE: u32 = 384;

/// ImageNet normalization mean (R, G, B).
const NORM_MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// ImageNet normalization std (R, G, B).
const NORM_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Pad an image onto a centered white square canvas.
///
/// The canvas side is `max(width, height, 512)`. Alpha, if present, is
/// flattened against the white background during compositing. The input
/// image is not modified.
fn pad_to_square(image: &DynamicImage) -> RgbaImage {
    let (width, height) = image.dimensions();
    let side = width.max(height).max(PAD_FLOOR);

    let mut canvas = RgbaImage::from_pixel(side, side, Rgba([255, 255, 255, 255]));
    let offset_x = i64::from((side - width) / 2);
    let offset_y = i64::from((side - height) / 2);
    imageops::overlay(&mut canvas, image, offset_x, offset_y);
    canvas
}

/// Preprocess an image into the model input tensor.
///
/// Returns an NCHW `[1, 3, 384, 384]` float tensor, normalized with the
/// ImageNet mean/std the tagger was trained with.
pub fn preprocess(image: &DynamicImage) -> Array4<f32> {
    let padded = pad_to_square(image);

    // Stretch, not fit: the canvas is already square so aspect is preserved.
    let resized = imageops::resize(&padded, INPUT_SIZE, INPUT_SIZE, FilterType::CatmullRom);

    // Identity with the current constants, kept so resize and crop sizes
    // can diverge without changing the pixel path.
    let crop_x = (resized.width() - INPUT_SIZE) / 2;
    let crop_y = (resized.height() - INPUT_SIZE) / 2;
    let cropped = imageops::crop_imm(&resized, crop_x, crop_y, INPUT_SIZE, INPUT_SIZE).to_image();

    let rgb = DynamicImage::ImageRgba8(cropped).to_rgb8();

    let size = INPUT_SIZE as usize;
    let mut tensor = Array4::<f32>::zeros((1, CHANNELS, size, size));

    // Access raw RGB bytes and the tensor slice directly to avoid per-pixel
    // bounds-checking overhead from get_pixel() and 4D ndarray indexing.
    let raw = rgb.as_raw();
    let tensor_data = tensor.as_slice_mut().unwrap();
    for (i, pixel) in raw.chunks_exact(3).enumerate() {
        let y = i / size;
        let x = i % size;
        for (c, &val) in pixel.iter().enumerate() {
            // NCHW layout: offset = c * size * size + y * size + x
            let idx = c * size * size + y * size + x;
            tensor_data[idx] = (val as f32 / 255.0 - NORM_MEAN[c]) / NORM_STD[c];
        }
    }

    tensor
}
