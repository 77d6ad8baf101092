//! Image normalization and transport encoding
//!
//! The remote API accepts a base64 JPEG inside a data URL. JPEG has no alpha
//! channel, so alpha-carrying images are flattened onto an opaque white
//! background first (the alpha channel acts as the mask). 8-bit grayscale is
//! kept as-is; everything else becomes opaque RGB.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};

/// Quality for the fixed lossy transport encoding
const JPEG_QUALITY: u8 = 85;

/// Flatten an image into a JPEG-encodable pixel layout.
///
/// Output never carries an alpha channel and keeps the input dimensions.
pub fn normalize_image(image: &DynamicImage) -> Result<DynamicImage> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(Error::UnsupportedImage(format!(
            "image has zero dimension ({}x{})",
            width, height
        )));
    }

    if image.color().has_alpha() {
        return Ok(DynamicImage::ImageRgb8(composite_on_white(image)));
    }

    match image {
        DynamicImage::ImageLuma8(_) => Ok(image.clone()),
        DynamicImage::ImageLuma16(_) => Ok(DynamicImage::ImageLuma8(image.to_luma8())),
        _ => Ok(DynamicImage::ImageRgb8(image.to_rgb8())),
    }
}

/// Composite onto an opaque white background using alpha as the mask
fn composite_on_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = pixel[3] as u32;
        let blend = |channel: u8| -> u8 {
            ((channel as u32 * alpha + 255 * (255 - alpha)) / 255) as u8
        };
        out.put_pixel(x, y, Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]));
    }
    out
}

/// Normalize and encode an image as JPEG bytes.
pub fn encode_image_jpeg(image: &DynamicImage) -> Result<Vec<u8>> {
    let normalized = normalize_image(image)?;
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
    normalized
        .write_with_encoder(encoder)
        .map_err(|e| Error::UnsupportedImage(format!("JPEG encoding failed: {}", e)))?;
    Ok(buffer)
}

/// Normalize and encode an image as base64 JPEG for transport.
pub fn encode_image_base64(image: &DynamicImage) -> Result<String> {
    Ok(BASE64.encode(encode_image_jpeg(image)?))
}
