use image::ImageFormat;

use crate::error::{OcrError, OcrResult};

/// Formats accepted for label images.
pub const SUPPORTED_FORMATS: [ImageFormat; 7] = [
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::Bmp,
    ImageFormat::WebP,
    ImageFormat::Tiff,
    ImageFormat::Ico,
];

/// Identify the image format from its magic bytes.
pub fn sniff(bytes: &[u8]) -> OcrResult<ImageFormat> {
    if bytes.is_empty() {
        return Err(OcrError::UnsupportedMedia("Image payload is empty".to_string()));
    }

    match image::guess_format(bytes) {
        Ok(format) if SUPPORTED_FORMATS.contains(&format) => Ok(format),
        Ok(format) => Err(OcrError::UnsupportedMedia(format!(
            "Unsupported image format: {:?}",
            format
        ))),
        Err(_) => Err(OcrError::UnsupportedMedia(
            "Payload is not a recognised image".to_string(),
        )),
    }
}
