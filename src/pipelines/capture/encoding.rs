// SPDX-License-Identifier: GPL-3.0-only

//! JPEG artifact encoding

use crate::constants::JpegQuality;
use crate::errors::CaptureError;
use image::RgbImage;

/// Encodes derived rasters as JPEG at a fixed quality
#[derive(Debug, Clone, Copy)]
pub struct JpegArtifactEncoder {
    quality: JpegQuality,
}

impl JpegArtifactEncoder {
    pub fn new(quality: JpegQuality) -> Self {
        Self { quality }
    }

    /// Encode an RGB raster as JPEG bytes.
    pub fn encode(&self, image: &RgbImage) -> Result<Vec<u8>, CaptureError> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);

        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
            &mut cursor,
            self.quality.value(),
        );
        encoder
            .encode(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| CaptureError::Decode(format!("JPEG encoding failed: {}", e)))?;

        Ok(buffer)
    }
}

impl Default for JpegArtifactEncoder {
    fn default() -> Self {
        Self::new(JpegQuality::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_produces_jpeg() {
        let image = RgbImage::new(16, 16);
        let data = JpegArtifactEncoder::default().encode(&image).unwrap();
        assert_eq!(&data[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_higher_quality_is_larger() {
        // A noisy image compresses worse at higher quality settings.
        let mut image = RgbImage::new(64, 64);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            *pixel = image::Rgb([
                (x * 37 % 256) as u8,
                (y * 91 % 256) as u8,
                ((x + y) * 53 % 256) as u8,
            ]);
        }
        let low = JpegArtifactEncoder::new(JpegQuality::Low)
            .encode(&image)
            .unwrap();
        let max = JpegArtifactEncoder::new(JpegQuality::Maximum)
            .encode(&image)
            .unwrap();
        assert!(max.len() > low.len());
    }
}
