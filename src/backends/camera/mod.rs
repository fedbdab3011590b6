// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend abstraction
//!
//! A [`FrameSource`] yields exactly one decoded RGB frame per capture
//! call. The production implementation is [`V4l2FrameSource`]; tests
//! substitute in-memory fakes.

pub mod format_converters;
pub mod v4l2;

pub use v4l2::V4l2FrameSource;

use crate::errors::CaptureError;
use image::RgbImage;

/// A single decoded raster from the camera
///
/// Tightly packed RGB24, `width * height * 3` bytes. Immutable once
/// captured; discarded after the derived artifacts are produced.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    data: Vec<u8>,
}

impl CameraFrame {
    /// Wrap raw RGB24 bytes. Fails when the byte count does not match the
    /// dimensions or a dimension is zero.
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CaptureError> {
        if width == 0 || height == 0 {
            return Err(CaptureError::Decode(format!(
                "frame has degenerate dimensions {}x{}",
                width, height
            )));
        }
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(CaptureError::Decode(format!(
                "frame byte count {} does not match {}x{} RGB",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap a decoded image buffer.
    pub fn from_image(image: RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            data: image.into_raw(),
        }
    }

    /// Consume the frame into an [`RgbImage`] for the geometry engine.
    pub fn into_image(self) -> Result<RgbImage, CaptureError> {
        let (width, height) = (self.width, self.height);
        RgbImage::from_raw(width, height, self.data).ok_or_else(|| {
            CaptureError::Decode(format!(
                "frame buffer too small for {}x{} RGB",
                width, height
            ))
        })
    }
}

/// Source of camera frames
///
/// Implementations must acquire the device, read one frame, and release
/// the device before returning, on every exit path. Callers serialize
/// access; concurrent captures contend for the single physical device.
pub trait FrameSource: Send {
    /// Grab and decode a single frame.
    fn capture_frame(&mut self) -> Result<CameraFrame, CaptureError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_round_trip() {
        let frame = CameraFrame::from_rgb(2, 2, vec![0u8; 12]).unwrap();
        let image = frame.into_image().unwrap();
        assert_eq!((image.width(), image.height()), (2, 2));
    }

    #[test]
    fn test_frame_rejects_bad_length() {
        assert!(CameraFrame::from_rgb(2, 2, vec![0u8; 11]).is_err());
    }

    #[test]
    fn test_frame_rejects_zero_dimension() {
        assert!(CameraFrame::from_rgb(0, 2, Vec::new()).is_err());
    }
}
