// SPDX-License-Identifier: GPL-3.0-only

//! Capture pipeline
//!
//! Obtains exactly one frame from the frame source, derives the two
//! artifacts via the geometry engine, and spools them as JPEG files:
//!
//! 1. **Capture**: grab one RGB frame (blocking camera I/O)
//! 2. **Derive**: fit-within for the original, fill-exact for the preview
//! 3. **Encode**: JPEG at the configured quality
//! 4. **Spool**: write both files to the spool directory
//!
//! A failing frame source aborts the whole pipeline; no partial artifacts
//! are produced.

pub mod encoding;

pub use encoding::JpegArtifactEncoder;

use crate::backends::camera::FrameSource;
use crate::constants::{FULL_BOUNDS, PREVIEW_BOUNDS, spool};
use crate::errors::CaptureError;
use crate::geometry;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// An encoded image destined for remote storage
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Spool file the encoded bytes were written to
    pub path: PathBuf,
    /// Encoded JPEG bytes
    pub data: Vec<u8>,
    /// Output raster width
    pub width: u32,
    /// Output raster height
    pub height: u32,
}

/// The two artifacts produced by one capture
#[derive(Debug, Clone)]
pub struct CapturedArtifacts {
    pub original: Artifact,
    pub preview: Artifact,
}

/// Complete capture pipeline
pub struct CapturePipeline {
    encoder: JpegArtifactEncoder,
    spool_dir: PathBuf,
}

impl CapturePipeline {
    pub fn new(encoder: JpegArtifactEncoder, spool_dir: impl Into<PathBuf>) -> Self {
        Self {
            encoder,
            spool_dir: spool_dir.into(),
        }
    }

    /// Run the full capture workflow against the given frame source.
    ///
    /// The source is borrowed exclusively; callers hold the camera mutex
    /// for the duration of this call.
    pub fn capture(
        &self,
        source: &mut dyn FrameSource,
    ) -> Result<CapturedArtifacts, CaptureError> {
        let frame = source.capture_frame()?;
        info!(
            width = frame.width,
            height = frame.height,
            "Frame captured"
        );
        let image = frame.into_image()?;

        let full = geometry::resize_to_fit(&image, FULL_BOUNDS)?;
        let preview = geometry::crop_to_fill(&image, PREVIEW_BOUNDS)?;
        debug!(
            full_width = full.width(),
            full_height = full.height(),
            preview_width = preview.width(),
            preview_height = preview.height(),
            "Derived rasters"
        );

        std::fs::create_dir_all(&self.spool_dir)?;
        let original = self.spool_artifact(&full, spool::ORIGINAL_FILENAME)?;
        let preview = self.spool_artifact(&preview, spool::PREVIEW_FILENAME)?;

        Ok(CapturedArtifacts { original, preview })
    }

    fn spool_artifact(
        &self,
        image: &image::RgbImage,
        filename: &str,
    ) -> Result<Artifact, CaptureError> {
        let data = self.encoder.encode(image)?;
        let path = self.spool_dir.join(filename);
        std::fs::write(&path, &data)?;
        debug!(path = %path.display(), bytes = data.len(), "Artifact spooled");
        Ok(Artifact {
            path,
            data,
            width: image.width(),
            height: image.height(),
        })
    }

    pub fn spool_dir(&self) -> &Path {
        &self.spool_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::CameraFrame;
    use crate::constants::JpegQuality;

    struct FakeSource {
        frame: Option<CameraFrame>,
    }

    impl FrameSource for FakeSource {
        fn capture_frame(&mut self) -> Result<CameraFrame, CaptureError> {
            self.frame
                .take()
                .ok_or_else(|| CaptureError::NoFrame("device busy".to_string()))
        }
    }

    fn test_spool_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("camshot-test-{}-{}", tag, std::process::id()))
    }

    #[test]
    fn test_capture_produces_both_artifacts() {
        let image = image::RgbImage::new(1920, 1080);
        let mut source = FakeSource {
            frame: Some(CameraFrame::from_image(image)),
        };
        let spool_dir = test_spool_dir("capture");
        let pipeline = CapturePipeline::new(
            JpegArtifactEncoder::new(JpegQuality::High),
            &spool_dir,
        );

        let artifacts = pipeline.capture(&mut source).unwrap();
        assert_eq!(
            (artifacts.original.width, artifacts.original.height),
            (1024, 576)
        );
        assert_eq!(
            (artifacts.preview.width, artifacts.preview.height),
            (240, 240)
        );
        // JPEG SOI marker on both encoded artifacts
        assert_eq!(&artifacts.original.data[..2], &[0xFF, 0xD8]);
        assert_eq!(&artifacts.preview.data[..2], &[0xFF, 0xD8]);
        assert!(artifacts.original.path.exists());
        assert!(artifacts.preview.path.exists());

        let _ = std::fs::remove_dir_all(&spool_dir);
    }

    #[test]
    fn test_capture_failure_spools_nothing() {
        let mut source = FakeSource { frame: None };
        let spool_dir = test_spool_dir("nothing");
        let pipeline = CapturePipeline::new(
            JpegArtifactEncoder::new(JpegQuality::High),
            &spool_dir,
        );

        assert!(pipeline.capture(&mut source).is_err());
        assert!(!spool_dir.join(spool::ORIGINAL_FILENAME).exists());
        assert!(!spool_dir.join(spool::PREVIEW_FILENAME).exists());

        let _ = std::fs::remove_dir_all(&spool_dir);
    }
}
