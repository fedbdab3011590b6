// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 frame source
//!
//! Opens the device, negotiates a decodable pixel format, drains a few
//! warm-up frames so auto-exposure settles, and keeps exactly one frame.
//! The device handle lives only for the duration of a capture call, so it
//! is released on every exit path, success or failure.

use v4l::FourCC;
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;

use super::format_converters::yuyv_to_rgb;
use super::{CameraFrame, FrameSource};
use crate::constants::timing::WARMUP_FRAMES;
use crate::errors::CaptureError;
use tracing::{debug, info};

const FOURCC_MJPG: FourCC = FourCC { repr: *b"MJPG" };
const FOURCC_YUYV: FourCC = FourCC { repr: *b"YUYV" };

/// Frame source backed by a kernel V4L2 capture device
pub struct V4l2FrameSource {
    device_index: usize,
}

impl V4l2FrameSource {
    pub fn new(device_index: usize) -> Self {
        Self { device_index }
    }
}

impl FrameSource for V4l2FrameSource {
    fn capture_frame(&mut self) -> Result<CameraFrame, CaptureError> {
        let dev = Device::new(self.device_index)
            .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?;

        let format = negotiate_format(&dev)?;
        info!(
            device_index = self.device_index,
            width = format.width,
            height = format.height,
            fourcc = ?format.fourcc,
            "Camera format configured"
        );

        let mut stream = Stream::with_buffers(&dev, Type::VideoCapture, 4)
            .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?;

        // Drain warm-up frames; only the last one is kept.
        for _ in 0..WARMUP_FRAMES {
            let _ = stream
                .next()
                .map_err(|e| CaptureError::NoFrame(e.to_string()))?;
        }
        let (buf, meta) = stream
            .next()
            .map_err(|e| CaptureError::NoFrame(e.to_string()))?;

        let used = meta.bytesused as usize;
        let payload = if used > 0 && used <= buf.len() {
            &buf[..used]
        } else {
            buf
        };
        debug!(bytes = payload.len(), "Frame captured");

        decode_frame(payload, format.width, format.height, format.fourcc)
    }
}

/// Pick a pixel format the service can decode.
///
/// Keeps the device's current format when it is already MJPG or YUYV;
/// otherwise tries MJPG first and falls back to YUYV.
fn negotiate_format(dev: &Device) -> Result<v4l::Format, CaptureError> {
    let current = dev
        .format()
        .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?;
    if current.fourcc == FOURCC_MJPG || current.fourcc == FOURCC_YUYV {
        return Ok(current);
    }

    let mjpg = v4l::Format::new(current.width, current.height, FOURCC_MJPG);
    if let Ok(format) = dev.set_format(&mjpg)
        && format.fourcc == FOURCC_MJPG
    {
        return Ok(format);
    }

    let yuyv = v4l::Format::new(current.width, current.height, FOURCC_YUYV);
    let format = dev
        .set_format(&yuyv)
        .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?;
    if format.fourcc == FOURCC_YUYV {
        Ok(format)
    } else {
        Err(CaptureError::Decode(format!(
            "unsupported pixel format {:?}",
            format.fourcc
        )))
    }
}

fn decode_frame(
    payload: &[u8],
    width: u32,
    height: u32,
    fourcc: FourCC,
) -> Result<CameraFrame, CaptureError> {
    if fourcc == FOURCC_MJPG {
        let image = image::load_from_memory(payload)
            .map_err(|e| CaptureError::Decode(e.to_string()))?
            .to_rgb8();
        return Ok(CameraFrame::from_image(image));
    }
    if fourcc == FOURCC_YUYV {
        let expected = width as usize * height as usize * 2;
        if payload.len() < expected {
            return Err(CaptureError::Decode(format!(
                "short YUYV frame: {} of {} bytes",
                payload.len(),
                expected
            )));
        }
        let rgb = yuyv_to_rgb(&payload[..expected], width, height);
        return CameraFrame::from_rgb(width, height, rgb);
    }
    Err(CaptureError::Decode(format!(
        "unsupported pixel format {:?}",
        fourcc
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_yuyv_frame() {
        let payload = vec![128u8; 4 * 2 * 2];
        let frame = decode_frame(&payload, 4, 2, FOURCC_YUYV).unwrap();
        assert_eq!((frame.width, frame.height), (4, 2));
    }

    #[test]
    fn test_decode_short_yuyv_rejected() {
        let payload = vec![128u8; 4];
        assert!(decode_frame(&payload, 4, 2, FOURCC_YUYV).is_err());
    }

    #[test]
    fn test_decode_mjpg_frame() {
        let mut jpeg = Vec::new();
        let image = image::RgbImage::new(8, 8);
        image::codecs::jpeg::JpegEncoder::new(&mut jpeg)
            .encode(
                image.as_raw(),
                8,
                8,
                image::ExtendedColorType::Rgb8,
            )
            .unwrap();
        let frame = decode_frame(&jpeg, 8, 8, FOURCC_MJPG).unwrap();
        assert_eq!((frame.width, frame.height), (8, 8));
    }

    #[test]
    fn test_decode_unknown_fourcc_rejected() {
        let payload = vec![0u8; 16];
        assert!(decode_frame(&payload, 2, 2, FourCC::new(b"GREY")).is_err());
    }
}
