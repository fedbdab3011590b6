// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use crate::geometry::Bounds;
use serde::{Deserialize, Serialize};

/// Target bounds for the full-size artifact (fit-within, never upscaled)
pub const FULL_BOUNDS: Bounds = Bounds::new(1024, 1024);

/// Target bounds for the preview thumbnail (fill-exact via center crop)
pub const PREVIEW_BOUNDS: Bounds = Bounds::new(240, 240);

/// Default HTTP listen port
pub const DEFAULT_PORT: u16 = 8089;

/// Default bind address (all interfaces)
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Spool filenames for the two per-capture artifacts
pub mod spool {
    /// Full-size artifact filename
    pub const ORIGINAL_FILENAME: &str = "original.jpg";

    /// Preview thumbnail filename
    pub const PREVIEW_FILENAME: &str = "preview.jpg";
}

/// Capture timing constants
pub mod timing {
    /// Frames drained before the kept frame so auto-exposure settles
    pub const WARMUP_FRAMES: usize = 3;
}

/// Shared-timestamp format for remote artifact names (sorts chronologically)
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%6f";

/// JPEG quality presets
///
/// Users trade file size against quality; the service defaults to High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JpegQuality {
    /// High compression, smaller uploads
    Low,
    /// Balanced quality and file size
    Medium,
    /// Low compression (default)
    #[default]
    High,
    /// Minimal compression
    Maximum,
}

impl JpegQuality {
    /// Get all preset variants for CLI help iteration
    pub const ALL: [JpegQuality; 4] = [
        JpegQuality::Low,
        JpegQuality::Medium,
        JpegQuality::High,
        JpegQuality::Maximum,
    ];

    /// Get the JPEG encoder quality value (0-100)
    pub fn value(&self) -> u8 {
        match self {
            JpegQuality::Low => 60,
            JpegQuality::Medium => 80,
            JpegQuality::High => 92,
            JpegQuality::Maximum => 98,
        }
    }
}

impl std::str::FromStr for JpegQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(JpegQuality::Low),
            "medium" => Ok(JpegQuality::Medium),
            "high" => Ok(JpegQuality::High),
            "maximum" => Ok(JpegQuality::Maximum),
            other => Err(format!("unknown JPEG quality '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_values_increase() {
        let mut prev = 0u8;
        for quality in JpegQuality::ALL {
            assert!(quality.value() > prev);
            prev = quality.value();
        }
    }

    #[test]
    fn test_quality_parse() {
        assert_eq!("high".parse::<JpegQuality>(), Ok(JpegQuality::High));
        assert_eq!("Low".parse::<JpegQuality>(), Ok(JpegQuality::Low));
        assert!("ultra".parse::<JpegQuality>().is_err());
    }
}
