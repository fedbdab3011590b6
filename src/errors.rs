// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the snapshot service

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Geometry misuse (programmer error, not expected with constant bounds)
    Geometry(GeometryError),
    /// Frame capture errors
    Capture(CaptureError),
    /// Upload/publishing errors
    Publish(PublishError),
    /// Configuration errors
    Config(String),
    /// Generic error with message
    Other(String),
}

/// Geometry precondition violations
///
/// Both variants are programmer errors: the service only ever calls the
/// geometry engine with the constant full/preview bounds and a camera
/// frame whose dimensions are non-zero by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// Target bounds with a zero dimension
    InvalidBounds { width: u32, height: u32 },
    /// Source raster with a zero dimension
    DegenerateSource { width: u32, height: u32 },
}

/// Frame capture errors (expected at runtime)
#[derive(Debug, Clone)]
pub enum CaptureError {
    /// Camera device could not be opened (absent or busy)
    DeviceUnavailable(String),
    /// Device opened but yielded no usable frame
    NoFrame(String),
    /// Frame data could not be decoded to RGB
    Decode(String),
    /// Geometry engine rejected the frame (should not occur)
    Geometry(GeometryError),
    /// Spool file I/O failed
    Io(String),
}

/// Upload/publishing errors (expected at runtime)
#[derive(Debug, Clone)]
pub enum PublishError {
    /// Transport failure talking to the blob store
    Transport(String),
    /// Blob store answered with a non-success status
    RejectedStatus(u16),
    /// Reading a spooled artifact failed
    Io(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Geometry(e) => write!(f, "Geometry error: {}", e),
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
            AppError::Publish(e) => write!(f, "Publish error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::InvalidBounds { width, height } => {
                write!(f, "Invalid target bounds {}x{}", width, height)
            }
            GeometryError::DegenerateSource { width, height } => {
                write!(f, "Degenerate source dimensions {}x{}", width, height)
            }
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::DeviceUnavailable(msg) => write!(f, "Camera unavailable: {}", msg),
            CaptureError::NoFrame(msg) => write!(f, "No frame captured: {}", msg),
            CaptureError::Decode(msg) => write!(f, "Frame decode failed: {}", msg),
            CaptureError::Geometry(e) => write!(f, "Geometry error: {}", e),
            CaptureError::Io(msg) => write!(f, "Artifact I/O failed: {}", msg),
        }
    }
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::Transport(msg) => write!(f, "Upload transport failed: {}", msg),
            PublishError::RejectedStatus(code) => {
                write!(f, "Blob store rejected upload with status {}", code)
            }
            PublishError::Io(msg) => write!(f, "Artifact read failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for GeometryError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for PublishError {}

// Conversions from sub-errors to AppError
impl From<GeometryError> for AppError {
    fn from(err: GeometryError) -> Self {
        AppError::Geometry(err)
    }
}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        AppError::Capture(err)
    }
}

impl From<PublishError> for AppError {
    fn from(err: PublishError) -> Self {
        AppError::Publish(err)
    }
}

impl From<GeometryError> for CaptureError {
    fn from(err: GeometryError) -> Self {
        CaptureError::Geometry(err)
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::Io(err.to_string())
    }
}

impl From<std::io::Error> for PublishError {
    fn from(err: std::io::Error) -> Self {
        PublishError::Io(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}
