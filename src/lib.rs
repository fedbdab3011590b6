// SPDX-License-Identifier: GPL-3.0-only

//! camshot - an HTTP-triggered camera snapshot service
//!
//! On request the service grabs one frame from a local camera, derives a
//! bounded-size full image and a fixed-size cropped preview, uploads both
//! to remote object storage, and returns their public URLs.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`geometry`]: pure image-fitting computations (the core)
//! - [`backends`]: camera backend abstraction
//! - [`pipelines`]: capture and publish pipelines
//! - [`server`]: HTTP request handling
//! - [`lifecycle`]: webhook registration and keep-awake glue
//! - [`config`]: service configuration

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod geometry;
pub mod lifecycle;
pub mod pipelines;
pub mod server;

// Re-export commonly used types
pub use backends::camera::{CameraFrame, FrameSource, V4l2FrameSource};
pub use config::Config;
pub use errors::{AppError, CaptureError, GeometryError, PublishError};
pub use geometry::{Bounds, CropPlan, FitResult};
pub use server::{AppState, CaptureResult};
