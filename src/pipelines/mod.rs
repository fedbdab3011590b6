// SPDX-License-Identifier: GPL-3.0-only

//! Capture and publish pipelines
//!
//! ```text
//! Frame Source → Geometry Engine → JPEG spool files → Blob Store → URLs
//! ```
//!
//! The capture pipeline owns everything up to the spooled artifacts; the
//! publish pipeline owns the uploads. Both are synchronous: camera reads
//! and network calls block the request that triggered them.

pub mod capture;
pub mod publish;

pub use capture::{Artifact, CapturePipeline, CapturedArtifacts};
pub use publish::{BlobStore, HttpBlobStore, PublishPipeline, PublishedUrls};
