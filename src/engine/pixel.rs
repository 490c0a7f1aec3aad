//! Pixel engine trait and shared types.
//!
//! The [`PixelEngine`] trait defines the four capabilities the pipeline
//! needs: identify, alpha detection, resize, and crop.
//!
//! The production implementation is
//! [`RasterEngine`](super::raster::RasterEngine) — pure Rust, statically
//! linked, no system dependencies. Tests use the recording `MockEngine`
//! to verify pipeline behavior without touching pixels.

use super::jobs::{CropJob, ResizeJob};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Capability surface of a pixel engine.
///
/// Engines are `Sync` so one [`TransformCache`](crate::transform::TransformCache)
/// can serve independent requests from parallel threads. Failures are fatal
/// to the request; the pipeline never retries.
pub trait PixelEngine: Sync {
    /// Image dimensions, without a full decode where the format allows.
    fn identify(&self, path: &Path) -> Result<Dimensions, EngineError>;

    /// Whether the image's format can carry an alpha channel.
    ///
    /// A capability query rather than a hardcoded format check, so engines
    /// decide which of their formats are alpha-capable.
    fn supports_alpha(&self, path: &Path) -> Result<bool, EngineError>;

    /// Execute a constrain-only, aspect-preserving resize.
    fn resize(&self, job: &ResizeJob) -> Result<(), EngineError>;

    /// Execute a margin trim.
    fn crop(&self, job: &CropJob) -> Result<(), EngineError>;
}
