//! Pixel engine — the pipeline's only collaborator that touches pixels.
//!
//! | Concern | Where |
//! |---|---|
//! | **Capability surface** | [`PixelEngine`] trait |
//! | **Job descriptions** | [`ResizeJob`], [`CropJob`] |
//! | **Geometry math** | pure functions in [`calculations`] |
//! | **Production engine** | [`RasterEngine`] (`image` crate, Lanczos3) |
//!
//! The module is split into:
//! - **Pixel**: [`PixelEngine`] trait + shared types + recording mock
//! - **Jobs**: data structures describing what to do, not how
//! - **Calculations**: pure dimension math (unit testable, no I/O)
//! - **Raster**: the default pure-Rust implementation

pub mod calculations;
mod jobs;
pub mod pixel;
pub mod raster;

pub use jobs::{CropJob, ResizeJob};
pub use pixel::{Dimensions, EngineError, PixelEngine};
pub use raster::RasterEngine;
