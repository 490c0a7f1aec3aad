//! Job types for pixel engine operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`transform`](crate::transform) pipeline (which
//! decides what to generate) and the [`PixelEngine`](super::PixelEngine)
//! (which does the actual pixel work), so the pipeline is testable against
//! a recording mock.

use crate::request::Quality;
use std::path::PathBuf;

/// A constrain-only, aspect-preserving, frameless resize.
///
/// A `None` dimension is unconstrained: the engine scales by the provided
/// dimension alone. With both set, the engine fits within the box and the
/// binding axis falls out of the aspect math. The source is never upscaled
/// and never padded.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeJob {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Quality,
    /// Keep the alpha channel through re-encode when the format carries one.
    pub preserve_alpha: bool,
}

/// A margin trim: remove `top`/`left`/`right`/`bottom` pixels from the
/// respective edges. Margins larger than the image saturate.
///
/// The crop pipeline trims symmetrically (`right == left`, `bottom == top`)
/// and writes back over its own input; `source` and `output` may be the
/// same path — the engine's atomic save makes the replace safe.
#[derive(Debug, Clone, PartialEq)]
pub struct CropJob {
    pub source: PathBuf,
    pub output: PathBuf,
    pub top: u32,
    pub left: u32,
    pub right: u32,
    pub bottom: u32,
    pub quality: Quality,
    pub preserve_alpha: bool,
}
