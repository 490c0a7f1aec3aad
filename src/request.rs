//! Immutable transform request values.
//!
//! A [`TransformRequest`] describes one invocation of the pipeline: which
//! source, which operation, which geometry, which encoding parameters.
//! Requests are plain values — built once, never mutated — so there is no
//! ordering hazard between setting a quality and running an operation, and
//! two equal requests always resolve to the same cache path.

/// The two supported transform operations.
///
/// The operation name is one of the tokens hashed into the cache key, so
/// resize and crop outputs of the same source never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Aspect-preserving shrink-to-fit into the requested box.
    Resize,
    /// Shrink to cover the box on the binding axis, then center-crop to the
    /// exact requested size.
    Crop,
}

impl Operation {
    /// Token used in the cache key and in log events.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Resize => "resize",
            Operation::Crop => "crop",
        }
    }
}

/// Encode quality for lossy formats (0-100). Clamped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.min(100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

/// One transform invocation, immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    /// Source path relative to the media root. A leading separator is
    /// tolerated and stripped during resolution.
    pub source: String,
    /// Requested width in pixels.
    pub width: u32,
    /// Requested height. `None` means "derive from width": same as the
    /// width for [`Operation::Crop`], unconstrained for [`Operation::Resize`].
    pub height: Option<u32>,
    pub operation: Operation,
    pub quality: Quality,
    /// Cache namespace directory prepended to the cache path.
    pub prefix: Option<String>,
}

impl TransformRequest {
    /// A resize request with default quality and no prefix.
    pub fn resize(source: impl Into<String>, width: u32) -> Self {
        Self::new(Operation::Resize, source, width)
    }

    /// A crop request with default quality and no prefix.
    pub fn crop(source: impl Into<String>, width: u32) -> Self {
        Self::new(Operation::Crop, source, width)
    }

    fn new(operation: Operation, source: impl Into<String>, width: u32) -> Self {
        Self {
            source: source.into(),
            width,
            height: None,
            operation,
            quality: Quality::default(),
            prefix: None,
        }
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_quality(mut self, quality: u32) -> Self {
        self.quality = Quality::new(quality);
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// The height the crop operation must hit exactly: the requested height,
    /// defaulting to the width (square crop).
    pub fn crop_height(&self) -> u32 {
        self.height.unwrap_or(self.width)
    }

    /// The height component of the cache path.
    ///
    /// Crop always has a concrete target height. Resize encodes "auto
    /// height" as a literal `0`, keeping it distinct from an explicit
    /// height equal to the width.
    pub fn height_path_value(&self) -> u32 {
        match self.operation {
            Operation::Crop => self.crop_height(),
            Operation::Resize => self.height.unwrap_or(0),
        }
    }
}
