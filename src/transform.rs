//! The transform pipeline: resolve, derive, look up, generate.
//!
//! [`TransformCache`] is the crate's front door. Each call runs the full
//! four-stage pipeline synchronously on the caller's thread:
//!
//! 1. **Resolve** the relative source path against the media root. A source
//!    that is not an existing regular file short-circuits to `Ok(None)` —
//!    "nothing to render", not an error, and no directory is created.
//! 2. **Derive** the cache key from the semantic parameters and compose the
//!    cache location (see [`cache`](crate::cache)).
//! 3. **Look up** the artifact. If it exists the engine is never touched
//!    and the URL is returned as-is; otherwise the destination directory is
//!    created (an already-existing directory is success, not an error).
//! 4. **Generate** via the [`PixelEngine`]:
//!    - *Resize* is a single job carrying both requested dimensions.
//!    - *Crop* is the two-phase algorithm: cover-resize along the binding
//!      axis to the destination path, re-identify the intermediate, then
//!      trim symmetric margins back onto the same path.
//!
//! ## Concurrency
//!
//! No locks. Requests with different keys are fully independent. Same-key
//! races re-generate byte-identical output and the engine's atomic save
//! keeps readers from seeing partial writes, so last-writer-wins is safe.
//!
//! ## Failure modes
//!
//! Directory creation failure and engine failure are fatal to the request
//! and propagate to the caller; there are no retries and at most one
//! generation attempt per call.

use crate::cache::{CacheLocation, KeyParams};
use crate::config::MediaConfig;
use crate::engine::calculations::{binds_to_width, center_margins};
use crate::engine::{CropJob, EngineError, PixelEngine, ResizeJob};
use crate::request::{Operation, Quality, TransformRequest};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Failed to create cache directory {}: {source}", .path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Engine failed: {0}")]
    Engine(#[from] EngineError),
}

/// The on-demand transform cache over one media root and one pixel engine.
///
/// Cheap to construct; holds no open resources and no mutable state, so a
/// single instance can serve parallel requests (`Sync` when the engine is).
pub struct TransformCache<E> {
    config: MediaConfig,
    engine: E,
}

impl<E: PixelEngine> TransformCache<E> {
    pub fn new(config: MediaConfig, engine: E) -> Self {
        Self { config, engine }
    }

    pub fn config(&self) -> &MediaConfig {
        &self.config
    }

    /// Aspect-preserving resize into a `width` × `height` box.
    ///
    /// `height: None` leaves the height unconstrained (scale by width
    /// alone). Returns the artifact URL, or `None` when the source image
    /// does not exist. Uses the config's default quality and prefix;
    /// build a [`TransformRequest`] and call [`execute`](Self::execute)
    /// to override either.
    pub fn resize(
        &self,
        source: &str,
        width: u32,
        height: Option<u32>,
    ) -> Result<Option<String>, TransformError> {
        self.execute(&self.request(Operation::Resize, source, width, height))
    }

    /// Resize-then-center-crop to exactly `width` × `height`.
    ///
    /// `height: None` means a square crop of `width` × `width`. Returns the
    /// artifact URL, or `None` when the source image does not exist.
    pub fn crop(
        &self,
        source: &str,
        width: u32,
        height: Option<u32>,
    ) -> Result<Option<String>, TransformError> {
        self.execute(&self.request(Operation::Crop, source, width, height))
    }

    fn request(
        &self,
        operation: Operation,
        source: &str,
        width: u32,
        height: Option<u32>,
    ) -> TransformRequest {
        TransformRequest {
            source: source.to_string(),
            width,
            height,
            operation,
            quality: Quality::new(self.config.quality),
            prefix: self.config.prefix.clone(),
        }
    }

    /// Run the pipeline for an explicit request.
    pub fn execute(&self, request: &TransformRequest) -> Result<Option<String>, TransformError> {
        // Stage 1: path resolution
        let source = self.resolve_source(&request.source);
        if !source.is_file() {
            debug!(source = %source.display(), "source image missing, nothing to render");
            return Ok(None);
        }
        let filename = match source.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => return Ok(None),
        };

        // Stage 2: cache key derivation
        let key = KeyParams::for_operation(
            request.operation,
            self.config.engine_identity(),
            request.quality.value(),
        );
        let location = CacheLocation::compose(
            request.prefix.as_deref(),
            request.width,
            request.height_path_value(),
            &key.digest(),
            &filename,
        );
        let dest_dir = location.dir_under(&self.config.base_dir);
        let dest_file = dest_dir.join(location.filename());
        let url = location.url(&self.config.base_url);

        // Stage 3: cache lookup / directory preparation
        if dest_file.is_file() {
            debug!(operation = request.operation.name(), url = %url, "cache hit");
            return Ok(Some(url));
        }
        fs::create_dir_all(&dest_dir).map_err(|source| TransformError::DirectoryCreation {
            path: dest_dir.clone(),
            source,
        })?;

        // Stage 4: transformation
        debug!(
            operation = request.operation.name(),
            source = %source.display(),
            dest = %dest_file.display(),
            "cache miss, generating"
        );
        match request.operation {
            Operation::Resize => self.generate_resize(request, &source, &dest_file)?,
            Operation::Crop => self.generate_crop(request, &source, &dest_file)?,
        }

        Ok(Some(url))
    }

    /// Shrink-to-fit into the requested box; the engine works out which
    /// dimension binds under aspect preservation.
    fn generate_resize(
        &self,
        request: &TransformRequest,
        source: &Path,
        dest: &Path,
    ) -> Result<(), TransformError> {
        let preserve_alpha = self.engine.supports_alpha(source)?;
        self.engine.resize(&ResizeJob {
            source: source.to_path_buf(),
            output: dest.to_path_buf(),
            width: Some(request.width),
            height: request.height,
            quality: request.quality,
            preserve_alpha,
        })?;
        Ok(())
    }

    /// Two-phase crop: cover-resize along the binding axis, then trim the
    /// overflow symmetrically from the other axis.
    ///
    /// A source smaller than the target box on the binding axis is never
    /// upscaled; the margins saturate at zero and the artifact comes out
    /// undersized rather than padded.
    fn generate_crop(
        &self,
        request: &TransformRequest,
        source: &Path,
        dest: &Path,
    ) -> Result<(), TransformError> {
        let target = (request.width, request.crop_height());
        let native = self.engine.identify(source)?;
        let preserve_alpha = self.engine.supports_alpha(source)?;

        let (width, height) = if binds_to_width((native.width, native.height), target) {
            (Some(target.0), None)
        } else {
            (None, Some(target.1))
        };
        self.engine.resize(&ResizeJob {
            source: source.to_path_buf(),
            output: dest.to_path_buf(),
            width,
            height,
            quality: request.quality,
            preserve_alpha,
        })?;

        let intermediate = self.engine.identify(dest)?;
        let (top, left) = center_margins((intermediate.width, intermediate.height), target);
        self.engine.crop(&CropJob {
            source: dest.to_path_buf(),
            output: dest.to_path_buf(),
            top,
            left,
            right: left,
            bottom: top,
            quality: request.quality,
            preserve_alpha,
        })?;
        Ok(())
    }

    fn resolve_source(&self, relative: &str) -> PathBuf {
        self.config
            .base_dir
            .join(relative.trim_start_matches(['/', '\\']))
    }
}
