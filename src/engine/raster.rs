//! Pure Rust pixel engine — zero external dependencies.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, WebP) | `image` crate (pure Rust decoders) |
//! | Identify | `image::image_dimensions` (header read, no full decode) |
//! | Alpha detection | format sniffing via `ImageReader::with_guessed_format` |
//! | Resize | `image::imageops` with `Lanczos3` filter |
//! | Crop | `image::DynamicImage::crop_imm` |
//! | Encode | JPEG with quality; PNG/GIF/WebP lossless |
//!
//! Saves are atomic: encode to a hidden temporary sibling, then rename onto
//! the destination, so a concurrent reader never observes a truncated file.

use super::calculations::fit_within;
use super::jobs::{CropJob, ResizeJob};
use super::pixel::{Dimensions, EngineError, PixelEngine};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Formats with compiled-in decode and encode support, keyed by extension.
const FORMAT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("gif", ImageFormat::Gif),
    ("webp", ImageFormat::WebP),
];

/// Default pixel engine on the `image` crate stack.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RasterEngine;

impl RasterEngine {
    /// Identity token this engine contributes to cache keys.
    ///
    /// Must stay stable across releases: changing it orphans every cached
    /// artifact generated under the old identity.
    pub const IDENTITY: &'static str = "raster";

    pub fn new() -> Self {
        Self
    }
}

impl Default for RasterEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk, format inferred from the extension.
fn load_image(path: &Path) -> Result<DynamicImage, EngineError> {
    ImageReader::open(path)
        .map_err(EngineError::Io)?
        .decode()
        .map_err(|e| {
            EngineError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Resolve the output format from the destination extension.
fn output_format(path: &Path) -> Result<ImageFormat, EngineError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    FORMAT_CANDIDATES
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map(|(_, format)| *format)
        .ok_or_else(|| {
            EngineError::ProcessingFailed(format!("Unsupported output format: {ext}"))
        })
}

fn format_supports_alpha(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Png | ImageFormat::Gif | ImageFormat::WebP
    )
}

/// Save to `path` atomically, re-encoding in the destination format.
///
/// The pixel data is normalized to RGBA when alpha is preserved and the
/// format can carry it, RGB otherwise (JPEG always flattens).
fn save_image(
    img: DynamicImage,
    path: &Path,
    quality: u32,
    preserve_alpha: bool,
) -> Result<(), EngineError> {
    let format = output_format(path)?;
    let normalized = if preserve_alpha && format_supports_alpha(format) && img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.into_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.into_rgb8())
    };

    let parent = path.parent().ok_or_else(|| {
        EngineError::ProcessingFailed(format!("Output path has no parent: {}", path.display()))
    })?;
    let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("image");
    let tmp = parent.join(format!(".{}.tmp.{}", filename, std::process::id()));

    match write_encoded(&normalized, &tmp, format, quality) {
        Ok(()) => std::fs::rename(&tmp, path).map_err(EngineError::Io),
        Err(e) => {
            let _ = std::fs::remove_file(&tmp);
            Err(e)
        }
    }
}

fn write_encoded(
    img: &DynamicImage,
    path: &Path,
    format: ImageFormat,
    quality: u32,
) -> Result<(), EngineError> {
    let file = File::create(path).map_err(EngineError::Io)?;
    let mut writer = BufWriter::new(file);

    match format {
        ImageFormat::Jpeg => {
            // The JPEG encoder rejects quality 0; requests at 0 encode at 1
            let encoder =
                JpegEncoder::new_with_quality(&mut writer, quality.clamp(1, 100) as u8);
            img.write_with_encoder(encoder).map_err(|e| {
                EngineError::ProcessingFailed(format!("JPEG encode failed: {e}"))
            })?;
        }
        other => {
            img.write_to(&mut writer, other).map_err(|e| {
                EngineError::ProcessingFailed(format!("{other:?} encode failed: {e}"))
            })?;
        }
    }

    let file = writer
        .into_inner()
        .map_err(|e| EngineError::ProcessingFailed(format!("Flush failed: {e}")))?;
    file.sync_all().map_err(EngineError::Io)?;
    Ok(())
}

impl PixelEngine for RasterEngine {
    fn identify(&self, path: &Path) -> Result<Dimensions, EngineError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            EngineError::ProcessingFailed(format!("Failed to read dimensions: {e}"))
        })?;
        Ok(Dimensions { width, height })
    }

    fn supports_alpha(&self, path: &Path) -> Result<bool, EngineError> {
        // Sniff the real format from content; the extension can lie
        let reader = ImageReader::open(path)
            .map_err(EngineError::Io)?
            .with_guessed_format()
            .map_err(EngineError::Io)?;
        Ok(reader.format().is_some_and(format_supports_alpha))
    }

    fn resize(&self, job: &ResizeJob) -> Result<(), EngineError> {
        let img = load_image(&job.source)?;
        let (width, height) = fit_within((img.width(), img.height()), (job.width, job.height));
        let resized = if (width, height) == (img.width(), img.height()) {
            img
        } else {
            img.resize_exact(width, height, FilterType::Lanczos3)
        };
        save_image(resized, &job.output, job.quality.value(), job.preserve_alpha)
    }

    fn crop(&self, job: &CropJob) -> Result<(), EngineError> {
        let img = load_image(&job.source)?;
        let (width, height) = (img.width(), img.height());
        let keep_w = width.saturating_sub(job.left.saturating_add(job.right));
        let keep_h = height.saturating_sub(job.top.saturating_add(job.bottom));
        if keep_w == 0 || keep_h == 0 {
            return Err(EngineError::ProcessingFailed(format!(
                "Crop margins consume the whole image ({width}x{height})"
            )));
        }
        let cropped = img.crop_imm(job.left, job.top, keep_w, keep_h);
        save_image(cropped, &job.output, job.quality.value(), job.preserve_alpha)
    }
}
