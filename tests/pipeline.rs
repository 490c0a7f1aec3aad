//! End-to-end pipeline tests with the real raster engine.
//!
//! Everything runs against a temp media root: write a synthetic source
//! image, ask the cache for a transform, then decode what landed on disk
//! and check its geometry.

use image::codecs::jpeg::JpegEncoder;
use image::{ImageEncoder, RgbImage, RgbaImage};
use pixcache::{MediaConfig, RasterEngine, TransformCache, TransformRequest};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const BASE_URL: &str = "https://cdn.example.com/media/";

fn write_jpeg(path: &Path, width: u32, height: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = fs::File::create(path).unwrap();
    JpegEncoder::new(std::io::BufWriter::new(file))
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

fn write_png_with_alpha(path: &Path, width: u32, height: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let img = RgbaImage::from_fn(width, height, |x, _| {
        image::Rgba([200, 100, 50, (x % 256) as u8])
    });
    img.save(path).unwrap();
}

fn new_cache(root: &TempDir) -> TransformCache<RasterEngine> {
    TransformCache::new(
        MediaConfig::new(root.path(), BASE_URL),
        RasterEngine::new(),
    )
}

/// Map an artifact URL back to its path under the media root.
fn artifact_path(root: &TempDir, url: &str) -> PathBuf {
    let rel = url
        .strip_prefix(BASE_URL)
        .unwrap_or_else(|| panic!("url {url} does not start with {BASE_URL}"));
    root.path().join(rel)
}

fn dimensions_of(path: &Path) -> (u32, u32) {
    image::image_dimensions(path).unwrap()
}

#[test]
fn resize_wide_source_into_square_box() {
    let root = TempDir::new().unwrap();
    write_jpeg(&root.path().join("photos/dawn.jpg"), 400, 200);
    let cache = new_cache(&root);

    let url = cache.resize("photos/dawn.jpg", 100, Some(100)).unwrap().unwrap();

    let artifact = artifact_path(&root, &url);
    assert!(artifact.is_file());
    assert_eq!(dimensions_of(&artifact), (100, 50));
}

#[test]
fn resize_tall_source_into_square_box() {
    let root = TempDir::new().unwrap();
    write_jpeg(&root.path().join("photos/tower.jpg"), 200, 400);
    let cache = new_cache(&root);

    let url = cache.resize("photos/tower.jpg", 100, Some(100)).unwrap().unwrap();

    assert_eq!(dimensions_of(&artifact_path(&root, &url)), (50, 100));
}

#[test]
fn resize_auto_height_scales_by_width() {
    let root = TempDir::new().unwrap();
    write_jpeg(&root.path().join("wide.jpg"), 400, 200);
    let cache = new_cache(&root);

    let url = cache.resize("wide.jpg", 200, None).unwrap().unwrap();

    assert!(url.contains("/200x0/"), "auto height missing from {url}");
    assert_eq!(dimensions_of(&artifact_path(&root, &url)), (200, 100));
}

#[test]
fn crop_hits_exact_target_size() {
    let root = TempDir::new().unwrap();
    write_jpeg(&root.path().join("banner.jpg"), 400, 200);
    let cache = new_cache(&root);

    let url = cache.crop("banner.jpg", 100, Some(100)).unwrap().unwrap();

    assert_eq!(dimensions_of(&artifact_path(&root, &url)), (100, 100));
}

#[test]
fn crop_square_by_default() {
    let root = TempDir::new().unwrap();
    write_jpeg(&root.path().join("banner.jpg"), 600, 300);
    let cache = new_cache(&root);

    let url = cache.crop("banner.jpg", 150, None).unwrap().unwrap();

    assert!(url.contains("/150x150/"), "unexpected url: {url}");
    assert_eq!(dimensions_of(&artifact_path(&root, &url)), (150, 150));
}

#[test]
fn crop_portrait_target_from_landscape_source() {
    let root = TempDir::new().unwrap();
    write_jpeg(&root.path().join("scene.jpg"), 800, 600);
    let cache = new_cache(&root);

    let url = cache.crop("scene.jpg", 200, Some(300)).unwrap().unwrap();

    assert_eq!(dimensions_of(&artifact_path(&root, &url)), (200, 300));
}

#[test]
fn crop_undersized_source_stays_undersized() {
    let root = TempDir::new().unwrap();
    write_jpeg(&root.path().join("tiny.jpg"), 80, 60);
    let cache = new_cache(&root);

    // Constrain-only: the 80x60 source is never upscaled to cover the
    // 100x100 box, and the trim clamps instead of going negative
    let url = cache.crop("tiny.jpg", 100, Some(100)).unwrap().unwrap();

    assert_eq!(dimensions_of(&artifact_path(&root, &url)), (80, 60));
}

#[test]
fn missing_source_is_empty_not_error() {
    let root = TempDir::new().unwrap();
    let cache = new_cache(&root);

    assert_eq!(cache.resize("/does/not/exist.jpg", 100, Some(100)).unwrap(), None);
    assert_eq!(cache.crop("/does/not/exist.jpg", 100, None).unwrap(), None);

    // No cache skeleton left behind
    assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
}

#[test]
fn repeated_call_reuses_artifact() {
    let root = TempDir::new().unwrap();
    write_jpeg(&root.path().join("dawn.jpg"), 400, 200);
    let cache = new_cache(&root);

    let first = cache.resize("dawn.jpg", 100, Some(100)).unwrap().unwrap();
    let artifact = artifact_path(&root, &first);
    // Plant a sentinel: a regenerate would replace it
    fs::write(&artifact, b"sentinel").unwrap();

    let second = cache.resize("dawn.jpg", 100, Some(100)).unwrap().unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&artifact).unwrap(), b"sentinel");
}

#[test]
fn quality_change_generates_sibling_artifact() {
    let root = TempDir::new().unwrap();
    write_jpeg(&root.path().join("dawn.jpg"), 400, 200);
    let cache = new_cache(&root);

    let q95 = cache
        .execute(&TransformRequest::resize("dawn.jpg", 100).with_quality(95))
        .unwrap()
        .unwrap();
    let q80 = cache
        .execute(&TransformRequest::resize("dawn.jpg", 100).with_quality(80))
        .unwrap()
        .unwrap();

    assert_ne!(q95, q80);
    assert!(artifact_path(&root, &q95).is_file());
    assert!(artifact_path(&root, &q80).is_file());
}

#[test]
fn png_alpha_survives_resize_and_crop() {
    let root = TempDir::new().unwrap();
    write_png_with_alpha(&root.path().join("logo.png"), 200, 100);
    let cache = new_cache(&root);

    let resized = cache.resize("logo.png", 100, None).unwrap().unwrap();
    let cropped = cache.crop("logo.png", 50, Some(50)).unwrap().unwrap();

    for url in [&resized, &cropped] {
        let path = artifact_path(&root, url);
        let decoded = image::open(&path).unwrap();
        assert!(decoded.color().has_alpha(), "alpha lost in {url}");
    }
    assert_eq!(dimensions_of(&artifact_path(&root, &cropped)), (50, 50));
}

#[test]
fn shard_fallback_for_single_letter_names() {
    let root = TempDir::new().unwrap();
    write_jpeg(&root.path().join("A.jpg"), 100, 100);
    write_jpeg(&root.path().join("ab.jpg"), 100, 100);
    let cache = new_cache(&root);

    let single = cache.resize("A.jpg", 50, None).unwrap().unwrap();
    let double = cache.resize("ab.jpg", 50, None).unwrap().unwrap();

    assert!(single.ends_with("/a/a/A.jpg"), "unexpected url: {single}");
    assert!(double.ends_with("/a/b/ab.jpg"), "unexpected url: {double}");
}

#[test]
fn prefix_namespaces_the_cache_tree() {
    let root = TempDir::new().unwrap();
    write_jpeg(&root.path().join("dawn.jpg"), 200, 100);
    let cache = TransformCache::new(
        MediaConfig {
            prefix: Some("gallery".into()),
            ..MediaConfig::new(root.path(), BASE_URL)
        },
        RasterEngine::new(),
    );

    let url = cache.resize("dawn.jpg", 100, None).unwrap().unwrap();

    assert!(
        url.starts_with(&format!("{BASE_URL}gallery/cache/")),
        "unexpected url: {url}"
    );
    assert!(artifact_path(&root, &url).is_file());
}
