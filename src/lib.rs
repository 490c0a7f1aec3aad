//! # pixcache
//!
//! An on-demand image transform cache. Given a source image under a media
//! root and a requested geometry, pixcache deterministically derives a cache
//! location, produces the transformed image once, and serves every later
//! request for the same (source, geometry, parameters) tuple straight from
//! the cached file — no recomputation, no database, no background workers.
//!
//! Exactly two operations are supported:
//!
//! - **Resize** — aspect-preserving shrink-to-fit into a width × height box,
//!   never upscaling, never letterboxing.
//! - **Crop** — resize so the source covers the target box on the binding
//!   axis, then trim the excess symmetrically to hit the exact target size.
//!
//! # Architecture: Four-Stage Pipeline
//!
//! Every call to [`TransformCache::resize`] or [`TransformCache::crop`] runs
//! the same synchronous pipeline:
//!
//! ```text
//! 1. Resolve    relative path → absolute source + bare filename
//! 2. Derive     (operation, engine, quality) → digest → cache path
//! 3. Lookup     artifact exists? → return its URL (engine never touched)
//! 4. Transform  resize / resize-then-center-crop → write → return URL
//! ```
//!
//! A missing source is not an error: both operations return `Ok(None)` and
//! leave no trace on disk. The caller decides what "nothing to render" means.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | [`MediaConfig`]: media root, base URL, engine identity, defaults |
//! | [`request`] | Immutable [`TransformRequest`] values, [`Operation`], [`Quality`] |
//! | [`cache`] | Key digest, two-level filename sharding, cache path and URL composition |
//! | [`engine`] | [`PixelEngine`] trait, job descriptions, pure geometry, the [`RasterEngine`] |
//! | [`transform`] | [`TransformCache`]: the four-stage pipeline tying it all together |
//!
//! # Design Decisions
//!
//! ## Write-Once Artifacts
//!
//! A cached file is never validated, refreshed, or deleted. The cache key
//! encodes everything that affects the output (operation, engine identity,
//! quality), and the path encodes the requested dimensions, so a parameter
//! change lands in a new directory instead of invalidating an old one.
//! Retention and cleanup belong to whoever owns the media directory.
//!
//! ## Engine Behind a Trait
//!
//! Pixel work goes through the [`PixelEngine`] trait. The production
//! implementation is [`RasterEngine`] — pure Rust on the `image` crate, no
//! ImageMagick, no system libraries — and tests drive the pipeline with a
//! recording mock to prove, call for call, that a cache hit never touches
//! the engine. The active engine's identity participates in the cache key,
//! so swapping engines re-generates outputs by key miss rather than by
//! deleting anything.
//!
//! ## Atomic Saves
//!
//! Concurrent first-time requests for the same key are allowed to race:
//! both compute byte-identical output, so last-writer-wins is harmless.
//! What is *not* harmless is a reader observing a half-written file, so the
//! engine always encodes to a temporary sibling and renames into place.
//!
//! ## Explicit Configuration
//!
//! Nothing is looked up from ambient globals. [`MediaConfig`] carries the
//! media root, the public base URL, and the engine identity (falling back
//! to the built-in raster engine when unset), and is injected at
//! construction — the whole pipeline is testable from a temp directory.

pub mod cache;
pub mod config;
pub mod engine;
pub mod request;
pub mod transform;

pub use config::{ConfigError, MediaConfig};
pub use engine::{Dimensions, EngineError, PixelEngine, RasterEngine};
pub use request::{Operation, Quality, TransformRequest};
pub use transform::{TransformCache, TransformError};
