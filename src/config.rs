//! Media storage configuration.
//!
//! Everything the pipeline needs to know about its surroundings lives in
//! [`MediaConfig`], injected at construction: the media root directory the
//! relative source paths resolve against, the public base URL cached
//! artifacts are served under, and which pixel engine is active. There are
//! no ambient lookups — construct a config from code or load one from TOML:
//!
//! ```toml
//! # All fields are optional - defaults shown below
//! base_dir = "media"       # Media root on disk
//! base_url = "/media/"     # Public URL prefix for the media root
//! # engine = "raster"      # Pixel engine identity (omit for the default)
//! # prefix = "shop"        # Default cache namespace under the media root
//! quality = 95             # Default encode quality (0-100)
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! `prefix` and `quality` are only *defaults*: the convenience methods on
//! [`TransformCache`](crate::transform::TransformCache) copy them into each
//! [`TransformRequest`](crate::request::TransformRequest), where they are
//! immutable for the life of the request.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Engine identity used when none is configured.
///
/// Refers to [`RasterEngine`](crate::engine::RasterEngine). The identity
/// string participates in cache keys, so changing the configured engine
/// re-generates artifacts by key miss.
pub const DEFAULT_ENGINE: &str = "raster";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Storage and defaults configuration for a [`TransformCache`](crate::transform::TransformCache).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaConfig {
    /// Media root directory. Source paths and cache paths are relative to it.
    pub base_dir: PathBuf,
    /// Public URL prefix mapping to `base_dir`.
    pub base_url: String,
    /// Pixel engine identity. `None` falls back to [`DEFAULT_ENGINE`].
    pub engine: Option<String>,
    /// Default cache namespace directory, prepended to cache paths.
    pub prefix: Option<String>,
    /// Default encode quality for lossy formats (0-100).
    pub quality: u32,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("media"),
            base_url: "/media/".to_string(),
            engine: None,
            prefix: None,
            quality: 95,
        }
    }
}

impl MediaConfig {
    /// Config with the given storage location and all defaults.
    pub fn new(base_dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation("base_dir must not be empty".into()));
        }
        if self.base_url.is_empty() {
            return Err(ConfigError::Validation("base_url must not be empty".into()));
        }
        if self.quality > 100 {
            return Err(ConfigError::Validation("quality must be 0-100".into()));
        }
        Ok(())
    }

    /// The active engine identity, falling back to [`DEFAULT_ENGINE`] when
    /// unset or blank. Lookup failure is never an error.
    pub fn engine_identity(&self) -> &str {
        match self.engine.as_deref() {
            Some(engine) if !engine.is_empty() => engine,
            _ => DEFAULT_ENGINE,
        }
    }
}
