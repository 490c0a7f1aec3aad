//! Cache key derivation and cache path composition.
//!
//! A cached artifact lives at a path that is a pure function of the request:
//!
//! ```text
//! [<prefix>/]cache/<W>x<H-or-0>/<digest>/<c1>/<c2>/<filename>
//! ```
//!
//! - `<W>x<H-or-0>` encodes the requested geometry. Resize with no explicit
//!   height uses a literal `0`, so "auto height" never collides with an
//!   explicit square.
//! - `<digest>` is a 32-char hex hash of the semantic parameters — fixed
//!   flags, operation name, engine identity, quality — and deliberately
//!   excludes dimensions, so different sizes of the same parameter set land
//!   in sibling directories sharing one digest segment.
//! - `<c1>/<c2>` is a two-level shard from the filename's leading
//!   characters, bounding per-directory fan-out in large media libraries.
//!
//! No timestamps, no hidden state: equal inputs always compose equal paths.

use crate::request::Operation;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Length of the hex digest segment in cache paths.
const DIGEST_LEN: usize = 32;

/// Literal directory separating cached artifacts from source media.
const CACHE_DIR: &str = "cache";

/// The ordered parameter record hashed into the cache key.
///
/// An explicit struct rather than an ad-hoc token list, so adding or
/// reordering a field is a visible, reviewable change to the serialization
/// instead of silent key drift. The three behavior flags are fixed for the
/// current pipeline (shrink only, keep aspect, no frame) but still
/// serialized: flipping one must change every key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyParams<'a> {
    pub constrain_only: bool,
    pub keep_aspect_ratio: bool,
    pub keep_frame: bool,
    pub operation: Operation,
    pub engine: &'a str,
    pub quality: u32,
}

impl<'a> KeyParams<'a> {
    /// Key parameters for the pipeline's fixed transform behavior.
    pub fn for_operation(operation: Operation, engine: &'a str, quality: u32) -> Self {
        Self {
            constrain_only: true,
            keep_aspect_ratio: true,
            keep_frame: false,
            operation,
            engine,
            quality,
        }
    }

    /// Stable ordered serialization of the record.
    fn tokens(&self) -> [String; 6] {
        [
            format!("constrainOnly={}", self.constrain_only),
            format!("keepAspectRatio={}", self.keep_aspect_ratio),
            format!("keepFrame={}", self.keep_frame),
            self.operation.name().to_string(),
            self.engine.to_string(),
            self.quality.to_string(),
        ]
    }

    /// 32-char lowercase hex digest of the `|`-joined token list.
    ///
    /// `|` never appears in a token, so distinct parameter sets never join
    /// to the same string. SHA-256 truncated to 128 bits — collision
    /// resistance far beyond what a filesystem cache needs; cryptographic
    /// strength is not required here.
    pub fn digest(&self) -> String {
        let joined = self.tokens().join("|");
        let hash = Sha256::digest(joined.as_bytes());
        let mut hex = format!("{:x}", hash);
        hex.truncate(DIGEST_LEN);
        hex
    }
}

/// Two-level shard from a filename's leading characters, lowercased.
///
/// The second level falls back to the first character when the filename has
/// no second character or its second character is a literal dot — `"A.jpg"`
/// shards under `a/a`, `"ab.jpg"` under `a/b`.
pub fn shard_prefix(filename: &str) -> (String, String) {
    let mut chars = filename.chars();
    let first = match chars.next() {
        Some(c) => c,
        // The pipeline never composes a location for an empty filename;
        // keep the function total anyway.
        None => '_',
    };
    let second = match chars.next() {
        Some(c) if c != '.' => c,
        _ => first,
    };
    (
        first.to_lowercase().collect(),
        second.to_lowercase().collect(),
    )
}

/// A fully composed cache location: relative directory plus filename.
///
/// The relative form is always forward-slash separated, ready for URL
/// composition; [`dir_under`](Self::dir_under) and
/// [`file_under`](Self::file_under) produce the filesystem-native forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLocation {
    rel_dir: String,
    filename: String,
}

impl CacheLocation {
    /// Compose the location for a transform.
    ///
    /// `height_path_value` is the literal height segment: the target height
    /// for crop, the requested height for resize, or `0` for resize with
    /// auto height.
    pub fn compose(
        prefix: Option<&str>,
        width: u32,
        height_path_value: u32,
        digest: &str,
        filename: &str,
    ) -> Self {
        let (c1, c2) = shard_prefix(filename);
        let mut rel_dir = String::new();
        if let Some(prefix) = prefix {
            let trimmed = prefix.trim_matches('/');
            if !trimmed.is_empty() {
                rel_dir.push_str(trimmed);
                rel_dir.push('/');
            }
        }
        rel_dir.push_str(&format!(
            "{CACHE_DIR}/{width}x{height_path_value}/{digest}/{c1}/{c2}"
        ));
        Self {
            rel_dir,
            filename: filename.to_string(),
        }
    }

    /// Relative cache directory, forward-slash separated.
    pub fn rel_dir(&self) -> &str {
        &self.rel_dir
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Absolute destination directory under the media root.
    pub fn dir_under(&self, base_dir: &Path) -> PathBuf {
        self.rel_dir.split('/').fold(base_dir.to_path_buf(), |p, seg| p.join(seg))
    }

    /// Absolute destination file under the media root.
    pub fn file_under(&self, base_dir: &Path) -> PathBuf {
        self.dir_under(base_dir).join(&self.filename)
    }

    /// Public URL of the artifact: base URL + relative path + filename.
    ///
    /// Any backslash is rewritten to a forward slash so URLs come out
    /// identical on hosts whose native separator is a backslash.
    pub fn url(&self, base_url: &str) -> String {
        let url = format!(
            "{}/{}/{}",
            base_url.trim_end_matches('/'),
            self.rel_dir,
            self.filename
        );
        if url.contains('\\') {
            url.replace('\\', "/")
        } else {
            url
        }
    }
}
