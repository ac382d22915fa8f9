//! Content hashing: raw and whitespace-normalized digests of a file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::HashingConfig;
use crate::determinism::hashing::{hash_bytes_hex, hash_file_hex};
use crate::determinism::normalize_text::normalize_cad_text;
use crate::errors::{require_regular_file, DesignProofError, DesignProofResult};
use crate::format::{dotted_extension, CadFormat};

/// Raw and normalized digests of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashResult {
    #[serde(rename = "raw_sha256")]
    pub raw_digest: String,
    /// Equal to `raw_digest` for binary formats, unknown extensions, and
    /// whenever text decoding failed.
    #[serde(rename = "normalized_sha256")]
    pub normalized_digest: String,
}

#[derive(Debug, Clone)]
pub struct ContentHasher {
    buffer_size: usize,
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new(&HashingConfig::default())
    }
}

impl ContentHasher {
    pub fn new(cfg: &HashingConfig) -> Self {
        Self {
            buffer_size: cfg.buffer_size,
        }
    }

    /// SHA-256 over the unmodified byte stream.
    pub fn raw_digest(&self, path: &Path) -> DesignProofResult<String> {
        hash_file_hex(path, self.buffer_size)
    }

    /// SHA-256 over the whitespace-stripped text of a text-based CAD/BIM
    /// file. `extension` is matched case-insensitively, dot optional.
    ///
    /// Binary formats and extensions outside the allow-list hash raw. A
    /// decode failure is logged and also falls back to the raw digest.
    pub fn normalized_digest(&self, path: &Path, extension: &str) -> DesignProofResult<String> {
        let text_based = CadFormat::from_extension(extension)
            .map(|f| f.is_text_based())
            .unwrap_or(false);
        if !text_based {
            return self.raw_digest(path);
        }

        or_raw_on_decode(path, self.normalized_text_digest(path), || self.raw_digest(path))
    }

    /// Both digests, with the extension taken from `path`.
    pub fn hash_file(&self, path: &Path) -> DesignProofResult<HashResult> {
        let raw_digest = self.raw_digest(path)?;
        let normalized_digest = self.normalized_digest(path, &dotted_extension(path))?;
        debug!(path = %path.display(), raw = %raw_digest, normalized = %normalized_digest, "content hashed");
        Ok(HashResult {
            raw_digest,
            normalized_digest,
        })
    }

    // A failed text load is treated as a decode failure. The raw fallback
    // then re-reports a genuine I/O problem as `Io`.
    fn normalized_text_digest(&self, path: &Path) -> DesignProofResult<String> {
        require_regular_file(path)?;
        let bytes = fs::read(path).map_err(|e| {
            DesignProofError::decode(format!("failed to load text from {}: {e}", path.display()))
        })?;
        let normalized = normalize_cad_text(&bytes)?;
        Ok(hash_bytes_hex(&normalized))
    }
}

/// Replace a `Decode` failure with `fallback()`, logging it. Every other
/// error passes through.
fn or_raw_on_decode(
    path: &Path,
    normalized: DesignProofResult<String>,
    fallback: impl FnOnce() -> DesignProofResult<String>,
) -> DesignProofResult<String> {
    match normalized {
        Err(e @ DesignProofError::Decode(_)) => {
            warn!(
                path = %path.display(),
                error = %e,
                code = e.code(),
                "normalization failed, using raw digest"
            );
            fallback()
        }
        other => other,
    }
}
