//! Error types for designproof-core.
//!
//! Every fallible operation in the core returns [`DesignProofResult`]. The
//! variants line up with the failure kinds a caller has to tell apart:
//! a missing input, an I/O failure while reading, a recoverable text decode
//! failure, and advisory or configuration problems.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result alias used across the core crate.
pub type DesignProofResult<T> = Result<T, DesignProofError>;

#[derive(Debug, Error)]
pub enum DesignProofError {
    /// The input path does not resolve to an existing regular file.
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Text decoding for normalization failed. Recovered by the normalized
    /// hash, which falls back to the raw digest.
    #[error("text decode failed: {0}")]
    Decode(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Advisory only; the pipeline logs it and keeps going.
    #[error("unsupported CAD/BIM format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl DesignProofError {
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        Self::NotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Stable short code, used in log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Decode(_) => "decode_failure",
            Self::Io { .. } => "io_failure",
            Self::UnsupportedFormat(_) => "unsupported_format",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Serialization(_) => "serialization",
        }
    }
}

/// Ensure `path` is an existing regular file and return its metadata.
///
/// A missing path or a non-file (directory, socket, ...) is `NotFound`; any
/// other stat failure, such as permission denied, is `Io`.
pub fn require_regular_file(path: &Path) -> DesignProofResult<std::fs::Metadata> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(meta),
        Ok(_) => Err(DesignProofError::not_found(path)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(DesignProofError::not_found(path)),
        Err(e) => Err(DesignProofError::io(
            format!("failed to stat {}", path.display()),
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = require_regular_file(&dir.path().join("nope.dxf")).unwrap_err();
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = require_regular_file(dir.path()).unwrap_err();
        assert!(err.to_string().contains("file not found"));
    }
}
