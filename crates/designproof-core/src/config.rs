//! Configuration structures for designproof-core.
//!
//! This module defines explicit configuration objects used by higher-level
//! components (CLI, store) to control hashing buffers, fingerprint sampling,
//! metadata probing, and the issuer string stamped on certificates.
//!
//! The core crate itself does not read environment variables. All configuration
//! must be provided explicitly by the caller so that fingerprints are
//! reproducible for a given parameter set.

use crate::errors::{DesignProofError, DesignProofResult};

/// Global configuration container.
#[derive(Debug, Clone, Default)]
pub struct CoreConfig {
    pub hashing: HashingConfig,
    pub fingerprint: FingerprintConfig,
    pub metadata: MetadataConfig,
    pub issuer: IssuerConfig,
}

/// Hashing-related configuration.
#[derive(Debug, Clone)]
pub struct HashingConfig {
    /// Read buffer for streaming digests.
    pub buffer_size: usize,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            buffer_size: crate::defaults::HASH_BUFFER_SIZE,
        }
    }
}

/// Fingerprint sampling parameters.
///
/// Every digest in a fingerprint is only comparable with another fingerprint
/// computed under the same parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintConfig {
    /// Bytes taken from each end of the file for the head/tail digest.
    pub head_tail_chunk: usize,
    /// Number of evenly spaced samples for the segmented digest.
    pub segments: u64,
    /// Bytes read at each sample position.
    pub segment_chunk: usize,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            head_tail_chunk: crate::defaults::HEAD_TAIL_CHUNK,
            segments: crate::defaults::SEGMENTS,
            segment_chunk: crate::defaults::SEGMENT_CHUNK,
        }
    }
}

/// Header probe sizes for format-specific metadata.
#[derive(Debug, Clone)]
pub struct MetadataConfig {
    pub dxf_header_bytes: usize,
    pub ifc_header_bytes: usize,
    pub step_header_bytes: usize,
    /// Length, in characters, of a captured header value snippet.
    pub value_snippet_chars: usize,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            dxf_header_bytes: 5000,
            ifc_header_bytes: 2000,
            step_header_bytes: 1000,
            value_snippet_chars: 200,
        }
    }
}

/// Identity of the tool or actor issuing certificates.
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    pub name: String,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            name: crate::defaults::ISSUER.to_string(),
        }
    }
}

/// Validate a full configuration object.
pub fn validate_config(cfg: &CoreConfig) -> DesignProofResult<()> {
    if cfg.hashing.buffer_size == 0 {
        return Err(DesignProofError::invalid_argument(
            "hash buffer_size must be greater than zero",
        ));
    }

    validate_fingerprint_config(&cfg.fingerprint)?;

    if cfg.issuer.name.trim().is_empty() {
        return Err(DesignProofError::invalid_argument(
            "issuer must not be empty",
        ));
    }

    Ok(())
}

/// Validate fingerprint parameters on their own; the fingerprinter calls this
/// when constructed outside a full [`CoreConfig`].
pub fn validate_fingerprint_config(cfg: &FingerprintConfig) -> DesignProofResult<()> {
    if cfg.head_tail_chunk == 0 {
        return Err(DesignProofError::invalid_argument(
            "head_tail_chunk must be greater than zero",
        ));
    }
    if cfg.segments == 0 {
        return Err(DesignProofError::invalid_argument(
            "segments must be greater than zero",
        ));
    }
    if cfg.segment_chunk == 0 {
        return Err(DesignProofError::invalid_argument(
            "segment_chunk must be greater than zero",
        ));
    }
    Ok(())
}
