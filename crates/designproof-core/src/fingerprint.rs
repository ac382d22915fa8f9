//! Structural fingerprints of a file.
//!
//! A fingerprint bundles four identity signals:
//! - `full`: SHA-256 over the whole byte stream (same algorithm as the raw
//!   content digest, computed independently)
//! - `head_tail`: SHA-256 over the first and last K bytes
//! - `segmented`: one SHA-256 fed by N evenly spaced samples
//! - `structural`: the size in bytes, KB and MB
//!
//! The sampled digests let two copies of a large file be compared cheaply.
//! They are only comparable between fingerprints taken with the same
//! [`FingerprintConfig`].

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use tracing::debug;

use crate::clock::Clock;
use crate::config::{validate_fingerprint_config, FingerprintConfig};
use crate::determinism::hashing::{hash_bytes_hex, hash_file_hex};
use crate::errors::{require_regular_file, DesignProofError, DesignProofResult};

/// The complete fingerprint package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerprintResult {
    /// Informational; not part of the file's identity.
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    #[serde(rename = "full_sha256")]
    pub full_digest: String,
    /// `None` for an empty file.
    #[serde(rename = "head_tail_sha256")]
    pub head_tail_digest: Option<String>,
    /// `None` for an empty file.
    #[serde(rename = "segmented_sha256")]
    pub segmented_digest: Option<String>,
    pub structural: StructuralInfo,
}

impl FingerprintResult {
    /// True when every digest field matches. `generated_at` is ignored.
    pub fn same_identity(&self, other: &FingerprintResult) -> bool {
        self.full_digest == other.full_digest
            && self.head_tail_digest == other.head_tail_digest
            && self.segmented_digest == other.segmented_digest
            && self.structural == other.structural
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralInfo {
    pub size_bytes: u64,
    pub size_kb: f64,
    pub size_mb: f64,
}

impl StructuralInfo {
    pub fn from_size(size_bytes: u64) -> Self {
        Self {
            size_bytes,
            size_kb: round2(size_bytes as f64 / 1024.0),
            size_mb: round2(size_bytes as f64 / (1024.0 * 1024.0)),
        }
    }
}

/// Two decimals, ties to even.
fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

/// Fingerprints one regular file.
///
/// The file size is captured once, at construction. Every digest opens its
/// own handle, so nothing is held open between calls.
#[derive(Debug, Clone)]
pub struct FileFingerprinter {
    path: PathBuf,
    size: u64,
    cfg: FingerprintConfig,
}

impl FileFingerprinter {
    /// Fails with `NotFound` right away if `path` is not a regular file.
    pub fn open(path: impl AsRef<Path>, cfg: &FingerprintConfig) -> DesignProofResult<Self> {
        validate_fingerprint_config(cfg)?;
        let path = path.as_ref();
        let meta = require_regular_file(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            size: meta.len(),
            cfg: cfg.clone(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn full_digest(&self) -> DesignProofResult<String> {
        hash_file_hex(&self.path, crate::defaults::HASH_BUFFER_SIZE)
    }

    /// SHA-256 over `head || tail`.
    ///
    /// When the file is no larger than `chunk_size` the head already covers
    /// it and the tail is empty, so the result is the digest of the content.
    pub fn head_tail_digest(&self, chunk_size: usize) -> DesignProofResult<Option<String>> {
        if self.size == 0 {
            return Ok(None);
        }

        let mut f = self.open_file()?;
        let mut combined = read_up_to(&mut f, chunk_size).map_err(|e| self.read_err(e))?;

        let chunk = chunk_size as u64;
        if self.size > chunk {
            f.seek(SeekFrom::Start(self.size.saturating_sub(chunk)))
                .map_err(|e| self.read_err(e))?;
            let tail = read_up_to(&mut f, chunk_size).map_err(|e| self.read_err(e))?;
            combined.extend_from_slice(&tail);
        }

        Ok(Some(hash_bytes_hex(&combined)))
    }

    /// One SHA-256 fed, in ascending position order, with up to `chunk_size`
    /// bytes read at each of `segments` evenly spaced positions.
    ///
    /// `step = max(size / segments, 1)`. Positions at or past the end of the
    /// file end the sampling; they are not padded.
    pub fn segmented_digest(
        &self,
        segments: u64,
        chunk_size: usize,
    ) -> DesignProofResult<Option<String>> {
        if segments == 0 {
            return Err(DesignProofError::invalid_argument(
                "segments must be greater than zero",
            ));
        }
        if self.size == 0 {
            return Ok(None);
        }

        let step = (self.size / segments).max(1);
        let mut h = Sha256::new();
        let mut f = self.open_file()?;

        for i in 0..segments {
            let position = i * step;
            if position >= self.size {
                break;
            }
            f.seek(SeekFrom::Start(position))
                .map_err(|e| self.read_err(e))?;
            let chunk = read_up_to(&mut f, chunk_size).map_err(|e| self.read_err(e))?;
            h.update(&chunk);
        }

        Ok(Some(hex::encode(h.finalize())))
    }

    pub fn structural_info(&self) -> StructuralInfo {
        StructuralInfo::from_size(self.size)
    }

    /// Compute full, head/tail, segmented and structural, in that order, using
    /// the configured parameters. Any failure aborts the whole fingerprint.
    pub fn generate(&self, clock: &dyn Clock) -> DesignProofResult<FingerprintResult> {
        let generated_at = clock.now_utc();
        let full_digest = self.full_digest()?;
        let head_tail_digest = self.head_tail_digest(self.cfg.head_tail_chunk)?;
        let segmented_digest =
            self.segmented_digest(self.cfg.segments, self.cfg.segment_chunk)?;
        let structural = self.structural_info();

        debug!(
            path = %self.path.display(),
            size = self.size,
            full = %full_digest,
            "fingerprint generated"
        );

        Ok(FingerprintResult {
            generated_at,
            full_digest,
            head_tail_digest,
            segmented_digest,
            structural,
        })
    }

    fn open_file(&self) -> DesignProofResult<File> {
        File::open(&self.path).map_err(|e| {
            DesignProofError::io(format!("failed to open {}", self.path.display()), e)
        })
    }

    fn read_err(&self, e: io::Error) -> DesignProofError {
        DesignProofError::io(format!("failed to read {}", self.path.display()), e)
    }
}

fn read_up_to(f: &mut File, n: usize) -> io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(n);
    f.by_ref().take(n as u64).read_to_end(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::determinism::hashing::EMPTY_SHA256_HEX;

    fn fixture(bytes: &[u8]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("part.stp");
        std::fs::write(&p, bytes).unwrap();
        (dir, p)
    }

    #[test]
    fn empty_file_has_no_sampled_digests() {
        let (_dir, p) = fixture(b"");
        let fp = FileFingerprinter::open(&p, &FingerprintConfig::default()).unwrap();
        let out = fp.generate(&FixedClock(OffsetDateTime::UNIX_EPOCH)).unwrap();
        assert_eq!(out.full_digest, EMPTY_SHA256_HEX);
        assert_eq!(out.head_tail_digest, None);
        assert_eq!(out.segmented_digest, None);
        assert_eq!(out.structural.size_bytes, 0);
    }

    #[test]
    fn small_file_head_tail_is_content_digest() {
        let (_dir, p) = fixture(b"ISO-10303-21;");
        let fp = FileFingerprinter::open(&p, &FingerprintConfig::default()).unwrap();
        assert_eq!(
            fp.head_tail_digest(2048).unwrap().unwrap(),
            hash_bytes_hex(b"ISO-10303-21;")
        );
        // size == chunk is still the no-tail branch
        assert_eq!(
            fp.head_tail_digest(13).unwrap().unwrap(),
            hash_bytes_hex(b"ISO-10303-21;")
        );
    }

    #[test]
    fn head_tail_concatenates_ends() {
        let data: Vec<u8> = (0..100u8).collect();
        let (_dir, p) = fixture(&data);
        let fp = FileFingerprinter::open(&p, &FingerprintConfig::default()).unwrap();

        let mut expected = data[..10].to_vec();
        expected.extend_from_slice(&data[90..]);
        assert_eq!(
            fp.head_tail_digest(10).unwrap().unwrap(),
            hash_bytes_hex(&expected)
        );
    }

    #[test]
    fn segmented_stops_past_end() {
        // size 3, 5 segments: step 1, positions 0,1,2 then stop.
        let (_dir, p) = fixture(b"xyz");
        let fp = FileFingerprinter::open(&p, &FingerprintConfig::default()).unwrap();
        let expected = hash_bytes_hex(b"xyzyzz");
        assert_eq!(fp.segmented_digest(5, 1024).unwrap().unwrap(), expected);
    }

    #[test]
    fn zero_segments_rejected() {
        let (_dir, p) = fixture(b"abc");
        let fp = FileFingerprinter::open(&p, &FingerprintConfig::default()).unwrap();
        assert!(fp.segmented_digest(0, 1024).is_err());
    }

    #[test]
    fn structural_rounding() {
        let s = StructuralInfo::from_size(1536);
        assert_eq!(s.size_kb, 1.5);
        assert_eq!(s.size_mb, 0.0);

        let s = StructuralInfo::from_size(3 * 1024 * 1024 + 1024 * 1024 / 3);
        assert_eq!(s.size_mb, 3.33);
    }

    #[test]
    fn structural_halves_round_to_even() {
        assert_eq!(StructuralInfo::from_size(128).size_kb, 0.12);
        assert_eq!(StructuralInfo::from_size(640).size_kb, 0.62);
        assert_eq!(StructuralInfo::from_size(384).size_kb, 0.38);
        assert_eq!(StructuralInfo::from_size(1024 * 1024 * 5 / 8).size_mb, 0.62);
    }

    #[test]
    fn open_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileFingerprinter::open(dir.path(), &FingerprintConfig::default()).unwrap_err();
        assert_eq!(err.code(), "not_found");
    }
}
