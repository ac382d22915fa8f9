//! Certificate records and their assembly.
//!
//! A certificate is a provenance record: "this exact file existed at this time
//! with this content". It carries no signature. Each assembly mints a fresh
//! id, so issuing twice for an unchanged file yields two certificates with
//! different ids and identical hash and fingerprint payloads.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use path_clean::PathClean;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::clock::{Clock, IdGenerator, RandomIds, SystemClock};
use crate::errors::{require_regular_file, DesignProofError, DesignProofResult};
use crate::fingerprint::FingerprintResult;
use crate::format::dotted_extension;
use crate::hash::HashResult;

/// An issued certificate. Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub certificate_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub issued_at: OffsetDateTime,
    pub issuer: String,
    pub file_info: FileInfo,
    pub hash: HashResult,
    pub fingerprint: FingerprintResult,
    /// Passed through untouched.
    pub metadata: serde_json::Value,
}

/// File facts captured at assembly time. These can disagree with the hash and
/// metadata payloads if the file changed between pipeline steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub filename: String,
    pub extension: String,
    pub size_bytes: u64,
    pub absolute_path: PathBuf,
}

impl FileInfo {
    pub fn capture(path: &Path) -> DesignProofResult<Self> {
        let meta = require_regular_file(path)?;
        Ok(Self {
            filename: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            extension: dotted_extension(path),
            size_bytes: meta.len(),
            absolute_path: absolute(path)?,
        })
    }
}

/// Lexically absolute; symlinks are left as they are.
fn absolute(path: &Path) -> DesignProofResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.clean());
    }
    let cwd = std::env::current_dir()
        .map_err(|e| DesignProofError::io("failed to read current directory", e))?;
    Ok(cwd.join(path).clean())
}

pub struct CertificateAssembler {
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl Default for CertificateAssembler {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(RandomIds))
    }
}

impl CertificateAssembler {
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// Build a certificate for `path` from already computed payloads.
    ///
    /// `path` is checked again here, independently of whatever the caller
    /// did before; a missing file is `NotFound`.
    pub fn assemble(
        &self,
        path: &Path,
        hash: HashResult,
        fingerprint: FingerprintResult,
        metadata: serde_json::Value,
        issuer: &str,
    ) -> DesignProofResult<Certificate> {
        let file_info = FileInfo::capture(path)?;
        Ok(Certificate {
            certificate_id: self.ids.next_id(),
            issued_at: self.clock.now_utc(),
            issuer: issuer.to_string(),
            file_info,
            hash,
            fingerprint,
            metadata,
        })
    }
}
