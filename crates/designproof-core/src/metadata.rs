//! Filesystem and shallow header metadata.
//!
//! Nothing here parses CAD geometry. Format-specific probes read a bounded
//! prefix of the file and look for well-known header markers. The result is
//! carried into the certificate as an opaque JSON mapping.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::config::MetadataConfig;
use crate::determinism::normalize_text::{decode_text, translate_newlines};
use crate::errors::{DesignProofError, DesignProofResult};
use crate::format::{dotted_extension, CadFormat};

const DETECTED: &str = "Detected";
const NO_PARSER_NOTE: &str = "No specific parser available for this format.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CadMetadata {
    pub filesystem: FilesystemMetadata,
    pub cad_specific: BTreeMap<String, String>,
}

impl CadMetadata {
    /// The opaque form embedded in a certificate.
    pub fn to_value(&self) -> DesignProofResult<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| {
            DesignProofError::serialization(format!("failed to serialize metadata: {e}"))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilesystemMetadata {
    pub filename: String,
    pub extension: String,
    pub size_bytes: u64,
    /// `st_ctime`: inode change time on Unix, creation time elsewhere.
    /// `None` where the platform does not record it.
    #[serde(with = "time::serde::rfc3339::option")]
    pub created_time: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub modified_time: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub accessed_time: Option<OffsetDateTime>,
    pub os_platform: String,
}

pub struct MetadataCollector {
    path: PathBuf,
    format: Option<CadFormat>,
    cfg: MetadataConfig,
}

impl MetadataCollector {
    pub fn new(path: impl AsRef<Path>, cfg: &MetadataConfig) -> Self {
        let path = path.as_ref().to_path_buf();
        let format = CadFormat::from_path(&path);
        Self {
            path,
            format,
            cfg: cfg.clone(),
        }
    }

    /// Stat failures propagate; probe failures are recorded as entries.
    pub fn collect(&self) -> DesignProofResult<CadMetadata> {
        Ok(CadMetadata {
            filesystem: self.filesystem()?,
            cad_specific: self.cad_specific(),
        })
    }

    pub fn filesystem(&self) -> DesignProofResult<FilesystemMetadata> {
        let meta = fs::metadata(&self.path).map_err(|e| {
            DesignProofError::io(format!("failed to stat {}", self.path.display()), e)
        })?;

        Ok(FilesystemMetadata {
            filename: file_name(&self.path),
            extension: dotted_extension(&self.path),
            size_bytes: meta.len(),
            created_time: ctime(&meta),
            modified_time: utc(meta.modified()),
            accessed_time: utc(meta.accessed()),
            os_platform: std::env::consts::OS.to_string(),
        })
    }

    pub fn cad_specific(&self) -> BTreeMap<String, String> {
        match self.format {
            Some(CadFormat::Dxf) => self.dxf(),
            Some(CadFormat::Ifc) => self.ifc(),
            Some(f) if f.is_step_family() => self.step(),
            _ => BTreeMap::from([("note".to_string(), NO_PARSER_NOTE.to_string())]),
        }
    }

    fn dxf(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        match self.read_header(self.cfg.dxf_header_bytes) {
            Ok(header) => {
                let n = self.cfg.value_snippet_chars;
                if let Some(v) = snippet_from(&header, "$ACADVER", n) {
                    out.insert("acad_version".to_string(), v);
                }
                if let Some(v) = snippet_from(&header, "$LASTSAVEDBY", n) {
                    out.insert("last_saved_by".to_string(), v);
                }
            }
            Err(e) => {
                out.insert("dxf_error".to_string(), e.to_string());
            }
        }
        out
    }

    fn ifc(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        match self.read_header(self.cfg.ifc_header_bytes) {
            Ok(header) => {
                mark(&mut out, &header, "FILE_DESCRIPTION", "file_description");
                mark(&mut out, &header, "FILE_NAME", "file_name_section");
                mark(&mut out, &header, "FILE_SCHEMA", "file_schema");
            }
            Err(e) => {
                out.insert("ifc_error".to_string(), e.to_string());
            }
        }
        out
    }

    fn step(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        match self.read_header(self.cfg.step_header_bytes) {
            Ok(header) => {
                mark(&mut out, &header, "FILE_NAME", "file_name_section");
                mark(&mut out, &header, "FILE_SCHEMA", "file_schema");
            }
            Err(e) => {
                out.insert("step_error".to_string(), e.to_string());
            }
        }
        out
    }

    /// First `limit` characters of the file read as text: undecodable bytes
    /// are dropped and CRLF / CR become LF before counting.
    fn read_header(&self, limit: usize) -> DesignProofResult<String> {
        let read_err =
            |e| DesignProofError::io(format!("failed to read {}", self.path.display()), e);
        let mut file = File::open(&self.path).map_err(read_err)?;
        let mut buf = Vec::new();
        let step = limit.saturating_mul(4).max(1) as u64;
        loop {
            let n = file
                .by_ref()
                .take(step)
                .read_to_end(&mut buf)
                .map_err(read_err)?;
            let text = translate_newlines(&decode_text(&buf)?);
            if n == 0 || text.chars().count() >= limit {
                return Ok(text.chars().take(limit).collect());
            }
        }
    }
}

/// Up to `max_chars` characters of `haystack` starting at `key`.
fn snippet_from(haystack: &str, key: &str, max_chars: usize) -> Option<String> {
    let start = haystack.find(key)?;
    Some(haystack[start..].chars().take(max_chars).collect())
}

fn mark(out: &mut BTreeMap<String, String>, header: &str, marker: &str, key: &str) {
    if header.contains(marker) {
        out.insert(key.to_string(), DETECTED.to_string());
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn utc(t: std::io::Result<SystemTime>) -> Option<OffsetDateTime> {
    t.ok().map(OffsetDateTime::from)
}

#[cfg(unix)]
fn ctime(meta: &fs::Metadata) -> Option<OffsetDateTime> {
    use std::os::unix::fs::MetadataExt;

    let nanos = i128::from(meta.ctime()) * 1_000_000_000 + i128::from(meta.ctime_nsec());
    OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()
}

#[cfg(not(unix))]
fn ctime(meta: &fs::Metadata) -> Option<OffsetDateTime> {
    utc(meta.created())
}
