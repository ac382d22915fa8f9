//! Filesystem-backed certificate store.

use std::fs;
use std::path::{Path, PathBuf};

use designproof_core::certificate::Certificate;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::{CERTIFICATE_SUFFIX, DEFAULT_ROOT};

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub root: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
        }
    }
}

impl StoreConfig {
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[derive(Debug, Clone)]
pub struct CertificateStore {
    root: PathBuf,
}

impl CertificateStore {
    /// Does not touch the filesystem; the root is created on first save.
    pub fn open(cfg: StoreConfig) -> Self {
        Self { root: cfg.root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, id: &Uuid) -> PathBuf {
        self.root
            .join(format!("{}{CERTIFICATE_SUFFIX}", id.hyphenated()))
    }

    /// Write `cert` and return the path written.
    pub fn save(&self, cert: &Certificate) -> StoreResult<PathBuf> {
        fs::create_dir_all(&self.root).map_err(|source| StoreError::CreateDir {
            path: self.root.clone(),
            source,
        })?;

        let bytes = to_json_4space(cert)?;
        let path = self.path_for(&cert.certificate_id);
        fs::write(&path, &bytes).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })?;

        debug!(id = %cert.certificate_id, path = %path.display(), bytes = bytes.len(), "certificate written");
        Ok(path)
    }

    /// Read back a certificate previously saved under `id`.
    pub fn load(&self, id: &Uuid) -> StoreResult<Certificate> {
        let path = self.path_for(id);
        let raw = fs::read(&path).map_err(|source| StoreError::Read {
            path: path.clone(),
            source,
        })?;
        serde_json::from_slice(&raw).map_err(|source| StoreError::Deserialize { path, source })
    }
}

fn to_json_4space<T: Serialize>(value: &T) -> StoreResult<Vec<u8>> {
    let mut out = Vec::new();
    let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, fmt);
    value.serialize(&mut ser).map_err(StoreError::Serialize)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_embeds_id() {
        let store = CertificateStore::open(StoreConfig::at("out"));
        let id = Uuid::nil();
        assert_eq!(
            store.path_for(&id),
            Path::new("out").join("00000000-0000-0000-0000-000000000000.certificate.json")
        );
    }

    #[test]
    fn default_root() {
        let store = CertificateStore::open(StoreConfig::default());
        assert_eq!(store.root(), Path::new("certificates"));
    }

    #[test]
    fn four_space_indent() {
        let bytes = to_json_4space(&serde_json::json!({"a": {"b": 1}})).unwrap();
        let s = String::from_utf8(bytes).unwrap();
        assert_eq!(s, "{\n    \"a\": {\n        \"b\": 1\n    }\n}");
    }

    #[test]
    fn load_missing_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = CertificateStore::open(StoreConfig::at(dir.path()));
        assert!(matches!(
            store.load(&Uuid::nil()),
            Err(StoreError::Read { .. })
        ));
    }
}
