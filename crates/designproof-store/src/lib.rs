//! designproof-store
//!
//! Durable storage for issued certificates. Each certificate becomes one
//! pretty-printed (4-space) UTF-8 JSON file named
//! `<certificate_id>.certificate.json` under the store root.
//!
//! The store never updates or deletes a certificate. Saving a certificate
//! whose id is already present overwrites the file without complaint; ids are
//! freshly generated per issuance, so this only happens when a caller saves
//! the same record twice.

pub mod error;
pub mod fs;

pub use crate::error::{StoreError, StoreResult};
pub use crate::fs::{CertificateStore, StoreConfig};

/// Suffix appended to the certificate id to form its filename.
pub const CERTIFICATE_SUFFIX: &str = ".certificate.json";

/// Default store root, relative to the working directory.
pub const DEFAULT_ROOT: &str = "certificates";
