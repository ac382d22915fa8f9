//! designproof-core
//!
//! Core primitives for DesignProof:
//! - Raw and whitespace-normalized SHA-256 digests of CAD/BIM files
//! - Structural fingerprints (full, head/tail, segmented sampling)
//! - Shallow filesystem and header metadata probes
//! - Certificate records and their assembly
//!
//! Persistence lives in `designproof-store`; the command line in
//! `designproof-cli`.

pub mod certificate;
pub mod clock;
pub mod config;
pub mod determinism;
pub mod errors;
pub mod fingerprint;
pub mod format;
pub mod hash;
pub mod metadata;
pub mod pipeline;

pub use crate::errors::{DesignProofError, DesignProofResult};

/// Default parameters.
pub mod defaults {
    /// Streaming read buffer for full-file digests.
    pub const HASH_BUFFER_SIZE: usize = 8192;
    /// Head/tail window for the fingerprinter.
    pub const HEAD_TAIL_CHUNK: usize = 2048;
    /// Sample count for the segmented digest.
    pub const SEGMENTS: u64 = 5;
    /// Bytes read per sample for the segmented digest.
    pub const SEGMENT_CHUNK: usize = 1024;
    /// Issuer stamped on certificates by the command line tool.
    pub const ISSUER: &str = "DesignProof-ID CLI";
}

/// Convenience re-exports.
pub mod prelude {
    pub use crate::certificate::{Certificate, CertificateAssembler, FileInfo};
    pub use crate::clock::{Clock, FixedClock, IdGenerator, RandomIds, SystemClock};
    pub use crate::config::{validate_config, CoreConfig, FingerprintConfig};
    pub use crate::fingerprint::{FileFingerprinter, FingerprintResult, StructuralInfo};
    pub use crate::format::CadFormat;
    pub use crate::hash::{ContentHasher, HashResult};
    pub use crate::metadata::{CadMetadata, MetadataCollector};
    pub use crate::pipeline::Pipeline;
    pub use crate::{DesignProofError, DesignProofResult};
}
