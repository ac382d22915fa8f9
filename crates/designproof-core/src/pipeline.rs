//! Certificate issuance pipeline.
//!
//! One file runs start to finish through:
//! existence check -> format advisory -> content hash -> fingerprint ->
//! metadata -> assembly.
//!
//! Persistence is left to the caller (see `designproof-store`). There is no
//! partial result: the first failing step aborts the run.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::certificate::{Certificate, CertificateAssembler};
use crate::clock::{Clock, IdGenerator, RandomIds, SystemClock};
use crate::config::{validate_config, CoreConfig};
use crate::errors::{require_regular_file, DesignProofResult};
use crate::fingerprint::FileFingerprinter;
use crate::format::CadFormat;
use crate::hash::ContentHasher;
use crate::metadata::MetadataCollector;

pub struct Pipeline {
    cfg: CoreConfig,
    clock: Arc<dyn Clock>,
    hasher: ContentHasher,
    assembler: CertificateAssembler,
}

impl Pipeline {
    /// Fails with `InvalidArgument` if `cfg` does not validate.
    pub fn new(
        cfg: CoreConfig,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> DesignProofResult<Self> {
        validate_config(&cfg)?;
        Ok(Self {
            hasher: ContentHasher::new(&cfg.hashing),
            assembler: CertificateAssembler::new(clock.clone(), ids),
            clock,
            cfg,
        })
    }

    /// System clock and random v4 ids.
    pub fn with_config(cfg: CoreConfig) -> DesignProofResult<Self> {
        Self::new(cfg, Arc::new(SystemClock), Arc::new(RandomIds))
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    pub fn issue(&self, path: &Path) -> DesignProofResult<Certificate> {
        require_regular_file(path)?;

        if let Err(e) = CadFormat::require(path) {
            warn!(path = %path.display(), code = e.code(), "{e}; continuing with generic handling");
        }

        let hash = self.hasher.hash_file(path)?;

        let fingerprint =
            FileFingerprinter::open(path, &self.cfg.fingerprint)?.generate(self.clock.as_ref())?;

        let metadata = MetadataCollector::new(path, &self.cfg.metadata)
            .collect()?
            .to_value()?;

        let cert = self.assembler.assemble(
            path,
            hash,
            fingerprint,
            metadata,
            &self.cfg.issuer.name,
        )?;
        debug!(id = %cert.certificate_id, path = %path.display(), "certificate assembled");
        Ok(cert)
    }
}
