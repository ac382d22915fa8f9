use std::time::Duration;

use anyhow::{Context, Result};
use designproof_core::pipeline::Pipeline;
use designproof_store::{CertificateStore, StoreConfig};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::args::Cli;
use crate::output;

#[derive(Debug, Serialize)]
pub struct IssueOut {
    pub certificate_id: String,
    pub certificate_file: String,
    pub raw_sha256: String,
}

pub fn run(cli: &Cli) -> Result<()> {
    let pipeline = Pipeline::with_config(cli.core_config()).context("invalid configuration")?;
    let store = CertificateStore::open(StoreConfig::at(&cli.out_dir));

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(80));

    pb.set_message(format!("certifying {}", cli.file.display()));
    let issued = pipeline.issue(&cli.file);
    let cert = match issued {
        Ok(c) => c,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e).with_context(|| format!("processing {}", cli.file.display()));
        }
    };

    pb.set_message("writing certificate");
    let saved = store.save(&cert);
    pb.finish_and_clear();
    let path = saved.context("saving certificate")?;

    let out = IssueOut {
        certificate_id: cert.certificate_id.to_string(),
        certificate_file: path.display().to_string(),
        raw_sha256: cert.hash.raw_digest.clone(),
    };

    if output::is_json() {
        return output::print_json(&out);
    }
    output::print_block(
        "CERTIFICATE ISSUED",
        &[
            ("Certificate ID", out.certificate_id),
            ("Certificate File", out.certificate_file),
            ("Raw SHA256", out.raw_sha256),
        ],
    )
}
