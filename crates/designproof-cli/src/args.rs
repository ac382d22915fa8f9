use std::path::PathBuf;

use clap::Parser;
use designproof_core::defaults;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "designproof",
    version,
    about = "Issue a provenance certificate for a CAD/BIM design file"
)]
pub struct Cli {
    /// Design file to certify.
    pub file: PathBuf,

    /// Emit JSON output on stdout.
    #[arg(long)]
    pub json: bool,

    /// Directory certificates are written to.
    #[arg(long, default_value = designproof_store::DEFAULT_ROOT)]
    pub out_dir: PathBuf,

    /// Issuer recorded on the certificate.
    #[arg(long, default_value = defaults::ISSUER)]
    pub issuer: String,

    /// Bytes taken from each end of the file for the head/tail digest.
    #[arg(long, default_value_t = defaults::HEAD_TAIL_CHUNK)]
    pub head_tail_chunk: usize,

    /// Number of samples for the segmented digest.
    #[arg(long, default_value_t = defaults::SEGMENTS)]
    pub segments: u64,

    /// Bytes read per sample for the segmented digest.
    #[arg(long, default_value_t = defaults::SEGMENT_CHUNK)]
    pub segment_chunk: usize,

    /// Debug logging on stderr (overrides RUST_LOG).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn core_config(&self) -> designproof_core::config::CoreConfig {
        let mut cfg = designproof_core::config::CoreConfig::default();
        cfg.fingerprint.head_tail_chunk = self.head_tail_chunk;
        cfg.fingerprint.segments = self.segments;
        cfg.fingerprint.segment_chunk = self.segment_chunk;
        cfg.issuer.name = self.issuer.clone();
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_core() {
        let cli = Cli::try_parse_from(["designproof", "part.dxf"]).unwrap();
        assert_eq!(cli.out_dir, PathBuf::from("certificates"));
        let cfg = cli.core_config();
        assert_eq!(cfg.fingerprint, Default::default());
        assert_eq!(cfg.issuer.name, defaults::ISSUER);
    }

    #[test]
    fn exactly_one_file() {
        assert!(Cli::try_parse_from(["designproof"]).is_err());
        assert!(Cli::try_parse_from(["designproof", "a.dxf", "b.dxf"]).is_err());
    }

    #[test]
    fn overrides_flow_into_config() {
        let cli = Cli::try_parse_from([
            "designproof",
            "--segments",
            "8",
            "--head-tail-chunk",
            "1024",
            "--issuer",
            "QA",
            "part.ifc",
        ])
        .unwrap();
        let cfg = cli.core_config();
        assert_eq!(cfg.fingerprint.segments, 8);
        assert_eq!(cfg.fingerprint.head_tail_chunk, 1024);
        assert_eq!(cfg.issuer.name, "QA");
    }
}
