//! Fingerprint properties checked against a direct, in-memory replication of
//! each sampling rule.

use std::path::PathBuf;

use designproof_core::config::FingerprintConfig;
use designproof_core::determinism::hashing::{hash_bytes_hex, EMPTY_SHA256_HEX};
use designproof_core::fingerprint::FileFingerprinter;
use designproof_core::hash::ContentHasher;
use sha2::{Digest, Sha256};

fn write_fixture(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let p = dir.path().join(name);
    std::fs::write(&p, bytes).unwrap();
    p
}

/// Deterministic pseudo-random bytes (xorshift), so failures are reproducible.
fn synthetic(len: usize, seed: u64) -> Vec<u8> {
    let mut x = seed;
    (0..len)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            (x & 0xFF) as u8
        })
        .collect()
}

fn replicate_segmented(data: &[u8], segments: usize, chunk: usize) -> String {
    let size = data.len();
    let step = (size / segments).max(1);
    let mut h = Sha256::new();
    for i in 0..segments {
        let pos = i * step;
        if pos >= size {
            break;
        }
        let end = (pos + chunk).min(size);
        h.update(&data[pos..end]);
    }
    hex::encode(h.finalize())
}

fn replicate_head_tail(data: &[u8], chunk: usize) -> String {
    let head = &data[..chunk.min(data.len())];
    let mut combined = head.to_vec();
    if data.len() > chunk {
        combined.extend_from_slice(&data[data.len() - chunk..]);
    }
    hash_bytes_hex(&combined)
}

#[test]
fn segmented_matches_replication_small_and_large() {
    let dir = tempfile::tempdir().unwrap();
    for (name, len) in [("small.dwg", 3000usize), ("large.dwg", 1024 * 1024)] {
        let data = synthetic(len, 0x9E37_79B9_7F4A_7C15);
        let p = write_fixture(&dir, name, &data);
        let fp = FileFingerprinter::open(&p, &FingerprintConfig::default()).unwrap();

        assert_eq!(
            fp.segmented_digest(5, 1024).unwrap().unwrap(),
            replicate_segmented(&data, 5, 1024),
            "segmented digest mismatch for {name}"
        );
    }
}

#[test]
fn segmented_early_stop_on_tiny_file() {
    let dir = tempfile::tempdir().unwrap();
    let data = b"ab".to_vec();
    let p = write_fixture(&dir, "tiny.bin", &data);
    let fp = FileFingerprinter::open(&p, &FingerprintConfig::default()).unwrap();
    // step 1: positions 0 and 1 are sampled, 2..4 are past the end.
    assert_eq!(
        fp.segmented_digest(5, 1024).unwrap().unwrap(),
        hash_bytes_hex(b"abb")
    );
    assert_eq!(
        fp.segmented_digest(5, 1024).unwrap().unwrap(),
        replicate_segmented(&data, 5, 1024)
    );
}

#[test]
fn head_tail_matches_replication_around_boundary() {
    let dir = tempfile::tempdir().unwrap();
    for len in [1usize, 2047, 2048, 2049, 4096, 10_000] {
        let data = synthetic(len, len as u64 + 1);
        let p = write_fixture(&dir, &format!("ht_{len}.igs"), &data);
        let fp = FileFingerprinter::open(&p, &FingerprintConfig::default()).unwrap();
        assert_eq!(
            fp.head_tail_digest(2048).unwrap().unwrap(),
            replicate_head_tail(&data, 2048),
            "head/tail mismatch at len {len}"
        );
    }
}

#[test]
fn head_tail_of_small_file_is_plain_content_digest() {
    let dir = tempfile::tempdir().unwrap();
    let data = synthetic(700, 7);
    let p = write_fixture(&dir, "small.sldprt", &data);
    let fp = FileFingerprinter::open(&p, &FingerprintConfig::default()).unwrap();
    assert_eq!(fp.head_tail_digest(1024).unwrap().unwrap(), hash_bytes_hex(&data));
}

#[test]
fn empty_file_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let p = write_fixture(&dir, "empty.dxf", b"");
    let fp = FileFingerprinter::open(&p, &FingerprintConfig::default()).unwrap();
    let out = fp.generate(&designproof_core::clock::SystemClock).unwrap();

    assert_eq!(out.full_digest, EMPTY_SHA256_HEX);
    assert!(out.head_tail_digest.is_none());
    assert!(out.segmented_digest.is_none());

    let v = serde_json::to_value(&out).unwrap();
    assert!(v["head_tail_sha256"].is_null());
    assert!(v["segmented_sha256"].is_null());
    assert_eq!(v["full_sha256"], EMPTY_SHA256_HEX);

    assert_eq!(ContentHasher::default().raw_digest(&p).unwrap(), EMPTY_SHA256_HEX);
}

#[test]
fn full_digest_matches_raw_digest() {
    let dir = tempfile::tempdir().unwrap();
    let data = synthetic(50_000, 42);
    let p = write_fixture(&dir, "part.skp", &data);
    let fp = FileFingerprinter::open(&p, &FingerprintConfig::default()).unwrap();
    assert_eq!(
        fp.full_digest().unwrap(),
        ContentHasher::default().raw_digest(&p).unwrap()
    );
}

#[test]
fn generate_is_reproducible_apart_from_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let p = write_fixture(&dir, "rvt.rvt", &synthetic(12_345, 3));
    let fp = FileFingerprinter::open(&p, &FingerprintConfig::default()).unwrap();
    let a = fp.generate(&designproof_core::clock::SystemClock).unwrap();
    let b = fp.generate(&designproof_core::clock::SystemClock).unwrap();
    assert!(a.same_identity(&b));
    assert_eq!(a.structural.size_bytes, 12_345);
    assert_eq!(a.structural.size_kb, 12.06);
    assert_eq!(a.structural.size_mb, 0.01);
}
