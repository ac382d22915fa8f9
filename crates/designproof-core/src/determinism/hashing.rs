//! Deterministic SHA-256 hashing utilities.
//!
//! All digests produced by designproof are SHA-256, rendered as lowercase hex.
//! File digests are streamed through a fixed-size buffer; a file is never
//! loaded whole just to hash it.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::errors::{require_regular_file, DesignProofError, DesignProofResult};

/// SHA-256 of the empty byte string.
pub const EMPTY_SHA256_HEX: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Hash raw bytes and return lowercase hex string.
pub fn hash_bytes_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Hash everything `reader` yields, reading `buffer_size` bytes at a time.
pub fn hash_reader_hex<R: Read>(mut reader: R, buffer_size: usize) -> io::Result<String> {
    let mut h = Sha256::new();
    let mut buf = vec![0u8; buffer_size.max(1)];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        h.update(&buf[..n]);
    }
    Ok(hex::encode(h.finalize()))
}

/// Stream a regular file through SHA-256.
///
/// Fails with `NotFound` when `path` is missing or not a regular file.
pub fn hash_file_hex(path: &Path, buffer_size: usize) -> DesignProofResult<String> {
    require_regular_file(path)?;
    let file = File::open(path)
        .map_err(|e| DesignProofError::io(format!("failed to open {}", path.display()), e))?;
    hash_reader_hex(file, buffer_size)
        .map_err(|e| DesignProofError::io(format!("failed to read {}", path.display()), e))
}
