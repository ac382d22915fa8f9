//! Deterministic building blocks: SHA-256 helpers and text normalization.
//!
//! Nothing in here knows about certificates. Higher layers compose these into
//! content hashes and fingerprints.

pub mod hashing;
pub mod normalize_text;
