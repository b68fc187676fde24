// src/utils/crypto.rs
//! Digest helpers for the commitment-hash cross-check.

use ring::digest::{digest, SHA256};

/// Computes the SHA-256 digest of the input data.
pub fn sha256(data: &[u8]) -> Vec<u8> {
    digest(&SHA256, data).as_ref().to_vec()
}

/// Computes the SHA-256 digest of the input data as a lowercase hex string,
/// the form commitment hashes take inside identifier strings.
pub fn sha256_hex(data: &[u8]) -> String {
    digest(&SHA256, data)
        .as_ref()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}
