// src/utils/base64url.rs
//! URL-safe base64 codec with padding normalization.
//!
//! Long-form identifiers carry their state in the URL-safe alphabet without
//! padding. This module converts between that representation and the
//! standard alphabet the `base64` crate decodes: encoding substitutes
//! `+` → `-`, `/` → `_` and strips `=`; decoding performs the inverse
//! substitution and re-pads to a multiple of 4 first.

use crate::error::DecodeError;

/// Encodes bytes to unpadded, URL-safe base64.
pub fn encode(data: &[u8]) -> String {
    base64::encode(data)
        .replace('+', "-")
        .replace('/', "_")
        .trim_end_matches('=')
        .to_string()
}

/// Decodes an unpadded, URL-safe base64 string.
///
/// # Arguments
/// * `encoded` - URL-safe base64 text, with or without `=` padding
///
/// # Returns
/// - `Ok(Vec<u8>)` with the decoded bytes
/// - `Err(DecodeError::MalformedEncoding)` if the re-padded string is not a
///   multiple of 4 in length or contains characters outside the alphabet
pub fn decode(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    let mut standard = encoded.replace('-', "+").replace('_', "/");
    while standard.len() % 4 != 0 {
        standard.push('=');
    }
    Ok(base64::decode(&standard)?)
}
