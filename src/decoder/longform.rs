// src/decoder/longform.rs
//! Long-form identifier decomposition and the commitment-hash cross-check.
//!
//! A long-form identifier is self-contained: after the scheme prefix it
//! carries a commitment hash and, separated by a colon, the base64url
//! encoding of its own creation state. Decomposition recovers that state,
//! recomputes its SHA-256 digest, and cross-checks the claimed hash before
//! handing the bytes to the message decoders.
//!
//! A hash mismatch is logged and tolerated rather than rejected: some
//! identifiers in circulation commit to their state under a different hash
//! convention, and refusing them would lose otherwise-decodable keys. The
//! [`ParsedIdentifier::hash_verified`] flag exposes the anomaly to callers.

use crate::decoder::state::decode_operation_envelope;
use crate::error::DecodeError;
use crate::models::identifier::ParsedIdentifier;
use crate::utils::{base64url, crypto};

/// Scheme prefix every identifier handled by this decoder must carry.
pub const LONG_FORM_SCHEME: &str = "did:prism:";

/// Parses a long-form identifier string into its embedded keys.
///
/// # Arguments
/// * `did` - the full identifier,
///   `did:prism:<commitment-hash>:<base64url-state>`
///
/// # Returns
/// - `Ok(ParsedIdentifier)` with every complete key found in the state
/// - `Err(DecodeError)` when the top-level structure is unusable; nested
///   decode problems only reduce the number of keys
pub fn parse_long_form(did: &str) -> Result<ParsedIdentifier, DecodeError> {
    parse_long_form_with_observer(did, &mut |_| {})
}

/// [`parse_long_form`] with a diagnostic hook.
///
/// `observer` is invoked with the field number of every wire field the
/// decoders dispatch, at every nesting level, in decode order. Embedding
/// applications use it for operational visibility; it has no effect on the
/// decode itself.
pub fn parse_long_form_with_observer(
    did: &str,
    observer: &mut dyn FnMut(u64),
) -> Result<ParsedIdentifier, DecodeError> {
    let method_specific = did
        .strip_prefix(LONG_FORM_SCHEME)
        .ok_or(DecodeError::InvalidScheme)?;

    // First segment is the claimed hash; everything after the first colon is
    // the encoded state, which may itself contain colons.
    let (claimed_hash, encoded_state) = method_specific
        .split_once(':')
        .ok_or(DecodeError::NotLongForm)?;

    let state = base64url::decode(encoded_state)?;

    let recomputed = crypto::sha256_hex(&state);
    let hash_verified = recomputed == claimed_hash;
    if !hash_verified {
        log::warn!(
            "commitment hash {} does not match the recomputed state digest {}; \
             continuing with the embedded state",
            claimed_hash,
            recomputed
        );
    }

    let keys = decode_operation_envelope(&state, observer)?;

    Ok(ParsedIdentifier {
        identifier: did.to_string(),
        claimed_hash: claimed_hash.to_string(),
        hash_verified,
        keys,
    })
}
