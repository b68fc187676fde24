// src/models/identifier.rs
//! Parsed-identifier data model and key lookup queries.
//!
//! A [`ParsedIdentifier`] is built once per parse call, is read-only after
//! construction, and is discarded after the caller extracts what it needs;
//! there is no persistence or caching behind it.

use serde::{Deserialize, Serialize};

use crate::models::key::{KeyRecord, KeyUsage};

/// The result of decomposing and decoding a long-form identifier.
///
/// # Fields
/// - `identifier`: the full input string, verbatim
/// - `claimed_hash`: the commitment-hash segment as it appeared in the input
/// - `hash_verified`: whether the recomputed digest of the decoded state
///   matched `claimed_hash` (a mismatch is logged, not fatal)
/// - `keys`: every complete public-key entry, in wire order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedIdentifier {
    /// The identifier string this result was decoded from
    pub identifier: String,

    /// Commitment hash claimed by the identifier
    pub claimed_hash: String,

    /// Whether the claimed hash matched the recomputed state digest
    pub hash_verified: bool,

    /// Decoded public keys, in the order they appeared on the wire
    pub keys: Vec<KeyRecord>,
}

impl ParsedIdentifier {
    /// Finds the key matching a requested usage and curve.
    ///
    /// # Matching rules
    /// 1. Exact match on both usage and curve (curve comparison is
    ///    case-insensitive).
    /// 2. Fallback: any key of the requested curve regardless of its usage
    ///    tag, because real-world identifiers sometimes mis-tag the usage
    ///    for otherwise correctly typed keys.
    ///
    /// Returns `None` when neither rule matches.
    pub fn find_key_by_usage_and_curve(&self, usage: KeyUsage, curve: &str) -> Option<&KeyRecord> {
        self.keys
            .iter()
            .find(|key| key.usage == usage && key.matches_curve(curve))
            .or_else(|| self.keys.iter().find(|key| key.matches_curve(curve)))
    }

    /// Returns the full ordered key list, including keys with unrecognized
    /// usage values, for diagnostic consumers.
    pub fn list_all_keys(&self) -> &[KeyRecord] {
        &self.keys
    }
}

/// The authentication/key-agreement pair required before an encrypted
/// content exchange.
///
/// # Fields
/// - `authentication`: the authentication key on the Ed25519 curve, if found
/// - `key_agreement`: the key-agreement key on the X25519 curve, if found
/// - `complete`: `true` only when both keys are present
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitiveKeyPair {
    /// Authentication key (Ed25519), when present
    pub authentication: Option<KeyRecord>,

    /// Key-agreement key (X25519), when present
    pub key_agreement: Option<KeyRecord>,

    /// Whether both keys were found
    pub complete: bool,
}
