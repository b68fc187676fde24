// src/models/key.rs
//! Public-key data model for decoded identifiers.
//!
//! Defines the closed key-usage enumeration and the record type emitted for
//! every complete public-key entry found inside an identifier's embedded
//! creation state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The purpose assigned to a public key within an identifier document.
///
/// The numeric codes come from the identifier wire format. Codes outside the
/// known set are preserved as [`KeyUsage::Unrecognized`] rather than
/// rejected, so callers can still see (and log) keys tagged by newer
/// revisions of the format.
///
/// # Fields
/// The known variants map one-to-one to wire codes 0 through 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyUsage {
    /// Code 0: the format's explicit "unknown" placeholder
    UnknownKey,
    /// Code 1: controls the identifier itself
    MasterKey,
    /// Code 2: signs issued credentials
    IssuingKey,
    /// Code 3: establishes shared secrets (e.g. X25519)
    KeyAgreementKey,
    /// Code 4: proves control during authentication
    AuthenticationKey,
    /// Code 5: revokes previously published material
    RevocationKey,
    /// Code 6: invokes a capability
    CapabilityInvocationKey,
    /// Code 7: delegates a capability
    CapabilityDelegationKey,
    /// Any wire code outside 0..=7, preserved verbatim
    Unrecognized(u64),
}

impl KeyUsage {
    /// Maps a raw wire code to its usage variant.
    ///
    /// Never fails: out-of-range codes become [`KeyUsage::Unrecognized`].
    pub fn from_code(code: u64) -> Self {
        match code {
            0 => KeyUsage::UnknownKey,
            1 => KeyUsage::MasterKey,
            2 => KeyUsage::IssuingKey,
            3 => KeyUsage::KeyAgreementKey,
            4 => KeyUsage::AuthenticationKey,
            5 => KeyUsage::RevocationKey,
            6 => KeyUsage::CapabilityInvocationKey,
            7 => KeyUsage::CapabilityDelegationKey,
            other => KeyUsage::Unrecognized(other),
        }
    }

    /// Returns the wire code this variant was decoded from.
    pub fn code(&self) -> u64 {
        match self {
            KeyUsage::UnknownKey => 0,
            KeyUsage::MasterKey => 1,
            KeyUsage::IssuingKey => 2,
            KeyUsage::KeyAgreementKey => 3,
            KeyUsage::AuthenticationKey => 4,
            KeyUsage::RevocationKey => 5,
            KeyUsage::CapabilityInvocationKey => 6,
            KeyUsage::CapabilityDelegationKey => 7,
            KeyUsage::Unrecognized(code) => *code,
        }
    }
}

impl fmt::Display for KeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyUsage::UnknownKey => write!(f, "UnknownKey"),
            KeyUsage::MasterKey => write!(f, "MasterKey"),
            KeyUsage::IssuingKey => write!(f, "IssuingKey"),
            KeyUsage::KeyAgreementKey => write!(f, "KeyAgreementKey"),
            KeyUsage::AuthenticationKey => write!(f, "AuthenticationKey"),
            KeyUsage::RevocationKey => write!(f, "RevocationKey"),
            KeyUsage::CapabilityInvocationKey => write!(f, "CapabilityInvocationKey"),
            KeyUsage::CapabilityDelegationKey => write!(f, "CapabilityDelegationKey"),
            KeyUsage::Unrecognized(code) => write!(f, "unrecognized key usage {}", code),
        }
    }
}

/// One public key recovered from an identifier's embedded creation state.
///
/// A record is only ever constructed complete: the decoder drops entries
/// that are missing their id, usage, or key bytes instead of surfacing
/// partial data.
///
/// # Fields
/// - `id`: the key's identifier fragment within the document
/// - `usage`: the decoded [`KeyUsage`]
/// - `curve`: lowercase-normalized curve name (e.g. `"ed25519"`, `"x25519"`),
///   absent when the key-data sub-message named no curve
/// - `public_key`: raw key bytes, owned; interpretation depends on `curve`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    /// Identifier fragment for this key
    /// Example: "auth-1"
    pub id: String,

    /// Intended usage decoded from the wire
    pub usage: KeyUsage,

    /// Curve family, lowercase, when the entry named one
    pub curve: Option<String>,

    /// Raw public key bytes
    /// Example: 32-byte Ed25519 public key
    pub public_key: Vec<u8>,
}

impl KeyRecord {
    /// Case-insensitive curve comparison; `false` when no curve was decoded.
    pub fn matches_curve(&self, curve: &str) -> bool {
        self.curve
            .as_deref()
            .map_or(false, |c| c.eq_ignore_ascii_case(curve))
    }
}
