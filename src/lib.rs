// src/lib.rs

//! # Long-Form DID Decoder
//!
//! Decodes self-contained ("long-form") decentralized identifier strings and
//! extracts the public keys embedded in them.
//!
//! A long-form identifier carries its own creation state as a suffix:
//!
//! ```text
//! did:prism:<commitment-hash>:<base64url-encoded-state>
//! ```
//!
//! The encoded state is a nested, tagged, length-delimited binary structure.
//! This crate walks it by hand, without a schema compiler, and classifies
//! every complete public key it finds by curve and intended usage.
//!
//! ## Architecture Overview
//! 1. **Wire Layer**: varint and length-delimited readers plus the generic
//!    tagged-field walker
//! 2. **Decoder Layer**: one thin decoder per nested message shape, the
//!    long-form decomposition with its commitment-hash cross-check, and the
//!    key lookup services
//! 3. **Models**: the key-usage enumeration, key records, and the parsed
//!    identifier result
//! 4. **Utilities**: base64url codec and digest helpers
//!
//! ## Failure model
//! The input is attacker-influenced, so nothing here panics: top-level
//! structural problems come back as [`DecodeError`] values, while problems
//! inside nested sub-messages are logged, contained, and only reduce the
//! number of keys yielded.
//!
//! ## Example
//! ```no_run
//! use did_longform::{parse_long_form, KeyUsage};
//!
//! let parsed = parse_long_form("did:prism:9b51...:CtQBCtEB...")?;
//! if let Some(key) = parsed.find_key_by_usage_and_curve(KeyUsage::AuthenticationKey, "ed25519") {
//!     println!("authentication key {} ({} bytes)", key.id, key.public_key.len());
//! }
//! # Ok::<(), did_longform::DecodeError>(())
//! ```

pub mod decoder; // Message decoding, decomposition, key lookup
pub mod error;   // Typed decode errors
pub mod models;  // Data structures
pub mod utils;   // Codec and digest helpers
pub mod wire;    // Low-level binary field readers

pub use decoder::longform::{parse_long_form, parse_long_form_with_observer, LONG_FORM_SCHEME};
pub use decoder::lookup::{extract_key_pair_for_sensitive_operations, log_key_summary};
pub use error::DecodeError;
pub use models::identifier::{ParsedIdentifier, SensitiveKeyPair};
pub use models::key::{KeyRecord, KeyUsage};
