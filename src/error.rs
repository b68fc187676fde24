// src/error.rs
//! Typed errors for the long-form identifier decode pipeline.
//!
//! Only failures of the *top-level* structure surface here: a bad scheme
//! prefix, a missing encoded-state segment, an undecodable base64url payload,
//! or a buffer that ends while the outermost message is being read. Problems
//! inside nested sub-messages are recovered locally by the decoders and only
//! reduce the number of keys yielded; they never become errors.

use thiserror::Error;

use crate::wire::WireError;

/// Errors returned by the long-form identifier parser.
///
/// The input arrives embedded in an externally supplied identifier string,
/// so every failure is a value; nothing here panics.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The identifier does not start with the expected scheme prefix.
    #[error("identifier does not start with the expected scheme prefix")]
    InvalidScheme,

    /// The identifier carries no encoded-state segment after the commitment
    /// hash, i.e. it is a short-form identifier.
    #[error("identifier has no encoded-state segment after the commitment hash")]
    NotLongForm,

    /// The encoded-state segment is not valid base64url.
    #[error("encoded state is not valid base64url: {0}")]
    MalformedEncoding(#[from] base64::DecodeError),

    /// A reader ran past the available bytes while decoding a required
    /// top-level field.
    #[error("state buffer ended while decoding a required field")]
    TruncatedBuffer,
}

impl From<WireError> for DecodeError {
    /// Both wire failures mean the same thing to a caller: the outermost
    /// message could not be read to completion. The finer distinction is
    /// kept in debug logs.
    fn from(_: WireError) -> Self {
        DecodeError::TruncatedBuffer
    }
}
