// src/wire/walker.rs
//! Tagged-field walker: the generic cursor every message decoder is built
//! on.
//!
//! For each field the walker reads a tag varint, splits it into field number
//! and wire type, decodes the payload for the two supported wire types, and
//! hands the result to the caller. Varint fields are always decoded, even
//! when the caller ignores them, so the cursor advances correctly past
//! fields this decoder does not understand. Any other wire type ends the
//! walk for the current message scope without an error; whatever fields were
//! dispatched before that point remain valid.

use super::field::{
    read_length_delimited, WireField, WireValue, WIRE_TYPE_LENGTH_DELIMITED, WIRE_TYPE_VARINT,
};
use super::varint::read_varint;
use super::WireError;

/// Walks every field in `scope`, dispatching each to `handler`.
///
/// # Errors
/// Returns [`WireError`] when the scope ends mid-field. Callers decode
/// nested sub-messages with [`walk_fields_lenient`] instead, which swallows
/// that condition so a malformed sub-message never aborts its siblings; the
/// fallible form is for the outermost scope, where truncation must surface.
pub fn walk_fields<'a, F>(scope: &'a [u8], mut handler: F) -> Result<(), WireError>
where
    F: FnMut(WireField<'a>),
{
    let mut offset = 0usize;

    while offset < scope.len() {
        let (tag, tag_len) = read_varint(scope, offset)?;
        offset += tag_len;

        let number = tag >> 3;
        match tag & 0x7 {
            WIRE_TYPE_VARINT => {
                let (value, consumed) = read_varint(scope, offset)?;
                offset += consumed;
                handler(WireField {
                    number,
                    value: WireValue::Varint(value),
                });
            }
            WIRE_TYPE_LENGTH_DELIMITED => {
                let (payload, consumed) = read_length_delimited(scope, offset)?;
                offset += consumed;
                handler(WireField {
                    number,
                    value: WireValue::LengthDelimited(payload),
                });
            }
            other => {
                log::debug!(
                    "field {} uses unsupported wire type {}; stopping this message walk",
                    number,
                    other
                );
                return Ok(());
            }
        }
    }

    Ok(())
}

/// [`walk_fields`], but truncation is logged and swallowed.
///
/// Used for every nested message scope: the partial set of fields dispatched
/// before the error is all that scope yields.
pub fn walk_fields_lenient<'a, F>(scope: &'a [u8], handler: F)
where
    F: FnMut(WireField<'a>),
{
    if let Err(err) = walk_fields(scope, handler) {
        log::debug!("nested message walk ended early: {}", err);
    }
}
