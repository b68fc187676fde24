// src/decoder/state.rs
//! Message-specific decoders for the embedded creation state.
//!
//! The state is a nest of four message shapes (operation envelope,
//! create-operation, creation data, public-key entries), each decoded by a
//! thin specialization of the tagged-field walker that knows only its own
//! field-number mapping. Nested scopes are walked leniently: a malformed
//! sub-message yields an incomplete entry that is dropped, and decoding
//! continues with its siblings. Only the outermost walk can fail.

use crate::models::key::{KeyRecord, KeyUsage};
use crate::wire::field::WireValue;
use crate::wire::walker::{walk_fields, walk_fields_lenient};
use crate::wire::WireError;

// Operation envelope
const ENVELOPE_CREATE_OPERATION: u64 = 1;

// Create-operation
const CREATE_OPERATION_CREATION_DATA: u64 = 1;

// Creation data
const CREATION_DATA_PUBLIC_KEY: u64 = 2;
const CREATION_DATA_SERVICE: u64 = 3;

// Public-key entry
const PUBLIC_KEY_ID: u64 = 1;
const PUBLIC_KEY_USAGE: u64 = 2;
const PUBLIC_KEY_UNCOMPRESSED_KEY_DATA: u64 = 8;
const PUBLIC_KEY_COMPRESSED_KEY_DATA: u64 = 9;

// Key-data sub-messages (shared numbering; field 2 is the raw bytes for the
// compressed form and the x coordinate for the legacy uncompressed form)
const KEY_DATA_CURVE: u64 = 1;
const KEY_DATA_BYTES: u64 = 2;
const KEY_DATA_Y_COORDINATE: u64 = 3;

/// Curves whose public key is a single coordinate; for these the legacy
/// uncompressed form's y coordinate is read but discarded.
fn is_single_coordinate(curve: &str) -> bool {
    matches!(curve, "ed25519" | "x25519")
}

/// Decodes the outermost operation envelope of a state buffer and returns
/// every complete public key found beneath it, in wire order.
///
/// `observer` is notified with the field number of every field dispatched at
/// any nesting level; embedders use it as a diagnostic hook.
///
/// # Errors
/// [`WireError`] when the envelope itself cannot be walked to completion.
/// Failures inside nested scopes are contained there and only reduce the
/// number of keys returned.
pub fn decode_operation_envelope(
    state: &[u8],
    observer: &mut dyn FnMut(u64),
) -> Result<Vec<KeyRecord>, WireError> {
    let mut keys = Vec::new();

    walk_fields(state, |field| {
        (*observer)(field.number);
        if field.number == ENVELOPE_CREATE_OPERATION {
            if let WireValue::LengthDelimited(payload) = field.value {
                decode_create_operation(payload, &mut keys, &mut *observer);
            }
        }
    })?;

    Ok(keys)
}

/// Create-operation: field 1 holds the creation data.
fn decode_create_operation(scope: &[u8], keys: &mut Vec<KeyRecord>, observer: &mut dyn FnMut(u64)) {
    walk_fields_lenient(scope, |field| {
        (*observer)(field.number);
        if field.number == CREATE_OPERATION_CREATION_DATA {
            if let WireValue::LengthDelimited(payload) = field.value {
                decode_creation_data(payload, keys, &mut *observer);
            }
        }
    });
}

/// Creation data: field 2 repeats once per public key; field 3 (services)
/// carries no key material and is left undecoded.
fn decode_creation_data(scope: &[u8], keys: &mut Vec<KeyRecord>, observer: &mut dyn FnMut(u64)) {
    walk_fields_lenient(scope, |field| {
        (*observer)(field.number);
        match (field.number, field.value) {
            (CREATION_DATA_PUBLIC_KEY, WireValue::LengthDelimited(payload)) => {
                match decode_public_key(payload, &mut *observer) {
                    Some(record) => keys.push(record),
                    None => log::debug!("dropping incomplete public-key entry"),
                }
            }
            (CREATION_DATA_SERVICE, _) => {}
            _ => {}
        }
    });
}

/// Public-key entry. An entry is emitted only when its id, usage, and key
/// bytes were all present; the compressed key data (field 9) is preferred
/// over the legacy uncompressed form (field 8) when both appear.
fn decode_public_key(scope: &[u8], observer: &mut dyn FnMut(u64)) -> Option<KeyRecord> {
    let mut id: Option<String> = None;
    let mut usage: Option<KeyUsage> = None;
    let mut compressed: Option<(Option<String>, Vec<u8>)> = None;
    let mut uncompressed: Option<(Option<String>, Vec<u8>)> = None;

    walk_fields_lenient(scope, |field| {
        (*observer)(field.number);
        match (field.number, field.value) {
            (PUBLIC_KEY_ID, WireValue::LengthDelimited(payload)) => {
                match std::str::from_utf8(payload) {
                    Ok(text) => id = Some(text.to_string()),
                    Err(_) => log::debug!("public-key id is not valid UTF-8; dropping the entry"),
                }
            }
            (PUBLIC_KEY_USAGE, WireValue::Varint(code)) => {
                usage = Some(KeyUsage::from_code(code));
            }
            (PUBLIC_KEY_COMPRESSED_KEY_DATA, WireValue::LengthDelimited(payload)) => {
                compressed = decode_compressed_key_data(payload, &mut *observer);
            }
            (PUBLIC_KEY_UNCOMPRESSED_KEY_DATA, WireValue::LengthDelimited(payload)) => {
                uncompressed = decode_uncompressed_key_data(payload, &mut *observer);
            }
            _ => {}
        }
    });

    let (curve, public_key) = compressed.or(uncompressed)?;
    Some(KeyRecord {
        id: id?,
        usage: usage?,
        curve,
        public_key,
    })
}

/// Compressed key data: curve name at field 1, raw key bytes at field 2.
/// Returns `None` when no key bytes were found; the curve alone is useless.
fn decode_compressed_key_data(
    scope: &[u8],
    observer: &mut dyn FnMut(u64),
) -> Option<(Option<String>, Vec<u8>)> {
    let mut curve: Option<String> = None;
    let mut bytes: Option<Vec<u8>> = None;

    walk_fields_lenient(scope, |field| {
        (*observer)(field.number);
        match (field.number, field.value) {
            (KEY_DATA_CURVE, WireValue::LengthDelimited(payload)) => {
                curve = std::str::from_utf8(payload)
                    .ok()
                    .map(|text| text.to_ascii_lowercase());
            }
            (KEY_DATA_BYTES, WireValue::LengthDelimited(payload)) => {
                bytes = Some(payload.to_vec());
            }
            _ => {}
        }
    });

    Some((curve, bytes?))
}

/// Legacy uncompressed key data: curve at field 1, x coordinate at field 2,
/// y coordinate at field 3. Single-coordinate curves keep x alone; any other
/// curve keeps x and y concatenated so no recovered material is lost.
fn decode_uncompressed_key_data(
    scope: &[u8],
    observer: &mut dyn FnMut(u64),
) -> Option<(Option<String>, Vec<u8>)> {
    let mut curve: Option<String> = None;
    let mut x: Option<Vec<u8>> = None;
    let mut y: Option<Vec<u8>> = None;

    walk_fields_lenient(scope, |field| {
        (*observer)(field.number);
        match (field.number, field.value) {
            (KEY_DATA_CURVE, WireValue::LengthDelimited(payload)) => {
                curve = std::str::from_utf8(payload)
                    .ok()
                    .map(|text| text.to_ascii_lowercase());
            }
            (KEY_DATA_BYTES, WireValue::LengthDelimited(payload)) => {
                x = Some(payload.to_vec());
            }
            (KEY_DATA_Y_COORDINATE, WireValue::LengthDelimited(payload)) => {
                y = Some(payload.to_vec());
            }
            _ => {}
        }
    });

    let x = x?;
    let single = curve.as_deref().map_or(false, is_single_coordinate);
    let public_key = match y {
        Some(mut y_bytes) if !single => {
            let mut both = x;
            both.append(&mut y_bytes);
            both
        }
        _ => x,
    };

    Some((curve, public_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::testenc::{length_field, varint_field, write_varint};

    fn compressed_key_data(curve: &str, bytes: &[u8]) -> Vec<u8> {
        let mut out = length_field(KEY_DATA_CURVE, curve.as_bytes());
        out.extend(length_field(KEY_DATA_BYTES, bytes));
        out
    }

    fn uncompressed_key_data(curve: &str, x: &[u8], y: &[u8]) -> Vec<u8> {
        let mut out = length_field(KEY_DATA_CURVE, curve.as_bytes());
        out.extend(length_field(KEY_DATA_BYTES, x));
        out.extend(length_field(KEY_DATA_Y_COORDINATE, y));
        out
    }

    fn public_key_entry(id: &str, usage: u64, key_data: &[u8], compressed: bool) -> Vec<u8> {
        let mut out = length_field(PUBLIC_KEY_ID, id.as_bytes());
        out.extend(varint_field(PUBLIC_KEY_USAGE, usage));
        let field = if compressed {
            PUBLIC_KEY_COMPRESSED_KEY_DATA
        } else {
            PUBLIC_KEY_UNCOMPRESSED_KEY_DATA
        };
        out.extend(length_field(field, key_data));
        out
    }

    fn envelope_with_entries(entries: &[Vec<u8>]) -> Vec<u8> {
        let mut creation_data = Vec::new();
        for entry in entries {
            creation_data.extend(length_field(CREATION_DATA_PUBLIC_KEY, entry));
        }
        let create_operation = length_field(CREATE_OPERATION_CREATION_DATA, &creation_data);
        length_field(ENVELOPE_CREATE_OPERATION, &create_operation)
    }

    fn decode(state: &[u8]) -> Result<Vec<KeyRecord>, WireError> {
        decode_operation_envelope(state, &mut |_| {})
    }

    #[test]
    fn decodes_a_complete_compressed_entry() {
        let entry = public_key_entry(
            "auth-1",
            KeyUsage::AuthenticationKey.code(),
            &compressed_key_data("Ed25519", &[7u8; 32]),
            true,
        );
        let keys = decode(&envelope_with_entries(&[entry])).expect("decode");

        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].id, "auth-1");
        assert_eq!(keys[0].usage, KeyUsage::AuthenticationKey);
        assert_eq!(keys[0].curve.as_deref(), Some("ed25519"));
        assert_eq!(keys[0].public_key, vec![7u8; 32]);
    }

    #[test]
    fn entry_without_usage_is_dropped() {
        let mut entry = length_field(PUBLIC_KEY_ID, b"no-usage");
        entry.extend(length_field(
            PUBLIC_KEY_COMPRESSED_KEY_DATA,
            &compressed_key_data("ed25519", &[1u8; 32]),
        ));
        let keys = decode(&envelope_with_entries(&[entry])).expect("decode");
        assert!(keys.is_empty());
    }

    #[test]
    fn entry_without_id_is_dropped() {
        let mut entry = varint_field(PUBLIC_KEY_USAGE, 1);
        entry.extend(length_field(
            PUBLIC_KEY_COMPRESSED_KEY_DATA,
            &compressed_key_data("ed25519", &[1u8; 32]),
        ));
        let keys = decode(&envelope_with_entries(&[entry])).expect("decode");
        assert!(keys.is_empty());
    }

    #[test]
    fn entry_with_curve_but_no_key_bytes_is_dropped() {
        let key_data = length_field(KEY_DATA_CURVE, b"ed25519");
        let entry = public_key_entry("curve-only", 4, &key_data, true);
        let keys = decode(&envelope_with_entries(&[entry])).expect("decode");
        assert!(keys.is_empty());
    }

    #[test]
    fn entry_with_non_utf8_id_is_dropped() {
        let mut entry = length_field(PUBLIC_KEY_ID, &[0xFF, 0xFE, 0x80]);
        entry.extend(varint_field(PUBLIC_KEY_USAGE, 4));
        entry.extend(length_field(
            PUBLIC_KEY_COMPRESSED_KEY_DATA,
            &compressed_key_data("ed25519", &[1u8; 32]),
        ));
        let keys = decode(&envelope_with_entries(&[entry])).expect("decode");
        assert!(keys.is_empty());
    }

    #[test]
    fn compressed_key_data_is_preferred_over_uncompressed() {
        let mut entry = length_field(PUBLIC_KEY_ID, b"both-forms");
        entry.extend(varint_field(PUBLIC_KEY_USAGE, 1));
        entry.extend(length_field(
            PUBLIC_KEY_UNCOMPRESSED_KEY_DATA,
            &uncompressed_key_data("secp256k1", &[1u8; 32], &[2u8; 32]),
        ));
        entry.extend(length_field(
            PUBLIC_KEY_COMPRESSED_KEY_DATA,
            &compressed_key_data("secp256k1", &[9u8; 33]),
        ));

        let keys = decode(&envelope_with_entries(&[entry])).expect("decode");
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].public_key, vec![9u8; 33]);
    }

    #[test]
    fn uncompressed_single_coordinate_curve_discards_y() {
        let entry = public_key_entry(
            "agreement-1",
            KeyUsage::KeyAgreementKey.code(),
            &uncompressed_key_data("X25519", &[3u8; 32], &[4u8; 32]),
            false,
        );
        let keys = decode(&envelope_with_entries(&[entry])).expect("decode");

        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].curve.as_deref(), Some("x25519"));
        assert_eq!(keys[0].public_key, vec![3u8; 32]);
    }

    #[test]
    fn uncompressed_two_coordinate_curve_keeps_both() {
        let entry = public_key_entry(
            "master-0",
            KeyUsage::MasterKey.code(),
            &uncompressed_key_data("secp256k1", &[3u8; 32], &[4u8; 32]),
            false,
        );
        let keys = decode(&envelope_with_entries(&[entry])).expect("decode");

        assert_eq!(keys.len(), 1);
        let mut expected = vec![3u8; 32];
        expected.extend(vec![4u8; 32]);
        assert_eq!(keys[0].public_key, expected);
    }

    #[test]
    fn unrecognized_usage_code_is_preserved() {
        let entry = public_key_entry(
            "future-key",
            99,
            &compressed_key_data("ed25519", &[5u8; 32]),
            true,
        );
        let keys = decode(&envelope_with_entries(&[entry])).expect("decode");
        assert_eq!(keys[0].usage, KeyUsage::Unrecognized(99));
    }

    #[test]
    fn service_entries_are_ignored() {
        let good = public_key_entry("auth-1", 4, &compressed_key_data("ed25519", &[7u8; 32]), true);
        let mut creation_data = length_field(CREATION_DATA_SERVICE, b"service blob, never decoded");
        creation_data.extend(length_field(CREATION_DATA_PUBLIC_KEY, &good));
        let create_operation = length_field(CREATE_OPERATION_CREATION_DATA, &creation_data);
        let state = length_field(ENVELOPE_CREATE_OPERATION, &create_operation);

        let keys = decode(&state).expect("decode");
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].id, "auth-1");
    }

    #[test]
    fn malformed_entry_does_not_abort_its_siblings() {
        // The middle entry is well-delimited but internally truncated: its id
        // field claims more bytes than the entry holds.
        let mut broken = write_varint(PUBLIC_KEY_ID << 3 | 2);
        broken.extend(write_varint(200));
        broken.extend_from_slice(b"far too short");

        let before = public_key_entry("auth-1", 4, &compressed_key_data("ed25519", &[1u8; 32]), true);
        let after = public_key_entry("agreement-1", 3, &compressed_key_data("x25519", &[2u8; 32]), true);

        let keys = decode(&envelope_with_entries(&[before, broken, after])).expect("decode");
        let ids: Vec<&str> = keys.iter().map(|k| k.id.as_str()).collect();
        assert_eq!(ids, vec!["auth-1", "agreement-1"]);
    }

    #[test]
    fn unknown_fields_in_every_scope_are_skipped() {
        let mut entry = public_key_entry("auth-1", 4, &compressed_key_data("ed25519", &[7u8; 32]), true);
        entry.extend(varint_field(60, 12345));

        let mut creation_data = length_field(CREATION_DATA_PUBLIC_KEY, &entry);
        creation_data.extend(varint_field(50, 1));
        let mut create_operation = length_field(CREATE_OPERATION_CREATION_DATA, &creation_data);
        create_operation.extend(length_field(40, b"unknown"));
        let mut state = length_field(ENVELOPE_CREATE_OPERATION, &create_operation);
        state.extend(varint_field(30, 7));

        let keys = decode(&state).expect("decode");
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn truncated_envelope_is_a_top_level_error() {
        let mut state = write_varint(ENVELOPE_CREATE_OPERATION << 3 | 2);
        state.extend(write_varint(100)); // claims 100 bytes, has none
        assert_eq!(decode(&state), Err(WireError::Truncated));
    }

    #[test]
    fn observer_sees_fields_at_every_nesting_level() {
        let entry = public_key_entry("auth-1", 4, &compressed_key_data("ed25519", &[7u8; 32]), true);
        let state = envelope_with_entries(&[entry]);

        let mut seen = Vec::new();
        decode_operation_envelope(&state, &mut |number| seen.push(number)).expect("decode");

        assert!(seen.contains(&ENVELOPE_CREATE_OPERATION));
        assert!(seen.contains(&PUBLIC_KEY_USAGE));
        assert!(seen.contains(&KEY_DATA_CURVE));
    }
}
