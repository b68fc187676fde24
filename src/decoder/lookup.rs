// src/decoder/lookup.rs
//! Key-pair extraction for callers that require a dual-key identifier, plus
//! the diagnostic summary for operational logging.

use crate::decoder::longform::parse_long_form;
use crate::error::DecodeError;
use crate::models::identifier::{ParsedIdentifier, SensitiveKeyPair};
use crate::models::key::KeyUsage;

/// Extracts the authentication/key-agreement pair an encrypted content
/// exchange requires.
///
/// Queries the identifier for an authentication key on Ed25519 and a
/// key-agreement key on X25519 (each with the curve-only fallback of
/// [`ParsedIdentifier::find_key_by_usage_and_curve`]) and reports whether
/// both were found. Callers gate sensitive flows on `complete`.
///
/// # Errors
/// Propagates the top-level [`DecodeError`]s of the parse; a structurally
/// valid identifier that merely lacks one of the keys is not an error.
pub fn extract_key_pair_for_sensitive_operations(
    did: &str,
) -> Result<SensitiveKeyPair, DecodeError> {
    let parsed = parse_long_form(did)?;
    log_key_summary(&parsed);

    let authentication = parsed
        .find_key_by_usage_and_curve(KeyUsage::AuthenticationKey, "ed25519")
        .cloned();
    let key_agreement = parsed
        .find_key_by_usage_and_curve(KeyUsage::KeyAgreementKey, "x25519")
        .cloned();
    let complete = authentication.is_some() && key_agreement.is_some();

    Ok(SensitiveKeyPair {
        authentication,
        key_agreement,
        complete,
    })
}

/// Debug-logs which keys an identifier yielded, by id, usage, and curve.
pub fn log_key_summary(parsed: &ParsedIdentifier) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }

    let summary: Vec<serde_json::Value> = parsed
        .list_all_keys()
        .iter()
        .map(|key| {
            serde_json::json!({
                "id": key.id,
                "usage": key.usage.to_string(),
                "curve": key.curve,
            })
        })
        .collect();

    log::debug!(
        "decoded {} key(s) from {}: {}",
        summary.len(),
        parsed.identifier,
        serde_json::Value::Array(summary)
    );
}
