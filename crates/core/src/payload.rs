//! Face payload decoding and artifact encoding.
//!
//! Callers send the face image as base64, optionally wrapped in a
//! `data:image/...;base64,` URI. Rendered artifacts travel back to the
//! callback endpoint as plain base64.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::CoreError;

/// Strip a leading `data:<mime>;base64,` prefix, if present.
///
/// Anything up to and including the first comma is dropped when the string
/// starts with `data:`; otherwise the input is returned unchanged.
pub fn strip_data_uri_prefix(payload: &str) -> &str {
    if payload.starts_with("data:") {
        match payload.find(',') {
            Some(idx) => &payload[idx + 1..],
            None => payload,
        }
    } else {
        payload
    }
}

/// Decode a caller-supplied face payload into raw bytes.
///
/// Tolerates a data-URI prefix and embedded ASCII whitespace (some clients
/// line-wrap large base64 bodies).
pub fn decode_face_payload(payload: &str) -> Result<Vec<u8>, CoreError> {
    let stripped = strip_data_uri_prefix(payload);

    let compact: String = stripped
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    if compact.is_empty() {
        return Err(CoreError::Validation(
            "faceBase64 decoded to an empty payload".to_string(),
        ));
    }

    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| CoreError::Validation(format!("faceBase64 is not valid base64: {e}")))
}

/// Encode a rendered artifact for transport in the callback body.
pub fn encode_artifact(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
