//! Opaque pagination cursors.
//!
//! A cursor is the store's continuation key serialized as JSON and then
//! base64-encoded with the URL-safe alphabet and no padding, so it can be
//! echoed back verbatim in a query string.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use shiptrack_core::error::DomainError;
use shiptrack_core::event::EventKey;

/// Encodes a continuation key as an opaque cursor.
#[must_use]
pub fn encode_cursor(key: &EventKey) -> String {
    // Serializing a struct of a string and a UUID cannot fail.
    let json = serde_json::to_vec(key).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Decodes a cursor produced by [`encode_cursor`].
///
/// # Errors
///
/// Returns `DomainError::InvalidQuery` if the cursor is not valid base64 or
/// does not contain a continuation key.
pub fn decode_cursor(cursor: &str) -> Result<EventKey, DomainError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(cursor)
        .map_err(|e| DomainError::InvalidQuery(format!("malformed pagination key: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| DomainError::InvalidQuery(format!("malformed pagination key: {e}")))
}
