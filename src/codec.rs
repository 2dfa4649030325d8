//! base64url codec and compact JSON encoding (RFC 7515 serialization)

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use serde::Serialize;

use crate::error::{JwtError, JwtResult};

// Encodes without padding; decodes padded and unpadded input alike.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Base64 URL-safe encoding without padding
#[inline]
#[must_use]
pub fn base64url_encode(input: &[u8]) -> String {
    URL_SAFE_LENIENT.encode(input)
}

/// Base64 URL-safe decoding.
///
/// Accepts input with or without trailing `=` padding.
///
/// # Errors
/// Returns a decode error on characters outside the url-safe alphabet or
/// an impossible length.
#[inline]
pub fn base64url_decode(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_LENIENT.decode(input)
}

/// Compact encoding of a JSON value: `base64url(json)`.
///
/// Key order follows the value's own insertion order, so the same logical
/// object always encodes to identical bytes.
pub(crate) fn compact_json<T: Serialize>(value: &T) -> JwtResult<String> {
    let json = serde_json::to_string(value).map_err(|e| JwtError::serialization(e.to_string()))?;
    Ok(base64url_encode(json.as_bytes()))
}
