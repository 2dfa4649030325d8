//! Compact signed token library.
//!
//! Creates, parses, and verifies tokens in the dot-joined compact
//! serialization: `base64url(header).base64url(body).base64url(sig)`,
//! with the signature segment omitted for the `none` algorithm.
//! Supported algorithms are HS256/384/512 (HMAC), RS256/384/512
//! (RSA PKCS#1 v1.5), ES256/384/512 (ECDSA, fixed-width `R || S`
//! signatures), and `none`.
//!
//! The quick path is the module-level functions:
//!
//! ```no_run
//! use serde_json::json;
//!
//! let wire = tokenseal::create(&json!({"sub": "user-1"}), b"secret")?.compact()?;
//! let verified = tokenseal::verify(&wire, b"secret")?;
//! assert_eq!(verified.body().sub(), Some("user-1"));
//! # Ok::<(), tokenseal::JwtError>(())
//! ```
//!
//! [`Jwt`] and [`Verifier`] expose the full builder surface: custom
//! claims and header parameters, expiry and not-before windows, every
//! supported algorithm, and `kid`-based key resolution (sync or async).
//!
//! Verification is strict by default: the expected algorithm is pinned
//! (HS256 unless configured otherwise), and unsigned `none` tokens are
//! rejected unless the verifier explicitly opts in to `none`.

mod algorithms;
mod claims;
mod codec;
mod crypto;
mod error;
mod header;
mod parser;
mod token;
mod verifier;

pub mod keys;

pub use algorithms::{Algorithm, AlgorithmFamily, Digest};
pub use claims::{ClaimTime, JwtBody};
pub use codec::{base64url_decode, base64url_encode};
pub use error::{BoxError, JwtError, JwtResult, ParseFailure};
pub use header::JwtHeader;
pub use parser::Parser;
pub use token::Jwt;
pub use verifier::{AsyncKeyResolver, KeyResolver, Verifier};

use chrono::{Duration, Utc};
use serde::Serialize;
use serde_json::Value;

/// Build an HS256-signed token from `claims`, expiring in one hour.
///
/// `claims` must serialize to a JSON object. A fresh `jti` and the
/// current `iat` are filled in unless the claims already carry them; the
/// one-hour `exp` always overrides a caller-supplied value, so use
/// [`create_with`] plus [`Jwt::set_expiration`] (or
/// [`Jwt::clear_expiration`]) for a custom lifetime.
///
/// # Errors
/// Returns `Serialization` when `claims` is not a JSON object.
pub fn create<C: Serialize>(claims: &C, signing_key: &[u8]) -> JwtResult<Jwt> {
    let jwt = create_with(claims, Some(signing_key), Algorithm::HS256)?;
    jwt.set_expiration(Utc::now() + Duration::hours(1))
}

/// Build a token from `claims` with an explicit algorithm and optional
/// key. No default expiration is applied.
///
/// # Errors
/// Returns `Serialization` when `claims` is not a JSON object, and
/// `SigningKeyRequired` when a non-`none` algorithm has no key.
pub fn create_with<C: Serialize>(
    claims: &C,
    signing_key: Option<&[u8]>,
    alg: Algorithm,
) -> JwtResult<Jwt> {
    let value = serde_json::to_value(claims).map_err(|e| JwtError::serialization(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(JwtError::serialization("claims must be a JSON object"));
    };

    let mut jwt = Jwt::with_claims(map).set_algorithm(alg);
    match signing_key {
        Some(key) => jwt = jwt.set_signing_key(key),
        None if alg != Algorithm::None => return Err(JwtError::SigningKeyRequired(None)),
        None => {}
    }
    Ok(jwt)
}

/// Verify an HS256 token against `signing_key`
///
/// # Errors
/// One of the taxonomy kinds; see [`JwtError`].
pub fn verify(token: &str, signing_key: &[u8]) -> JwtResult<Jwt> {
    verify_with(token, Some(signing_key), Algorithm::HS256)
}

/// Verify a token against an explicit expected algorithm and optional
/// key.
///
/// # Errors
/// One of the taxonomy kinds; see [`JwtError`].
pub fn verify_with(token: &str, signing_key: Option<&[u8]>, alg: Algorithm) -> JwtResult<Jwt> {
    let mut verifier = Verifier::new().with_algorithm(alg);
    if let Some(key) = signing_key {
        verifier = verifier.set_signing_key(key);
    }
    verifier.verify(token)
}

/// Verify an unsigned (`none` algorithm) token: structural and temporal
/// checks only.
///
/// # Errors
/// One of the taxonomy kinds; see [`JwtError`].
pub fn verify_unsigned(token: &str) -> JwtResult<Jwt> {
    verify_with(token, None, Algorithm::None)
}
