//! HMAC-SHA signing and verification (HS256, HS384, HS512)

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use crate::algorithms::Algorithm;
use crate::error::{JwtError, JwtResult};

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

/// Compute the keyed digest over `message`
pub(crate) fn sign(alg: Algorithm, message: &str, secret: &[u8]) -> JwtResult<Vec<u8>> {
    match alg {
        Algorithm::HS256 => sign_hs256(message, secret),
        Algorithm::HS384 => sign_hs384(message, secret),
        Algorithm::HS512 => sign_hs512(message, secret),
        other => Err(JwtError::unsupported_algorithm(other.name())),
    }
}

/// Recompute the digest and compare in constant time
pub(crate) fn verify(
    alg: Algorithm,
    message: &str,
    signature: &[u8],
    secret: &[u8],
) -> JwtResult<bool> {
    let expected = sign(alg, message, secret)?;
    Ok(bool::from(expected.as_slice().ct_eq(signature)))
}

#[inline]
fn sign_hs256(message: &str, secret: &[u8]) -> JwtResult<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|_| JwtError::invalid_key("invalid HMAC key"))?;
    mac.update(message.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

#[inline]
fn sign_hs384(message: &str, secret: &[u8]) -> JwtResult<Vec<u8>> {
    let mut mac = HmacSha384::new_from_slice(secret)
        .map_err(|_| JwtError::invalid_key("invalid HMAC key"))?;
    mac.update(message.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

#[inline]
fn sign_hs512(message: &str, secret: &[u8]) -> JwtResult<Vec<u8>> {
    let mut mac = HmacSha512::new_from_slice(secret)
        .map_err(|_| JwtError::invalid_key("invalid HMAC key"))?;
    mac.update(message.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}
