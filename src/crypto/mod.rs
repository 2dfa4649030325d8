//! Per-family signing and verification primitives
//!
//! Dispatches on the registry's family mapping. Signatures use the wire
//! forms of the compact token format: raw MAC output for HMAC, PKCS#1
//! v1.5 output for RSA, fixed-width R||S for ECDSA.

mod ecdsa;
mod hmac;
mod rsa;

use crate::algorithms::{Algorithm, AlgorithmFamily};
use crate::error::JwtResult;

/// Sign `message` with the given algorithm and key.
///
/// Returns the raw signature bytes in the token wire form. The `none`
/// algorithm signs nothing and yields an empty signature.
pub(crate) fn sign(alg: Algorithm, message: &str, key: &[u8]) -> JwtResult<Vec<u8>> {
    match alg.family() {
        AlgorithmFamily::Hmac => hmac::sign(alg, message, key),
        AlgorithmFamily::Rsa => rsa::sign(alg, message, key),
        AlgorithmFamily::Ecdsa => ecdsa::sign(alg, message, key),
        AlgorithmFamily::None => Ok(Vec::new()),
    }
}

/// Check `signature` over `message` with the given algorithm and key.
///
/// `Ok(false)` is a clean mismatch; `Err` means the key itself could not
/// be used (undecodable key material, wrong algorithm). The `none`
/// algorithm verifies unconditionally.
pub(crate) fn verify(
    alg: Algorithm,
    message: &str,
    signature: &[u8],
    key: &[u8],
) -> JwtResult<bool> {
    match alg.family() {
        AlgorithmFamily::Hmac => hmac::verify(alg, message, signature, key),
        AlgorithmFamily::Rsa => rsa::verify(alg, message, signature, key),
        AlgorithmFamily::Ecdsa => ecdsa::verify(alg, message, signature, key),
        AlgorithmFamily::None => Ok(true),
    }
}
