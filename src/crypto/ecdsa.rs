//! ECDSA signing and verification (ES256, ES384, ES512)
//!
//! Private keys are the raw curve scalar (32/48/66 bytes); public keys
//! are SEC1 uncompressed points. Signatures travel in the token format's
//! fixed-width R||S form; the `ecdsa` signature type converts between
//! that and the ASN.1 form the underlying arithmetic consumes, exactly
//! in both directions. A malformed fixed-width signature fails parsing
//! and is reported as a clean mismatch.

use p256::ecdsa::signature::{Signer, Verifier};

use crate::algorithms::Algorithm;
use crate::error::{JwtError, JwtResult};

/// Sign `message` with a raw EC private scalar
pub(crate) fn sign(alg: Algorithm, message: &str, private_key: &[u8]) -> JwtResult<Vec<u8>> {
    match alg {
        Algorithm::ES256 => sign_es256(message, private_key),
        Algorithm::ES384 => sign_es384(message, private_key),
        Algorithm::ES512 => sign_es512(message, private_key),
        other => Err(JwtError::unsupported_algorithm(other.name())),
    }
}

/// Verify a fixed-width R||S `signature` with a SEC1 public point
pub(crate) fn verify(
    alg: Algorithm,
    message: &str,
    signature: &[u8],
    public_key: &[u8],
) -> JwtResult<bool> {
    match alg {
        Algorithm::ES256 => verify_es256(message, signature, public_key),
        Algorithm::ES384 => verify_es384(message, signature, public_key),
        Algorithm::ES512 => verify_es512(message, signature, public_key),
        other => Err(JwtError::unsupported_algorithm(other.name())),
    }
}

fn sign_es256(message: &str, private_key: &[u8]) -> JwtResult<Vec<u8>> {
    let key = p256::ecdsa::SigningKey::from_slice(private_key)
        .map_err(|e| JwtError::invalid_key(format!("invalid EC private key for ES256: {e}")))?;
    let signature: p256::ecdsa::Signature = key.sign(message.as_bytes());
    Ok(signature.to_bytes().to_vec())
}

fn verify_es256(message: &str, signature: &[u8], public_key: &[u8]) -> JwtResult<bool> {
    let key = p256::ecdsa::VerifyingKey::from_sec1_bytes(public_key)
        .map_err(|e| JwtError::invalid_key(format!("invalid EC public key for ES256: {e}")))?;
    let Ok(signature) = p256::ecdsa::Signature::from_slice(signature) else {
        return Ok(false);
    };
    Ok(key.verify(message.as_bytes(), &signature).is_ok())
}

fn sign_es384(message: &str, private_key: &[u8]) -> JwtResult<Vec<u8>> {
    let key = p384::ecdsa::SigningKey::from_slice(private_key)
        .map_err(|e| JwtError::invalid_key(format!("invalid EC private key for ES384: {e}")))?;
    let signature: p384::ecdsa::Signature = key.sign(message.as_bytes());
    Ok(signature.to_bytes().to_vec())
}

fn verify_es384(message: &str, signature: &[u8], public_key: &[u8]) -> JwtResult<bool> {
    let key = p384::ecdsa::VerifyingKey::from_sec1_bytes(public_key)
        .map_err(|e| JwtError::invalid_key(format!("invalid EC public key for ES384: {e}")))?;
    let Ok(signature) = p384::ecdsa::Signature::from_slice(signature) else {
        return Ok(false);
    };
    Ok(key.verify(message.as_bytes(), &signature).is_ok())
}

fn sign_es512(message: &str, private_key: &[u8]) -> JwtResult<Vec<u8>> {
    let key = p521::ecdsa::SigningKey::from_slice(private_key)
        .map_err(|e| JwtError::invalid_key(format!("invalid EC private key for ES512: {e}")))?;
    let signature: p521::ecdsa::Signature = key.sign(message.as_bytes());
    Ok(signature.to_bytes().to_vec())
}

fn verify_es512(message: &str, signature: &[u8], public_key: &[u8]) -> JwtResult<bool> {
    let key = p521::ecdsa::VerifyingKey::from_sec1_bytes(public_key)
        .map_err(|e| JwtError::invalid_key(format!("invalid EC public key for ES512: {e}")))?;
    let Ok(signature) = p521::ecdsa::Signature::from_slice(signature) else {
        return Ok(false);
    };
    Ok(key.verify(message.as_bytes(), &signature).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;

    #[test]
    fn signatures_are_fixed_width() {
        let message = "header.payload";

        let kp = keys::generate_es256_keypair();
        let sig = sign(Algorithm::ES256, message, &kp.private_key).unwrap();
        assert_eq!(sig.len(), 64);
        assert!(verify(Algorithm::ES256, message, &sig, &kp.public_key).unwrap());

        let kp = keys::generate_es384_keypair();
        let sig = sign(Algorithm::ES384, message, &kp.private_key).unwrap();
        assert_eq!(sig.len(), 96);
        assert!(verify(Algorithm::ES384, message, &sig, &kp.public_key).unwrap());

        let kp = keys::generate_es512_keypair();
        let sig = sign(Algorithm::ES512, message, &kp.private_key).unwrap();
        assert_eq!(sig.len(), 132);
        assert!(verify(Algorithm::ES512, message, &sig, &kp.public_key).unwrap());
    }

    #[test]
    fn malformed_fixed_width_signature_is_a_clean_false() {
        let kp = keys::generate_es256_keypair();
        // wrong length entirely
        assert!(!verify(Algorithm::ES256, "msg", &[0u8; 10], &kp.public_key).unwrap());
        // right length, all zero: r and s out of range
        assert!(!verify(Algorithm::ES256, "msg", &[0u8; 64], &kp.public_key).unwrap());
    }

    #[test]
    fn cross_key_verification_fails() {
        let signer = keys::generate_es256_keypair();
        let other = keys::generate_es256_keypair();
        let sig = sign(Algorithm::ES256, "msg", &signer.private_key).unwrap();
        assert!(!verify(Algorithm::ES256, "msg", &sig, &other.public_key).unwrap());
    }
}
