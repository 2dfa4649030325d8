//! RSA PKCS#1 v1.5 signing and verification (RS256, RS384, RS512)
//!
//! Private keys are accepted as PKCS#8 or PKCS#1, in PEM or DER form;
//! public keys as SPKI or PKCS#1, PEM or DER.

use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::sha2::{Sha256, Sha384, Sha512};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::algorithms::Algorithm;
use crate::error::{JwtError, JwtResult};

/// Sign `message` with an RSA private key
pub(crate) fn sign(alg: Algorithm, message: &str, private_key: &[u8]) -> JwtResult<Vec<u8>> {
    let private_key = decode_private_key(private_key)?;
    let signature = match alg {
        Algorithm::RS256 => SigningKey::<Sha256>::new(private_key)
            .sign(message.as_bytes())
            .to_vec(),
        Algorithm::RS384 => SigningKey::<Sha384>::new(private_key)
            .sign(message.as_bytes())
            .to_vec(),
        Algorithm::RS512 => SigningKey::<Sha512>::new(private_key)
            .sign(message.as_bytes())
            .to_vec(),
        other => return Err(JwtError::unsupported_algorithm(other.name())),
    };
    Ok(signature)
}

/// Verify `signature` over `message` with an RSA public key
pub(crate) fn verify(
    alg: Algorithm,
    message: &str,
    signature: &[u8],
    public_key: &[u8],
) -> JwtResult<bool> {
    let public_key = decode_public_key(public_key)?;
    let Ok(signature) = Signature::try_from(signature) else {
        return Ok(false);
    };
    let verified = match alg {
        Algorithm::RS256 => VerifyingKey::<Sha256>::new(public_key)
            .verify(message.as_bytes(), &signature)
            .is_ok(),
        Algorithm::RS384 => VerifyingKey::<Sha384>::new(public_key)
            .verify(message.as_bytes(), &signature)
            .is_ok(),
        Algorithm::RS512 => VerifyingKey::<Sha512>::new(public_key)
            .verify(message.as_bytes(), &signature)
            .is_ok(),
        other => return Err(JwtError::unsupported_algorithm(other.name())),
    };
    Ok(verified)
}

fn decode_private_key(bytes: &[u8]) -> JwtResult<RsaPrivateKey> {
    let key = if looks_like_pem(bytes) {
        let pem = std::str::from_utf8(bytes)
            .map_err(|_| JwtError::invalid_key("RSA private key PEM is not valid UTF-8"))?;
        RsaPrivateKey::from_pkcs8_pem(pem)
            .ok()
            .or_else(|| RsaPrivateKey::from_pkcs1_pem(pem).ok())
    } else {
        RsaPrivateKey::from_pkcs8_der(bytes)
            .ok()
            .or_else(|| RsaPrivateKey::from_pkcs1_der(bytes).ok())
    };
    key.ok_or_else(|| JwtError::invalid_key("invalid RSA private key"))
}

fn decode_public_key(bytes: &[u8]) -> JwtResult<RsaPublicKey> {
    let key = if looks_like_pem(bytes) {
        let pem = std::str::from_utf8(bytes)
            .map_err(|_| JwtError::invalid_key("RSA public key PEM is not valid UTF-8"))?;
        RsaPublicKey::from_public_key_pem(pem)
            .ok()
            .or_else(|| RsaPublicKey::from_pkcs1_pem(pem).ok())
    } else {
        RsaPublicKey::from_public_key_der(bytes)
            .ok()
            .or_else(|| RsaPublicKey::from_pkcs1_der(bytes).ok())
    };
    key.ok_or_else(|| JwtError::invalid_key("invalid RSA public key"))
}

fn looks_like_pem(bytes: &[u8]) -> bool {
    bytes.starts_with(b"-----")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_key_material_is_a_typed_error() {
        assert!(matches!(
            sign(Algorithm::RS256, "msg", b"not a key"),
            Err(JwtError::InvalidKey(_))
        ));
        assert!(matches!(
            verify(Algorithm::RS256, "msg", &[0u8; 256], b"not a key"),
            Err(JwtError::InvalidKey(_))
        ));
    }
}
