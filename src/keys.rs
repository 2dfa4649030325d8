//! Key generation and validation helpers
//!
//! EC keypairs use the raw forms the signing primitives consume: the
//! private key is the curve scalar, the public key an uncompressed SEC1
//! point. RSA keys are expected in PKCS#8/PKCS#1 PEM or DER and are not
//! generated here.

use rand::rngs::OsRng;

use crate::algorithms::Algorithm;

/// EC keypair in raw wire form
#[derive(Debug, Clone)]
pub struct EcKeyPair {
    /// Raw curve scalar (32/48/66 bytes depending on curve)
    pub private_key: Vec<u8>,
    /// SEC1 uncompressed point (`0x04 || x || y`)
    pub public_key: Vec<u8>,
}

/// Generate a fresh P-256 keypair for ES256
#[must_use]
pub fn generate_es256_keypair() -> EcKeyPair {
    let signing_key = p256::ecdsa::SigningKey::random(&mut OsRng);
    EcKeyPair {
        private_key: signing_key.to_bytes().to_vec(),
        public_key: signing_key
            .verifying_key()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec(),
    }
}

/// Generate a fresh P-384 keypair for ES384
#[must_use]
pub fn generate_es384_keypair() -> EcKeyPair {
    let signing_key = p384::ecdsa::SigningKey::random(&mut OsRng);
    EcKeyPair {
        private_key: signing_key.to_bytes().to_vec(),
        public_key: signing_key
            .verifying_key()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec(),
    }
}

/// Generate a fresh P-521 keypair for ES512
#[must_use]
pub fn generate_es512_keypair() -> EcKeyPair {
    let signing_key = p521::ecdsa::SigningKey::random(&mut OsRng);
    // p521's SigningKey has no verifying_key accessor; go through From.
    let verifying_key = p521::ecdsa::VerifyingKey::from(&signing_key);
    EcKeyPair {
        private_key: signing_key.to_bytes().to_vec(),
        public_key: verifying_key.to_encoded_point(false).as_bytes().to_vec(),
    }
}

/// Validate an ES256 keypair: parsable scalar, valid uncompressed point
#[must_use]
pub fn validate_es256_keypair(keypair: &EcKeyPair) -> bool {
    let private_ok = keypair.private_key.len() == 32
        && p256::ecdsa::SigningKey::from_slice(&keypair.private_key).is_ok();
    let public_ok = keypair.public_key.len() == 65
        && keypair.public_key[0] == 0x04
        && p256::ecdsa::VerifyingKey::from_sec1_bytes(&keypair.public_key).is_ok();
    private_ok && public_ok
}

/// Advisory key length for an algorithm, in bytes.
///
/// HMAC secrets of any length are accepted when signing and verifying;
/// this is the length a freshly generated key should have. For RSA it is
/// the 2048-bit modulus minimum, for EC the curve scalar width, and 0
/// for `none`.
#[must_use]
pub fn recommended_key_len(alg: Algorithm) -> usize {
    match alg {
        Algorithm::HS256 | Algorithm::ES256 => 32,
        Algorithm::HS384 | Algorithm::ES384 => 48,
        Algorithm::HS512 => 64,
        Algorithm::ES512 => 66,
        Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => 256,
        Algorithm::None => 0,
    }
}
