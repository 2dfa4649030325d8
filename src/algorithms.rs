//! Signing-algorithm registry
//!
//! Maps algorithm identifiers to their digest primitive and signing
//! family. The registry is a fixed enum, so it is immutable process-wide:
//! there is no way to register or replace a mapping at runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{JwtError, JwtResult};

/// Registered signing algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// HMAC with SHA-256
    HS256,
    /// HMAC with SHA-384
    HS384,
    /// HMAC with SHA-512
    HS512,
    /// RSA PKCS#1 v1.5 with SHA-256
    RS256,
    /// RSA PKCS#1 v1.5 with SHA-384
    RS384,
    /// RSA PKCS#1 v1.5 with SHA-512
    RS512,
    /// ECDSA over P-256 with SHA-256
    ES256,
    /// ECDSA over P-384 with SHA-384
    ES384,
    /// ECDSA over P-521 with SHA-512
    ES512,
    /// Unsecured: no signature segment
    None,
}

/// Signing family an algorithm belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmFamily {
    /// Symmetric keyed digest
    Hmac,
    /// RSA signature
    Rsa,
    /// Elliptic-curve signature, fixed-width R||S wire encoding
    Ecdsa,
    /// No cryptographic operation
    None,
}

/// Digest primitive backing an algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Digest {
    Sha256,
    Sha384,
    Sha512,
}

impl Algorithm {
    /// Every registered algorithm, `none` included
    pub const ALL: [Algorithm; 10] = [
        Algorithm::HS256,
        Algorithm::HS384,
        Algorithm::HS512,
        Algorithm::RS256,
        Algorithm::RS384,
        Algorithm::RS512,
        Algorithm::ES256,
        Algorithm::ES384,
        Algorithm::ES512,
        Algorithm::None,
    ];

    /// Look up an algorithm by its wire identifier.
    ///
    /// The match is exact and case-sensitive.
    ///
    /// # Errors
    /// Returns `UnsupportedAlgorithm` for identifiers not in the registry.
    pub fn from_name(name: &str) -> JwtResult<Self> {
        match name {
            "HS256" => Ok(Algorithm::HS256),
            "HS384" => Ok(Algorithm::HS384),
            "HS512" => Ok(Algorithm::HS512),
            "RS256" => Ok(Algorithm::RS256),
            "RS384" => Ok(Algorithm::RS384),
            "RS512" => Ok(Algorithm::RS512),
            "ES256" => Ok(Algorithm::ES256),
            "ES384" => Ok(Algorithm::ES384),
            "ES512" => Ok(Algorithm::ES512),
            "none" => Ok(Algorithm::None),
            _ => Err(JwtError::unsupported_algorithm(name)),
        }
    }

    /// Whether an identifier is in the registry
    #[must_use]
    pub fn is_supported(name: &str) -> bool {
        Self::from_name(name).is_ok()
    }

    /// Wire identifier for this algorithm
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::HS256 => "HS256",
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
            Algorithm::RS256 => "RS256",
            Algorithm::RS384 => "RS384",
            Algorithm::RS512 => "RS512",
            Algorithm::ES256 => "ES256",
            Algorithm::ES384 => "ES384",
            Algorithm::ES512 => "ES512",
            Algorithm::None => "none",
        }
    }

    /// Signing family for this algorithm
    #[must_use]
    pub const fn family(self) -> AlgorithmFamily {
        match self {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => AlgorithmFamily::Hmac,
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => AlgorithmFamily::Rsa,
            Algorithm::ES256 | Algorithm::ES384 | Algorithm::ES512 => AlgorithmFamily::Ecdsa,
            Algorithm::None => AlgorithmFamily::None,
        }
    }

    /// Digest primitive, `None` for the unsecured algorithm
    #[must_use]
    pub const fn digest(self) -> Option<Digest> {
        match self {
            Algorithm::HS256 | Algorithm::RS256 | Algorithm::ES256 => Some(Digest::Sha256),
            Algorithm::HS384 | Algorithm::RS384 | Algorithm::ES384 => Some(Digest::Sha384),
            Algorithm::HS512 | Algorithm::RS512 | Algorithm::ES512 => Some(Digest::Sha512),
            Algorithm::None => None,
        }
    }

    /// Fixed-width R||S signature length for the EC algorithms.
    ///
    /// P-521 integers are 66 bytes wide, hence 132 for ES512.
    #[must_use]
    pub const fn ec_signature_len(self) -> Option<usize> {
        match self {
            Algorithm::ES256 => Some(64),
            Algorithm::ES384 => Some(96),
            Algorithm::ES512 => Some(132),
            _ => None,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = JwtError;

    fn from_str(s: &str) -> JwtResult<Self> {
        Self::from_name(s)
    }
}

impl Serialize for Algorithm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Algorithm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Algorithm::from_name(&name).map_err(serde::de::Error::custom)
    }
}
