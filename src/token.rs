//! The token builder: header + body ownership, signing, serialization

use std::fmt;

use serde_json::{Map, Value};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::algorithms::Algorithm;
use crate::claims::{now_epoch_seconds, ClaimTime, JwtBody};
use crate::crypto;
use crate::error::{JwtError, JwtResult};
use crate::header::JwtHeader;

/// A token under construction, or one produced by parsing/verification.
///
/// Owns exactly one header and one body. Default construction populates
/// `jti` (random v4 uuid) and `iat` (current epoch seconds) unless the
/// caller already set them, and starts with the `none` algorithm; parsed
/// tokens are built with [`Jwt::without_defaults`] so the wire content is
/// preserved exactly.
///
/// All mutation goes through the chaining setters; every mutating setter
/// invalidates the cached signature and any pinned wire string, so
/// re-serialization after a change re-signs instead of reusing stale
/// bytes.
#[derive(Clone)]
pub struct Jwt {
    header: JwtHeader,
    body: JwtBody,
    signing_key: Option<Zeroizing<Vec<u8>>>,
    signature: Option<Vec<u8>>,
    verification_input: Option<String>,
    pinned: Option<String>,
}

impl Jwt {
    /// Empty token with default `jti`/`iat` and the `none` algorithm
    #[must_use]
    pub fn new() -> Self {
        Self::with_claims(Map::new())
    }

    /// Token seeded from a claim map, with default fields applied.
    ///
    /// Caller-supplied `jti`/`iat` are never overwritten.
    #[must_use]
    pub fn with_claims(claims: Map<String, Value>) -> Self {
        let mut jwt = Self::without_defaults(claims);
        jwt.header.set_alg(Algorithm::None);
        if jwt.body.jti().is_none() {
            jwt.body
                .insert("jti", Value::String(Uuid::new_v4().to_string()));
        }
        if jwt.body.iat().is_none() {
            jwt.body.insert("iat", Value::from(now_epoch_seconds()));
        }
        jwt
    }

    /// Token seeded from a claim map with default-field population
    /// suppressed. Used by the parser, and by callers that want the body
    /// to contain exactly the supplied claims.
    #[must_use]
    pub fn without_defaults(claims: Map<String, Value>) -> Self {
        Self {
            header: JwtHeader::new(),
            body: JwtBody::from_map(claims),
            signing_key: None,
            signature: None,
            verification_input: None,
            pinned: None,
        }
    }

    /// The token header
    #[must_use]
    pub fn header(&self) -> &JwtHeader {
        &self.header
    }

    /// The token body
    #[must_use]
    pub fn body(&self) -> &JwtBody {
        &self.body
    }

    /// Raw signature bytes, present after a successful `compact()` or
    /// after parsing a three-segment token
    #[must_use]
    pub fn signature(&self) -> Option<&[u8]> {
        self.signature.as_deref()
    }

    pub(crate) fn attach_header(&mut self, header: JwtHeader) {
        self.header = header;
    }

    pub(crate) fn set_signature_bytes(&mut self, signature: Option<Vec<u8>>) {
        self.signature = signature;
    }

    pub(crate) fn set_verification_input(&mut self, input: String) {
        self.verification_input = Some(input);
    }

    pub(crate) fn verification_input(&self) -> Option<&str> {
        self.verification_input.as_deref()
    }

    /// Pin the serialized form to the wire string that was verified
    pub(crate) fn pin(&mut self, wire: &str) {
        self.pinned = Some(wire.to_string());
    }

    // Any mutation invalidates the cached signature and the pinned wire
    // string; the next compact() re-derives both segments and re-signs.
    fn touch(&mut self) {
        self.signature = None;
        self.pinned = None;
        self.verification_input = None;
    }

    /// Set a header parameter.
    ///
    /// # Errors
    /// Returns `UnsupportedAlgorithm` when setting `alg` to an
    /// unregistered identifier.
    pub fn set_header_param(mut self, key: &str, value: impl Into<Value>) -> JwtResult<Self> {
        self.touch();
        self.header.set(key, value.into())?;
        Ok(self)
    }

    /// Set a claim, registered or custom
    #[must_use]
    pub fn set_claim(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.touch();
        self.body.insert(name, value.into());
        self
    }

    /// Set the `jti` claim
    #[must_use]
    pub fn set_jti(self, jti: &str) -> Self {
        self.set_claim("jti", jti)
    }

    /// Set the `sub` claim
    #[must_use]
    pub fn set_subject(self, sub: &str) -> Self {
        self.set_claim("sub", sub)
    }

    /// Set the `iss` claim
    #[must_use]
    pub fn set_issuer(self, iss: &str) -> Self {
        self.set_claim("iss", iss)
    }

    /// Set the `iat` claim, in epoch seconds
    #[must_use]
    pub fn set_issued_at(self, iat: i64) -> Self {
        self.set_claim("iat", iat)
    }

    /// Set the `exp` claim.
    ///
    /// Accepts anything convertible to [`ClaimTime`]: a `chrono`
    /// datetime, `SystemTime`, epoch milliseconds, or a parseable date
    /// string. Stored as whole epoch seconds.
    ///
    /// # Errors
    /// Returns `InvalidTimestamp` for an unparseable date string.
    pub fn set_expiration<T>(mut self, exp: T) -> JwtResult<Self>
    where
        T: TryInto<ClaimTime>,
        JwtError: From<T::Error>,
    {
        let at: ClaimTime = exp.try_into()?;
        self.touch();
        self.body.insert("exp", Value::from(at.epoch_seconds()));
        Ok(self)
    }

    /// Remove the `exp` claim entirely
    #[must_use]
    pub fn clear_expiration(mut self) -> Self {
        self.touch();
        self.body.remove("exp");
        self
    }

    /// Set the `nbf` claim; same conversions as [`Jwt::set_expiration`]
    ///
    /// # Errors
    /// Returns `InvalidTimestamp` for an unparseable date string.
    pub fn set_not_before<T>(mut self, nbf: T) -> JwtResult<Self>
    where
        T: TryInto<ClaimTime>,
        JwtError: From<T::Error>,
    {
        let at: ClaimTime = nbf.try_into()?;
        self.touch();
        self.body.insert("nbf", Value::from(at.epoch_seconds()));
        Ok(self)
    }

    /// Remove the `nbf` claim entirely
    #[must_use]
    pub fn clear_not_before(mut self) -> Self {
        self.touch();
        self.body.remove("nbf");
        self
    }

    /// Attach the signing key. The buffer is zeroized on drop.
    #[must_use]
    pub fn set_signing_key(mut self, key: &[u8]) -> Self {
        self.touch();
        self.signing_key = Some(Zeroizing::new(key.to_vec()));
        self
    }

    /// Set the signing algorithm by wire identifier.
    ///
    /// # Errors
    /// Returns `UnsupportedAlgorithm` for identifiers not in the registry.
    pub fn set_signing_algorithm(self, alg: &str) -> JwtResult<Self> {
        let alg = Algorithm::from_name(alg)?;
        Ok(self.set_algorithm(alg))
    }

    /// Set the signing algorithm
    #[must_use]
    pub fn set_algorithm(mut self, alg: Algorithm) -> Self {
        self.touch();
        self.header.set_alg(alg);
        self
    }

    /// Whether the `exp` claim is strictly in the past
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.body
            .exp()
            .is_some_and(|exp| exp < now_epoch_seconds())
    }

    /// Whether the `nbf` claim has not been reached yet
    #[must_use]
    pub fn is_not_before(&self) -> bool {
        self.body
            .nbf()
            .is_some_and(|nbf| now_epoch_seconds() < nbf)
    }

    /// Serialize to the compact wire form.
    ///
    /// For the `none` algorithm the result is two dot-joined segments
    /// with no signature; otherwise the signature over
    /// `header_b64.body_b64` is appended as the third segment and cached
    /// for introspection. A verified token reproduces the exact wire
    /// string it was verified from.
    ///
    /// # Errors
    /// Returns `SigningKeyRequired` when a non-`none` algorithm has no
    /// signing key, and signing/serialization errors otherwise.
    pub fn compact(&mut self) -> JwtResult<String> {
        if let Some(pinned) = &self.pinned {
            return Ok(pinned.clone());
        }
        let (wire, signature) = self.render()?;
        self.signature = signature;
        Ok(wire)
    }

    // Serialization without mutating the cache; Display uses this too.
    fn render(&self) -> JwtResult<(String, Option<Vec<u8>>)> {
        let header_b64 = self.header.compact()?;
        let body_b64 = self.body.compact()?;
        let message = format!("{header_b64}.{body_b64}");

        let alg = self.header.alg();
        if alg == Algorithm::None {
            return Ok((message, None));
        }

        let key = self
            .signing_key
            .as_ref()
            .ok_or(JwtError::SigningKeyRequired(None))?;
        let signature = crypto::sign(alg, &message, key)?;
        let signature_b64 = crate::codec::base64url_encode(&signature);
        tracing::debug!(alg = %alg, "signed compact token");
        Ok((format!("{message}.{signature_b64}"), Some(signature)))
    }
}

impl Default for Jwt {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Jwt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(pinned) = &self.pinned {
            return f.write_str(pinned);
        }
        match self.render() {
            Ok((wire, _)) => f.write_str(&wire),
            // A token that cannot be signed yet (no key attached) still
            // has a printable form: the unsigned segments. The typed
            // error stays on compact().
            Err(_) => match (self.header.compact(), self.body.compact()) {
                (Ok(header), Ok(body)) => write!(f, "{header}.{body}"),
                _ => Err(fmt::Error),
            },
        }
    }
}

// Keeps the signing key out of debug output.
impl fmt::Debug for Jwt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Jwt")
            .field("header", &self.header)
            .field("body", &self.body)
            .field("has_signing_key", &self.signing_key.is_some())
            .field("signature_len", &self.signature.as_ref().map(Vec::len))
            .field("pinned", &self.pinned.is_some())
            .finish()
    }
}
