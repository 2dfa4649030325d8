//! Token verification: algorithm pinning, temporal checks, key
//! resolution, signature validation
//!
//! One internal decision routine backs both the synchronous and the
//! asynchronous entry points; they differ only at the single suspension
//! point, key resolution.

use futures::future::BoxFuture;
use serde_json::Value;
use zeroize::Zeroizing;

use crate::algorithms::Algorithm;
use crate::crypto;
use crate::error::{BoxError, JwtError, JwtResult, ParseFailure};
use crate::parser::Parser;
use crate::token::Jwt;

/// Resolves the verification key for a token, keyed by the header `kid`.
///
/// Called exactly once per verification; returning the `Result` is the
/// single completion, so a double callback cannot be expressed. An error
/// surfaces to the caller as `KeyResolution` with the original error as
/// cause.
pub trait KeyResolver: Send + Sync {
    /// Resolve the key for `kid` (absent when the header has no `kid`)
    ///
    /// # Errors
    /// Any error; it is wrapped in `KeyResolution`.
    fn resolve(&self, kid: Option<&str>) -> Result<Vec<u8>, BoxError>;
}

impl<F> KeyResolver for F
where
    F: Fn(Option<&str>) -> Result<Vec<u8>, BoxError> + Send + Sync,
{
    fn resolve(&self, kid: Option<&str>) -> Result<Vec<u8>, BoxError> {
        (self)(kid)
    }
}

/// Asynchronous flavor of [`KeyResolver`], for keys that live behind an
/// await point. Only usable through [`Verifier::verify_async`].
pub trait AsyncKeyResolver: Send + Sync {
    /// Resolve the key for `kid`
    fn resolve<'a>(&'a self, kid: Option<&'a str>) -> BoxFuture<'a, Result<Vec<u8>, BoxError>>;
}

enum Resolver {
    /// No resolver configured: the static key is used as-is
    Static,
    Sync(Box<dyn KeyResolver>),
    Async(Box<dyn AsyncKeyResolver>),
}

/// Verifier for compact wire strings.
///
/// Expects HS256 by default; `none` tokens are only accepted when the
/// verifier is explicitly configured for `none`. Checks run in a fixed
/// order and short-circuit on the first failure: parse, algorithm pin,
/// `exp`, `nbf`, key resolution, signature.
pub struct Verifier {
    signing_algorithm: Algorithm,
    signing_key: Option<Zeroizing<Vec<u8>>>,
    resolver: Resolver,
}

impl Verifier {
    /// New verifier expecting HS256 and holding no key
    #[must_use]
    pub fn new() -> Self {
        Self {
            signing_algorithm: Algorithm::HS256,
            signing_key: None,
            resolver: Resolver::Static,
        }
    }

    /// Set the expected algorithm by wire identifier.
    ///
    /// # Errors
    /// Returns `UnsupportedAlgorithm` for identifiers not in the registry.
    pub fn set_signing_algorithm(self, alg: &str) -> JwtResult<Self> {
        let alg = Algorithm::from_name(alg)?;
        Ok(self.with_algorithm(alg))
    }

    /// Set the expected algorithm
    #[must_use]
    pub fn with_algorithm(mut self, alg: Algorithm) -> Self {
        self.signing_algorithm = alg;
        self
    }

    /// Set the static verification key
    #[must_use]
    pub fn set_signing_key(mut self, key: &[u8]) -> Self {
        self.signing_key = Some(Zeroizing::new(key.to_vec()));
        self
    }

    /// Install a synchronous key resolver; replaces any previous resolver
    #[must_use]
    pub fn with_key_resolver(mut self, resolver: impl KeyResolver + 'static) -> Self {
        self.resolver = Resolver::Sync(Box::new(resolver));
        self
    }

    /// Install an asynchronous key resolver; replaces any previous
    /// resolver. A verifier holding an async resolver must be driven
    /// through [`Verifier::verify_async`].
    #[must_use]
    pub fn with_async_key_resolver(mut self, resolver: impl AsyncKeyResolver + 'static) -> Self {
        self.resolver = Resolver::Async(Box::new(resolver));
        self
    }

    /// Verify a wire string synchronously.
    ///
    /// Precondition: the configured resolver, if any, completes without
    /// suspending. An async-only resolver cannot be driven from here and
    /// is reported as `KeyResolution`.
    ///
    /// # Errors
    /// One of the taxonomy kinds; see the crate error documentation.
    pub fn verify(&self, token: &str) -> JwtResult<Jwt> {
        let pending = self.begin(token)?;
        let key = match &self.resolver {
            Resolver::Static => self.signing_key.as_ref().map(|key| key.to_vec()),
            Resolver::Sync(resolver) => {
                Some(self.resolve_with(resolver.as_ref(), &pending)?)
            }
            Resolver::Async(_) => {
                return Err(JwtError::KeyResolution(
                    pending
                        .failure()
                        .with_cause("async key resolver requires verify_async"),
                ));
            }
        };
        self.finish(pending, key.as_deref())
    }

    /// Verify a wire string, suspending at key resolution if the
    /// configured resolver is asynchronous. Decision logic is identical
    /// to [`Verifier::verify`].
    ///
    /// # Errors
    /// One of the taxonomy kinds; see the crate error documentation.
    pub async fn verify_async(&self, token: &str) -> JwtResult<Jwt> {
        let pending = self.begin(token)?;
        let key = match &self.resolver {
            Resolver::Static => self.signing_key.as_ref().map(|key| key.to_vec()),
            Resolver::Sync(resolver) => {
                Some(self.resolve_with(resolver.as_ref(), &pending)?)
            }
            Resolver::Async(resolver) => {
                let kid = pending.kid.clone();
                match resolver.resolve(kid.as_deref()).await {
                    Ok(key) => Some(key),
                    Err(cause) => {
                        return Err(JwtError::KeyResolution(
                            pending.failure().with_cause(cause),
                        ))
                    }
                }
            }
        };
        self.finish(pending, key.as_deref())
    }

    fn resolve_with(&self, resolver: &dyn KeyResolver, pending: &Pending) -> JwtResult<Vec<u8>> {
        resolver
            .resolve(pending.kid.as_deref())
            .map_err(|cause| JwtError::KeyResolution(pending.failure().with_cause(cause)))
    }

    // Steps 1-4: parse, pin the algorithm, check exp, check nbf.
    fn begin(&self, token: &str) -> JwtResult<Pending> {
        let jwt = Parser::new().parse(token)?;

        if jwt.header().alg() != self.signing_algorithm {
            return Err(JwtError::AlgorithmMismatch(failure_for(token, &jwt)));
        }
        if jwt.is_expired() {
            return Err(JwtError::Expired(failure_for(token, &jwt)));
        }
        if jwt.is_not_before() {
            return Err(JwtError::NotActive(failure_for(token, &jwt)));
        }

        let kid = jwt.header().kid().map(str::to_owned);
        Ok(Pending {
            token: token.to_string(),
            kid,
            jwt,
        })
    }

    // Steps 6-8: signature validation and result construction.
    fn finish(&self, pending: Pending, key: Option<&[u8]>) -> JwtResult<Jwt> {
        let Pending { token, jwt, .. } = pending;
        let alg = jwt.header().alg();

        if alg != Algorithm::None {
            let key = match key {
                Some(key) => key,
                None => {
                    return Err(JwtError::SigningKeyRequired(Some(failure_for(
                        &token, &jwt,
                    ))))
                }
            };
            let Some(input) = jwt.verification_input() else {
                return Err(JwtError::SignatureMismatch(failure_for(&token, &jwt)));
            };
            let signature = jwt.signature().unwrap_or(&[]);
            match crypto::verify(alg, input, signature, key) {
                Ok(true) => {}
                Ok(false) => {
                    tracing::debug!(alg = %alg, "signature mismatch");
                    return Err(JwtError::SignatureMismatch(failure_for(&token, &jwt)));
                }
                Err(cause) => {
                    return Err(JwtError::SignatureMismatch(
                        failure_for(&token, &jwt).with_cause(cause),
                    ));
                }
            }
        }

        // Fresh token from the parsed body, no default-claim injection,
        // serialized form pinned to the verified wire string.
        let mut verified = Jwt::without_defaults(jwt.body().as_map().clone());
        verified.attach_header(jwt.header().clone());
        verified.set_signature_bytes(jwt.signature().map(<[u8]>::to_vec));
        verified.pin(&token);
        Ok(verified)
    }
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new()
    }
}

struct Pending {
    token: String,
    kid: Option<String>,
    jwt: Jwt,
}

impl Pending {
    fn failure(&self) -> ParseFailure {
        failure_for(&self.token, &self.jwt)
    }
}

fn failure_for(token: &str, jwt: &Jwt) -> ParseFailure {
    ParseFailure::new(token)
        .with_header(serde_json::to_value(jwt.header()).ok())
        .with_body(Some(Value::Object(jwt.body().as_map().clone())))
}
