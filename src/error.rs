//! Error types for token construction, parsing, and verification

use serde_json::Value;
use thiserror::Error;

/// Token operation result type
pub type JwtResult<T> = Result<T, JwtError>;

/// Boxed error used for resolver and decode causes
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Diagnostic payload carried by failures raised after parsing has started.
///
/// Retains the original wire string and whatever header/body was
/// successfully decoded before the failure point, so callers can log and
/// inspect a rejected token without re-parsing it.
#[derive(Debug)]
pub struct ParseFailure {
    /// The wire string that was being processed
    pub token: String,
    /// Header JSON, if it decoded successfully
    pub header: Option<Value>,
    /// Body JSON, if it decoded successfully
    pub body: Option<Value>,
    /// Underlying cause, when one exists (JSON error, resolver error, ...)
    pub cause: Option<BoxError>,
}

impl ParseFailure {
    pub(crate) fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            header: None,
            body: None,
            cause: None,
        }
    }

    #[must_use]
    pub(crate) fn with_header(mut self, header: Option<Value>) -> Self {
        self.header = header;
        self
    }

    #[must_use]
    pub(crate) fn with_body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub(crate) fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

/// Token error taxonomy
///
/// A closed set of failure kinds. Kinds that arise while processing an
/// incoming wire string carry a [`ParseFailure`] with the original token
/// and any partially parsed header/body.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Algorithm identifier is not in the registry
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),
    /// A non-`none` algorithm was used without a signing key.
    ///
    /// Raised while building (no payload) and while verifying, where it
    /// carries the token under inspection.
    #[error("signing key is required")]
    SigningKeyRequired(Option<ParseFailure>),
    /// Wrong segment count, undecodable base64url, or invalid JSON
    #[error("jwt cannot be parsed")]
    Parse(ParseFailure),
    /// Header `alg` differs from the verifier's configured algorithm
    #[error("unexpected signature algorithm")]
    AlgorithmMismatch(ParseFailure),
    /// The `exp` claim is in the past
    #[error("jwt is expired")]
    Expired(ParseFailure),
    /// The `nbf` claim has not been reached yet
    #[error("jwt not active")]
    NotActive(ParseFailure),
    /// The key resolver reported an error; the cause is retained
    #[error("signing key could not be resolved")]
    KeyResolution(ParseFailure),
    /// Cryptographic check failed, or an EC signature could not be re-encoded
    #[error("signature verification failed")]
    SignatureMismatch(ParseFailure),
    /// Key material could not be decoded for the selected algorithm
    #[error("invalid key: {0}")]
    InvalidKey(String),
    /// A date handed to a temporal-claim setter could not be interpreted
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
    /// JSON serialization failed
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl JwtError {
    /// Create an unsupported algorithm error
    #[inline]
    #[must_use]
    pub fn unsupported_algorithm(alg: &str) -> Self {
        JwtError::UnsupportedAlgorithm(alg.to_string())
    }

    /// Create an invalid key error
    #[inline]
    #[must_use]
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        JwtError::InvalidKey(msg.into())
    }

    /// Create a serialization error
    #[inline]
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        JwtError::Serialization(msg.into())
    }

    /// The diagnostic payload, for kinds that carry one
    #[must_use]
    pub fn parse_failure(&self) -> Option<&ParseFailure> {
        match self {
            JwtError::Parse(f)
            | JwtError::AlgorithmMismatch(f)
            | JwtError::Expired(f)
            | JwtError::NotActive(f)
            | JwtError::KeyResolution(f)
            | JwtError::SignatureMismatch(f) => Some(f),
            JwtError::SigningKeyRequired(f) => f.as_ref(),
            _ => None,
        }
    }

    /// The original wire string, when the failure carries one
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.parse_failure().map(|f| f.token.as_str())
    }

    /// Header JSON parsed before the failure point, if any
    #[must_use]
    pub fn parsed_header(&self) -> Option<&Value> {
        self.parse_failure().and_then(|f| f.header.as_ref())
    }

    /// Body JSON parsed before the failure point, if any
    #[must_use]
    pub fn parsed_body(&self) -> Option<&Value> {
        self.parse_failure().and_then(|f| f.body.as_ref())
    }

    /// Underlying cause, when one was recorded
    #[must_use]
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync)> {
        self.parse_failure().and_then(|f| f.cause.as_deref())
    }
}

impl From<std::convert::Infallible> for JwtError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}
