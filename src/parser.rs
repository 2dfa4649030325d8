//! Compact wire-string parser
//!
//! Splits and decodes a token without touching cryptography. Structural
//! failures carry whatever header/body decoded before the failure point.

use serde_json::{Map, Value};

use crate::codec;
use crate::error::{JwtError, JwtResult, ParseFailure};
use crate::header::JwtHeader;
use crate::token::Jwt;

/// Parser for the compact serialization
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser;

impl Parser {
    /// New parser
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse a compact wire string into an unverified [`Jwt`].
    ///
    /// The token is built with default-claim suppression: `jti`/`iat` are
    /// never injected, so the body is exactly what was encoded. The exact
    /// `header_b64.body_b64` substring is retained as the verification
    /// input; re-deriving it from the parsed JSON would be unsafe, since
    /// re-serialization is not guaranteed byte-identical and the
    /// signature covers the original bytes.
    ///
    /// # Errors
    /// Returns `Parse` for a wrong segment count, undecodable base64url,
    /// or invalid JSON, and `UnsupportedAlgorithm` when the header names
    /// an algorithm outside the registry.
    pub fn parse(&self, token: &str) -> JwtResult<Jwt> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() < 2 || segments.len() > 3 {
            return Err(JwtError::Parse(ParseFailure::new(token)));
        }

        let header_value = decode_json_segment(segments[0])
            .map_err(|cause| JwtError::Parse(ParseFailure::new(token).with_cause(cause)))?;
        let body_value = decode_json_segment(segments[1]).map_err(|cause| {
            JwtError::Parse(
                ParseFailure::new(token)
                    .with_header(Some(header_value.clone()))
                    .with_cause(cause),
            )
        })?;

        let signature = match segments.get(2) {
            Some(segment) if !segment.is_empty() => {
                Some(codec::base64url_decode(segment).map_err(|cause| {
                    JwtError::Parse(
                        ParseFailure::new(token)
                            .with_header(Some(header_value.clone()))
                            .with_body(Some(body_value.clone()))
                            .with_cause(cause),
                    )
                })?)
            }
            _ => None,
        };

        let header_map = into_object(header_value, token, "header", None)?;
        let body_header_ctx = Value::Object(header_map.clone());
        let body_map = into_object(body_value, token, "body", Some(body_header_ctx))?;

        let header = JwtHeader::from_map(header_map)?;

        let mut jwt = Jwt::without_defaults(body_map);
        jwt.attach_header(header);
        jwt.set_signature_bytes(signature);
        jwt.set_verification_input(format!("{}.{}", segments[0], segments[1]));

        Ok(jwt)
    }
}

fn decode_json_segment(segment: &str) -> Result<Value, crate::error::BoxError> {
    let bytes = codec::base64url_decode(segment)?;
    let value = serde_json::from_slice(&bytes)?;
    Ok(value)
}

fn into_object(
    value: Value,
    token: &str,
    part: &str,
    header_ctx: Option<Value>,
) -> JwtResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => {
            let failure = ParseFailure::new(token)
                .with_header(header_ctx)
                .with_cause(format!("{part} is not a JSON object: {other}"));
            Err(JwtError::Parse(failure))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::base64url_encode;

    fn segment(json: &str) -> String {
        base64url_encode(json.as_bytes())
    }

    #[test]
    fn rejects_wrong_segment_counts() {
        for token in ["", "one-segment", "a.b.c.d"] {
            let err = Parser::new().parse(token).unwrap_err();
            assert!(matches!(err, JwtError::Parse(_)), "{token}: {err:?}");
            assert_eq!(err.token(), Some(token));
            assert!(err.parsed_header().is_none());
        }
    }

    #[test]
    fn header_decode_failure_carries_no_header() {
        let token = format!("!!!.{}", segment("{}"));
        let err = Parser::new().parse(&token).unwrap_err();
        assert!(matches!(err, JwtError::Parse(_)));
        assert!(err.parsed_header().is_none());
        assert!(err.cause().is_some());
    }

    #[test]
    fn body_decode_failure_carries_the_header() {
        let token = format!("{}.%%%", segment(r#"{"alg":"none"}"#));
        let err = Parser::new().parse(&token).unwrap_err();
        assert!(matches!(err, JwtError::Parse(_)));
        let header = err.parsed_header().unwrap();
        assert_eq!(header["alg"], "none");
        assert!(err.parsed_body().is_none());
    }

    #[test]
    fn non_object_body_is_structural() {
        let token = format!("{}.{}", segment(r#"{"alg":"none"}"#), segment("42"));
        let err = Parser::new().parse(&token).unwrap_err();
        assert!(matches!(err, JwtError::Parse(_)));
        assert!(err.parsed_header().is_some());
    }

    #[test]
    fn unsupported_algorithm_is_its_own_kind() {
        let token = format!("{}.{}", segment(r#"{"alg":"HS999"}"#), segment("{}"));
        assert!(matches!(
            Parser::new().parse(&token),
            Err(JwtError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn parse_preserves_claims_without_injecting_defaults() {
        let token = format!(
            "{}.{}",
            segment(r#"{"alg":"none","typ":"JWT"}"#),
            segment(r#"{"hello":"world"}"#)
        );
        let jwt = Parser::new().parse(&token).unwrap();
        assert!(jwt.body().jti().is_none());
        assert!(jwt.body().iat().is_none());
        assert_eq!(jwt.body().get("hello").unwrap(), "world");
        assert!(jwt.signature().is_none());
    }

    #[test]
    fn verification_input_is_the_original_bytes() {
        let header = segment(r#"{"alg":"HS256","typ":"JWT"}"#);
        let body = segment(r#"{"a":1}"#);
        let signature = base64url_encode(b"xxxxxxxx");
        let token = format!("{header}.{body}.{signature}");
        let jwt = Parser::new().parse(&token).unwrap();
        assert_eq!(
            jwt.verification_input(),
            Some(format!("{header}.{body}").as_str())
        );
        assert_eq!(jwt.signature(), Some(b"xxxxxxxx".as_slice()));
    }

    #[test]
    fn empty_third_segment_means_no_signature() {
        let token = format!("{}.{}.", segment(r#"{"alg":"none"}"#), segment("{}"));
        let jwt = Parser::new().parse(&token).unwrap();
        assert!(jwt.signature().is_none());
    }

    #[test]
    fn undecodable_signature_segment_is_structural() {
        let token = format!(
            "{}.{}.{}",
            segment(r#"{"alg":"HS256"}"#),
            segment("{}"),
            "***"
        );
        let err = Parser::new().parse(&token).unwrap_err();
        assert!(matches!(err, JwtError::Parse(_)));
        assert!(err.parsed_header().is_some());
        assert!(err.parsed_body().is_some());
    }
}
