//! Parsing through the public surface: wire fidelity and diagnostics

use tokenseal::{base64url_encode, Algorithm, JwtError, Parser};

fn segment(json: &str) -> String {
    base64url_encode(json.as_bytes())
}

#[test]
fn parse_keeps_the_exact_claim_order() {
    let body = r#"{"zeta":1,"alpha":2,"mid":3}"#;
    let token = format!("{}.{}", segment(r#"{"typ":"JWT","alg":"none"}"#), segment(body));
    let mut jwt = Parser::new().parse(&token).unwrap();
    // No signature and no mutation: re-serialization reproduces the body
    // byte for byte.
    assert_eq!(jwt.compact().unwrap(), token);
}

#[test]
fn header_typ_defaults_to_jwt() {
    let token = format!("{}.{}", segment(r#"{"alg":"none"}"#), segment("{}"));
    let jwt = Parser::new().parse(&token).unwrap();
    assert_eq!(jwt.header().typ(), "JWT");
    assert_eq!(jwt.header().alg(), Algorithm::None);
}

#[test]
fn extra_header_params_survive_parsing() {
    let token = format!(
        "{}.{}",
        segment(r#"{"alg":"none","kid":"key-7","cty":"JWT"}"#),
        segment("{}")
    );
    let jwt = Parser::new().parse(&token).unwrap();
    assert_eq!(jwt.header().kid(), Some("key-7"));
    assert_eq!(jwt.header().get("cty").unwrap(), "JWT");
}

#[test]
fn padded_base64_segments_are_tolerated() {
    // Standard-padded encodings of the same JSON still parse.
    let token = format!("{}.{}", "eyJhbGciOiJub25lIn0=", segment(r#"{"a":1}"#));
    let jwt = Parser::new().parse(&token).unwrap();
    assert_eq!(jwt.header().alg(), Algorithm::None);
}

#[test]
fn parse_error_diagnostics_reach_the_caller() {
    let token = format!("{}.{}", segment(r#"{"alg":"none"}"#), "not-json-at-all");
    let err = tokenseal::verify_unsigned(&token).unwrap_err();
    assert!(matches!(err, JwtError::Parse(_)));
    assert_eq!(err.token(), Some(token.as_str()));
    assert_eq!(err.parsed_header().unwrap()["alg"], "none");
    assert!(err.cause().is_some());
    // Display stays terse; detail lives in the payload accessors.
    assert!(!err.to_string().is_empty());
}

#[test]
fn missing_alg_is_unsupported() {
    let token = format!("{}.{}", segment(r#"{"typ":"JWT"}"#), segment("{}"));
    assert!(matches!(
        Parser::new().parse(&token),
        Err(JwtError::UnsupportedAlgorithm(_))
    ));
}

#[test]
fn case_sensitive_algorithm_names() {
    let token = format!("{}.{}", segment(r#"{"alg":"hs256"}"#), segment("{}"));
    assert!(matches!(
        Parser::new().parse(&token),
        Err(JwtError::UnsupportedAlgorithm(_))
    ));
}
