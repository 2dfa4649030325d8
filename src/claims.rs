//! Token body (claims) value object and temporal-claim normalization

use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::codec;
use crate::error::{JwtError, JwtResult};

/// Current time as Unix seconds
pub(crate) fn now_epoch_seconds() -> i64 {
    Utc::now().timestamp()
}

/// Token body: an ordered map of registered and custom claims.
///
/// Claims keep their insertion order through serialization. Temporal
/// claims (`iat`, `exp`, `nbf`) are always stored as integer Unix
/// seconds; the typed setters on `Jwt` normalize other representations
/// before anything lands here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JwtBody {
    claims: Map<String, Value>,
}

impl JwtBody {
    /// Empty body
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Body seeded from a claim map
    #[must_use]
    pub fn from_map(claims: Map<String, Value>) -> Self {
        Self { claims }
    }

    /// Claim by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// Whether a claim is present
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.claims.contains_key(name)
    }

    /// Number of claims
    #[must_use]
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Whether the body has no claims
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.claims.insert(name.into(), value);
    }

    pub(crate) fn remove(&mut self, name: &str) {
        self.claims.remove(name);
    }

    /// The underlying claim map
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.claims
    }

    /// `jti` claim
    #[must_use]
    pub fn jti(&self) -> Option<&str> {
        self.claims.get("jti").and_then(Value::as_str)
    }

    /// `sub` claim
    #[must_use]
    pub fn sub(&self) -> Option<&str> {
        self.claims.get("sub").and_then(Value::as_str)
    }

    /// `iss` claim
    #[must_use]
    pub fn iss(&self) -> Option<&str> {
        self.claims.get("iss").and_then(Value::as_str)
    }

    /// `iat` claim, Unix seconds
    #[must_use]
    pub fn iat(&self) -> Option<i64> {
        self.claims.get("iat").and_then(Value::as_i64)
    }

    /// `exp` claim, Unix seconds
    #[must_use]
    pub fn exp(&self) -> Option<i64> {
        self.claims.get("exp").and_then(Value::as_i64)
    }

    /// `nbf` claim, Unix seconds
    #[must_use]
    pub fn nbf(&self) -> Option<i64> {
        self.claims.get("nbf").and_then(Value::as_i64)
    }

    /// base64url-encoded JSON form of this body
    ///
    /// # Errors
    /// Returns `Serialization` if JSON encoding fails.
    pub fn compact(&self) -> JwtResult<String> {
        codec::compact_json(self)
    }
}

/// A point in time accepted by the temporal-claim setters.
///
/// Converts from `chrono` datetimes, `SystemTime`, epoch *milliseconds*
/// (`i64`, matching the usual JavaScript-epoch convention for raw
/// numbers), and RFC 3339 / RFC 2822 strings. Whatever the input, the
/// claim is stored as whole Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimTime(i64);

impl ClaimTime {
    /// Unix seconds this time normalizes to
    #[must_use]
    pub fn epoch_seconds(self) -> i64 {
        self.0
    }

    /// From whole Unix seconds, no conversion
    #[must_use]
    pub fn from_epoch_seconds(secs: i64) -> Self {
        Self(secs)
    }
}

impl From<DateTime<Utc>> for ClaimTime {
    fn from(at: DateTime<Utc>) -> Self {
        Self(at.timestamp())
    }
}

impl From<SystemTime> for ClaimTime {
    fn from(at: SystemTime) -> Self {
        Self(DateTime::<Utc>::from(at).timestamp())
    }
}

impl From<i64> for ClaimTime {
    fn from(epoch_millis: i64) -> Self {
        Self(epoch_millis.div_euclid(1000))
    }
}

impl TryFrom<&str> for ClaimTime {
    type Error = JwtError;

    fn try_from(text: &str) -> JwtResult<Self> {
        DateTime::parse_from_rfc3339(text)
            .or_else(|_| DateTime::parse_from_rfc2822(text))
            .map(|at| Self(at.timestamp()))
            .map_err(|_| JwtError::InvalidTimestamp(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_keeps_insertion_order() {
        let mut body = JwtBody::new();
        body.insert("zeta", json!(1));
        body.insert("alpha", json!(2));
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"zeta":1,"alpha":2}"#
        );
    }

    #[test]
    fn typed_accessors() {
        let mut body = JwtBody::new();
        body.insert("sub", json!("user-9"));
        body.insert("exp", json!(1_700_000_000));
        assert_eq!(body.sub(), Some("user-9"));
        assert_eq!(body.exp(), Some(1_700_000_000));
        assert_eq!(body.nbf(), None);
    }

    #[test]
    fn millis_normalize_to_seconds() {
        assert_eq!(ClaimTime::from(1_700_000_000_500_i64).epoch_seconds(), 1_700_000_000);
        // floors toward negative infinity, like a JS Date would
        assert_eq!(ClaimTime::from(-1500_i64).epoch_seconds(), -2);
    }

    #[test]
    fn datetime_and_string_inputs() {
        let at = Utc::now();
        assert_eq!(ClaimTime::from(at).epoch_seconds(), at.timestamp());

        let parsed = ClaimTime::try_from("2030-01-02T03:04:05Z").unwrap();
        assert_eq!(parsed.epoch_seconds(), 1_893_553_445);

        assert!(matches!(
            ClaimTime::try_from("not a date"),
            Err(JwtError::InvalidTimestamp(_))
        ));
    }
}
