//! Token header value object

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::algorithms::Algorithm;
use crate::codec;
use crate::error::{JwtError, JwtResult};

/// Token header: `typ`, `alg`, and pass-through parameters.
///
/// `alg` is validated against the registry whenever it is set; an unknown
/// identifier is rejected immediately rather than surfacing later during
/// serialization or verification. Additional parameters (`kid` and
/// friends) are kept verbatim in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct JwtHeader {
    typ: String,
    alg: Algorithm,
    params: Map<String, Value>,
}

impl JwtHeader {
    /// New header with `typ: "JWT"` and `alg: HS256`
    #[must_use]
    pub fn new() -> Self {
        Self {
            typ: "JWT".to_string(),
            alg: Algorithm::HS256,
            params: Map::new(),
        }
    }

    /// Build a header from decoded JSON.
    ///
    /// `typ` defaults to `"JWT"` when absent. `alg` is required and must
    /// name a registered algorithm.
    ///
    /// # Errors
    /// Returns `UnsupportedAlgorithm` when `alg` is missing, not a string,
    /// or not in the registry.
    pub(crate) fn from_map(map: Map<String, Value>) -> JwtResult<Self> {
        let typ = map
            .get("typ")
            .and_then(Value::as_str)
            .unwrap_or("JWT")
            .to_string();

        let alg = match map.get("alg") {
            Some(Value::String(name)) => Algorithm::from_name(name)?,
            Some(other) => return Err(JwtError::UnsupportedAlgorithm(other.to_string())),
            None => return Err(JwtError::unsupported_algorithm("")),
        };

        let params = map
            .into_iter()
            .filter(|(key, _)| key != "typ" && key != "alg")
            .collect();

        Ok(Self { typ, alg, params })
    }

    /// Token type, normally `"JWT"`
    #[must_use]
    pub fn typ(&self) -> &str {
        &self.typ
    }

    /// Signing algorithm
    #[must_use]
    pub fn alg(&self) -> Algorithm {
        self.alg
    }

    pub(crate) fn set_alg(&mut self, alg: Algorithm) {
        self.alg = alg;
    }

    /// Key id parameter, when present
    #[must_use]
    pub fn kid(&self) -> Option<&str> {
        self.params.get("kid").and_then(Value::as_str)
    }

    /// Parameter by name, reserved keys included
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            "typ" => Some(Value::String(self.typ.clone())),
            "alg" => Some(Value::String(self.alg.name().to_string())),
            _ => self.params.get(key).cloned(),
        }
    }

    /// Set a header parameter.
    ///
    /// Setting `alg` goes through the registry; setting `typ` requires a
    /// string. Everything else passes through verbatim.
    ///
    /// # Errors
    /// Returns `UnsupportedAlgorithm` for an unregistered `alg` value and
    /// `Serialization` for a non-string `typ`.
    pub fn set(&mut self, key: &str, value: Value) -> JwtResult<()> {
        match key {
            "alg" => {
                let name = match &value {
                    Value::String(name) => name.as_str(),
                    other => return Err(JwtError::UnsupportedAlgorithm(other.to_string())),
                };
                self.alg = Algorithm::from_name(name)?;
            }
            "typ" => {
                let name = value
                    .as_str()
                    .ok_or_else(|| JwtError::serialization("typ must be a string"))?;
                self.typ = name.to_string();
            }
            _ => {
                self.params.insert(key.to_string(), value);
            }
        }
        Ok(())
    }

    /// base64url-encoded JSON form of this header
    ///
    /// # Errors
    /// Returns `Serialization` if JSON encoding fails.
    pub fn compact(&self) -> JwtResult<String> {
        codec::compact_json(self)
    }
}

impl Default for JwtHeader {
    fn default() -> Self {
        Self::new()
    }
}

// typ and alg always serialize first, then pass-through parameters in
// insertion order. The signature covers these exact bytes.
impl Serialize for JwtHeader {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2 + self.params.len()))?;
        map.serialize_entry("typ", &self.typ)?;
        map.serialize_entry("alg", self.alg.name())?;
        for (key, value) in &self.params {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_reserved_keys_first() {
        let mut header = JwtHeader::new();
        header.set("kid", json!("key-1")).unwrap();
        let json = serde_json::to_string(&header).unwrap();
        assert_eq!(json, r#"{"typ":"JWT","alg":"HS256","kid":"key-1"}"#);
    }

    #[test]
    fn unknown_alg_is_rejected_at_set_time() {
        let mut header = JwtHeader::new();
        assert!(matches!(
            header.set("alg", json!("HS257")),
            Err(JwtError::UnsupportedAlgorithm(_))
        ));
        assert!(matches!(
            header.set("alg", json!(42)),
            Err(JwtError::UnsupportedAlgorithm(_))
        ));
        // the failed set leaves the header untouched
        assert_eq!(header.alg(), Algorithm::HS256);
    }

    #[test]
    fn from_map_requires_alg() {
        let map = serde_json::from_str::<Map<String, Value>>(r#"{"typ":"JWT"}"#).unwrap();
        assert!(matches!(
            JwtHeader::from_map(map),
            Err(JwtError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn from_map_keeps_extra_params() {
        let map =
            serde_json::from_str::<Map<String, Value>>(r#"{"alg":"none","kid":"abc","x5t":"t"}"#)
                .unwrap();
        let header = JwtHeader::from_map(map).unwrap();
        assert_eq!(header.typ(), "JWT");
        assert_eq!(header.alg(), Algorithm::None);
        assert_eq!(header.kid(), Some("abc"));
        assert_eq!(header.get("x5t"), Some(json!("t")));
    }
}
