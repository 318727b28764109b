use crate::algorithm::Algorithm;
use crate::error::{Error, Result};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Token type written when the caller does not supply `typ`
pub const DEFAULT_TOKEN_TYPE: &str = "JWT";

/// JWT header
///
/// A mapping from string keys to JSON values. `alg` and `typ` are the only
/// fields with meaning; anything else (e.g. `cty`, `kid`) is carried through
/// verbatim.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header {
    fields: BTreeMap<String, Value>,
}

impl Header {
    /// Header with `alg` set to `algorithm` and `typ` set to `JWT`
    pub fn new(algorithm: Algorithm) -> Self {
        Self::default()
            .with("alg", algorithm.as_str())
            .with("typ", DEFAULT_TOKEN_TYPE)
    }

    /// Set a field, replacing any previous value
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a field, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    /// Get a field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Algorithm (`alg`), if present and a string
    pub fn algorithm(&self) -> Option<&str> {
        self.fields.get("alg").and_then(Value::as_str)
    }

    /// Token type (`typ`), if present and a string
    pub fn token_type(&self) -> Option<&str> {
        self.fields.get("typ").and_then(Value::as_str)
    }

    /// Content type (`cty`), if present and a string
    pub fn content_type(&self) -> Option<&str> {
        self.fields.get("cty").and_then(Value::as_str)
    }

    /// All fields
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> BTreeMap<String, Value> {
        self.fields
    }

    /// Fill in missing `alg`/`typ` and return the algorithm to sign with
    pub(crate) fn resolve_for_signing(&mut self) -> Result<Algorithm> {
        let algorithm = match self.fields.get("alg") {
            None => {
                self.insert("alg", Algorithm::default().as_str());
                Algorithm::default()
            }
            Some(Value::String(name)) => Algorithm::parse(name)?,
            Some(other) => return Err(Error::UnsupportedAlgorithm(other.to_string())),
        };

        if !self.fields.contains_key("typ") {
            self.insert("typ", DEFAULT_TOKEN_TYPE);
        }

        Ok(algorithm)
    }

    /// The raw `alg` value for error messages
    pub(crate) fn describe_algorithm(&self) -> String {
        match self.fields.get("alg") {
            Some(Value::String(name)) => name.clone(),
            Some(other) => other.to_string(),
            None => "(missing)".into(),
        }
    }
}

impl From<BTreeMap<String, Value>> for Header {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Self { fields }
    }
}

impl TryFrom<Value> for Header {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self {
                fields: map.into_iter().collect(),
            }),
            other => Err(Error::MalformedSegment(format!(
                "header must be a JSON object, found {other}"
            ))),
        }
    }
}
