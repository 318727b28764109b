//! Claims for JWT tokens
//!
//! This module provides the [`Payload`] claim set and the time-based
//! validation applied to it (`exp`, `nbf`). Every other claim is opaque:
//! `iss`, `sub`, `aud`, `iat` and `jti` are readable but never checked.

use crate::error::{Error, Result};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// JWT payload (claim set)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload {
    claims: BTreeMap<String, Value>,
}

impl Payload {
    /// Create an empty payload
    pub fn new() -> Self {
        Self::default()
    }

    /// Payload for a token issued on behalf of an API key
    ///
    /// Sets `iss` to the key, `iat` to `issued_at`, `exp` to `issued_at + ttl`
    /// and `jti` to `"{api_key}-{issued_at}"`.
    pub fn issue(api_key: &str, issued_at: i64, ttl_seconds: u64) -> Self {
        let expires_at = issued_at.saturating_add(i64::try_from(ttl_seconds).unwrap_or(i64::MAX));
        Self::new()
            .with("iss", api_key)
            .with("iat", issued_at)
            .with("exp", expires_at)
            .with("jti", format!("{api_key}-{issued_at}"))
    }

    /// Set a claim, replacing any previous value
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a claim, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.claims.insert(key.into(), value.into())
    }

    /// Get a claim
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.claims.get(key)
    }

    /// All claims
    pub fn claims(&self) -> &BTreeMap<String, Value> {
        &self.claims
    }

    pub fn into_claims(self) -> BTreeMap<String, Value> {
        self.claims
    }

    /// Issuer (iss)
    pub fn issuer(&self) -> Option<&str> {
        self.string_claim("iss")
    }

    /// Subject (sub)
    pub fn subject(&self) -> Option<&str> {
        self.string_claim("sub")
    }

    /// Audience (aud), passed through as-is (string or array)
    pub fn audience(&self) -> Option<&Value> {
        self.claims.get("aud")
    }

    /// JWT ID (jti)
    pub fn jwt_id(&self) -> Option<&str> {
        self.string_claim("jti")
    }

    /// Expiration Time (exp), if present and numeric
    pub fn expiration(&self) -> Option<i64> {
        self.numeric_date("exp").ok().flatten()
    }

    /// Not Before (nbf), if present and numeric
    pub fn not_before(&self) -> Option<i64> {
        self.numeric_date("nbf").ok().flatten()
    }

    /// Issued At (iat), if present and numeric
    pub fn issued_at(&self) -> Option<i64> {
        self.numeric_date("iat").ok().flatten()
    }

    fn string_claim(&self, key: &str) -> Option<&str> {
        self.claims.get(key).and_then(Value::as_str)
    }

    /// Read a NumericDate claim in whole seconds
    ///
    /// Absent is `Ok(None)`; present but not a JSON number is an error.
    /// Fractional seconds are floored.
    pub(crate) fn numeric_date(&self, claim: &str) -> Result<Option<i64>> {
        match self.claims.get(claim) {
            None => Ok(None),
            Some(Value::Number(n)) => {
                let seconds = match n.as_i64() {
                    Some(seconds) => seconds,
                    None => n.as_f64().map_or(i64::MAX, |f| f.floor() as i64),
                };
                Ok(Some(seconds))
            }
            Some(other) => Err(Error::InvalidClaim(format!(
                "'{claim}' must be a number of seconds, found {other}"
            ))),
        }
    }

    /// Check that the time claims enforced on verify have the right JSON type
    ///
    /// `iat` is informational and left as given.
    pub(crate) fn check_time_claims(&self) -> Result<()> {
        for claim in ["exp", "nbf"] {
            self.numeric_date(claim)?;
        }
        Ok(())
    }
}

impl From<BTreeMap<String, Value>> for Payload {
    fn from(claims: BTreeMap<String, Value>) -> Self {
        Self { claims }
    }
}

impl TryFrom<Value> for Payload {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self {
                claims: map.into_iter().collect(),
            }),
            other => Err(Error::MalformedSegment(format!(
                "payload must be a JSON object, found {other}"
            ))),
        }
    }
}

/// Validate `exp` and `nbf` against `now`
///
/// Returns the expiration timestamp when the payload carries one.
pub(crate) fn validate_time(
    payload: &Payload,
    now: i64,
    leeway: u64,
    validate_nbf: bool,
) -> Result<Option<i64>> {
    let leeway_i64 = i64::try_from(leeway).unwrap_or(i64::MAX);
    let expiration = payload.numeric_date("exp")?;

    if let Some(exp) = expiration {
        if now >= exp.saturating_add(leeway_i64) {
            return Err(Error::TokenExpired {
                expired_at: exp,
                now,
                leeway,
            });
        }
    }

    if validate_nbf {
        if let Some(nbf) = payload.numeric_date("nbf")? {
            if now < nbf.saturating_sub(leeway_i64) {
                return Err(Error::TokenNotYetValid {
                    not_before: nbf,
                    now,
                    leeway,
                });
            }
        }
    }

    Ok(expiration)
}

/// Get current Unix timestamp
pub(crate) fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| std::time::Duration::from_secs(0))
        .as_secs() as i64
}
