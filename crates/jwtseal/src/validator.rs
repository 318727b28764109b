use crate::algorithm::Algorithm;
use crate::claims::{current_timestamp, validate_time, Payload};
use crate::decoder::{to_datetime, Parts};
use crate::error::{Error, Result};
use crate::header::Header;
use crate::limits::MAX_LEEWAY_SECONDS;

use chrono::{DateTime, Utc};

/// A token whose signature and time claims have been checked
#[derive(Debug, Clone, PartialEq)]
pub struct Verified {
    header: Header,
    payload: Payload,
    expires_at: Option<DateTime<Utc>>,
}

impl Verified {
    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Expiration instant from the `exp` claim
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn into_payload(self) -> Payload {
        self.payload
    }
}

/// JWT token validator
///
/// The validator is configured once and can be reused for any number of
/// tokens. The accepted algorithm is part of the configuration, never taken
/// from the token: a token declaring anything else (`none`, an asymmetric
/// algorithm, a different HMAC size) is rejected before its signature is
/// looked at.
///
/// # Validation Flow
///
/// 1. Structure: three segments, header and payload decode to JSON objects
/// 2. Algorithm: header `alg` equals the configured algorithm
/// 3. Signature: recomputed MAC matches in constant time
/// 4. Time: `exp` has not passed, `nbf` has been reached
///
/// # Example
///
/// ```
/// use jwtseal::{sign, Algorithm, Header, Payload, TokenValidator};
///
/// let token = sign(
///     &Header::new(Algorithm::HS256),
///     &Payload::new().with("sub", "user123"),
///     b"my-secret",
/// )?;
///
/// let verified = TokenValidator::new(Algorithm::HS256)
///     .leeway(30)
///     .verify(token.as_str(), b"my-secret")?;
///
/// assert_eq!(verified.payload().subject(), Some("user123"));
/// # Ok::<(), jwtseal::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenValidator {
    algorithm: Algorithm,
    leeway_seconds: u64,
    validate_nbf: bool,
}

impl TokenValidator {
    /// Create a validator accepting only `algorithm`
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            leeway_seconds: 0,
            validate_nbf: true,
        }
    }

    /// Set clock skew tolerance applied to `exp` and `nbf`
    ///
    /// # Security
    /// Leeway is limited to 300 seconds so it cannot effectively disable
    /// expiration. Larger values are rejected when verifying.
    pub fn leeway(mut self, seconds: u64) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    /// Disable not-before validation
    pub fn no_nbf_validation(mut self) -> Self {
        self.validate_nbf = false;
        self
    }

    /// The algorithm this validator accepts
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Verify a token against the current system time
    pub fn verify(&self, token: &str, secret: &[u8]) -> Result<Verified> {
        self.verify_at(token, secret, current_timestamp())
    }

    /// Verify a token against an explicit Unix timestamp
    pub fn verify_at(&self, token: &str, secret: &[u8], now: i64) -> Result<Verified> {
        if self.leeway_seconds > MAX_LEEWAY_SECONDS {
            return Err(Error::ConfigurationInvalid(format!(
                "Leeway too large: {} seconds (maximum: {} seconds)",
                self.leeway_seconds, MAX_LEEWAY_SECONDS
            )));
        }

        // 1. Structure
        let parts = Parts::parse(token)?;

        // 2. Algorithm
        self.check_algorithm(&parts.header)?;

        // 3. Signature
        self.algorithm
            .verify_signature(&parts.signing_input(), parts.signature_b64, secret)?;

        // 4. Time
        let expiration = validate_time(&parts.payload, now, self.leeway_seconds, self.validate_nbf)?;

        Ok(Verified {
            header: parts.header,
            payload: parts.payload,
            expires_at: expiration.map(to_datetime),
        })
    }

    fn check_algorithm(&self, header: &Header) -> Result<()> {
        match header.algorithm().map(Algorithm::parse) {
            Some(Ok(declared)) if declared == self.algorithm => Ok(()),
            _ => Err(Error::AlgorithmMismatch {
                expected: self.algorithm.to_string(),
                found: header.describe_algorithm(),
            }),
        }
    }
}

impl Default for TokenValidator {
    fn default() -> Self {
        Self::new(Algorithm::default())
    }
}
