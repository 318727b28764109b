//! Errors for jwtseal

use thiserror::Error;

/// JWTSeal Errors
///
/// Every variant is a caller input or configuration problem. None of them
/// is transient, so retrying the same call yields the same error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Format Errors
    // ============================================================================
    #[error("Malformed segment: {0}")]
    MalformedSegment(String),

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    // ============================================================================
    // Algorithm Errors
    // ============================================================================
    #[error("Algorithm '{0}' is not supported")]
    UnsupportedAlgorithm(String),

    #[error("Algorithm mismatch: expected '{expected}', token declares '{found}'")]
    AlgorithmMismatch { expected: String, found: String },

    // ============================================================================
    // Signature Errors
    // ============================================================================
    #[error("Signature verification failed")]
    InvalidSignature,

    // ============================================================================
    // Claim Errors
    // ============================================================================
    #[error("Token expired at {expired_at} (now: {now}, leeway: {leeway}s)")]
    TokenExpired {
        expired_at: i64,
        now: i64,
        leeway: u64,
    },

    #[error("Token not valid until {not_before} (now: {now}, leeway: {leeway}s)")]
    TokenNotYetValid {
        not_before: i64,
        now: i64,
        leeway: u64,
    },

    #[error("Invalid claim: {0}")]
    InvalidClaim(String),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),
}

/// Fieldless discriminant of [`Error`], for mapping failures to responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedSegment,
    MalformedToken,
    UnsupportedAlgorithm,
    AlgorithmMismatch,
    InvalidSignature,
    TokenExpired,
    TokenNotYetValid,
    InvalidClaim,
    Serialization,
    ConfigurationInvalid,
}

impl Error {
    /// The kind of this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedSegment(_) => ErrorKind::MalformedSegment,
            Error::MalformedToken(_) => ErrorKind::MalformedToken,
            Error::UnsupportedAlgorithm(_) => ErrorKind::UnsupportedAlgorithm,
            Error::AlgorithmMismatch { .. } => ErrorKind::AlgorithmMismatch,
            Error::InvalidSignature => ErrorKind::InvalidSignature,
            Error::TokenExpired { .. } => ErrorKind::TokenExpired,
            Error::TokenNotYetValid { .. } => ErrorKind::TokenNotYetValid,
            Error::InvalidClaim(_) => ErrorKind::InvalidClaim,
            Error::Serialization(_) => ErrorKind::Serialization,
            Error::ConfigurationInvalid(_) => ErrorKind::ConfigurationInvalid,
        }
    }

    /// Whether the error came from checking a token rather than from
    /// malformed input or configuration
    pub const fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            Error::AlgorithmMismatch { .. }
                | Error::InvalidSignature
                | Error::TokenExpired { .. }
                | Error::TokenNotYetValid { .. }
        )
    }

    /// Lift a codec failure into a whole-token failure
    pub(crate) fn into_malformed_token(self) -> Self {
        match self {
            Error::MalformedSegment(msg) => Error::MalformedToken(msg),
            other => other,
        }
    }
}

/// Result type alias for JWTSeal operations
pub type Result<T> = std::result::Result<T, Error>;
