//! Algorithm support for JWT signing and verification
use crate::error::{Error, Result};
use crate::limits::{MAX_ALG_LENGTH, MAX_DECODED_SIGNATURE_SIZE, MAX_SIGNATURE_B64_SIZE};
use crate::utils::base64url;

use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

/// Algorithm identifier from JWT header
///
/// Only keyed-hash (HMAC) algorithms exist here. Anything else a header may
/// declare, `"none"` included, fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// HMAC with SHA-256
    #[default]
    HS256,

    /// HMAC with SHA-384
    HS384,

    /// HMAC with SHA-512
    HS512,
}

impl Algorithm {
    /// All supported algorithms
    pub const ALL: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

    /// Parse an algorithm name as it appears in the `alg` header field
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() > MAX_ALG_LENGTH {
            return Err(Error::UnsupportedAlgorithm(format!(
                "Algorithm string too long: {} bytes (maximum: {} bytes)",
                s.len(),
                MAX_ALG_LENGTH
            )));
        }

        match s {
            "HS256" => Ok(Algorithm::HS256),
            "HS384" => Ok(Algorithm::HS384),
            "HS512" => Ok(Algorithm::HS512),
            _ => Err(Error::UnsupportedAlgorithm(s.into())),
        }
    }

    /// Convert to string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Algorithm::HS256 => "HS256",
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
        }
    }

    /// Length of the MAC in bytes
    pub const fn output_len(&self) -> usize {
        match self {
            Algorithm::HS256 => 32,
            Algorithm::HS384 => 48,
            Algorithm::HS512 => 64,
        }
    }

    /// Compute the MAC of `signing_input` keyed with `secret`
    pub(crate) fn sign(&self, signing_input: &str, secret: &[u8]) -> Result<Vec<u8>> {
        let input = signing_input.as_bytes();
        let tag = match self {
            Algorithm::HS256 => {
                let mut mac = Hmac::<Sha256>::new_from_slice(secret)
                    .map_err(|e| Error::ConfigurationInvalid(format!("HMAC key rejected: {e}")))?;
                mac.update(input);
                mac.finalize().into_bytes().to_vec()
            }
            Algorithm::HS384 => {
                let mut mac = Hmac::<Sha384>::new_from_slice(secret)
                    .map_err(|e| Error::ConfigurationInvalid(format!("HMAC key rejected: {e}")))?;
                mac.update(input);
                mac.finalize().into_bytes().to_vec()
            }
            Algorithm::HS512 => {
                let mut mac = Hmac::<Sha512>::new_from_slice(secret)
                    .map_err(|e| Error::ConfigurationInvalid(format!("HMAC key rejected: {e}")))?;
                mac.update(input);
                mac.finalize().into_bytes().to_vec()
            }
        };
        Ok(tag)
    }

    /// Verify a Base64URL-encoded signature with constant-time comparison
    ///
    /// # Arguments
    /// * `signing_input` - The data that was signed (header.payload)
    /// * `signature` - The Base64URL-encoded signature segment
    /// * `secret` - The shared HMAC key
    pub(crate) fn verify_signature(
        &self,
        signing_input: &str,
        signature: &str,
        secret: &[u8],
    ) -> Result<()> {
        if signature.len() > MAX_SIGNATURE_B64_SIZE {
            return Err(Error::MalformedToken(format!(
                "Signature too large: {} bytes (maximum: {} bytes)",
                signature.len(),
                MAX_SIGNATURE_B64_SIZE
            )));
        }

        let provided = base64url::decode_bytes(signature, MAX_DECODED_SIGNATURE_SIZE)
            .map_err(Error::into_malformed_token)?;
        let expected = self.sign(signing_input, secret)?;

        if provided.len() != expected.len() {
            return Err(Error::InvalidSignature);
        }

        if constant_time_eq(&provided, &expected) {
            Ok(())
        } else {
            Err(Error::InvalidSignature)
        }
    }
}

impl std::str::FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for Algorithm {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNING_INPUT: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiIxIn0";

    #[test]
    fn test_algorithm_parse() {
        assert_eq!(Algorithm::parse("HS256").unwrap(), Algorithm::HS256);
        assert_eq!(Algorithm::parse("HS384").unwrap(), Algorithm::HS384);
        assert_eq!(Algorithm::parse("HS512").unwrap(), Algorithm::HS512);

        for rejected in ["none", "None", "RS256", "ES256", "hs256", "", "UNKNOWN"] {
            assert!(
                matches!(Algorithm::parse(rejected), Err(Error::UnsupportedAlgorithm(_))),
                "{rejected} should be rejected"
            );
        }
    }

    #[test]
    fn test_algorithm_parse_too_long() {
        let long = "HS256".repeat(10);
        assert!(matches!(
            Algorithm::parse(&long),
            Err(Error::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn test_algorithm_display() {
        assert_eq!(format!("{}", Algorithm::HS256), "HS256");
        assert_eq!(Algorithm::HS384.as_str(), "HS384");
        assert_eq!("HS512".parse::<Algorithm>().unwrap(), Algorithm::HS512);
        assert_eq!(Algorithm::default(), Algorithm::HS256);
    }

    #[test]
    fn test_output_len_matches_mac() {
        for alg in Algorithm::ALL {
            let tag = alg.sign(SIGNING_INPUT, b"secret").unwrap();
            assert_eq!(tag.len(), alg.output_len());
        }
    }

    #[test]
    fn test_hs256_known_signature() {
        let tag = Algorithm::HS256.sign(SIGNING_INPUT, b"test").unwrap();
        assert_eq!(
            base64url::encode_bytes(&tag),
            "vVyZrmccWHSiRiP901TjgbqbAtNpDV_vdEuRvUrV1Yk"
        );
    }

    #[test]
    fn test_verify_valid_signature() {
        for alg in Algorithm::ALL {
            let tag = alg.sign(SIGNING_INPUT, b"your-secret").unwrap();
            let signature = base64url::encode_bytes(&tag);
            assert!(alg
                .verify_signature(SIGNING_INPUT, &signature, b"your-secret")
                .is_ok());
        }
    }

    #[test]
    fn test_verify_wrong_secret() {
        let tag = Algorithm::HS256.sign(SIGNING_INPUT, b"secret-a").unwrap();
        let signature = base64url::encode_bytes(&tag);
        let result = Algorithm::HS256.verify_signature(SIGNING_INPUT, &signature, b"secret-b");
        assert!(matches!(result, Err(Error::InvalidSignature)));
    }

    #[test]
    fn test_verify_truncated_signature() {
        let tag = Algorithm::HS256.sign(SIGNING_INPUT, b"secret").unwrap();
        let signature = base64url::encode_bytes(&tag[..16]);
        let result = Algorithm::HS256.verify_signature(SIGNING_INPUT, &signature, b"secret");
        assert!(matches!(result, Err(Error::InvalidSignature)));
    }

    #[test]
    fn test_verify_cross_algorithm_signature() {
        // An HS512 tag never satisfies HS256, even with the same key
        let tag = Algorithm::HS512.sign(SIGNING_INPUT, b"secret").unwrap();
        let signature = base64url::encode_bytes(&tag);
        let result = Algorithm::HS256.verify_signature(SIGNING_INPUT, &signature, b"secret");
        assert!(matches!(result, Err(Error::InvalidSignature)));
    }

    #[test]
    fn test_verify_undecodable_signature() {
        let result = Algorithm::HS256.verify_signature(SIGNING_INPUT, "not*base64", b"secret");
        assert!(matches!(result, Err(Error::MalformedToken(_))));
    }
}
