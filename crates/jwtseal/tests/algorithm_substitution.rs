//! Tests verifying protection against algorithm substitution
//!
//! A verifier configured for one HMAC algorithm must reject tokens that
//! declare any other algorithm, whatever their signature segment holds.

use jwtseal::*;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};

const SECRET: &[u8] = b"substitution-secret";

fn b64(input: &str) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Helper: token with arbitrary header JSON and signature segment
fn forged(header: &str, signature: &str) -> String {
    format!(
        "{}.{}.{}",
        b64(header),
        b64(r#"{"iss":"attacker","sub":"admin","exp":9999999999}"#),
        signature
    )
}

/// Helper: token with arbitrary header JSON, correctly HMAC-SHA256 signed
fn hs256_signed(header: &str) -> String {
    let signing_input = format!(
        "{}.{}",
        b64(header),
        b64(r#"{"iss":"attacker","sub":"admin"}"#)
    );
    let mut mac = Hmac::<Sha256>::new_from_slice(SECRET).unwrap();
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    format!("{signing_input}.{signature}")
}

// ============================================================================
// "none" algorithm
// ============================================================================

#[test]
fn test_none_algorithm_with_empty_signature() {
    let token = forged(r#"{"alg":"none","typ":"JWT"}"#, "");
    let err = verify(&token, SECRET, Algorithm::HS256).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedToken);
}

#[test]
fn test_none_algorithm_with_arbitrary_signature() {
    for alg in ["none", "None", "NONE", "nOnE"] {
        let token = forged(&format!(r#"{{"alg":"{alg}","typ":"JWT"}}"#), "c2lnbmF0dXJl");
        assert_eq!(
            verify(&token, SECRET, Algorithm::HS256),
            Err(Error::AlgorithmMismatch {
                expected: "HS256".into(),
                found: alg.into()
            }),
            "{alg} must be rejected"
        );
    }
}

#[test]
fn test_none_algorithm_cannot_be_signed() {
    let header = Header::default().with("alg", "none");
    assert!(matches!(
        sign(&header, &Payload::new(), SECRET),
        Err(Error::UnsupportedAlgorithm(_))
    ));
}

// ============================================================================
// Asymmetric algorithm names (RS256 -> HS256 confusion)
// ============================================================================

#[test]
fn test_asymmetric_algorithms_are_rejected() {
    for alg in ["RS256", "RS512", "ES256", "PS256", "EdDSA"] {
        let token = forged(&format!(r#"{{"alg":"{alg}"}}"#), "c2lnbmF0dXJl");
        let err = verify(&token, SECRET, Algorithm::HS256).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlgorithmMismatch, "{alg}");
    }
}

#[test]
fn test_valid_mac_under_foreign_algorithm_name_is_rejected() {
    // The MAC is correct for HS256, but the header claims RS256
    let token = hs256_signed(r#"{"alg":"RS256","typ":"JWT"}"#);
    let err = verify(&token, SECRET, Algorithm::HS256).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlgorithmMismatch);
}

#[test]
fn test_valid_mac_under_correct_algorithm_name_is_accepted() {
    let token = hs256_signed(r#"{"alg":"HS256","typ":"JWT"}"#);
    let verified = verify(&token, SECRET, Algorithm::HS256).unwrap();
    assert_eq!(verified.payload().subject(), Some("admin"));
}

// ============================================================================
// HMAC size downgrade / upgrade
// ============================================================================

#[test]
fn test_other_hmac_sizes_are_rejected() {
    let token = sign(&Header::new(Algorithm::HS512), &Payload::new(), SECRET).unwrap();
    for expected in [Algorithm::HS256, Algorithm::HS384] {
        let err = verify(token.as_str(), SECRET, expected).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlgorithmMismatch);
    }
    assert!(verify(token.as_str(), SECRET, Algorithm::HS512).is_ok());
}

#[test]
fn test_header_claiming_hs256_with_hs512_mac() {
    let signing_input = format!("{}.{}", b64(r#"{"alg":"HS256"}"#), b64(r#"{"sub":"1"}"#));
    let mut mac = Hmac::<Sha512>::new_from_slice(SECRET).unwrap();
    mac.update(signing_input.as_bytes());
    let token = format!(
        "{signing_input}.{}",
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    );

    assert_eq!(
        verify(&token, SECRET, Algorithm::HS256),
        Err(Error::InvalidSignature)
    );
}

// ============================================================================
// Malformed alg values
// ============================================================================

#[test]
fn test_non_string_algorithm_is_rejected() {
    for header in [r#"{"alg":256}"#, r#"{"alg":null}"#, r#"{"alg":["HS256"]}"#, r#"{}"#] {
        let token = forged(header, "c2lnbmF0dXJl");
        let err = verify(&token, SECRET, Algorithm::HS256).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlgorithmMismatch, "{header}");
    }
}

#[test]
fn test_oversized_algorithm_is_rejected() {
    let alg = "HS256".repeat(100);
    let token = forged(&format!(r#"{{"alg":"{alg}"}}"#), "c2lnbmF0dXJl");
    let err = verify(&token, SECRET, Algorithm::HS256).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlgorithmMismatch);
}
